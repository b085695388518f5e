//! `reprokit organize`: file submissions into per-user directories.

use anyhow::Result;
use serde_json::json;
use std::path::Path;

use reprokit::config::Config;
use reprokit::organizer::{
    summarize_target, FileOutcome, OrganizeOptions, OrganizeReport, Organizer, SkipReason,
};

use crate::cmd::ui::{Output, OutputMode};

/// Organize `source` into `target`. Returns whether every file was handled.
pub fn cmd_organize(out: &Output, source: &Path, target: &Path, dry_run: bool) -> Result<bool> {
    let config = Config::load()?;
    let options = OrganizeOptions::from_config(&config.organize).dry_run(dry_run);
    run_organize(out, &Organizer::new(options), source, target)
}

pub(crate) fn run_organize(
    out: &Output,
    organizer: &Organizer,
    source: &Path,
    target: &Path,
) -> Result<bool> {
    let report = organizer.organize(source, target)?;

    for outcome in &report.outcomes {
        print_outcome(out, outcome, report.dry_run);
    }
    print_summary(out, &report, target)?;

    Ok(report.errors() == 0)
}

fn print_outcome(out: &Output, outcome: &FileOutcome, dry_run: bool) {
    if out.mode() == OutputMode::Json {
        let event = match outcome {
            FileOutcome::Skipped { path, reason } => json!({
                "event": "skipped",
                "path": path.display().to_string(),
                "reason": reason.to_string(),
            }),
            FileOutcome::Moved { from, to, username } => json!({
                "event": if dry_run { "planned" } else { "moved" },
                "from": from.display().to_string(),
                "to": to.display().to_string(),
                "username": username,
            }),
            FileOutcome::Failed { path, error } => json!({
                "event": "failed",
                "path": path.display().to_string(),
                "error": error.to_string(),
            }),
        };
        out.json(&event);
        return;
    }

    match outcome {
        // Placeholders are not worth a line.
        FileOutcome::Skipped {
            reason: SkipReason::Ignored,
            ..
        } => {}
        FileOutcome::Skipped { path, reason } => {
            out.info(&format!("Skipping {}: {}", reason, path.display()));
        }
        FileOutcome::Moved { from, to, .. } => {
            out.step(&format!("Processing: {}", from.display()));
            if dry_run {
                out.detail(&format!("Would move to: {}", to.display()));
            } else {
                out.detail(&format!("Moved to: {}", to.display()));
            }
        }
        FileOutcome::Failed { path, error } => {
            out.error(&format!("{}: {}", path.display(), error));
        }
    }
}

fn print_summary(out: &Output, report: &OrganizeReport, target: &Path) -> Result<()> {
    let users = if report.dry_run {
        report.moved_by_user()
    } else {
        summarize_target(target)?
    };

    if out.mode() == OutputMode::Json {
        out.json(&json!({
            "event": "summary",
            "dry_run": report.dry_run,
            "processed": report.processed(),
            "errors": report.errors(),
            "users": users
                .iter()
                .map(|u| json!({ "name": u.name, "files": u.file_count }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    out.info("");
    out.rule();
    if report.dry_run {
        out.info("Dry run, nothing was moved");
    } else {
        out.success("Organization complete!");
    }
    out.info(&format!("Files processed: {}", report.processed()));
    out.info(&format!("Errors: {}", report.errors()));

    if !users.is_empty() {
        out.info("");
        out.info("User directories:");
        for user in &users {
            out.detail(&format!("{}/: {} file(s)", user.name, user.file_count));
        }
    }
    out.rule();

    Ok(())
}
