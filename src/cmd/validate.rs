//! `reprokit validate`: check one submission or a directory of them.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use reprokit::config::Config;
use reprokit::submission::DocumentFormat;
use reprokit::validator::{ValidationIssue, ValidationReport, Validator};

use crate::cmd::ui::{Output, OutputMode};

/// Validate `path` with the configured rules. Returns whether everything passed.
pub fn cmd_validate(out: &Output, path: &Path, fields: Vec<String>) -> Result<bool> {
    let config = Config::load()?;
    let mut validator = Validator::from_config(&config.validation);
    if !fields.is_empty() {
        validator = validator.with_required_fields(fields);
    }

    run_validate(out, &validator, path)
}

pub(crate) fn run_validate(out: &Output, validator: &Validator, path: &Path) -> Result<bool> {
    if path.is_dir() {
        return validate_directory(out, validator, path);
    }

    let report = validator.validate_file(path);
    if out.mode() == OutputMode::Json {
        out.json(&report_json(&report));
        return Ok(report.is_valid());
    }

    print_issues(out, &report);
    if report.is_valid() {
        out.success(&format!("Validation passed: {}", path.display()));
    } else {
        out.error(&format!("Validation failed: {}", path.display()));
    }
    Ok(report.is_valid())
}

fn validate_directory(out: &Output, validator: &Validator, dir: &Path) -> Result<bool> {
    let files = submission_files(dir)?;
    if files.is_empty() {
        out.warn(&format!("No submission files found in {}", dir.display()));
        return Ok(true);
    }

    let mut passed = 0;
    let mut warned = 0;
    let mut failed = 0;

    for file in &files {
        let report = validator.validate_file(file);
        if !report.is_valid() {
            failed += 1;
        } else if report.has_warnings() {
            warned += 1;
        } else {
            passed += 1;
        }

        if out.mode() == OutputMode::Json {
            out.json(&report_json(&report));
            continue;
        }

        let shown = file.strip_prefix(dir).unwrap_or(file).display().to_string();
        if !report.is_valid() {
            out.error(&shown);
            for issue in report.errors() {
                out.detail(&issue.message);
            }
        } else if report.has_warnings() {
            out.warn(&shown);
            for issue in report.warnings() {
                out.detail(&issue.message);
            }
        } else {
            out.success(&shown);
        }
    }

    if out.mode() == OutputMode::Json {
        out.json(&json!({
            "event": "summary",
            "total": files.len(),
            "passed": passed,
            "warned": warned,
            "failed": failed,
        }));
    } else {
        out.info("");
        out.rule();
        out.info(&format!("Total:  {}", files.len()));
        out.info(&format!("Passed: {}", passed));
        out.info(&format!("Warned: {}", warned));
        out.info(&format!("Failed: {}", failed));
        out.rule();
    }

    Ok(failed == 0)
}

/// Every `.json`, `.yaml` and `.yml` file under `dir`, sorted by path.
fn submission_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        if entry.file_type().is_file() && DocumentFormat::is_submission_path(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn print_issues(out: &Output, report: &ValidationReport) {
    if !report.is_valid() {
        out.info("Validation errors:");
        for issue in report.errors() {
            out.error(&issue.message);
            if let Some(suggestion) = &issue.suggestion {
                out.detail(suggestion);
            }
        }
    }

    if report.has_warnings() {
        out.info("Warnings:");
        for issue in report.warnings() {
            out.warn(&issue.message);
            if let Some(suggestion) = &issue.suggestion {
                out.detail(suggestion);
            }
        }
    }
}

fn issue_json(issue: &ValidationIssue) -> Value {
    json!({
        "kind": issue.kind.to_string(),
        "field": issue.field,
        "message": issue.message,
        "suggestion": issue.suggestion,
    })
}

fn report_json(report: &ValidationReport) -> Value {
    json!({
        "event": "validated",
        "path": report.path.as_ref().map(|p| p.display().to_string()),
        "valid": report.is_valid(),
        "errors": report.errors().map(issue_json).collect::<Vec<_>>(),
        "warnings": report.warnings().map(issue_json).collect::<Vec<_>>(),
    })
}
