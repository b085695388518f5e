//! `reprokit new`: write a fresh submission file.
//!
//! Values come from flags; when stdin is a terminal, anything missing is
//! prompted for. The document is validated before it touches disk.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use reprokit::config::Config;
use reprokit::submission::{ClaimRecord, ClaimType, DocumentFormat, SubmissionRecord};
use reprokit::validator::Validator;

use crate::cmd::ui::{Output, OutputMode};

/// Submission values gathered from the command line.
#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    pub username: Option<String>,
    pub paper_title: Option<String>,
    pub paper_pdf: Option<String>,
    pub identifier: Option<String>,
    pub claim_type: Option<ClaimType>,
    pub code_url: Option<String>,
    pub data_url: Option<String>,
    pub claim: Option<String>,
    pub context: Option<String>,
    pub steps: Vec<String>,
}

pub fn cmd_new(out: &Output, args: NewArgs, json: bool, dir: &Path) -> Result<()> {
    let config = Config::load()?;
    let validator = Validator::from_config(&config.validation);

    let args = if out.mode() == OutputMode::Human && atty::is(atty::Stream::Stdin) {
        prompt_missing(args)?
    } else {
        args
    };

    let record = record_from_args(args)?;
    let format = if json {
        DocumentFormat::Json
    } else {
        DocumentFormat::Yaml
    };

    let path = write_submission(&validator, &record, format, dir, Utc::now())?;

    if out.mode() == OutputMode::Json {
        out.json(&json!({
            "event": "created",
            "path": path.display().to_string(),
            "username": record.username,
        }));
    } else {
        out.success(&format!("Created {}", path.display()));
    }
    Ok(())
}

/// Ask for every value the flags left out.
fn prompt_missing(mut args: NewArgs) -> Result<NewArgs> {
    fn ask(prompt: &str) -> Result<String> {
        Ok(dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()?)
    }

    fn ask_optional(prompt: &str) -> Result<Option<String>> {
        let answer: String = dialoguer::Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(answer).filter(|a| !a.trim().is_empty()))
    }

    if args.username.is_none() {
        args.username = Some(ask("GitHub username")?);
    }
    if args.paper_title.is_none() {
        args.paper_title = Some(ask("Paper title")?);
    }
    if args.paper_pdf.is_none() {
        args.paper_pdf = Some(ask("Paper PDF URL")?);
    }
    if args.identifier.is_none() {
        args.identifier = Some(ask("Paper identifier (DOI, arXiv id)")?);
    }

    let claim_type = match args.claim_type {
        Some(claim_type) => claim_type,
        None => {
            let items: Vec<&str> = ClaimType::ALL.iter().map(|c| c.as_str()).collect();
            let selection = dialoguer::Select::new()
                .with_prompt("Claim type")
                .items(&items)
                .default(0)
                .interact()?;
            ClaimType::ALL[selection]
        }
    };
    args.claim_type = Some(claim_type);

    if args.code_url.is_none() {
        args.code_url = if claim_type.requires_code_url() {
            Some(ask("Code repository URL")?)
        } else {
            ask_optional("Code repository URL (optional)")?
        };
    }
    if args.data_url.is_none() {
        args.data_url = ask_optional("Data URL (optional)")?;
    }
    if args.claim.is_none() {
        args.claim = Some(ask("Claim")?);
    }
    if args.context.is_none() {
        args.context = ask_optional("Context (optional)")?;
    }

    if args.steps.is_empty() {
        args.steps.push(ask("Step 1")?);
        while let Some(step) = ask_optional(&format!(
            "Step {} (leave empty to finish)",
            args.steps.len() + 1
        ))? {
            args.steps.push(step);
        }
    }

    Ok(args)
}

/// Build a record from complete arguments, naming every missing flag.
pub(crate) fn record_from_args(args: NewArgs) -> Result<SubmissionRecord> {
    let mut missing = Vec::new();
    let mut require = |value: Option<String>, flag: &str| {
        if value.is_none() {
            missing.push(flag.to_string());
        }
        value.unwrap_or_default()
    };

    let username = require(args.username, "--username");
    let paper_title = require(args.paper_title, "--title");
    let paper_pdf = require(args.paper_pdf, "--pdf");
    let identifier = require(args.identifier, "--identifier");
    let claim = require(args.claim, "--claim");
    if args.steps.is_empty() {
        missing.push("--step".to_string());
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing values: {}\nPass them as flags or run in a terminal to be prompted.",
            missing.join(", ")
        );
    }

    Ok(SubmissionRecord {
        username,
        paper_title,
        paper_pdf,
        identifier,
        claim_type: args.claim_type.unwrap_or_default(),
        code_url: args.code_url,
        data_url: args.data_url,
        claims: vec![ClaimRecord {
            claim,
            context: args.context,
            instruction: args.steps,
        }],
        non_reproducible_claims: Vec::new(),
    })
}

/// Validate `record` and write it into `dir`, returning the new file's path.
pub(crate) fn write_submission(
    validator: &Validator,
    record: &SubmissionRecord,
    format: DocumentFormat,
    dir: &Path,
    created_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let report = validator.validate_document(&record.to_submission()?);
    if !report.is_valid() {
        anyhow::bail!(
            "Submission is invalid:\n  - {}",
            report.error_messages().join("\n  - ")
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let path = dir.join(record.file_name(format, created_at));
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    fs::write(&path, record.render(format)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
