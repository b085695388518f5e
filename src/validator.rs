//! Submission validation.
//!
//! Validation is a pure function from a classified [`Submission`] to a
//! [`ValidationReport`]. Every rule runs; findings accumulate as errors or
//! warnings, and only errors affect the verdict.
//!
//! Rules, in order:
//! 1. Required fields present and non-blank
//! 2. Username format and length
//! 3. `claim_type` value and the `code_url` it implies
//! 4. Paper title is non-blank text
//! 5. Links use http or https
//! 6. Identifier is non-blank
//! 7. Claims and their reproduction steps
//! 8. Non-reproducible claims carry a reason (warning only)

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ValidationConfig;
use crate::submission::{
    self, keys, Claim, ClaimEntry, ClaimType, Field, Listing, NonReproducibleEntry, Submission,
    SubmissionError,
};

/// GitHub's username length limit.
pub const DEFAULT_MAX_USERNAME_LENGTH: usize = 39;

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational; never affects the verdict
    Warning,
    /// Must be fixed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// What kind of rule an issue violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    FileNotFound,
    UnsupportedExtension,
    ParseError,
    /// Top-level value is not a mapping
    SchemaError,
    FieldMissing,
    FieldEmpty,
    /// Format or enum violation
    FieldInvalid,
    /// Per-claim or per-step violation
    ClaimStructure,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FileNotFound => "file-not-found",
            Self::UnsupportedExtension => "unsupported-extension",
            Self::ParseError => "parse-error",
            Self::SchemaError => "schema-error",
            Self::FieldMissing => "field-missing",
            Self::FieldEmpty => "field-empty",
            Self::FieldInvalid => "field-invalid",
            Self::ClaimStructure => "claim-structure",
        };
        write!(f, "{}", name)
    }
}

impl From<&SubmissionError> for IssueKind {
    fn from(err: &SubmissionError) -> Self {
        match err {
            SubmissionError::FileNotFound { .. } => IssueKind::FileNotFound,
            SubmissionError::UnsupportedExtension { .. } => IssueKind::UnsupportedExtension,
            SubmissionError::NotAMapping => IssueKind::SchemaError,
            SubmissionError::Parse { .. }
            | SubmissionError::Read { .. }
            | SubmissionError::Serialize { .. } => IssueKind::ParseError,
        }
    }
}

/// A single validation issue
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    /// Top-level field the issue concerns, if any
    pub field: Option<String>,
    pub message: String,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            field: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, message)
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add a suggestion to this issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// File the document came from, when validated from disk
    pub path: Option<PathBuf>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True iff there are no errors; warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors().map(|i| i.message.clone()).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings().map(|i| i.message.clone()).collect()
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

/// Why a username was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameProblem {
    #[error("Username cannot be empty")]
    Empty,
    #[error("Username can only contain letters, numbers, hyphens, and underscores")]
    InvalidCharacters,
    #[error("Username is too long (max {max} characters)")]
    TooLong { max: usize },
}

/// ASCII letters, digits, `-` and `_`.
pub fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Check a username against the allowed character set and length limit.
/// Surrounding whitespace is ignored.
pub fn check_username(username: &str, max_len: usize) -> Result<(), UsernameProblem> {
    let username = username.trim();
    if username.is_empty() {
        return Err(UsernameProblem::Empty);
    }
    if !username.chars().all(is_username_char) {
        return Err(UsernameProblem::InvalidCharacters);
    }
    if username.chars().count() > max_len {
        return Err(UsernameProblem::TooLong { max: max_len });
    }
    Ok(())
}

/// Validates submissions against a required-field list and the structural rules.
#[derive(Debug, Clone)]
pub struct Validator {
    required_fields: Vec<String>,
    max_username_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Validator with the default required fields.
    pub fn new() -> Self {
        Self {
            required_fields: keys::DEFAULT_REQUIRED.iter().map(|s| s.to_string()).collect(),
            max_username_length: DEFAULT_MAX_USERNAME_LENGTH,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            required_fields: config.required_fields.clone(),
            max_username_length: config.max_username_length,
        }
    }

    /// Replace the required-field list.
    pub fn with_required_fields(mut self, fields: Vec<String>) -> Self {
        self.required_fields = fields;
        self
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Load and validate a file. Load failures become a single error.
    pub fn validate_file(&self, path: &Path) -> ValidationReport {
        let mut report = match submission::load_document(path) {
            Ok(document) => self.validate_document(&document),
            Err(err) => {
                let mut report = ValidationReport::default();
                report.push(ValidationIssue::error(IssueKind::from(&err), err.to_string()));
                report
            }
        };
        report.path = Some(path.to_path_buf());
        report
    }

    /// Validate an in-memory document.
    pub fn validate_document(&self, document: &Submission) -> ValidationReport {
        let mut report = ValidationReport::default();

        self.check_required(document, &mut report);
        self.check_username_field(document, &mut report);
        check_claim_type(document, &mut report);
        check_paper_title(document, &mut report);
        check_urls(document, &mut report);
        check_identifier(document, &mut report);
        check_claims(document, &mut report);
        check_non_reproducible_claims(document, &mut report);

        report
    }

    fn check_required(&self, document: &Submission, report: &mut ValidationReport) {
        for name in &self.required_fields {
            let value = document.field(name);
            if !value.is_present() {
                report.push(
                    ValidationIssue::error(
                        IssueKind::FieldMissing,
                        format!("Required field missing: '{}'", name),
                    )
                    .with_field(name),
                );
            } else if value.is_blank() {
                report.push(
                    ValidationIssue::error(
                        IssueKind::FieldEmpty,
                        format!("Required field '{}' cannot be empty", name),
                    )
                    .with_field(name),
                );
            }
        }
    }

    fn check_username_field(&self, document: &Submission, report: &mut ValidationReport) {
        let problem = match &document.username {
            Field::Absent => return,
            Field::Null => Some(UsernameProblem::Empty.to_string()),
            Field::List(_) | Field::Mapping(_) => Some(format!(
                "Username must be a string, found {}",
                document.username.kind_name()
            )),
            field => field
                .as_text()
                .and_then(|text| check_username(&text, self.max_username_length).err())
                .map(|p| p.to_string()),
        };

        if let Some(message) = problem {
            let kind = if document.username.is_blank() {
                IssueKind::FieldEmpty
            } else {
                IssueKind::FieldInvalid
            };
            report.push(ValidationIssue::error(kind, message).with_field(keys::USERNAME));
        }
    }
}

fn check_claim_type(document: &Submission, report: &mut ValidationReport) {
    if !document.claim_type.is_present() {
        // Legacy documents predate claim_type and always shipped custom code.
        if !document.code_url.is_truthy() {
            report.push(
                ValidationIssue::error(
                    IssueKind::FieldMissing,
                    "code_url is required (or specify claim_type as 'pip_libraries' if using standard libraries)",
                )
                .with_field(keys::CODE_URL)
                .with_suggestion("Add claim_type: custom_code or claim_type: pip_libraries"),
            );
        }
        return;
    }

    let parsed = document
        .claim_type
        .as_text()
        .and_then(|text| text.parse::<ClaimType>().ok());

    match parsed {
        Some(claim_type) => {
            if claim_type.requires_code_url() && !document.code_url.is_truthy() {
                report.push(
                    ValidationIssue::error(
                        IssueKind::FieldMissing,
                        "code_url is required for custom_code claim type",
                    )
                    .with_field(keys::CODE_URL),
                );
            }
        }
        None => report.push(
            ValidationIssue::error(
                IssueKind::FieldInvalid,
                "claim_type must be either 'custom_code' or 'pip_libraries'",
            )
            .with_field(keys::CLAIM_TYPE),
        ),
    }
}

fn check_paper_title(document: &Submission, report: &mut ValidationReport) {
    let title = &document.paper_title;
    if !title.is_present() {
        return;
    }
    if !matches!(title, Field::Text(s) if !s.trim().is_empty()) {
        report.push(
            ValidationIssue::error(
                IssueKind::FieldInvalid,
                "Paper title must be a non-empty string",
            )
            .with_field(keys::PAPER_TITLE),
        );
    }
}

fn check_urls(document: &Submission, report: &mut ValidationReport) {
    for (name, value) in document.url_fields() {
        if !value.is_truthy() {
            continue;
        }
        let is_http = value
            .as_text()
            .map(|url| {
                let url = url.trim();
                url.starts_with("http://") || url.starts_with("https://")
            })
            .unwrap_or(false);

        if !is_http {
            report.push(
                ValidationIssue::error(
                    IssueKind::FieldInvalid,
                    format!(
                        "{} must be a valid URL starting with http:// or https://",
                        name
                    ),
                )
                .with_field(name),
            );
        }
    }
}

fn check_identifier(document: &Submission, report: &mut ValidationReport) {
    // Any non-blank value is accepted, structured identifiers included.
    if document.identifier.is_present() && document.identifier.is_blank() {
        report.push(
            ValidationIssue::error(IssueKind::FieldEmpty, "Identifier cannot be empty")
                .with_field(keys::IDENTIFIER),
        );
    }
}

fn check_claims(document: &Submission, report: &mut ValidationReport) {
    let claim_error = |message: String| {
        ValidationIssue::error(IssueKind::ClaimStructure, message).with_field(keys::CLAIMS)
    };

    let entries = match &document.claims {
        Listing::Absent => return,
        Listing::NotAList(_) => {
            report.push(claim_error("Claims must be a list".to_string()));
            return;
        }
        Listing::Items(entries) => entries,
    };

    if entries.is_empty() {
        report.push(claim_error("At least one claim is required".to_string()));
        return;
    }

    for (index, entry) in entries.iter().enumerate() {
        let number = index + 1;
        match entry {
            ClaimEntry::NotAMapping => {
                report.push(claim_error(format!("Claim {} must be a mapping", number)));
            }
            ClaimEntry::Claim(claim) => {
                for message in claim_problems(claim, number) {
                    report.push(claim_error(message));
                }
            }
        }
    }
}

fn claim_problems(claim: &Claim, number: usize) -> Vec<String> {
    let mut problems = Vec::new();

    let has_text = match &claim.claim {
        Field::Text(s) => !s.trim().is_empty(),
        Field::Other(_) => true,
        _ => false,
    };
    if !has_text {
        problems.push(format!(
            "Claim {} must have a non-empty 'claim' field",
            number
        ));
    }

    match &claim.instruction {
        Listing::Absent => problems.push(format!(
            "Claim {} must have an 'instruction' field",
            number
        )),
        Listing::NotAList(_) => problems.push(format!(
            "Claim {} 'instruction' field must be a list of strings",
            number
        )),
        Listing::Items(steps) if steps.is_empty() => problems.push(format!(
            "Claim {} 'instruction' list cannot be empty",
            number
        )),
        Listing::Items(steps) => {
            for (step_index, step) in steps.iter().enumerate() {
                if !matches!(step, Field::Text(s) if !s.trim().is_empty()) {
                    problems.push(format!(
                        "Claim {} instruction step {} must be a non-empty string",
                        number,
                        step_index + 1
                    ));
                }
            }
        }
    }

    problems
}

fn check_non_reproducible_claims(document: &Submission, report: &mut ValidationReport) {
    let warning = |message: String| {
        ValidationIssue::warning(IssueKind::ClaimStructure, message)
            .with_field(keys::NON_REPRODUCIBLE_CLAIMS)
    };

    let entries = match &document.non_reproducible_claims {
        Listing::Absent => return,
        Listing::NotAList(_) => {
            report.push(warning(
                "non_reproducible_claims should be a list".to_string(),
            ));
            return;
        }
        Listing::Items(entries) => entries,
    };

    for (index, entry) in entries.iter().enumerate() {
        let number = index + 1;
        match entry {
            NonReproducibleEntry::NotAMapping => {
                report.push(warning(format!(
                    "Non-reproducible claim {} should be a mapping with 'claim' and 'reason'",
                    number
                )));
            }
            NonReproducibleEntry::Claim(claim) => {
                let has_reason = claim
                    .reason
                    .as_text()
                    .map(|r| !r.trim().is_empty())
                    .unwrap_or(false);
                if !has_reason {
                    report.push(
                        warning(format!(
                            "Non-reproducible claim {} has no 'reason'",
                            number
                        ))
                        .with_suggestion("Explain why the claim cannot be reproduced"),
                    );
                }
            }
        }
    }
}
