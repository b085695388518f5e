//! Typed submission records used when writing new documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DocumentFormat, Submission, SubmissionError};

/// How a claim is reproduced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    /// Reproduction needs the authors' own code (`code_url` required)
    #[default]
    CustomCode,
    /// Reproduction needs only pip-installable libraries
    PipLibraries,
}

impl ClaimType {
    pub const ALL: [ClaimType; 2] = [ClaimType::CustomCode, ClaimType::PipLibraries];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::CustomCode => "custom_code",
            ClaimType::PipLibraries => "pip_libraries",
        }
    }

    pub fn requires_code_url(&self) -> bool {
        matches!(self, ClaimType::CustomCode)
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "custom_code" => Ok(ClaimType::CustomCode),
            "pip_libraries" => Ok(ClaimType::PipLibraries),
            other => Err(format!(
                "Unknown claim type '{}'. Use 'custom_code' or 'pip_libraries'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimRecord {
    pub claim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub instruction: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NonReproducibleClaimRecord {
    pub claim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A complete submission in canonical key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionRecord {
    pub username: String,
    pub paper_title: String,
    pub paper_pdf: String,
    pub identifier: String,
    pub claim_type: ClaimType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    pub claims: Vec<ClaimRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_reproducible_claims: Vec<NonReproducibleClaimRecord>,
}

impl SubmissionRecord {
    /// Serialize the record in the given format.
    pub fn render(&self, format: DocumentFormat) -> Result<String, SubmissionError> {
        let rendered = match format {
            DocumentFormat::Json => serde_json::to_string_pretty(self)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::to_string(self).map_err(|e| e.to_string()),
        };

        rendered.map_err(|message| SubmissionError::Serialize { format, message })
    }

    /// View the record as a classified submission, for validation before writing.
    pub fn to_submission(&self) -> Result<Submission, SubmissionError> {
        let value = serde_json::to_value(self).map_err(|e| SubmissionError::Serialize {
            format: DocumentFormat::Json,
            message: e.to_string(),
        })?;
        Submission::from_value(value)
    }

    /// File name for a new submission: `YYYYMMDD_HHMMSS_<username>.<ext>` in UTC.
    pub fn file_name(&self, format: DocumentFormat, created_at: DateTime<Utc>) -> String {
        format!(
            "{}_{}.{}",
            created_at.format("%Y%m%d_%H%M%S"),
            self.username.trim(),
            format.extension()
        )
    }
}
