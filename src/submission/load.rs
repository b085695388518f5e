//! Reading submission files from disk.

use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::Submission;

/// Failures that stop a submission from being read at all.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Invalid file extension: {extension}. Must be .json, .yaml, or .yml")]
    UnsupportedExtension { extension: String },

    #[error("Invalid {format} format: {message}")]
    Parse {
        format: DocumentFormat,
        message: String,
    },

    #[error("Data must be a JSON/YAML object (mapping)")]
    NotAMapping,

    #[error("Error reading file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize submission as {format}: {message}")]
    Serialize {
        format: DocumentFormat,
        message: String,
    },
}

/// On-disk encoding of a submission, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, SubmissionError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            _ => Err(SubmissionError::UnsupportedExtension {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{}", extension)
                },
            }),
        }
    }

    /// Whether a path carries one of the submission extensions.
    pub fn is_submission_path(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }

    /// Parse document text into a generic value.
    pub fn parse(&self, content: &str) -> Result<Value, SubmissionError> {
        match self {
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| SubmissionError::Parse {
                    format: *self,
                    message: e.to_string(),
                })
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| SubmissionError::Parse {
                    format: *self,
                    message: e.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "JSON"),
            DocumentFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// Load and classify a submission file.
///
/// Checks run in order: existence, extension, read, parse, top-level shape.
pub fn load_document(path: &Path) -> Result<Submission, SubmissionError> {
    if !path.exists() {
        return Err(SubmissionError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = DocumentFormat::from_path(path)?;

    let content = fs::read_to_string(path).map_err(|source| SubmissionError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value = format.parse(&content)?;
    Submission::from_value(value)
}
