//! Default values and configuration structs with default implementations.

use serde::{Deserialize, Serialize};

use crate::submission::keys;
use crate::validator::DEFAULT_MAX_USERNAME_LENGTH;

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(
    default_required_fields,
    Vec<String>,
    keys::DEFAULT_REQUIRED.iter().map(|s| s.to_string()).collect()
);
default_fn!(default_max_username_length, usize, DEFAULT_MAX_USERNAME_LENGTH);
default_fn!(
    default_preserved_files,
    Vec<String>,
    vec![
        "example_submission_in.json".to_string(),
        "we_also_accept_submission_in.yaml".to_string(),
    ]
);
default_fn!(
    default_example_marker,
    String,
    "example_submission".to_string()
);
default_fn!(default_ignored_files, Vec<String>, vec![".gitkeep".to_string()]);

// =========================================================================
// CONFIG STRUCTS WITH DEFAULTS
// =========================================================================

/// Rules applied by `reprokit validate`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Top-level fields that must be present and non-blank
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,
    /// Longest accepted username (default: 39, GitHub's limit)
    #[serde(default = "default_max_username_length")]
    pub max_username_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_fields: default_required_fields(),
            max_username_length: default_max_username_length(),
        }
    }
}

/// Rules applied by `reprokit organize`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrganizeConfig {
    /// Exact file names that are never relocated
    #[serde(default = "default_preserved_files")]
    pub preserved_files: Vec<String>,
    /// Files whose stem contains this marker (case-insensitive) are never relocated
    #[serde(default = "default_example_marker")]
    pub example_marker: String,
    /// Placeholder files skipped without a message
    #[serde(default = "default_ignored_files")]
    pub ignored_files: Vec<String>,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            preserved_files: default_preserved_files(),
            example_marker: default_example_marker(),
            ignored_files: default_ignored_files(),
        }
    }
}
