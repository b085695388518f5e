//! # reprokit - reproducibility submission tooling
//!
//! Contributors document the reproducibility of published papers by writing
//! small JSON or YAML submissions: who they are, which paper, and for each
//! claim the steps that reproduce it. reprokit checks those submissions and
//! files them away per contributor.
//!
//! ## Modules
//!
//! - [`submission`] - Loading documents and classifying their fields
//! - [`validator`] - Required-field and structural checks
//! - [`organizer`] - Moving submissions into per-user directories
//! - [`config`] - Configuration loading and merging
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use reprokit::validator::Validator;
//!
//! let report = Validator::new().validate_file(Path::new("submissions/alice.yaml"));
//! for message in report.error_messages() {
//!     println!("error: {}", message);
//! }
//! assert!(report.is_valid());
//! ```

pub mod config;
pub mod organizer;
pub mod submission;
pub mod validator;

/// Default path constants for reprokit.
pub mod paths {
    /// Directory holding project configuration: `.reprokit`
    pub const CONFIG_DIR: &str = ".reprokit";
    /// Project configuration file: `.reprokit/config.md`
    pub const PROJECT_CONFIG: &str = ".reprokit/config.md";
}
