//! CLI-specific UI output modules

pub mod output;

// Re-export commonly used items for convenience
pub use output::{Output, OutputMode};
