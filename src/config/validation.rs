//! Sanity checks for loaded configuration.

use anyhow::Result;

use super::defaults::{OrganizeConfig, ValidationConfig};

impl ValidationConfig {
    /// Validate submission rule configuration
    pub fn validate(&self) -> Result<()> {
        if self.required_fields.is_empty() {
            anyhow::bail!("validation.required_fields must name at least one field");
        }

        if let Some(blank) = self.required_fields.iter().find(|f| f.trim().is_empty()) {
            anyhow::bail!(
                "validation.required_fields contains a blank field name: {:?}",
                blank
            );
        }

        if self.max_username_length == 0 {
            anyhow::bail!("validation.max_username_length must be greater than 0");
        }

        Ok(())
    }
}

impl OrganizeConfig {
    /// Validate organizer configuration
    pub fn validate(&self) -> Result<()> {
        // An empty marker would match every file name
        if self.example_marker.trim().is_empty() {
            anyhow::bail!("organize.example_marker cannot be empty");
        }

        Ok(())
    }
}
