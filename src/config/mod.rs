//! Configuration management for reprokit.
//!
//! Configuration lives in markdown files with YAML frontmatter. Both files are
//! optional; anything left unset falls back to the built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::PROJECT_CONFIG;

pub mod defaults;
pub mod validation;

pub use defaults::*;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub organize: OrganizeConfig,
}

impl Config {
    /// Load configuration with full merge semantics.
    /// Merge order (later overrides earlier):
    /// 1. Global config (~/.config/reprokit/config.md)
    /// 2. Project config (.reprokit/config.md)
    pub fn load() -> Result<Self> {
        Self::load_merged_from(global_config_path().as_deref(), Path::new(PROJECT_CONFIG))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        let config: Config = if frontmatter.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load merged configuration from the given global and project config paths.
    /// Missing files contribute nothing.
    pub fn load_merged_from(global_path: Option<&Path>, project_path: &Path) -> Result<Self> {
        let global_config = global_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project_config = Some(project_path)
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let config = global_config.merge_with(project_config);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.validation.validate()?;
        self.organize.validate()
    }
}

/// Returns the path to the global config file at ~/.config/reprokit/config.md
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/reprokit/config.md"))
}

/// Split a document into its `---` delimited YAML frontmatter and the body.
pub fn split_frontmatter(content: &str) -> (Option<String>, &str) {
    let content = content.trim();

    if !content.starts_with("---") {
        return (None, content);
    }

    let rest = &content[3..];
    if let Some(end) = rest.find("---") {
        let frontmatter = rest[..end].to_string();
        let body = rest[end + 3..].trim_start();
        (Some(frontmatter), body)
    } else {
        (None, content)
    }
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    pub validation: Option<PartialValidationConfig>,
    pub organize: Option<PartialOrganizeConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialValidationConfig {
    pub required_fields: Option<Vec<String>>,
    pub max_username_length: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialOrganizeConfig {
    pub preserved_files: Option<Vec<String>>,
    pub example_marker: Option<String>,
    pub ignored_files: Option<Vec<String>>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        if frontmatter.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")
    }

    /// Merge this global config with a project config, returning the merged result.
    /// Values from the project config take precedence over global.
    fn merge_with(self, project: PartialConfig) -> Config {
        let global_validation = self.validation.unwrap_or_default();
        let global_organize = self.organize.unwrap_or_default();
        let project_validation = project.validation.unwrap_or_default();
        let project_organize = project.organize.unwrap_or_default();

        Config {
            validation: ValidationConfig {
                // Project value > global value > default
                required_fields: project_validation
                    .required_fields
                    .or(global_validation.required_fields)
                    .unwrap_or_else(defaults::default_required_fields),
                max_username_length: project_validation
                    .max_username_length
                    .or(global_validation.max_username_length)
                    .unwrap_or_else(defaults::default_max_username_length),
            },
            organize: OrganizeConfig {
                preserved_files: project_organize
                    .preserved_files
                    .or(global_organize.preserved_files)
                    .unwrap_or_else(defaults::default_preserved_files),
                example_marker: project_organize
                    .example_marker
                    .or(global_organize.example_marker)
                    .unwrap_or_else(defaults::default_example_marker),
                ignored_files: project_organize
                    .ignored_files
                    .or(global_organize.ignored_files)
                    .unwrap_or_else(defaults::default_ignored_files),
            },
        }
    }
}
