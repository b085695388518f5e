//! CLI argument definitions for reprokit.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use std::str::FromStr;

use reprokit::submission::ClaimType;

#[derive(Parser)]
#[command(name = "reprokit")]
#[command(version)]
#[command(about = "Validate and organize paper reproducibility submissions", long_about = None)]
#[command(
    after_help = "GETTING STARTED:\n    reprokit new                          Write a submission interactively\n    reprokit validate submissions/        Check every submission in a directory\n    reprokit organize incoming/ users/    File submissions per contributor"
)]
pub struct Cli {
    /// Suppress all non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a submission file, or every submission under a directory
    ///
    /// Trailing field names replace the configured list of required fields.
    Validate {
        /// Submission file or directory
        path: PathBuf,
        /// Required fields to check instead of the configured ones
        #[arg(value_name = "FIELD")]
        fields: Vec<String>,
    },
    /// Move submissions into per-user directories
    Organize {
        /// Directory holding incoming submissions
        source: PathBuf,
        /// Directory receiving one subdirectory per username
        target: PathBuf,
        /// Show where files would go without moving anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Write a new submission file
    ///
    /// Missing values are prompted for when running in a terminal.
    New {
        /// Contributor username
        #[arg(long)]
        username: Option<String>,
        /// Paper title
        #[arg(long)]
        title: Option<String>,
        /// Link to the paper PDF
        #[arg(long, value_name = "URL")]
        pdf: Option<String>,
        /// Paper identifier, e.g. a DOI or arXiv id
        #[arg(long)]
        identifier: Option<String>,
        /// How the claims are reproduced (custom_code or pip_libraries)
        #[arg(long, value_parser = parse_claim_type)]
        claim_type: Option<ClaimType>,
        /// Link to the code repository
        #[arg(long, value_name = "URL")]
        code_url: Option<String>,
        /// Link to the data
        #[arg(long, value_name = "URL")]
        data_url: Option<String>,
        /// Text of the claim being reproduced
        #[arg(long)]
        claim: Option<String>,
        /// Context for the claim
        #[arg(long)]
        context: Option<String>,
        /// Reproduction step (can be specified multiple times)
        #[arg(long = "step", value_name = "TEXT")]
        steps: Vec<String>,
        /// Write YAML (default)
        #[arg(long, conflicts_with = "json")]
        yaml: bool,
        /// Write JSON
        #[arg(long)]
        json: bool,
        /// Directory to write the submission into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Generate shell completion scripts
    Completion {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version information
    Version {
        /// Show build details
        #[arg(long, short)]
        verbose: bool,
    },
}

fn parse_claim_type(value: &str) -> Result<ClaimType, String> {
    ClaimType::from_str(value)
}
