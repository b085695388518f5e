use anyhow::Result;
use clap::Parser;

mod cli;
mod cmd;

use cli::{Cli, Commands, OutputFormat};
use cmd::ui::{Output, OutputMode};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        match cli.format {
            OutputFormat::Text => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
        }
    };
    let out = Output::new(mode);

    let ok = match cli.command {
        Commands::Validate { path, fields } => cmd::validate::cmd_validate(&out, &path, fields)?,
        Commands::Organize {
            source,
            target,
            dry_run,
        } => cmd::organize::cmd_organize(&out, &source, &target, dry_run)?,
        Commands::New {
            username,
            title,
            pdf,
            identifier,
            claim_type,
            code_url,
            data_url,
            claim,
            context,
            steps,
            yaml: _,
            json,
            dir,
        } => {
            let args = cmd::new::NewArgs {
                username,
                paper_title: title,
                paper_pdf: pdf,
                identifier,
                claim_type,
                code_url,
                data_url,
                claim,
                context,
                steps,
            };
            cmd::new::cmd_new(&out, args, json, &dir)?;
            true
        }
        Commands::Completion { shell } => {
            cmd::util::cmd_completion(shell)?;
            true
        }
        Commands::Version { verbose } => {
            cmd::util::cmd_version(verbose)?;
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
