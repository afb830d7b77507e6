use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gls_cli::commands::generate::GenerateRequest;
use gls_cli::commands::{Outcome, archive, clean, generate};
use gls_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Prints a collaborator outcome, turning a failure into the exit status.
fn finish(outcome: Outcome) -> Result<()> {
    if outcome.success {
        eprintln!("{}", outcome.message);
        Ok(())
    } else {
        Err(anyhow::anyhow!(outcome.message))
    }
}

fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Some(Commands::Generate {
            start,
            end,
            project,
            users,
            no_archive,
            clean: clean_first,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let request = GenerateRequest::resolve(&config, start, end, project, users, !no_archive)?;

            if clean_first {
                finish(clean::run(&config.report_dir))?;
            }

            let summary = generate::run(&config, &request)?;
            for (user, path) in &summary.written {
                eprintln!("{user}: {}", path.display());
            }
            for (user, error) in &summary.failed {
                eprintln!("{user}: {error}");
            }
            if let Some(outcome) = summary.archive {
                finish(outcome)?;
            }
            if !summary.failed.is_empty() {
                anyhow::bail!(
                    "{} of {} syntheses failed",
                    summary.failed.len(),
                    request.users.len()
                );
            }
        }
        Some(Commands::Archive { start, end }) => {
            let config = load_config(cli.config.as_deref())?;
            finish(archive::run(&config.report_dir, &config.archive_dir, start, end))?;
        }
        Some(Commands::Clean) => {
            let config = load_config(cli.config.as_deref())?;
            finish(clean::run(&config.report_dir))?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
