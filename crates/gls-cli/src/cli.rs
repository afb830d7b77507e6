//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// GitLab label synthesis.
///
/// Summarises the time users logged on a GitLab project, grouped by the
/// labels of each project board, into one Markdown report per user.
#[derive(Debug, Parser)]
#[command(name = "gls", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate one synthesis report per user, then archive them.
    Generate {
        /// First day of the period (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the period, inclusive (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,

        /// Project path (e.g. group/subgroup/project).
        #[arg(long)]
        project: Option<String>,

        /// GitLab username; repeat for several users.
        #[arg(short, long = "user")]
        users: Vec<String>,

        /// Skip packaging the report directory afterwards.
        #[arg(long)]
        no_archive: bool,

        /// Empty the report directory before generating.
        #[arg(long)]
        clean: bool,
    },

    /// Package the report directory into a compressed archive.
    Archive {
        /// First day of the period (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the period, inclusive (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,
    },

    /// Delete every report from the report directory.
    Clean,
}
