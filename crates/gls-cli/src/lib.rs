//! GitLab label synthesis CLI library.
//!
//! This crate provides the CLI interface, configuration and report rendering.

mod cli;
pub mod commands;
mod config;
pub mod report;

pub use cli::{Cli, Commands};
pub use config::Config;
