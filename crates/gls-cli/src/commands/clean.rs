//! Implementation of the `gls clean` command.
//!
//! Removes every regular file from the report directory, leaving
//! subdirectories alone.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::Outcome;

/// Runs the clean command.
pub fn run(report_dir: &Path) -> Outcome {
    match clean_reports(report_dir) {
        Ok(0) => Outcome::success(format!(
            "{} was already empty",
            report_dir.display()
        )),
        Ok(removed) => Outcome::success(format!(
            "removed {removed} files from {}",
            report_dir.display()
        )),
        Err(err) => Outcome::failure(format!("failed to clean report directory: {err:#}")),
    }
}

/// Deletes the files of `report_dir`, creating it when absent.
fn clean_reports(report_dir: &Path) -> Result<usize> {
    if !report_dir.exists() {
        fs::create_dir_all(report_dir)
            .with_context(|| format!("failed to create {}", report_dir.display()))?;
        return Ok(0);
    }

    let mut removed = 0;
    let entries = fs::read_dir(report_dir)
        .with_context(|| format!("failed to read {}", report_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            removed += 1;
        }
    }

    tracing::info!(removed, dir = %report_dir.display(), "cleaned report directory");
    Ok(removed)
}
