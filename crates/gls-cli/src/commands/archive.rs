//! Implementation of the `gls archive` command.
//!
//! Packages every report of the report directory into one gzip-compressed
//! tarball named after the requested period.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::NamedTempFile;

use super::Outcome;

/// `syntheses_<start>_<end>.tar.gz`
pub fn archive_name(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "syntheses_{}_{}.tar.gz",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// Runs the archive command.
pub fn run(report_dir: &Path, archive_dir: &Path, start: NaiveDate, end: NaiveDate) -> Outcome {
    match archive_reports(report_dir, archive_dir, start, end) {
        Ok((path, count)) => Outcome::success(format!(
            "archived {count} files into {}",
            path.display()
        )),
        Err(err) => Outcome::failure(format!("failed to archive reports: {err:#}")),
    }
}

/// Regular files of `dir`, sorted by name.
fn report_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Writes `files` into a temporary file of `archive_dir`, renamed to `path`
/// once complete. On error any earlier archive at `path` is left as it was.
fn write_archive(archive_dir: &Path, path: &Path, files: &[PathBuf]) -> Result<()> {
    let temp = NamedTempFile::new_in(archive_dir).with_context(|| {
        format!("failed to create a temporary file in {}", archive_dir.display())
    })?;

    let mut builder = tar::Builder::new(GzEncoder::new(temp, Compression::default()));
    for report in files {
        let Some(name) = report.file_name() else {
            continue;
        };
        builder
            .append_path_with_name(report, name)
            .with_context(|| format!("failed to add {}", report.display()))?;
    }
    let temp = builder
        .into_inner()
        .and_then(GzEncoder::finish)
        .with_context(|| format!("failed to finish {}", path.display()))?;
    temp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn archive_reports(
    report_dir: &Path,
    archive_dir: &Path,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(PathBuf, usize)> {
    if !report_dir.is_dir() {
        anyhow::bail!("report directory {} does not exist", report_dir.display());
    }
    let files = report_files(report_dir)?;
    if files.is_empty() {
        anyhow::bail!("no reports to archive in {}", report_dir.display());
    }

    fs::create_dir_all(archive_dir)
        .with_context(|| format!("failed to create {}", archive_dir.display()))?;
    let path = archive_dir.join(archive_name(start, end));
    write_archive(archive_dir, &path, &files)?;

    tracing::info!(files = files.len(), archive = %path.display(), "archived reports");
    Ok((path, files.len()))
}
