//! Implementation of the `gls generate` command.
//!
//! For every selected user: fetch timelogs, build the board/label index,
//! aggregate, and write the Markdown report. The report directory is then
//! archived.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use gls_core::{ClassificationIndex, ExclusionSet, aggregate};
use gls_gitlab::{Client, GraphqlTransport, fetch_taxonomy, fetch_timelogs};

use super::{Outcome, archive};
use crate::Config;
use crate::report::{self, ReportHeader};

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub project: String,
    pub users: Vec<String>,
    pub archive: bool,
}

impl GenerateRequest {
    /// Resolves CLI arguments against configured defaults.
    pub fn resolve(
        config: &Config,
        start: NaiveDate,
        end: NaiveDate,
        project: Option<String>,
        users: Vec<String>,
        archive: bool,
    ) -> Result<Self> {
        if start > end {
            anyhow::bail!("start date {start} is after end date {end}");
        }
        let Some(project) = project.or_else(|| config.project.clone()) else {
            anyhow::bail!("no project given (use --project or set project in the config)");
        };
        let users = if users.is_empty() {
            config.users.clone()
        } else {
            users
        };
        if users.is_empty() {
            anyhow::bail!("no user selected (use --user or set users in the config)");
        }

        Ok(Self {
            start,
            end,
            project,
            users,
            archive,
        })
    }
}

/// What a batch produced.
#[derive(Debug, Default)]
pub struct GenerateSummary {
    pub written: Vec<(String, PathBuf)>,
    pub failed: Vec<(String, String)>,
    pub archive: Option<Outcome>,
}

/// Fetches, aggregates and renders the synthesis of one user.
pub async fn synthesize_user<T: GraphqlTransport>(
    transport: &T,
    request: &GenerateRequest,
    user: &str,
    excluded: &ExclusionSet,
    report_dir: &Path,
    generated_on: NaiveDate,
) -> Result<PathBuf> {
    let logs = fetch_timelogs(transport, user, request.start, request.end)
        .await
        .with_context(|| format!("failed to fetch timelogs for {user}"))?;
    let taxonomy = fetch_taxonomy(transport, &request.project)
        .await
        .with_context(|| format!("failed to fetch boards of {}", request.project))?;

    let index = aggregate(&logs, ClassificationIndex::build(taxonomy), excluded);

    let header = ReportHeader {
        user,
        start: request.start,
        end: request.end,
    };
    report::write_report(report_dir, &header, &index, generated_on)
}

/// Runs the generate command.
///
/// A failing user is logged and recorded; the remaining users still run.
pub fn run(config: &Config, request: &GenerateRequest) -> Result<GenerateSummary> {
    let client = Client::new(&config.client_config()?).context("failed to create GitLab client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let excluded = config.exclusion_set();
    let generated_on = Local::now().date_naive();
    let total = request.users.len();
    let mut summary = GenerateSummary::default();

    for (i, user) in request.users.iter().enumerate() {
        eprintln!("[{}/{total}] Generating synthesis for {user}...", i + 1);
        let result = runtime.block_on(synthesize_user(
            &client,
            request,
            user,
            &excluded,
            &config.report_dir,
            generated_on,
        ));
        match result {
            Ok(path) => {
                tracing::info!(user = %user, path = %path.display(), "wrote synthesis");
                summary.written.push((user.clone(), path));
            }
            Err(err) => {
                tracing::error!(user = %user, error = %format!("{err:#}"), "synthesis failed");
                summary.failed.push((user.clone(), format!("{err:#}")));
            }
        }
    }

    if request.archive {
        eprintln!("Compressing reports...");
        summary.archive = Some(archive::run(
            &config.report_dir,
            &config.archive_dir,
            request.start,
            request.end,
        ));
    }

    Ok(summary)
}
