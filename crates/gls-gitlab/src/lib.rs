//! GitLab GraphQL integration for label synthesis.
//!
//! Provides:
//! - An HTTP client bound to one GitLab instance and bearer token
//! - Board/label taxonomy queries for a project
//! - Windowed timelog queries for a user

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

mod client;
mod taxonomy;
mod timelogs;
mod wire;

#[cfg(test)]
mod fake;

pub use client::{Client, ClientConfig};
pub use taxonomy::{fetch_board_labels, fetch_boards, fetch_taxonomy};
pub use timelogs::{fetch_timelogs, fetch_window};

/// GitLab client errors.
#[derive(Debug, Error)]
pub enum GitlabError {
    /// The client configuration was unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("GitLab API returned status {status}")]
    Status { status: u16 },
    /// The response carried GraphQL errors and no data.
    #[error("GraphQL error: {message}")]
    Graphql { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The project path did not resolve.
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    /// The board id did not resolve within the project.
    #[error("board not found: {0}")]
    BoardNotFound(String),
}

/// A GraphQL query with its variables.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: &'static str,
    pub variables: serde_json::Value,
}

/// Something that can run a GraphQL request and decode its `data` payload.
///
/// [`Client`] talks to GitLab; tests substitute canned responses.
pub trait GraphqlTransport {
    fn execute<T: DeserializeOwned>(
        &self,
        request: &GraphqlRequest,
    ) -> impl Future<Output = Result<T, GitlabError>>;
}

/// Decodes a GraphQL response body into its `data` payload.
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T, GitlabError> {
    let envelope: wire::Envelope<T> =
        serde_json::from_str(body).map_err(|err| GitlabError::InvalidResponse(err.to_string()))?;

    match (envelope.data, envelope.errors) {
        (Some(data), _) => Ok(data),
        (None, Some(errors)) if !errors.is_empty() => Err(GitlabError::Graphql {
            message: errors
                .into_iter()
                .map(|error| error.message)
                .collect::<Vec<_>>()
                .join("; "),
        }),
        (None, _) => Err(GitlabError::InvalidResponse("missing data".to_string())),
    }
}
