//! HTTP transport for the GitLab GraphQL endpoint.

use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::{GitlabError, GraphqlRequest, GraphqlTransport, decode_response};

const GRAPHQL_PATH: &str = "/api/graphql";

/// Connection settings for one GitLab instance.
#[derive(Clone)]
pub struct ClientConfig {
    /// Instance base URL, e.g. `https://gitlab.example.com`.
    pub base_url: String,
    /// Static bearer token.
    pub token: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// GitLab GraphQL client.
///
/// Certificate validation is disabled.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the configured instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or token is empty, or if the HTTP
    /// client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, GitlabError> {
        let base_url = config.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(GitlabError::InvalidConfig {
                reason: "GitLab URL cannot be empty",
            });
        }
        let token = config.token.trim();
        if token.is_empty() {
            return Err(GitlabError::InvalidConfig {
                reason: "token cannot be empty",
            });
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            GitlabError::InvalidConfig {
                reason: "token contains invalid header characters",
            }
        })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(GitlabError::ClientBuild)?;

        Ok(Self {
            http,
            endpoint: format!("{base_url}{GRAPHQL_PATH}"),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GraphqlTransport for Client {
    async fn execute<T: DeserializeOwned>(&self, request: &GraphqlRequest) -> Result<T, GitlabError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, endpoint = %self.endpoint, "GitLab request failed");
            return Err(GitlabError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        decode_response(&body)
    }
}
