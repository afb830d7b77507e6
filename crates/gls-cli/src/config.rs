//! Configuration loading and management.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use gls_core::ExclusionSet;
use gls_gitlab::ClientConfig;

/// Default request timeout for API calls, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Keys taken verbatim from the environment, never parsed as numbers or booleans.
const STRING_KEYS: [&str; 4] = ["gitlab_url", "token", "exclude_labels", "project"];

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitLab instance base URL.
    pub gitlab_url: Option<String>,

    /// Static bearer token for the GraphQL API.
    pub token: Option<String>,

    /// Comma-separated label titles that never receive time.
    pub exclude_labels: Option<String>,

    /// Default project path (`group/subgroup/project`).
    pub project: Option<String>,

    /// Default users to generate syntheses for.
    #[serde(default)]
    pub users: Vec<String>,

    /// Directory receiving one Markdown report per user.
    pub report_dir: PathBuf,

    /// Directory receiving the packaged archive.
    pub archive_dir: PathBuf,

    /// Per-request timeout; 0 disables it.
    pub timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gitlab_url", &self.gitlab_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("exclude_labels", &self.exclude_labels)
            .field("project", &self.project)
            .field("users", &self.users)
            .field("report_dir", &self.report_dir)
            .field("archive_dir", &self.archive_dir)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gitlab_url: None,
            token: None,
            exclude_labels: None,
            project: None,
            users: Vec::new(),
            report_dir: PathBuf::from("fiches_de_synthese"),
            archive_dir: PathBuf::from("."),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (GLS_*), then the unprefixed names
        figment = figment
            .merge(Env::prefixed("GLS_").ignore(&STRING_KEYS))
            .merge(verbatim(&Env::prefixed("GLS_").only(&STRING_KEYS)))
            .merge(verbatim(&legacy_env()));

        figment.extract()
    }

    /// Label titles excluded from attribution.
    pub fn exclusion_set(&self) -> ExclusionSet {
        self.exclude_labels
            .as_deref()
            .map(ExclusionSet::from_csv)
            .unwrap_or_default()
    }

    /// Connection settings for the GitLab client.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let Some(base_url) = self.gitlab_url.clone() else {
            anyhow::bail!("GitLab URL is not configured (set GITLAB_URL or gitlab_url)");
        };
        let Some(token) = self.token.clone() else {
            anyhow::bail!("GitLab token is not configured (set GRAPHQL_TOKEN or token)");
        };
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));

        Ok(ClientConfig {
            base_url,
            token,
            timeout,
        })
    }
}

/// `GITLAB_URL`, `GRAPHQL_TOKEN` and `EXCLUDE_LABEL`, mapped onto config keys.
fn legacy_env() -> Env {
    Env::raw()
        .only(&["GITLAB_URL", "GRAPHQL_TOKEN", "EXCLUDE_LABEL"])
        .map(|key| {
            if key == "GRAPHQL_TOKEN" {
                "token".into()
            } else if key == "EXCLUDE_LABEL" {
                "exclude_labels".into()
            } else {
                "gitlab_url".into()
            }
        })
}

/// Raw string values of `env`, so a label `2024` or an all-digit token stays a string.
fn verbatim(env: &Env) -> Serialized<BTreeMap<String, String>> {
    let values = env
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
        .collect();
    Serialized::defaults(values)
}

/// Returns the platform-specific config directory for gls.
///
/// On Linux: `~/.config/gls`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gls"))
}
