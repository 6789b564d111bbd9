//! Migration configuration loading.
//!
//! The configuration names the source and destination repositories, the
//! per-actor API tokens and, for resume runs, the point to resume from.

mod error;

pub use error::ConfigError;

use crate::context::DEFAULT_PULL_REQUEST_MARKER;
use crate::credentials::CredentialPool;
use crate::tracker::{GitHubTrackerOptions, RepositoryRef};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Where a resume run picks up after an interrupted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResumePoint {
    /// Issue page to start fetching from.
    pub start_page: u32,

    /// Highest source issue number already migrated; issues at or below it
    /// are skipped.
    pub retry_threshold: u64,
}

/// Where an actor's token comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenSource {
    /// Token written directly in the configuration.
    Literal(String),

    /// Token read from an environment variable.
    Env { env: String },
}

impl TokenSource {
    fn resolve(&self, actor: &str) -> Result<String, ConfigError> {
        match self {
            Self::Literal(token) => Ok(token.clone()),
            Self::Env { env } => std::env::var(env).map_err(|_| ConfigError::MissingEnv {
                actor: actor.to_string(),
                variable: env.clone(),
            }),
        }
    }
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_pull_request_marker() -> String {
    DEFAULT_PULL_REQUEST_MARKER.to_string()
}

fn default_respect_rate_limit() -> bool {
    true
}

/// Parsed contents of a migration configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MigrationConfig {
    /// Repository issues are read from.
    pub source: RepositoryRef,

    /// Repository issues are replayed into.
    pub destination: RepositoryRef,

    /// Actor whose credential is used when an author has none.
    pub default_actor: String,

    /// Token per actor login.
    pub credentials: BTreeMap<String, TokenSource>,

    /// Timeout for every request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory for raw response snapshots; `None` disables them.
    #[serde(default)]
    pub archive_dir: Option<PathBuf>,

    /// API base URL, for GitHub Enterprise.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Suffix appended to titles of former pull requests.
    #[serde(default = "default_pull_request_marker")]
    pub pull_request_marker: String,

    /// Whether to wait for rate-limit resets before writes.
    #[serde(default = "default_respect_rate_limit")]
    pub respect_rate_limit: bool,

    /// Resume point for resume runs.
    #[serde(default)]
    pub resume: Option<ResumePoint>,
}

impl MigrationConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading configuration");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Parses and validates configuration content; `path` is used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the content is not valid TOML or fails
    /// validation.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        config.validate(path)?;
        debug!(
            source = %config.source,
            destination = %config.destination,
            actors = config.credentials.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validates the configuration.
    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        for (role, repo) in [("source", &self.source), ("destination", &self.destination)] {
            if repo.owner.trim().is_empty() || repo.name.trim().is_empty() {
                return Err(invalid(format!("{role} owner and name must not be empty")));
            }
        }

        if self.source == self.destination {
            return Err(invalid(
                "source and destination must be different repositories".to_string(),
            ));
        }

        if self.credentials.is_empty() {
            return Err(invalid("at least one credential is required".to_string()));
        }

        for (actor, source) in &self.credentials {
            if matches!(source, TokenSource::Literal(token) if token.trim().is_empty()) {
                return Err(invalid(format!("token for '{actor}' is empty")));
            }
        }

        if !self.credentials.contains_key(&self.default_actor) {
            return Err(invalid(format!(
                "default-actor '{}' has no credential",
                self.default_actor
            )));
        }

        if self.timeout_secs == 0 {
            return Err(invalid("timeout-secs must be greater than zero".to_string()));
        }

        if let Some(resume) = &self.resume {
            if resume.start_page == 0 {
                return Err(invalid("resume start-page must be at least 1".to_string()));
            }
        }

        if let Some(base_url) = &self.api_base_url {
            if Url::parse(base_url).is_err() {
                return Err(invalid(format!("api-base-url is not a valid URL: {base_url}")));
            }
        }

        Ok(())
    }

    /// Resolves every token and builds the credential pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an environment token is unset or a token is
    /// empty.
    pub fn credential_pool(&self) -> Result<CredentialPool, ConfigError> {
        let mut tokens = Vec::with_capacity(self.credentials.len());
        for (actor, source) in &self.credentials {
            tokens.push((actor.clone(), source.resolve(actor)?));
        }
        Ok(CredentialPool::new(tokens, &self.default_actor)?)
    }

    /// Connection settings for the GitHub tracker.
    pub fn tracker_options(&self) -> GitHubTrackerOptions {
        GitHubTrackerOptions {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            respect_rate_limit: self.respect_rate_limit,
        }
    }
}
