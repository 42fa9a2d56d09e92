//! Harness settings
//!
//! Defaults suit unit-style integration tests. Each field can be overridden
//! through a `PIPECHECK_`-prefixed environment variable, e.g.
//! `PIPECHECK_REQUEST_TIMEOUT_MS=500`.

use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable prefix for harness settings.
pub const ENV_PREFIX: &str = "PIPECHECK";

/// Errors loading [`HarnessSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A value could not be read or parsed.
    #[error("invalid harness settings: {0}")]
    Invalid(#[from] config::ConfigError),
}

/// Tunables for the in-process harness.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    /// Largest response body the client will buffer.
    pub max_body_bytes: usize,
    /// Time allowed for one request to pass through the pipeline.
    pub request_timeout_ms: u64,
    /// `tracing` filter used when no `RUST_LOG` is set.
    pub log_filter: String,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024,
            request_timeout_ms: 30_000,
            log_filter: "info".to_string(),
        }
    }
}

impl HarnessSettings {
    /// Loads settings from `PIPECHECK_*` environment variables over the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value of the wrong type.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(source: Environment) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Returns the request timeout as a `Duration`.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
