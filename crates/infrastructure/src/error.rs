//! Harness error types

use std::time::Duration;

use pipecheck_application::ApplicationError;
use pipecheck_domain::{ConfigurationError, Fault};
use thiserror::Error;

/// Errors raised while starting or talking to a test server.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The server backing this client has been shut down.
    #[error("test server has been disposed")]
    Disposed,

    /// An endpoint faulted and no exception page was configured upstream.
    #[error("unhandled fault in request pipeline: {}", fault_chain(.0))]
    UnhandledFault(#[source] Fault),

    /// The request could not be turned into an HTTP request.
    #[error("invalid request: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The pipeline did not answer in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

fn fault_chain(fault: &Fault) -> String {
    fault
        .chain()
        .map(Fault::message)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<HarnessError> for ApplicationError {
    fn from(error: HarnessError) -> Self {
        match error {
            HarnessError::Configuration(e) => Self::Configuration(e),
            HarnessError::Timeout(_) => Self::Timeout,
            other => Self::Subject(other.to_string()),
        }
    }
}
