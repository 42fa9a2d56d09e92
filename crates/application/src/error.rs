//! Application error types

use pipecheck_domain::{ConfigurationError, DomainError, ScopeError};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The test subject could not be built from its configuration.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// An assertion scope was misused.
    #[error("scope error: {0}")]
    Scope(#[from] ScopeError),

    /// The test subject failed to produce a response.
    #[error("test subject error: {0}")]
    Subject(String),

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
