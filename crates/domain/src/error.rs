//! Domain error types

use thiserror::Error;

use crate::pipeline::Capability;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A wildcard pattern could not be compiled.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// A pipeline configuration that cannot be turned into a running server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A behavior depends on a capability that was never registered.
    #[error("behavior `{behavior}` requires capability `{capability}`, which is not registered")]
    MissingCapability {
        /// Name of the behavior that failed to resolve.
        behavior: &'static str,
        /// The capability it needed.
        capability: Capability,
    },

    /// An endpoint was declared before routing was enabled in the pipeline.
    #[error("endpoint `{path}` is declared before `use_routing`")]
    RoutingNotEnabled {
        /// Path of the offending endpoint.
        path: String,
    },

    /// An endpoint path is not a literal absolute path.
    #[error("invalid endpoint path `{path}`: {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Which rule the path breaks.
        reason: &'static str,
    },

    /// Two endpoints share the same path.
    #[error("endpoint `{0}` is declared more than once")]
    DuplicateEndpoint(String),
}

/// Misuse of an assertion scope or of the failures it produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The scope was already closed.
    #[error("assertion scope is already closed")]
    Closed,

    /// A failure index past the end of the recorded failures.
    #[error("failure index {index} is out of range: {len} failure(s) recorded")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of recorded failures.
        len: usize,
    },
}
