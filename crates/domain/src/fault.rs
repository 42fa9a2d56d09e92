//! Faults raised by endpoint handlers

use thiserror::Error;

/// An unhandled error raised while a request was being processed.
///
/// A fault may wrap an inner cause, which is exposed through
/// [`std::error::Error::source`] and walked by [`Fault::chain`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Fault {
    message: String,
    #[source]
    cause: Option<Box<Fault>>,
}

impl Fault {
    /// Creates a fault without an inner cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a fault wrapping `cause`.
    #[must_use]
    pub fn with_cause(message: impl Into<String>, cause: Self) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Returns this fault's own message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the directly wrapped cause.
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    /// Iterates this fault followed by each nested cause, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |fault| fault.cause())
    }
}
