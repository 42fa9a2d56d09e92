//! Deferred assertion scope
//!
//! An [`AssertionScope`] collects the failures of several independent checks
//! instead of stopping at the first one. Checks are routed explicitly through
//! the scope; nothing outside the scope object changes behavior, so two scopes
//! never observe each other's checks.
//!
//! ```
//! use pipecheck_domain::scope::AssertionScope;
//!
//! let mut scope = AssertionScope::open();
//! scope.check(1 + 1 == 2, "arithmetic is broken").unwrap();
//! scope.check("body".contains("missing"), "expected body to contain `missing`").unwrap();
//!
//! let failures = scope.close().unwrap();
//! assert_eq!(failures.len(), 1);
//! assert!(failures.first().unwrap().contains("missing"));
//! ```
//!
//! A scope that goes out of scope while still open is closed by `Drop`; if it
//! recorded failures, the drop panics with every message so that nothing is
//! silently swallowed.

use std::fmt::{self, Debug, Write as _};

use crate::error::{DomainResult, ScopeError};
use crate::pattern::WildcardPattern;

/// One failed check, as a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    /// Creates a failure from its message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the message contains `text`.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.message.contains(text)
    }

    /// Returns true if the whole message matches a wildcard pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` cannot be compiled.
    pub fn matches(&self, pattern: &str) -> DomainResult<bool> {
        Ok(WildcardPattern::new(pattern)?.is_match(&self.message))
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The finalized failures of a closed scope, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failures {
    items: Vec<AssertionFailure>,
}

impl Failures {
    /// Returns the failure at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::IndexOutOfRange`] if fewer than `index + 1`
    /// failures were recorded.
    pub fn get(&self, index: usize) -> Result<&AssertionFailure, ScopeError> {
        self.items.get(index).ok_or(ScopeError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Returns the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::IndexOutOfRange`] if no failure was recorded.
    pub fn first(&self) -> Result<&AssertionFailure, ScopeError> {
        self.get(0)
    }

    /// Returns the number of failures.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if every check passed.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates failures in check order.
    pub fn iter(&self) -> std::slice::Iter<'_, AssertionFailure> {
        self.items.iter()
    }

    /// Returns the messages in check order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(AssertionFailure::message).collect()
    }

    /// Renders every failure as one numbered report.
    #[must_use]
    pub fn report(&self) -> String {
        render_report(&self.items)
    }

    /// Panics with the aggregated report unless every check passed.
    ///
    /// # Panics
    ///
    /// Panics if at least one failure was recorded.
    #[track_caller]
    #[allow(clippy::panic)]
    pub fn assert_empty(&self) {
        if !self.is_empty() {
            panic!("{}", self.report());
        }
    }
}

impl IntoIterator for Failures {
    type Item = AssertionFailure;
    type IntoIter = std::vec::IntoIter<AssertionFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Failures {
    type Item = &'a AssertionFailure;
    type IntoIter = std::slice::Iter<'a, AssertionFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeState {
    Open,
    Closed,
}

/// Collects check failures until it is closed.
///
/// States: `Open` on construction, `Closed` after [`close`](Self::close) or
/// drop. Every operation on a closed scope fails with [`ScopeError::Closed`].
///
/// Nested scopes are unsupported: an inner scope does not forward its
/// failures to an outer one, so each check belongs to exactly one scope.
#[derive(Debug)]
#[must_use = "an assertion scope reports nothing unless it is closed or inspected"]
pub struct AssertionScope {
    context: Option<String>,
    failures: Vec<AssertionFailure>,
    state: ScopeState,
}

impl AssertionScope {
    /// Opens an empty scope.
    pub const fn open() -> Self {
        Self {
            context: None,
            failures: Vec::new(),
            state: ScopeState::Open,
        }
    }

    /// Same as [`open`](Self::open).
    pub const fn new() -> Self {
        Self::open()
    }

    /// Opens an empty scope whose messages are prefixed with `context`.
    pub fn named(context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            failures: Vec::new(),
            state: ScopeState::Open,
        }
    }

    /// Returns true until the scope is closed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ScopeState::Open
    }

    /// Returns the number of failures recorded so far.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Records `message` if `predicate` is false.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Closed`] if the scope was already closed.
    pub fn check(&mut self, predicate: bool, message: impl Into<String>) -> Result<(), ScopeError> {
        self.check_with(predicate, || message.into())
    }

    /// Records the message built by `message` if `predicate` is false.
    ///
    /// The message is only built when the check fails.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Closed`] if the scope was already closed.
    pub fn check_with<F>(&mut self, predicate: bool, message: F) -> Result<(), ScopeError>
    where
        F: FnOnce() -> String,
    {
        self.ensure_open()?;
        if !predicate {
            self.record(message());
        }
        Ok(())
    }

    /// Records an "expected X, found Y" failure if the values differ.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Closed`] if the scope was already closed.
    pub fn check_eq<T>(&mut self, what: &str, expected: &T, actual: &T) -> Result<(), ScopeError>
    where
        T: PartialEq + Debug + ?Sized,
    {
        self.check_with(expected == actual, || {
            format!("expected {what} to be {expected:?}, found {actual:?}")
        })
    }

    /// Records `message` unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Closed`] if the scope was already closed.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), ScopeError> {
        self.check(false, message)
    }

    /// Closes the scope and returns its failures in check order.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Closed`] if the scope was already closed.
    pub fn close(&mut self) -> Result<Failures, ScopeError> {
        self.ensure_open()?;
        self.state = ScopeState::Closed;
        Ok(Failures {
            items: std::mem::take(&mut self.failures),
        })
    }

    fn ensure_open(&self) -> Result<(), ScopeError> {
        match self.state {
            ScopeState::Open => Ok(()),
            ScopeState::Closed => Err(ScopeError::Closed),
        }
    }

    fn record(&mut self, message: String) {
        let message = match &self.context {
            Some(context) => format!("{context}: {message}"),
            None => message,
        };
        self.failures.push(AssertionFailure::new(message));
    }
}

impl Default for AssertionScope {
    fn default() -> Self {
        Self::open()
    }
}

impl Drop for AssertionScope {
    #[allow(clippy::panic)]
    fn drop(&mut self) {
        if self.state == ScopeState::Closed {
            return;
        }
        self.state = ScopeState::Closed;
        if !self.failures.is_empty() && !std::thread::panicking() {
            panic!("{}", render_report(&self.failures));
        }
    }
}

fn render_report(failures: &[AssertionFailure]) -> String {
    let mut out = format!("{} assertion(s) failed:", failures.len());
    for (i, failure) in failures.iter().enumerate() {
        let _ = write!(out, "\n{}) {}", i + 1, failure.message());
    }
    out
}
