//! Response checker port

use pipecheck_domain::{Assertion, AssertionScope, ScopeError, TestResponse};

/// Evaluates one assertion against a response, recording into a scope.
pub trait ResponseChecker {
    /// Runs `assertion` and records a failure in `scope` if it does not hold.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Closed`] if `scope` is already closed.
    fn verify(
        &self,
        scope: &mut AssertionScope,
        assertion: &Assertion,
        response: &TestResponse,
    ) -> Result<(), ScopeError>;
}
