//! Verify response use case.

use pipecheck_domain::{AssertionScope, Failures, TestRequest, TestResponse, TestSuite};

use crate::ApplicationResult;
use crate::ports::{ResponseChecker, TestSubject};

/// Input for verifying one exchange.
#[derive(Debug, Clone)]
pub struct VerifyResponseInput {
    /// The request to send.
    pub request: TestRequest,
    /// Assertions to run against the response.
    pub suite: TestSuite,
}

/// Output of a verification: the response and every failed assertion.
#[derive(Debug, Clone)]
pub struct Verification {
    /// The response the subject produced.
    pub response: TestResponse,
    /// Failures in assertion order; empty when everything passed.
    pub failures: Failures,
}

impl Verification {
    /// Returns true if no assertion failed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Use case: send one request, then check a whole suite against the response
/// inside a single assertion scope.
pub struct VerifyResponse<S: TestSubject, C: ResponseChecker> {
    subject: S,
    checker: C,
}

impl<S: TestSubject, C: ResponseChecker> VerifyResponse<S, C> {
    /// Creates a new `VerifyResponse` use case.
    #[must_use]
    pub const fn new(subject: S, checker: C) -> Self {
        Self { subject, checker }
    }

    /// Sends the request and collects the failures of every assertion.
    ///
    /// Assertions keep running after a failure unless the suite sets
    /// `stop_on_failure`.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject cannot produce a response. Failed
    /// assertions are not errors; they are returned in
    /// [`Verification::failures`].
    pub async fn execute(&self, input: VerifyResponseInput) -> ApplicationResult<Verification> {
        let response = self.subject.send(input.request).await?;

        let mut scope = AssertionScope::named(&input.suite.name);
        for assertion in &input.suite.assertions {
            self.checker.verify(&mut scope, assertion, &response)?;
            if input.suite.stop_on_failure && scope.failure_count() > 0 {
                break;
            }
        }
        let failures = scope.close()?;

        tracing::debug!(
            suite = %input.suite.name,
            failed = failures.len(),
            "verified response"
        );
        Ok(Verification { response, failures })
    }
}
