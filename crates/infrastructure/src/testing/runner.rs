//! Test runner implementation.
//!
//! Executes assertions against harness responses and records failures into
//! an [`AssertionScope`]. Every failure message ends with the full exchange
//! from [`TestResponse::describe`], so a report names the request that
//! produced the bad response.

use pipecheck_application::ResponseChecker;
use pipecheck_domain::{Assertion, AssertionScope, ScopeError, StatusExpectation, TestResponse};

/// Test runner that executes assertions against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner;

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the failure message for `assertion`, or `None` if it holds.
    #[must_use]
    pub fn failure(&self, assertion: &Assertion, response: &TestResponse) -> Option<String> {
        evaluate(assertion, response)
            .err()
            .map(|problem| format!("{problem}\n\n{}", response.describe()))
    }
}

impl ResponseChecker for TestRunner {
    fn verify(
        &self,
        scope: &mut AssertionScope,
        assertion: &Assertion,
        response: &TestResponse,
    ) -> Result<(), ScopeError> {
        match self.failure(assertion, response) {
            Some(message) => scope.fail(message),
            None => scope.check(true, String::new()),
        }
    }
}

/// Returns a one-line problem statement when `assertion` does not hold.
fn evaluate(assertion: &Assertion, response: &TestResponse) -> Result<(), String> {
    match assertion {
        Assertion::StatusCode { expected } => check_status_code(response, *expected),
        Assertion::HeaderExists { name, value } => {
            check_header_exists(response, name, value.as_deref())
        }
        Assertion::ContentType { expected } => check_content_type(response, expected),
        Assertion::BodyContains { text, ignore_case } => {
            check_contains(&response.text(), text, *ignore_case, "Body")
        }
        Assertion::RequestBodyContains { text } => {
            check_contains(&response.request.body_text(), text, false, "Request body")
        }
    }
}

fn check_status_code(response: &TestResponse, expected: StatusExpectation) -> Result<(), String> {
    if expected.matches(response.status.as_u16()) {
        Ok(())
    } else {
        Err(format!(
            "Expected status {}, got {}",
            expected.description(),
            response.status
        ))
    }
}

fn check_header_exists(
    response: &TestResponse,
    name: &str,
    expected_value: Option<&str>,
) -> Result<(), String> {
    match (response.header(name), expected_value) {
        (None, _) => Err(format!("Header '{name}' not found")),
        (Some(actual), Some(expected)) if actual != expected => Err(format!(
            "Header '{name}' value mismatch: expected '{expected}', got '{actual}'"
        )),
        (Some(_), _) => Ok(()),
    }
}

fn check_content_type(response: &TestResponse, expected: &str) -> Result<(), String> {
    match response.content_type() {
        Some(actual) if actual.to_lowercase().contains(&expected.to_lowercase()) => Ok(()),
        Some(actual) => Err(format!(
            "Content-Type mismatch: expected '{expected}', got '{actual}'"
        )),
        None => Err("Content-Type header not found".to_string()),
    }
}

fn check_contains(haystack: &str, text: &str, ignore_case: bool, label: &str) -> Result<(), String> {
    let contains = if ignore_case {
        haystack.to_lowercase().contains(&text.to_lowercase())
    } else {
        haystack.contains(text)
    };

    if contains {
        Ok(())
    } else {
        Err(format!("{label} does not contain '{text}'"))
    }
}
