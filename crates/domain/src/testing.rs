//! Response assertions
//!
//! Declarative checks that a runner evaluates against a
//! [`TestResponse`](crate::response::TestResponse), one scope entry per check.

/// A check to run against a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check header exists and optionally its value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
    /// Check content type.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
    /// Check body contains text.
    BodyContains {
        /// Text to search for.
        text: String,
        /// Case-insensitive search.
        ignore_case: bool,
    },
    /// Check the originating request body, for echo-style verification.
    RequestBodyContains {
        /// Text to search for.
        text: String,
    },
}

impl Assertion {
    /// Expects an exact status code.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Expects the body to contain `text` (case-sensitive).
    #[must_use]
    pub fn body_contains(text: impl Into<String>) -> Self {
        Self::BodyContains {
            text: text.into(),
            ignore_case: false,
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("Header '{name}' exists"),
            Self::ContentType { expected } => format!("Content-Type contains '{expected}'"),
            Self::BodyContains { text, .. } => format!("Body contains '{text}'"),
            Self::RequestBodyContains { text } => format!("Request body contains '{text}'"),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub const fn matches(self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == expected,
            Self::Range { min, max } => min <= status && status <= max,
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

/// A named, ordered list of assertions.
#[derive(Debug, Clone, Default)]
pub struct TestSuite {
    /// Test suite name, used as the scope context.
    pub name: String,
    /// Assertions to run.
    pub assertions: Vec<Assertion>,
    /// Whether to stop on first failure.
    pub stop_on_failure: bool,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Stop at the first failing assertion (builder pattern).
    #[must_use]
    pub const fn stopping_on_failure(mut self) -> Self {
        self.stop_on_failure = true;
        self
    }
}
