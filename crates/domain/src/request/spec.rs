//! Test request type

use uuid::Uuid;

use super::{Headers, HttpMethod};

/// A request sent through a test subject.
///
/// Requests are immutable once sent: the harness shares the original with the
/// response it produced, so what a test reads back from
/// `TestResponse::request` is byte-for-byte what was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRequest {
    /// Correlation id, used in log events and diagnostics.
    pub id: Uuid,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path and optional query, e.g. `/items?page=2`.
    pub path: String,
    /// Request headers.
    pub headers: Headers,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
}

impl TestRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request carrying `body` as `text/plain`.
    #[must_use]
    pub fn post(path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(HttpMethod::Post, path)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body)
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}
