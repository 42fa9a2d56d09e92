//! Response snapshot returned by a test subject

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::StatusCode;
use crate::request::{Headers, TestRequest};

/// Maximum number of body bytes rendered by [`TestResponse::describe`].
const DESCRIBE_BODY_LIMIT: usize = 4096;

/// A complete response produced by the harness for one request.
///
/// The originating request is shared, not copied, and is never modified by
/// the harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers (case-insensitive lookup).
    pub headers: Headers,
    /// Raw response body.
    pub body: Vec<u8>,
    /// The request this response answers.
    pub request: Arc<TestRequest>,
    /// Time spent inside the pipeline.
    pub duration: Duration,
}

impl TestResponse {
    /// Creates a response snapshot.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: Headers,
        body: Vec<u8>,
        request: Arc<TestRequest>,
        duration: Duration,
    ) -> Self {
        Self {
            status: status.into(),
            headers,
            body,
            request,
            duration,
        }
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the `Content-Type` header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// Renders the request/response exchange for failure diagnostics.
    ///
    /// The output lists the request line, request headers and body, then the
    /// status line, response headers and body. Bodies longer than 4 KiB are
    /// truncated.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let request = &self.request;

        let _ = writeln!(out, "The originating request was:");
        let _ = writeln!(out, "{} {} HTTP/1.1", request.method, request.path);
        write_headers(&mut out, &request.headers);
        if let Some(body) = &request.body {
            let _ = writeln!(out);
            write_body(&mut out, body);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "The HTTP response was:");
        let _ = writeln!(out, "HTTP/1.1 {}", self.status);
        write_headers(&mut out, &self.headers);
        if !self.body.is_empty() {
            let _ = writeln!(out);
            write_body(&mut out, &self.body);
        }
        out
    }
}

fn write_headers(out: &mut String, headers: &Headers) {
    for header in headers.iter() {
        let _ = writeln!(out, "{}: {}", header.name, header.value);
    }
}

fn write_body(out: &mut String, body: &[u8]) {
    let shown = &body[..body.len().min(DESCRIBE_BODY_LIMIT)];
    out.push_str(&String::from_utf8_lossy(shown));
    if body.len() > DESCRIBE_BODY_LIMIT {
        let _ = write!(out, "... ({} bytes total)", body.len());
    }
    out.push('\n');
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(status: u16, body: &str, request: TestRequest) -> TestResponse {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        TestResponse::new(
            status,
            headers,
            body.as_bytes().to_vec(),
            Arc::new(request),
            Duration::from_millis(3),
        )
    }

    #[test]
    fn test_describe_includes_request_and_response() {
        let response = response(404, "", TestRequest::post("/endpoint", "request body"));
        let text = response.describe();

        assert!(text.contains("POST /endpoint HTTP/1.1"));
        assert!(text.contains("request body"));
        assert!(text.contains("HTTP/1.1 404 Not Found"));
        assert!(text.contains("Content-Type: text/plain"));
    }

    #[test]
    fn test_describe_truncates_large_bodies() {
        let body = "x".repeat(DESCRIBE_BODY_LIMIT + 10);
        let text = response(200, &body, TestRequest::get("/")).describe();

        assert!(text.contains(&format!("({} bytes total)", DESCRIBE_BODY_LIMIT + 10)));
    }

    #[test]
    fn test_json_body() {
        let response = response(200, r#"{"id": 7}"#, TestRequest::get("/item"));
        let value: serde_json::Value = response.json().unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(response.content_type(), Some("text/plain"));
    }
}
