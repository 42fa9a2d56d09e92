//! Client bound to an in-process test server.

use std::sync::{Arc, Weak};
use std::time::Instant;

use axum::Router;
use axum::body::Body;
use axum::http::{self, Request};
use http_body_util::{BodyExt, Limited};
use pipecheck_application::{ApplicationResult, TestSubject};
use pipecheck_domain::{Headers, TestRequest, TestResponse};
use tower::ServiceExt;

use super::exception_page::UnhandledFault;
use crate::error::{HarnessError, HarnessResult};
use crate::settings::HarnessSettings;

/// Sends requests through the pipeline of a [`TestServer`](super::TestServer).
///
/// The client does not keep the server alive: once the server is shut down or
/// dropped, every send fails with [`HarnessError::Disposed`].
#[derive(Debug, Clone)]
pub struct TestClient {
    router: Weak<Router>,
    settings: HarnessSettings,
}

impl TestClient {
    pub(super) const fn new(router: Weak<Router>, settings: HarnessSettings) -> Self {
        Self { router, settings }
    }

    /// Sends `request` and waits for the complete response.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::Disposed`] if the server is gone
    /// - [`HarnessError::UnhandledFault`] if an endpoint faulted and no
    ///   exception page was configured upstream of it
    /// - [`HarnessError::Request`] if the request cannot be expressed in HTTP
    /// - [`HarnessError::Body`] if the response body exceeds the size limit
    /// - [`HarnessError::Timeout`] if the pipeline does not answer in time
    pub async fn send(&self, request: TestRequest) -> HarnessResult<TestResponse> {
        let router = self.router.upgrade().ok_or(HarnessError::Disposed)?;
        let request = Arc::new(request);
        let http_request = to_http_request(&request)?;

        let timeout = self.settings.request_timeout();
        let started = Instant::now();
        let (parts, body) = tokio::time::timeout(timeout, Router::clone(&router).oneshot(http_request))
            .await
            .map_err(|_| HarnessError::Timeout(timeout))?
            .unwrap_or_else(|never| match never {})
            .into_parts();

        if let Some(UnhandledFault(fault)) = parts.extensions.get::<UnhandledFault>() {
            return Err(HarnessError::UnhandledFault(fault.clone()));
        }

        let body = tokio::time::timeout(
            timeout.saturating_sub(started.elapsed()),
            Limited::new(body, self.settings.max_body_bytes).collect(),
        )
        .await
        .map_err(|_| HarnessError::Timeout(timeout))?
        .map_err(|e| HarnessError::Body(e.to_string()))?
        .to_bytes();

        let headers: Headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let duration = started.elapsed();
        tracing::info!(
            request_id = %request.id,
            method = %request.method,
            path = %request.path,
            status = parts.status.as_u16(),
            elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "request completed"
        );

        Ok(TestResponse::new(
            parts.status.as_u16(),
            headers,
            body.to_vec(),
            request,
            duration,
        ))
    }

    /// Sends a GET request to `path`.
    ///
    /// # Errors
    ///
    /// See [`TestClient::send`].
    pub async fn get(&self, path: &str) -> HarnessResult<TestResponse> {
        self.send(TestRequest::get(path)).await
    }

    /// Sends a POST request with a `text/plain` body to `path`.
    ///
    /// # Errors
    ///
    /// See [`TestClient::send`].
    pub async fn post(&self, path: &str, body: impl Into<Vec<u8>>) -> HarnessResult<TestResponse> {
        self.send(TestRequest::post(path, body)).await
    }
}

impl TestSubject for TestClient {
    async fn send(&self, request: TestRequest) -> ApplicationResult<TestResponse> {
        Self::send(self, request).await.map_err(Into::into)
    }
}

fn to_http_request(request: &Arc<TestRequest>) -> HarnessResult<Request<Body>> {
    let mut builder = Request::builder()
        .method(request.method.as_str())
        .uri(request.path.as_str())
        .extension(Arc::clone(request));

    for header in request.headers.iter() {
        builder = builder.header(header.name.as_str(), header.value.as_str());
    }

    let body = request
        .body
        .as_ref()
        .map_or_else(Body::empty, |bytes| Body::from(bytes.clone()));

    builder
        .body(body)
        .map_err(|e: http::Error| HarnessError::Request(e.to_string()))
}
