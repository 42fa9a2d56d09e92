//! In-process test server.

use std::sync::Arc;

use axum::Router;
use pipecheck_application::Startup;
use pipecheck_domain::PipelineConfiguration;

use super::client::TestClient;
use super::pipeline::build_router;
use crate::error::HarnessResult;
use crate::settings::HarnessSettings;

/// An addressable, in-process server built from a pipeline configuration.
///
/// The server owns its pipeline. Dropping it, or calling
/// [`shutdown`](Self::shutdown), releases the pipeline; clients created from
/// it fail with [`HarnessError::Disposed`](crate::HarnessError::Disposed)
/// afterwards.
#[derive(Debug)]
pub struct TestServer {
    router: Arc<Router>,
    settings: HarnessSettings,
}

impl TestServer {
    /// Starts a server with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`](crate::HarnessError::Configuration)
    /// if a behavior depends on a capability that is not registered or is
    /// declared out of order.
    pub fn start(config: &PipelineConfiguration) -> HarnessResult<Self> {
        Self::start_with(config, HarnessSettings::default())
    }

    /// Starts a server with explicit settings.
    ///
    /// # Errors
    ///
    /// See [`TestServer::start`].
    pub fn start_with(
        config: &PipelineConfiguration,
        settings: HarnessSettings,
    ) -> HarnessResult<Self> {
        config.validate()?;
        let router = build_router(config);
        tracing::debug!(
            capabilities = ?config.capabilities().collect::<Vec<_>>(),
            "test server started"
        );
        Ok(Self {
            router: Arc::new(router),
            settings,
        })
    }

    /// Starts a server from an application's startup definition.
    ///
    /// # Errors
    ///
    /// See [`TestServer::start`].
    pub fn from_startup<S: Startup + ?Sized>(startup: &S) -> HarnessResult<Self> {
        Self::start(&startup.configure())
    }

    /// Creates a client bound to this server.
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient::new(Arc::downgrade(&self.router), self.settings.clone())
    }

    /// Releases the server. Equivalent to dropping it.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        tracing::debug!("test server disposed");
    }
}

/// Starts a server and returns a client together with the server that
/// disposes it.
///
/// Keep the server alive for as long as the client is used; dropping it is
/// the release step and happens on every exit path, including panics.
///
/// # Errors
///
/// See [`TestServer::start`].
pub fn start(config: &PipelineConfiguration) -> HarnessResult<(TestClient, TestServer)> {
    let server = TestServer::start(config)?;
    Ok((server.client(), server))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pipecheck_domain::{
        ConfigurationError, EndpointReply, Fault, HttpMethod, StatusCode, TestRequest,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::HarnessError;

    fn echo(request: &TestRequest) -> Result<EndpointReply, Fault> {
        Ok(EndpointReply::text(request.body_text()))
    }

    fn faulting(_: &TestRequest) -> Result<EndpointReply, Fault> {
        Err(Fault::with_cause("Wow!", Fault::new("Exactly!")))
    }

    #[tokio::test]
    async fn test_endpoint_answers_any_method() {
        let config = PipelineConfiguration::new()
            .add_routing()
            .use_routing()
            .map("/echo", echo);
        let (client, _server) = start(&config).unwrap();

        let posted = client.post("/echo", "ping").await.unwrap();
        assert_eq!(posted.status, StatusCode::OK);
        assert_eq!(posted.text(), "ping");

        let fetched = client.get("/echo").await.unwrap();
        assert_eq!(fetched.status, StatusCode::OK);
        assert_eq!(fetched.text(), "");
    }

    #[tokio::test]
    async fn test_unmatched_path_falls_through_to_empty_ok() {
        let config = PipelineConfiguration::new().add_routing().use_routing();
        let (client, _server) = start(&config).unwrap();

        let response = client.get("/nowhere").await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_exception_page_only_covers_downstream_endpoints() {
        let config = PipelineConfiguration::new()
            .add_routing()
            .use_routing()
            .map("/before", faulting)
            .use_exception_page()
            .map("/after", faulting);
        let (client, _server) = start(&config).unwrap();

        let rendered = client.get("/after").await.unwrap();
        assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(rendered.text().contains("Wow!"));

        let escaped = client.get("/before").await;
        assert!(
            matches!(escaped, Err(HarnessError::UnhandledFault(f)) if f.message() == "Wow!")
        );
    }

    #[tokio::test]
    async fn test_fault_without_exception_page_propagates() {
        let config = PipelineConfiguration::new()
            .add_routing()
            .use_routing()
            .map("/exception", faulting);
        let (client, _server) = start(&config).unwrap();

        let error = client.get("/exception").await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "unhandled fault in request pipeline: Wow! -> Exactly!"
        );
    }

    #[tokio::test]
    async fn test_reply_status_and_headers_reach_the_client() {
        let config = PipelineConfiguration::new()
            .add_routing()
            .use_routing()
            .map("/created", |_: &TestRequest| {
                Ok(EndpointReply::ok()
                    .with_status(201)
                    .with_header("X-Item-Id", "42"))
            });
        let (client, _server) = start(&config).unwrap();

        let response = client
            .send(TestRequest::new(HttpMethod::Put, "/created"))
            .await
            .unwrap();
        assert_eq!(response.status.as_u16(), 201);
        assert_eq!(response.header("x-item-id"), Some("42"));
    }

    #[test]
    fn test_invalid_configuration_is_rejected_at_start() {
        let config = PipelineConfiguration::new().use_routing().map("/a", echo);

        let error = TestServer::start(&config).unwrap_err();
        assert!(matches!(
            error,
            HarnessError::Configuration(ConfigurationError::MissingCapability { .. })
        ));
    }

    #[tokio::test]
    async fn test_client_fails_after_shutdown() {
        let config = PipelineConfiguration::new();
        let server = TestServer::start(&config).unwrap();
        let client = server.client();
        server.shutdown();

        assert!(matches!(client.get("/").await, Err(HarnessError::Disposed)));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let config = PipelineConfiguration::new()
            .add_routing()
            .use_routing()
            .map("/big", |_: &TestRequest| Ok(EndpointReply::text("x".repeat(64))));
        let settings = HarnessSettings {
            max_body_bytes: 16,
            ..HarnessSettings::default()
        };
        let server = TestServer::start_with(&config, settings).unwrap();

        let result = server.client().get("/big").await;
        assert!(matches!(result, Err(HarnessError::Body(_))));
    }
}
