//! Integration tests for hosting custom pipelines in process.
//!
//! Each test builds its own pipeline, starts a server for it and talks to it
//! through a client. Nothing is shared between tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pipecheck_application::{ResponseChecker, Startup, VerifyResponse, VerifyResponseInput};
use pipecheck_domain::{
    Assertion, AssertionScope, ConfigurationError, EndpointReply, Fault, PipelineConfiguration,
    ScopeError, StatusCode, TestRequest, TestSuite,
};
use pipecheck_infrastructure::{
    HarnessError, HarnessSettings, TestRunner, TestServer, init_test_tracing, start,
};
use pretty_assertions::assert_eq;

fn throw_wow(_: &TestRequest) -> Result<EndpointReply, Fault> {
    Err(Fault::with_cause("Wow!", Fault::new("Exactly!")))
}

fn routing_only() -> PipelineConfiguration {
    PipelineConfiguration::new().add_routing().use_routing()
}

/// An application that echoes posted bodies back at `/endpoint`.
struct SampleApi;

impl Startup for SampleApi {
    fn configure(&self) -> PipelineConfiguration {
        PipelineConfiguration::new()
            .add_routing()
            .use_exception_page()
            .use_routing()
            .map("/endpoint", |request: &TestRequest| {
                Ok(EndpointReply::ok()
                    .with_header("Content-Type", "text/plain; charset=utf-8")
                    .with_body(request.body.clone().unwrap_or_default()))
            })
    }
}

#[tokio::test]
async fn exception_page_renders_fault_and_inner_fault() {
    init_test_tracing(&HarnessSettings::default());
    let config = PipelineConfiguration::new()
        .add_routing()
        .use_exception_page()
        .use_routing()
        .map("/exception", throw_wow);
    let (client, _server) = start(&config).unwrap();

    let response = client.get("/exception").await.unwrap();

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.content_type(), Some("text/plain; charset=utf-8"));
    let page = response.text();
    assert!(page.contains("Wow!"), "{page}");
    assert!(page.contains("Exactly!"), "{page}");
}

#[tokio::test]
async fn failed_check_reports_the_request_body() {
    let (client, _server) = start(&routing_only()).unwrap();

    let response = client.post("/endpoint", "request body").await.unwrap();

    let runner = TestRunner::new();
    let mut scope = AssertionScope::open();
    runner
        .verify(&mut scope, &Assertion::status(200), &response)
        .unwrap();
    runner
        .verify(&mut scope, &Assertion::body_contains("not-present"), &response)
        .unwrap();
    let failures = scope.close().unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(failures.len(), 1);
    let failure = failures.get(0).unwrap();
    assert!(failure.contains("request body"), "{failure}");
    assert!(failure.matches("*request body*").unwrap());
}

#[tokio::test]
async fn passing_checks_close_to_no_failures() {
    let (client, _server) = start(&routing_only()).unwrap();

    let response = client.post("/endpoint", "request body").await.unwrap();

    let mut scope = AssertionScope::open();
    scope
        .check_eq("status", &StatusCode::OK, &response.status)
        .unwrap();
    let failures = scope.close().unwrap();

    assert!(failures.is_empty());
    assert_eq!(failures.get(0), Err(ScopeError::IndexOutOfRange { index: 0, len: 0 }));
}

#[tokio::test]
async fn request_body_round_trips_unchanged() {
    let (client, _server) = start(&routing_only()).unwrap();
    let payload: Vec<u8> = vec![0, 159, 146, 150, b'\n', 255];

    let response = client
        .send(TestRequest::post("/anything", payload.clone()))
        .await
        .unwrap();

    assert_eq!(response.request.body.as_deref(), Some(payload.as_slice()));
    assert_eq!(response.request.path, "/anything");
}

#[tokio::test]
async fn fault_without_exception_page_reaches_the_caller() {
    let config = routing_only().map("/exception", throw_wow);
    let (client, _server) = start(&config).unwrap();

    let error = client.get("/exception").await.unwrap_err();

    let HarnessError::UnhandledFault(fault) = error else {
        panic!("expected an unhandled fault");
    };
    let messages: Vec<_> = fault.chain().map(Fault::message).collect();
    assert_eq!(messages, ["Wow!", "Exactly!"]);
}

#[test]
fn endpoint_without_routing_capability_is_rejected() {
    let config = PipelineConfiguration::new()
        .use_routing()
        .map("/endpoint", throw_wow);

    let error = TestServer::start(&config).unwrap_err();

    assert!(matches!(
        error,
        HarnessError::Configuration(ConfigurationError::MissingCapability { .. })
    ));
}

#[test]
fn endpoint_before_routing_is_rejected() {
    let config = PipelineConfiguration::new()
        .add_routing()
        .map("/endpoint", throw_wow)
        .use_routing();

    let error = TestServer::start(&config).unwrap_err();

    assert!(matches!(
        error,
        HarnessError::Configuration(ConfigurationError::RoutingNotEnabled { .. })
    ));
}

#[test]
fn capture_syntax_in_endpoint_path_is_a_configuration_error() {
    for path in ["/users/:id", "/files/*rest", "/{name}", "/open{"] {
        let config = routing_only().map(path, throw_wow);

        let error = TestServer::start(&config).unwrap_err();

        assert!(
            matches!(
                &error,
                HarnessError::Configuration(ConfigurationError::InvalidPath { path: p, .. }) if p == path
            ),
            "{path}: {error}"
        );
    }
}

#[tokio::test]
async fn literal_paths_only_match_themselves() {
    let config = routing_only().map("/users/me", |_: &TestRequest| {
        Ok(EndpointReply::text("matched"))
    });
    let (client, _server) = start(&config).unwrap();

    let exact = client.get("/users/me").await.unwrap();
    let other = client.get("/users/someone").await.unwrap();

    assert_eq!(exact.text(), "matched");
    assert_eq!(other.text(), "");
}

#[tokio::test]
async fn disposed_server_rejects_requests() {
    let server = TestServer::start(&routing_only()).unwrap();
    let client = server.client();
    drop(server);

    let result = client.get("/endpoint").await;

    assert!(matches!(result, Err(HarnessError::Disposed)));
}

#[tokio::test]
async fn sample_api_echo_verified_through_scope() {
    let server = TestServer::from_startup(&SampleApi).unwrap();
    let verify = VerifyResponse::new(server.client(), TestRunner::new());

    let verification = verify
        .execute(VerifyResponseInput {
            request: TestRequest::post("/endpoint", "request body"),
            suite: TestSuite::new("echo")
                .with_assertion(Assertion::status(200))
                .with_assertion(Assertion::body_contains("request body"))
                .with_assertion(Assertion::RequestBodyContains {
                    text: "request body".to_string(),
                }),
        })
        .await
        .unwrap();

    assert!(verification.passed(), "{}", verification.failures.report());
    assert_eq!(verification.response.text(), "request body");
}

#[tokio::test]
async fn sample_api_echo_checked_directly() {
    let server = TestServer::from_startup(&SampleApi).unwrap();
    let client = server.client();

    let response = client.post("/endpoint", "request body").await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("request body"));
}

#[tokio::test]
async fn named_suite_failures_carry_the_suite_name() {
    let server = TestServer::from_startup(&SampleApi).unwrap();
    let verify = VerifyResponse::new(server.client(), TestRunner::new());

    let verification = verify
        .execute(VerifyResponseInput {
            request: TestRequest::post("/endpoint", "hello"),
            suite: TestSuite::new("echo").with_assertion(Assertion::body_contains("goodbye")),
        })
        .await
        .unwrap();

    assert!(!verification.passed());
    let failure = verification.failures.first().unwrap();
    assert!(failure.message().starts_with("echo: Body does not contain 'goodbye'"));
}

#[test]
#[should_panic(expected = "1 assertion(s) failed")]
fn scope_dropped_with_failures_panics() {
    let mut scope = AssertionScope::open();
    scope.check(false, "status mismatch").unwrap();
}
