//! Turns a validated `PipelineConfiguration` into an axum `Router`.
//!
//! axum layers wrap the routes registered before them, while a pipeline
//! behavior wraps what comes after it. Behaviors are therefore folded in
//! reverse: by the time an exception page is reached, exactly the endpoints
//! declared downstream of it are registered and get wrapped.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Extension, Router, middleware};
use pipecheck_domain::{Behavior, EndpointHandler, EndpointReply, PipelineConfiguration, TestRequest};
use tower_http::trace::TraceLayer;

use super::exception_page::{self, UnhandledFault};

/// Builds the router for `config`, which must already be validated.
pub(crate) fn build_router(config: &PipelineConfiguration) -> Router {
    let mut router = Router::new();
    let mut endpoints = 0_usize;

    for behavior in config.behaviors().iter().rev() {
        match behavior {
            Behavior::UseEndpoint { path, handler } => {
                router = router.route(path, endpoint(Arc::clone(handler)));
                endpoints += 1;
            }
            Behavior::UseExceptionPage if endpoints > 0 => {
                router = router.route_layer(middleware::map_response(exception_page::render));
            }
            Behavior::UseExceptionPage | Behavior::UseRouting => {}
        }
    }

    tracing::debug!(
        behaviors = config.behaviors().len(),
        endpoints,
        "built request pipeline"
    );
    router.fallback(terminal).layer(TraceLayer::new_for_http())
}

fn endpoint(handler: EndpointHandler) -> axum::routing::MethodRouter {
    any(move |Extension(request): Extension<Arc<TestRequest>>| {
        let handler = Arc::clone(&handler);
        async move { dispatch(&handler, &request) }
    })
}

fn dispatch(handler: &EndpointHandler, request: &TestRequest) -> Response {
    match handler(request) {
        Ok(reply) => into_response(reply),
        Err(fault) => {
            tracing::warn!(
                request_id = %request.id,
                path = %request.path,
                fault = %fault,
                "endpoint raised an unhandled fault"
            );
            let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
            response.extensions_mut().insert(UnhandledFault(fault));
            response
        }
    }
}

fn into_response(reply: EndpointReply) -> Response {
    let mut response = Response::new(Body::from(reply.body));
    *response.status_mut() =
        StatusCode::from_u16(reply.status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    for header in reply.headers.iter() {
        match (
            HeaderName::try_from(header.name.as_str()),
            HeaderValue::try_from(header.value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().append(name, value);
            }
            _ => tracing::warn!(name = %header.name, "dropping invalid reply header"),
        }
    }
    response
}

/// End of the pipeline for requests no endpoint claimed.
async fn terminal() -> StatusCode {
    StatusCode::OK
}
