//! Exception page middleware.
//!
//! Endpoints that fault answer `500` and attach the fault to the response
//! extensions. When an exception page sits upstream it replaces that response
//! with a plain-text page listing the fault and every inner cause; otherwise
//! the client finds the attached fault and surfaces it as an error.

use std::fmt::Write as _;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use pipecheck_domain::Fault;

/// A fault that escaped its endpoint, carried in response extensions.
#[derive(Debug, Clone)]
pub(crate) struct UnhandledFault(pub(crate) Fault);

/// `map_response` hook that renders any unhandled fault as a page.
pub(crate) async fn render(mut response: Response) -> Response {
    match response.extensions_mut().remove::<UnhandledFault>() {
        Some(UnhandledFault(fault)) => page(&fault),
        None => response,
    }
}

fn page(fault: &Fault) -> Response {
    let mut body = String::from("An unhandled fault occurred while processing the request.\n\n");
    for (depth, cause) in fault.chain().enumerate() {
        let label = if depth == 0 { "Fault" } else { "Inner fault" };
        let _ = writeln!(body, "{label}: {}", cause.message());
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
