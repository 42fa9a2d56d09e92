//! In-process test host.
//!
//! A [`TestServer`] turns a [`PipelineConfiguration`](pipecheck_domain::PipelineConfiguration)
//! into an axum router that lives only in memory. A [`TestClient`] drives
//! requests through that router without opening a socket.

mod client;
mod exception_page;
mod pipeline;
mod server;

pub use client::TestClient;
pub use server::{TestServer, start};
