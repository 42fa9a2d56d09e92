//! Pipecheck infrastructure
//!
//! This crate hosts request pipelines in process and checks their responses:
//! - In-process server and client built on axum and tower
//! - Exception page middleware for endpoint faults
//! - Assertion runner for responses
//! - Environment-driven harness settings
//! - Test tracing setup

pub mod error;
pub mod harness;
pub mod settings;
pub mod telemetry;
pub mod testing;

pub use error::{HarnessError, HarnessResult};
pub use harness::{TestClient, TestServer, start};
pub use settings::{HarnessSettings, SettingsError};
pub use telemetry::init_test_tracing;
pub use testing::TestRunner;
