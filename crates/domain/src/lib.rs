//! Pipecheck Domain - Core test-harness types
//!
//! This crate defines requests, responses, pipeline configuration, faults and
//! the deferred assertion scope. All types here are pure Rust with no I/O
//! dependencies.

pub mod error;
pub mod fault;
pub mod pattern;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod scope;
pub mod testing;

pub use error::{ConfigurationError, DomainError, DomainResult, ScopeError};
pub use fault::Fault;
pub use pattern::WildcardPattern;
pub use pipeline::{Behavior, Capability, EndpointHandler, EndpointReply, PipelineConfiguration};
pub use request::{Header, Headers, HttpMethod, TestRequest};
pub use response::{StatusCode, TestResponse};
pub use scope::{AssertionFailure, AssertionScope, Failures};
pub use testing::{Assertion, StatusExpectation, TestSuite};
