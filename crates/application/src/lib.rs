//! Pipecheck Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (the test subject, application startup, response checking)
//! - The response verification use case
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{ResponseChecker, Startup, TestSubject};
pub use use_cases::{Verification, VerifyResponse, VerifyResponseInput};
