//! Application use cases.

mod verify_response;

pub use verify_response::*;
