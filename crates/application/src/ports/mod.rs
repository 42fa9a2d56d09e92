//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the verification flow and the
//! harness that implements it.

mod response_checker;
mod startup;
mod test_subject;

pub use response_checker::ResponseChecker;
pub use startup::Startup;
pub use test_subject::TestSubject;
