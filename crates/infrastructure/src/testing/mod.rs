//! Response testing infrastructure.
//!
//! The runner evaluates domain assertions against harness responses and feeds
//! each outcome into an [`AssertionScope`](pipecheck_domain::AssertionScope).

mod runner;

pub use runner::TestRunner;
