//! Response types

mod spec;
mod status;

pub use spec::TestResponse;
pub use status::StatusCode;
