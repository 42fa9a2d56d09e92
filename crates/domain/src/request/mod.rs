//! Request types

mod headers;
mod method;
mod spec;

pub use headers::{Header, Headers};
pub use method::HttpMethod;
pub use spec::TestRequest;
