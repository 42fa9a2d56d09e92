//! Test subject port

use std::future::Future;

use pipecheck_domain::{TestRequest, TestResponse};

use crate::ApplicationResult;

/// Port for sending requests to the system under test.
///
/// Implementations run the request through their pipeline and resolve once
/// the complete response is available; there is no streaming.
pub trait TestSubject: Send + Sync {
    /// Sends a request and returns the full response snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is gone, the pipeline faulted without
    /// an exception page, or the request timed out.
    fn send(
        &self,
        request: TestRequest,
    ) -> impl Future<Output = ApplicationResult<TestResponse>> + Send;
}
