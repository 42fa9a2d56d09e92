//! Application startup port

use pipecheck_domain::PipelineConfiguration;

/// Describes how an application wires its request pipeline.
///
/// A harness can build a test subject straight from a `Startup`, the same way
/// the application itself would boot.
pub trait Startup {
    /// Returns the pipeline configuration of the application.
    fn configure(&self) -> PipelineConfiguration;
}
