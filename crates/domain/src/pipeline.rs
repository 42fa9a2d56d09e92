//! Declarative request pipeline
//!
//! A [`PipelineConfiguration`] is an ordered list of [`Behavior`]s plus the set
//! of [`Capability`]s registered for the test subject. Behaviors apply in the
//! order they are declared; [`PipelineConfiguration::validate`] checks that
//! every behavior's dependencies are satisfied before a server is built.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::fault::Fault;
use crate::request::{Headers, TestRequest};
use crate::response::StatusCode;

/// A named feature that must be registered before dependent behaviors resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Path-based endpoint routing.
    Routing,
}

impl Capability {
    /// Returns the capability name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Routing => "routing",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an endpoint handler answers with when it does not fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointReply {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: Headers,
    /// Response body.
    pub body: Vec<u8>,
}

impl EndpointReply {
    /// An empty `200 OK` reply.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// A `200 OK` reply with a `text/plain` body.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body.into())
    }

    /// Sets the status (builder pattern).
    #[must_use]
    pub fn with_status(mut self, status: impl Into<StatusCode>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

impl Default for EndpointReply {
    fn default() -> Self {
        Self::ok()
    }
}

/// Function invoked when a request reaches its endpoint.
pub type EndpointHandler =
    Arc<dyn Fn(&TestRequest) -> Result<EndpointReply, Fault> + Send + Sync + 'static>;

/// One step of the request pipeline.
#[derive(Clone)]
pub enum Behavior {
    /// Render unhandled faults from downstream endpoints as a 500 page.
    UseExceptionPage,
    /// Enable endpoint routing. Requires [`Capability::Routing`].
    UseRouting,
    /// Map `path` (any method) to `handler`. Requires routing.
    UseEndpoint {
        /// Route path, starting with `/`.
        path: String,
        /// Handler producing the reply.
        handler: EndpointHandler,
    },
}

impl Behavior {
    /// Returns the behavior name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UseExceptionPage => "use_exception_page",
            Self::UseRouting => "use_routing",
            Self::UseEndpoint { .. } => "use_endpoint",
        }
    }

    /// Returns the capability this behavior depends on, if any.
    #[must_use]
    pub const fn required_capability(&self) -> Option<Capability> {
        match self {
            Self::UseExceptionPage => None,
            Self::UseRouting | Self::UseEndpoint { .. } => Some(Capability::Routing),
        }
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseExceptionPage => f.write_str("UseExceptionPage"),
            Self::UseRouting => f.write_str("UseRouting"),
            Self::UseEndpoint { path, .. } => f
                .debug_struct("UseEndpoint")
                .field("path", path)
                .finish_non_exhaustive(),
        }
    }
}

/// Ordered behaviors plus registered capabilities.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfiguration {
    behaviors: Vec<Behavior>,
    capabilities: BTreeSet<Capability>,
}

impl PipelineConfiguration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a capability (builder pattern).
    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Registers [`Capability::Routing`].
    #[must_use]
    pub fn add_routing(self) -> Self {
        self.with_capability(Capability::Routing)
    }

    /// Appends a behavior (builder pattern).
    #[must_use]
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Appends [`Behavior::UseExceptionPage`].
    #[must_use]
    pub fn use_exception_page(self) -> Self {
        self.with_behavior(Behavior::UseExceptionPage)
    }

    /// Appends [`Behavior::UseRouting`].
    #[must_use]
    pub fn use_routing(self) -> Self {
        self.with_behavior(Behavior::UseRouting)
    }

    /// Appends a [`Behavior::UseEndpoint`] for `path`.
    #[must_use]
    pub fn map<F>(self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&TestRequest) -> Result<EndpointReply, Fault> + Send + Sync + 'static,
    {
        self.with_behavior(Behavior::UseEndpoint {
            path: path.into(),
            handler: Arc::new(handler),
        })
    }

    /// Returns the behaviors in declared order.
    #[must_use]
    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Returns true if `capability` is registered.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Iterates the registered capabilities.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    /// Checks that every behavior can resolve, in declared order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found: a missing capability,
    /// an endpoint declared before `use_routing`, an invalid path, or a
    /// duplicated path.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut routing_enabled = false;
        let mut paths = HashSet::new();

        for behavior in &self.behaviors {
            if let Some(capability) = behavior.required_capability() {
                if !self.has_capability(capability) {
                    return Err(ConfigurationError::MissingCapability {
                        behavior: behavior.name(),
                        capability,
                    });
                }
            }

            match behavior {
                Behavior::UseExceptionPage => {}
                Behavior::UseRouting => routing_enabled = true,
                Behavior::UseEndpoint { path, .. } => {
                    if !routing_enabled {
                        return Err(ConfigurationError::RoutingNotEnabled { path: path.clone() });
                    }
                    if let Err(reason) = check_literal_path(path) {
                        return Err(ConfigurationError::InvalidPath {
                            path: path.clone(),
                            reason,
                        });
                    }
                    if !paths.insert(path.as_str()) {
                        return Err(ConfigurationError::DuplicateEndpoint(path.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Endpoint paths are matched literally; capture syntax is not accepted.
fn check_literal_path(path: &str) -> Result<(), &'static str> {
    if !path.starts_with('/') {
        return Err("paths must start with '/'");
    }
    if path.contains(['{', '}']) {
        return Err("'{' and '}' are reserved for route captures");
    }
    if path.split('/').any(|segment| segment.starts_with([':', '*'])) {
        return Err("segments must not start with ':' or '*'");
    }
    Ok(())
}
