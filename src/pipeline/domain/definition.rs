//! Static source task descriptors.

use super::{SourceRequest, TaskName};
use crate::address::domain::{AddressCandidate, Postcode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Request-shaping strategy of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Unauthenticated GET, or GET with the key in the query string.
    SimpleGet,
    /// GET carrying required headers or basic credentials.
    HeaderAuthenticatedGet,
    /// The single task awaited before fan-out.
    Prerequisite,
    /// No data source; settles with an empty payload and performs no I/O.
    Stub,
}

impl TaskKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SimpleGet => "simple_get",
            Self::HeaderAuthenticatedGet => "header_authenticated_get",
            Self::Prerequisite => "prerequisite",
            Self::Stub => "stub",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs available to an endpoint builder.
#[derive(Debug, Clone, Copy)]
pub struct TaskInput<'a> {
    /// Postcode the run was opened for.
    pub postcode: &'a Postcode,
    /// Address selected for the run.
    pub address: &'a AddressCandidate,
    /// Payload of the prerequisite task, when it succeeded.
    ///
    /// Always `None` while the prerequisite itself runs.
    pub prerequisite: Option<&'a Value>,
}

/// Function building the request for one task.
pub type EndpointBuilder = Arc<dyn Fn(&TaskInput<'_>) -> SourceRequest + Send + Sync>;

/// Immutable descriptor of one source task.
#[derive(Clone)]
pub struct TaskDefinition {
    name: TaskName,
    kind: TaskKind,
    endpoint: Option<EndpointBuilder>,
}

impl TaskDefinition {
    /// Defines a plain GET task.
    #[must_use]
    pub fn simple_get(
        name: TaskName,
        endpoint: impl Fn(&TaskInput<'_>) -> SourceRequest + Send + Sync + 'static,
    ) -> Self {
        Self::with_endpoint(name, TaskKind::SimpleGet, endpoint)
    }

    /// Defines a GET task that sends authentication headers.
    #[must_use]
    pub fn header_authenticated_get(
        name: TaskName,
        endpoint: impl Fn(&TaskInput<'_>) -> SourceRequest + Send + Sync + 'static,
    ) -> Self {
        Self::with_endpoint(name, TaskKind::HeaderAuthenticatedGet, endpoint)
    }

    /// Defines the prerequisite task.
    #[must_use]
    pub fn prerequisite(
        name: TaskName,
        endpoint: impl Fn(&TaskInput<'_>) -> SourceRequest + Send + Sync + 'static,
    ) -> Self {
        Self::with_endpoint(name, TaskKind::Prerequisite, endpoint)
    }

    /// Defines a stub task with no data source.
    #[must_use]
    pub const fn stub(name: TaskName) -> Self {
        Self {
            name,
            kind: TaskKind::Stub,
            endpoint: None,
        }
    }

    fn with_endpoint(
        name: TaskName,
        kind: TaskKind,
        endpoint: impl Fn(&TaskInput<'_>) -> SourceRequest + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            kind,
            endpoint: Some(Arc::new(endpoint)),
        }
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the task kind.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Builds the request for `input`.
    ///
    /// Returns `None` for stub tasks.
    #[must_use]
    pub fn request(&self, input: &TaskInput<'_>) -> Option<SourceRequest> {
        self.endpoint.as_ref().map(|build| build(input))
    }
}

impl fmt::Debug for TaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
