// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `EndpointSpec`: the tagged sum type every route's source and destination
//! is built from.
//!
//! The original design passed endpoints around as untagged dicts
//! (`{"type": "component", "id": ...}` vs `{"type": "list", "ref": ...}`) and
//! dispatched on `spec["type"]` with a dict of lambdas. Replacing that with a
//! closed enum moves the "is this a known endpoint type" check to
//! construction time and lets the compiler enforce that every variant is
//! handled wherever behavior depends on endpoint kind.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::component::ComponentId;
use crate::refs::{ComponentHandle, ListHandle, QueueHandle};

/// A routable endpoint: the source or destination of a [`crate::route::Route`].
///
/// Equality follows the endpoint's own identity rule: [`EndpointSpec::Component`]
/// and [`EndpointSpec::Filetalk`] compare by the name they carry (two specs
/// naming the same component or path are the same endpoint, even freshly
/// constructed); the three ref-carrying variants compare by pointer identity
/// via the handle's own `PartialEq` impl, so two handles are only equal if
/// one was cloned from the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointSpec {
    /// `component{id}`: a named component, resolved through the registry at
    /// use time.
    Component(ComponentId),
    /// `component{ref}`: an anonymous component bound directly by handle.
    ComponentRef(ComponentHandle),
    /// `list{ref}`: an anonymous ordered mailbox.
    List(ListHandle),
    /// `queue{ref}`: an anonymous FIFO mailbox.
    Queue(QueueHandle),
    /// `filetalk{path}`: a directory mirrored by the filetalk adapter.
    Filetalk(PathBuf),
}

/// The endpoint-kind tag, used for `kind` fields in on-disk/wire schemas and
/// error messages without dragging the handle types along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Component,
    ComponentRef,
    List,
    Queue,
    Filetalk,
}

impl EndpointSpec {
    pub fn kind(&self) -> EndpointKind {
        match self {
            EndpointSpec::Component(_) => EndpointKind::Component,
            EndpointSpec::ComponentRef(_) => EndpointKind::ComponentRef,
            EndpointSpec::List(_) => EndpointKind::List,
            EndpointSpec::Queue(_) => EndpointKind::Queue,
            EndpointSpec::Filetalk(_) => EndpointKind::Filetalk,
        }
    }

    /// True if this endpoint must be resolved through the
    /// [`crate::registry::ComponentRegistry`] at use time rather than used
    /// directly, i.e. it names something instead of holding it.
    pub fn requires_ref(&self) -> bool {
        matches!(self, EndpointSpec::Component(_))
    }

    /// True if this endpoint has a stable name an event log can replay a
    /// route against — a precondition for `persistent: true` routes.
    pub fn is_persistable(&self) -> bool {
        matches!(self, EndpointSpec::Component(_) | EndpointSpec::Filetalk(_))
    }

    /// The stable name this endpoint would be addressed by in a persisted
    /// route, if it has one.
    pub fn stable_name(&self) -> Option<String> {
        match self {
            EndpointSpec::Component(id) => Some(id.as_str().to_string()),
            EndpointSpec::Filetalk(path) => Some(path.to_string_lossy().into_owned()),
            _ => None,
        }
    }
}

impl From<ComponentId> for EndpointSpec {
    fn from(id: ComponentId) -> Self {
        EndpointSpec::Component(id)
    }
}

impl From<ComponentHandle> for EndpointSpec {
    fn from(handle: ComponentHandle) -> Self {
        EndpointSpec::ComponentRef(handle)
    }
}

impl From<ListHandle> for EndpointSpec {
    fn from(handle: ListHandle) -> Self {
        EndpointSpec::List(handle)
    }
}

impl From<QueueHandle> for EndpointSpec {
    fn from(handle: QueueHandle) -> Self {
        EndpointSpec::Queue(handle)
    }
}

impl From<PathBuf> for EndpointSpec {
    fn from(path: PathBuf) -> Self {
        EndpointSpec::Filetalk(path)
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
