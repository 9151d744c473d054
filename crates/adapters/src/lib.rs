// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! patchboard-adapters: how the three external-facing endpoint kinds
//! (`list{ref}`, `queue{ref}`, `filetalk{path}`) actually move messages.
//!
//! The original design dispatched on an endpoint's `"type"` string through a
//! dict of lambdas shared across every call site. Here each kind gets its own
//! [`EndpointBehavior`] impl, and the two free functions at the bottom of
//! this module are the only place that still pattern-matches on
//! [`EndpointSpec`](patchboard_core::EndpointSpec) — everywhere else in the
//! fabric calls through the trait.
//!
//! `component{id}` and `component{ref}` endpoints are deliberately not given
//! an `EndpointBehavior` impl: a component's inbox is pushed to directly by
//! the engine once it has resolved the id through the registry, since that
//! path already has the borrow it needs and doesn't benefit from going
//! through a trait object.

mod error;
mod filetalk;
mod mailbox;

pub use error::AdapterError;
pub use filetalk::FiletalkAdapter;

use patchboard_core::{EndpointSpec, Message};

/// Uniform drain/deliver surface over the endpoint kinds that have an
/// external-facing transport.
pub trait EndpointBehavior {
    /// Remove and return every message currently pending, oldest first.
    fn drain_all(&self) -> Result<Vec<Message>, AdapterError>;

    /// Hand a message to this endpoint for delivery.
    fn deliver(&self, message: &Message) -> Result<(), AdapterError>;
}

/// Drain whichever endpoint kind `endpoint` is, dispatching to its
/// [`EndpointBehavior`] impl.
///
/// # Errors
/// [`AdapterError::Unsupported`] for `component{id}`/`component{ref}`
/// endpoints, which the engine drains directly instead.
pub fn drain_endpoint(endpoint: &EndpointSpec) -> Result<Vec<Message>, AdapterError> {
    match endpoint {
        EndpointSpec::List(handle) => handle.drain_all(),
        EndpointSpec::Queue(handle) => handle.drain_all(),
        EndpointSpec::Filetalk(path) => FiletalkAdapter::new(path.clone()).drain_all(),
        EndpointSpec::Component(_) | EndpointSpec::ComponentRef(_) => {
            Err(AdapterError::Unsupported(endpoint.kind()))
        }
    }
}

/// Deliver `message` to whichever endpoint kind `endpoint` is.
///
/// # Errors
/// [`AdapterError::Unsupported`] for `component{id}`/`component{ref}`
/// endpoints, for the same reason as [`drain_endpoint`].
pub fn deliver_to_endpoint(endpoint: &EndpointSpec, message: &Message) -> Result<(), AdapterError> {
    match endpoint {
        EndpointSpec::List(handle) => handle.deliver(message),
        EndpointSpec::Queue(handle) => handle.deliver(message),
        EndpointSpec::Filetalk(path) => FiletalkAdapter::new(path.clone()).deliver(message),
        EndpointSpec::Component(_) | EndpointSpec::ComponentRef(_) => {
            Err(AdapterError::Unsupported(endpoint.kind()))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    //! Helpers for exercising [`EndpointBehavior`] without touching a real
    //! filesystem, in the style of `oj-adapters`'s `FakeNotifyAdapter`.

    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{AdapterError, EndpointBehavior, Message};

    /// An in-memory [`EndpointBehavior`] that records every delivered
    /// message and never errors, for asserting what an engine or daemon
    /// handed to an endpoint without needing a real list/queue/directory.
    #[derive(Clone, Default)]
    pub struct RecordingAdapter {
        delivered: Arc<Mutex<Vec<Message>>>,
    }

    impl RecordingAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn delivered(&self) -> Vec<Message> {
            self.delivered.lock().clone()
        }
    }

    impl EndpointBehavior for RecordingAdapter {
        fn drain_all(&self) -> Result<Vec<Message>, AdapterError> {
            Ok(Vec::new())
        }

        fn deliver(&self, message: &Message) -> Result<(), AdapterError> {
            self.delivered.lock().push(message.clone());
            Ok(())
        }
    }
}
