// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! patchboard-core: the shared data model of the Patchboard message-routing fabric.
//!
//! This crate holds only types and validation logic that both the in-process
//! IntraFlow engine and the filesystem router daemon agree on: the message
//! envelope, the endpoint-spec sum type, the component registry, and the
//! routing table. It does not know how to actually move bytes across a
//! filesystem or a socket — that is [`patchboard_adapters`]'s job.

pub mod component;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod refs;
pub mod registry;
pub mod route;

pub use component::{ActivationContext, ActivationFn, AdapterKind, Component, ComponentId};
pub use endpoint::{EndpointKind, EndpointSpec};
pub use error::CoreError;
pub use message::Message;
pub use refs::{ComponentHandle, ListHandle, QueueHandle};
pub use registry::ComponentRegistry;
pub use route::{Route, RoutingTable};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
