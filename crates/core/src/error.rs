// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error taxonomy used at API boundaries throughout the fabric.
//!
//! `DataError`, `TransientIOError`, and `ActivationFault` are named here for
//! completeness of the taxonomy but are produced by `patchboard-adapters`,
//! `patchboard-engine`, and `patchboard-daemon` respectively, since only those
//! crates perform the I/O or invoke the activation callables that can fail
//! that way.

use thiserror::Error;

/// Failures raised at the core API surface: wiring, route construction, and
/// endpoint binding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed or missing required inputs at an API boundary: wiring
    /// committed without a source/destination, a persistent route requested
    /// with an anonymous endpoint, or an unknown endpoint type.
    #[error("invocation error: {0}")]
    Invocation(String),

    /// An endpoint names a component that is not currently registered.
    #[error("endpoint not bound: component {0:?} is not registered")]
    EndpointNotBound(String),

    /// A route was marked persistent but one of its endpoints has no stable
    /// name (component id or filesystem path).
    #[error("route cannot be made persistent: endpoint is not nameable")]
    NotPersistable,

    /// The endpoint-type tag on a route spec does not match any known
    /// endpoint kind.
    #[error("unknown endpoint type: {0}")]
    UnknownEndpointType(String),
}
