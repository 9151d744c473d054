// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error taxonomy at the IntraFlow boundary, aggregating
//! [`patchboard_core::CoreError`] and [`patchboard_adapters::AdapterError`]
//! the way `oj-daemon::lifecycle::LifecycleError` aggregates its causes.

use patchboard_adapters::AdapterError;
use patchboard_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Wiring(#[from] CoreError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// A component's activation callable panicked. IntraFlow never catches
    /// this internally for recovery purposes — it is only converted to a
    /// typed error at the `run`/`run_cycle` boundary so the caller can
    /// decide what "recover" means for their component graph.
    #[error("component {component} panicked during activation: {message}")]
    ActivationFault { component: String, message: String },
}
