// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DaemonError`: the umbrella failure type for the router's lifecycle
//! (spec.md §4.6), in the style of `oj-daemon::lifecycle::LifecycleError`
//! aggregating its causes.
//!
//! Only the lifecycle boundary (startup, shutdown) surfaces a typed error —
//! once the main loop is running, I/O failures during a delivery pass are
//! [`crate::control::ControlError`]-free by design: they are swallowed into
//! [`patchboard_wire::RouterStats`] counters per spec.md §7's propagation
//! policy ("the runtime loop swallows only `TransientIOError` and
//! `DataError`").

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to create project directory {path}: {source}")]
    CreateDir { path: PathBuf, #[source] source: std::io::Error },

    #[error("another patchboardd is already running against this project (lock held at {path})")]
    AlreadyRunning { path: PathBuf },

    #[error("failed to acquire router lock at {path}: {source}")]
    Lock { path: PathBuf, #[source] source: std::io::Error },

    #[error(transparent)]
    Storage(#[from] patchboard_storage::StorageError),

    #[error(transparent)]
    Control(#[from] crate::control::ControlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}
