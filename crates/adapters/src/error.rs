// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use patchboard_core::EndpointKind;
use thiserror::Error;

/// Failures surfaced while draining or delivering through an
/// [`crate::EndpointBehavior`] implementation.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A filesystem operation failed for a reason expected to be transient
    /// (permission race, file vanished between list and read, disk full).
    /// Callers are expected to retry on the next poll rather than treat this
    /// as fatal.
    #[error("transient I/O error: {0}")]
    TransientIo(#[source] std::io::Error),

    /// A file under a filetalk directory was present but did not contain a
    /// well-formed message envelope.
    #[error("malformed message data in {path}: {source}")]
    Data { path: std::path::PathBuf, #[source] source: serde_json::Error },

    /// This endpoint kind has no adapter-level behavior; delivery and
    /// draining for it are handled directly by the engine or daemon instead.
    #[error("endpoint kind {0:?} is not drained or delivered through an adapter")]
    Unsupported(EndpointKind),
}
