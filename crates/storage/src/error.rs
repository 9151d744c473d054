// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Failures opening, appending to, or reading the event log.
///
/// Corrupt *lines* are never an error (see [`crate::log::EventLog`]'s module
/// docs) — this type only covers failures the log itself cannot route
/// around: the file won't open, a write or flush fails, or a backup rotation
/// fails.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("event log I/O error at {path}: {source}")]
    Io { path: std::path::PathBuf, #[source] source: std::io::Error },

    #[error("failed to serialize event: {0}")]
    Encode(#[source] serde_json::Error),
}
