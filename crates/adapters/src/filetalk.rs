// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The filetalk adapter: a `filetalk{path}` endpoint is a directory where
//! each pending message is one file.
//!
//! Modeled on the original `filetalk` module's `write`/`read`/`readrm`
//! primitives and its `next_tmpfile_path` naming scheme (a counter plus a
//! process-start timestamp, so concurrently-running processes never collide
//! on a filename). We widen that scheme to a millisecond timestamp prefix
//! plus a UUID suffix so that (a) sorting filenames lexicographically
//! approximates arrival order across writers, and (b) two processes racing
//! to write in the same millisecond still can't collide. Unlike the
//! original's direct `json.dump` onto the final path, delivery here writes
//! to a sibling temp file and renames it into place, so a concurrent reader
//! never observes a partially-written file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use patchboard_core::Message;
use tracing::warn;
use uuid::Uuid;

use crate::{AdapterError, EndpointBehavior};

const MESSAGE_SUFFIX: &str = ".msg.json";

/// A `filetalk{path}` endpoint bound to a specific directory.
///
/// Cheap to construct; holds only the path, not a long-lived file handle, so
/// a fresh adapter can be built per operation without cost.
#[derive(Debug, Clone)]
pub struct FiletalkAdapter {
    dir: PathBuf,
}

impl FiletalkAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensure the directory exists, creating it (and parents) if needed.
    pub fn ensure_dir(&self) -> Result<(), AdapterError> {
        fs::create_dir_all(&self.dir).map_err(AdapterError::TransientIo)
    }

    fn message_files(&self) -> Result<Vec<PathBuf>, AdapterError> {
        let mut names = match fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(MESSAGE_SUFFIX)))
                .collect::<Vec<_>>(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AdapterError::TransientIo(e)),
        };
        names.sort();
        Ok(names)
    }
}

impl EndpointBehavior for FiletalkAdapter {
    /// List every message file, oldest filename first, parse each as a
    /// [`Message`], and remove it from the directory — the `readrm` step of
    /// the original design, applied per file.
    ///
    /// A file that vanishes between listing and reading (another process
    /// raced us) is skipped rather than treated as an error: filetalk was
    /// explicitly never race-condition safe, and a vanished file just means
    /// someone else already claimed it.
    ///
    /// A file that fails to parse is presumed mid-write by a concurrent
    /// writer: it is left in place for a retry on the next drain and does not
    /// abort the rest of the batch.
    fn drain_all(&self) -> Result<Vec<Message>, AdapterError> {
        let mut out = Vec::new();
        for path in self.message_files()? {
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(AdapterError::TransientIo(e)),
            };
            let message: Message = match serde_json::from_slice(&bytes) {
                Ok(message) => message,
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "leaving unparseable filetalk message for retry");
                    continue;
                }
            };
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(AdapterError::TransientIo(e)),
            }
            out.push(message);
        }
        Ok(out)
    }

    /// Write `message` to a fresh file in the directory: serialize to a temp
    /// file alongside the target, then rename into place.
    fn deliver(&self, message: &Message) -> Result<(), AdapterError> {
        self.ensure_dir()?;
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let filename = format!("{millis:020}-{}{MESSAGE_SUFFIX}", Uuid::new_v4());
        let final_path = self.dir.join(&filename);
        let temp_path = self.dir.join(format!(".{filename}.tmp"));

        let bytes = serde_json::to_vec(message)
            .map_err(|source| AdapterError::Data { path: final_path.clone(), source })?;
        fs::write(&temp_path, &bytes).map_err(AdapterError::TransientIo)?;
        fs::rename(&temp_path, &final_path).map_err(AdapterError::TransientIo)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "filetalk_tests.rs"]
mod tests;
