// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw message-file I/O for a router-owned mailbox directory.
//!
//! This is deliberately a separate, simpler sibling to
//! `patchboard_adapters::FiletalkAdapter` rather than a reuse of it: the
//! router's own files use the `msg_<timestamp>_<random>.json` naming scheme
//! spec.md §6 documents for the *router*, which differs from the
//! adapter's `.msg.json` suffix for IntraFlow's `filetalk{path}` endpoints.
//! Design note in DESIGN.md records the decision not to share a directory
//! (or a naming scheme) between the two.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use patchboard_core::Message;
use uuid::Uuid;

/// One message file discovered in a mailbox directory, named so callers can
/// both parse it and, on success, delete the exact path they read.
#[derive(Debug, Clone)]
pub struct MessageFile {
    pub path: PathBuf,
}

/// List every `*.json` file directly under `dir`, oldest filename first.
/// Temp files (`.`-prefixed, mid-write) are never matched since they don't
/// carry the `.json` suffix until the atomic rename in [`write_message`]
/// completes. A missing directory yields an empty list rather than an error.
pub fn list_message_files(dir: &Path) -> io::Result<Vec<MessageFile>> {
    let mut files = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .map(|path| MessageFile { path })
            .collect::<Vec<_>>(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Parse one message file's contents. Distinguishes an I/O failure (file
/// vanished, permission denied) from a parse failure (malformed JSON) so
/// callers can route the two to different counters.
pub enum ReadOutcome {
    Parsed(Message),
    Vanished,
    Malformed(serde_json::Error),
}

pub fn read_message(path: &Path) -> io::Result<ReadOutcome> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ReadOutcome::Vanished),
        Err(e) => return Err(e),
    };
    match serde_json::from_slice(&bytes) {
        Ok(message) => Ok(ReadOutcome::Parsed(message)),
        Err(source) => Ok(ReadOutcome::Malformed(source)),
    }
}

/// Delete a message file. A file already gone (another process raced us, or
/// this is the second delete attempt after a partial tick) is not an error.
pub fn delete_message(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Write `message` into `dir` under a fresh `msg_<timestamp>_<random>.json`
/// name, creating `dir` if it does not exist, via a sibling temp file plus
/// rename so a concurrent reader never observes a partial write.
///
/// Returns the final path.
pub fn write_message(dir: &Path, message: &Message) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    let filename = format!("msg_{millis:020}_{}.json", Uuid::new_v4());
    let final_path = dir.join(&filename);
    write_atomic(&final_path, message)?;
    Ok(final_path)
}

/// Write `message` to the exact path `at` (used for `ack-path`, which names
/// a specific file rather than a mailbox directory to drop a uniquely-named
/// file into).
pub fn write_message_at(at: &Path, message: &Message) -> io::Result<()> {
    if let Some(parent) = at.parent() {
        fs::create_dir_all(parent)?;
    }
    write_atomic(at, message)
}

pub(crate) fn write_atomic<T: serde::Serialize>(final_path: &Path, value: &T) -> io::Result<()> {
    let temp_name = format!(
        ".{}.tmp",
        final_path.file_name().and_then(|n| n.to_str()).unwrap_or("patchboard-write")
    );
    let temp_path = final_path.with_file_name(temp_name);
    let bytes = serde_json::to_vec(value).map_err(io::Error::other)?;
    fs::write(&temp_path, &bytes)?;
    fs::rename(&temp_path, final_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn write_then_list_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let message = Message::new("data", json!({"payload": "test123"}));
        let path = write_message(dir.path(), &message).unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("msg_"));

        let files = list_message_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        match read_message(&files[0].path).unwrap() {
            ReadOutcome::Parsed(parsed) => assert_eq!(parsed, message),
            _ => panic!("expected a parsed message"),
        }
    }

    #[test]
    fn missing_directory_lists_as_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(list_message_files(&missing).unwrap().is_empty());
    }

    #[test]
    fn malformed_file_is_reported_not_raised() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), b"not json").unwrap();
        let files = list_message_files(dir.path()).unwrap();
        assert!(matches!(read_message(&files[0].path).unwrap(), ReadOutcome::Malformed(_)));
    }

    #[test]
    fn delete_of_missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.json");
        assert!(delete_message(&path).is_ok());
    }

    #[test]
    fn write_message_at_writes_the_exact_path() {
        let dir = tempdir().unwrap();
        let at = dir.path().join("ack").join("request-1.json");
        let message = Message::new("ack", json!({"ok": true}));
        write_message_at(&at, &message).unwrap();
        assert!(at.exists());
    }
}
