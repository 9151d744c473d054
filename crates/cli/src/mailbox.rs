// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writing a control message onto a router's `INBOX`, and reading back an
//! `ack-path` file it wrote in response.
//!
//! A thin CLI-side mirror of `patchboard-daemon::mailbox`'s atomic
//! write — this crate deliberately does not depend on `patchboard-daemon`
//! (the CLI is a filesystem client, not a daemon component), so it gets its
//! own small copy of "write via a sibling temp file, then rename."

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use patchboard_core::Message;
use uuid::Uuid;

fn write_atomic(final_path: &Path, message: &Message) -> io::Result<()> {
    let temp_name = format!(
        ".{}.tmp",
        final_path.file_name().and_then(|n| n.to_str()).unwrap_or("patchboard-cli-write")
    );
    let temp_path = final_path.with_file_name(temp_name);
    let bytes = serde_json::to_vec(message).map_err(io::Error::other)?;
    fs::write(&temp_path, &bytes)?;
    fs::rename(&temp_path, final_path)?;
    Ok(())
}

/// Drop `message` into `inbox` under a fresh `msg_<timestamp>_<random>.json`
/// name, creating `inbox` if it does not exist yet.
pub fn submit(inbox: &Path, message: &Message) -> io::Result<()> {
    fs::create_dir_all(inbox)?;
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    let filename = format!("msg_{millis:020}_{}.json", Uuid::new_v4());
    write_atomic(&inbox.join(filename), message)
}

/// Poll for `ack_path` to appear, up to `timeout`, and parse it as a
/// [`patchboard_wire`]-shaped acknowledgement. Returns `None` on timeout.
pub fn await_ack(ack_path: &Path, timeout: std::time::Duration, poll_interval: std::time::Duration) -> Option<Message> {
    let deadline = std::time::Instant::now() + timeout;
    loop {
        if let Ok(bytes) = fs::read(ack_path) {
            if let Ok(message) = serde_json::from_slice(&bytes) {
                return Some(message);
            }
        }
        if std::time::Instant::now() >= deadline {
            return None;
        }
        std::thread::sleep(poll_interval);
    }
}
