// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-inbox processing: `link`, `unlink`, `quit` (spec.md §4.6 step 2).
//!
//! Every accepted `link`/`unlink` is durable before anything else happens:
//! the event is appended to `events.jsonl` first, then folded into the
//! in-memory [`FsRoutingTable`] via the exact same [`FsRoutingTable::apply`]
//! replay would use — so a crash between the two never desyncs the table
//! from what a restart would rebuild, and live "add the same link twice"
//! is deduplicated by the identical rule replay uses (see DESIGN.md for the
//! open-question decision this resolves).

use std::path::{Path, PathBuf};

use patchboard_storage::{EventLog, FsRoutingTable, RouterEvent};
use patchboard_wire::{AckMessage, ControlSignal, LinkRequest};
use thiserror::Error;
use tracing::{info, warn};

use crate::mailbox::{self, MessageFile, ReadOutcome};

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("event log error: {0}")]
    Storage(#[from] patchboard_storage::StorageError),
}

/// Canonicalize a folder path to absolute, symlink-resolved form per spec.md
/// §4.6. A path that does not exist yet (a destination folder the operator
/// hasn't created) cannot have its symlinks resolved, so this falls back to
/// lexically absolutizing it against the current directory instead of
/// failing the whole `link` request — the missing folder still surfaces
/// later, as `skipped_missing_folder` at delivery time, which is where
/// spec.md §4.6 says a missing destination should be made visible.
fn canonicalize_best_effort(path: &str) -> PathBuf {
    let raw = PathBuf::from(path);
    if let Ok(canonical) = std::fs::canonicalize(&raw) {
        return canonical;
    }
    if raw.is_absolute() {
        return raw;
    }
    std::env::current_dir().map(|cwd| cwd.join(&raw)).unwrap_or(raw)
}

fn canonicalize_request(request: &LinkRequest) -> (String, String) {
    (
        canonicalize_best_effort(&request.source_folder).to_string_lossy().into_owned(),
        canonicalize_best_effort(&request.destination_folder).to_string_lossy().into_owned(),
    )
}

/// Outcome of draining and dispatching one batch of `INBOX` control messages.
#[derive(Debug, Default)]
pub struct ControlOutcome {
    pub routes_changed: bool,
    pub quit_requested: bool,
}

/// Drain `inbox` and dispatch each message by channel. Malformed control
/// payloads and unrecognized channels are logged and skipped rather than
/// aborting the batch — a bad control message is the caller's mistake, not
/// grounds to stop routing everyone else's mail.
pub fn process_control_inputs(
    inbox: &Path,
    routes: &mut FsRoutingTable,
    log: &mut EventLog,
) -> std::io::Result<ControlOutcome> {
    let mut outcome = ControlOutcome::default();

    for MessageFile { path } in mailbox::list_message_files(inbox)? {
        let message = match mailbox::read_message(&path)? {
            ReadOutcome::Parsed(message) => message,
            ReadOutcome::Vanished => continue,
            ReadOutcome::Malformed(source) => {
                warn!(path = %path.display(), error = %source, "leaving unreadable control message for retry");
                continue;
            }
        };

        let signal = match ControlSignal::from_message(&message) {
            Ok(Some(signal)) => signal,
            Ok(None) => {
                warn!(channel = %message.channel, "dropping control message on unrecognized channel");
                mailbox::delete_message(&path).ok();
                continue;
            }
            Err(source) => {
                warn!(channel = %message.channel, error = %source, "dropping malformed control message payload");
                mailbox::delete_message(&path).ok();
                continue;
            }
        };

        match dispatch(signal, routes, log) {
            Ok(dispatched) => {
                outcome.routes_changed |= dispatched.routes_changed;
                outcome.quit_requested |= dispatched.quit_requested;
            }
            Err(source) => warn!(error = %source, "failed to apply control message"),
        }

        mailbox::delete_message(&path)?;
    }

    Ok(outcome)
}

fn dispatch(signal: ControlSignal, routes: &mut FsRoutingTable, log: &mut EventLog) -> Result<ControlOutcome, ControlError> {
    match signal {
        ControlSignal::Link(request) => {
            let (source_folder, destination_folder) = canonicalize_request(&request);
            let event = RouterEvent::route_added(
                source_folder,
                request.source_channel.clone(),
                request.destination_channel.clone(),
                destination_folder,
            );
            log.append(&event)?;
            routes.apply(&event);
            info!(
                source_folder = %request.source_folder,
                source_channel = %request.source_channel,
                destination_folder = %request.destination_folder,
                destination_channel = %request.destination_channel,
                "linked route"
            );
            acknowledge(&request.ack_path, "link");
            Ok(ControlOutcome { routes_changed: true, quit_requested: false })
        }
        ControlSignal::Unlink(request) => {
            let (source_folder, destination_folder) = canonicalize_request(&request);
            let event = RouterEvent::route_removed(
                source_folder,
                request.source_channel.clone(),
                request.destination_channel.clone(),
                destination_folder,
            );
            log.append(&event)?;
            routes.apply(&event);
            info!(
                source_folder = %request.source_folder,
                source_channel = %request.source_channel,
                destination_folder = %request.destination_folder,
                destination_channel = %request.destination_channel,
                "unlinked route"
            );
            acknowledge(&request.ack_path, "unlink");
            Ok(ControlOutcome { routes_changed: true, quit_requested: false })
        }
        ControlSignal::Quit => {
            info!("quit requested via control inbox");
            Ok(ControlOutcome { routes_changed: false, quit_requested: true })
        }
    }
}

fn acknowledge(ack_path: &Option<String>, channel: &str) {
    let Some(ack_path) = ack_path else { return };
    let ack = AckMessage::ok(channel);
    let message = patchboard_core::Message::new("ack", serde_json::to_value(&ack).unwrap_or_default());
    if let Err(source) = mailbox::write_message_at(Path::new(ack_path), &message) {
        warn!(path = %ack_path, error = %source, "failed to write control-request acknowledgement");
    }
}
