// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The "la-la" delivery pass: list-all-then-copy-all-then-delete-all
//! (spec.md §4.6).
//!
//! A pass is plan, then copy, then delete, over a fixed set of source
//! folders: every distinct `source-folder` in the routing table plus the
//! router's own `OUTBOX` (or, while draining, `OUTBOX` alone). Nothing here
//! mutates the routing table — that only happens between passes, in
//! [`crate::control`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use patchboard_core::route::WILDCARD_CHANNEL;
use patchboard_core::Message;
use patchboard_storage::FsRoutingTable;
use patchboard_wire::RouterStats;
use tracing::warn;

use crate::mailbox::{self, MessageFile, ReadOutcome};

/// One file discovered in a source folder, already matched against the
/// routing table.
struct PlannedMessage {
    source_path: PathBuf,
    copies: Vec<PlannedCopy>,
    /// True if no route matched this message's channel at all (as opposed
    /// to matching but every copy failing).
    unrouted: bool,
}

struct PlannedCopy {
    destination_folder: PathBuf,
    rewritten: Message,
}

/// Build the set of source folders a pass should drain from: every distinct
/// `source-folder` named in the routing table, plus `router_outbox` (always
/// included — even while draining, since the drain sequence sources *only*
/// from the router's own outbox).
fn active_source_folders(routes: &FsRoutingTable, router_outbox: &Path, draining: bool) -> Vec<PathBuf> {
    if draining {
        return vec![router_outbox.to_path_buf()];
    }
    let mut folders: BTreeSet<PathBuf> = routes.routes().iter().map(|r| PathBuf::from(&r.source_folder)).collect();
    folders.insert(router_outbox.to_path_buf());
    folders.into_iter().collect()
}

/// Plan phase: for one source folder, list its message files and match each
/// against the routing table. `budget` bounds how many *planned copies*
/// this call may add before it stops picking up new source messages,
/// implementing `router.max_deliveries_per_tick`; a message is only ever
/// fully planned or left untouched, never partially planned.
fn plan_folder(
    routes: &FsRoutingTable,
    folder: &Path,
    budget: &mut usize,
    stats: &mut RouterStats,
) -> std::io::Result<Vec<PlannedMessage>> {
    let folder_str = folder.to_string_lossy().into_owned();
    let mut planned = Vec::new();

    for MessageFile { path } in mailbox::list_message_files(folder)? {
        if *budget == 0 {
            break;
        }

        let message = match mailbox::read_message(&path)? {
            ReadOutcome::Parsed(message) => message,
            ReadOutcome::Vanished => continue,
            ReadOutcome::Malformed(source) => {
                warn!(path = %path.display(), error = %source, "leaving unreadable router message for retry");
                stats.skipped_unreadable += 1;
                continue;
            }
        };

        let destinations: Vec<&patchboard_storage::FsRoute> = routes
            .routes()
            .iter()
            .filter(|r| {
                r.source_folder == folder_str && (r.source_channel == WILDCARD_CHANNEL || r.source_channel == message.channel)
            })
            .collect();

        stats.seen += 1;

        if destinations.is_empty() {
            planned.push(PlannedMessage { source_path: path, copies: Vec::new(), unrouted: true });
            continue;
        }

        if destinations.len() > *budget {
            // Not enough budget left to plan every copy for this message;
            // leave it untouched for the next tick rather than deliver a
            // partial fanout.
            break;
        }
        *budget -= destinations.len();

        let copies = destinations
            .into_iter()
            .map(|route| PlannedCopy {
                destination_folder: PathBuf::from(&route.destination_folder),
                rewritten: message.rewritten(route.destination_channel.clone()),
            })
            .collect();

        planned.push(PlannedMessage { source_path: path, copies, unrouted: false });
    }

    Ok(planned)
}

/// Copy phase: write every planned copy. A destination folder that does not
/// exist is a routing error made visible via `skipped_missing_folder`, never
/// silently created.
fn copy_phase(planned: &[PlannedMessage], stats: &mut RouterStats) -> Vec<bool> {
    planned
        .iter()
        .map(|message| {
            if message.unrouted {
                return true;
            }
            let mut all_ok = true;
            for copy in &message.copies {
                if !copy.destination_folder.is_dir() {
                    stats.skipped_missing_folder += 1;
                    all_ok = false;
                    continue;
                }
                match mailbox::write_message(&copy.destination_folder, &copy.rewritten) {
                    Ok(_) => stats.delivered += 1,
                    Err(source) => {
                        warn!(
                            destination = %copy.destination_folder.display(),
                            error = %source,
                            "transient I/O error delivering router message"
                        );
                        all_ok = false;
                    }
                }
            }
            all_ok
        })
        .collect()
}

/// Delete phase: remove a source file iff it was unrouted-and-discard-enabled,
/// or every planned copy for it succeeded. Partial success never deletes —
/// the source survives for a retry on the next tick.
fn delete_phase(planned: &[PlannedMessage], all_copies_ok: &[bool], discard_unrouted: bool, stats: &mut RouterStats) {
    for (message, &copies_ok) in planned.iter().zip(all_copies_ok) {
        let should_delete = if message.unrouted {
            if discard_unrouted {
                stats.discarded_unrouted += 1;
                true
            } else {
                false
            }
        } else {
            copies_ok
        };

        if should_delete {
            if let Err(source) = mailbox::delete_message(&message.source_path) {
                warn!(path = %message.source_path.display(), error = %source, "transient I/O error deleting delivered router message");
                continue;
            }
            stats.deleted += 1;
        }
    }
}

/// Run one full delivery pass over every active source folder.
///
/// Returns the delta counters this pass produced (callers accumulate them
/// into the daemon's running [`RouterStats`] total).
pub fn do_delivery_pass(
    routes: &FsRoutingTable,
    router_outbox: &Path,
    discard_unrouted: bool,
    max_deliveries_per_tick: usize,
    draining: bool,
) -> std::io::Result<RouterStats> {
    let mut stats = RouterStats::default();
    let mut budget = max_deliveries_per_tick;

    for folder in active_source_folders(routes, router_outbox, draining) {
        if budget == 0 {
            break;
        }
        let planned = plan_folder(routes, &folder, &mut budget, &mut stats)?;
        let copies_ok = copy_phase(&planned, &mut stats);
        delete_phase(&planned, &copies_ok, discard_unrouted, &mut stats);
    }

    Ok(stats)
}

/// True if a further draining pass would still find at least one
/// route-matching message in `router_outbox` — the condition spec.md §4.6's
/// shutdown sequence loops on ("no further deliverable messages").
pub fn outbox_has_deliverable_messages(routes: &FsRoutingTable, router_outbox: &Path) -> std::io::Result<bool> {
    let folder_str = router_outbox.to_string_lossy().into_owned();
    for MessageFile { path } in mailbox::list_message_files(router_outbox)? {
        if let ReadOutcome::Parsed(message) = mailbox::read_message(&path)? {
            let matched = routes
                .routes()
                .iter()
                .any(|r| r.source_folder == folder_str && (r.source_channel == WILDCARD_CHANNEL || r.source_channel == message.channel));
            if matched {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
