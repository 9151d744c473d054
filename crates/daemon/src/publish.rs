// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `publish_state_if_dirty()`: rewriting `routes.json`/`status.json` and
//! emitting the `notice` lifecycle message (spec.md §4.6 main loop step 3).
//!
//! Both files are written only when something actually changed this tick —
//! a quiet router should not thrash its project directory's mtimes every
//! `delay_seconds`.

use std::io;
use std::path::Path;

use patchboard_core::Message;
use patchboard_storage::FsRoutingTable;
use patchboard_wire::{ProjectLayout, RouteEntry, RouterStats, RoutesFile, StatusFile};
use serde_json::json;

use crate::mailbox;

/// Current time as decimal seconds since the epoch, six fractional digits —
/// matching `patchboard_core::Message::timestamp`'s format, since `routes.json`
/// and `status.json` timestamps are read alongside message timestamps by the
/// same operator.
pub fn decimal_seconds_utc_now() -> String {
    let now = chrono::Utc::now();
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}

fn routes_file(routes: &FsRoutingTable) -> RoutesFile {
    let entries = routes
        .routes()
        .iter()
        .map(|r| RouteEntry {
            source_folder: r.source_folder.clone(),
            source_channel: r.source_channel.clone(),
            destination_channel: r.destination_channel.clone(),
            destination_folder: r.destination_folder.clone(),
        })
        .collect();
    RoutesFile::new(decimal_seconds_utc_now(), entries)
}

/// Write `routes.json` unconditionally.
pub fn publish_routes(layout: &ProjectLayout, routes: &FsRoutingTable) -> io::Result<()> {
    mailbox::write_atomic(&layout.routes_json(), &routes_file(routes))
}

/// Write `status.json` unconditionally.
pub fn publish_status(layout: &ProjectLayout, status: &StatusFile) -> io::Result<()> {
    mailbox::write_atomic(&layout.status_json(), status)
}

/// Drop a lifecycle message (`startup`, `shutdown`, `notice`) into the
/// router's own `OUTBOX`.
pub fn emit_lifecycle_message(layout: &ProjectLayout, channel: &str, signal: serde_json::Value) -> io::Result<()> {
    mailbox::write_message(&layout.outbox(), &Message::new(channel, signal)).map(|_| ())
}

/// Apply one tick's worth of changes: bump `status.tick`, fold in the tick's
/// stats delta, and rewrite whichever published file actually changed.
///
/// `routes_changed` is true iff a `link`/`unlink` was processed this tick.
/// `stats_delta` is this tick's incremental [`RouterStats`] from
/// [`crate::delivery::do_delivery_pass`] — a non-zero delta is the signal
/// that `status.json` is worth rewriting (and that `last_change` advances).
pub fn publish_state_if_dirty(
    layout: &ProjectLayout,
    routes: &FsRoutingTable,
    status: &mut StatusFile,
    routes_changed: bool,
    stats_delta: RouterStats,
) -> io::Result<()> {
    status.tick += 1;

    if routes_changed {
        publish_routes(layout, routes)?;
        emit_lifecycle_message(layout, "notice", json!({"reason": "routes_changed"}))?;
    }

    if !stats_delta.is_zero() {
        status.stats += stats_delta;
        status.last_change = decimal_seconds_utc_now();
    }

    publish_status(layout, status)
}
