// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four event kinds persisted to `events.jsonl`, and the deterministic
//! fold that replays them into a [`crate::FsRoutingTable`].

use serde::{Deserialize, Serialize};

/// Current time as decimal seconds since the epoch, six fractional digits —
/// the same string format `patchboard-core::Message::timestamp` uses, so a
/// `ts_utc` and a message `timestamp` sort and compare identically wherever
/// both appear in the same log. Built on `chrono` rather than duplicating the
/// core crate's private helper, since this crate deliberately does not
/// depend on `patchboard-core` (see crate docs).
fn decimal_seconds_utc_now() -> String {
    let now = chrono::Utc::now();
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}

/// One line of `events.jsonl`.
///
/// Serialized with an internal `event` tag matching the schema exactly:
/// `{"event": "route_added", "ts_utc": "...", "source-folder": "...", ...}`.
/// `ts_utc` is a decimal-seconds-since-epoch string, not an RFC3339
/// timestamp — the schema calls it out as such, and it matches the format
/// `patchboard-core::Message::timestamp` already uses. Unknown tags
/// deserialize-fail at the single-line level, which
/// [`crate::log::EventLog::entries_after`] turns into a skip rather than a
/// hard error — "Unknown event types are skipped (forward compatibility)".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RouterEvent {
    Startup { ts_utc: String },
    Shutdown { ts_utc: String },
    RouteAdded {
        ts_utc: String,
        #[serde(rename = "source-folder")]
        source_folder: String,
        #[serde(rename = "source-channel")]
        source_channel: String,
        #[serde(rename = "destination-channel")]
        destination_channel: String,
        #[serde(rename = "destination-folder")]
        destination_folder: String,
    },
    RouteRemoved {
        ts_utc: String,
        #[serde(rename = "source-folder")]
        source_folder: String,
        #[serde(rename = "source-channel")]
        source_channel: String,
        #[serde(rename = "destination-channel")]
        destination_channel: String,
        #[serde(rename = "destination-folder")]
        destination_folder: String,
    },
}

impl RouterEvent {
    pub fn route_added(
        source_folder: impl Into<String>,
        source_channel: impl Into<String>,
        destination_channel: impl Into<String>,
        destination_folder: impl Into<String>,
    ) -> Self {
        Self::RouteAdded {
            ts_utc: decimal_seconds_utc_now(),
            source_folder: source_folder.into(),
            source_channel: source_channel.into(),
            destination_channel: destination_channel.into(),
            destination_folder: destination_folder.into(),
        }
    }

    pub fn route_removed(
        source_folder: impl Into<String>,
        source_channel: impl Into<String>,
        destination_channel: impl Into<String>,
        destination_folder: impl Into<String>,
    ) -> Self {
        Self::RouteRemoved {
            ts_utc: decimal_seconds_utc_now(),
            source_folder: source_folder.into(),
            source_channel: source_channel.into(),
            destination_channel: destination_channel.into(),
            destination_folder: destination_folder.into(),
        }
    }

    pub fn startup() -> Self {
        Self::Startup { ts_utc: decimal_seconds_utc_now() }
    }

    pub fn shutdown() -> Self {
        Self::Shutdown { ts_utc: decimal_seconds_utc_now() }
    }
}

/// A durable routing wire: one folder/channel pair routed to another.
///
/// This is the daemon's on-disk routing unit (folder paths, not the
/// typed [`patchboard_core::EndpointSpec`] IntraFlow uses in-process) — see
/// the crate-level docs for why the two don't share a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsRoute {
    pub source_folder: String,
    pub source_channel: String,
    pub destination_channel: String,
    pub destination_folder: String,
}

/// The in-memory routing table rebuilt by replaying `events.jsonl`.
///
/// `route_added` is folded idempotently (a structurally identical wire is
/// not duplicated); `route_removed` ignores a miss — both per spec.md §4.7's
/// replay invariants, which place the deduplication at this replay layer
/// rather than at live mutation time (unlike `patchboard-core::RoutingTable`,
/// whose `add_route` permits live structural duplicates; these are two
/// different concerns living at two different layers on purpose, see
/// DESIGN.md).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FsRoutingTable {
    routes: Vec<FsRoute>,
}

impl FsRoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> &[FsRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Apply one event's effect on the table. `Startup`/`Shutdown` are
    /// lifecycle markers with no effect on routing and are ignored here.
    pub fn apply(&mut self, event: &RouterEvent) {
        match event {
            RouterEvent::Startup { .. } | RouterEvent::Shutdown { .. } => {}
            RouterEvent::RouteAdded { source_folder, source_channel, destination_channel, destination_folder, .. } => {
                let route = FsRoute {
                    source_folder: source_folder.clone(),
                    source_channel: source_channel.clone(),
                    destination_channel: destination_channel.clone(),
                    destination_folder: destination_folder.clone(),
                };
                if !self.routes.contains(&route) {
                    self.routes.push(route);
                }
            }
            RouterEvent::RouteRemoved { source_folder, source_channel, destination_channel, destination_folder, .. } => {
                if let Some(pos) = self.routes.iter().position(|r| {
                    &r.source_folder == source_folder
                        && &r.source_channel == source_channel
                        && &r.destination_channel == destination_channel
                        && &r.destination_folder == destination_folder
                }) {
                    self.routes.remove(pos);
                }
            }
        }
    }

    /// Fold a sequence of events (in file order) into a fresh table —
    /// exactly the operation `events.jsonl` replay performs at startup.
    pub fn replay<'a>(events: impl IntoIterator<Item = &'a RouterEvent>) -> Self {
        let mut table = Self::new();
        for event in events {
            table.apply(event);
        }
        table
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
