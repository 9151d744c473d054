// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `status.json`: the router's publishable counters snapshot (spec.md §6).

use serde::{Deserialize, Serialize};

pub const STATUS_SCHEMA_VERSION: u32 = 1;

/// The delivery-pass counters the router accumulates across its lifetime.
///
/// Every field corresponds 1:1 to a counter named in spec.md §4.6's delivery
/// policy; nothing here is derived. `deleted` counts source files removed
/// for *any* reason (routed-and-delivered or unrouted-and-discarded), so it
/// is not simply `delivered`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterStats {
    pub seen: u64,
    pub delivered: u64,
    pub deleted: u64,
    pub skipped_unreadable: u64,
    pub skipped_missing_folder: u64,
    pub discarded_unrouted: u64,
}

impl RouterStats {
    /// True if this delta represents no observable activity — the signal
    /// `status.json`'s `last_change` uses to decide whether a tick is worth
    /// republishing.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl std::ops::AddAssign for RouterStats {
    fn add_assign(&mut self, rhs: Self) {
        self.seen += rhs.seen;
        self.delivered += rhs.delivered;
        self.deleted += rhs.deleted;
        self.skipped_unreadable += rhs.skipped_unreadable;
        self.skipped_missing_folder += rhs.skipped_missing_folder;
        self.discarded_unrouted += rhs.discarded_unrouted;
    }
}

/// The full contents of `status.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFile {
    pub schema_version: u32,
    pub router_id: String,
    pub started_at_utc: String,
    pub tick: u64,
    pub last_change: String,
    pub delay_seconds: f64,
    pub stats: RouterStats,
}

impl StatusFile {
    pub fn new(router_id: impl Into<String>, started_at_utc: impl Into<String>, delay_seconds: f64) -> Self {
        Self {
            schema_version: STATUS_SCHEMA_VERSION,
            router_id: router_id.into(),
            started_at_utc: started_at_utc.into(),
            tick: 0,
            last_change: String::new(),
            delay_seconds,
            stats: RouterStats::default(),
        }
    }
}
