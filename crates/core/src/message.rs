// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The message envelope: the one thing every endpoint kind agrees how to
//! carry.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// An immutable message envelope.
///
/// `timestamp` is a decimal-seconds-since-epoch string with exactly six
/// fractional digits, chosen (per the original design) so timestamps compare
/// stably as strings across processes and survive JSON round-trips without
/// floating-point rounding surprises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The logical address within a source; non-empty.
    pub channel: String,
    /// Opaque payload, serializable as JSON.
    pub signal: serde_json::Value,
    /// Decimal seconds since the epoch, six fractional digits, as a string.
    pub timestamp: String,
}

impl Message {
    /// Construct a new message, stamping the current time.
    ///
    /// `channel` must be non-empty; this is enforced with a debug assertion
    /// since it is a programmer error, not a runtime condition, to emit on an
    /// unnamed channel.
    pub fn new(channel: impl Into<String>, signal: serde_json::Value) -> Self {
        let channel = channel.into();
        debug_assert!(!channel.is_empty(), "message channel must be non-empty");
        Self { channel, signal, timestamp: now_timestamp() }
    }

    /// Build a copy of this message addressed to a different channel,
    /// preserving `signal` and `timestamp` — exactly the "rewrite the
    /// channel, keep everything else" operation Phase 1 fanout performs.
    pub fn rewritten(&self, dest_channel: impl Into<String>) -> Self {
        Self { channel: dest_channel.into(), signal: self.signal.clone(), timestamp: self.timestamp.clone() }
    }
}

/// `make_message(channel, signal)` from the specification: stamps a fresh
/// timestamp and returns the envelope.
pub fn make_message(channel: impl Into<String>, signal: serde_json::Value) -> Message {
    Message::new(channel, signal)
}

/// Current time as decimal seconds since the epoch, six fractional digits.
fn now_timestamp() -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
