// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control messages submitted on the router's `INBOX` (spec.md §4.6, §6):
//! `link`, `unlink`, and `quit`.
//!
//! A control message is an ordinary [`patchboard_core::Message`] whose
//! `channel` names the request and whose `signal` carries the request
//! payload — the same "one JSON file per pending message" shape every other
//! mailbox in the fabric uses, just addressed at the router itself instead
//! of at a routed destination.

use patchboard_core::Message;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const CONTROL_CHANNEL_LINK: &str = "link";
pub const CONTROL_CHANNEL_UNLINK: &str = "unlink";
pub const CONTROL_CHANNEL_QUIT: &str = "quit";

/// The `source-folder` / `source-channel` / `destination-channel` /
/// `destination-folder` quadruple shared by `link` and `unlink`, plus the
/// optional `ack-path` spec.md §4.6 allows on either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRequest {
    #[serde(rename = "source-folder")]
    pub source_folder: String,
    #[serde(rename = "source-channel")]
    pub source_channel: String,
    #[serde(rename = "destination-channel")]
    pub destination_channel: String,
    #[serde(rename = "destination-folder")]
    pub destination_folder: String,
    #[serde(rename = "ack-path", default, skip_serializing_if = "Option::is_none")]
    pub ack_path: Option<String>,
}

/// A parsed control-inbox message, dispatched by channel per spec.md §4.6
/// step 2 of the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSignal {
    Link(LinkRequest),
    Unlink(LinkRequest),
    Quit,
}

impl ControlSignal {
    pub fn channel(&self) -> &'static str {
        match self {
            ControlSignal::Link(_) => CONTROL_CHANNEL_LINK,
            ControlSignal::Unlink(_) => CONTROL_CHANNEL_UNLINK,
            ControlSignal::Quit => CONTROL_CHANNEL_QUIT,
        }
    }

    /// The `ack-path` staged on this request, if any. `quit` never carries one.
    pub fn ack_path(&self) -> Option<&str> {
        match self {
            ControlSignal::Link(req) | ControlSignal::Unlink(req) => req.ack_path.as_deref(),
            ControlSignal::Quit => None,
        }
    }

    /// Encode this request as the message envelope a CLI client would drop
    /// into `INBOX/`.
    pub fn into_message(self) -> Message {
        let signal = match &self {
            ControlSignal::Link(req) | ControlSignal::Unlink(req) => {
                serde_json::to_value(req).unwrap_or(serde_json::Value::Null)
            }
            ControlSignal::Quit => json!({}),
        };
        Message::new(self.channel(), signal)
    }

    /// Parse a drained `INBOX` message by its channel.
    ///
    /// Returns `Ok(None)` for a channel this router doesn't recognize — the
    /// caller should simply drop it, mirroring how an unmatched routing
    /// channel is silently consumed elsewhere in the fabric (spec.md §4.5).
    pub fn from_message(message: &Message) -> Result<Option<Self>, serde_json::Error> {
        match message.channel.as_str() {
            CONTROL_CHANNEL_LINK => Ok(Some(ControlSignal::Link(serde_json::from_value(message.signal.clone())?))),
            CONTROL_CHANNEL_UNLINK => {
                Ok(Some(ControlSignal::Unlink(serde_json::from_value(message.signal.clone())?)))
            }
            CONTROL_CHANNEL_QUIT => Ok(Some(ControlSignal::Quit)),
            _ => Ok(None),
        }
    }
}

/// The acknowledgement written to a request's `ack-path`, if one was given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    pub ok: bool,
    pub channel: String,
}

impl AckMessage {
    pub fn ok(channel: impl Into<String>) -> Self {
        Self { ok: true, channel: channel.into() }
    }
}
