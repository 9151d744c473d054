// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Components: named, stateful units with an inbox, an outbox, and an
//! activation callable.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A component's unique name within a [`registry::ComponentRegistry`](crate::registry::ComponentRegistry).
///
/// Required for any route that names the component persistent, since the
/// event log can only replay routes it can address by a stable string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Which external transport a component mirrors, if any. Informational: it
/// lets the registry report what a component is adapting without the
/// registry itself depending on `patchboard-adapters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    List,
    Queue,
    Filetalk,
}

/// The activation callable installed for a component: invoked once per
/// activation with the current component id/state and the (possibly absent)
/// message that triggered it, through an [`ActivationContext`].
pub type ActivationFn = Box<dyn FnMut(&mut ActivationContext<'_>) + Send>;

/// A component: a named unit with inbox/outbox/state and an activation
/// callable.
///
/// The registry owns every `Component` — see the crate-level design note on
/// cyclic references. Routes refer to components by [`ComponentId`], never by
/// a borrowed reference, which is what lets a route whose destination is the
/// same component as its source compile at all.
pub struct Component {
    pub id: ComponentId,
    pub inbox: VecDeque<Message>,
    pub outbox: VecDeque<Message>,
    /// Opaque mutable bag owned by the component; only its own activation
    /// mutates it, and only while that activation is running.
    pub state: serde_json::Value,
    /// Reflective, informational only — not consulted by routing.
    pub channels: Vec<String>,
    /// When true, the component activates every cycle even with an empty
    /// inbox (the message passed to the activation is then `None`).
    pub always_active: bool,
    /// Set when this component mirrors an external mailbox via one of the
    /// adapters; purely informational.
    pub adapter_kind: Option<AdapterKind>,
    activation: ActivationFn,
}

impl Component {
    pub fn new(id: impl Into<ComponentId>, activation: ActivationFn) -> Self {
        Self {
            id: id.into(),
            inbox: VecDeque::new(),
            outbox: VecDeque::new(),
            state: serde_json::Value::Null,
            channels: Vec::new(),
            always_active: false,
            adapter_kind: None,
            activation,
        }
    }

    pub fn always_active(mut self, value: bool) -> Self {
        self.always_active = value;
        self
    }

    pub fn with_state(mut self, state: serde_json::Value) -> Self {
        self.state = state;
        self
    }

    pub fn with_adapter_kind(mut self, kind: AdapterKind) -> Self {
        self.adapter_kind = Some(kind);
        self
    }

    /// True iff both the inbox and outbox are empty — this component's
    /// contribution to fabric-wide quiescence.
    pub fn is_quiescent(&self) -> bool {
        self.inbox.is_empty() && self.outbox.is_empty()
    }

    /// Remove and return every pending outbox message, oldest first — the
    /// drain half of the `component` endpoint-behavior contract.
    pub fn drain_outbox(&mut self) -> Vec<Message> {
        self.outbox.drain(..).collect()
    }

    /// Append a message to the inbox — the deliver half of the `component`
    /// endpoint-behavior contract.
    pub fn deliver(&mut self, message: Message) {
        self.inbox.push_back(message);
    }

    /// Run one activation: pop the oldest inbox message (or pass `None` if
    /// `always_active` and the inbox happens to be empty), install the
    /// activation context, and invoke the callable exactly once.
    ///
    /// Returns `false` if nothing ran this cycle (empty inbox, not
    /// `always_active`) per the "round-robin, not drain-to-empty" rule.
    pub fn activate_one_turn(&mut self) -> bool {
        let message = match self.inbox.pop_front() {
            Some(msg) => Some(msg),
            None if self.always_active => None,
            None => return false,
        };

        let mut ctx = ActivationContext { outbox: &mut self.outbox, state: &mut self.state, message };
        (self.activation)(&mut ctx);
        true
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("inbox_len", &self.inbox.len())
            .field("outbox_len", &self.outbox.len())
            .field("always_active", &self.always_active)
            .field("adapter_kind", &self.adapter_kind)
            .finish()
    }
}

/// The per-activation context passed to a component's activation callable,
/// replacing the original design's global `g["component"]`/`g["msg"]`
/// mutable context (see the crate-level design note on cyclic references and
/// global context).
pub struct ActivationContext<'a> {
    outbox: &'a mut VecDeque<Message>,
    state: &'a mut serde_json::Value,
    /// The message that triggered this activation, or `None` for an
    /// `always_active` component whose inbox was empty.
    pub message: Option<Message>,
}

impl<'a> ActivationContext<'a> {
    /// `emit_signal(channel, signal)`: valid only inside an activation;
    /// appends to the currently-activating component's outbox. Never routes
    /// immediately — routing happens in the fabric's next Phase 1.
    pub fn emit_signal(&mut self, channel: impl Into<String>, signal: serde_json::Value) {
        self.outbox.push_back(Message::new(channel, signal));
    }

    /// Read-only access to the component's state bag.
    pub fn state(&self) -> &serde_json::Value {
        self.state
    }

    /// Mutable access to the component's state bag.
    pub fn state_mut(&mut self) -> &mut serde_json::Value {
        self.state
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
