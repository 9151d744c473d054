// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only helpers shared by this crate's own tests and, via the
//! `test-support` feature, by downstream crates' tests.

use serde_json::json;

use crate::component::{ActivationContext, ActivationFn, Component, ComponentId};
use crate::message::Message;

/// An activation that does nothing: pops its message (if any) and discards
/// it without emitting.
pub fn noop_activation() -> ActivationFn {
    Box::new(|_ctx: &mut ActivationContext<'_>| {})
}

/// An activation that re-emits whatever it receives on `"echo"`, useful for
/// asserting a message made it through a wire end to end.
pub fn echo_activation() -> ActivationFn {
    Box::new(|ctx: &mut ActivationContext<'_>| {
        if let Some(msg) = ctx.message.clone() {
            ctx.emit_signal("echo", msg.signal);
        }
    })
}

/// A component registered under `id` with a no-op activation, ready to drop
/// straight into a [`crate::registry::ComponentRegistry`].
pub fn component(id: &str) -> Component {
    Component::new(ComponentId::new(id), noop_activation())
}

/// A component registered under `id` whose activation echoes its input.
pub fn echo_component(id: &str) -> Component {
    Component::new(ComponentId::new(id), echo_activation())
}

/// A throwaway message on channel `"test"` carrying `{"n": n}`.
pub fn sample_message(n: i64) -> Message {
    Message::new("test", json!({ "n": n }))
}

#[cfg(any(test, feature = "proptest"))]
pub mod strategies {
    use proptest::prelude::*;

    use crate::component::ComponentId;
    use crate::message::Message;

    pub fn component_id() -> impl Strategy<Value = ComponentId> {
        "[a-z][a-z0-9_]{0,15}".prop_map(ComponentId::new)
    }

    pub fn channel_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,15}".prop_map(|s| s)
    }

    pub fn json_scalar() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            ".*".prop_map(serde_json::Value::from),
        ]
    }

    pub fn message() -> impl Strategy<Value = Message> {
        (channel_name(), json_scalar()).prop_map(|(channel, signal)| Message::new(channel, signal))
    }
}
