// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ref-based endpoint handles: `list{ref}`, `queue{ref}`, and the anonymous
//! flavor of `component{ref}`.
//!
//! Unlike a named `component{id}` or `filetalk{path}` endpoint, these carry no
//! stable name — their identity *is* the shared pointer. Two routes built from
//! the same handle are, by construction, routes from the same mailbox; routes
//! built from two separately-constructed handles are never considered the
//! same source even if their current contents happen to match, which is what
//! [`Route::add_route`](crate::route::RoutingTable::add_route)'s "reuse the
//! existing spec object" step in the specification is protecting.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::component::Component;
use crate::message::Message;

/// A mutable, ordered, FIFO sequence of messages shared by reference.
#[derive(Clone)]
pub struct ListHandle(Arc<Mutex<VecDeque<Message>>>);

/// A thread-safe FIFO queue of messages shared by reference.
///
/// Distinct from [`ListHandle`] only in the vocabulary the caller uses to
/// construct it (`queue{ref}` vs `list{ref}`) and in the two endpoints never
/// being considered the same logical mailbox even if they wrap equivalent
/// underlying storage — see the module docs.
#[derive(Clone)]
pub struct QueueHandle(Arc<Mutex<VecDeque<Message>>>);

/// An anonymous, identity-bound in-memory component: `component{ref}`.
#[derive(Clone)]
pub struct ComponentHandle(Arc<Mutex<Component>>);

macro_rules! handle_impl {
    ($name:ident, $inner:ty) => {
        impl $name {
            pub fn new() -> Self {
                Self(Arc::new(Mutex::new(Default::default())))
            }

            pub(crate) fn inner(&self) -> &Arc<Mutex<$inner>> {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl Eq for $name {}

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($name), Arc::as_ptr(&self.0))
            }
        }
    };
}

handle_impl!(ListHandle, VecDeque<Message>);
handle_impl!(QueueHandle, VecDeque<Message>);

impl ComponentHandle {
    pub fn new(component: Component) -> Self {
        Self(Arc::new(Mutex::new(component)))
    }

    pub(crate) fn inner(&self) -> &Arc<Mutex<Component>> {
        &self.0
    }

    /// Run one activation of the wrapped component, per
    /// [`Component::activate_one_turn`].
    pub fn activate_one_turn(&self) -> bool {
        self.0.lock().activate_one_turn()
    }

    pub fn drain_outbox(&self) -> Vec<Message> {
        self.0.lock().drain_outbox()
    }

    pub fn deliver(&self, message: Message) {
        self.0.lock().deliver(message);
    }

    pub fn is_quiescent(&self) -> bool {
        self.0.lock().is_quiescent()
    }
}

impl PartialEq for ComponentHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ComponentHandle {}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentHandle({:p})", Arc::as_ptr(&self.0))
    }
}

impl ListHandle {
    /// Push a message onto the back (used by deliver; also handy in tests to
    /// seed a mailbox).
    pub fn push(&self, msg: Message) {
        self.0.lock().push_back(msg);
    }

    /// Drain every message currently queued, oldest first.
    pub fn drain_all(&self) -> Vec<Message> {
        self.0.lock().drain(..).collect()
    }

    /// Snapshot the current contents without draining (for assertions).
    pub fn snapshot(&self) -> Vec<Message> {
        self.0.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

impl QueueHandle {
    pub fn push(&self, msg: Message) {
        self.0.lock().push_back(msg);
    }

    pub fn drain_all(&self) -> Vec<Message> {
        self.0.lock().drain(..).collect()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.0.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "refs_tests.rs"]
mod tests;
