// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`EndpointBehavior`] for the two in-memory mailbox kinds. Both are
//! infallible: the underlying storage is a `parking_lot::Mutex`-guarded
//! `VecDeque`, never a fallible resource.

use patchboard_core::{ListHandle, Message, QueueHandle};

use crate::{AdapterError, EndpointBehavior};

impl EndpointBehavior for ListHandle {
    fn drain_all(&self) -> Result<Vec<Message>, AdapterError> {
        Ok(ListHandle::drain_all(self))
    }

    fn deliver(&self, message: &Message) -> Result<(), AdapterError> {
        self.push(message.clone());
        Ok(())
    }
}

impl EndpointBehavior for QueueHandle {
    fn drain_all(&self) -> Result<Vec<Message>, AdapterError> {
        Ok(QueueHandle::drain_all(self))
    }

    fn deliver(&self, message: &Message) -> Result<(), AdapterError> {
        self.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
