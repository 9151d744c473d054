// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The component registry: the single owner of every named [`Component`].

use indexmap::IndexMap;

use crate::component::{Component, ComponentId};
use crate::error::CoreError;

/// Owns every named component, in stable insertion order.
///
/// Insertion order matters: Phase 2 ("activate one turn per component")
/// iterates the registry in this order to give components round-robin
/// fairness across a cycle. Unregistering a component must not reorder the
/// survivors, which is why [`ComponentRegistry::unregister`] uses
/// [`IndexMap::shift_remove`] rather than the cheaper but order-disturbing
/// `swap_remove`.
#[derive(Default)]
pub struct ComponentRegistry {
    components: IndexMap<ComponentId, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self { components: IndexMap::new() }
    }

    /// Register a new component under its id.
    ///
    /// # Errors
    /// Returns [`CoreError::Invocation`] if a component with this id is
    /// already registered; registration never silently replaces.
    pub fn register(&mut self, component: Component) -> Result<(), CoreError> {
        if self.components.contains_key(&component.id) {
            return Err(CoreError::Invocation(format!(
                "component {:?} is already registered",
                component.id.as_str()
            )));
        }
        self.components.insert(component.id.clone(), component);
        Ok(())
    }

    /// Remove a component by id, returning it if present.
    ///
    /// Uses `shift_remove` to preserve the insertion order of the remaining
    /// components.
    pub fn unregister(&mut self, id: &ComponentId) -> Option<Component> {
        self.components.shift_remove(id)
    }

    pub fn get(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn get_mut(&mut self, id: &ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.components.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate components in stable registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &Component)> {
        self.components.iter()
    }

    /// Iterate components mutably in stable registration order; this is the
    /// order Phase 2 activates them in.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ComponentId, &mut Component)> {
        self.components.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.components.keys()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
