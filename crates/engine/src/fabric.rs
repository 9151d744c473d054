// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Fabric`: the IntraFlow two-phase cycle engine.

use std::panic::{self, AssertUnwindSafe};

use patchboard_adapters::{deliver_to_endpoint, drain_endpoint};
use patchboard_core::{Component, ComponentHandle, ComponentId, ComponentRegistry, EndpointSpec, Message, RoutingTable};

use crate::error::EngineError;
use crate::wiring::Wiring;

/// Owns the component registry, the anonymous (`component{ref}`) components,
/// and the routing table, and runs the two-phase cycle over them.
///
/// Components activate in a single stable order: named components first, in
/// registration order (the registry's `IndexMap` order), followed by
/// anonymous components in the order they were registered. The spec only
/// requires *some* stable insertion order for round-robin fairness; this
/// crate picks named-then-anonymous as its concrete, deterministic rendering
/// of that requirement.
pub struct Fabric {
    registry: ComponentRegistry,
    anonymous: Vec<ComponentHandle>,
    routes: RoutingTable,
}

impl Default for Fabric {
    fn default() -> Self {
        Self::new()
    }
}

impl Fabric {
    pub fn new() -> Self {
        Self { registry: ComponentRegistry::new(), anonymous: Vec::new(), routes: RoutingTable::new() }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Register a named component under its id.
    pub fn register_component(&mut self, component: Component) -> Result<(), EngineError> {
        self.registry.register(component)?;
        Ok(())
    }

    /// Register an anonymous component, returning the handle routes are
    /// wired against (`component{ref}`).
    pub fn register_anonymous_component(&mut self, component: Component) -> ComponentHandle {
        let handle = ComponentHandle::new(component);
        self.anonymous.push(handle.clone());
        handle
    }

    /// Unregister a named component, dropping every route that touches it.
    pub fn unregister_component(&mut self, id: &ComponentId) -> Option<Component> {
        let removed = self.registry.unregister(id);
        if removed.is_some() {
            self.routes.remove_endpoint(&EndpointSpec::Component(id.clone()));
        }
        removed
    }

    /// Start a staged wiring session against this fabric.
    pub fn wiring(&mut self) -> Wiring<'_> {
        Wiring::new(self)
    }

    /// Add a single route directly, bypassing the wiring DSL.
    pub fn add_route(
        &mut self,
        src: EndpointSpec,
        src_channel: impl Into<String>,
        dest: EndpointSpec,
        dest_channel: impl Into<String>,
        persistent: bool,
    ) -> Result<(), EngineError> {
        self.routes.add_route(&self.registry, src, src_channel, dest, dest_channel, persistent)?;
        Ok(())
    }

    /// True iff every component (named and anonymous) has an empty inbox and
    /// outbox.
    pub fn is_quiescent(&self) -> bool {
        self.registry.iter().all(|(_, c)| c.is_quiescent()) && self.anonymous.iter().all(|h| h.is_quiescent())
    }

    /// Phase 1: drain every distinct source endpoint appearing in the
    /// routing table and deliver each message to every matching destination,
    /// with the channel rewritten to the route's `dest_channel`.
    ///
    /// Returns the number of deliveries made (one count per `(message,
    /// matching route)` pair, so fanout to N destinations counts N).
    pub fn route_everything(&mut self) -> Result<usize, EngineError> {
        let sources = self.distinct_sources();
        let mut delivered = 0usize;

        for source in sources {
            let messages = self.drain_source(&source)?;
            for message in messages {
                let routes: Vec<(EndpointSpec, String)> = self
                    .routes
                    .routes_for(&source, &message.channel)
                    .map(|r| (r.dest.clone(), r.dest_channel.clone()))
                    .collect();

                for (dest, dest_channel) in routes {
                    let rewritten = message.rewritten(dest_channel);
                    self.deliver_dest(&dest, rewritten)?;
                    delivered += 1;
                }
            }
        }
        Ok(delivered)
    }

    /// Phase 2: activate each component at most once, in stable order.
    /// Returns the number of components that actually ran an activation.
    ///
    /// # Errors
    /// [`EngineError::ActivationFault`] if an activation panics. The panic is
    /// caught at this boundary and re-raised as a typed error; components
    /// after the one that panicked do not run this cycle.
    pub fn activate_one_turn_per_component(&mut self) -> Result<usize, EngineError> {
        let mut activated = 0usize;

        let ids: Vec<ComponentId> = self.registry.ids().cloned().collect();
        for id in ids {
            let Some(component) = self.registry.get_mut(&id) else { continue };
            let ran = panic::catch_unwind(AssertUnwindSafe(|| component.activate_one_turn())).map_err(|payload| {
                EngineError::ActivationFault { component: id.to_string(), message: panic_message(&payload) }
            })?;
            if ran {
                activated += 1;
            }
        }

        for handle in self.anonymous.clone() {
            let ran = panic::catch_unwind(AssertUnwindSafe(|| handle.activate_one_turn())).map_err(|payload| {
                EngineError::ActivationFault { component: "<anonymous>".to_string(), message: panic_message(&payload) }
            })?;
            if ran {
                activated += 1;
            }
        }

        Ok(activated)
    }

    /// One full cycle: Phase 1 then Phase 2.
    pub fn run_cycle(&mut self) -> Result<(), EngineError> {
        self.route_everything()?;
        self.activate_one_turn_per_component()?;
        Ok(())
    }

    /// Run `n` cycles if `n > 0`; if `n == 0`, run at least one cycle and
    /// then continue until [`Fabric::is_quiescent`]. Returns the number of
    /// cycles actually run.
    pub fn run(&mut self, n: u32) -> Result<u32, EngineError> {
        if n > 0 {
            for _ in 0..n {
                self.run_cycle()?;
            }
            return Ok(n);
        }

        let mut cycles = 0u32;
        loop {
            self.run_cycle()?;
            cycles += 1;
            if self.is_quiescent() {
                break;
            }
        }
        Ok(cycles)
    }

    fn distinct_sources(&self) -> Vec<EndpointSpec> {
        let mut sources: Vec<EndpointSpec> = Vec::new();
        for route in self.routes.iter() {
            if !sources.iter().any(|s| *s == route.src) {
                sources.push(route.src.clone());
            }
        }
        sources
    }

    fn drain_source(&mut self, endpoint: &EndpointSpec) -> Result<Vec<Message>, EngineError> {
        match endpoint {
            EndpointSpec::Component(id) => Ok(self.registry.get_mut(id).map(Component::drain_outbox).unwrap_or_default()),
            EndpointSpec::ComponentRef(handle) => Ok(handle.drain_outbox()),
            EndpointSpec::List(_) | EndpointSpec::Queue(_) | EndpointSpec::Filetalk(_) => {
                drain_endpoint(endpoint).map_err(EngineError::from)
            }
        }
    }

    fn deliver_dest(&mut self, endpoint: &EndpointSpec, message: Message) -> Result<(), EngineError> {
        match endpoint {
            EndpointSpec::Component(id) => {
                if let Some(component) = self.registry.get_mut(id) {
                    component.deliver(message);
                }
                Ok(())
            }
            EndpointSpec::ComponentRef(handle) => {
                handle.deliver(message);
                Ok(())
            }
            EndpointSpec::List(_) | EndpointSpec::Queue(_) | EndpointSpec::Filetalk(_) => {
                deliver_to_endpoint(endpoint, &message).map_err(EngineError::from)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "fabric_tests.rs"]
mod tests;
