// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routes and the routing table: the wiring between endpoints that Phase 1
//! ("route everything") walks on every cycle.

use crate::endpoint::EndpointSpec;
use crate::error::CoreError;
use crate::registry::ComponentRegistry;

/// Matches any source channel; used by the router's delivery policy and
/// honored here too so a single `RoutingTable` type serves both IntraFlow and
/// the filesystem daemon.
pub const WILDCARD_CHANNEL: &str = "*";

/// A single wire from one endpoint to another: `src:src_channel ->
/// dest:dest_channel`.
///
/// Every delivered message's channel is rewritten to `dest_channel` — there
/// is no "leave unchanged" mode; callers that want the channel preserved
/// pass the same name for both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub src: EndpointSpec,
    pub src_channel: String,
    pub dest: EndpointSpec,
    pub dest_channel: String,
    /// Whether a `route_added` event must be appended for this route before
    /// it takes effect, and a `route_removed` event before it is dropped.
    pub persistent: bool,
}

impl Route {
    /// True if a message on `channel` should be carried by this route: an
    /// exact match, or this route's source channel is the wildcard `"*"`.
    pub fn matches_channel(&self, channel: &str) -> bool {
        self.src_channel == WILDCARD_CHANNEL || self.src_channel == channel
    }
}

/// The set of all wiring currently in effect.
///
/// Backed by a flat `Vec` rather than a map keyed by source: endpoint
/// equality for the ref-carrying variants is pointer identity (see
/// [`EndpointSpec`]'s docs), which does not hash stably enough to be useful
/// as a map key, and route counts per fabric are small enough that linear
/// scans are the right tool. Structurally-duplicate routes are permitted —
/// `add_route` never deduplicates live mutations, only event-log replay does
/// (see `patchboard-storage`).
#[derive(Default)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Add a route, validating it against `registry` first.
    ///
    /// # Errors
    /// - [`CoreError::EndpointNotBound`] if either endpoint names a component
    ///   not currently registered.
    /// - [`CoreError::NotPersistable`] if `persistent` is set but either
    ///   endpoint is not nameable.
    pub fn add_route(
        &mut self,
        registry: &ComponentRegistry,
        src: EndpointSpec,
        src_channel: impl Into<String>,
        dest: EndpointSpec,
        dest_channel: impl Into<String>,
        persistent: bool,
    ) -> Result<(), CoreError> {
        Self::validate_bound(registry, &src)?;
        Self::validate_bound(registry, &dest)?;

        if persistent && (!src.is_persistable() || !dest.is_persistable()) {
            return Err(CoreError::NotPersistable);
        }

        self.routes.push(Route {
            src,
            src_channel: src_channel.into(),
            dest,
            dest_channel: dest_channel.into(),
            persistent,
        });
        Ok(())
    }

    /// Remove the first route matching this `(src, src_channel, dest,
    /// dest_channel)` tuple by endpoint identity, not full structural
    /// equality of every field — mirroring `remove_route`'s "matches by
    /// endpoint identity" contract. Returns whether a route was removed.
    pub fn remove_route(
        &mut self,
        src: &EndpointSpec,
        src_channel: &str,
        dest: &EndpointSpec,
        dest_channel: &str,
    ) -> bool {
        if let Some(pos) = self.routes.iter().position(|r| {
            r.src == *src && r.src_channel == src_channel && r.dest == *dest && r.dest_channel == dest_channel
        }) {
            self.routes.remove(pos);
            true
        } else {
            false
        }
    }

    /// Drop the whole table.
    pub fn clear_routes(&mut self) {
        self.routes.clear();
    }

    /// Remove every route whose source or destination is this endpoint —
    /// used when unregistering a component.
    pub fn remove_endpoint(&mut self, endpoint: &EndpointSpec) -> usize {
        let before = self.routes.len();
        self.routes.retain(|r| r.src != *endpoint && r.dest != *endpoint);
        before - self.routes.len()
    }

    /// Every route originating from `source`, matching by endpoint identity.
    pub fn routes_from<'a>(&'a self, source: &'a EndpointSpec) -> impl Iterator<Item = &'a Route> {
        self.routes.iter().filter(move |r| r.src == *source)
    }

    /// Every route from `source` whose `src_channel` matches (exactly, or
    /// via the `"*"` wildcard) the given channel.
    pub fn routes_for<'a>(&'a self, source: &'a EndpointSpec, channel: &'a str) -> impl Iterator<Item = &'a Route> {
        self.routes_from(source).filter(move |r| r.matches_channel(channel))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn validate_bound(registry: &ComponentRegistry, endpoint: &EndpointSpec) -> Result<(), CoreError> {
        if let EndpointSpec::Component(id) = endpoint {
            if !registry.contains(id) {
                return Err(CoreError::EndpointNotBound(id.as_str().to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
