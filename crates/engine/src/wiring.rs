// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The staged wiring builder: `address_source` / `address_dest` /
//! `address_components` / `persist_links` / `link_channels` / `commit_links`.

use std::path::PathBuf;

use patchboard_core::{ComponentHandle, ComponentId, EndpointSpec, ListHandle, QueueHandle};

use crate::error::EngineError;
use crate::fabric::Fabric;

/// One side of a route as given to the wiring DSL: either an already-bound
/// endpoint, or a bare component name resolved lazily at `commit_links`.
///
/// Resolving a name to `EndpointSpec::Component` never fails by itself —
/// whether the name is actually registered is checked by `add_route`, which
/// is what produces `EndpointNotBound` for an unknown name.
#[derive(Debug)]
pub enum Address {
    Endpoint(EndpointSpec),
    ComponentName(String),
}

impl Address {
    fn resolve(self) -> EndpointSpec {
        match self {
            Address::Endpoint(ep) => ep,
            Address::ComponentName(name) => EndpointSpec::Component(ComponentId::new(name)),
        }
    }
}

impl From<EndpointSpec> for Address {
    fn from(ep: EndpointSpec) -> Self {
        Address::Endpoint(ep)
    }
}

impl From<&str> for Address {
    fn from(name: &str) -> Self {
        Address::ComponentName(name.to_string())
    }
}

impl From<String> for Address {
    fn from(name: String) -> Self {
        Address::ComponentName(name)
    }
}

impl From<ComponentId> for Address {
    fn from(id: ComponentId) -> Self {
        Address::Endpoint(EndpointSpec::Component(id))
    }
}

impl From<ComponentHandle> for Address {
    fn from(handle: ComponentHandle) -> Self {
        Address::Endpoint(EndpointSpec::ComponentRef(handle))
    }
}

impl From<ListHandle> for Address {
    fn from(handle: ListHandle) -> Self {
        Address::Endpoint(EndpointSpec::List(handle))
    }
}

impl From<QueueHandle> for Address {
    fn from(handle: QueueHandle) -> Self {
        Address::Endpoint(EndpointSpec::Queue(handle))
    }
}

impl From<PathBuf> for Address {
    fn from(path: PathBuf) -> Self {
        Address::Endpoint(EndpointSpec::Filetalk(path))
    }
}

/// A staged builder for wiring routes into a [`Fabric`].
///
/// `address_source` resets the persist flag and the link buffer;
/// `address_dest` does not. `commit_links` clears the link buffer and persist
/// flag but preserves the current source/destination addressing, so a caller
/// can keep linking further channel pairs between the same two endpoints.
pub struct Wiring<'f> {
    fabric: &'f mut Fabric,
    source: Option<Address>,
    dest: Option<Address>,
    persist: bool,
    links: Vec<(String, String)>,
}

impl<'f> Wiring<'f> {
    pub(crate) fn new(fabric: &'f mut Fabric) -> Self {
        Self { fabric, source: None, dest: None, persist: false, links: Vec::new() }
    }

    pub fn address_source(mut self, source: impl Into<Address>) -> Self {
        self.source = Some(source.into());
        self.persist = false;
        self.links.clear();
        self
    }

    pub fn address_dest(mut self, dest: impl Into<Address>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    /// Convenience for `address_source(src).address_dest(dest)`.
    pub fn address_components(self, source: impl Into<Address>, dest: impl Into<Address>) -> Self {
        self.address_source(source).address_dest(dest)
    }

    pub fn persist_links(mut self) -> Self {
        self.persist = true;
        self
    }

    /// Stage a channel link between the currently addressed source and
    /// destination.
    ///
    /// # Errors
    /// [`EngineError::Wiring`] wrapping [`patchboard_core::CoreError::Invocation`]
    /// if either address is unset.
    pub fn link_channels(
        mut self,
        src_channel: impl Into<String>,
        dest_channel: impl Into<String>,
    ) -> Result<Self, EngineError> {
        if self.source.is_none() || self.dest.is_none() {
            return Err(EngineError::Wiring(patchboard_core::CoreError::Invocation(
                "link_channels requires both a source and a destination to be addressed".to_string(),
            )));
        }
        self.links.push((src_channel.into(), dest_channel.into()));
        Ok(self)
    }

    /// Commit every staged link as a route, in the order staged.
    ///
    /// # Errors
    /// [`EngineError::Wiring`] if no links are staged, or if `add_route`
    /// rejects any of them (unbound endpoint, non-persistable anonymous
    /// endpoint under `persist_links`).
    pub fn commit_links(mut self) -> Result<Self, EngineError> {
        if self.links.is_empty() {
            return Err(EngineError::Wiring(patchboard_core::CoreError::Invocation(
                "commit_links called with no staged channel links".to_string(),
            )));
        }
        let source = self
            .source
            .clone()
            .ok_or_else(|| {
                EngineError::Wiring(patchboard_core::CoreError::Invocation(
                    "commit_links called with no source addressed".to_string(),
                ))
            })?
            .resolve();
        let dest = self
            .dest
            .clone()
            .ok_or_else(|| {
                EngineError::Wiring(patchboard_core::CoreError::Invocation(
                    "commit_links called with no destination addressed".to_string(),
                ))
            })?
            .resolve();

        for (src_channel, dest_channel) in self.links.drain(..) {
            self.fabric.add_route(source.clone(), src_channel, dest.clone(), dest_channel, self.persist)?;
        }
        self.persist = false;
        Ok(self)
    }
}

impl Clone for Address {
    fn clone(&self) -> Self {
        match self {
            Address::Endpoint(ep) => Address::Endpoint(ep.clone()),
            Address::ComponentName(name) => Address::ComponentName(name.clone()),
        }
    }
}

#[cfg(test)]
#[path = "wiring_tests.rs"]
mod tests;
