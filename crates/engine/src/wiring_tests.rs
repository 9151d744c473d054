use super::*;
use patchboard_core::{CoreError, EndpointSpec};

use crate::fabric::Fabric;

fn noop() -> patchboard_core::ActivationFn {
    Box::new(|_ctx| {})
}

#[test]
fn link_channels_requires_both_addresses() {
    let mut fabric = Fabric::new();
    fabric.register_component(patchboard_core::Component::new("a", noop())).unwrap();

    let err = fabric.wiring().address_source(EndpointSpec::Component("a".into())).link_channels("out", "in").unwrap_err();
    assert!(matches!(err, crate::EngineError::Wiring(CoreError::Invocation(_))));
}

#[test]
fn commit_links_requires_at_least_one_staged_link() {
    let mut fabric = Fabric::new();
    fabric.register_component(patchboard_core::Component::new("a", noop())).unwrap();
    fabric.register_component(patchboard_core::Component::new("b", noop())).unwrap();

    let err = fabric
        .wiring()
        .address_components(EndpointSpec::Component("a".into()), EndpointSpec::Component("b".into()))
        .commit_links()
        .unwrap_err();
    assert!(matches!(err, crate::EngineError::Wiring(CoreError::Invocation(_))));
}

#[test]
fn commit_links_adds_a_route_and_preserves_addressing() {
    let mut fabric = Fabric::new();
    fabric.register_component(patchboard_core::Component::new("a", noop())).unwrap();
    fabric.register_component(patchboard_core::Component::new("b", noop())).unwrap();

    fabric
        .wiring()
        .address_components(EndpointSpec::Component("a".into()), EndpointSpec::Component("b".into()))
        .link_channels("out", "in")
        .unwrap()
        .commit_links()
        .unwrap()
        .link_channels("err", "in")
        .unwrap()
        .commit_links()
        .unwrap();

    assert_eq!(fabric.routes().len(), 2);
}

#[test]
fn address_source_resets_persist_flag() {
    let mut fabric = Fabric::new();
    fabric.register_component(patchboard_core::Component::new("a", noop())).unwrap();
    fabric.register_component(patchboard_core::Component::new("b", noop())).unwrap();
    fabric.register_component(patchboard_core::Component::new("c", noop())).unwrap();

    let err = fabric
        .wiring()
        .address_source(EndpointSpec::Component("a".into()))
        .persist_links()
        .address_source(EndpointSpec::Component("b".into()))
        .address_dest(EndpointSpec::Component("c".into()))
        .link_channels("x", "y")
        .unwrap()
        .commit_links();
    assert!(err.is_ok(), "persist was reset by the second address_source so this non-persistent route commits fine");
}

#[test]
fn string_source_resolves_to_component_endpoint_at_commit_time() {
    let mut fabric = Fabric::new();
    fabric.register_component(patchboard_core::Component::new("a", noop())).unwrap();

    let err = fabric.wiring().address_source("ghost").address_dest(EndpointSpec::Component("a".into())).link_channels("x", "y").unwrap().commit_links();
    assert!(matches!(err, Err(crate::EngineError::Wiring(CoreError::EndpointNotBound(_)))));
}
