use super::*;
use crate::refs::ListHandle;
use crate::test_support::component;

fn registry_with(ids: &[&str]) -> ComponentRegistry {
    let mut reg = ComponentRegistry::new();
    for id in ids {
        reg.register(component(id)).unwrap();
    }
    reg
}

#[test]
fn add_route_between_registered_components() {
    let reg = registry_with(&["a", "b"]);
    let mut table = RoutingTable::new();
    table
        .add_route(
            &reg,
            EndpointSpec::Component(ComponentId::new("a")),
            "out",
            EndpointSpec::Component(ComponentId::new("b")),
            "in",
            false,
        )
        .unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn add_route_rejects_unbound_component() {
    let reg = registry_with(&["a"]);
    let mut table = RoutingTable::new();
    let err = table
        .add_route(
            &reg,
            EndpointSpec::Component(ComponentId::new("a")),
            "out",
            EndpointSpec::Component(ComponentId::new("ghost")),
            "in",
            false,
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::EndpointNotBound(_)));
}

#[test]
fn add_route_rejects_persistent_with_anonymous_endpoint() {
    let reg = registry_with(&["a"]);
    let mut table = RoutingTable::new();
    let err = table
        .add_route(
            &reg,
            EndpointSpec::Component(ComponentId::new("a")),
            "out",
            EndpointSpec::List(ListHandle::new()),
            "in",
            true,
        )
        .unwrap_err();
    assert_eq!(err, CoreError::NotPersistable);
}

#[test]
fn add_route_permits_structural_duplicates() {
    let reg = registry_with(&["a", "b"]);
    let mut table = RoutingTable::new();
    for _ in 0..3 {
        table
            .add_route(
                &reg,
                EndpointSpec::Component(ComponentId::new("a")),
                "out",
                EndpointSpec::Component(ComponentId::new("b")),
                "in",
                false,
            )
            .unwrap();
    }
    assert_eq!(table.len(), 3, "add_route never deduplicates live mutations");
}

#[test]
fn remove_route_drops_one_matching_wire_at_a_time() {
    let reg = registry_with(&["a", "b"]);
    let mut table = RoutingTable::new();
    let a = EndpointSpec::Component(ComponentId::new("a"));
    let b = EndpointSpec::Component(ComponentId::new("b"));
    table.add_route(&reg, a.clone(), "out", b.clone(), "in", false).unwrap();
    table.add_route(&reg, a.clone(), "out", b.clone(), "in", false).unwrap();

    assert!(table.remove_route(&a, "out", &b, "in"));
    assert_eq!(table.len(), 1, "only one of the duplicate routes is removed");
    assert!(!table.remove_route(&a, "other", &b, "in"), "a non-matching removal reports false");
}

#[test]
fn remove_endpoint_drops_every_route_touching_it() {
    let reg = registry_with(&["a", "b", "c"]);
    let mut table = RoutingTable::new();
    let b = EndpointSpec::Component(ComponentId::new("b"));
    table.add_route(&reg, EndpointSpec::Component(ComponentId::new("a")), "out", b.clone(), "in", false).unwrap();
    table.add_route(&reg, b.clone(), "out", EndpointSpec::Component(ComponentId::new("c")), "in", false).unwrap();

    let removed = table.remove_endpoint(&b);
    assert_eq!(removed, 2);
    assert!(table.is_empty());
}

#[test]
fn clear_routes_drops_everything() {
    let reg = registry_with(&["a", "b"]);
    let mut table = RoutingTable::new();
    table
        .add_route(&reg, EndpointSpec::Component(ComponentId::new("a")), "out", EndpointSpec::Component(ComponentId::new("b")), "in", false)
        .unwrap();
    table.clear_routes();
    assert!(table.is_empty());
}

#[test]
fn routes_for_filters_by_source_and_channel() {
    let reg = registry_with(&["a", "b"]);
    let mut table = RoutingTable::new();
    let a = EndpointSpec::Component(ComponentId::new("a"));
    table.add_route(&reg, a.clone(), "raw", EndpointSpec::Component(ComponentId::new("b")), "processed", false).unwrap();

    let route = table.routes_for(&a, "raw").next().expect("one route matches");
    assert_eq!(route.dest_channel, "processed");
    assert!(table.routes_for(&a, "other").next().is_none());
}

#[test]
fn wildcard_source_channel_matches_anything() {
    let reg = registry_with(&["a", "b"]);
    let mut table = RoutingTable::new();
    let a = EndpointSpec::Component(ComponentId::new("a"));
    table
        .add_route(&reg, a.clone(), WILDCARD_CHANNEL, EndpointSpec::Component(ComponentId::new("b")), "in", false)
        .unwrap();

    assert_eq!(table.routes_for(&a, "anything").count(), 1);
    assert_eq!(table.routes_for(&a, "literally-anything-else").count(), 1);
}
