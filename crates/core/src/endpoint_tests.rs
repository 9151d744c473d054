use super::*;
use std::path::PathBuf;

use crate::refs::{ComponentHandle, ListHandle, QueueHandle};
use crate::test_support::component;

#[test]
fn component_endpoints_compare_by_name() {
    let a = EndpointSpec::Component(ComponentId::new("worker"));
    let b = EndpointSpec::Component(ComponentId::new("worker"));
    assert_eq!(a, b);
    assert!(a.is_persistable());
    assert!(a.requires_ref());
    assert_eq!(a.stable_name(), Some("worker".to_string()));
}

#[test]
fn filetalk_endpoints_compare_by_path() {
    let a = EndpointSpec::Filetalk(PathBuf::from("/tmp/box"));
    let b = EndpointSpec::Filetalk(PathBuf::from("/tmp/box"));
    assert_eq!(a, b);
    assert!(a.is_persistable());
    assert!(!a.requires_ref());
}

#[test]
fn list_endpoints_compare_by_identity_not_contents() {
    let handle = ListHandle::new();
    let a = EndpointSpec::List(handle.clone());
    let b = EndpointSpec::List(handle);
    let c = EndpointSpec::List(ListHandle::new());

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(!a.is_persistable());
    assert_eq!(a.stable_name(), None);
}

#[test]
fn queue_and_component_ref_endpoints_are_not_persistable() {
    let queue = EndpointSpec::Queue(QueueHandle::new());
    let comp_ref = EndpointSpec::ComponentRef(ComponentHandle::new(component("anon")));
    assert!(!queue.is_persistable());
    assert!(!comp_ref.is_persistable());
    assert!(!queue.requires_ref());
    assert!(!comp_ref.requires_ref());
}

#[yare::parameterized(
    component = { EndpointSpec::Component(ComponentId::new("a")), EndpointKind::Component },
    filetalk = { EndpointSpec::Filetalk(PathBuf::from("/x")), EndpointKind::Filetalk },
    list = { EndpointSpec::List(ListHandle::new()), EndpointKind::List },
    queue = { EndpointSpec::Queue(QueueHandle::new()), EndpointKind::Queue },
)]
fn kind_reports_the_right_tag(endpoint: EndpointSpec, expected: EndpointKind) {
    assert_eq!(endpoint.kind(), expected);
}
