use super::*;
use patchboard_core::ListHandle;
use patchboard_core::QueueHandle;
use serde_json::json;

#[test]
fn list_handle_behavior_round_trips() {
    let list = ListHandle::new();
    EndpointBehavior::deliver(&list, &Message::new("a", json!(1))).unwrap();
    EndpointBehavior::deliver(&list, &Message::new("b", json!(2))).unwrap();

    let drained = EndpointBehavior::drain_all(&list).unwrap();
    assert_eq!(drained.len(), 2);
    assert_eq!(drained[0].channel, "a");
    assert!(list.is_empty());
}

#[test]
fn queue_handle_behavior_round_trips() {
    let queue = QueueHandle::new();
    EndpointBehavior::deliver(&queue, &Message::new("a", json!("x"))).unwrap();

    let drained = EndpointBehavior::drain_all(&queue).unwrap();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].signal, json!("x"));
}
