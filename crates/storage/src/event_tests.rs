use super::*;

#[test]
fn route_added_serializes_with_kebab_case_fields() {
    let event = RouterEvent::RouteAdded {
        ts_utc: "1785110400.000000".to_string(),
        source_folder: "/inbox".to_string(),
        source_channel: "out".to_string(),
        destination_channel: "in".to_string(),
        destination_folder: "/outbox".to_string(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "route_added");
    assert_eq!(json["source-folder"], "/inbox");
    assert_eq!(json["source-channel"], "out");
    assert_eq!(json["destination-channel"], "in");
    assert_eq!(json["destination-folder"], "/outbox");
}

#[yare::parameterized(
    startup = { RouterEvent::startup() },
    shutdown = { RouterEvent::shutdown() },
)]
fn startup_and_shutdown_round_trip(event: RouterEvent) {
    let json = serde_json::to_string(&event).unwrap();
    let back: RouterEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(event, back);
}

#[test]
fn unknown_event_tag_fails_to_parse_a_single_line() {
    let err = serde_json::from_str::<RouterEvent>(r#"{"event":"reticulate_splines","ts_utc":"2026-07-26T00:00:00Z"}"#);
    assert!(err.is_err(), "an unknown tag must fail at the line level so the log can skip it");
}

#[test]
fn route_added_then_removed_leaves_table_empty() {
    let added = RouterEvent::route_added("/a", "out", "in", "/b");
    let removed = RouterEvent::route_removed("/a", "out", "in", "/b");
    let table = FsRoutingTable::replay([&added, &removed]);
    assert!(table.is_empty());
}

#[test]
fn route_added_is_idempotent_on_replay() {
    let added = RouterEvent::route_added("/a", "out", "in", "/b");
    let table = FsRoutingTable::replay([&added, &added, &added]);
    assert_eq!(table.len(), 1, "replay must fold structurally identical route_added events into one wire");
}

#[test]
fn route_removed_on_a_miss_is_ignored() {
    let removed = RouterEvent::route_removed("/a", "out", "in", "/b");
    let table = FsRoutingTable::replay([&removed]);
    assert!(table.is_empty());
}

#[test]
fn distinct_wires_both_survive_replay() {
    let a = RouterEvent::route_added("/a", "out", "in", "/b");
    let b = RouterEvent::route_added("/a", "out", "in", "/c");
    let table = FsRoutingTable::replay([&a, &b]);
    assert_eq!(table.len(), 2);
}

#[test]
fn startup_and_shutdown_do_not_affect_the_table() {
    let startup = RouterEvent::startup();
    let added = RouterEvent::route_added("/a", "out", "in", "/b");
    let shutdown = RouterEvent::shutdown();
    let table = FsRoutingTable::replay([&startup, &added, &shutdown]);
    assert_eq!(table.len(), 1);
}
