// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `routes.json`: the router's published routing-table snapshot (spec.md
//! §6). Field names are kebab-case on the wire, matching the schema in the
//! spec exactly (`source-folder`, not `source_folder`) — this is the one
//! schema in this crate that isn't snake_case, so every field carries an
//! explicit `#[serde(rename)]` rather than a blanket container attribute, to
//! keep the wire name visible at each field instead of hidden in a
//! `rename_all` a reader has to go find.

use serde::{Deserialize, Serialize};

pub const ROUTES_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    #[serde(rename = "source-folder")]
    pub source_folder: String,
    #[serde(rename = "source-channel")]
    pub source_channel: String,
    #[serde(rename = "destination-channel")]
    pub destination_channel: String,
    #[serde(rename = "destination-folder")]
    pub destination_folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesFile {
    #[serde(rename = "schema-version")]
    pub schema_version: String,
    #[serde(rename = "updated-at-utc")]
    pub updated_at_utc: String,
    pub routes: Vec<RouteEntry>,
}

impl RoutesFile {
    pub fn new(updated_at_utc: impl Into<String>, routes: Vec<RouteEntry>) -> Self {
        Self { schema_version: ROUTES_SCHEMA_VERSION.to_string(), updated_at_utc: updated_at_utc.into(), routes }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn serializes_with_kebab_case_field_names() {
        let file = RoutesFile::new(
            "1700000000.000000",
            vec![RouteEntry {
                source_folder: "/src".to_string(),
                source_channel: "data".to_string(),
                destination_channel: "received".to_string(),
                destination_folder: "/dest".to_string(),
            }],
        );
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["schema-version"], "1");
        assert_eq!(json["routes"][0]["source-folder"], "/src");
        assert_eq!(json["routes"][0]["destination-folder"], "/dest");
    }

    #[test]
    fn round_trips() {
        let file = RoutesFile::new("0.0", vec![]);
        let json = serde_json::to_string(&file).unwrap();
        let back: RoutesFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file, back);
    }

    fn arb_route_entry() -> impl Strategy<Value = RouteEntry> {
        ("[a-zA-Z0-9/_.-]{1,40}", "[a-z][a-z0-9_]{0,15}", "[a-z][a-z0-9_]{0,15}", "[a-zA-Z0-9/_.-]{1,40}").prop_map(
            |(source_folder, source_channel, destination_channel, destination_folder)| RouteEntry {
                source_folder,
                source_channel,
                destination_channel,
                destination_folder,
            },
        )
    }

    proptest! {
        /// Any number of routes, with any field contents the strategy can
        /// produce, survives a `RoutesFile` JSON round-trip unchanged — the
        /// property the CLI's `routes` command and the router's own publish
        /// step both rely on.
        #[test]
        fn routes_file_round_trips_through_json(
            updated_at_utc in "[0-9]{1,10}\\.[0-9]{6}",
            routes in prop::collection::vec(arb_route_entry(), 0..8),
        ) {
            let file = RoutesFile::new(updated_at_utc, routes);
            let json = serde_json::to_string(&file).unwrap();
            let back: RoutesFile = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(file, back);
        }
    }
}
