// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Router configuration: `router.delay_seconds`, `router.max_deliveries_per_tick`,
//! `router.discard_unrouted` (spec.md §6), loaded from an optional TOML file
//! with built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_delay_seconds() -> f64 {
    0.5
}

fn default_max_deliveries_per_tick() -> usize {
    500
}

fn default_discard_unrouted() -> bool {
    true
}

/// The `[router]` table of a router project's config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub delay_seconds: f64,
    pub max_deliveries_per_tick: usize,
    pub discard_unrouted: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            delay_seconds: default_delay_seconds(),
            max_deliveries_per_tick: default_max_deliveries_per_tick(),
            discard_unrouted: default_discard_unrouted(),
        }
    }
}

/// The on-disk shape of a config file: a single `[router]` section. Thin by
/// design (spec.md §1 lists config loading for the router daemon as
/// out-of-scope detail) — just enough structure to deserialize the three
/// documented keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    router: RouterConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: std::path::PathBuf, #[source] source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: std::path::PathBuf, #[source] source: toml::de::Error },
}

impl RouterConfig {
    /// Defaults with no file present.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Load from a TOML file at `path`. Missing keys fall back to their
    /// documented defaults via `#[serde(default)]`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        Ok(file.router)
    }

    /// Load from `path` if given, else fall back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::defaults()),
        }
    }
}
