// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static rack configuration (§7 "rack configuration file listing
//! `{rackId: {pickupNodeQr, safetyNodeExit, parkingNodes}}`").
//!
//! Loaded once at startup and treated as immutable for the process
//! lifetime; there is no hot reload.

use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sf_core::RackId;
use std::path::Path;

/// Per-rack static geometry the Scheduler and Conflict Resolver consult when
/// assigning endpoints and picking parking spots (§4.7, §4.10 step D).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackEntry {
    pub pickup_node_qr: String,
    pub safety_node_exit: String,
    #[serde(default)]
    pub parking_nodes: Vec<String>,
}

/// The full rack configuration file, keyed by rack id. `IndexMap` preserves
/// declaration order for deterministic `list()` output in the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RackConfig {
    #[serde(flatten)]
    racks: IndexMap<String, RackEntry>,
}

impl RackConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path=?path, racks=config.racks.len(), "rack config loaded");
        Ok(config)
    }

    pub fn get(&self, rack_id: &RackId) -> Result<&RackEntry, ConfigError> {
        self.racks
            .get(rack_id.as_str())
            .ok_or_else(|| ConfigError::UnknownRack(rack_id.to_string()))
    }

    pub fn rack_ids(&self) -> impl Iterator<Item = &str> {
        self.racks.keys().map(String::as_str)
    }

    pub fn is_parking_node(&self, rack_id: &RackId, qr: &str) -> bool {
        self.racks
            .get(rack_id.as_str())
            .is_some_and(|entry| entry.parking_nodes.iter().any(|p| p == qr))
    }

    /// Finds the rack whose `pickup_node_qr` matches `pickup_qr` (tasks
    /// don't carry a `rack_id`, only the pickup QR they were staged
    /// against, so this is how the Event Listener resolves `safetyNodeExit`
    /// for the two-stage pickup-lock release, §4.9).
    pub fn find_by_pickup_qr(&self, pickup_qr: &str) -> Option<&RackEntry> {
        self.racks.values().find(|entry| entry.pickup_node_qr == pickup_qr)
    }
}

#[cfg(test)]
#[path = "rack_tests.rs"]
mod tests;
