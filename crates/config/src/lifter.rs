// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifter node list and floor mapping (§7 "lifter node list and floor
//! mapping"), consulted by the Mission Coordinator when a segment crosses
//! floors (§4.5 step 3).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One lifter's per-floor boarding QR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifterEntry {
    pub lifter_id: String,
    /// Floor id -> QR the lifter occupies when parked at that floor.
    pub floor_nodes: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifterConfig {
    lifters: Vec<LifterEntry>,
}

impl LifterConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Lifter id serving `floor_id`, and its boarding QR there, if one exists.
    pub fn serving(&self, floor_id: &str) -> Option<(&str, &str)> {
        self.lifters.iter().find_map(|entry| {
            entry
                .floor_nodes
                .get(floor_id)
                .map(|qr| (entry.lifter_id.as_str(), qr.as_str()))
        })
    }

    pub fn is_lifter_qr(&self, qr: &str) -> bool {
        self.lifters
            .iter()
            .any(|entry| entry.floor_nodes.values().any(|v| v == qr))
    }
}

#[cfg(test)]
#[path = "lifter_tests.rs"]
mod tests;
