// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traffic Snapshot Provider (§9 Design Notes: the Pathfinder needs Pillar 1's
//! active paths and corridor map, and the Conflict Resolver needs the
//! Pathfinder, but neither pillar should depend on the other's crate). This
//! abstraction is the seam: the Pathfinder takes a `&TrafficSnapshot` it
//! didn't have to know how to build, and the Conflict Resolver (in
//! `sf-daemon`) builds one the same way each retry.

use async_trait::async_trait;
use sf_core::{ActivePathEntry, Direction};
use sf_storage::{detect_traffic_flow_corridors, Corridor, NodeOccupationMap, PathCache};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything the Pathfinder's cost function needs about other shuttles'
/// current activity (§4.4 cost table).
#[derive(Debug, Clone, Default)]
pub struct TrafficSnapshot {
    /// qr -> shuttle id currently holding that node (§4.2).
    pub occupied: HashMap<String, String>,
    /// Every active path, for "is a neighbour on someone else's path, and in
    /// which direction" lookups.
    pub active_paths: Vec<ActivePathEntry>,
    /// qr -> aggregated corridor classification (§4.3 `detectTrafficFlowCorridors`).
    pub corridors: HashMap<String, Corridor>,
}

impl TrafficSnapshot {
    /// Other shuttles' intended direction of travel through `qr`, alongside
    /// whether that shuttle is carrying. A QR can appear on more than one
    /// active path's step list only transiently; we return every match since
    /// the cost function folds them into a single penalty.
    pub fn travellers_at(&self, qr: &str) -> Vec<(Direction, bool)> {
        let mut out = Vec::new();
        for entry in &self.active_paths {
            for step in &entry.steps {
                if entry.qr_at(step) == Some(qr) {
                    out.push((step.direction, entry.meta.is_carrying));
                }
            }
        }
        out
    }

    pub fn corridor_at(&self, qr: &str) -> Option<&Corridor> {
        self.corridors.get(qr)
    }

    pub fn is_occupied(&self, qr: &str) -> bool {
        self.occupied.contains_key(qr)
    }
}

/// Builds a `TrafficSnapshot` from the live store state. Implemented once
/// here (backed by `sf-storage`) and shared by the Pathfinder's callers and
/// the Conflict Resolver's retry loop, so both always reason about the same
/// view of the world.
#[async_trait]
pub trait TrafficSnapshotProvider: Send + Sync {
    async fn snapshot(&self) -> sf_storage::KvResult<TrafficSnapshot>;
}

pub struct StorageTrafficSnapshotProvider {
    occupation: Arc<NodeOccupationMap>,
    paths: Arc<PathCache>,
}

impl StorageTrafficSnapshotProvider {
    pub fn new(occupation: Arc<NodeOccupationMap>, paths: Arc<PathCache>) -> Self {
        Self { occupation, paths }
    }
}

#[async_trait]
impl TrafficSnapshotProvider for StorageTrafficSnapshotProvider {
    async fn snapshot(&self) -> sf_storage::KvResult<TrafficSnapshot> {
        let occupied = self.occupation.get_all_occupied().await?;
        let active_paths = self.paths.get_all_active_paths().await?;
        let corridors = detect_traffic_flow_corridors(&active_paths);
        Ok(TrafficSnapshot { occupied, active_paths, corridors })
    }
}

#[cfg(test)]
#[path = "traffic_tests.rs"]
mod tests;
