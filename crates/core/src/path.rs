// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Active path entries for the Path Cache / Traffic Center pillar 1 (§4.3).

use crate::direction::{Action, Direction};
use crate::ids::{ShuttleId, TaskId};
use serde::{Deserialize, Serialize};

/// One step of a computed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub qr_index: usize,
    pub direction: Direction,
    pub action: Action,
}

/// Metadata stamped on an active path (§3 `Active Path Entry`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMeta {
    pub task_id: Option<TaskId>,
    pub is_carrying: bool,
    pub priority: u32,
    pub end_qr: String,
    pub end_floor_id: String,
    pub path_length: usize,
}

/// An active path owned by one shuttle, including its steps' QRs.
///
/// `steps` and `meta` are kept as a single record (Open Question #1,
/// resolved in DESIGN.md) so `savePath`/`getPath` are atomic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePathEntry {
    pub shuttle_id: ShuttleId,
    /// Full QR sequence including the start node as step 1 (§9 Design
    /// Notes: "paths always include the start node as step 1").
    pub qrs: Vec<String>,
    pub steps: Vec<PathStep>,
    pub meta: PathMeta,
    pub timestamp_ms: u64,
    pub ttl_ms: u64,
}

impl ActivePathEntry {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.timestamp_ms + self.ttl_ms
    }

    /// QR at the given step index, if the step is not the start marker.
    pub fn qr_at(&self, step: &PathStep) -> Option<&str> {
        self.qrs.get(step.qr_index).map(|s| s.as_str())
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
