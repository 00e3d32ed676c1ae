// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staged and concrete task types (§3 `StagedTask`, `Task`).

use crate::ids::{BatchId, FloorId, ShuttleId, TaskId};
use serde::{Deserialize, Serialize};

/// A request sitting in the staging list, not yet assigned an endpoint.
/// Lives only until the Scheduler Worker consumes it (§4.6, §4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedTask {
    pub batch_id: Option<BatchId>,
    pub pickup_qr: String,
    pub pickup_floor_id: FloorId,
    pub item_info: serde_json::Value,
    pub pallet_type: String,
    pub rack_id: crate::ids::RackId,
    pub target_row: Option<i32>,
    pub target_floor: Option<FloorId>,
}

/// Lifecycle status of a concrete `Task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Failed,
}

/// A concrete transport task (§3 `Task`). Created by the Scheduler, assigned
/// by the Dispatcher, mutated only by the Event Listener thereafter. Removed
/// on completion; retained on failure for operator inspection (§7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub pickup_qr: String,
    pub pickup_floor_id: FloorId,
    pub end_qr: String,
    pub end_floor_id: FloorId,
    pub end_col: i32,
    pub end_row: i32,
    pub pallet_type: String,
    pub item_info: serde_json::Value,
    pub batch_id: Option<BatchId>,
    pub priority: u32,
    pub timestamp_ms: u64,
    pub status: TaskStatus,
    pub assigned_shuttle_id: Option<ShuttleId>,
    pub pickup_completed: bool,
    pub is_carrying: bool,
}

impl Task {
    /// Priority ordering for the Conflict Resolver (§4.10 step B):
    /// carrying beats empty; ties broken by earlier timestamp, then by
    /// lexicographic task id.
    pub fn priority_key(&self) -> (std::cmp::Reverse<bool>, u64, String) {
        (std::cmp::Reverse(self.is_carrying), self.timestamp_ms, self.task_id.to_string())
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
