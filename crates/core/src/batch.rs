// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Master batch tracking for row-by-row staging (§3 `MasterBatch`, §4.6).

use crate::ids::{BatchId, FloorId, RackId};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a `MasterBatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    ProcessingRow,
    Completed,
}

/// A batch of items destined for one rack, staged row by row so the Staging
/// Pipeline never floods the Scheduler with an entire rack at once (§4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterBatch {
    pub batch_id: BatchId,
    pub rack_id: RackId,
    pub pallet_type: String,
    pub pickup_qr: String,
    pub pickup_floor_id: FloorId,
    pub items: Vec<serde_json::Value>,
    pub total_items: usize,
    pub processed_items: usize,
    pub current_row: Option<i32>,
    pub status: BatchStatus,
    pub created_at_ms: u64,
}

impl MasterBatch {
    pub fn is_complete(&self) -> bool {
        self.processed_items >= self.total_items
    }

    pub fn remaining_items(&self) -> usize {
        self.total_items.saturating_sub(self.processed_items)
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
