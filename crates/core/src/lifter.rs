// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifter live-state model (§4.5 step 3 readiness check, §4.9
//! `ARRIVED_AT_LIFTER`/`WAITING_FOR_LIFTER`). Mirrors `ShuttleState`: written
//! only by the lifter-events handler, read by the Mission Coordinator.

use crate::ids::FloorId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifterStatus {
    Idle,
    Moving,
}

/// Per-lifter live state, keyed by the `lifter_id` assigned in the static
/// lifter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifterState {
    pub lifter_id: String,
    pub current_floor_id: FloorId,
    pub status: LifterStatus,
    pub updated_at_ms: u64,
}

impl LifterState {
    pub fn is_idle_at(&self, floor_id: &FloorId) -> bool {
        self.status == LifterStatus::Idle && self.current_floor_id == *floor_id
    }
}

#[cfg(test)]
#[path = "lifter_tests.rs"]
mod tests;
