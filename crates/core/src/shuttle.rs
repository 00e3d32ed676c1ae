// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shuttle live-state model (§3 `Shuttle State`).
//!
//! Created on first telemetry, mutated only by the telemetry handler, and
//! expired if no update arrives within the liveness TTL (~10s, enforced by
//! the Shuttle State Cache in `sf-storage`, not here).

use crate::ids::{ShuttleId, TaskId};
use serde::{Deserialize, Serialize};

/// Shuttle status codes, numbered to match the wire telemetry format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShuttleStatus {
    Error = 1,
    Picking = 2,
    Dropping = 3,
    WheelsUp = 4,
    WheelsDown = 5,
    Slow = 6,
    Normal = 7,
    Idle = 8,
    Waiting = 9,
}

impl ShuttleStatus {
    pub fn from_u8(v: u8) -> Option<ShuttleStatus> {
        match v {
            1 => Some(ShuttleStatus::Error),
            2 => Some(ShuttleStatus::Picking),
            3 => Some(ShuttleStatus::Dropping),
            4 => Some(ShuttleStatus::WheelsUp),
            5 => Some(ShuttleStatus::WheelsDown),
            6 => Some(ShuttleStatus::Slow),
            7 => Some(ShuttleStatus::Normal),
            8 => Some(ShuttleStatus::Idle),
            9 => Some(ShuttleStatus::Waiting),
            _ => None,
        }
    }

    pub fn is_idle(self) -> bool {
        matches!(self, ShuttleStatus::Idle)
    }
}

/// Per-shuttle live state, refreshed by telemetry only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuttleState {
    pub id: ShuttleId,
    pub ip: String,
    pub current_qr: String,
    pub floor_id: String,
    pub shuttle_status: ShuttleStatus,
    pub command_complete: u8,
    pub package_status: u8,
    pub pallet_lifting_status: u8,
    pub current_step: u32,
    pub mission_completed: bool,
    pub task_id: Option<TaskId>,
    pub target_qr: Option<String>,
    pub is_carrying: bool,
    /// Epoch milliseconds of the last telemetry update.
    pub last_update_ms: u64,
}

impl ShuttleState {
    /// Invariant from §3: `isCarrying ⇔ packageStatus=1`.
    pub fn carrying_invariant_holds(&self) -> bool {
        self.is_carrying == (self.package_status == 1)
    }

    pub fn is_live(&self, now_ms: u64, liveness_ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_update_ms) < liveness_ttl_ms
    }
}

#[cfg(test)]
#[path = "shuttle_tests.rs"]
mod tests;
