// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission payload vocabulary produced by the Mission Coordinator (§4.5).
//!
//! The wire-level JSON shape (`step1.."stepN"` strings, `running_path_simulation`)
//! lives in `sf-wire`; this module holds the structured domain form that the
//! engine and daemon operate on.

use crate::ids::TaskId;
use crate::path::PathStep;
use serde::{Deserialize, Serialize};

/// What the shuttle (or the waiting coordinator) should do once it finishes
/// executing the current segment (§4.5 mission payload `meta.onArrival`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnArrival {
    PickupComplete,
    TaskComplete,
    ArrivedAtLifter,
    WaitingForLifter,
}

/// Metadata attached to a mission (§4.5 mission payload `meta`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionMeta {
    pub task_id: TaskId,
    pub on_arrival: OnArrival,
    pub step: u32,
    pub final_target_qr: String,
    pub final_target_floor_id: String,
    pub pickup_qr: String,
    pub end_qr: String,
    pub item_info: serde_json::Value,
    pub is_carrying: bool,
}

/// A computed, not-yet-transmitted mission: a single-floor path segment plus
/// the metadata the shuttle and the Event Listener need to drive the task
/// forward once it completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub qrs: Vec<String>,
    pub steps: Vec<PathStep>,
    pub meta: MissionMeta,
}

impl Mission {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
#[path = "mission_tests.rs"]
mod tests;
