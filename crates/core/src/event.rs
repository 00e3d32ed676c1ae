// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound events the Event Listener consumes to drive the task state
//! machine (§4.9), plus shuttle telemetry ingestion.
//!
//! Serializes with `{"type": "event:name", ...fields}` format. Unknown type
//! tags deserialize to `Custom`.

use crate::ids::{ShuttleId, TaskId};
use crate::shuttle::ShuttleStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- shuttle lifecycle --
    #[serde(rename = "shuttle:initialized")]
    ShuttleInitialized {
        shuttle_id: ShuttleId,
        ip: String,
        current_qr: String,
        floor_id: String,
    },

    #[serde(rename = "shuttle:moved")]
    ShuttleMoved {
        shuttle_id: ShuttleId,
        current_qr: String,
        current_step: u32,
        shuttle_status: ShuttleStatus,
    },

    #[serde(rename = "shuttle:task_started")]
    ShuttleTaskStarted {
        shuttle_id: ShuttleId,
        task_id: TaskId,
        target_qr: String,
    },

    #[serde(rename = "shuttle:waiting")]
    ShuttleWaiting {
        shuttle_id: ShuttleId,
        blocked_on: ShuttleId,
        current_qr: String,
    },

    // -- mission progress (§4.5, §4.9 on-arrival reasons) --
    #[serde(rename = "mission:pickup_complete")]
    PickupComplete {
        shuttle_id: ShuttleId,
        task_id: TaskId,
    },

    #[serde(rename = "mission:arrived_at_lifter")]
    ArrivedAtLifter {
        shuttle_id: ShuttleId,
        task_id: TaskId,
        lifter_qr: String,
    },

    #[serde(rename = "mission:waiting_for_lifter")]
    WaitingForLifter {
        shuttle_id: ShuttleId,
        task_id: TaskId,
    },

    #[serde(rename = "mission:task_complete")]
    TaskComplete {
        shuttle_id: ShuttleId,
        task_id: TaskId,
    },

    // -- telemetry ingestion (§4.2 nodeFinding/registerShuttle/updatePosition) --
    #[serde(rename = "telemetry:position")]
    TelemetryPosition {
        shuttle_id: ShuttleId,
        current_qr: String,
        floor_id: String,
        shuttle_status: ShuttleStatus,
        command_complete: u8,
        package_status: u8,
        pallet_lifting_status: u8,
        timestamp_ms: u64,
    },

    /// Catch-all for unknown event types (extensibility).
    #[serde(other, skip_serializing)]
    Custom,
}

impl Event {
    /// Shuttle this event pertains to, if any (used for log correlation).
    pub fn shuttle_id(&self) -> Option<&ShuttleId> {
        match self {
            Event::ShuttleInitialized { shuttle_id, .. }
            | Event::ShuttleMoved { shuttle_id, .. }
            | Event::ShuttleTaskStarted { shuttle_id, .. }
            | Event::ShuttleWaiting { shuttle_id, .. }
            | Event::PickupComplete { shuttle_id, .. }
            | Event::ArrivedAtLifter { shuttle_id, .. }
            | Event::WaitingForLifter { shuttle_id, .. }
            | Event::TaskComplete { shuttle_id, .. }
            | Event::TelemetryPosition { shuttle_id, .. } => Some(shuttle_id),
            Event::Custom => None,
        }
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Event::ShuttleTaskStarted { task_id, .. }
            | Event::PickupComplete { task_id, .. }
            | Event::ArrivedAtLifter { task_id, .. }
            | Event::WaitingForLifter { task_id, .. }
            | Event::TaskComplete { task_id, .. } => Some(task_id),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
