// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    BatchId, BatchStatus, Event, FloorId, MasterBatch, RackId, ShuttleId, ShuttleState,
    ShuttleStatus, StagedTask, Task, TaskId, TaskStatus,
};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::ShuttleStatus;
    use proptest::prelude::*;

    pub fn arb_shuttle_status() -> impl Strategy<Value = ShuttleStatus> {
        prop_oneof![
            Just(ShuttleStatus::Error),
            Just(ShuttleStatus::Picking),
            Just(ShuttleStatus::Dropping),
            Just(ShuttleStatus::WheelsUp),
            Just(ShuttleStatus::WheelsDown),
            Just(ShuttleStatus::Slow),
            Just(ShuttleStatus::Normal),
            Just(ShuttleStatus::Idle),
            Just(ShuttleStatus::Waiting),
        ]
    }
}

// ── Event factory functions ─────────────────────────────────────────────────

pub fn shuttle_initialized_event(shuttle_id: &str, qr: &str, floor_id: &str) -> Event {
    Event::ShuttleInitialized {
        shuttle_id: ShuttleId::from_string(shuttle_id),
        ip: "10.0.0.1".to_string(),
        current_qr: qr.to_string(),
        floor_id: floor_id.to_string(),
    }
}

pub fn shuttle_moved_event(shuttle_id: &str, qr: &str, step: u32) -> Event {
    Event::ShuttleMoved {
        shuttle_id: ShuttleId::from_string(shuttle_id),
        current_qr: qr.to_string(),
        current_step: step,
        shuttle_status: ShuttleStatus::Normal,
    }
}

pub fn task_complete_event(shuttle_id: &str, task_id: &str) -> Event {
    Event::TaskComplete {
        shuttle_id: ShuttleId::from_string(shuttle_id),
        task_id: TaskId::from_string(task_id),
    }
}

// ── Domain object factory functions ─────────────────────────────────────────

pub fn shuttle_state(id: &str, qr: &str, floor_id: &str) -> ShuttleState {
    ShuttleState {
        id: ShuttleId::from_string(id),
        ip: "10.0.0.1".to_string(),
        current_qr: qr.to_string(),
        floor_id: floor_id.to_string(),
        shuttle_status: ShuttleStatus::Idle,
        command_complete: 1,
        package_status: 0,
        pallet_lifting_status: 0,
        current_step: 0,
        mission_completed: true,
        task_id: None,
        target_qr: None,
        is_carrying: false,
        last_update_ms: 0,
    }
}

pub fn task(task_id: &str, pickup_qr: &str, end_qr: &str) -> Task {
    Task {
        task_id: TaskId::from_string(task_id),
        pickup_qr: pickup_qr.to_string(),
        pickup_floor_id: FloorId::from_string("137"),
        end_qr: end_qr.to_string(),
        end_floor_id: FloorId::from_string("137"),
        end_col: 1,
        end_row: 1,
        pallet_type: "euro".to_string(),
        item_info: serde_json::json!({}),
        batch_id: None,
        priority: 0,
        timestamp_ms: 0,
        status: TaskStatus::Pending,
        assigned_shuttle_id: None,
        pickup_completed: false,
        is_carrying: false,
    }
}

pub fn staged_task(pickup_qr: &str, rack_id: &str) -> StagedTask {
    StagedTask {
        batch_id: None,
        pickup_qr: pickup_qr.to_string(),
        pickup_floor_id: FloorId::from_string("137"),
        item_info: serde_json::json!({}),
        pallet_type: "euro".to_string(),
        rack_id: RackId::from_string(rack_id),
        target_row: None,
        target_floor: None,
    }
}

pub fn master_batch(batch_id: &str, rack_id: &str, total_items: usize) -> MasterBatch {
    MasterBatch {
        batch_id: BatchId::from_string(batch_id),
        rack_id: RackId::from_string(rack_id),
        pallet_type: "euro".to_string(),
        pickup_qr: "X0001Y0001".to_string(),
        pickup_floor_id: FloorId::from_string("137"),
        items: vec![serde_json::json!({}); total_items],
        total_items,
        processed_items: 0,
        current_row: None,
        status: BatchStatus::Pending,
        created_at_ms: 0,
    }
}
