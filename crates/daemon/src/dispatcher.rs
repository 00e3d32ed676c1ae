// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher (§4.8): pairs the next pending task with the nearest idle
//! shuttle on its pickup floor and sends the first mission segment.

use crate::error::DaemonResult;
use crate::state::AppState;
use sf_core::{OnArrival, ShuttleState, ShuttleStatus, TaskStatus};
use sf_engine::{MissionOutcome, SegmentRequest};
use sf_storage::ReservationService;
use sf_wire::MissionPayload;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const TICK_INTERVAL: Duration = Duration::from_secs(5);

pub fn spawn(state: Arc<AppState>, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("dispatcher stopped");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(err) = tick(&state).await {
                        tracing::warn!(error = %err, "dispatcher tick failed");
                    }
                }
            }
        }
    })
}

/// One Dispatcher pass (§4.8): peek the oldest pending task, reserve its
/// pickup lock, pick the nearest idle same-floor shuttle, and publish the
/// first mission segment. A task with no free shuttle yet is left pending
/// and retried on the next tick.
pub async fn tick(state: &AppState) -> DaemonResult<()> {
    let Some(task_id) = state.task_store.peek_next_pending().await? else {
        return Ok(());
    };
    let Some(task) = state.task_store.get_task(&task_id).await? else {
        state.task_store.remove_from_pending(&task_id).await?;
        return Ok(());
    };
    if task.status != TaskStatus::Pending {
        state.task_store.remove_from_pending(&task_id).await?;
        return Ok(());
    }

    let lock_key = ReservationService::pickup_lock_key(&task.pickup_qr);
    if !state.reservations.acquire_lock(&lock_key, task.task_id.as_str(), sf_storage::reservation::PICKUP_LOCK_TTL_SECS).await? {
        tracing::debug!(task_id = %task.task_id, "pickup node busy, deferring");
        return Ok(());
    }

    let Some(mut shuttle) = nearest_idle_shuttle(state, &task.pickup_floor_id, &task.pickup_qr).await? else {
        state.reservations.release_lock(&lock_key).await?;
        return Ok(());
    };

    let request = SegmentRequest {
        task_id: task.task_id,
        final_target_qr: task.pickup_qr.clone(),
        final_target_floor_id: task.pickup_floor_id.to_string(),
        on_arrival: OnArrival::PickupComplete,
        is_carrying: false,
        pickup_qr: task.pickup_qr.clone(),
        end_qr: task.end_qr.clone(),
        item_info: task.item_info.clone(),
        step: 1,
        priority: task.priority,
    };
    let outcome = state.mission_coordinator.calculate_next_segment(&shuttle.id, &request).await?;

    match outcome {
        MissionOutcome::Ready(mission) => {
            let payload = MissionPayload::from(&mission);
            crate::mission_publish::publish_mission_with_retry(state, &shuttle.id, &payload).await?;
        }
        MissionOutcome::WaitingForLifter { floor_id } => {
            tracing::info!(shuttle_id = %shuttle.id, floor_id, "shuttle waiting for lifter before pickup segment");
        }
    }

    let mut assigned = task;
    assigned.status = TaskStatus::Assigned;
    assigned.assigned_shuttle_id = Some(shuttle.id);
    state.task_store.save_task(&assigned).await?;
    state.task_store.remove_from_pending(&assigned.task_id).await?;
    state.task_store.mark_processing(&assigned.task_id).await?;

    // The Conflict Resolver (`task_priority`) and the diagnostic
    // `executing-shuttles`/`stop-executing` endpoints both read the
    // shuttle's `taskId` back off live state, so it must be stamped here,
    // the only place a task is actually handed to a shuttle.
    shuttle.task_id = Some(assigned.task_id);
    shuttle.target_qr = Some(assigned.pickup_qr.clone());
    state.shuttle_cache.put(&shuttle).await?;

    Ok(())
}

/// Manhattan-distance nearest idle shuttle, restricted to the task's pickup
/// floor: a cross-floor shuttle would need a lifter ride just to reach the
/// pickup, so it is never worth preferring over a same-floor one (§4.8).
/// Coordinates are resolved through the catalog rather than parsed out of
/// the QR string — a cell's QR digits don't have to equal its `(col, row)`.
async fn nearest_idle_shuttle(
    state: &AppState,
    pickup_floor_id: &sf_core::FloorId,
    pickup_qr: &str,
) -> DaemonResult<Option<ShuttleState>> {
    let target = state.catalog.cell(pickup_floor_id, pickup_qr).await?;
    let ids = state.shuttle_cache.known_ids().await?;
    let states = state.shuttle_cache.get_many(&ids).await?;

    let mut best: Option<(i64, ShuttleState)> = None;
    for candidate in states {
        if candidate.shuttle_status != ShuttleStatus::Idle {
            continue;
        }
        if candidate.floor_id != pickup_floor_id.to_string() {
            continue;
        }
        let Ok(cell) = state.catalog.cell(pickup_floor_id, &candidate.current_qr).await else {
            tracing::warn!(shuttle_id = %candidate.id, qr = %candidate.current_qr, "idle shuttle sits on an unknown cell, skipping");
            continue;
        };
        let distance = ((cell.col - target.col).abs() + (cell.row - target.row).abs()) as i64;
        if best.as_ref().is_none_or(|(best_distance, _)| distance < *best_distance) {
            best = Some((distance, candidate));
        }
    }

    Ok(best.map(|(_, s)| s))
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
