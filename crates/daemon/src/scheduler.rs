// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler Worker (§4.7): turns staged tasks into concrete `Task`s with a
//! reserved endpoint, one staging-queue pop at a time, every 5s.

use crate::state::AppState;
use sf_core::{Clock, StagedTask, Task, TaskStatus};
use sf_storage::ReservationService;
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
                    tracing::info!("scheduler worker stopped");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(err) = tick(&state).await {
                        tracing::warn!(error = %err, "scheduler tick failed");
                    }
                }
            }
        }
    })
}

/// One Scheduler Worker pass (§4.7 steps 1-6): pop the next staged task,
/// resolve a row (pinned, if the batch already has 2+ shuttles converged on
/// one), walk candidate endpoints trying to reserve one, and register a
/// concrete `Task` on the first success. On any failure after the pop, the
/// staged task is pushed back to preserve at-least-once delivery.
pub async fn tick(state: &AppState) -> crate::error::DaemonResult<()> {
    let Some(staged) = state.task_store.pop_staged().await? else {
        return Ok(());
    };

    match schedule_one(state, &staged).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::debug!(pickup_qr = %staged.pickup_qr, "no endpoint available, requeueing");
            state.task_store.requeue_staged_head(&staged).await?;
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "scheduling failed, requeueing staged task");
            state.task_store.requeue_staged_head(&staged).await?;
            Err(err)
        }
    }
}

async fn schedule_one(state: &AppState, staged: &StagedTask) -> crate::error::DaemonResult<bool> {
    let target_floor = staged.target_floor.unwrap_or(staged.pickup_floor_id);
    let target_row = resolve_row(state, staged).await?;

    let candidates = state.catalog.available_cells(&target_floor, &staged.pallet_type, target_row).await?;
    for cell in candidates {
        let lock_key = ReservationService::endpoint_lock_key(&cell.id);
        let owner = format!("pending:{}", staged.pickup_qr);
        if !state.reservations.acquire_lock(&lock_key, &owner, sf_storage::reservation::ENDPOINT_LOCK_TTL_SECS).await? {
            continue;
        }

        let task = Task {
            task_id: sf_core::TaskId::new(),
            pickup_qr: staged.pickup_qr.clone(),
            pickup_floor_id: staged.pickup_floor_id,
            end_qr: cell.qr.clone(),
            end_floor_id: cell.floor_id,
            end_col: cell.col,
            end_row: cell.row,
            pallet_type: staged.pallet_type.clone(),
            item_info: staged.item_info.clone(),
            batch_id: staged.batch_id,
            priority: 0,
            timestamp_ms: state.clock.epoch_ms(),
            status: TaskStatus::Pending,
            assigned_shuttle_id: None,
            pickup_completed: false,
            is_carrying: false,
        };
        state.task_store.register_task(&task).await?;

        if let Some(batch_id) = staged.batch_id {
            if let Some(row) = staged.target_row {
                state.row_directions.pin_batch_row(&batch_id, &row.to_string()).await?;
            }
        }

        return Ok(true);
    }

    Ok(false)
}

/// Once a batch has converged shuttles on a row, every subsequent staged
/// task for that batch must target the same row rather than the row it was
/// originally staged with, so the Row Direction Manager never sees two
/// directions open on the same batch at once (§4.7, §4.11).
async fn resolve_row(state: &AppState, staged: &StagedTask) -> crate::error::DaemonResult<Option<i32>> {
    let Some(batch_id) = staged.batch_id else {
        return Ok(staged.target_row);
    };
    match state.row_directions.pinned_row(&batch_id).await? {
        Some(pinned) => Ok(pinned.parse().ok().or(staged.target_row)),
        None => Ok(staged.target_row),
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
