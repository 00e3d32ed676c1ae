// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staging Pipeline (§4.6): turns a `POST /auto-mode` request into a
//! `MasterBatch` and feeds the Scheduler Worker one row at a time so a
//! thousand-pallet rack never floods the staging queue at once.

use crate::error::{DaemonError, DaemonResult};
use crate::state::AppState;
use sf_core::{BatchId, BatchStatus, Cell, Clock, MasterBatch, StagedTask};
use sf_wire::http::{AutoModeData, AutoModeItem, AutoModeRequest, AutoModeResponse};

pub async fn auto_mode(state: &AppState, request: &AutoModeRequest) -> DaemonResult<AutoModeResponse> {
    let mut batch_ids = Vec::new();
    let mut errors = Vec::new();

    for item in request.items() {
        match stage_item(state, item).await {
            Ok(batch_id) => batch_ids.push(batch_id),
            Err(err) => {
                tracing::warn!(rack_id = %item.rack_id, error = %err, "auto-mode item rejected");
                errors.push(err.to_string());
            }
        }
    }

    Ok(AutoModeResponse {
        success: errors.is_empty(),
        data: AutoModeData { total_batches: batch_ids.len(), batch_ids, errors },
    })
}

async fn stage_item(state: &AppState, item: &AutoModeItem) -> DaemonResult<BatchId> {
    if item.list_item.is_empty() {
        return Err(DaemonError::Validation("listItem must not be empty".to_string()));
    }

    let rack_entry = state.rack_config.get(&item.rack_id)?;
    let floors = state.catalog.floors(&item.rack_id).await?;
    let pickup_floor = floors
        .first()
        .ok_or_else(|| DaemonError::StateInconsistency(format!("rack {} has no configured floors", item.rack_id)))?;

    let pickup_cell = state.catalog.cell(&pickup_floor.floor_id, &rack_entry.pickup_node_qr).await?;
    if pickup_cell.rack_id != item.rack_id {
        return Err(DaemonError::StateInconsistency(format!(
            "pickup node {} belongs to rack {}, not {}",
            rack_entry.pickup_node_qr, pickup_cell.rack_id, item.rack_id
        )));
    }

    let batch = MasterBatch {
        batch_id: BatchId::new(),
        rack_id: item.rack_id,
        pallet_type: item.pallet_type.clone(),
        pickup_qr: rack_entry.pickup_node_qr.clone(),
        pickup_floor_id: pickup_floor.floor_id,
        items: item.list_item.clone(),
        total_items: item.list_item.len(),
        processed_items: 0,
        current_row: None,
        status: BatchStatus::Pending,
        created_at_ms: state.clock.epoch_ms(),
    };
    state.batch_store.create(&batch).await?;
    process_batch_row(state, &batch.batch_id).await?;
    Ok(batch.batch_id)
}

/// Pushes the next row's worth of `StagedTask`s for a batch (§4.6 step 5),
/// scanning the rack's floors in order for the first one with open storage
/// of the batch's pallet type. Idempotent with respect to `processed_items`:
/// calling this again on a batch that's already mid-row just re-derives the
/// same row from the store's current counters.
pub async fn process_batch_row(state: &AppState, batch_id: &BatchId) -> DaemonResult<()> {
    let Some(mut batch) = state.batch_store.get(batch_id).await? else {
        return Err(DaemonError::NotFound(format!("batch {batch_id}")));
    };

    if batch.is_complete() {
        batch.status = BatchStatus::Completed;
        state.batch_store.save(&batch).await?;
        return Ok(());
    }

    let floors = state.catalog.floors(&batch.rack_id).await?;
    let mut target: Option<(sf_core::FloorId, Vec<Cell>)> = None;
    for floor in &floors {
        let available = state.catalog.available_cells(&floor.floor_id, &batch.pallet_type, None).await?;
        if !available.is_empty() {
            target = Some((floor.floor_id, available));
            break;
        }
    }
    let Some((target_floor, available)) = target else {
        return Err(DaemonError::Conflict(format!(
            "no storage available on rack {} for pallet type {}",
            batch.rack_id, batch.pallet_type
        )));
    };

    let target_row = available[0].row;
    let row_cells: Vec<Cell> = available.into_iter().filter(|c| c.row == target_row).collect();
    let remaining = batch.remaining_items();
    let node_count = row_cells.len().min(remaining);
    let items_to_push = &batch.items[batch.processed_items..batch.processed_items + node_count];

    for item in items_to_push {
        let staged = StagedTask {
            batch_id: Some(*batch_id),
            pickup_qr: batch.pickup_qr.clone(),
            pickup_floor_id: batch.pickup_floor_id,
            item_info: item.clone(),
            pallet_type: batch.pallet_type.clone(),
            rack_id: batch.rack_id,
            target_row: Some(target_row),
            target_floor: Some(target_floor),
        };
        state.task_store.push_staged(&staged).await?;
    }

    state.batch_store.set_row_counter(batch_id, node_count as i64).await?;
    batch.current_row = Some(target_row);
    batch.status = BatchStatus::ProcessingRow;
    state.batch_store.save(&batch).await?;
    Ok(())
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;
