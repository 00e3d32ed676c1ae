// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP ingestion surface (§6 "HTTP ingestion" and "various read-only status
//! endpoints"). Every handler takes `State<Arc<AppState>>` and returns a
//! `Result<Json<T>, DaemonError>` — `DaemonError`'s own `IntoResponse` maps
//! every failure to the right status code, so handlers never build
//! responses by hand on the error path.

use crate::error::{DaemonError, DaemonResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use sf_core::{Clock, ShuttleId, ShuttleStatus, TaskId, TaskStatus};
use sf_storage::ReservationService;
use sf_wire::http::{
    AutoModeRequest, AutoModeResponse, ExecuteStorageRequest, ExecuteStorageResponse, ExecutingShuttleEntry,
    PlcActiveRequest, RegisterRequest, StopExecutingRequest,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const REGISTERED_PALLETS_KEY: &str = "pallet:registered_ids";

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auto-mode", post(auto_mode))
        .route("/register", post(register))
        .route("/execute-storage", post(execute_storage))
        .route("/executing-shuttles", get(executing_shuttles))
        .route("/stop-executing", post(stop_executing))
        .route("/plc/{id}/active", put(plc_active))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn auto_mode(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AutoModeRequest>,
) -> DaemonResult<Json<AutoModeResponse>> {
    Ok(Json(crate::staging::auto_mode(&state, &request).await?))
}

/// `POST /register` (§6): 409 on a `pallet_id` already seen. Membership is
/// tracked separately from `TaskStore::push_inbound_pallet`'s raw FIFO list,
/// which has no notion of duplicates of its own.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> DaemonResult<Json<serde_json::Value>> {
    if request.pallet_id.trim().is_empty() {
        return Err(DaemonError::Validation("pallet_id must not be empty".to_string()));
    }
    if state.kv.sismember(REGISTERED_PALLETS_KEY, &request.pallet_id).await? {
        return Err(DaemonError::Conflict(format!("pallet {} already registered", request.pallet_id)));
    }
    state.kv.sadd(REGISTERED_PALLETS_KEY, &request.pallet_id).await?;
    state.task_store.push_inbound_pallet(&request.pallet_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `POST /execute-storage` (§6): an on-demand storage run for one
/// already-idle shuttle, bypassing the Staging Pipeline and Scheduler
/// entirely — the caller names both the rack and the shuttle directly. 400
/// if the named shuttle isn't idle, 409 if the rack has no open endpoint for
/// the pallet type; the registered pallet membership this call would have
/// consumed is left untouched so the caller can retry or fall back to
/// `/auto-mode`.
async fn execute_storage(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecuteStorageRequest>,
) -> DaemonResult<Json<ExecuteStorageResponse>> {
    let shuttle_id = ShuttleId::from_string(&request.shuttle_code);
    let shuttle = state
        .shuttle_cache
        .get(&shuttle_id)
        .await?
        .ok_or_else(|| DaemonError::NotFound(format!("shuttle {shuttle_id}")))?;
    if shuttle.shuttle_status != ShuttleStatus::Idle {
        return Err(DaemonError::Validation(format!("shuttle {shuttle_id} is busy")));
    }

    let rack_entry = state.rack_config.get(&request.rack_id)?;
    let floors = state.catalog.floors(&request.rack_id).await?;
    let pickup_floor = floors
        .first()
        .ok_or_else(|| DaemonError::StateInconsistency(format!("rack {} has no configured floors", request.rack_id)))?;

    let mut reserved = None;
    for floor in &floors {
        let available = state.catalog.available_cells(&floor.floor_id, &request.pallet_type, None).await?;
        for cell in available {
            let lock_key = ReservationService::endpoint_lock_key(&cell.id);
            if state
                .reservations
                .acquire_lock(&lock_key, shuttle_id.as_str(), sf_storage::reservation::ENDPOINT_LOCK_TTL_SECS)
                .await?
            {
                reserved = Some(cell);
                break;
            }
        }
        if reserved.is_some() {
            break;
        }
    }
    let Some(cell) = reserved else {
        return Err(DaemonError::Conflict(format!(
            "no storage available on rack {} for pallet type {}",
            request.rack_id, request.pallet_type
        )));
    };

    let task = sf_core::Task {
        task_id: TaskId::new(),
        pickup_qr: rack_entry.pickup_node_qr.clone(),
        pickup_floor_id: pickup_floor.floor_id,
        end_qr: cell.qr.clone(),
        end_floor_id: cell.floor_id,
        end_col: cell.col,
        end_row: cell.row,
        pallet_type: request.pallet_type.clone(),
        item_info: serde_json::json!({}),
        batch_id: None,
        priority: 0,
        timestamp_ms: state.clock.epoch_ms(),
        status: TaskStatus::Pending,
        assigned_shuttle_id: None,
        pickup_completed: false,
        is_carrying: false,
    };
    state.task_store.register_task(&task).await?;

    Ok(Json(ExecuteStorageResponse { task_id: task.task_id, shuttle_id }))
}

/// `GET /executing-shuttles` (§6): a read-only status listing, not a control
/// endpoint (§13 Open Question resolution — this and `/stop-executing` never
/// drive `Task` state transitions). Every non-idle shuttle known to the
/// cache, cross-referenced against its current task if it has one.
async fn executing_shuttles(State(state): State<Arc<AppState>>) -> DaemonResult<Json<Vec<ExecutingShuttleEntry>>> {
    let ids = state.shuttle_cache.known_ids().await?;
    let shuttles = state.shuttle_cache.get_many(&ids).await?;

    let mut entries = Vec::new();
    for shuttle in shuttles {
        if shuttle.shuttle_status == ShuttleStatus::Idle {
            continue;
        }
        let Some(task_id) = shuttle.task_id else { continue };
        entries.push(ExecutingShuttleEntry {
            shuttle_id: shuttle.id,
            task_id,
            status: format!("{:?}", shuttle.shuttle_status),
        });
    }
    Ok(Json(entries))
}

/// `POST /stop-executing` (§6): an operator acknowledgement, not a command —
/// it does not publish a shuttle command or touch `Task` status (§13). The
/// actual halt a yard operator wants comes from the PLC's own e-stop wiring;
/// this just confirms the daemon saw the shuttle reported as in that state.
async fn stop_executing(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StopExecutingRequest>,
) -> DaemonResult<Json<serde_json::Value>> {
    state
        .shuttle_cache
        .get(&request.shuttle_id)
        .await?
        .ok_or_else(|| DaemonError::NotFound(format!("shuttle {}", request.shuttle_id)))?;
    tracing::info!(shuttle_id = %request.shuttle_id, "operator acknowledged stop-executing");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `PUT /plc/{id}/active` (§6): records a PLC's active/inactive flag. No
/// existing store models PLC identity, so this is logged and acknowledged
/// rather than persisted — there is nothing downstream yet that reads it
/// back.
async fn plc_active(
    State(_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<PlcActiveRequest>,
) -> Json<serde_json::Value> {
    tracing::info!(plc_id = %id, active = request.active, "plc active state updated");
    Json(serde_json::json!({ "success": true }))
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
