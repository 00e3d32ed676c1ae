// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::{test_config, TestApp};
use sf_core::{CellType, DirectionSet, FloorId, RackId, StagedTask};

fn storage_cell(qr: &str, col: i32, row: i32, floor_id: &str, rack_id: &str) -> sf_core::Cell {
    sf_core::Cell {
        id: qr.to_string(),
        qr: qr.to_string(),
        name: qr.to_string(),
        col,
        row,
        floor_id: FloorId::from_string(floor_id),
        rack_id: RackId::from_string(rack_id),
        cell_type: CellType::Storage,
        direction_type: DirectionSet::ALL,
        is_blocked: false,
        has_box: false,
        pallet_id: None,
        pallet_type_compat: None,
    }
}

fn staged(rack_id: &str, floor_id: &str) -> StagedTask {
    StagedTask {
        batch_id: None,
        pickup_qr: "X0001Y0001".to_string(),
        pickup_floor_id: FloorId::from_string(floor_id),
        item_info: serde_json::json!("plt-1"),
        pallet_type: "euro".to_string(),
        rack_id: RackId::from_string(rack_id),
        target_row: Some(0),
        target_floor: Some(FloorId::from_string(floor_id)),
    }
}

#[tokio::test]
async fn tick_registers_a_task_and_reserves_the_first_free_endpoint() {
    let app = TestApp::new(test_config());
    app.catalog.insert_cell(storage_cell("X0002Y0001", 1, 0, "137", "rck-main"));
    app.state.task_store.push_staged(&staged("rck-main", "137")).await.expect("push");

    tick(&app.state).await.expect("tick");

    assert_eq!(app.state.task_store.staging_queue_len().await.expect("len"), 0);
    let pending = app.state.task_store.peek_next_pending().await.expect("peek").expect("one pending");
    let task = app.state.task_store.get_task(&pending).await.expect("get").expect("present");
    assert_eq!(task.end_qr, "X0002Y0001");
    assert_eq!(task.status, sf_core::TaskStatus::Pending);

    let owner = app
        .state
        .reservations
        .get_lock_owner(&sf_storage::ReservationService::endpoint_lock_key("X0002Y0001"))
        .await
        .expect("owner")
        .expect("locked");
    assert_eq!(owner, "pending:X0001Y0001");
}

#[tokio::test]
async fn tick_requeues_when_no_endpoint_is_free() {
    let app = TestApp::new(test_config());
    let cell = storage_cell("X0002Y0001", 1, 0, "137", "rck-main");
    app.catalog.insert_cell(cell.clone());
    app.state
        .reservations
        .acquire_lock(&sf_storage::ReservationService::endpoint_lock_key(&cell.id), "someone-else", 300)
        .await
        .expect("pre-lock");
    app.state.task_store.push_staged(&staged("rck-main", "137")).await.expect("push");

    tick(&app.state).await.expect("tick");

    assert_eq!(app.state.task_store.staging_queue_len().await.expect("len"), 1);
    assert!(app.state.task_store.peek_next_pending().await.expect("peek").is_none());
}

#[tokio::test]
async fn tick_is_a_no_op_when_the_staging_queue_is_empty() {
    let app = TestApp::new(test_config());
    tick(&app.state).await.expect("tick");
    assert_eq!(app.state.task_store.staging_queue_len().await.expect("len"), 0);
}
