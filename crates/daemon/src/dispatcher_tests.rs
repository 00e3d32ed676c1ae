// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::{test_config, TestApp};
use sf_adapters::RecordedPublish;
use sf_core::test_support as fixtures;
use sf_core::{CellType, DirectionSet, FloorId, RackId};

fn pickup_cell() -> sf_core::Cell {
    sf_core::Cell {
        id: "X0001Y0001".to_string(),
        qr: "X0001Y0001".to_string(),
        name: "X0001Y0001".to_string(),
        col: 1,
        row: 1,
        floor_id: FloorId::from_string("137"),
        rack_id: RackId::from_string("rck-main"),
        cell_type: CellType::Aisle,
        direction_type: DirectionSet::ALL,
        is_blocked: false,
        has_box: false,
        pallet_id: None,
        pallet_type_compat: None,
    }
}

#[tokio::test]
async fn tick_assigns_the_nearest_idle_same_floor_shuttle() {
    let app = TestApp::new(test_config());
    app.catalog.insert_cell(pickup_cell());

    let near = fixtures::shuttle_state("sht-near", "X0001Y0001", "137");
    let far = fixtures::shuttle_state("sht-far", "X0009Y0009", "137");
    app.state.shuttle_cache.register(&near).await.expect("register near");
    app.state.shuttle_cache.register(&far).await.expect("register far");

    let task = fixtures::task("tsk-1", "X0001Y0001", "X0005Y0001");
    app.state.task_store.register_task(&task).await.expect("register task");

    tick(&app.state).await.expect("tick");

    let saved = app.state.task_store.get_task(&task.task_id).await.expect("get").expect("present");
    assert_eq!(saved.status, sf_core::TaskStatus::Assigned);
    assert_eq!(saved.assigned_shuttle_id, Some(near.id));
    assert!(app.state.task_store.peek_next_pending().await.expect("peek").is_none());

    let calls = app.shuttle_bus.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], RecordedPublish::Mission { shuttle_id, .. } if *shuttle_id == near.id));
}

#[tokio::test]
async fn tick_defers_when_pickup_node_is_already_locked() {
    let app = TestApp::new(test_config());
    app.catalog.insert_cell(pickup_cell());
    let task = fixtures::task("tsk-1", "X0001Y0001", "X0005Y0001");
    app.state.task_store.register_task(&task).await.expect("register task");
    app.state
        .reservations
        .acquire_lock(&sf_storage::ReservationService::pickup_lock_key("X0001Y0001"), "other-task", 300)
        .await
        .expect("pre-lock");

    tick(&app.state).await.expect("tick");

    let saved = app.state.task_store.get_task(&task.task_id).await.expect("get").expect("present");
    assert_eq!(saved.status, sf_core::TaskStatus::Pending);
    assert!(app.shuttle_bus.calls().is_empty());
}

#[tokio::test]
async fn tick_releases_the_pickup_lock_when_no_shuttle_is_idle() {
    let app = TestApp::new(test_config());
    app.catalog.insert_cell(pickup_cell());
    let task = fixtures::task("tsk-1", "X0001Y0001", "X0005Y0001");
    app.state.task_store.register_task(&task).await.expect("register task");

    tick(&app.state).await.expect("tick");

    let saved = app.state.task_store.get_task(&task.task_id).await.expect("get").expect("present");
    assert_eq!(saved.status, sf_core::TaskStatus::Pending);
    assert!(app
        .state
        .reservations
        .get_lock_owner(&sf_storage::ReservationService::pickup_lock_key("X0001Y0001"))
        .await
        .expect("owner")
        .is_none());
}
