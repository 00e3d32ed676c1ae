// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::{test_config, TestApp};
use sf_adapters::RecordedPublish;
use sf_core::test_support as fixtures;
use sf_core::ShuttleId;

#[tokio::test]
async fn shuttle_initialized_registers_shuttle_and_blocks_its_node() {
    let app = TestApp::new(test_config());
    let event = fixtures::shuttle_initialized_event("sht-1", "X0001Y0001", "137");

    handle_event(&app.state, &event).await.expect("handle");

    let shuttle = app.state.shuttle_cache.get(&ShuttleId::from_string("sht-1")).await.expect("get").expect("present");
    assert_eq!(shuttle.current_qr, "X0001Y0001");
    assert_eq!(
        app.state.occupation.occupied_by("X0001Y0001").await.expect("occupied"),
        Some("sht-1".to_string())
    );
}

#[tokio::test]
async fn shuttle_moved_updates_cache_and_shifts_occupation() {
    let app = TestApp::new(test_config());
    app.state.shuttle_cache.register(&fixtures::shuttle_state("sht-1", "X0001Y0001", "137")).await.expect("seed");
    app.state.occupation.block_node("X0001Y0001", "sht-1").await.expect("seed block");

    let event = fixtures::shuttle_moved_event("sht-1", "X0002Y0001", 1);
    handle_event(&app.state, &event).await.expect("handle");

    let shuttle = app.state.shuttle_cache.get(&ShuttleId::from_string("sht-1")).await.expect("get").expect("present");
    assert_eq!(shuttle.current_qr, "X0002Y0001");
    assert!(app.state.occupation.occupied_by("X0001Y0001").await.expect("occ").is_none());
    assert_eq!(
        app.state.occupation.occupied_by("X0002Y0001").await.expect("occ"),
        Some("sht-1".to_string())
    );
}

#[tokio::test]
async fn task_complete_releases_locks_and_clears_shuttle() {
    let app = TestApp::new(test_config());
    app.state.shuttle_cache.register(&fixtures::shuttle_state("sht-1", "X0005Y0001", "137")).await.expect("seed");
    let mut task = fixtures::task("tsk-1", "X0001Y0001", "X0005Y0001");
    task.status = sf_core::TaskStatus::InProgress;
    task.pickup_completed = true;
    task.is_carrying = true;
    app.state.task_store.register_task(&task).await.expect("register");
    app.state
        .reservations
        .acquire_lock(&sf_storage::ReservationService::endpoint_lock_key(&task.end_qr), "tsk-1", 300)
        .await
        .expect("lock endpoint");
    app.state
        .reservations
        .acquire_lock(&sf_storage::ReservationService::pickup_lock_key(&task.pickup_qr), "tsk-1", 300)
        .await
        .expect("lock pickup");

    let event = fixtures::task_complete_event("sht-1", "tsk-1");
    handle_event(&app.state, &event).await.expect("handle");

    assert!(app.state.task_store.get_task(&task.task_id).await.expect("get").is_none());
    assert!(app
        .state
        .reservations
        .get_lock_owner(&sf_storage::ReservationService::endpoint_lock_key(&task.end_qr))
        .await
        .expect("owner")
        .is_none());
    assert!(app
        .state
        .reservations
        .get_lock_owner(&sf_storage::ReservationService::pickup_lock_key(&task.pickup_qr))
        .await
        .expect("owner")
        .is_none());
    let shuttle = app.state.shuttle_cache.get(&ShuttleId::from_string("sht-1")).await.expect("get").expect("present");
    assert_eq!(shuttle.shuttle_status, sf_core::ShuttleStatus::Idle);
    assert!(!shuttle.is_carrying);
}

#[tokio::test]
async fn task_complete_advances_batch_row_when_row_counter_reaches_zero() {
    let app = TestApp::new(test_config());
    app.state.shuttle_cache.register(&fixtures::shuttle_state("sht-1", "X0005Y0001", "137")).await.expect("seed");
    let batch_id = sf_core::BatchId::new();
    let mut batch = fixtures::master_batch(batch_id.as_str(), "rck-main", 1);
    batch.current_row = Some(0);
    batch.status = sf_core::BatchStatus::ProcessingRow;
    app.state.batch_store.create(&batch).await.expect("create batch");
    app.state.batch_store.set_row_counter(&batch_id, 1).await.expect("row counter");

    let mut task = fixtures::task("tsk-1", "X0001Y0001", "X0005Y0001");
    task.batch_id = Some(batch_id);
    app.state.task_store.register_task(&task).await.expect("register");

    let event = fixtures::task_complete_event("sht-1", "tsk-1");
    handle_event(&app.state, &event).await.expect("handle");

    let saved_batch = app.state.batch_store.get(&batch_id).await.expect("get").expect("present");
    assert_eq!(saved_batch.status, sf_core::BatchStatus::Completed);
    assert_eq!(app.state.batch_store.processed_items(&batch_id).await.expect("processed"), 1);
}

#[tokio::test]
async fn lifter_arrived_replays_the_waiting_shuttles_resume_mission() {
    let mut app = TestApp::new(test_config());
    app.seed_lifter("lft-1", "137", "X0009Y0001");

    let shuttle_id = ShuttleId::from_string("sht-1");
    let resume_mission = sf_core::Mission {
        qrs: vec!["X0009Y0001".to_string()],
        steps: vec![sf_core::PathStep { qr_index: 0, direction: sf_core::Direction::Up, action: sf_core::Action::NoAction }],
        meta: sf_core::MissionMeta {
            task_id: sf_core::TaskId::new(),
            on_arrival: sf_core::OnArrival::TaskComplete,
            step: 2,
            final_target_qr: "X0009Y0001".to_string(),
            final_target_floor_id: "42".to_string(),
            pickup_qr: "X0001Y0001".to_string(),
            end_qr: "X0009Y0001".to_string(),
            item_info: serde_json::json!({}),
            is_carrying: true,
        },
    };
    app.state.wait_registry.add_waiting_for_lifter("137", &shuttle_id).await.expect("add waiting");
    app.state
        .wait_registry
        .save_wait_state(&sf_storage::ShuttleWaitState {
            shuttle_id,
            floor_id: "137".to_string(),
            resume_mission,
        })
        .await
        .expect("save wait state");

    let event = sf_wire::LifterEvent::LifterArrived { floor_id: "137".to_string() };
    handle_lifter_event(&app.state, &event).await.expect("handle");

    let calls = app.shuttle_bus.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], RecordedPublish::Mission { shuttle_id: id, .. } if *id == shuttle_id));
    assert!(app
        .state
        .wait_registry
        .shuttles_waiting_for_lifter("137")
        .await
        .expect("waiting")
        .is_empty());
}
