// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::memory::InMemoryKvStore;
use sf_core::{Action, Direction, MissionMeta, OnArrival, PathStep};
use sf_core::FakeClock;

fn registry() -> WaitRegistry {
    WaitRegistry::new(Arc::new(InMemoryKvStore::new(FakeClock::new())))
}

fn mission() -> Mission {
    Mission {
        qrs: vec!["X0001Y0001".to_string(), "X0001Y0002".to_string()],
        steps: vec![PathStep { qr_index: 1, direction: Direction::Down, action: Action::StopAtNode }],
        meta: MissionMeta {
            task_id: sf_core::TaskId::from_string("tsk-001"),
            on_arrival: OnArrival::ArrivedAtLifter,
            step: 1,
            final_target_qr: "X0001Y0009".to_string(),
            final_target_floor_id: "139".to_string(),
            pickup_qr: "X0001Y0001".to_string(),
            end_qr: "X0001Y0009".to_string(),
            item_info: serde_json::json!({}),
            is_carrying: true,
        },
    }
}

#[tokio::test]
async fn lifter_wait_membership_round_trips() {
    let reg = registry();
    let shuttle = ShuttleId::from_string("sht-001");
    reg.add_waiting_for_lifter("138", &shuttle).await.expect("add");
    assert_eq!(reg.shuttles_waiting_for_lifter("138").await.expect("list"), vec![shuttle.clone()]);
    reg.remove_waiting_for_lifter("138", &shuttle).await.expect("remove");
    assert!(reg.shuttles_waiting_for_lifter("138").await.expect("list").is_empty());
}

#[tokio::test]
async fn wait_state_is_consumed_once() {
    let reg = registry();
    let shuttle = ShuttleId::from_string("sht-001");
    let state = ShuttleWaitState {
        shuttle_id: shuttle.clone(),
        floor_id: "138".to_string(),
        resume_mission: mission(),
    };
    reg.save_wait_state(&state).await.expect("save");
    let taken = reg.take_wait_state(&shuttle).await.expect("take").expect("present");
    assert_eq!(taken.floor_id, "138");
    assert!(reg.take_wait_state(&shuttle).await.expect("take again").is_none());
}

#[tokio::test]
async fn waiting_since_round_trips_and_clears() {
    let reg = registry();
    let shuttle = ShuttleId::from_string("sht-001");
    assert_eq!(reg.waiting_since(&shuttle).await.expect("get"), None);
    reg.stamp_waiting_since(&shuttle, 1_000).await.expect("stamp");
    assert_eq!(reg.waiting_since(&shuttle).await.expect("get"), Some(1_000));
    reg.clear_waiting_since(&shuttle).await.expect("clear");
    assert_eq!(reg.waiting_since(&shuttle).await.expect("get"), None);
}

#[tokio::test]
async fn reroute_attempts_increment_and_clear() {
    let reg = registry();
    let shuttle = ShuttleId::from_string("sht-001");
    assert_eq!(reg.reroute_attempts(&shuttle).await.expect("get"), 0);
    assert_eq!(reg.incr_reroute_attempts(&shuttle).await.expect("incr"), 1);
    assert_eq!(reg.incr_reroute_attempts(&shuttle).await.expect("incr"), 2);
    assert_eq!(reg.reroute_attempts(&shuttle).await.expect("get"), 2);
    reg.clear_reroute_attempts(&shuttle).await.expect("clear");
    assert_eq!(reg.reroute_attempts(&shuttle).await.expect("get"), 0);
}
