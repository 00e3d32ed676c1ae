// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::memory::InMemoryKvStore;
use sf_core::FakeClock;

fn manager() -> RowDirectionManager {
    RowDirectionManager::new(Arc::new(InMemoryKvStore::new(FakeClock::new())))
}

fn floor() -> FloorId {
    FloorId::from_string("flr-0000000000000137")
}

#[tokio::test]
async fn lock_succeeds_on_a_fresh_row_and_records_the_holder() {
    let mgr = manager();
    let shuttle = ShuttleId::from_string("sht-001");
    let ok = mgr
        .lock_row_direction(&floor(), "row-12", RowDirection::Ltr, &shuttle, 0)
        .await
        .expect("lock");
    assert!(ok);
    let lock = mgr.get_row_direction(&floor(), "row-12").await.expect("get").expect("present");
    assert_eq!(lock.direction, RowDirection::Ltr);
    assert!(lock.holders.contains(&shuttle));
}

#[tokio::test]
async fn second_shuttle_with_matching_direction_joins_the_lock() {
    let mgr = manager();
    let a = ShuttleId::from_string("sht-001");
    let b = ShuttleId::from_string("sht-002");
    mgr.lock_row_direction(&floor(), "row-12", RowDirection::Ltr, &a, 0).await.expect("lock a");
    let ok = mgr
        .lock_row_direction(&floor(), "row-12", RowDirection::Ltr, &b, 0)
        .await
        .expect("lock b");
    assert!(ok);
    let lock = mgr.get_row_direction(&floor(), "row-12").await.expect("get").expect("present");
    assert_eq!(lock.holders.len(), 2);
}

#[tokio::test]
async fn conflicting_direction_is_rejected() {
    let mgr = manager();
    let a = ShuttleId::from_string("sht-001");
    let b = ShuttleId::from_string("sht-002");
    mgr.lock_row_direction(&floor(), "row-12", RowDirection::Ltr, &a, 0).await.expect("lock a");
    let ok = mgr
        .lock_row_direction(&floor(), "row-12", RowDirection::Rtl, &b, 0)
        .await
        .expect("lock b");
    assert!(!ok);
}

#[tokio::test]
async fn releasing_the_last_holder_clears_the_direction_record() {
    let mgr = manager();
    let shuttle = ShuttleId::from_string("sht-001");
    mgr.lock_row_direction(&floor(), "row-12", RowDirection::Ltr, &shuttle, 0)
        .await
        .expect("lock");
    mgr.release_shuttle_from_row(&floor(), "row-12", &shuttle).await.expect("release");
    assert!(mgr.get_row_direction(&floor(), "row-12").await.expect("get").is_none());
}

#[tokio::test]
async fn releasing_one_of_two_holders_keeps_the_lock_alive() {
    let mgr = manager();
    let a = ShuttleId::from_string("sht-001");
    let b = ShuttleId::from_string("sht-002");
    mgr.lock_row_direction(&floor(), "row-12", RowDirection::Ltr, &a, 0).await.expect("lock a");
    mgr.lock_row_direction(&floor(), "row-12", RowDirection::Ltr, &b, 0).await.expect("lock b");
    mgr.release_shuttle_from_row(&floor(), "row-12", &a).await.expect("release a");
    let lock = mgr.get_row_direction(&floor(), "row-12").await.expect("get").expect("present");
    assert_eq!(lock.holders.len(), 1);
    assert!(lock.holders.contains(&b));
}

#[tokio::test]
async fn clear_row_direction_lock_force_clears_regardless_of_holders() {
    let mgr = manager();
    let shuttle = ShuttleId::from_string("sht-001");
    mgr.lock_row_direction(&floor(), "row-12", RowDirection::Ltr, &shuttle, 0)
        .await
        .expect("lock");
    mgr.clear_row_direction_lock(&floor(), "row-12").await.expect("clear");
    assert!(mgr.get_row_direction(&floor(), "row-12").await.expect("get").is_none());
}

#[tokio::test]
async fn batch_row_pin_round_trips() {
    let mgr = manager();
    let batch_id = BatchId::from_string("bch-0000000000000001");
    assert_eq!(mgr.pinned_row(&batch_id).await.expect("pinned"), None);
    mgr.pin_batch_row(&batch_id, "row-12").await.expect("pin");
    assert_eq!(mgr.pinned_row(&batch_id).await.expect("pinned"), Some("row-12".to_string()));
}
