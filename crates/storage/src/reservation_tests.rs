// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::memory::InMemoryKvStore;
use sf_core::FakeClock;

fn service() -> ReservationService {
    ReservationService::new(Arc::new(InMemoryKvStore::new(FakeClock::new())))
}

#[tokio::test]
async fn distinct_owners_cannot_both_hold_the_lock() {
    let svc = service();
    let key = ReservationService::pickup_lock_key("X0001Y0001");
    assert!(svc.acquire_lock(&key, "tsk-1", 300).await.expect("acquire"));
    assert!(!svc.acquire_lock(&key, "tsk-2", 300).await.expect("acquire"));
}

#[tokio::test]
async fn same_owner_can_reacquire_and_refresh_ttl() {
    let svc = service();
    let key = ReservationService::endpoint_lock_key("cell-1");
    assert!(svc.acquire_lock(&key, "tsk-1", 300).await.expect("acquire"));
    assert!(svc.acquire_lock(&key, "tsk-1", 300).await.expect("reacquire"));
    assert_eq!(svc.get_lock_owner(&key).await.expect("owner"), Some("tsk-1".to_string()));
}

#[tokio::test]
async fn release_is_safe_on_a_missing_key() {
    let svc = service();
    svc.release_lock("endnode:lock:never-locked").await.expect("release missing key");
}

#[tokio::test]
async fn release_frees_the_lock_for_another_owner() {
    let svc = service();
    let key = ReservationService::pickup_lock_key("X0002Y0002");
    svc.acquire_lock(&key, "tsk-1", 300).await.expect("acquire");
    svc.release_lock(&key).await.expect("release");
    assert!(svc.acquire_lock(&key, "tsk-2", 300).await.expect("acquire after release"));
}
