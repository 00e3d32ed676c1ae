// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::memory::InMemoryKvStore;
use sf_core::test_support::{staged_task, task};
use sf_core::FakeClock;

fn store() -> TaskStore {
    TaskStore::new(Arc::new(InMemoryKvStore::new(FakeClock::new())))
}

#[tokio::test]
async fn staging_queue_is_fifo_across_push_and_pop() {
    let store = store();
    store.push_staged(&staged_task("X0001Y0001", "rck-001")).await.expect("push 1");
    store.push_staged(&staged_task("X0001Y0002", "rck-001")).await.expect("push 2");
    assert_eq!(store.staging_queue_len().await.expect("len"), 2);
    let first = store.pop_staged().await.expect("pop").expect("present");
    assert_eq!(first.pickup_qr, "X0001Y0001");
    let second = store.pop_staged().await.expect("pop").expect("present");
    assert_eq!(second.pickup_qr, "X0001Y0002");
    assert!(store.pop_staged().await.expect("pop").is_none());
}

#[tokio::test]
async fn requeue_staged_head_preserves_at_least_once() {
    let store = store();
    let staged = staged_task("X0001Y0001", "rck-001");
    store.push_staged(&staged).await.expect("push");
    let popped = store.pop_staged().await.expect("pop").expect("present");
    store.requeue_staged_head(&popped).await.expect("requeue");
    assert_eq!(store.staging_queue_len().await.expect("len"), 1);
}

#[tokio::test]
async fn register_and_get_task_round_trips() {
    let store = store();
    let t = task("tsk-001", "X0001Y0001", "X0001Y0009");
    store.register_task(&t).await.expect("register");
    let fetched = store.get_task(&t.task_id).await.expect("get").expect("present");
    assert_eq!(fetched.pickup_qr, t.pickup_qr);
}

#[tokio::test]
async fn peek_next_pending_orders_by_timestamp() {
    let store = store();
    let mut later = task("tsk-002", "X0001Y0001", "X0001Y0009");
    later.timestamp_ms = 200;
    let mut earlier = task("tsk-001", "X0002Y0001", "X0002Y0009");
    earlier.timestamp_ms = 100;
    store.register_task(&later).await.expect("register later");
    store.register_task(&earlier).await.expect("register earlier");
    assert_eq!(store.peek_next_pending().await.expect("peek"), Some(earlier.task_id));
}

#[tokio::test]
async fn remove_from_pending_drops_it_from_the_queue() {
    let store = store();
    let t = task("tsk-001", "X0001Y0001", "X0001Y0009");
    store.register_task(&t).await.expect("register");
    store.remove_from_pending(&t.task_id).await.expect("remove");
    assert_eq!(store.peek_next_pending().await.expect("peek"), None);
}

#[tokio::test]
async fn processing_membership_round_trips() {
    let store = store();
    let t = task("tsk-001", "X0001Y0001", "X0001Y0009");
    assert!(!store.is_processing(&t.task_id).await.expect("is_processing"));
    store.mark_processing(&t.task_id).await.expect("mark");
    assert!(store.is_processing(&t.task_id).await.expect("is_processing"));
    assert_eq!(store.processing_task_ids().await.expect("ids"), vec![t.task_id]);
    store.unmark_processing(&t.task_id).await.expect("unmark");
    assert!(!store.is_processing(&t.task_id).await.expect("is_processing"));
}

#[tokio::test]
async fn delete_task_clears_hash_pending_and_processing() {
    let store = store();
    let t = task("tsk-001", "X0001Y0001", "X0001Y0009");
    store.register_task(&t).await.expect("register");
    store.mark_processing(&t.task_id).await.expect("mark");
    store.delete_task(&t.task_id).await.expect("delete");
    assert!(store.get_task(&t.task_id).await.expect("get").is_none());
    assert_eq!(store.peek_next_pending().await.expect("peek"), None);
    assert!(!store.is_processing(&t.task_id).await.expect("is_processing"));
}

#[tokio::test]
async fn inbound_pallet_queue_tracks_length() {
    let store = store();
    store.push_inbound_pallet("pallet-1").await.expect("push");
    store.push_inbound_pallet("pallet-2").await.expect("push");
    assert_eq!(store.inbound_pallet_queue_len().await.expect("len"), 2);
}
