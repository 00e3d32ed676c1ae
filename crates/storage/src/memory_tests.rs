// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sf_core::FakeClock;
use std::time::Duration;

#[tokio::test]
async fn set_and_get_round_trip() {
    let store = InMemoryKvStore::new(FakeClock::new());
    store.set("node:X0001Y0001:occupied_by", "sht-001").await.expect("set");
    assert_eq!(
        store.get("node:X0001Y0001:occupied_by").await.expect("get"),
        Some("sht-001".to_string())
    );
}

#[tokio::test]
async fn ttl_expiry_hides_the_value_after_the_clock_advances() {
    let clock = FakeClock::new();
    let store = InMemoryKvStore::new(clock.clone());
    store.set_ex("pickup:lock:X0001Y0001", "sht-001", 300).await.expect("set_ex");
    assert_eq!(store.get("pickup:lock:X0001Y0001").await.expect("get"), Some("sht-001".to_string()));
    clock.advance(Duration::from_secs(301));
    assert_eq!(store.get("pickup:lock:X0001Y0001").await.expect("get"), None);
}

#[tokio::test]
async fn set_nx_ex_only_succeeds_once_while_the_lock_is_live() {
    let clock = FakeClock::new();
    let store = InMemoryKvStore::new(clock.clone());
    assert!(store.set_nx_ex("endnode:lock:cell-1", "sht-001", 300).await.expect("first acquire"));
    assert!(!store.set_nx_ex("endnode:lock:cell-1", "sht-002", 300).await.expect("second acquire"));
    clock.advance(Duration::from_secs(301));
    assert!(store.set_nx_ex("endnode:lock:cell-1", "sht-002", 300).await.expect("reacquire after expiry"));
}

#[tokio::test]
async fn incr_and_decr_track_a_counter() {
    let store = InMemoryKvStore::new(FakeClock::new());
    assert_eq!(store.incr("stats:conflicts:parking_used").await.expect("incr"), 1);
    assert_eq!(store.incr("stats:conflicts:parking_used").await.expect("incr"), 2);
    assert_eq!(store.decr("stats:conflicts:parking_used").await.expect("decr"), 1);
}

#[tokio::test]
async fn hash_fields_round_trip_and_support_deletion() {
    let store = InMemoryKvStore::new(FakeClock::new());
    store.hset("shuttle:state:sht-001", "currentQr", "X0001Y0001").await.expect("hset");
    store.hset("shuttle:state:sht-001", "floorId", "137").await.expect("hset");
    let all = store.hgetall("shuttle:state:sht-001").await.expect("hgetall");
    assert_eq!(all.get("currentQr"), Some(&"X0001Y0001".to_string()));
    store.hdel("shuttle:state:sht-001", "floorId").await.expect("hdel");
    assert_eq!(store.hget("shuttle:state:sht-001", "floorId").await.expect("hget"), None);
}

#[tokio::test]
async fn list_behaves_fifo_with_rpush_and_lpop() {
    let store = InMemoryKvStore::new(FakeClock::new());
    store.rpush("task:staging_queue", "tsk-1").await.expect("rpush");
    store.rpush("task:staging_queue", "tsk-2").await.expect("rpush");
    assert_eq!(store.llen("task:staging_queue").await.expect("llen"), 2);
    assert_eq!(store.lpop("task:staging_queue").await.expect("lpop"), Some("tsk-1".to_string()));
    assert_eq!(store.lpop("task:staging_queue").await.expect("lpop"), Some("tsk-2".to_string()));
    assert_eq!(store.lpop("task:staging_queue").await.expect("lpop"), None);
}

#[tokio::test]
async fn list_behaves_fifo_with_lpush_and_rpop() {
    let store = InMemoryKvStore::new(FakeClock::new());
    store.lpush("task:staging_queue", "tsk-1").await.expect("lpush");
    store.lpush("task:staging_queue", "tsk-2").await.expect("lpush");
    assert_eq!(store.rpop("task:staging_queue").await.expect("rpop"), Some("tsk-1".to_string()));
    assert_eq!(store.rpop("task:staging_queue").await.expect("rpop"), Some("tsk-2".to_string()));
    assert_eq!(store.rpop("task:staging_queue").await.expect("rpop"), None);
}

#[tokio::test]
async fn set_membership_tracks_waiting_shuttles() {
    let store = InMemoryKvStore::new(FakeClock::new());
    store.sadd("waiting:lifter:138", "sht-001").await.expect("sadd");
    store.sadd("waiting:lifter:138", "sht-002").await.expect("sadd");
    assert!(store.sismember("waiting:lifter:138", "sht-001").await.expect("sismember"));
    store.srem("waiting:lifter:138", "sht-001").await.expect("srem");
    assert!(!store.sismember("waiting:lifter:138", "sht-001").await.expect("sismember"));
    let mut members = store.smembers("waiting:lifter:138").await.expect("smembers");
    members.sort();
    assert_eq!(members, vec!["sht-002".to_string()]);
}

#[tokio::test]
async fn sorted_set_orders_by_score() {
    let store = InMemoryKvStore::new(FakeClock::new());
    store.zadd("shuttle:global_task_queue", "tsk-2", 200.0).await.expect("zadd");
    store.zadd("shuttle:global_task_queue", "tsk-1", 100.0).await.expect("zadd");
    let ordered = store.zrange("shuttle:global_task_queue", 0, -1).await.expect("zrange");
    assert_eq!(ordered, vec!["tsk-1".to_string(), "tsk-2".to_string()]);
    store.zrem("shuttle:global_task_queue", "tsk-1").await.expect("zrem");
    let ordered = store.zrange("shuttle:global_task_queue", 0, -1).await.expect("zrange");
    assert_eq!(ordered, vec!["tsk-2".to_string()]);
}
