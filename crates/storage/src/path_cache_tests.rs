// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::memory::InMemoryKvStore;
use sf_core::{Action, PathMeta, PathStep};
use sf_core::FakeClock;

fn cache() -> PathCache {
    PathCache::new(Arc::new(InMemoryKvStore::new(FakeClock::new())))
}

fn entry(shuttle_id: &str, qrs: &[&str], directions: &[Direction]) -> ActivePathEntry {
    let steps = directions
        .iter()
        .enumerate()
        .map(|(i, &direction)| PathStep {
            qr_index: i + 1,
            direction,
            action: Action::NoAction,
        })
        .collect();
    ActivePathEntry {
        shuttle_id: ShuttleId::from_string(shuttle_id),
        qrs: qrs.iter().map(|s| s.to_string()).collect(),
        steps,
        meta: PathMeta {
            task_id: None,
            is_carrying: false,
            priority: 0,
            end_qr: qrs.last().unwrap().to_string(),
            end_floor_id: "137".to_string(),
            path_length: qrs.len(),
        },
        timestamp_ms: 0,
        ttl_ms: ACTIVE_PATH_TTL_SECS * 1000,
    }
}

#[tokio::test]
async fn save_and_get_round_trip() {
    let cache = cache();
    let e = entry("sht-001", &["X0001Y0001", "X0001Y0002"], &[Direction::Down]);
    cache.save_path(&e).await.expect("save");
    let fetched = cache.get_path(&e.shuttle_id).await.expect("get").expect("present");
    assert_eq!(fetched.qrs, e.qrs);
}

#[tokio::test]
async fn save_overwrites_prior_path_for_same_shuttle() {
    let cache = cache();
    let first = entry("sht-001", &["X0001Y0001", "X0001Y0002"], &[Direction::Down]);
    cache.save_path(&first).await.expect("save first");
    let second = entry("sht-001", &["X0001Y0001", "X0002Y0001"], &[Direction::Right]);
    cache.save_path(&second).await.expect("save second");
    let fetched = cache.get_path(&first.shuttle_id).await.expect("get").expect("present");
    assert_eq!(fetched.qrs, second.qrs);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let cache = cache();
    let id = ShuttleId::from_string("sht-absent");
    cache.delete_path(&id).await.expect("delete absent");
    cache.delete_path(&id).await.expect("delete absent again");
}

#[tokio::test]
async fn get_all_active_paths_reflects_save_and_delete() {
    let cache = cache();
    let a = entry("sht-001", &["X0001Y0001", "X0001Y0002"], &[Direction::Down]);
    let b = entry("sht-002", &["X0002Y0001", "X0002Y0002"], &[Direction::Down]);
    cache.save_path(&a).await.expect("save a");
    cache.save_path(&b).await.expect("save b");
    let all = cache.get_all_active_paths().await.expect("all");
    assert_eq!(all.len(), 2);
    cache.delete_path(&a.shuttle_id).await.expect("delete a");
    let all = cache.get_all_active_paths().await.expect("all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].shuttle_id, b.shuttle_id);
}

#[tokio::test]
async fn evict_stale_prunes_index_entries_whose_path_expired() {
    let kv = Arc::new(InMemoryKvStore::new(FakeClock::new()));
    let cache = PathCache::new(kv.clone());
    let a = entry("sht-001", &["X0001Y0001", "X0001Y0002"], &[Direction::Down]);
    cache.save_path(&a).await.expect("save");
    kv.del(&path_key(&a.shuttle_id)).await.expect("simulate natural ttl expiry");
    let evicted = cache.evict_stale().await.expect("evict");
    assert_eq!(evicted, 1);
    assert!(cache.get_all_active_paths().await.expect("all").is_empty());
}

#[test]
fn dominant_direction_corridor_requires_seventy_percent_majority() {
    let down = [Direction::Down];
    let up = [Direction::Up];
    let paths = vec![
        entry("sht-001", &["X0001Y0001", "X0001Y0002"], &down),
        entry("sht-002", &["X0001Y0001", "X0001Y0002"], &down),
        entry("sht-003", &["X0001Y0001", "X0001Y0002"], &down),
        entry("sht-004", &["X0001Y0001", "X0001Y0002"], &up),
    ];
    let corridors = detect_traffic_flow_corridors(&paths);
    let corridor = corridors.get("X0001Y0002").expect("corridor detected");
    assert_eq!(corridor.dominant_direction, Direction::Down);
    assert_eq!(corridor.shuttle_count, 4);
    assert!(corridor.is_high_traffic);
}

#[test]
fn evenly_split_directions_do_not_qualify_as_a_corridor() {
    let paths = vec![
        entry("sht-001", &["X0001Y0001", "X0001Y0002"], &[Direction::Down]),
        entry("sht-002", &["X0001Y0001", "X0001Y0002"], &[Direction::Up]),
    ];
    let corridors = detect_traffic_flow_corridors(&paths);
    assert!(corridors.get("X0001Y0002").is_none());
}

#[test]
fn single_shuttle_through_a_qr_is_not_a_corridor() {
    let paths = vec![entry("sht-001", &["X0001Y0001", "X0001Y0002"], &[Direction::Down])];
    let corridors = detect_traffic_flow_corridors(&paths);
    assert!(corridors.is_empty());
}

#[test]
fn two_shuttles_same_direction_qualify_but_are_not_high_traffic() {
    let down = [Direction::Down];
    let paths = vec![
        entry("sht-001", &["X0001Y0001", "X0001Y0002"], &down),
        entry("sht-002", &["X0001Y0001", "X0001Y0002"], &down),
    ];
    let corridors = detect_traffic_flow_corridors(&paths);
    let corridor = corridors.get("X0001Y0002").expect("corridor detected");
    assert!(!corridor.is_high_traffic);
}
