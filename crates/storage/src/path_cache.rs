// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path Cache / Traffic Center — Pillar 1 (§4.3): the authoritative global
//! view of active paths, plus traffic-corridor aggregation for Pillar 2.

use crate::kv::{KvResult, KvStore};
use sf_core::{ActivePathEntry, Direction, ShuttleId};
use std::collections::HashMap;
use std::sync::Arc;

pub const ACTIVE_PATH_TTL_SECS: u64 = 600;

pub struct PathCache {
    kv: Arc<dyn KvStore>,
}

fn path_key(id: &ShuttleId) -> String {
    format!("shuttle:active_path:{id}")
}

const PATH_INDEX_KEY: &str = "shuttle:active_path_index";

impl PathCache {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Overwrites any prior entry for this shuttle (§4.3 invariant: at most
    /// one active path per shuttle). The caller stamps `timestamp_ms`/
    /// `ttl_ms` on `entry`; the KV-level expiry mirrors `ttl_ms` so a crashed
    /// janitor still can't resurrect a stale path.
    pub async fn save_path(&self, entry: &ActivePathEntry) -> KvResult<()> {
        let encoded = serde_json::to_string(entry).unwrap_or_else(|_| "{}".to_string());
        let ttl_secs = entry.ttl_ms.div_ceil(1000).max(1);
        self.kv.set_ex(&path_key(&entry.shuttle_id), &encoded, ttl_secs).await?;
        self.kv.sadd(PATH_INDEX_KEY, entry.shuttle_id.as_str()).await
    }

    pub async fn get_path(&self, shuttle_id: &ShuttleId) -> KvResult<Option<ActivePathEntry>> {
        let Some(raw) = self.kv.get(&path_key(shuttle_id)).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// Idempotent: deleting an already-absent path is not an error.
    pub async fn delete_path(&self, shuttle_id: &ShuttleId) -> KvResult<()> {
        self.kv.del(&path_key(shuttle_id)).await?;
        self.kv.srem(PATH_INDEX_KEY, shuttle_id.as_str()).await
    }

    /// Every entry still within its TTL. Expired entries are pruned from the
    /// index as a side effect (the equivalent of the 30 s janitor sweep
    /// happening lazily on read, topped up by an explicit janitor task in
    /// the daemon).
    pub async fn get_all_active_paths(&self) -> KvResult<Vec<ActivePathEntry>> {
        let ids = self.kv.smembers(PATH_INDEX_KEY).await?;
        let mut active = Vec::with_capacity(ids.len());
        for id in ids {
            let shuttle_id = ShuttleId::from_string(&id);
            match self.get_path(&shuttle_id).await? {
                Some(entry) => active.push(entry),
                None => self.kv.srem(PATH_INDEX_KEY, &id).await?,
            }
        }
        Ok(active)
    }

    /// Run the 30 s janitor sweep explicitly: evicts any index entry whose
    /// backing path already expired. Returns the number evicted.
    pub async fn evict_stale(&self) -> KvResult<usize> {
        let ids = self.kv.smembers(PATH_INDEX_KEY).await?;
        let mut evicted = 0;
        for id in ids {
            let shuttle_id = ShuttleId::from_string(&id);
            if self.get_path(&shuttle_id).await?.is_none() {
                self.kv.srem(PATH_INDEX_KEY, &id).await?;
                evicted += 1;
            }
        }
        Ok(evicted)
    }
}

/// One QR's traffic corridor: the dominant direction shuttles pass through
/// it in, and whether that's a strong enough majority to matter to the
/// pathfinder (§4.4 corridor penalty table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corridor {
    pub dominant_direction: Direction,
    pub shuttle_count: usize,
    pub is_high_traffic: bool,
}

/// Aggregates every active path's step directions per QR (§4.3
/// `detectTrafficFlowCorridors`). A QR qualifies once ≥2 distinct shuttles
/// pass through it and one direction accounts for ≥70% of the votes.
pub fn detect_traffic_flow_corridors(
    active_paths: &[ActivePathEntry],
) -> HashMap<String, Corridor> {
    let mut votes: HashMap<String, HashMap<Direction, usize>> = HashMap::new();
    let mut shuttles_through: HashMap<String, std::collections::HashSet<ShuttleId>> =
        HashMap::new();

    for entry in active_paths {
        for step in &entry.steps {
            let Some(qr) = entry.qr_at(step) else { continue };
            *votes.entry(qr.to_string()).or_default().entry(step.direction).or_insert(0) += 1;
            shuttles_through.entry(qr.to_string()).or_default().insert(entry.shuttle_id);
        }
    }

    let mut corridors = HashMap::new();
    for (qr, direction_votes) in votes {
        let shuttle_count = shuttles_through.get(&qr).map(|s| s.len()).unwrap_or(0);
        if shuttle_count < 2 {
            continue;
        }
        let total: usize = direction_votes.values().sum();
        let Some((&dominant_direction, &count)) =
            direction_votes.iter().max_by_key(|(_, count)| **count)
        else {
            continue;
        };
        if total == 0 || (count as f64 / total as f64) < 0.70 {
            continue;
        }
        corridors.insert(
            qr,
            Corridor {
                dominant_direction,
                shuttle_count,
                is_high_traffic: shuttle_count >= 3,
            },
        );
    }
    corridors
}

#[cfg(test)]
#[path = "path_cache_tests.rs"]
mod tests;
