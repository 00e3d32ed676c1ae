// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shuttle State Cache (§2 component 5, §3 "Shuttle State"): per-shuttle
//! live state with a liveness TTL, written only by the telemetry handler.

use crate::kv::{KvResult, KvStore};
use sf_core::{ShuttleId, ShuttleState};
use std::sync::Arc;

const SHUTTLE_STATE_TTL_SECS: u64 = 10;

pub struct ShuttleStateCache {
    kv: Arc<dyn KvStore>,
}

fn state_key(id: &ShuttleId) -> String {
    format!("shuttle:state:{id}")
}

impl ShuttleStateCache {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn put(&self, state: &ShuttleState) -> KvResult<()> {
        let encoded = serde_json::to_string(state)
            .unwrap_or_else(|_| "{}".to_string());
        self.kv.set_ex(&state_key(&state.id), &encoded, SHUTTLE_STATE_TTL_SECS).await
    }

    pub async fn get(&self, id: &ShuttleId) -> KvResult<Option<ShuttleState>> {
        let Some(raw) = self.kv.get(&state_key(id)).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    pub async fn refresh_ttl(&self, id: &ShuttleId) -> KvResult<()> {
        self.kv.expire(&state_key(id), SHUTTLE_STATE_TTL_SECS).await
    }

    /// All shuttle states still live within their TTL, scoped to the given
    /// ids (the store has no native keyspace scan; callers that need "every
    /// known shuttle" track membership via the registry index below).
    pub async fn get_many(&self, ids: &[ShuttleId]) -> KvResult<Vec<ShuttleState>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(state) = self.get(id).await? {
                out.push(state);
            }
        }
        Ok(out)
    }

    /// Shuttle ids ever registered, regardless of current liveness — backing
    /// index for `get_many` callers that want "every known shuttle".
    pub async fn known_ids(&self) -> KvResult<Vec<ShuttleId>> {
        let raw = self.kv.smembers("shuttle:state_index").await?;
        Ok(raw.into_iter().map(ShuttleId::from_string).collect())
    }

    pub async fn register(&self, state: &ShuttleState) -> KvResult<()> {
        self.kv.sadd("shuttle:state_index", state.id.as_str()).await?;
        self.put(state).await
    }
}

#[cfg(test)]
#[path = "shuttle_cache_tests.rs"]
mod tests;
