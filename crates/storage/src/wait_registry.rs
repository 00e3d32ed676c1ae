// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifter wait queue and Conflict Resolver waiting-state persistence
//! (§4.5 `ShuttleWaitState`, §4.9 `WAITING_FOR_LIFTER`, §4.10 Step D).

use crate::kv::{KvResult, KvStore};
use sf_core::{Mission, ShuttleId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const WAITING_SINCE_TTL_SECS: u64 = 120;

fn lifter_wait_key(floor_id: &str) -> String {
    format!("waiting:lifter:{floor_id}")
}

fn wait_state_key(shuttle_id: &ShuttleId) -> String {
    format!("shuttle:{shuttle_id}:wait_state")
}

fn waiting_since_key(shuttle_id: &ShuttleId) -> String {
    format!("shuttle:{shuttle_id}:waiting_since")
}

fn reroute_attempts_key(shuttle_id: &ShuttleId) -> String {
    format!("shuttle:{shuttle_id}:reroute_attempts")
}

/// The resume mission a shuttle left behind when it entered
/// `WAITING_FOR_LIFTER`, so the lifter-ready poller can hand it back
/// unchanged once the lifter arrives (§4.5 step "Persist a `ShuttleWaitState`").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuttleWaitState {
    pub shuttle_id: ShuttleId,
    pub floor_id: String,
    pub resume_mission: Mission,
}

pub struct WaitRegistry {
    kv: Arc<dyn KvStore>,
}

impl WaitRegistry {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn add_waiting_for_lifter(&self, floor_id: &str, shuttle_id: &ShuttleId) -> KvResult<()> {
        self.kv.sadd(&lifter_wait_key(floor_id), shuttle_id.as_str()).await
    }

    pub async fn remove_waiting_for_lifter(
        &self,
        floor_id: &str,
        shuttle_id: &ShuttleId,
    ) -> KvResult<()> {
        self.kv.srem(&lifter_wait_key(floor_id), shuttle_id.as_str()).await
    }

    pub async fn shuttles_waiting_for_lifter(&self, floor_id: &str) -> KvResult<Vec<ShuttleId>> {
        let raw = self.kv.smembers(&lifter_wait_key(floor_id)).await?;
        Ok(raw.into_iter().map(ShuttleId::from_string).collect())
    }

    pub async fn save_wait_state(&self, state: &ShuttleWaitState) -> KvResult<()> {
        let encoded = serde_json::to_string(state).unwrap_or_else(|_| "{}".to_string());
        self.kv.set(&wait_state_key(&state.shuttle_id), &encoded).await
    }

    pub async fn take_wait_state(&self, shuttle_id: &ShuttleId) -> KvResult<Option<ShuttleWaitState>> {
        let key = wait_state_key(shuttle_id);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(None);
        };
        self.kv.del(&key).await?;
        Ok(serde_json::from_str(&raw).ok())
    }

    /// Step D: stamp `waiting_since=now` upon entering WAITING. TTL bounds
    /// the key so a crashed resolver doesn't leave a shuttle waiting forever
    /// on a stale timestamp.
    pub async fn stamp_waiting_since(&self, shuttle_id: &ShuttleId, now_ms: u64) -> KvResult<()> {
        self.kv
            .set_ex(&waiting_since_key(shuttle_id), &now_ms.to_string(), WAITING_SINCE_TTL_SECS)
            .await
    }

    pub async fn waiting_since(&self, shuttle_id: &ShuttleId) -> KvResult<Option<u64>> {
        Ok(self.kv.get(&waiting_since_key(shuttle_id)).await?.and_then(|raw| raw.parse().ok()))
    }

    pub async fn clear_waiting_since(&self, shuttle_id: &ShuttleId) -> KvResult<()> {
        self.kv.del(&waiting_since_key(shuttle_id)).await
    }

    /// Step D retry counter, read without bumping it — used to decide
    /// whether the next escalating check is due yet.
    pub async fn reroute_attempts(&self, shuttle_id: &ShuttleId) -> KvResult<i64> {
        Ok(self.kv.get(&reroute_attempts_key(shuttle_id)).await?.and_then(|raw| raw.parse().ok()).unwrap_or(0))
    }

    /// Bumps the Step D retry counter for one escalating reroute attempt.
    /// TTL-bounded like `waiting_since` so a crashed resolver doesn't leave a
    /// stale count behind for the next time this shuttle waits.
    pub async fn incr_reroute_attempts(&self, shuttle_id: &ShuttleId) -> KvResult<i64> {
        let key = reroute_attempts_key(shuttle_id);
        let attempts = self.kv.incr(&key).await?;
        self.kv.expire(&key, WAITING_SINCE_TTL_SECS).await?;
        Ok(attempts)
    }

    pub async fn clear_reroute_attempts(&self, shuttle_id: &ShuttleId) -> KvResult<()> {
        self.kv.del(&reroute_attempts_key(shuttle_id)).await
    }
}

#[cfg(test)]
#[path = "wait_registry_tests.rs"]
mod tests;
