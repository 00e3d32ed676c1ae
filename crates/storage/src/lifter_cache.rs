// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifter State Cache (§4.5 step 5 readiness check: "the lifter's current
//! floor equals the required boarding floor AND its status is IDLE").
//! Written only by the daemon's `lifter:events` handler.

use crate::kv::{KvResult, KvStore};
use sf_core::{FloorId, LifterState, LifterStatus};
use std::sync::Arc;

const LIFTER_STATE_TTL_SECS: u64 = 10;

fn lifter_key(lifter_id: &str) -> String {
    format!("lifter:state:{lifter_id}")
}

pub struct LifterStateCache {
    kv: Arc<dyn KvStore>,
}

impl LifterStateCache {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    async fn put(&self, state: &LifterState) -> KvResult<()> {
        let encoded = serde_json::to_string(state).unwrap_or_else(|_| "{}".to_string());
        self.kv
            .set_ex(&lifter_key(&state.lifter_id), &encoded, LIFTER_STATE_TTL_SECS)
            .await
    }

    pub async fn get(&self, lifter_id: &str) -> KvResult<Option<LifterState>> {
        let Some(raw) = self.kv.get(&lifter_key(lifter_id)).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// `LIFTER_ARRIVED {floorId}` (§4.9): the lifter parked and is ready to
    /// board the next shuttle.
    pub async fn record_arrived(&self, lifter_id: &str, floor_id: &FloorId, now_ms: u64) -> KvResult<()> {
        self.put(&LifterState {
            lifter_id: lifter_id.to_string(),
            current_floor_id: *floor_id,
            status: LifterStatus::Idle,
            updated_at_ms: now_ms,
        })
        .await
    }

    /// `LIFTER_MOVING {floorId}` (§4.9): the lifter is in transit toward
    /// `floor_id`, so no shuttle can board until the next `LIFTER_ARRIVED`.
    pub async fn record_moving(&self, lifter_id: &str, floor_id: &FloorId, now_ms: u64) -> KvResult<()> {
        self.put(&LifterState {
            lifter_id: lifter_id.to_string(),
            current_floor_id: *floor_id,
            status: LifterStatus::Moving,
            updated_at_ms: now_ms,
        })
        .await
    }
}

#[cfg(test)]
#[path = "lifter_cache_tests.rs"]
mod tests;
