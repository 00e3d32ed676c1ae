// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Master batch storage (§3 `MasterBatch`, §4.6, §9 Design Notes). The
//! `processed_items`/`row_counter` atomic counters are the source of truth;
//! the master-batch JSON blob is a cache kept in sync on read (§9
//! "`processBatchRow` is idempotent with respect to `processed_items`").

use crate::kv::{KvResult, KvStore};
use sf_core::{BatchId, MasterBatch};
use std::sync::Arc;

const BATCH_TTL_SECS: u64 = 3600;

fn master_key(id: &BatchId) -> String {
    format!("batch:master:{id}")
}

fn processed_items_key(id: &BatchId) -> String {
    format!("batch:{id}:processed_items")
}

fn row_counter_key(id: &BatchId) -> String {
    format!("batch:{id}:row_counter")
}

pub struct BatchStore {
    kv: Arc<dyn KvStore>,
}

impl BatchStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Persists a freshly created batch, zeroing its `processed_items`
    /// counter (§4.6 `autoMode`).
    pub async fn create(&self, batch: &MasterBatch) -> KvResult<()> {
        self.kv.set_ex(&processed_items_key(&batch.batch_id), "0", BATCH_TTL_SECS).await?;
        self.save(batch).await
    }

    /// Overwrites the cached master-batch JSON, refreshing its TTL.
    pub async fn save(&self, batch: &MasterBatch) -> KvResult<()> {
        let encoded = serde_json::to_string(batch).unwrap_or_else(|_| "{}".to_string());
        self.kv.set_ex(&master_key(&batch.batch_id), &encoded, BATCH_TTL_SECS).await
    }

    pub async fn get(&self, batch_id: &BatchId) -> KvResult<Option<MasterBatch>> {
        let Some(raw) = self.kv.get(&master_key(batch_id)).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// `TASK_COMPLETE` (§4.9): increments the atomic counter and returns its
    /// new value — the caller reconciles the cached `MasterBatch.processed_items`
    /// from this return value, never from its own in-memory copy.
    pub async fn incr_processed_items(&self, batch_id: &BatchId) -> KvResult<i64> {
        self.kv.incr(&processed_items_key(batch_id)).await
    }

    pub async fn processed_items(&self, batch_id: &BatchId) -> KvResult<i64> {
        match self.kv.get(&processed_items_key(batch_id)).await? {
            Some(raw) => Ok(raw.parse().unwrap_or(0)),
            None => Ok(0),
        }
    }

    pub async fn set_row_counter(&self, batch_id: &BatchId, items_to_push: i64) -> KvResult<()> {
        self.kv.set(&row_counter_key(batch_id), &items_to_push.to_string()).await
    }

    /// `TASK_COMPLETE` (§4.9): decrements the row counter, returning its new
    /// value so the caller can test `row_counter <= 0` to trigger the next
    /// row without racing other completions on the same batch.
    pub async fn decr_row_counter(&self, batch_id: &BatchId) -> KvResult<i64> {
        self.kv.decr(&row_counter_key(batch_id)).await
    }

    pub async fn row_counter(&self, batch_id: &BatchId) -> KvResult<i64> {
        match self.kv.get(&row_counter_key(batch_id)).await? {
            Some(raw) => Ok(raw.parse().unwrap_or(0)),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
#[path = "batch_store_tests.rs"]
mod tests;
