// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row Direction Manager & Coordination (§4.11): once two or more shuttles
//! are active, every storage row becomes one-way until empty.

use crate::kv::{KvResult, KvStore};
use sf_core::{BatchId, FloorId, RowDirection, RowDirectionLock, ShuttleId};
use std::sync::Arc;

const BATCH_ROW_PIN_TTL_SECS: u64 = 3600;

pub struct RowDirectionManager {
    kv: Arc<dyn KvStore>,
}

fn row_key(floor: &FloorId, row: &str) -> String {
    format!("row:{floor}:{row}:direction")
}

fn batch_row_key(batch_id: &BatchId) -> String {
    format!("batch:{batch_id}:row")
}

impl RowDirectionManager {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn get_row_direction(
        &self,
        floor: &FloorId,
        row: &str,
    ) -> KvResult<Option<RowDirectionLock>> {
        let Some(raw) = self.kv.get(&row_key(floor, row)).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    async fn save(&self, floor: &FloorId, row: &str, lock: &RowDirectionLock) -> KvResult<()> {
        let encoded = serde_json::to_string(lock).unwrap_or_else(|_| "{}".to_string());
        self.kv.set(&row_key(floor, row), &encoded).await
    }

    /// Succeeds if the row has no direction yet, or its direction already
    /// matches `direction`; adds `shuttle_id` to the holder set either way.
    pub async fn lock_row_direction(
        &self,
        floor: &FloorId,
        row: &str,
        direction: RowDirection,
        shuttle_id: &ShuttleId,
        now_ms: u64,
    ) -> KvResult<bool> {
        let mut lock = match self.get_row_direction(floor, row).await? {
            Some(existing) if existing.direction != direction => return Ok(false),
            Some(existing) => existing,
            None => RowDirectionLock::new(direction, now_ms),
        };
        lock.holders.insert(shuttle_id.clone());
        self.save(floor, row, &lock).await?;
        Ok(true)
    }

    /// Removes `shuttle_id` from the holder set; clears the direction record
    /// entirely once the last holder leaves.
    pub async fn release_shuttle_from_row(
        &self,
        floor: &FloorId,
        row: &str,
        shuttle_id: &ShuttleId,
    ) -> KvResult<()> {
        let Some(mut lock) = self.get_row_direction(floor, row).await? else {
            return Ok(());
        };
        lock.holders.remove(shuttle_id);
        if lock.is_empty() {
            self.kv.del(&row_key(floor, row)).await
        } else {
            self.save(floor, row, &lock).await
        }
    }

    /// Force clear, used at batch-row transition regardless of holders.
    pub async fn clear_row_direction_lock(&self, floor: &FloorId, row: &str) -> KvResult<()> {
        self.kv.del(&row_key(floor, row)).await
    }

    /// Pins `batch_id → row` so multiple shuttles serving the same batch
    /// converge on the same row, refreshed with a 1h TTL on each call.
    pub async fn pin_batch_row(&self, batch_id: &BatchId, row: &str) -> KvResult<()> {
        self.kv.set_ex(&batch_row_key(batch_id), row, BATCH_ROW_PIN_TTL_SECS).await
    }

    pub async fn pinned_row(&self, batch_id: &BatchId) -> KvResult<Option<String>> {
        self.kv.get(&batch_row_key(batch_id)).await
    }
}

#[cfg(test)]
#[path = "row_direction_tests.rs"]
mod tests;
