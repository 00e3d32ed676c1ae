// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node Occupation Map (§4.2): which QR is physically held by which shuttle.

use crate::kv::{KvResult, KvStore};
use std::collections::HashMap;
use std::sync::Arc;

pub struct NodeOccupationMap {
    kv: Arc<dyn KvStore>,
}

const OCCUPIED_INDEX_KEY: &str = "node:occupied_index";

fn occupied_by_key(qr: &str) -> String {
    format!("node:{qr}:occupied_by")
}

impl NodeOccupationMap {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// `node:occupied_index` is a side index (not named in §7's key layout)
    /// kept alongside each `node:{qr}:occupied_by` string so
    /// `get_all_occupied` doesn't need keyspace scanning from the store.
    pub async fn block_node(&self, qr: &str, shuttle_id: &str) -> KvResult<()> {
        self.kv.set(&occupied_by_key(qr), shuttle_id).await?;
        self.kv.sadd(OCCUPIED_INDEX_KEY, qr).await
    }

    pub async fn unblock_node(&self, qr: &str) -> KvResult<()> {
        self.kv.del(&occupied_by_key(qr)).await?;
        self.kv.srem(OCCUPIED_INDEX_KEY, qr).await
    }

    pub async fn occupied_by(&self, qr: &str) -> KvResult<Option<String>> {
        self.kv.get(&occupied_by_key(qr)).await
    }

    /// Unblock `prev_qr` then block `cur_qr`, in that order, so a shuttle
    /// never transiently reads as conflicting with its own prior position.
    pub async fn handle_shuttle_move(
        &self,
        shuttle_id: &str,
        prev_qr: Option<&str>,
        cur_qr: &str,
    ) -> KvResult<()> {
        if let Some(prev) = prev_qr {
            self.unblock_node(prev).await?;
        }
        self.block_node(cur_qr, shuttle_id).await
    }

    /// Snapshot of every occupied node, used as a dynamic obstacle set by
    /// the pathfinder (§4.4 `avoid` default).
    pub async fn get_all_occupied(&self) -> KvResult<HashMap<String, String>> {
        let qrs = self.kv.smembers(OCCUPIED_INDEX_KEY).await?;
        let mut snapshot = HashMap::with_capacity(qrs.len());
        for qr in qrs {
            if let Some(shuttle_id) = self.occupied_by(&qr).await? {
                snapshot.insert(qr, shuttle_id);
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "occupation_tests.rs"]
mod tests;
