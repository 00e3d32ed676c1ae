// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conflict Resolver outcome counters (§4.10: "Counters incremented on each
//! outcome: `stats:conflicts:parking_used`, `stats:conflicts:backtrack_used`").

use crate::kv::{KvResult, KvStore};
use std::sync::Arc;

const PARKING_USED_KEY: &str = "stats:conflicts:parking_used";
const BACKTRACK_USED_KEY: &str = "stats:conflicts:backtrack_used";

pub struct ConflictMetrics {
    kv: Arc<dyn KvStore>,
}

impl ConflictMetrics {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn record_parking_used(&self) -> KvResult<i64> {
        self.kv.incr(PARKING_USED_KEY).await
    }

    pub async fn record_backtrack_used(&self) -> KvResult<i64> {
        self.kv.incr(BACKTRACK_USED_KEY).await
    }

    pub async fn parking_used_count(&self) -> KvResult<i64> {
        match self.kv.get(PARKING_USED_KEY).await? {
            Some(raw) => Ok(raw.parse().unwrap_or(0)),
            None => Ok(0),
        }
    }

    pub async fn backtrack_used_count(&self) -> KvResult<i64> {
        match self.kv.get(BACKTRACK_USED_KEY).await? {
            Some(raw) => Ok(raw.parse().unwrap_or(0)),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
