// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation Service (§4.1): owner-reentrant distributed locks with TTL.

use crate::kv::{KvResult, KvStore};
use std::sync::Arc;

pub const PICKUP_LOCK_TTL_SECS: u64 = 300;
pub const ENDPOINT_LOCK_TTL_SECS: u64 = 300;

pub struct ReservationService {
    kv: Arc<dyn KvStore>,
}

impl ReservationService {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Atomic SET-if-absent with TTL. Also succeeds (and refreshes the TTL)
    /// if the existing owner already equals `owner_id` (§4.1 re-acquisition).
    pub async fn acquire_lock(&self, key: &str, owner_id: &str, ttl_secs: u64) -> KvResult<bool> {
        if self.kv.set_nx_ex(key, owner_id, ttl_secs).await? {
            return Ok(true);
        }
        if self.kv.get(key).await?.as_deref() == Some(owner_id) {
            self.kv.set_ex(key, owner_id, ttl_secs).await?;
            return Ok(true);
        }
        Ok(false)
    }

    pub async fn release_lock(&self, key: &str) -> KvResult<()> {
        self.kv.del(key).await
    }

    pub async fn get_lock_owner(&self, key: &str) -> KvResult<Option<String>> {
        self.kv.get(key).await
    }

    pub fn pickup_lock_key(pickup_qr: &str) -> String {
        format!("pickup:lock:{pickup_qr}")
    }

    pub fn endpoint_lock_key(cell_id: &str) -> String {
        format!("endnode:lock:{cell_id}")
    }
}

#[cfg(test)]
#[path = "reservation_tests.rs"]
mod tests;
