// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Distributed lock value object (§3 `Lock`, §9 Design Notes — "Exceptions
//! for control flow around locks. Model lock acquisition as a result
//! value").

use serde::{Deserialize, Serialize};

/// `(resourceKey → {ownerId, expiresAt})`. Owner-reentrant: re-acquisition
/// by the same owner refreshes the TTL rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    pub owner: String,
    pub expires_at_ms: u64,
}

impl Lock {
    pub fn new(owner: impl Into<String>, expires_at_ms: u64) -> Self {
        Self { owner: owner.into(), expires_at_ms }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner == owner
    }
}

/// Outcome of a lock acquisition attempt, modeled as a value rather than an
/// exception (§9 Design Notes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome {
    /// Acquired: either the key was free, or we already owned it.
    Acquired,
    /// Held by a distinct, still-live owner.
    HeldByOther(String),
}

impl LockOutcome {
    pub fn acquired(&self) -> bool {
        matches!(self, LockOutcome::Acquired)
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
