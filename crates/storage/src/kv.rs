// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The keyed distributed store port (§1 "conceptually Redis").
//!
//! Every stateful component in this crate (reservations, node occupation,
//! shuttle telemetry cache, active paths, row-direction locks, metrics
//! counters) is built on top of this single trait so the real backend can
//! be swapped for a `RedisKvStore` in production or an `InMemoryKvStore` in
//! tests without touching the domain logic.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("value at key {0} was not valid UTF-8 / not the expected shape")]
    Malformed(String),
}

pub type KvResult<T> = Result<T, KvError>;

/// Minimal Redis-shaped operations used by the orchestration engine.
///
/// TTLs are expressed in whole seconds, matching the key layout in §7
/// (`shuttle:state:{id}` 10s, `shuttle:active_path:{id}` 600s, locks 300s,
/// batch records 3600s).
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> KvResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> KvResult<()>;
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<()>;
    /// `SETNX` with a TTL applied atomically on success. Returns `true` if the
    /// key was set (i.e. this caller acquired it).
    async fn set_nx_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<bool>;
    async fn del(&self, key: &str) -> KvResult<()>;
    async fn expire(&self, key: &str, ttl_secs: u64) -> KvResult<()>;
    async fn exists(&self, key: &str) -> KvResult<bool>;

    async fn incr(&self, key: &str) -> KvResult<i64>;
    async fn decr(&self, key: &str) -> KvResult<i64>;

    async fn hget(&self, key: &str, field: &str) -> KvResult<Option<String>>;
    async fn hset(&self, key: &str, field: &str, value: &str) -> KvResult<()>;
    async fn hgetall(&self, key: &str) -> KvResult<HashMap<String, String>>;
    async fn hdel(&self, key: &str, field: &str) -> KvResult<()>;

    async fn lpush(&self, key: &str, value: &str) -> KvResult<()>;
    async fn rpush(&self, key: &str, value: &str) -> KvResult<()>;
    /// Pop and return the head of the list (FIFO when paired with `rpush`).
    async fn lpop(&self, key: &str) -> KvResult<Option<String>>;
    /// Pop and return the tail of the list (FIFO when paired with `lpush`,
    /// the staging queue's push/pop direction per §4.6/§4.7).
    async fn rpop(&self, key: &str) -> KvResult<Option<String>>;
    async fn llen(&self, key: &str) -> KvResult<usize>;

    async fn sadd(&self, key: &str, member: &str) -> KvResult<()>;
    async fn srem(&self, key: &str, member: &str) -> KvResult<()>;
    async fn smembers(&self, key: &str) -> KvResult<Vec<String>>;
    async fn sismember(&self, key: &str, member: &str) -> KvResult<bool>;

    /// Sorted set insert (member, score). Used for `shuttle:global_task_queue`.
    async fn zadd(&self, key: &str, member: &str, score: f64) -> KvResult<()>;
    async fn zrem(&self, key: &str, member: &str) -> KvResult<()>;
    /// Members in ascending score order.
    async fn zrange(&self, key: &str, start: isize, stop: isize) -> KvResult<Vec<String>>;
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
