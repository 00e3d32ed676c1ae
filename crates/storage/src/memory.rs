// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `KvStore` for tests and single-process deployments. TTLs are
//! enforced lazily on read against an injected [`sf_core::Clock`], the same
//! pattern the domain crate uses for `ActivePathEntry`/`Lock` expiry.

use crate::kv::{KvError, KvResult, KvStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use sf_core::Clock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
enum Entry {
    Str { value: String, expires_at_ms: Option<u64> },
    Hash { fields: HashMap<String, String>, expires_at_ms: Option<u64> },
    List(std::collections::VecDeque<String>),
    Set(HashSet<String>),
    ZSet(Vec<(String, f64)>),
}

pub struct InMemoryKvStore<C: Clock> {
    clock: C,
    entries: Mutex<HashMap<String, Entry>>,
}

impl<C: Clock> InMemoryKvStore<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, entries: Mutex::new(HashMap::new()) }
    }

    fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    fn is_live(now_ms: u64, expires_at_ms: Option<u64>) -> bool {
        expires_at_ms.is_none_or(|exp| now_ms < exp)
    }

    fn expires_at(&self, ttl_secs: u64) -> Option<u64> {
        Some(self.now_ms() + ttl_secs * 1000)
    }
}

#[async_trait]
impl<C: Clock + 'static> KvStore for InMemoryKvStore<C> {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let now = self.now_ms();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(Entry::Str { value, expires_at_ms }) if Self::is_live(now, *expires_at_ms) => {
                Ok(Some(value.clone()))
            }
            Some(Entry::Str { .. }) => {
                entries.remove(key);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), Entry::Str { value: value.to_string(), expires_at_ms: None });
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<()> {
        let expires_at_ms = self.expires_at(ttl_secs);
        self.entries
            .lock()
            .insert(key.to_string(), Entry::Str { value: value.to_string(), expires_at_ms });
        Ok(())
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<bool> {
        let now = self.now_ms();
        let mut entries = self.entries.lock();
        let occupied = matches!(
            entries.get(key),
            Some(Entry::Str { expires_at_ms, .. }) if Self::is_live(now, *expires_at_ms)
        );
        if occupied {
            return Ok(false);
        }
        let expires_at_ms = Some(now + ttl_secs * 1000);
        entries.insert(key.to_string(), Entry::Str { value: value.to_string(), expires_at_ms });
        Ok(true)
    }

    async fn del(&self, key: &str) -> KvResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> KvResult<()> {
        let expires_at_ms = self.expires_at(ttl_secs);
        if let Some(Entry::Str { expires_at_ms: slot, .. }) = self.entries.lock().get_mut(key) {
            *slot = expires_at_ms;
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        Ok(self.get(key).await?.is_some() || {
            let entries = self.entries.lock();
            matches!(entries.get(key), Some(Entry::Hash { .. } | Entry::List(_) | Entry::Set(_) | Entry::ZSet(_)))
        })
    }

    async fn incr(&self, key: &str) -> KvResult<i64> {
        let mut entries = self.entries.lock();
        let current = match entries.get(key) {
            Some(Entry::Str { value, .. }) => {
                value.parse::<i64>().map_err(|_| KvError::Malformed(key.to_string()))?
            }
            _ => 0,
        };
        let next = current + 1;
        entries
            .insert(key.to_string(), Entry::Str { value: next.to_string(), expires_at_ms: None });
        Ok(next)
    }

    async fn decr(&self, key: &str) -> KvResult<i64> {
        let mut entries = self.entries.lock();
        let current = match entries.get(key) {
            Some(Entry::Str { value, .. }) => {
                value.parse::<i64>().map_err(|_| KvError::Malformed(key.to_string()))?
            }
            _ => 0,
        };
        let next = current - 1;
        entries
            .insert(key.to_string(), Entry::Str { value: next.to_string(), expires_at_ms: None });
        Ok(next)
    }

    async fn hget(&self, key: &str, field: &str) -> KvResult<Option<String>> {
        let now = self.now_ms();
        let entries = self.entries.lock();
        match entries.get(key) {
            Some(Entry::Hash { fields, expires_at_ms }) if Self::is_live(now, *expires_at_ms) => {
                Ok(fields.get(field).cloned())
            }
            _ => Ok(None),
        }
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> KvResult<()> {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(Entry::Hash { fields, .. }) => {
                fields.insert(field.to_string(), value.to_string());
            }
            _ => {
                let mut fields = HashMap::new();
                fields.insert(field.to_string(), value.to_string());
                entries.insert(key.to_string(), Entry::Hash { fields, expires_at_ms: None });
            }
        }
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> KvResult<HashMap<String, String>> {
        let now = self.now_ms();
        let entries = self.entries.lock();
        match entries.get(key) {
            Some(Entry::Hash { fields, expires_at_ms }) if Self::is_live(now, *expires_at_ms) => {
                Ok(fields.clone())
            }
            _ => Ok(HashMap::new()),
        }
    }

    async fn hdel(&self, key: &str, field: &str) -> KvResult<()> {
        if let Some(Entry::Hash { fields, .. }) = self.entries.lock().get_mut(key) {
            fields.remove(field);
        }
        Ok(())
    }

    async fn lpush(&self, key: &str, value: &str) -> KvResult<()> {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(Entry::List(list)) => list.push_front(value.to_string()),
            _ => {
                let mut list = std::collections::VecDeque::new();
                list.push_front(value.to_string());
                entries.insert(key.to_string(), Entry::List(list));
            }
        }
        Ok(())
    }

    async fn rpush(&self, key: &str, value: &str) -> KvResult<()> {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(Entry::List(list)) => list.push_back(value.to_string()),
            _ => {
                let mut list = std::collections::VecDeque::new();
                list.push_back(value.to_string());
                entries.insert(key.to_string(), Entry::List(list));
            }
        }
        Ok(())
    }

    async fn lpop(&self, key: &str) -> KvResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(Entry::List(list)) => Ok(list.pop_front()),
            _ => Ok(None),
        }
    }

    async fn rpop(&self, key: &str) -> KvResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(Entry::List(list)) => Ok(list.pop_back()),
            _ => Ok(None),
        }
    }

    async fn llen(&self, key: &str) -> KvResult<usize> {
        let entries = self.entries.lock();
        match entries.get(key) {
            Some(Entry::List(list)) => Ok(list.len()),
            _ => Ok(0),
        }
    }

    async fn sadd(&self, key: &str, member: &str) -> KvResult<()> {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(Entry::Set(set)) => {
                set.insert(member.to_string());
            }
            _ => {
                let mut set = HashSet::new();
                set.insert(member.to_string());
                entries.insert(key.to_string(), Entry::Set(set));
            }
        }
        Ok(())
    }

    async fn srem(&self, key: &str, member: &str) -> KvResult<()> {
        if let Some(Entry::Set(set)) = self.entries.lock().get_mut(key) {
            set.remove(member);
        }
        Ok(())
    }

    async fn smembers(&self, key: &str) -> KvResult<Vec<String>> {
        let entries = self.entries.lock();
        match entries.get(key) {
            Some(Entry::Set(set)) => Ok(set.iter().cloned().collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn sismember(&self, key: &str, member: &str) -> KvResult<bool> {
        let entries = self.entries.lock();
        match entries.get(key) {
            Some(Entry::Set(set)) => Ok(set.contains(member)),
            _ => Ok(false),
        }
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> KvResult<()> {
        let mut entries = self.entries.lock();
        let zset = match entries.entry(key.to_string()).or_insert_with(|| Entry::ZSet(Vec::new()))
        {
            Entry::ZSet(zset) => zset,
            _ => return Err(KvError::Malformed(key.to_string())),
        };
        zset.retain(|(m, _)| m != member);
        zset.push((member.to_string(), score));
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> KvResult<()> {
        if let Some(Entry::ZSet(zset)) = self.entries.lock().get_mut(key) {
            zset.retain(|(m, _)| m != member);
        }
        Ok(())
    }

    async fn zrange(&self, key: &str, start: isize, stop: isize) -> KvResult<Vec<String>> {
        let entries = self.entries.lock();
        let Some(Entry::ZSet(zset)) = entries.get(key) else {
            return Ok(Vec::new());
        };
        let mut sorted = zset.clone();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
        let len = sorted.len() as isize;
        let normalize = |i: isize| -> isize {
            if i < 0 {
                (len + i).max(0)
            } else {
                i.min(len)
            }
        };
        let start = normalize(start) as usize;
        let stop = (normalize(stop) + 1).max(0) as usize;
        Ok(sorted.into_iter().skip(start).take(stop.saturating_sub(start)).map(|(m, _)| m).collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
