// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `KvStore` backed by a real Redis instance via `redis`'s connection
//! manager, which transparently reconnects on connection loss.

use crate::kv::{KvError, KvResult, KvStore};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;

pub struct RedisKvStore {
    conn: ConnectionManager,
}

impl RedisKvStore {
    pub async fn connect(url: &str) -> KvResult<Self> {
        let client = redis::Client::open(url).map_err(|e| KvError::Backend(e.to_string()))?;
        let conn =
            ConnectionManager::new(client).await.map_err(|e| KvError::Backend(e.to_string()))?;
        Ok(Self { conn })
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

fn backend_err(e: redis::RedisError) -> KvError {
    KvError::Backend(e.to_string())
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.conn().get(key).await.map_err(backend_err)
    }

    async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.conn().set(key, value).await.map_err(backend_err)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<()> {
        self.conn().set_ex(key, value, ttl_secs).await.map_err(backend_err)
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<bool> {
        let acquired: bool = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<Option<String>>(&mut self.conn())
            .await
            .map(|reply| reply.is_some())
            .map_err(backend_err)?;
        Ok(acquired)
    }

    async fn del(&self, key: &str) -> KvResult<()> {
        self.conn().del(key).await.map_err(backend_err)
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> KvResult<()> {
        let _: () = self.conn().expire(key, ttl_secs as i64).await.map_err(backend_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        self.conn().exists(key).await.map_err(backend_err)
    }

    async fn incr(&self, key: &str) -> KvResult<i64> {
        self.conn().incr(key, 1).await.map_err(backend_err)
    }

    async fn decr(&self, key: &str) -> KvResult<i64> {
        self.conn().decr(key, 1).await.map_err(backend_err)
    }

    async fn hget(&self, key: &str, field: &str) -> KvResult<Option<String>> {
        self.conn().hget(key, field).await.map_err(backend_err)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> KvResult<()> {
        let _: () = self.conn().hset(key, field, value).await.map_err(backend_err)?;
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> KvResult<HashMap<String, String>> {
        self.conn().hgetall(key).await.map_err(backend_err)
    }

    async fn hdel(&self, key: &str, field: &str) -> KvResult<()> {
        let _: () = self.conn().hdel(key, field).await.map_err(backend_err)?;
        Ok(())
    }

    async fn lpush(&self, key: &str, value: &str) -> KvResult<()> {
        let _: () = self.conn().lpush(key, value).await.map_err(backend_err)?;
        Ok(())
    }

    async fn rpush(&self, key: &str, value: &str) -> KvResult<()> {
        let _: () = self.conn().rpush(key, value).await.map_err(backend_err)?;
        Ok(())
    }

    async fn lpop(&self, key: &str) -> KvResult<Option<String>> {
        self.conn().lpop(key, None).await.map_err(backend_err)
    }

    async fn rpop(&self, key: &str) -> KvResult<Option<String>> {
        self.conn().rpop(key, None).await.map_err(backend_err)
    }

    async fn llen(&self, key: &str) -> KvResult<usize> {
        self.conn().llen(key).await.map_err(backend_err)
    }

    async fn sadd(&self, key: &str, member: &str) -> KvResult<()> {
        let _: () = self.conn().sadd(key, member).await.map_err(backend_err)?;
        Ok(())
    }

    async fn srem(&self, key: &str, member: &str) -> KvResult<()> {
        let _: () = self.conn().srem(key, member).await.map_err(backend_err)?;
        Ok(())
    }

    async fn smembers(&self, key: &str) -> KvResult<Vec<String>> {
        self.conn().smembers(key).await.map_err(backend_err)
    }

    async fn sismember(&self, key: &str, member: &str) -> KvResult<bool> {
        self.conn().sismember(key, member).await.map_err(backend_err)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> KvResult<()> {
        let _: () = self.conn().zadd(key, member, score).await.map_err(backend_err)?;
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> KvResult<()> {
        let _: () = self.conn().zrem(key, member).await.map_err(backend_err)?;
        Ok(())
    }

    async fn zrange(&self, key: &str, start: isize, stop: isize) -> KvResult<Vec<String>> {
        self.conn().zrange(key, start, stop).await.map_err(backend_err)
    }
}
