// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staging/task/pending-queue storage (§3 `StagedTask`/`Task`, §4.6-4.8,
//! §7 key layout). Backs the Staging Pipeline, Scheduler Worker, and
//! Dispatcher with a single abstraction over the underlying lists, sorted
//! set, and per-task hash.

use crate::kv::{KvResult, KvStore};
use sf_core::{StagedTask, Task, TaskId};
use std::sync::Arc;

const STAGING_QUEUE_KEY: &str = "task:staging_queue";
const INBOUND_PALLET_QUEUE_KEY: &str = "shuttle:inbound_pallet_queue";
const GLOBAL_TASK_QUEUE_KEY: &str = "shuttle:global_task_queue";
const PROCESSING_TASKS_KEY: &str = "shuttle:processing_tasks";

fn task_key(id: &TaskId) -> String {
    format!("shuttle:task:{id}")
}

pub struct TaskStore {
    kv: Arc<dyn KvStore>,
}

impl TaskStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// `processBatchRow` (§4.6 step 5): left-push each item of the row.
    pub async fn push_staged(&self, staged: &StagedTask) -> KvResult<()> {
        let encoded = serde_json::to_string(staged).unwrap_or_else(|_| "{}".to_string());
        self.kv.lpush(STAGING_QUEUE_KEY, &encoded).await
    }

    /// Scheduler Worker pop (§4.7 step 1): right-pop, FIFO with `push_staged`.
    pub async fn pop_staged(&self) -> KvResult<Option<StagedTask>> {
        let Some(raw) = self.kv.rpop(STAGING_QUEUE_KEY).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// On any failure after pop, re-push to preserve at-least-once (§4.7).
    pub async fn requeue_staged_head(&self, staged: &StagedTask) -> KvResult<()> {
        let encoded = serde_json::to_string(staged).unwrap_or_else(|_| "{}".to_string());
        self.kv.lpush(STAGING_QUEUE_KEY, &encoded).await
    }

    pub async fn staging_queue_len(&self) -> KvResult<usize> {
        self.kv.llen(STAGING_QUEUE_KEY).await
    }

    pub async fn push_inbound_pallet(&self, pallet_id: &str) -> KvResult<()> {
        self.kv.rpush(INBOUND_PALLET_QUEUE_KEY, pallet_id).await
    }

    pub async fn inbound_pallet_queue_len(&self) -> KvResult<usize> {
        self.kv.llen(INBOUND_PALLET_QUEUE_KEY).await
    }

    /// Registers a concrete task: hash record, pending sorted-set entry
    /// ordered by `timestamp_ms` (§4.7 step 4).
    pub async fn register_task(&self, task: &Task) -> KvResult<()> {
        let encoded = serde_json::to_string(task).unwrap_or_else(|_| "{}".to_string());
        self.kv.set(&task_key(&task.task_id), &encoded).await?;
        self.kv.zadd(GLOBAL_TASK_QUEUE_KEY, task.task_id.as_str(), task.timestamp_ms as f64).await
    }

    pub async fn get_task(&self, task_id: &TaskId) -> KvResult<Option<Task>> {
        let Some(raw) = self.kv.get(&task_key(task_id)).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// Overwrites the task record in place (status transitions, Event
    /// Listener field mutations). Does not touch the pending queue.
    pub async fn save_task(&self, task: &Task) -> KvResult<()> {
        let encoded = serde_json::to_string(task).unwrap_or_else(|_| "{}".to_string());
        self.kv.set(&task_key(&task.task_id), &encoded).await
    }

    /// Next pending task id by ascending timestamp, without removing it
    /// (Dispatcher step 1 "peek").
    pub async fn peek_next_pending(&self) -> KvResult<Option<TaskId>> {
        let ids = self.kv.zrange(GLOBAL_TASK_QUEUE_KEY, 0, 0).await?;
        Ok(ids.into_iter().next().map(TaskId::from_string))
    }

    /// Dispatcher step 6: remove from the pending queue once assigned.
    pub async fn remove_from_pending(&self, task_id: &TaskId) -> KvResult<()> {
        self.kv.zrem(GLOBAL_TASK_QUEUE_KEY, task_id.as_str()).await
    }

    pub async fn mark_processing(&self, task_id: &TaskId) -> KvResult<()> {
        self.kv.sadd(PROCESSING_TASKS_KEY, task_id.as_str()).await
    }

    pub async fn unmark_processing(&self, task_id: &TaskId) -> KvResult<()> {
        self.kv.srem(PROCESSING_TASKS_KEY, task_id.as_str()).await
    }

    pub async fn is_processing(&self, task_id: &TaskId) -> KvResult<bool> {
        self.kv.sismember(PROCESSING_TASKS_KEY, task_id.as_str()).await
    }

    pub async fn processing_task_ids(&self) -> KvResult<Vec<TaskId>> {
        let raw = self.kv.smembers(PROCESSING_TASKS_KEY).await?;
        Ok(raw.into_iter().map(TaskId::from_string).collect())
    }

    /// `TASK_COMPLETE` (§4.9): the task hash is deleted on completion;
    /// `Failed` tasks are retained for operator inspection (§3) and this is
    /// not called for them.
    pub async fn delete_task(&self, task_id: &TaskId) -> KvResult<()> {
        self.kv.del(&task_key(task_id)).await?;
        self.kv.zrem(GLOBAL_TASK_QUEUE_KEY, task_id.as_str()).await?;
        self.unmark_processing(task_id).await
    }
}

#[cfg(test)]
#[path = "task_store_tests.rs"]
mod tests;
