// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP ingestion request/response bodies (§6 "HTTP ingestion").

use sf_core::{BatchId, RackId, ShuttleId, TaskId};
use serde::{Deserialize, Serialize};

/// One `{rackId, palletType, listItem}` entry of a `POST /auto-mode` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoModeItem {
    pub rack_id: RackId,
    pub pallet_type: String,
    /// Each entry is either a bare pallet id string or `{id, ...}`.
    pub list_item: Vec<serde_json::Value>,
}

/// `POST /auto-mode` accepts a single object or an array of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutoModeRequest {
    One(AutoModeItem),
    Many(Vec<AutoModeItem>),
}

impl AutoModeRequest {
    pub fn items(&self) -> &[AutoModeItem] {
        match self {
            AutoModeRequest::One(item) => std::slice::from_ref(item),
            AutoModeRequest::Many(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoModeData {
    pub batch_ids: Vec<BatchId>,
    pub total_batches: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoModeResponse {
    pub success: bool,
    pub data: AutoModeData,
}

/// `POST /register` (inbound pallet registration). 409 on duplicate `pallet_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub pallet_id: String,
    pub pallet_data: serde_json::Value,
}

/// `POST /execute-storage`. 400 if the shuttle is busy, 409 if no storage is
/// available (pallet is returned to the queue on rollback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStorageRequest {
    pub rack_id: RackId,
    pub pallet_type: String,
    pub shuttle_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteStorageResponse {
    pub task_id: TaskId,
    pub shuttle_id: ShuttleId,
}

/// `GET /executing-shuttles` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutingShuttleEntry {
    pub shuttle_id: ShuttleId,
    pub task_id: TaskId,
    pub status: String,
}

/// `POST /stop-executing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopExecutingRequest {
    pub shuttle_id: ShuttleId,
}

/// `PUT /plc/{id}/active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlcActiveRequest {
    pub active: bool,
}

/// Generic JSON error body shared by every fallible endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
