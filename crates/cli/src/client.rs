// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A thin `reqwest` wrapper over the daemon's HTTP ingestion surface (§6).
//! Every method mirrors one endpoint 1:1; none of them retry or interpret
//! the response beyond deserializing it — that's the daemon's job.

use crate::error::{CliError, CliResult};
use sf_core::ShuttleId;
use sf_wire::http::{
    ApiError, AutoModeRequest, AutoModeResponse, ExecuteStorageRequest, ExecuteStorageResponse,
    ExecutingShuttleEntry, PlcActiveRequest, RegisterRequest, StopExecutingRequest,
};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WarehouseClient {
    http: reqwest::Client,
    base_url: String,
}

impl WarehouseClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap_or_default();
        Self { http, base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    pub async fn auto_mode(&self, request: &AutoModeRequest) -> CliResult<AutoModeResponse> {
        self.post_json("/auto-mode", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> CliResult<serde_json::Value> {
        self.post_json("/register", request).await
    }

    pub async fn execute_storage(&self, request: &ExecuteStorageRequest) -> CliResult<ExecuteStorageResponse> {
        self.post_json("/execute-storage", request).await
    }

    pub async fn executing_shuttles(&self) -> CliResult<Vec<ExecutingShuttleEntry>> {
        self.get_json("/executing-shuttles").await
    }

    pub async fn stop_executing(&self, shuttle_id: &ShuttleId) -> CliResult<serde_json::Value> {
        let request = StopExecutingRequest { shuttle_id: *shuttle_id };
        self.post_json("/stop-executing", &request).await
    }

    pub async fn plc_active(&self, plc_id: &str, active: bool) -> CliResult<serde_json::Value> {
        let url = format!("{}/plc/{plc_id}/active", self.base_url);
        let response = self
            .http
            .put(&url)
            .json(&PlcActiveRequest { active })
            .send()
            .await
            .map_err(|source| CliError::Request { url: url.clone(), source })?;
        Self::into_body(response).await
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(&self, path: &str, body: &B) -> CliResult<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| CliError::Request { url: url.clone(), source })?;
        Self::into_body(response).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let url = format!("{}{path}", self.base_url);
        let response =
            self.http.get(&url).send().await.map_err(|source| CliError::Request { url: url.clone(), source })?;
        Self::into_body(response).await
    }

    async fn into_body<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> CliResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .await
                .map(|err| err.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(CliError::Api { status, message });
        }
        response.json().await.map_err(CliError::Decode)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
