// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-wide error type (§7 Error Handling Design): every subsystem here
//! folds into one of the five kinds the HTTP surface and the background
//! loops report against — `ValidationError`, `NotFoundError`, `LockBusy`,
//! `BrokerError`, `StateInconsistency` — wrapping the lower crates'
//! specific errors rather than re-deriving them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sf_adapters::{BusError, CatalogError, LifterBusError};
use sf_config::ConfigError;
use sf_engine::EngineError;
use sf_storage::KvError;
use sf_wire::http::ApiError;
use sf_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("lock busy: held by {0}")]
    LockBusy(String),

    #[error(transparent)]
    Broker(#[from] BusError),

    #[error(transparent)]
    LifterBroker(#[from] LifterBusError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] KvError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("state inconsistency: {0}")]
    StateInconsistency(String),
}

pub type DaemonResult<T> = Result<T, DaemonError>;

impl DaemonError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            DaemonError::Validation(_) => StatusCode::BAD_REQUEST,
            DaemonError::NotFound(_) => StatusCode::NOT_FOUND,
            DaemonError::Conflict(_) => StatusCode::CONFLICT,
            DaemonError::LockBusy(_) => StatusCode::CONFLICT,
            DaemonError::Engine(EngineError::NoPathFound { .. }) => StatusCode::CONFLICT,
            DaemonError::Engine(EngineError::UnknownShuttle(_)) => StatusCode::NOT_FOUND,
            DaemonError::Catalog(_) => StatusCode::NOT_FOUND,
            DaemonError::Broker(_) | DaemonError::LifterBroker(_) => StatusCode::BAD_GATEWAY,
            DaemonError::Store(_)
            | DaemonError::Config(_)
            | DaemonError::Wire(_)
            | DaemonError::Engine(_)
            | DaemonError::StateInconsistency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DaemonError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(ApiError::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
