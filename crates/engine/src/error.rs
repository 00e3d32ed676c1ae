// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-wide error type (§7 Error Handling Design: pathfinder/mission
//! errors propagate to the caller rather than panicking; KV/catalog failures
//! are wrapped, not swallowed).

use sf_adapters::CatalogError;
use sf_config::ConfigError;
use sf_storage::KvError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no path found from {from} to {to} on floor {floor_id}")]
    NoPathFound { from: String, to: String, floor_id: String },

    #[error("path reconstruction did not converge (cycle or >1000 steps)")]
    PathReconstructionError,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] KvError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("shuttle {0} has no live state")]
    UnknownShuttle(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
