// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to encode payload as json")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode payload as json")]
    Decode(#[source] serde_json::Error),
}

pub type WireResult<T> = Result<T, WireError>;

/// Encodes a payload to the bytes published on the bus or returned over
/// HTTP.
pub fn encode<T: Serialize>(value: &T) -> WireResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(WireError::Encode)
}

/// Decodes bytes received from the bus or an HTTP body.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> WireResult<T> {
    serde_json::from_slice(bytes).map_err(WireError::Decode)
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
