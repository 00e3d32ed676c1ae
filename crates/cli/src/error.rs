// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors for the `whctl` operator CLI.

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, #[source] source: reqwest::Error },

    #[error("{status}: {message}")]
    Api { status: reqwest::StatusCode, message: String },

    #[error("failed to parse response body: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type CliResult<T> = Result<T, CliError>;
