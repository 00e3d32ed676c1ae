// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon (§7 "Environment:
//! PORT, broker URL/credentials, DB credentials, ... poll intervals").

use std::path::PathBuf;
use std::time::Duration;

/// HTTP listener port (`PORT`, default 8080).
pub fn http_port() -> u16 {
    std::env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8080)
}

/// Keyed store connection URL (`SF_KV_URL`, default a local Redis instance).
pub fn kv_url() -> String {
    std::env::var("SF_KV_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// Pub/sub broker URL (`SF_BROKER_URL`, default a local MQTT broker).
pub fn broker_url() -> String {
    std::env::var("SF_BROKER_URL").unwrap_or_else(|_| "mqtt://127.0.0.1:1883".to_string())
}

pub fn broker_username() -> Option<String> {
    std::env::var("SF_BROKER_USERNAME").ok().filter(|s| !s.is_empty())
}

pub fn broker_password() -> Option<String> {
    std::env::var("SF_BROKER_PASSWORD").ok().filter(|s| !s.is_empty())
}

/// Lifter-ready poller interval (§7 "one periodic poller (configurable,
/// default 500-1000 ms)"). Default 750 ms.
pub fn lifter_poll_interval() -> Duration {
    std::env::var("SF_LIFTER_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(750))
}

/// Shuttle liveness TTL for the Shuttle State Cache (§3 "Shuttle State").
/// Default 10s.
pub fn shuttle_liveness_ttl() -> Duration {
    std::env::var("SF_SHUTTLE_LIVENESS_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(10))
}

/// Active path / reservation TTL (§4.3). Default 10 minutes.
pub fn path_ttl() -> Duration {
    std::env::var("SF_PATH_TTL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(600))
}

/// Path to the rack configuration TOML file (`SF_RACK_CONFIG_PATH`).
pub fn rack_config_path() -> PathBuf {
    std::env::var("SF_RACK_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/racks.toml"))
}

/// Path to the lifter floor-map TOML file (`SF_LIFTER_CONFIG_PATH`).
pub fn lifter_config_path() -> PathBuf {
    std::env::var("SF_LIFTER_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/lifters.toml"))
}

/// Graceful shutdown drain timeout (`SF_DRAIN_TIMEOUT_MS`, default 5s).
pub fn drain_timeout() -> Duration {
    std::env::var("SF_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
