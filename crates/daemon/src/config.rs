// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup configuration (§7 Environment). A `clap::Args` wrapper
//! around the same environment variables `sf_config::settings` already
//! knows how to read, so the binary gets `--flag`/`--help` ergonomics
//! without a second source of truth for defaults.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, clap::Args)]
pub struct DaemonConfig {
    /// HTTP listener port.
    #[arg(long, default_value_t = sf_config::settings::http_port(), env = "PORT")]
    pub http_port: u16,

    /// Keyed store connection URL.
    #[arg(long, default_value_t = sf_config::settings::kv_url(), env = "SF_KV_URL")]
    pub kv_url: String,

    /// Pub/sub broker URL.
    #[arg(long, default_value_t = sf_config::settings::broker_url(), env = "SF_BROKER_URL")]
    pub broker_url: String,

    /// Pub/sub broker username, if the broker requires auth.
    #[arg(long, env = "SF_BROKER_USERNAME")]
    pub broker_username: Option<String>,

    /// Pub/sub broker password, if the broker requires auth.
    #[arg(long, env = "SF_BROKER_PASSWORD")]
    pub broker_password: Option<String>,

    /// Lifter-ready poller interval, in milliseconds.
    #[arg(long, default_value_t = sf_config::settings::lifter_poll_interval().as_millis() as u64, env = "SF_LIFTER_POLL_MS")]
    pub lifter_poll_ms: u64,

    /// Shuttle liveness TTL, in milliseconds.
    #[arg(long, default_value_t = sf_config::settings::shuttle_liveness_ttl().as_millis() as u64, env = "SF_SHUTTLE_LIVENESS_MS")]
    pub shuttle_liveness_ms: u64,

    /// Graceful shutdown drain timeout, in milliseconds.
    #[arg(long, default_value_t = sf_config::settings::drain_timeout().as_millis() as u64, env = "SF_DRAIN_TIMEOUT_MS")]
    pub drain_timeout_ms: u64,

    /// Path to the rack configuration TOML file.
    #[arg(long, default_value_os_t = sf_config::settings::rack_config_path(), env = "SF_RACK_CONFIG_PATH")]
    pub rack_config_path: PathBuf,

    /// Path to the lifter floor-map TOML file.
    #[arg(long, default_value_os_t = sf_config::settings::lifter_config_path(), env = "SF_LIFTER_CONFIG_PATH")]
    pub lifter_config_path: PathBuf,
}

impl DaemonConfig {
    pub fn lifter_poll_interval(&self) -> Duration {
        Duration::from_millis(self.lifter_poll_ms)
    }

    pub fn shuttle_liveness_ttl(&self) -> Duration {
        Duration::from_millis(self.shuttle_liveness_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
