// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path janitor (§5): a 30s sweep evicting active-path records whose TTL has
//! lapsed, so a crashed shuttle's stale path never lingers past the worth of
//! the occupancy data it implies.

use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const TICK_INTERVAL: Duration = Duration::from_secs(30);

pub fn spawn(state: Arc<AppState>, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("path janitor stopped");
                    break;
                }
                _ = interval.tick() => {
                    match state.path_cache.evict_stale().await {
                        Ok(0) => {}
                        Ok(count) => tracing::debug!(count, "evicted stale active paths"),
                        Err(err) => tracing::warn!(error = %err, "path janitor sweep failed"),
                    }
                }
            }
        }
    })
}
