// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission-publish retry loop (§5 "Cancellation & timeouts"): a published
//! mission is republished every `RETRY_INTERVAL` until the shuttle
//! acknowledges it or `RETRY_TIMEOUT` elapses, at which point the attempt is
//! abandoned and logged rather than failing the caller.

use crate::error::DaemonResult;
use crate::state::AppState;
use sf_core::{Clock, ShuttleId, ShuttleState, ShuttleStatus};
use sf_wire::MissionPayload;
use std::time::Duration;

const RETRY_INTERVAL: Duration = Duration::from_millis(500);
const RETRY_TIMEOUT_MS: u64 = 30_000;

/// Publishes `payload` to `shuttle_id`, then keeps republishing every
/// `RETRY_INTERVAL` until the shuttle acknowledges (`commandComplete=0`, or
/// it simply becomes non-`IDLE`) or `RETRY_TIMEOUT_MS` elapses.
pub async fn publish_mission_with_retry(
    state: &AppState,
    shuttle_id: &ShuttleId,
    payload: &MissionPayload,
) -> DaemonResult<()> {
    state.shuttle_bus.publish_mission(shuttle_id, payload).await?;

    let deadline = state.clock.epoch_ms() + RETRY_TIMEOUT_MS;
    loop {
        tokio::time::sleep(RETRY_INTERVAL).await;

        let Some(shuttle) = state.shuttle_cache.get(shuttle_id).await? else {
            return Ok(());
        };
        if acknowledged(&shuttle) {
            return Ok(());
        }
        if state.clock.epoch_ms() >= deadline {
            tracing::error!(%shuttle_id, "mission publish retry timed out without acknowledgement");
            return Ok(());
        }

        state.shuttle_bus.publish_mission(shuttle_id, payload).await?;
    }
}

fn acknowledged(shuttle: &ShuttleState) -> bool {
    shuttle.command_complete == 0 || shuttle.shuttle_status != ShuttleStatus::Idle
}

#[cfg(test)]
#[path = "mission_publish_tests.rs"]
mod tests;
