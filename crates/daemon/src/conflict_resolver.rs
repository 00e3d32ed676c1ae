// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conflict Resolver — Pillar 3 (§4.10): triggered by `SHUTTLE_WAITING`. The
//! lower-priority shuttle of the pair yields (park, then backtrack, then wait
//! in place); the winner just waits. A yield that doesn't clear in time
//! escalates to a full reroute around current occupancy.

use crate::error::DaemonResult;
use crate::state::AppState;
use sf_core::{Action, Clock, OnArrival, RackId, ShuttleId, TaskStatus};
use sf_engine::{find_path, MissionOutcome, SegmentRequest};
use sf_wire::{MissionPayload, ShuttleCommand};
use std::collections::HashSet;

/// Step D escalating-wait schedule: first reroute check at 5 s, then every
/// 10 s, up to 5 attempts, with an unconditional emergency accept at 45 s.
const ESCALATION_FIRST_CHECK_MS: u64 = 5_000;
const ESCALATION_RETRY_SPACING_MS: u64 = 10_000;
const ESCALATION_MAX_RETRIES: i64 = 5;
const ESCALATION_EMERGENCY_MS: u64 = 45_000;
/// Tier 3 acceptance bonus accrues once per full window of wait.
const TIER3_WINDOW_MS: u64 = 15_000;
const PARKING_SEARCH_RADIUS: usize = 2;
const BACKTRACK_SCAN_LIMIT: usize = 5;

/// Handles one `SHUTTLE_WAITING` report. `blocked_on` is the shuttle
/// occupying the node `shuttle_id` wants; `current_qr` is where `shuttle_id`
/// currently sits.
pub async fn resolve(
    state: &AppState,
    shuttle_id: &ShuttleId,
    blocked_on: &ShuttleId,
    current_qr: &str,
) -> DaemonResult<()> {
    let now = state.clock.epoch_ms();

    if !must_yield(state, shuttle_id, blocked_on).await? {
        // We hold priority; the blocker is the one expected to yield. Stamp
        // our own wait so a stuck counterpart can still be escalated later.
        state.wait_registry.stamp_waiting_since(shuttle_id, now).await?;
        return Ok(());
    }

    let Some(since) = state.wait_registry.waiting_since(shuttle_id).await? else {
        state.wait_registry.stamp_waiting_since(shuttle_id, now).await?;
        state.wait_registry.clear_reroute_attempts(shuttle_id).await?;
        return attempt_yield(state, shuttle_id, current_qr).await;
    };

    let waited_ms = now.saturating_sub(since);
    if waited_ms < ESCALATION_FIRST_CHECK_MS {
        return Ok(());
    }

    let emergency = waited_ms >= ESCALATION_EMERGENCY_MS;
    let attempts_made = state.wait_registry.reroute_attempts(shuttle_id).await?;
    let next_due_ms = ESCALATION_FIRST_CHECK_MS + (attempts_made.max(0) as u64) * ESCALATION_RETRY_SPACING_MS;
    if !emergency && waited_ms < next_due_ms {
        return Ok(());
    }
    if !emergency && attempts_made >= ESCALATION_MAX_RETRIES {
        tracing::error!(%shuttle_id, waited_ms, "conflict reroute retries exhausted without an acceptable path, escalating for operator intervention");
        return Ok(());
    }

    reroute(state, shuttle_id, current_qr, waited_ms, emergency).await
}

/// Step B: the shuttle with the worse `priority_key` (later task, not
/// carrying) yields. A shuttle with no active task always yields to one that
/// has one; between two idle shuttles the comparison falls back to id order
/// so the outcome is still deterministic.
async fn must_yield(state: &AppState, shuttle_id: &ShuttleId, blocked_on: &ShuttleId) -> DaemonResult<bool> {
    let self_priority = task_priority(state, shuttle_id).await?;
    let other_priority = task_priority(state, blocked_on).await?;
    Ok(match (self_priority, other_priority) {
        (Some(mine), Some(theirs)) => mine > theirs,
        (Some(_), None) => false,
        (None, Some(_)) => true,
        (None, None) => shuttle_id.as_str() > blocked_on.as_str(),
    })
}

async fn task_priority(
    state: &AppState,
    shuttle_id: &ShuttleId,
) -> DaemonResult<Option<(std::cmp::Reverse<bool>, u64, String)>> {
    let Some(shuttle) = state.shuttle_cache.get(shuttle_id).await? else {
        return Ok(None);
    };
    let Some(task_id) = shuttle.task_id else {
        return Ok(None);
    };
    Ok(state.task_store.get_task(&task_id).await?.map(|task| task.priority_key()))
}

/// Step C: park, else backtrack, else wait in place.
async fn attempt_yield(state: &AppState, shuttle_id: &ShuttleId, current_qr: &str) -> DaemonResult<()> {
    let Some(shuttle) = state.shuttle_cache.get(shuttle_id).await? else {
        return Ok(());
    };
    let floor_id = sf_core::FloorId::from_string(&shuttle.floor_id);
    let cell = state.catalog.cell(&floor_id, current_qr).await?;

    if let Some(destination) = nearby_parking_node(state, &floor_id, &cell.rack_id, current_qr).await? {
        let traffic = state.traffic.snapshot().await?;
        let outcome = find_path(
            state.catalog.as_ref(),
            &floor_id,
            current_qr,
            &destination,
            shuttle.is_carrying,
            Action::StopAtNode,
            None,
            &traffic,
        )
        .await?;
        let command = ShuttleCommand::MoveToParking {
            path: outcome.qrs,
            destination,
            reason: "yielding to a higher-priority shuttle".to_string(),
            on_arrival: None,
        };
        state.shuttle_bus.publish_command(shuttle_id, &command).await?;
        state.conflict_metrics.record_parking_used().await?;
        return Ok(());
    }

    if let Some(destination) = backtrack_destination(state, shuttle_id, current_qr).await? {
        let command = ShuttleCommand::Backtrack {
            path: destination.path,
            destination: destination.destination,
            reason: "yielding to a higher-priority shuttle".to_string(),
            on_arrival: None,
        };
        state.shuttle_bus.publish_command(shuttle_id, &command).await?;
        state.conflict_metrics.record_backtrack_used().await?;
        return Ok(());
    }

    // No maneuver available: wait in place. `waiting_since` is already
    // stamped, so a prolonged stall still escalates to a reroute.
    Ok(())
}

/// BFS out to `PARKING_SEARCH_RADIUS` hops looking for an unoccupied parking
/// node on the shuttle's own rack.
async fn nearby_parking_node(
    state: &AppState,
    floor_id: &sf_core::FloorId,
    rack_id: &RackId,
    start_qr: &str,
) -> DaemonResult<Option<String>> {
    let mut visited: HashSet<String> = HashSet::from([start_qr.to_string()]);
    let mut frontier = vec![start_qr.to_string()];

    for _ in 0..PARKING_SEARCH_RADIUS {
        let mut next = Vec::new();
        for qr in &frontier {
            for (_, neighbour) in state.catalog.neighbours(floor_id, qr).await? {
                if !visited.insert(neighbour.qr.clone()) {
                    continue;
                }
                if state.rack_config.is_parking_node(rack_id, &neighbour.qr)
                    && state.occupation.occupied_by(&neighbour.qr).await?.is_none()
                {
                    return Ok(Some(neighbour.qr));
                }
                next.push(neighbour.qr);
            }
        }
        frontier = next;
    }
    Ok(None)
}

struct Backtrack {
    path: Vec<String>,
    destination: String,
}

/// Walks the shuttle's own active path backward from its current position,
/// up to `BACKTRACK_SCAN_LIMIT` steps, looking for the nearest free cell
/// already behind it — no pathfinding needed, the route there is the one it
/// just came from, reversed.
async fn backtrack_destination(
    state: &AppState,
    shuttle_id: &ShuttleId,
    current_qr: &str,
) -> DaemonResult<Option<Backtrack>> {
    let Some(entry) = state.path_cache.get_path(shuttle_id).await? else {
        return Ok(None);
    };
    let Some(current_index) = entry.qrs.iter().position(|qr| qr == current_qr) else {
        return Ok(None);
    };
    let max_back = BACKTRACK_SCAN_LIMIT.min(current_index);
    for back in 1..=max_back {
        let idx = current_index - back;
        let candidate = &entry.qrs[idx];
        if state.occupation.occupied_by(candidate).await?.is_none() {
            let path = entry.qrs[idx..=current_index].iter().rev().cloned().collect();
            return Ok(Some(Backtrack { path, destination: candidate.clone() }));
        }
    }
    Ok(None)
}

/// Step D: the yield didn't clear in time. Recompute a backup path against
/// live occupancy and accept it only within the escalating length-increase
/// limits (tier 1 base + tier 2 retry bonus + tier 3 wait bonus), unless the
/// emergency override (45 s) forces an unconditional accept. An accepted
/// candidate's actual segment is then computed and published the same way
/// the Dispatcher and Event Listener do.
async fn reroute(
    state: &AppState,
    shuttle_id: &ShuttleId,
    current_qr: &str,
    waited_ms: u64,
    emergency: bool,
) -> DaemonResult<()> {
    let Some(shuttle) = state.shuttle_cache.get(shuttle_id).await? else {
        return Ok(());
    };
    let Some(task_id) = shuttle.task_id else {
        return Ok(());
    };
    let Some(task) = state.task_store.get_task(&task_id).await? else {
        return Ok(());
    };
    if task.status == TaskStatus::Pending {
        return Ok(());
    }

    let floor_id = sf_core::FloorId::from_string(&shuttle.floor_id);
    let goal_qr = if task.pickup_completed { &task.end_qr } else { &task.pickup_qr };

    let traffic = state.traffic.snapshot().await?;
    let candidate = match find_path(
        state.catalog.as_ref(),
        &floor_id,
        current_qr,
        goal_qr,
        shuttle.is_carrying,
        Action::StopAtNode,
        None,
        &traffic,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(%shuttle_id, error = %err, "conflict reroute found no backup path this round");
            return Ok(());
        }
    };

    let attempts = state.wait_registry.incr_reroute_attempts(shuttle_id).await?;

    if !emergency {
        let baseline = state
            .path_cache
            .get_path(shuttle_id)
            .await?
            .map(|entry| entry.meta.path_length)
            .unwrap_or(candidate.qrs.len()) as u64;
        let tier1_pct = if shuttle.is_carrying { 140 } else { 200 };
        let tier2_pct = 50 * attempts.max(0) as u64;
        let tier3_pct = 50 * (waited_ms / TIER3_WINDOW_MS);
        let limit_pct = tier1_pct + tier2_pct + tier3_pct;
        let allowed = baseline * limit_pct / 100;
        let candidate_len = candidate.qrs.len() as u64;
        if candidate_len > allowed {
            if attempts >= ESCALATION_MAX_RETRIES {
                tracing::error!(
                    %shuttle_id, waited_ms, candidate_len, allowed,
                    "conflict reroute retries exhausted without an acceptable path, escalating for operator intervention"
                );
            } else {
                tracing::debug!(
                    %shuttle_id, waited_ms, candidate_len, allowed,
                    "backup path rejected, still over the escalating acceptance limit"
                );
            }
            return Ok(());
        }
    }

    state.wait_registry.clear_waiting_since(shuttle_id).await?;
    state.wait_registry.clear_reroute_attempts(shuttle_id).await?;

    let request = if task.pickup_completed {
        SegmentRequest {
            task_id,
            final_target_qr: task.end_qr.clone(),
            final_target_floor_id: task.end_floor_id.to_string(),
            on_arrival: OnArrival::TaskComplete,
            is_carrying: true,
            pickup_qr: task.pickup_qr.clone(),
            end_qr: task.end_qr.clone(),
            item_info: task.item_info.clone(),
            step: 2,
            priority: task.priority,
        }
    } else {
        SegmentRequest {
            task_id,
            final_target_qr: task.pickup_qr.clone(),
            final_target_floor_id: task.pickup_floor_id.to_string(),
            on_arrival: OnArrival::PickupComplete,
            is_carrying: false,
            pickup_qr: task.pickup_qr.clone(),
            end_qr: task.end_qr.clone(),
            item_info: task.item_info.clone(),
            step: 1,
            priority: task.priority,
        }
    };

    match state.mission_coordinator.calculate_next_segment(shuttle_id, &request).await? {
        MissionOutcome::Ready(mission) => {
            let payload = MissionPayload::from(&mission);
            crate::mission_publish::publish_mission_with_retry(state, shuttle_id, &payload).await?;
        }
        MissionOutcome::WaitingForLifter { floor_id } => {
            tracing::info!(%shuttle_id, floor_id, "reroute now waits for a lifter");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "conflict_resolver_tests.rs"]
mod tests;
