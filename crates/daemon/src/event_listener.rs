// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Listener (§4.9): the state machine driven by `shuttle/events` and
//! `lifter:events`. Owns the MQTT `EventLoop` — `rumqttc` allows exactly one
//! poller per client, so this is also where both topics are subscribed.

use crate::conflict_resolver;
use crate::error::DaemonResult;
use crate::staging;
use crate::state::AppState;
use rumqttc::{Event as MqttEvent, Incoming, QoS};
use sf_core::{Clock, Event, FloorId, OnArrival, ShuttleStatus, TaskStatus};
use sf_engine::{MissionOutcome, SegmentRequest};
use sf_wire::{LifterEvent, MissionPayload, LIFTER_EVENTS_TOPIC, SHUTTLE_EVENTS_TOPIC};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub fn spawn(
    state: Arc<AppState>,
    client: rumqttc::AsyncClient,
    mut eventloop: rumqttc::EventLoop,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = client.subscribe(SHUTTLE_EVENTS_TOPIC, QoS::AtLeastOnce).await {
            tracing::error!(error = %err, "failed to subscribe to shuttle events");
        }
        if let Err(err) = client.subscribe(LIFTER_EVENTS_TOPIC, QoS::AtLeastOnce).await {
            tracing::error!(error = %err, "failed to subscribe to lifter events");
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("event listener stopped");
                    break;
                }
                poll = eventloop.poll() => {
                    match poll {
                        Ok(MqttEvent::Incoming(Incoming::Publish(publish))) => {
                            if let Err(err) = dispatch(&state, &publish.topic, &publish.payload).await {
                                tracing::warn!(topic = %publish.topic, error = %err, "event handling failed");
                            }
                        }
                        Ok(_) => {}
                        Err(err) => {
                            tracing::warn!(error = %err, "mqtt event loop error, retrying");
                            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                        }
                    }
                }
            }
        }
    })
}

async fn dispatch(state: &AppState, topic: &str, payload: &[u8]) -> DaemonResult<()> {
    if topic == SHUTTLE_EVENTS_TOPIC {
        let event: Event = sf_wire::decode(payload)?;
        handle_event(state, &event).await
    } else if topic == LIFTER_EVENTS_TOPIC {
        let event: LifterEvent = sf_wire::decode(payload)?;
        handle_lifter_event(state, &event).await
    } else {
        tracing::debug!(topic, "ignoring message on unrecognised topic");
        Ok(())
    }
}

pub async fn handle_event(state: &AppState, event: &Event) -> DaemonResult<()> {
    match event {
        Event::ShuttleInitialized { shuttle_id, ip, current_qr, floor_id } => {
            let now = state.clock.epoch_ms();
            let shuttle = sf_core::ShuttleState {
                id: *shuttle_id,
                ip: ip.clone(),
                current_qr: current_qr.clone(),
                floor_id: floor_id.clone(),
                shuttle_status: ShuttleStatus::Idle,
                command_complete: 1,
                package_status: 0,
                pallet_lifting_status: 0,
                current_step: 0,
                mission_completed: true,
                task_id: None,
                target_qr: None,
                is_carrying: false,
                last_update_ms: now,
            };
            state.shuttle_cache.register(&shuttle).await?;
            state.occupation.block_node(current_qr, shuttle_id.as_str()).await?;
            Ok(())
        }

        Event::ShuttleMoved { shuttle_id, current_qr, current_step, shuttle_status } => {
            let Some(mut shuttle) = state.shuttle_cache.get(shuttle_id).await? else {
                return Ok(());
            };
            let prev_qr = shuttle.current_qr.clone();
            shuttle.current_qr = current_qr.clone();
            shuttle.current_step = *current_step;
            shuttle.shuttle_status = *shuttle_status;
            shuttle.last_update_ms = state.clock.epoch_ms();
            state.shuttle_cache.put(&shuttle).await?;
            state.occupation.handle_shuttle_move(shuttle_id.as_str(), Some(&prev_qr), current_qr).await?;
            release_pickup_lock_if_cleared(state, &shuttle, current_qr).await?;
            Ok(())
        }

        Event::ShuttleTaskStarted { shuttle_id, task_id, target_qr } => {
            tracing::debug!(%shuttle_id, %task_id, target_qr, "shuttle task started");
            Ok(())
        }

        Event::ShuttleWaiting { shuttle_id, blocked_on, current_qr } => {
            tracing::debug!(%shuttle_id, %blocked_on, current_qr, "shuttle reported waiting");
            conflict_resolver::resolve(state, shuttle_id, blocked_on, current_qr).await
        }

        Event::PickupComplete { shuttle_id, task_id } => handle_pickup_complete(state, shuttle_id, task_id).await,

        Event::ArrivedAtLifter { shuttle_id, task_id, lifter_qr } => {
            tracing::debug!(%shuttle_id, %task_id, lifter_qr, "shuttle arrived at lifter");
            Ok(())
        }

        Event::WaitingForLifter { shuttle_id, task_id } => {
            tracing::info!(%shuttle_id, %task_id, "shuttle waiting for lifter");
            Ok(())
        }

        Event::TaskComplete { shuttle_id, task_id } => handle_task_complete(state, shuttle_id, task_id).await,

        Event::TelemetryPosition { shuttle_id, current_qr, floor_id, shuttle_status, .. } => {
            let Some(mut shuttle) = state.shuttle_cache.get(shuttle_id).await? else {
                return Ok(());
            };
            shuttle.current_qr = current_qr.clone();
            shuttle.floor_id = floor_id.clone();
            shuttle.shuttle_status = *shuttle_status;
            shuttle.last_update_ms = state.clock.epoch_ms();
            state.shuttle_cache.put(&shuttle).await
        }

        Event::Custom => Ok(()),
    }
}

/// Two-stage pickup-lock release (§4.9): the pickup lock is freed the
/// moment a loaded shuttle crosses its rack's `safetyNodeExit`, not at
/// `TASK_COMPLETE` — holding it any longer blocks the next shuttle from
/// being committed to that pickup node for the whole drop-off leg.
/// `pickupCompleted` is consumed (reset to `false`) so this fires once.
async fn release_pickup_lock_if_cleared(
    state: &AppState,
    shuttle: &sf_core::ShuttleState,
    current_qr: &str,
) -> DaemonResult<()> {
    let Some(task_id) = shuttle.task_id else {
        return Ok(());
    };
    let Some(mut task) = state.task_store.get_task(&task_id).await? else {
        return Ok(());
    };
    if !task.pickup_completed {
        return Ok(());
    }
    let Some(rack) = state.rack_config.find_by_pickup_qr(&task.pickup_qr) else {
        return Ok(());
    };
    if rack.safety_node_exit != current_qr {
        return Ok(());
    }
    if !task.is_carrying {
        tracing::error!(
            %task_id, shuttle_id = %shuttle.id,
            "shuttle reached safety_node_exit with pickupCompleted set but isCarrying false"
        );
        return Ok(());
    }

    state.reservations.release_lock(&sf_storage::ReservationService::pickup_lock_key(&task.pickup_qr)).await?;
    task.pickup_completed = false;
    state.task_store.save_task(&task).await?;
    Ok(())
}

/// `mission:pickup_complete` (§4.9): the shuttle has the pallet aboard, so
/// the second (and final) mission segment can be computed straight to the
/// task's endpoint.
async fn handle_pickup_complete(
    state: &AppState,
    shuttle_id: &sf_core::ShuttleId,
    task_id: &sf_core::TaskId,
) -> DaemonResult<()> {
    let Some(mut task) = state.task_store.get_task(task_id).await? else {
        return Ok(());
    };
    task.pickup_completed = true;
    task.is_carrying = true;
    task.status = TaskStatus::InProgress;
    state.task_store.save_task(&task).await?;

    let request = SegmentRequest {
        task_id: *task_id,
        final_target_qr: task.end_qr.clone(),
        final_target_floor_id: task.end_floor_id.to_string(),
        on_arrival: OnArrival::TaskComplete,
        is_carrying: true,
        pickup_qr: task.pickup_qr.clone(),
        end_qr: task.end_qr.clone(),
        item_info: task.item_info.clone(),
        step: 2,
        priority: task.priority,
    };
    match state.mission_coordinator.calculate_next_segment(shuttle_id, &request).await? {
        MissionOutcome::Ready(mission) => {
            let payload = MissionPayload::from(&mission);
            crate::mission_publish::publish_mission_with_retry(state, shuttle_id, &payload).await?;
        }
        MissionOutcome::WaitingForLifter { floor_id } => {
            tracing::info!(%shuttle_id, %task_id, floor_id, "shuttle waiting for lifter before drop-off segment");
        }
    }
    Ok(())
}

/// `mission:task_complete` (§4.9): the full fan-out — mark the endpoint
/// cell, release the endpoint lock (the pickup lock is normally already
/// gone via the two-stage release above; this is a backstop for the
/// `isCarrying` anomaly branch there, and idempotent either way), advance
/// the owning batch's row accounting, and return the shuttle to idle.
async fn handle_task_complete(
    state: &AppState,
    shuttle_id: &sf_core::ShuttleId,
    task_id: &sf_core::TaskId,
) -> DaemonResult<()> {
    let Some(task) = state.task_store.get_task(task_id).await? else {
        return Ok(());
    };

    state.catalog.mark_has_box(&task.end_floor_id, &task.end_qr, Some(task_id.as_str())).await?;
    state
        .reservations
        .release_lock(&sf_storage::ReservationService::endpoint_lock_key(&task.end_qr))
        .await?;
    state
        .reservations
        .release_lock(&sf_storage::ReservationService::pickup_lock_key(&task.pickup_qr))
        .await?;

    let row = task.end_row.to_string();
    state.row_directions.release_shuttle_from_row(&task.end_floor_id, &row, shuttle_id).await?;

    if let Some(batch_id) = task.batch_id {
        state.batch_store.incr_processed_items(&batch_id).await?;
        let remaining = state.batch_store.decr_row_counter(&batch_id).await?;
        if remaining <= 0 {
            state.row_directions.clear_row_direction_lock(&task.end_floor_id, &row).await?;
            staging::process_batch_row(state, &batch_id).await?;
        }
    }

    if let Some(mut shuttle) = state.shuttle_cache.get(shuttle_id).await? {
        shuttle.shuttle_status = ShuttleStatus::Idle;
        shuttle.is_carrying = false;
        shuttle.task_id = None;
        shuttle.target_qr = None;
        shuttle.mission_completed = true;
        shuttle.last_update_ms = state.clock.epoch_ms();
        state.shuttle_cache.put(&shuttle).await?;
    }

    state.path_cache.delete_path(shuttle_id).await?;
    state.task_store.delete_task(task_id).await?;
    Ok(())
}

/// `lifter:events` (§4.9): readiness transitions for the lifter a waiting
/// shuttle is blocked on. `LIFTER_ARRIVED` replays every shuttle's saved
/// resume mission for that floor; `LIFTER_MOVING` is recorded so the next
/// `calculate_next_segment` readiness check sees it correctly as not-idle.
async fn handle_lifter_event(state: &AppState, event: &LifterEvent) -> DaemonResult<()> {
    let floor_id = FloorId::from_string(event.floor_id());
    let now = state.clock.epoch_ms();
    let Some((lifter_id, _)) = state.lifter_config.serving(event.floor_id()) else {
        tracing::warn!(floor_id = event.floor_id(), "lifter event for a floor with no configured lifter");
        return Ok(());
    };

    match event {
        LifterEvent::LifterArrived { .. } => {
            state.lifter_cache.record_arrived(lifter_id, &floor_id, now).await?;
            let waiting = state.wait_registry.shuttles_waiting_for_lifter(event.floor_id()).await?;
            for shuttle_id in waiting {
                let Some(wait_state) = state.wait_registry.take_wait_state(&shuttle_id).await? else {
                    continue;
                };
                let payload = MissionPayload::from(&wait_state.resume_mission);
                crate::mission_publish::publish_mission_with_retry(state, &shuttle_id, &payload).await?;
                state.wait_registry.remove_waiting_for_lifter(event.floor_id(), &shuttle_id).await?;
            }
        }
        LifterEvent::LifterMoving { .. } => {
            state.lifter_cache.record_moving(lifter_id, &floor_id, now).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "event_listener_tests.rs"]
mod tests;
