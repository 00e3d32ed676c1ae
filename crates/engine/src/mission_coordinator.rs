// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission Coordinator (§4.5): `calculateNextSegment`, the operation that
//! turns "shuttle X needs to end up at QR Y on floor Z" into either a
//! single-floor `Mission` or a `WaitingForLifter` outcome when the path
//! requires a lifter that isn't ready yet.

use crate::error::{EngineError, EngineResult};
use crate::pathfinder::find_path;
use crate::traffic::TrafficSnapshotProvider;
use sf_adapters::{CatalogGateway, LifterCommander};
use sf_config::LifterConfig;
use sf_core::{
    Action, ActivePathEntry, Clock, FloorId, Mission, MissionMeta, OnArrival, PathMeta, PathStep,
    ShuttleId, TaskId,
};
use sf_storage::{path_cache, LifterStateCache, PathCache, ShuttleStateCache, ShuttleWaitState, WaitRegistry};
use std::sync::Arc;

/// What the caller asked the Mission Coordinator to get the shuttle to.
pub struct SegmentRequest {
    pub task_id: TaskId,
    pub final_target_qr: String,
    pub final_target_floor_id: String,
    /// What the shuttle should report once it finishes this segment, when
    /// the segment lands directly on the final target (same-floor case).
    pub on_arrival: OnArrival,
    pub is_carrying: bool,
    pub pickup_qr: String,
    pub end_qr: String,
    pub item_info: serde_json::Value,
    pub step: u32,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MissionOutcome {
    Ready(Mission),
    WaitingForLifter { floor_id: String },
}

pub struct MissionCoordinator<C: Clock> {
    catalog: Arc<dyn CatalogGateway>,
    lifter_config: Arc<LifterConfig>,
    lifter_cache: Arc<LifterStateCache>,
    lifter_commander: Arc<dyn LifterCommander>,
    traffic: Arc<dyn TrafficSnapshotProvider>,
    path_cache: Arc<PathCache>,
    wait_registry: Arc<WaitRegistry>,
    shuttle_cache: Arc<ShuttleStateCache>,
    clock: C,
}

#[allow(clippy::too_many_arguments)]
impl<C: Clock> MissionCoordinator<C> {
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        lifter_config: Arc<LifterConfig>,
        lifter_cache: Arc<LifterStateCache>,
        lifter_commander: Arc<dyn LifterCommander>,
        traffic: Arc<dyn TrafficSnapshotProvider>,
        path_cache: Arc<PathCache>,
        wait_registry: Arc<WaitRegistry>,
        shuttle_cache: Arc<ShuttleStateCache>,
        clock: C,
    ) -> Self {
        Self {
            catalog,
            lifter_config,
            lifter_cache,
            lifter_commander,
            traffic,
            path_cache,
            wait_registry,
            shuttle_cache,
            clock,
        }
    }

    pub async fn calculate_next_segment(
        &self,
        shuttle_id: &ShuttleId,
        request: &SegmentRequest,
    ) -> EngineResult<MissionOutcome> {
        let shuttle = self
            .shuttle_cache
            .get(shuttle_id)
            .await?
            .ok_or_else(|| EngineError::UnknownShuttle(shuttle_id.to_string()))?;
        let current_qr = shuttle.current_qr.clone();
        let current_floor = FloorId::from_string(&shuttle.floor_id);

        let same_floor = current_floor.as_str() == request.final_target_floor_id;
        let (segment_target_qr, on_arrival, final_action, boarding_lifter) = if same_floor {
            let action = if request.is_carrying { Action::DropOff } else { Action::PickUp };
            (request.final_target_qr.clone(), request.on_arrival, action, None)
        } else {
            let (lifter_id, lifter_qr) = match self.lifter_config.serving(current_floor.as_str()) {
                Some((id, qr)) => (Some(id.to_string()), qr.to_string()),
                None => (None, self.catalog.lifter_cell(&current_floor).await?.qr),
            };
            (lifter_qr, OnArrival::ArrivedAtLifter, Action::StopAtNode, Some(lifter_id))
        };

        let traffic = self.traffic.snapshot().await?;
        let path = find_path(
            self.catalog.as_ref(),
            &current_floor,
            &current_qr,
            &segment_target_qr,
            request.is_carrying,
            final_action,
            None,
            &traffic,
        )
        .await?;

        if let Some(lifter_id) = boarding_lifter {
            let already_on_lifter = self
                .catalog
                .is_lifter_qr(&current_floor, &current_qr)
                .await
                .unwrap_or(false);
            if !already_on_lifter {
                let ready = match &lifter_id {
                    Some(id) => self
                        .lifter_cache
                        .get(id)
                        .await?
                        .is_some_and(|state| state.is_idle_at(&current_floor)),
                    // No lifter id resolved (catalog-only fallback, §4.5 step 3):
                    // there is nothing to key a readiness check on, so we proceed
                    // optimistically rather than stall the shuttle forever.
                    None => true,
                };
                if !ready {
                    self.wait_registry.add_waiting_for_lifter(current_floor.as_str(), shuttle_id).await?;
                    if let Some(id) = &lifter_id {
                        let _ = self.lifter_commander.command_to_floor(id, current_floor.as_str()).await;
                    }

                    let wait_index = path.qrs.len().saturating_sub(2);
                    let resume_mission = Mission {
                        qrs: path.qrs[wait_index..].to_vec(),
                        steps: path.steps[wait_index..]
                            .iter()
                            .enumerate()
                            .map(|(i, step)| PathStep { qr_index: i, direction: step.direction, action: step.action })
                            .collect(),
                        meta: MissionMeta {
                            task_id: request.task_id,
                            on_arrival,
                            step: request.step,
                            final_target_qr: request.final_target_qr.clone(),
                            final_target_floor_id: request.final_target_floor_id.clone(),
                            pickup_qr: request.pickup_qr.clone(),
                            end_qr: request.end_qr.clone(),
                            item_info: request.item_info.clone(),
                            is_carrying: request.is_carrying,
                        },
                    };
                    self.wait_registry
                        .save_wait_state(&ShuttleWaitState {
                            shuttle_id: *shuttle_id,
                            floor_id: current_floor.to_string(),
                            resume_mission,
                        })
                        .await?;
                    return Ok(MissionOutcome::WaitingForLifter { floor_id: current_floor.to_string() });
                }
            }
        }

        let mission = Mission {
            qrs: path.qrs,
            steps: path.steps,
            meta: MissionMeta {
                task_id: request.task_id,
                on_arrival,
                step: request.step,
                final_target_qr: request.final_target_qr.clone(),
                final_target_floor_id: request.final_target_floor_id.clone(),
                pickup_qr: request.pickup_qr.clone(),
                end_qr: request.end_qr.clone(),
                item_info: request.item_info.clone(),
                is_carrying: request.is_carrying,
            },
        };

        let entry = ActivePathEntry {
            shuttle_id: *shuttle_id,
            qrs: mission.qrs.clone(),
            steps: mission.steps.clone(),
            meta: PathMeta {
                task_id: Some(request.task_id),
                is_carrying: request.is_carrying,
                priority: request.priority,
                end_qr: request.final_target_qr.clone(),
                end_floor_id: request.final_target_floor_id.clone(),
                path_length: mission.qrs.len(),
            },
            timestamp_ms: self.clock.epoch_ms(),
            ttl_ms: path_cache::ACTIVE_PATH_TTL_SECS * 1000,
        };
        self.path_cache.save_path(&entry).await?;

        Ok(MissionOutcome::Ready(mission))
    }
}

#[cfg(test)]
#[path = "mission_coordinator_tests.rs"]
mod tests;
