// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level mission payload (§4.5, §6): `{totalStep, step1..stepN,
//! running_path_simulation, meta}` published to `shuttle/handle/{shuttleId}`,
//! plus the parking/backtrack commands the Conflict Resolver publishes on
//! the same topic (§4.10 step C).

use sf_core::{Mission, MissionMeta, OnArrival, PathStep, TaskId};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One path step encoded as `"<qr>><direction>:<action>"` (§6).
pub fn encode_step(qr: &str, step: &PathStep) -> String {
    format!("{qr}>{}:{}", step.direction as u8, step.action)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionMetaPayload {
    pub task_id: TaskId,
    pub on_arrival: OnArrival,
    pub step: u32,
    pub final_target_qr: String,
    pub final_target_floor_id: String,
    pub pickup_qr: String,
    pub end_qr: String,
    pub item_info: serde_json::Value,
    pub is_carrying: bool,
}

impl From<&MissionMeta> for MissionMetaPayload {
    fn from(meta: &MissionMeta) -> Self {
        MissionMetaPayload {
            task_id: meta.task_id,
            on_arrival: meta.on_arrival,
            step: meta.step,
            final_target_qr: meta.final_target_qr.clone(),
            final_target_floor_id: meta.final_target_floor_id.clone(),
            pickup_qr: meta.pickup_qr.clone(),
            end_qr: meta.end_qr.clone(),
            item_info: meta.item_info.clone(),
            is_carrying: meta.is_carrying,
        }
    }
}

/// Wire shape of a published mission. `totalStep` and `step1..stepN` are
/// flattened into the top-level object on serialization since the count of
/// step keys varies per mission (§4.5 mission payload shape).
#[derive(Debug, Clone, PartialEq)]
pub struct MissionPayload {
    pub steps: Vec<String>,
    pub running_path_simulation: Vec<String>,
    pub meta: MissionMetaPayload,
}

impl From<&Mission> for MissionPayload {
    fn from(mission: &Mission) -> Self {
        let steps = mission
            .steps
            .iter()
            .map(|step| {
                let qr = mission.qrs.get(step.qr_index).map(String::as_str).unwrap_or_default();
                encode_step(qr, step)
            })
            .collect();
        MissionPayload {
            steps,
            running_path_simulation: mission.qrs.clone(),
            meta: MissionMetaPayload::from(&mission.meta),
        }
    }
}

impl Serialize for MissionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.steps.len() + 3))?;
        map.serialize_entry("totalStep", &self.steps.len())?;
        for (index, step) in self.steps.iter().enumerate() {
            map.serialize_entry(&format!("step{}", index + 1), step)?;
        }
        map.serialize_entry("running_path_simulation", &self.running_path_simulation)?;
        map.serialize_entry("meta", &self.meta)?;
        map.end()
    }
}

/// The out-of-band commands the Conflict Resolver publishes on the same
/// topic as missions (§4.10 step C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShuttleCommand {
    MoveToParking {
        path: Vec<String>,
        destination: String,
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_arrival: Option<OnArrival>,
    },
    Backtrack {
        path: Vec<String>,
        destination: String,
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_arrival: Option<OnArrival>,
    },
}

#[cfg(test)]
#[path = "mission_tests.rs"]
mod tests;
