// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Internal lifter-ready channel (§4.9 `ARRIVED_AT_LIFTER`/`WAITING_FOR_LIFTER`
//! handling, §6 `lifter:events`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LifterEvent {
    #[serde(rename = "LIFTER_ARRIVED")]
    LifterArrived { floor_id: String },

    #[serde(rename = "LIFTER_MOVING")]
    LifterMoving { floor_id: String },
}

impl LifterEvent {
    pub fn floor_id(&self) -> &str {
        match self {
            LifterEvent::LifterArrived { floor_id } | LifterEvent::LifterMoving { floor_id } => floor_id,
        }
    }
}

#[cfg(test)]
#[path = "lifter_event_tests.rs"]
mod tests;
