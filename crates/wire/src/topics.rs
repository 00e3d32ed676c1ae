// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pub/sub topic names (§6 "Pub/sub topics").

use sf_core::ShuttleId;

/// Subscribed: semantic shuttle events (§4.9).
pub const SHUTTLE_EVENTS_TOPIC: &str = "shuttle/events";

/// Subscribed: internal lifter-ready channel (`LIFTER_ARRIVED`, `LIFTER_MOVING`).
pub const LIFTER_EVENTS_TOPIC: &str = "lifter:events";

/// Subscribed: per-shuttle telemetry snapshot, expected ≈300 ms cadence.
pub fn shuttle_information_topic(shuttle_id: &ShuttleId) -> String {
    format!("shuttle/information/{shuttle_id}")
}

/// Published: missions and commands for one shuttle.
pub fn shuttle_handle_topic(shuttle_id: &ShuttleId) -> String {
    format!("shuttle/handle/{shuttle_id}")
}

/// Published: "go to this floor" commands for one lifter. Not named in the
/// external interface table, which documents shuttle-facing topics only;
/// inferred by analogy to `shuttle_handle_topic` to carry the lifter-summon
/// side of §4.5 step 5 / the `ARRIVED_AT_LIFTER` handler in §4.9.
pub fn lifter_handle_topic(lifter_id: &str) -> String {
    format!("lifter/handle/{lifter_id}")
}

#[cfg(test)]
#[path = "topics_tests.rs"]
mod tests;
