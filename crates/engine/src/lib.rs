// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sf-engine: the two pillars that decide where a shuttle goes next (§4.4
//! Pathfinder, §4.5 Mission Coordinator) and the `TrafficSnapshotProvider`
//! seam that lets both pillars, plus the Conflict Resolver in `sf-daemon`,
//! share one view of the floor's traffic without depending on each other.

pub mod error;
pub mod mission_coordinator;
pub mod pathfinder;
pub mod traffic;

pub use error::{EngineError, EngineResult};
pub use mission_coordinator::{MissionCoordinator, MissionOutcome, SegmentRequest};
pub use pathfinder::{find_path, PathfinderOutcome};
pub use traffic::{StorageTrafficSnapshotProvider, TrafficSnapshot, TrafficSnapshotProvider};
