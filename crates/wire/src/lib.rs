// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sf-wire: the JSON shapes exchanged over the bus and HTTP surface (§6
//! External Interfaces).
//!
//! `sf-core` holds the structured domain form of missions and events; this
//! crate holds the wire-level encodings of that form — the dynamic
//! `step1..stepN` mission payload, the bus command/topic vocabulary, and the
//! HTTP ingestion request/response bodies — plus `encode`/`decode` helpers
//! shared by every adapter that crosses a process boundary.

pub mod error;
pub mod http;
pub mod lifter_event;
pub mod mission;
pub mod topics;

pub use error::{decode, encode, WireError, WireResult};
pub use lifter_event::LifterEvent;
pub use mission::{encode_step, MissionMetaPayload, MissionPayload, ShuttleCommand};
pub use topics::{
    lifter_handle_topic, shuttle_handle_topic, shuttle_information_topic, LIFTER_EVENTS_TOPIC,
    SHUTTLE_EVENTS_TOPIC,
};

/// The shuttle semantic-event algebra (`shuttle/events`, §4.9) is defined in
/// `sf-core` since the daemon's task state machine operates on it directly;
/// re-exported here so bus adapters only need to depend on `sf-wire`.
pub use sf_core::Event as ShuttleEvent;
