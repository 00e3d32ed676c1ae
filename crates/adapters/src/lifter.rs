// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifter Commander: the publish side of the lifter command channel (§4.5
//! step 5 "asynchronously command it to the boarding floor", §4.9
//! `ARRIVED_AT_LIFTER`). No lifter command topic is named in §6's external
//! interface table, which documents shuttle-facing topics only; the topic
//! here (`lifter/handle/{lifterId}`) is inferred by analogy to the shuttle
//! command channel.

use async_trait::async_trait;
use sf_wire::lifter_handle_topic;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifterBusError {
    #[error("publish failed: {0}")]
    PublishFailed(String),
}

pub type LifterBusResult<T> = Result<T, LifterBusError>;

/// Publish side of the lifter command channel.
#[async_trait]
pub trait LifterCommander: Send + Sync + 'static {
    async fn command_to_floor(&self, lifter_id: &str, floor_id: &str) -> LifterBusResult<()>;
}

/// `rumqttc`-backed `LifterCommander`, mirroring `MqttShuttleBus`'s QoS and
/// publish shape.
pub struct MqttLifterCommander {
    client: rumqttc::AsyncClient,
}

impl MqttLifterCommander {
    pub fn new(client: rumqttc::AsyncClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LifterCommander for MqttLifterCommander {
    async fn command_to_floor(&self, lifter_id: &str, floor_id: &str) -> LifterBusResult<()> {
        let payload = serde_json::json!({ "floor_id": floor_id }).to_string();
        self.client
            .publish(lifter_handle_topic(lifter_id), rumqttc::QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| LifterBusError::PublishFailed(e.to_string()))
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedLifterCommand {
        pub lifter_id: String,
        pub floor_id: String,
    }

    #[derive(Default)]
    pub struct FakeLifterCommander {
        calls: Mutex<Vec<RecordedLifterCommand>>,
    }

    impl FakeLifterCommander {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<RecordedLifterCommand> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl LifterCommander for FakeLifterCommander {
        async fn command_to_floor(&self, lifter_id: &str, floor_id: &str) -> LifterBusResult<()> {
            self.calls.lock().push(RecordedLifterCommand {
                lifter_id: lifter_id.to_string(),
                floor_id: floor_id.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLifterCommander, RecordedLifterCommand};

#[cfg(test)]
#[path = "lifter_tests.rs"]
mod tests;
