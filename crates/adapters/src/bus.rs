// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shuttle Bus (§1 "communicate with shuttles via a publish/subscribe bus",
//! §6 `shuttle/handle/{shuttleId}`): the publish side of the MQTT-shaped
//! command channel. Subscriptions (`shuttle/events`, `lifter:events`,
//! `shuttle/information/{id}`) are a stream-processing concern owned by the
//! daemon's event-consumer loops, not this port — see `sf-daemon`.

use async_trait::async_trait;
use sf_core::ShuttleId;
use sf_wire::{encode, shuttle_handle_topic, MissionPayload, ShuttleCommand, WireError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("failed to encode outgoing payload")]
    Encode(#[source] WireError),

    #[error("publish failed: {0}")]
    PublishFailed(String),
}

pub type BusResult<T> = Result<T, BusError>;

/// Publish side of the shuttle command bus (§4.5, §4.8, §4.10).
#[async_trait]
pub trait ShuttleBus: Send + Sync + 'static {
    async fn publish_mission(&self, shuttle_id: &ShuttleId, payload: &MissionPayload) -> BusResult<()>;

    async fn publish_command(&self, shuttle_id: &ShuttleId, command: &ShuttleCommand) -> BusResult<()>;
}

/// `rumqttc`-backed `ShuttleBus`. QoS 1 so missions survive a broker
/// reconnect; the daemon's mission-publish retry loop (§5 `RETRY_INTERVAL`)
/// covers the remaining at-least-once gap against a shuttle that never
/// acknowledges.
pub struct MqttShuttleBus {
    client: rumqttc::AsyncClient,
}

impl MqttShuttleBus {
    pub fn new(client: rumqttc::AsyncClient) -> Self {
        Self { client }
    }

    async fn publish(&self, topic: String, payload: Vec<u8>) -> BusResult<()> {
        self.client
            .publish(topic, rumqttc::QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| BusError::PublishFailed(e.to_string()))
    }
}

#[async_trait]
impl ShuttleBus for MqttShuttleBus {
    async fn publish_mission(&self, shuttle_id: &ShuttleId, payload: &MissionPayload) -> BusResult<()> {
        let bytes = encode(payload).map_err(BusError::Encode)?;
        self.publish(shuttle_handle_topic(shuttle_id), bytes).await
    }

    async fn publish_command(&self, shuttle_id: &ShuttleId, command: &ShuttleCommand) -> BusResult<()> {
        let bytes = encode(command).map_err(BusError::Encode)?;
        self.publish(shuttle_handle_topic(shuttle_id), bytes).await
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedPublish {
        Mission { shuttle_id: ShuttleId, payload: serde_json::Value },
        Command { shuttle_id: ShuttleId, command: serde_json::Value },
    }

    /// Records every publish for assertion in daemon/engine tests, mirroring
    /// the call-recording fakes used throughout this crate's adapters.
    #[derive(Default)]
    pub struct FakeShuttleBus {
        calls: Mutex<Vec<RecordedPublish>>,
    }

    impl FakeShuttleBus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<RecordedPublish> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ShuttleBus for FakeShuttleBus {
        async fn publish_mission(&self, shuttle_id: &ShuttleId, payload: &MissionPayload) -> BusResult<()> {
            let value = serde_json::to_value(payload).unwrap_or(serde_json::Value::Null);
            self.calls.lock().push(RecordedPublish::Mission { shuttle_id: *shuttle_id, payload: value });
            Ok(())
        }

        async fn publish_command(&self, shuttle_id: &ShuttleId, command: &ShuttleCommand) -> BusResult<()> {
            let value = serde_json::to_value(command).unwrap_or(serde_json::Value::Null);
            self.calls.lock().push(RecordedPublish::Command { shuttle_id: *shuttle_id, command: value });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeShuttleBus, RecordedPublish};

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
