// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for this crate's own module tests.

#![cfg(test)]

use crate::config::DaemonConfig;
use crate::state::AppState;
use sf_adapters::{CatalogGateway, FakeLifterCommander, FakeShuttleBus, InMemoryCatalog, LifterCommander, ShuttleBus};
use sf_config::{LifterConfig, RackConfig};
use sf_core::FakeClock;
use sf_storage::{InMemoryKvStore, KvStore};
use std::path::PathBuf;
use std::sync::Arc;

pub fn test_config() -> DaemonConfig {
    DaemonConfig {
        http_port: 0,
        kv_url: "redis://127.0.0.1:6379".to_string(),
        broker_url: "mqtt://127.0.0.1:1883".to_string(),
        broker_username: None,
        broker_password: None,
        lifter_poll_ms: 750,
        shuttle_liveness_ms: 10_000,
        drain_timeout_ms: 5_000,
        rack_config_path: PathBuf::from("config/racks.toml"),
        lifter_config_path: PathBuf::from("config/lifters.toml"),
    }
}

/// A daemon `AppState` wired entirely over in-memory fakes, plus typed
/// handles to those fakes for assertions.
pub struct TestApp {
    pub state: AppState,
    pub catalog: Arc<InMemoryCatalog>,
    pub shuttle_bus: Arc<FakeShuttleBus>,
    pub lifter_commander: Arc<FakeLifterCommander>,
    pub clock: FakeClock,
}

impl TestApp {
    pub fn new(config: DaemonConfig) -> Self {
        Self::with_lifter_config(config, LifterConfig::default())
    }

    pub fn with_lifter_config(config: DaemonConfig, lifter_config: LifterConfig) -> Self {
        let clock = FakeClock::new();
        let kv: Arc<dyn KvStore> = Arc::new(InMemoryKvStore::new(clock.clone()));
        let catalog = Arc::new(InMemoryCatalog::new());
        let shuttle_bus = Arc::new(FakeShuttleBus::new());
        let lifter_commander = Arc::new(FakeLifterCommander::new());

        let state = AppState::build(
            config,
            kv,
            catalog.clone() as Arc<dyn CatalogGateway>,
            shuttle_bus.clone() as Arc<dyn ShuttleBus>,
            lifter_commander.clone() as Arc<dyn LifterCommander>,
            RackConfig::default(),
            lifter_config,
        );

        Self { state, catalog, shuttle_bus, lifter_commander, clock }
    }

    /// Overwrites the fixture's lifter configuration with a single lifter
    /// serving one floor, for the same reason as [`Self::seed_rack`].
    pub fn seed_lifter(&mut self, lifter_id: &str, floor_id: &str, qr: &str) {
        let toml_src = format!(
            "[[lifters]]\nlifter_id = \"{lifter_id}\"\n[lifters.floor_nodes]\n\"{floor_id}\" = \"{qr}\"\n"
        );
        let lifter_config: LifterConfig = toml::from_str(&toml_src).expect("parse lifter config fixture");
        self.state.lifter_config = Arc::new(lifter_config);
    }

    /// Overwrites the fixture's rack configuration with a single rack
    /// entry, since `RackConfig` has no incremental builder of its own
    /// (§7: loaded once at startup and treated as immutable thereafter).
    pub fn seed_rack(&mut self, rack_id: &str, pickup_node_qr: &str) {
        let toml_src = format!(
            "[{rack_id}]\npickup_node_qr = \"{pickup_node_qr}\"\nsafety_node_exit = \"{pickup_node_qr}\"\n"
        );
        let rack_config: RackConfig = toml::from_str(&toml_src).expect("parse rack config fixture");
        self.state.rack_config = Arc::new(rack_config);
    }
}
