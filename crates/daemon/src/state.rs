// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The composition root: one `AppState` wiring the keyed store, the
//! catalog, the two buses, and every stateful service built on top of
//! them, shared by every background loop and the HTTP surface via `Arc`.

use crate::config::DaemonConfig;
use crate::error::DaemonResult;
use sf_adapters::{CatalogGateway, InMemoryCatalog, LifterCommander, MqttLifterCommander, MqttShuttleBus, ShuttleBus};
use sf_config::{LifterConfig, RackConfig};
use sf_core::SystemClock;
use sf_engine::{MissionCoordinator, StorageTrafficSnapshotProvider, TrafficSnapshotProvider};
use sf_storage::{
    BatchStore, ConflictMetrics, KvStore, LifterStateCache, NodeOccupationMap, PathCache, RedisKvStore,
    ReservationService, RowDirectionManager, ShuttleStateCache, TaskStore, WaitRegistry,
};
use std::sync::Arc;

pub struct AppState {
    pub config: DaemonConfig,
    pub clock: SystemClock,

    pub kv: Arc<dyn KvStore>,
    pub catalog: Arc<dyn CatalogGateway>,
    pub shuttle_bus: Arc<dyn ShuttleBus>,
    pub lifter_commander: Arc<dyn LifterCommander>,

    pub rack_config: Arc<RackConfig>,
    pub lifter_config: Arc<LifterConfig>,

    pub reservations: Arc<ReservationService>,
    pub occupation: Arc<NodeOccupationMap>,
    pub shuttle_cache: Arc<ShuttleStateCache>,
    pub lifter_cache: Arc<LifterStateCache>,
    pub path_cache: Arc<PathCache>,
    pub wait_registry: Arc<WaitRegistry>,
    pub task_store: Arc<TaskStore>,
    pub batch_store: Arc<BatchStore>,
    pub row_directions: Arc<RowDirectionManager>,
    pub conflict_metrics: Arc<ConflictMetrics>,
    pub traffic: Arc<dyn TrafficSnapshotProvider>,

    pub mission_coordinator: Arc<MissionCoordinator<SystemClock>>,
}

impl AppState {
    /// Connects every backing service and returns the shared state alongside
    /// a raw MQTT client handle and `EventLoop`. The caller (`run`) hands
    /// both to `event_listener::spawn`, which subscribes and is the sole
    /// task allowed to poll the loop — `rumqttc` requires exactly one poller
    /// per client, and that poller is also where inbound subscriptions are
    /// dispatched (§4.9).
    pub async fn connect(
        config: DaemonConfig,
    ) -> DaemonResult<(Arc<Self>, rumqttc::AsyncClient, rumqttc::EventLoop)> {
        let rack_config = RackConfig::load(&config.rack_config_path)?;
        let lifter_config = LifterConfig::load(&config.lifter_config_path)?;

        let kv: Arc<dyn KvStore> = Arc::new(RedisKvStore::connect(&config.kv_url).await?);

        let mqtt_options = mqtt_options(&config);
        let (mqtt_client, mqtt_eventloop) = rumqttc::AsyncClient::new(mqtt_options, 64);

        let shuttle_bus: Arc<dyn ShuttleBus> = Arc::new(MqttShuttleBus::new(mqtt_client.clone()));
        let lifter_commander: Arc<dyn LifterCommander> = Arc::new(MqttLifterCommander::new(mqtt_client.clone()));

        // §1: the relational catalog store backing a production layout
        // service is out of scope. `InMemoryCatalog` is the only adapter
        // this repo ships; a real deployment seeds it (or replaces this
        // `Arc<dyn CatalogGateway>`) from whatever warehouse layout system
        // of record it has.
        let catalog: Arc<dyn CatalogGateway> = Arc::new(InMemoryCatalog::new());

        let state =
            Arc::new(Self::build(config, kv, catalog, shuttle_bus, lifter_commander, rack_config, lifter_config));
        Ok((state, mqtt_client, mqtt_eventloop))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn build(
        config: DaemonConfig,
        kv: Arc<dyn KvStore>,
        catalog: Arc<dyn CatalogGateway>,
        shuttle_bus: Arc<dyn ShuttleBus>,
        lifter_commander: Arc<dyn LifterCommander>,
        rack_config: RackConfig,
        lifter_config: LifterConfig,
    ) -> Self {
        let rack_config = Arc::new(rack_config);
        let lifter_config = Arc::new(lifter_config);

        let reservations = Arc::new(ReservationService::new(kv.clone()));
        let occupation = Arc::new(NodeOccupationMap::new(kv.clone()));
        let shuttle_cache = Arc::new(ShuttleStateCache::new(kv.clone()));
        let lifter_cache = Arc::new(LifterStateCache::new(kv.clone()));
        let path_cache = Arc::new(PathCache::new(kv.clone()));
        let wait_registry = Arc::new(WaitRegistry::new(kv.clone()));
        let task_store = Arc::new(TaskStore::new(kv.clone()));
        let batch_store = Arc::new(BatchStore::new(kv.clone()));
        let row_directions = Arc::new(RowDirectionManager::new(kv.clone()));
        let conflict_metrics = Arc::new(ConflictMetrics::new(kv.clone()));
        let traffic: Arc<dyn TrafficSnapshotProvider> =
            Arc::new(StorageTrafficSnapshotProvider::new(occupation.clone(), path_cache.clone()));

        let mission_coordinator = Arc::new(MissionCoordinator::new(
            catalog.clone(),
            lifter_config.clone(),
            lifter_cache.clone(),
            lifter_commander.clone(),
            traffic.clone(),
            path_cache.clone(),
            wait_registry.clone(),
            shuttle_cache.clone(),
            SystemClock,
        ));

        Self {
            config,
            clock: SystemClock,
            kv,
            catalog,
            shuttle_bus,
            lifter_commander,
            rack_config,
            lifter_config,
            reservations,
            occupation,
            shuttle_cache,
            lifter_cache,
            path_cache,
            wait_registry,
            task_store,
            batch_store,
            row_directions,
            conflict_metrics,
            traffic,
            mission_coordinator,
        }
    }
}

fn mqtt_options(config: &DaemonConfig) -> rumqttc::MqttOptions {
    let url = config.broker_url.trim_start_matches("mqtt://").trim_start_matches("mqtts://");
    let (host, port) = url.split_once(':').unwrap_or((url, "1883"));
    let mut options =
        rumqttc::MqttOptions::new(format!("sfd-{}", nanoid::nanoid!(8)), host, port.parse().unwrap_or(1883));
    options.set_keep_alive(std::time::Duration::from_secs(15));
    if let (Some(user), Some(pass)) = (&config.broker_username, &config.broker_password) {
        options.set_credentials(user, pass);
    }
    options
}
