// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sf-storage: the keyed distributed store port and every component built
//! directly on top of it (§2 components 2-6, §4.1-4.3, §4.11, and the
//! staging/task/batch/wait/metrics stores implied by §4.6-4.10 and the §7
//! key layout).
//!
//! Every stateful service here is constructed from an `Arc<dyn KvStore>` and
//! holds no other state — the real backend ([`RedisKvStore`]) or the
//! in-memory fake ([`InMemoryKvStore`]) is chosen once at the composition
//! root.

pub mod kv;
pub mod memory;
pub mod redis_store;

pub mod batch_store;
pub mod lifter_cache;
pub mod metrics;
pub mod occupation;
pub mod path_cache;
pub mod reservation;
pub mod row_direction;
pub mod shuttle_cache;
pub mod task_store;
pub mod wait_registry;

pub use batch_store::BatchStore;
pub use kv::{KvError, KvResult, KvStore};
pub use lifter_cache::LifterStateCache;
pub use memory::InMemoryKvStore;
pub use metrics::ConflictMetrics;
pub use occupation::NodeOccupationMap;
pub use path_cache::{detect_traffic_flow_corridors, Corridor, PathCache};
pub use redis_store::RedisKvStore;
pub use reservation::ReservationService;
pub use row_direction::RowDirectionManager;
pub use shuttle_cache::ShuttleStateCache;
pub use task_store::TaskStore;
pub use wait_registry::{ShuttleWaitState, WaitRegistry};
