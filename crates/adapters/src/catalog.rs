// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Catalog Gateway (§2 component 1): read-only adapter over cells, rows,
//! floors, direction constraints, and QR↔coordinate mapping. The relational
//! store backing a production implementation is out of scope (§1) — this
//! crate only defines the port and an in-memory reference implementation
//! used by tests and single-process deployments seeded from `sf-config`.

use async_trait::async_trait;
use sf_core::{Cell, Direction, Floor, FloorId, RackId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no cell found for qr {qr} on floor {floor_id}")]
    CellNotFound { qr: String, floor_id: FloorId },

    #[error("no lifter cell configured for floor {0}")]
    NoLifterOnFloor(FloorId),

    #[error("unknown rack {0}")]
    UnknownRack(RackId),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-only view over the warehouse's physical layout (§4.4 Pathfinder
/// graph, §4.5 Mission Coordinator lifter lookup, §4.6 row queries).
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn cell(&self, floor_id: &FloorId, qr: &str) -> CatalogResult<Cell>;

    /// Traversable 4-neighbours of `qr`, respecting `directionType` on both
    /// ends of the edge (§4.4 graph construction rule (a) and (b)).
    async fn neighbours(&self, floor_id: &FloorId, qr: &str) -> CatalogResult<Vec<(Direction, Cell)>>;

    /// Cells of `pallet_type` on `floor_id` available for storage, optionally
    /// restricted to `row`, ordered FIFO by floor order then row then column
    /// (§4.6 step 3).
    async fn available_cells(
        &self,
        floor_id: &FloorId,
        pallet_type: &str,
        row: Option<i32>,
    ) -> CatalogResult<Vec<Cell>>;

    /// The designated lifter cell on a floor (§4.5 step 3).
    async fn lifter_cell(&self, floor_id: &FloorId) -> CatalogResult<Cell>;

    async fn is_lifter_qr(&self, floor_id: &FloorId, qr: &str) -> CatalogResult<bool> {
        Ok(self.lifter_cell(floor_id).await.map(|c| c.qr == qr).unwrap_or(false))
    }

    /// Floors owned by `rack_id`, ascending by `floor_order`.
    async fn floors(&self, rack_id: &RackId) -> CatalogResult<Vec<Floor>>;

    /// Marks a cell's `has_box`/`pallet_id` on task completion (§4.9
    /// `TASK_COMPLETE`: "mark endpoint cell `hasBox=true` with palletId").
    async fn mark_has_box(
        &self,
        floor_id: &FloorId,
        qr: &str,
        pallet_id: Option<&str>,
    ) -> CatalogResult<()>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// In-memory `CatalogGateway` seeded directly with `Cell`/`Floor`
    /// records — the reference adapter used by engine/daemon tests and by
    /// single-process deployments that have no external catalog service.
    pub struct InMemoryCatalog {
        cells: Mutex<HashMap<(FloorId, String), Cell>>,
        floors: Mutex<HashMap<RackId, Vec<Floor>>>,
        lifters: Mutex<HashMap<FloorId, String>>,
    }

    impl InMemoryCatalog {
        pub fn new() -> Self {
            Self {
                cells: Mutex::new(HashMap::new()),
                floors: Mutex::new(HashMap::new()),
                lifters: Mutex::new(HashMap::new()),
            }
        }

        pub fn insert_cell(&self, cell: Cell) {
            self.cells.lock().insert((cell.floor_id, cell.qr.clone()), cell);
        }

        pub fn insert_floor(&self, floor: Floor) {
            self.floors.lock().entry(floor.rack_id).or_default().push(floor);
        }

        pub fn set_lifter(&self, floor_id: FloorId, qr: &str) {
            self.lifters.lock().insert(floor_id, qr.to_string());
        }
    }

    impl Default for InMemoryCatalog {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CatalogGateway for InMemoryCatalog {
        async fn cell(&self, floor_id: &FloorId, qr: &str) -> CatalogResult<Cell> {
            self.cells
                .lock()
                .get(&(*floor_id, qr.to_string()))
                .cloned()
                .ok_or_else(|| CatalogError::CellNotFound { qr: qr.to_string(), floor_id: *floor_id })
        }

        async fn neighbours(
            &self,
            floor_id: &FloorId,
            qr: &str,
        ) -> CatalogResult<Vec<(Direction, Cell)>> {
            let origin = self.cell(floor_id, qr).await?;
            let cells = self.cells.lock();
            let mut out = Vec::new();
            for direction in Direction::ALL {
                if !origin.direction_type.allows(direction) {
                    continue;
                }
                let (dc, dr) = direction.delta();
                let neighbour_pos = (origin.col + dc, origin.row + dr);
                let Some(neighbour) = cells
                    .values()
                    .find(|c| c.floor_id == *floor_id && (c.col, c.row) == neighbour_pos)
                else {
                    continue;
                };
                if !neighbour.direction_type.allows(direction.reverse()) {
                    continue;
                }
                if !neighbour.is_traversable() {
                    continue;
                }
                out.push((direction, neighbour.clone()));
            }
            Ok(out)
        }

        async fn available_cells(
            &self,
            floor_id: &FloorId,
            pallet_type: &str,
            row: Option<i32>,
        ) -> CatalogResult<Vec<Cell>> {
            let cells = self.cells.lock();
            let mut matches: Vec<Cell> = cells
                .values()
                .filter(|c| c.floor_id == *floor_id)
                .filter(|c| c.cell_type == sf_core::CellType::Storage)
                .filter(|c| !c.is_blocked && !c.has_box)
                .filter(|c| c.pallet_type_compat.as_deref().is_none_or(|t| t == pallet_type))
                .filter(|c| row.is_none_or(|r| c.row == r))
                .cloned()
                .collect();
            matches.sort_by_key(|c| (c.row, c.col));
            Ok(matches)
        }

        async fn lifter_cell(&self, floor_id: &FloorId) -> CatalogResult<Cell> {
            let qr = self
                .lifters
                .lock()
                .get(floor_id)
                .cloned()
                .ok_or_else(|| CatalogError::NoLifterOnFloor(*floor_id))?;
            self.cell(floor_id, &qr).await
        }

        async fn floors(&self, rack_id: &RackId) -> CatalogResult<Vec<Floor>> {
            let mut floors = self
                .floors
                .lock()
                .get(rack_id)
                .cloned()
                .ok_or(CatalogError::UnknownRack(*rack_id))?;
            floors.sort_by_key(|f| f.floor_order);
            Ok(floors)
        }

        async fn mark_has_box(
            &self,
            floor_id: &FloorId,
            qr: &str,
            pallet_id: Option<&str>,
        ) -> CatalogResult<()> {
            let mut cells = self.cells.lock();
            let cell = cells
                .get_mut(&(*floor_id, qr.to_string()))
                .ok_or_else(|| CatalogError::CellNotFound { qr: qr.to_string(), floor_id: *floor_id })?;
            cell.has_box = pallet_id.is_some();
            cell.pallet_id = pallet_id.map(|s| s.to_string());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::InMemoryCatalog;

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
