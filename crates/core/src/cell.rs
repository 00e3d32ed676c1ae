// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only catalog data model (§3 `Cell`, `Floor`/`Rack`).
//!
//! These types are owned by the core crate because every component in the
//! workspace references them, but the records themselves are queried
//! through the Catalog Gateway port (`sf-adapters`) — the relational store
//! backing them is out of scope (§1).

use crate::direction::DirectionSet;
use crate::ids::{FloorId, RackId};
use serde::{Deserialize, Serialize};

/// Kind of cell in the rack grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Storage,
    Pickup,
    Lifter,
    Aisle,
}

/// A single addressable position in a rack (§3 `Cell`).
///
/// Uniqueness: `(qr, floor_id)` is unique; `(col, row, floor_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    pub qr: String,
    pub name: String,
    pub col: i32,
    pub row: i32,
    pub floor_id: FloorId,
    pub rack_id: RackId,
    pub cell_type: CellType,
    pub direction_type: DirectionSet,
    pub is_blocked: bool,
    pub has_box: bool,
    pub pallet_id: Option<String>,
    pub pallet_type_compat: Option<String>,
}

impl Cell {
    pub fn is_traversable(&self) -> bool {
        !self.is_blocked
    }
}

/// A floor within a rack, with its position in the rack's vertical ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub floor_id: FloorId,
    pub rack_id: RackId,
    pub floor_order: i32,
    pub name: String,
}

/// A rack, owning an ordered list of floors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    pub rack_id: RackId,
    pub name: String,
    pub floors: Vec<Floor>,
}

impl Rack {
    /// Floors in ascending `floor_order`.
    pub fn ordered_floors(&self) -> Vec<&Floor> {
        let mut floors: Vec<&Floor> = self.floors.iter().collect();
        floors.sort_by_key(|f| f.floor_order);
        floors
    }
}

#[cfg(test)]
#[path = "cell_tests.rs"]
mod tests;
