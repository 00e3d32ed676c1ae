// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sf_adapters::InMemoryCatalog;
use sf_core::{ActivePathEntry, CellType, DirectionSet, FloorId, PathMeta, RackId, ShuttleId};
use sf_storage::detect_traffic_flow_corridors;
use std::collections::HashSet;

fn floor() -> FloorId {
    FloorId::from_string("137")
}

fn rack() -> RackId {
    RackId::from_string("rck-main")
}

fn cell(qr: &str, col: i32, row: i32) -> Cell {
    Cell {
        id: qr.to_string(),
        qr: qr.to_string(),
        name: qr.to_string(),
        col,
        row,
        floor_id: floor(),
        rack_id: rack(),
        cell_type: CellType::Aisle,
        direction_type: DirectionSet::ALL,
        is_blocked: false,
        has_box: false,
        pallet_id: None,
        pallet_type_compat: None,
    }
}

/// A 5-wide single-row corridor: X0..X4, all traversable.
fn straight_line_catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    for i in 0..5 {
        catalog.insert_cell(cell(&format!("X{i}"), i, 0));
    }
    catalog
}

fn empty_traffic() -> TrafficSnapshot {
    TrafficSnapshot::default()
}

#[tokio::test]
async fn finds_a_straight_path_and_stamps_final_action() {
    let catalog = straight_line_catalog();
    let traffic = empty_traffic();
    let outcome = find_path(&catalog, &floor(), "X0", "X4", false, Action::DropOff, None, &traffic)
        .await
        .expect("path");
    assert_eq!(outcome.qrs, vec!["X0", "X1", "X2", "X3", "X4"]);
    assert_eq!(outcome.steps.len(), 5);
    for step in &outcome.steps[..4] {
        assert_eq!(step.action, Action::NoAction);
    }
    assert_eq!(outcome.steps[4].action, Action::DropOff);
    assert!(outcome.steps.iter().all(|s| s.direction == Direction::Right));
}

#[tokio::test]
async fn start_equal_to_goal_is_a_trivial_single_step_path() {
    let catalog = straight_line_catalog();
    let traffic = empty_traffic();
    let outcome = find_path(&catalog, &floor(), "X0", "X0", false, Action::PickUp, None, &traffic)
        .await
        .expect("path");
    assert_eq!(outcome.qrs, vec!["X0"]);
    assert_eq!(outcome.steps, vec![PathStep { qr_index: 0, direction: Direction::Up, action: Action::PickUp }]);
}

#[tokio::test]
async fn blocked_cell_forces_a_detour() {
    let catalog = InMemoryCatalog::new();
    // A 3x2 grid; X1Y0 is blocked, forcing a detour through row 1.
    catalog.insert_cell(cell("X0Y0", 0, 0));
    let mut blocked = cell("X1Y0", 1, 0);
    blocked.is_blocked = true;
    catalog.insert_cell(blocked);
    catalog.insert_cell(cell("X2Y0", 2, 0));
    catalog.insert_cell(cell("X0Y1", 0, 1));
    catalog.insert_cell(cell("X1Y1", 1, 1));
    catalog.insert_cell(cell("X2Y1", 2, 1));

    let traffic = empty_traffic();
    let outcome = find_path(&catalog, &floor(), "X0Y0", "X2Y0", false, Action::StopAtNode, None, &traffic)
        .await
        .expect("path");
    assert!(!outcome.qrs.contains(&"X1Y0".to_string()));
    assert_eq!(outcome.qrs.first(), Some(&"X0Y0".to_string()));
    assert_eq!(outcome.qrs.last(), Some(&"X2Y0".to_string()));
}

#[tokio::test]
async fn carrying_shuttle_cannot_cross_a_has_box_cell_unless_it_is_the_goal() {
    let catalog = InMemoryCatalog::new();
    catalog.insert_cell(cell("X0", 0, 0));
    let mut boxed = cell("X1", 1, 0);
    boxed.has_box = true;
    catalog.insert_cell(boxed);
    catalog.insert_cell(cell("X2", 2, 0));

    let traffic = empty_traffic();
    let blocked_for_carrying =
        find_path(&catalog, &floor(), "X0", "X2", true, Action::DropOff, None, &traffic).await;
    assert!(matches!(blocked_for_carrying, Err(EngineError::NoPathFound { .. })));

    let carrying_to_the_box_cell_itself =
        find_path(&catalog, &floor(), "X0", "X1", true, Action::DropOff, None, &traffic).await;
    assert!(carrying_to_the_box_cell_itself.is_ok());
}

#[tokio::test]
async fn congestion_penalty_makes_pathfinder_prefer_the_unoccupied_row() {
    let catalog = InMemoryCatalog::new();
    catalog.insert_cell(cell("X0Y0", 0, 0));
    catalog.insert_cell(cell("X1Y0", 1, 0));
    catalog.insert_cell(cell("X2Y0", 2, 0));
    catalog.insert_cell(cell("X0Y1", 0, 1));
    catalog.insert_cell(cell("X1Y1", 1, 1));
    catalog.insert_cell(cell("X2Y1", 2, 1));

    // Another shuttle is driving head-on (Left) straight through X1Y0.
    let opposing = ActivePathEntry {
        shuttle_id: ShuttleId::from_string("sht-002"),
        qrs: vec!["X2Y0".to_string(), "X1Y0".to_string(), "X0Y0".to_string()],
        steps: vec![
            PathStep { qr_index: 0, direction: Direction::Left, action: Action::NoAction },
            PathStep { qr_index: 1, direction: Direction::Left, action: Action::NoAction },
            PathStep { qr_index: 2, direction: Direction::Left, action: Action::DropOff },
        ],
        meta: PathMeta {
            task_id: None,
            is_carrying: true,
            priority: 0,
            end_qr: "X0Y0".to_string(),
            end_floor_id: "137".to_string(),
            path_length: 3,
        },
        timestamp_ms: 0,
        ttl_ms: 600_000,
    };
    let traffic = TrafficSnapshot { active_paths: vec![opposing], ..Default::default() };

    let outcome = find_path(&catalog, &floor(), "X0Y0", "X2Y0", false, Action::StopAtNode, None, &traffic)
        .await
        .expect("path");
    assert!(!outcome.qrs.contains(&"X1Y0".to_string()), "should detour around the congested node: {:?}", outcome.qrs);
}

#[tokio::test]
async fn no_path_found_when_fully_surrounded() {
    let catalog = InMemoryCatalog::new();
    catalog.insert_cell(cell("X0", 0, 0));
    catalog.insert_cell(cell("X1", 1, 0));
    let traffic = empty_traffic();
    let err = find_path(&catalog, &floor(), "X0", "X99", false, Action::StopAtNode, None, &traffic)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NoPathFound { .. }));
}

#[tokio::test]
async fn second_chance_pass_ignores_avoid_set_when_first_pass_fails() {
    let catalog = straight_line_catalog();
    let mut avoid = HashSet::new();
    avoid.insert("X1".to_string());
    avoid.insert("X2".to_string());
    avoid.insert("X3".to_string());
    let traffic = empty_traffic();
    // With a 1-wide corridor, avoiding every intermediate node makes the
    // direct route impossible; the second-chance pass (avoid=∅) must still
    // find the straight line.
    let outcome = find_path(&catalog, &floor(), "X0", "X4", false, Action::StopAtNode, Some(&avoid), &traffic)
        .await
        .expect("second chance path");
    assert_eq!(outcome.qrs, vec!["X0", "X1", "X2", "X3", "X4"]);
}

#[test]
fn reconstruction_detects_a_cycle_in_came_from() {
    let mut came_from = HashMap::new();
    came_from.insert("B".to_string(), ("A".to_string(), Direction::Right));
    came_from.insert("A".to_string(), ("B".to_string(), Direction::Left));
    let err = reconstruct("START", "B", &came_from, Action::NoAction).unwrap_err();
    assert!(matches!(err, EngineError::PathReconstructionError));
}

#[tokio::test]
async fn corridor_penalty_from_detect_traffic_flow_corridors_steers_around_opposite_flow() {
    let catalog = InMemoryCatalog::new();
    catalog.insert_cell(cell("X0Y0", 0, 0));
    catalog.insert_cell(cell("X1Y0", 1, 0));
    catalog.insert_cell(cell("X2Y0", 2, 0));
    catalog.insert_cell(cell("X0Y1", 0, 1));
    catalog.insert_cell(cell("X1Y1", 1, 1));
    catalog.insert_cell(cell("X2Y1", 2, 1));

    let make_entry = |shuttle: &str| ActivePathEntry {
        shuttle_id: ShuttleId::from_string(shuttle),
        qrs: vec!["X2Y0".to_string(), "X1Y0".to_string(), "X0Y0".to_string()],
        steps: vec![
            PathStep { qr_index: 0, direction: Direction::Left, action: Action::NoAction },
            PathStep { qr_index: 1, direction: Direction::Left, action: Action::NoAction },
            PathStep { qr_index: 2, direction: Direction::Left, action: Action::DropOff },
        ],
        meta: PathMeta {
            task_id: None,
            is_carrying: false,
            priority: 0,
            end_qr: "X0Y0".to_string(),
            end_floor_id: "137".to_string(),
            path_length: 3,
        },
        timestamp_ms: 0,
        ttl_ms: 600_000,
    };
    let active_paths = vec![make_entry("sht-010"), make_entry("sht-011"), make_entry("sht-012")];
    let corridors = detect_traffic_flow_corridors(&active_paths);
    assert!(corridors.contains_key("X1Y0"));

    let traffic = TrafficSnapshot { active_paths, corridors, ..Default::default() };
    let outcome = find_path(&catalog, &floor(), "X0Y0", "X2Y0", false, Action::StopAtNode, None, &traffic)
        .await
        .expect("path");
    assert!(!outcome.qrs.contains(&"X1Y0".to_string()), "should avoid the high-traffic opposing corridor: {:?}", outcome.qrs);
}
