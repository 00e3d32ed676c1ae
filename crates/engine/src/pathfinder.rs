// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traffic-Aware A* (§4.4, Pillar 2): single-floor shortest path, costed by
//! congestion on other shuttles' active paths and by traffic corridors
//! (§4.3), with a `hasBox`-aware traversability rule and a second-chance
//! retry that drops the avoid set if the first pass can't find a way
//! through.

use crate::error::{EngineError, EngineResult};
use crate::traffic::TrafficSnapshot;
use sf_adapters::CatalogGateway;
use sf_core::{Action, Cell, Direction, FloorId, PathStep};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A computed path, not yet wrapped in mission metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PathfinderOutcome {
    pub qrs: Vec<String>,
    pub steps: Vec<PathStep>,
}

const MAX_RECONSTRUCTION_STEPS: usize = 1000;

/// Finds a path from `start_qr` to `goal_qr` on `floor_id`. `final_action` is
/// stamped on the last step only (§4.4 "only the last step carries a
/// non-NO_ACTION value, determined by caller"). `avoid` overrides the default
/// obstacle set (the current node-occupation snapshot minus start and goal);
/// on failure, a second pass is attempted with no avoid set at all.
pub async fn find_path(
    catalog: &dyn CatalogGateway,
    floor_id: &FloorId,
    start_qr: &str,
    goal_qr: &str,
    is_carrying: bool,
    final_action: Action,
    avoid: Option<&HashSet<String>>,
    traffic: &TrafficSnapshot,
) -> EngineResult<PathfinderOutcome> {
    if start_qr == goal_qr {
        return Ok(PathfinderOutcome {
            qrs: vec![start_qr.to_string()],
            steps: vec![PathStep { qr_index: 0, direction: Direction::Up, action: final_action }],
        });
    }

    let default_avoid: HashSet<String> = if avoid.is_some() {
        HashSet::new()
    } else {
        traffic
            .occupied
            .keys()
            .filter(|qr| qr.as_str() != start_qr && qr.as_str() != goal_qr)
            .cloned()
            .collect()
    };
    let effective_avoid = avoid.unwrap_or(&default_avoid);

    match search(catalog, floor_id, start_qr, goal_qr, is_carrying, final_action, effective_avoid, traffic).await {
        Ok(outcome) => Ok(outcome),
        Err(EngineError::NoPathFound { .. }) if !effective_avoid.is_empty() => {
            search(catalog, floor_id, start_qr, goal_qr, is_carrying, final_action, &HashSet::new(), traffic).await
        }
        Err(other) => Err(other),
    }
}

#[allow(clippy::too_many_arguments)]
async fn search(
    catalog: &dyn CatalogGateway,
    floor_id: &FloorId,
    start_qr: &str,
    goal_qr: &str,
    is_carrying: bool,
    final_action: Action,
    avoid: &HashSet<String>,
    traffic: &TrafficSnapshot,
) -> EngineResult<PathfinderOutcome> {
    let goal_cell = catalog.cell(floor_id, goal_qr).await?;

    let mut g_score: HashMap<String, i64> = HashMap::new();
    let mut came_from: HashMap<String, (String, Direction)> = HashMap::new();
    let mut open = BinaryHeap::new();

    g_score.insert(start_qr.to_string(), 0);
    open.push(Reverse((0i64, start_qr.to_string())));

    let mut goal_reached = false;
    while let Some(Reverse((_, current))) = open.pop() {
        if current == goal_qr {
            goal_reached = true;
            break;
        }
        let current_g = *g_score.get(&current).unwrap_or(&i64::MAX);

        for (direction, neighbour) in catalog.neighbours(floor_id, &current).await? {
            if neighbour.qr != goal_qr {
                if avoid.contains(&neighbour.qr) {
                    continue;
                }
                if is_carrying && neighbour.has_box {
                    continue;
                }
            }

            let tentative_g = current_g + move_cost(direction, &neighbour.qr, traffic, is_carrying);
            let best = g_score.get(&neighbour.qr).copied().unwrap_or(i64::MAX);
            if tentative_g < best {
                g_score.insert(neighbour.qr.clone(), tentative_g);
                came_from.insert(neighbour.qr.clone(), (current.clone(), direction));
                let priority = tentative_g + manhattan(&neighbour, &goal_cell);
                open.push(Reverse((priority, neighbour.qr.clone())));
            }
        }
    }

    if !goal_reached {
        return Err(EngineError::NoPathFound {
            from: start_qr.to_string(),
            to: goal_qr.to_string(),
            floor_id: floor_id.to_string(),
        });
    }

    reconstruct(start_qr, goal_qr, &came_from, final_action)
}

fn manhattan(a: &Cell, b: &Cell) -> i64 {
    ((a.col - b.col).abs() + (a.row - b.row).abs()) as i64
}

/// §4.4 cost table: congestion from other shuttles' active paths, plus
/// corridor penalties, summed onto the base move cost of 1.
fn move_cost(intended: Direction, neighbour_qr: &str, traffic: &TrafficSnapshot, is_carrying: bool) -> i64 {
    let mut penalty = 0i64;

    for (other_direction, other_carries) in traffic.travellers_at(neighbour_qr) {
        penalty += if intended.is_opposite(other_direction) {
            (150 + if other_carries { 50 } else { 0 } + if !is_carrying && other_carries { 30 } else { 0 }).min(230)
        } else if intended.is_same(other_direction) {
            if is_carrying { 8 } else { 5 }
        } else {
            (15 + if other_carries { 10 } else { 0 }).min(25)
        };
    }

    if let Some(corridor) = traffic.corridor_at(neighbour_qr) {
        penalty += if intended.is_opposite(corridor.dominant_direction) {
            if corridor.is_high_traffic { 250 } else { 180 }
        } else if intended.is_same(corridor.dominant_direction) {
            if corridor.is_high_traffic { 25 } else { 12 }
        } else if corridor.is_high_traffic {
            60
        } else {
            35
        };
    }

    1 + penalty
}

/// Walks `came_from` backward from `goal_qr` to `start_qr`, detecting cycles
/// via a seen-set and an iteration cap, and assembles the forward step list
/// per the wire indexing convention: `qr_index` equals the node's position,
/// and each step's `direction` is the edge direction used to *enter* that
/// node, except the last edge direction is repeated onto the final step.
fn reconstruct(
    start_qr: &str,
    goal_qr: &str,
    came_from: &HashMap<String, (String, Direction)>,
    final_action: Action,
) -> EngineResult<PathfinderOutcome> {
    let mut qrs_rev = vec![goal_qr.to_string()];
    let mut edges_rev = Vec::new();
    let mut seen = HashSet::new();
    seen.insert(goal_qr.to_string());

    let mut current = goal_qr.to_string();
    let mut iterations = 0usize;
    while current != start_qr {
        iterations += 1;
        if iterations > MAX_RECONSTRUCTION_STEPS {
            return Err(EngineError::PathReconstructionError);
        }
        let Some((prev, direction)) = came_from.get(&current) else {
            return Err(EngineError::PathReconstructionError);
        };
        if !seen.insert(prev.clone()) {
            return Err(EngineError::PathReconstructionError);
        }
        edges_rev.push(*direction);
        qrs_rev.push(prev.clone());
        current = prev.clone();
    }

    qrs_rev.reverse();
    edges_rev.reverse();

    let edges_len = edges_rev.len();
    let steps = (0..qrs_rev.len())
        .map(|i| PathStep {
            qr_index: i,
            direction: edges_rev[i.min(edges_len.saturating_sub(1))],
            action: if i == qrs_rev.len() - 1 { final_action } else { Action::NoAction },
        })
        .collect();

    Ok(PathfinderOutcome { qrs: qrs_rev, steps })
}

#[cfg(test)]
#[path = "pathfinder_tests.rs"]
mod tests;
