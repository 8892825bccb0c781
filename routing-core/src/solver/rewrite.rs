//! Pre-solve index rewriting.
//!
//! The engine needs every node reference to be a concrete matrix position and
//! allows a node to participate in at most one pickup-and-delivery pair. Both
//! are repaired here: open-route sentinels materialise as a zero-cost dummy
//! node, and nodes shared between pairs (or between a pair and a route
//! terminal) are duplicated to the back of the matrix, with every parallel
//! option block grown in step and the duplication recorded in the problem's
//! index map.

#[cfg(test)]
#[path = "../../tests/unit/solver/rewrite_test.rs"]
mod rewrite_test;

use crate::models::{DepotConfig, DropPenalties, TimeWindow, OPEN_ROUTE};
use crate::problem::RoutingProblem;
use hashbrown::HashSet;

/// Depot or start/end nodes resolved to concrete post-rewrite positions.
///
/// The model's own `depot_config` keeps its pre-rewrite values on purpose:
/// the constraint binder's skip rules are expressed against the caller's
/// original node references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ResolvedTerminals {
    Depot(usize),
    StartEnd { starts: Vec<usize>, ends: Vec<usize> },
}

/// Rewrites the problem in place and returns the resolved terminals.
pub(crate) fn rewrite(problem: &mut RoutingProblem) -> ResolvedTerminals {
    let mut seen: HashSet<i64> = HashSet::new();

    for position in 0..problem.model.with_pickup_delivery.as_ref().map_or(0, |option| option.pairs.len()) {
        let pair = problem.model.with_pickup_delivery.as_ref().map(|option| option.pairs[position]).expect("pair exists");
        if !seen.insert(pair.pickup) {
            let duplicate = duplicate_to_back(problem, pair.pickup as usize) as i64;
            problem.model.with_pickup_delivery.as_mut().expect("pairs exist").pairs[position].pickup = duplicate;
        }
        if !seen.insert(pair.delivery) {
            let duplicate = duplicate_to_back(problem, pair.delivery as usize) as i64;
            problem.model.with_pickup_delivery.as_mut().expect("pairs exist").pairs[position].delivery = duplicate;
        }
    }

    match problem.model.depot_config.clone() {
        DepotConfig::SingleDepot { depot } => {
            let mut depot = if depot == OPEN_ROUTE { append_dummy_end(problem) } else { depot as usize };
            if seen.contains(&(depot as i64)) {
                depot = duplicate_to_back(problem, depot);
            }
            ResolvedTerminals::Depot(depot)
        }
        DepotConfig::StartEndPair { starts, ends } => {
            let mut starts: Vec<i64> = starts.iter().map(|&node| node as i64).collect();
            let mut ends: Vec<i64> = ends.iter().map(|&node| node as i64).collect();

            if starts.iter().chain(ends.iter()).any(|&node| node == OPEN_ROUTE as i64) {
                let dummy = append_dummy_end(problem) as i64;
                for node in starts.iter_mut().chain(ends.iter_mut()) {
                    if *node == OPEN_ROUTE as i64 {
                        *node = dummy;
                    }
                }
            }

            for start in starts.iter_mut() {
                if seen.contains(start) {
                    *start = duplicate_to_back(problem, *start as usize) as i64;
                }
            }
            for end in ends.iter_mut() {
                if seen.contains(end) {
                    *end = duplicate_to_back(problem, *end as usize) as i64;
                }
            }

            ResolvedTerminals::StartEnd {
                starts: starts.into_iter().map(|node| node as usize).collect(),
                ends: ends.into_iter().map(|node| node as usize).collect(),
            }
        }
    }
}

/// Appends a free node: zero cost to and from everything, neutral entries in
/// every option block. Returns its position.
pub(crate) fn append_dummy_end(problem: &mut RoutingProblem) -> usize {
    let model = &mut problem.model;
    let node_count = model.duration_matrix.len();
    for row in model.duration_matrix.iter_mut() {
        row.push(0);
    }
    model.duration_matrix.push(vec![0; node_count + 1]);

    if let Some(capacity) = model.with_capacity.as_mut() {
        capacity.demands.push(0);
    }
    if let Some(time_windows) = model.with_time_window.as_mut() {
        time_windows.windows.push(vec![TimeWindow { start: 0, end: i64::MAX }]);
    }
    if let Some(service) = model.with_service_time.as_mut() {
        service.service_time.push(0);
    }
    if let Some(DropPenalties::PerNode(penalties)) = model.with_drop_penalties.as_mut() {
        penalties.push(0);
    }

    node_count
}

/// Duplicates node `at` to the back of the matrix and grows every option
/// block with a copy of its entry. The duplicate carries the same demand, so
/// every vehicle capacity is inflated by it: the duplicate stands for the
/// same physical visit and must not make the original plan infeasible.
/// Returns the duplicate's position and records it in the index map.
pub(crate) fn duplicate_to_back(problem: &mut RoutingProblem, at: usize) -> usize {
    let model = &mut problem.model;
    let node_count = model.duration_matrix.len();
    let mut duplicated = model.duration_matrix[at].clone();
    for (row, &value) in model.duration_matrix.iter_mut().zip(duplicated.iter()) {
        row.push(value);
    }
    duplicated.push(0);
    model.duration_matrix.push(duplicated);

    if let Some(capacity) = model.with_capacity.as_mut() {
        let demand = capacity.demands[at];
        capacity.demands.push(demand);
        for vehicle_capacity in capacity.capacities.iter_mut() {
            *vehicle_capacity += demand;
        }
    }
    if let Some(time_windows) = model.with_time_window.as_mut() {
        let windows = time_windows.windows[at].clone();
        time_windows.windows.push(windows);
    }
    if let Some(service) = model.with_service_time.as_mut() {
        let service_time = service.service_time[at];
        service.service_time.push(service_time);
    }
    if let Some(DropPenalties::PerNode(penalties)) = model.with_drop_penalties.as_mut() {
        let penalty = penalties[at];
        penalties.push(penalty);
    }

    problem.index_map.insert(node_count, at);
    node_count
}
