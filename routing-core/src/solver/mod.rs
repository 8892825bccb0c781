//! Solve orchestration: rewrite the index space, bind the constraints, run
//! the engine and project the assignment back to the caller's nodes.

mod binder;
mod rewrite;

pub(crate) use rewrite::{rewrite, ResolvedTerminals};

use crate::models::{DepotConfig, VehicleRoute, OPEN_ROUTE};
use crate::problem::RoutingProblem;
use std::fmt;

/// Failure of the engine to produce any feasible assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// No assignment satisfied the constraints within the time budget.
    NoSolution,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::NoSolution => write!(f, "no solution found"),
        }
    }
}

impl std::error::Error for SolveError {}

/// Runs the full pipeline on a validated problem.
pub(crate) fn solve(mut problem: RoutingProblem) -> Result<Vec<VehicleRoute>, SolveError> {
    let terminals = rewrite(&mut problem);
    let outcome = binder::bind_and_solve(&problem, &terminals)?;
    Ok(project(&problem, &outcome))
}

/// Walks every used vehicle's `next` chain, maps rewritten nodes back to the
/// originals and trims the endpoints that stand in for open routes.
fn project(problem: &RoutingProblem, outcome: &binder::SolveOutcome) -> Vec<VehicleRoute> {
    let model = problem.model();
    let engine = &outcome.engine;
    let assignment = &outcome.assignment;
    let num_vehicles = model.num_vehicles as usize;

    let mut responses = vec![VehicleRoute::default(); num_vehicles];
    for (vehicle, response) in responses.iter_mut().enumerate() {
        if !engine.is_vehicle_used(assignment, vehicle) {
            continue;
        }
        let mut route = vec![];
        let mut index = engine.start(vehicle);
        loop {
            let node = engine.manager().index_to_node(index);
            let original = problem.index_map.get(&node).copied().unwrap_or(node);
            route.push(original as i32);
            if engine.is_end(index) {
                break;
            }
            index = assignment.next(index);
        }
        let total_duration = assignment.cumul_value(engine.cumul_var(outcome.time, index));

        match &model.depot_config {
            DepotConfig::SingleDepot { depot } if *depot == OPEN_ROUTE => {
                route.pop();
                route.remove(0);
            }
            DepotConfig::StartEndPair { starts, ends } => {
                if starts[vehicle] == OPEN_ROUTE {
                    route.remove(0);
                }
                if ends[vehicle] == OPEN_ROUTE {
                    route.pop();
                }
            }
            _ => {}
        }

        *response = VehicleRoute { route, total_duration };
    }
    responses
}
