//! Translation of the rewritten problem into engine concepts.

use crate::models::{DepotConfig, DropPenalties, PickupDropPolicy, RoutingModel as Model, TimeWindow, OPEN_ROUTE};
use crate::problem::RoutingProblem;
use crate::solver::{ResolvedTerminals, SolveError};
use routing_engine::{
    Assignment, BreakInterval, CumulVar, DimensionId, FirstSolutionStrategy, LocalSearchMetaheuristic,
    PickupDeliveryPolicy, RoutingIndexManager, RoutingModel, RoutingSearchParameters,
};
use std::time::Duration;

/// Everything the projector needs once the engine has run.
pub(crate) struct SolveOutcome {
    pub(crate) engine: RoutingModel,
    pub(crate) time: DimensionId,
    pub(crate) assignment: Assignment,
}

/// Binds every option block to the engine and runs the search.
pub(crate) fn bind_and_solve(problem: &RoutingProblem, terminals: &ResolvedTerminals) -> Result<SolveOutcome, SolveError> {
    let model = problem.model();
    let node_count = model.node_count();
    let num_vehicles = model.num_vehicles as usize;

    let manager = match terminals {
        ResolvedTerminals::Depot(depot) => RoutingIndexManager::new_single_depot(node_count, num_vehicles, *depot),
        ResolvedTerminals::StartEnd { starts, ends } => {
            RoutingIndexManager::new_start_end(node_count, num_vehicles, starts.clone(), ends.clone())
        }
    };
    let mut engine = RoutingModel::new(manager.clone());

    let matrix = model.duration_matrix.clone();
    let service_time = model.with_service_time.as_ref().map(|option| option.service_time.clone());
    let transit_manager = manager.clone();
    let transit = engine.register_transit_callback(move |from_index, to_index| {
        let from = transit_manager.index_to_node(from_index);
        let to = transit_manager.index_to_node(to_index);
        let service = service_time.as_ref().map_or(0, |service_time| service_time[from]);
        matrix[from][to] + service
    });
    engine.set_arc_cost_evaluator_of_all_vehicles(transit);

    let time = engine.add_dimension(
        transit,
        max_break_length(model),
        time_capacity(model),
        model.with_time_window.is_none(),
        "Time",
    );

    if let Some(capacity) = &model.with_capacity {
        let demands = capacity.demands.clone();
        let demand_manager = manager.clone();
        let demand =
            engine.register_unary_transit_callback(move |from_index| demands[demand_manager.index_to_node(from_index)]);
        engine.add_dimension_with_vehicle_capacity(demand, 0, capacity.capacities.clone(), true, "Capacity");
    }

    if let Some(option) = &model.with_pickup_delivery {
        for pair in &option.pairs {
            let pickup = manager.node_to_index(pair.pickup as usize).expect("pickup resolves to a visit index");
            let delivery = manager.node_to_index(pair.delivery as usize).expect("delivery resolves to a visit index");
            engine.add_pickup_and_delivery(pickup, delivery);
            engine.add_same_vehicle_constraint(pickup, delivery);
            engine.add_cumul_precedence_constraint(engine.cumul_var(time, pickup), engine.cumul_var(time, delivery));
        }
        if let Some(policy) = option.policy {
            engine.set_pickup_and_delivery_policy_of_all_vehicles(match policy {
                PickupDropPolicy::Fifo => PickupDeliveryPolicy::Fifo,
                PickupDropPolicy::Lifo => PickupDeliveryPolicy::Lifo,
            });
        }
    }

    if let Some(option) = &model.with_time_window {
        for (node, windows) in option.windows.iter().enumerate() {
            if is_configured_terminal(model, node) {
                continue;
            }
            if let Some(index) = manager.node_to_index(node) {
                let var = engine.cumul_var(time, index);
                apply_time_windows(&mut engine, var, windows);
            }
        }

        for vehicle in 0..num_vehicles {
            match &model.depot_config {
                DepotConfig::SingleDepot { depot } if *depot != OPEN_ROUTE => {
                    let start = engine.cumul_var(time, engine.start(vehicle));
                    apply_time_windows(&mut engine, start, &option.windows[*depot as usize]);
                }
                DepotConfig::StartEndPair { starts, ends } => {
                    if starts[vehicle] != OPEN_ROUTE {
                        let start = engine.cumul_var(time, engine.start(vehicle));
                        apply_time_windows(&mut engine, start, &option.windows[starts[vehicle] as usize]);
                    }
                    if ends[vehicle] != OPEN_ROUTE {
                        let end = engine.cumul_var(time, engine.end(vehicle));
                        apply_time_windows(&mut engine, end, &option.windows[ends[vehicle] as usize]);
                    }
                }
                _ => {}
            }
        }
    }

    if let Some(option) = &model.with_vehicle_break_time {
        let node_visit_transits = model
            .with_service_time
            .as_ref()
            .map_or_else(|| vec![0; node_count], |service| service.service_time.clone());
        for (vehicle, breaks) in option.break_time.iter().enumerate() {
            let mut breaks = breaks.clone();
            breaks.sort_unstable();
            let intervals = breaks
                .iter()
                .enumerate()
                .map(|(position, window)| {
                    BreakInterval::new(
                        window.start,
                        window.end - window.start,
                        format!("break time on vehicle {vehicle} on {position}"),
                    )
                })
                .collect();
            engine.set_break_intervals_of_vehicle(time, vehicle, intervals, node_visit_transits.clone());
        }
    }

    if let Some(penalties) = &model.with_drop_penalties {
        for node in 0..node_count {
            if model.duration_matrix[node].iter().all(|&value| value == 0) {
                continue;
            }
            if is_configured_terminal(model, node) {
                continue;
            }
            let penalty = match penalties {
                DropPenalties::Uniform(penalty) => *penalty,
                DropPenalties::PerNode(penalties) => penalties[node],
            };
            if let Some(index) = manager.node_to_index(node) {
                engine.add_disjunction(&[index], penalty);
            }
        }
    }

    for vehicle in 0..num_vehicles {
        let start = engine.cumul_var(time, engine.start(vehicle));
        let end = engine.cumul_var(time, engine.end(vehicle));
        engine.add_variable_minimized_by_finalizer(start);
        engine.add_variable_minimized_by_finalizer(end);
    }

    let parameters = RoutingSearchParameters {
        first_solution_strategy: FirstSolutionStrategy::PathCheapestArc,
        local_search_metaheuristic: LocalSearchMetaheuristic::GuidedLocalSearch,
        time_limit: Duration::from_secs(model.time_limit_seconds as u64),
    };
    let assignment = engine.solve_with_parameters(&parameters).ok_or(SolveError::NoSolution)?;

    Ok(SolveOutcome { engine, time, assignment })
}

/// True when the caller's original configuration names `node` as depot,
/// start or end. Deliberately checked against the pre-rewrite references:
/// a duplicated terminal keeps shadowing its original node.
fn is_configured_terminal(model: &Model, node: usize) -> bool {
    let node = node as i32;
    match &model.depot_config {
        DepotConfig::SingleDepot { depot } => *depot == node,
        DepotConfig::StartEndPair { starts, ends } => starts.contains(&node) || ends.contains(&node),
    }
}

/// The slack of the time dimension: the longest configured break, since a
/// break stretches the arc it interrupts by its full duration.
fn max_break_length(model: &Model) -> i64 {
    model.with_vehicle_break_time.as_ref().map_or(0, |option| {
        option
            .break_time
            .iter()
            .flat_map(|breaks| breaks.iter())
            .map(|window| window.end - window.start)
            .max()
            .unwrap_or(0)
    })
}

/// The capacity of the time dimension: the largest coordinate named by a
/// non-trivial window, unbounded when no window constrains anything.
fn time_capacity(model: &Model) -> i64 {
    let max_coordinate = model.with_time_window.as_ref().map_or(0, |option| {
        option
            .windows
            .iter()
            .flat_map(|windows| windows.iter())
            .filter(|window| !is_trivial_window(window))
            .map(|window| window.start.max(window.end))
            .max()
            .unwrap_or(0)
    });
    if max_coordinate > 0 {
        max_coordinate
    } else {
        i64::MAX
    }
}

fn is_trivial_window(window: &TimeWindow) -> bool {
    window.start == 0 && window.end == i64::MAX
}

/// Applies a node's window list to a cumul: the sorted list becomes one range
/// from the earliest start to the latest end, with every gap between
/// consecutive windows removed. Trivial full-range windows are dropped first.
fn apply_time_windows(engine: &mut RoutingModel, var: CumulVar, windows: &[TimeWindow]) {
    let mut windows: Vec<TimeWindow> = windows.iter().copied().filter(|window| !is_trivial_window(window)).collect();
    windows.sort_unstable();
    if windows.is_empty() {
        return;
    }

    let earliest_start = windows[0].start;
    let latest_end = windows[windows.len() - 1].end;
    engine.set_cumul_range(var, earliest_start, latest_end);

    for pair in windows.windows(2) {
        if pair[0].end < pair[1].start {
            engine.remove_cumul_interval(var, pair[0].end, pair[1].start);
        }
    }
}
