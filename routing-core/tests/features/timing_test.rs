use crate::helpers::*;
use crate::models::{BreakTimeOption, DepotConfig, DropPenalties, TimeWindow};
use crate::problem::RoutingProblem;
use crate::solver::SolveError;

#[test]
fn can_respect_uniform_time_windows() {
    let responses = RoutingProblem::builder()
        .duration_matrix(small_matrix())
        .depot_config(DepotConfig::StartEndPair { starts: vec![0], ends: vec![-1] })
        .with_time_window(Some(uniform_windows(4, 0, 40)))
        .with_drop_penalties(Some(DropPenalties::Uniform(1000)))
        .build()
        .expect("valid problem")
        .solve()
        .expect("solvable");

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].route, vec![0, 1, 2, 3]);
    assert_eq!(responses[0].total_duration, 11);
}

#[test]
fn can_schedule_around_a_vehicle_break() {
    let responses = RoutingProblem::builder()
        .duration_matrix(small_matrix())
        .depot_config(DepotConfig::StartEndPair { starts: vec![0], ends: vec![-1] })
        .with_vehicle_break_time(Some(BreakTimeOption { break_time: vec![vec![TimeWindow { start: 2, end: 5 }]] }))
        .with_drop_penalties(Some(DropPenalties::Uniform(1000)))
        .build()
        .expect("valid problem")
        .solve()
        .expect("solvable");

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].route, vec![0, 1, 2, 3]);
    assert_eq!(responses[0].total_duration, 14);
}

#[test]
fn cannot_serve_a_window_that_requires_waiting_without_slack() {
    // node 3 opens long after any arrival and no break provides slack
    let mut windows = uniform_windows(4, 0, 40);
    windows.windows[3] = vec![TimeWindow { start: 500, end: 600 }];

    let result = RoutingProblem::builder()
        .duration_matrix(small_matrix())
        .depot_config(DepotConfig::StartEndPair { starts: vec![0], ends: vec![-1] })
        .with_time_window(Some(windows))
        .build()
        .expect("valid problem")
        .solve();

    assert_eq!(result, Err(SolveError::NoSolution));
}
