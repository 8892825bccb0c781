use super::*;
use crate::helpers::*;
use crate::models::{CapacityOption, DepotConfig};

#[test]
fn can_build_a_problem_with_an_identity_index_map() {
    let problem = RoutingProblem::builder()
        .duration_matrix(small_matrix())
        .depot_config(DepotConfig::SingleDepot { depot: 0 })
        .build()
        .expect("valid problem");

    assert!(problem.index_map().is_empty());
    assert_eq!(problem.model().node_count(), 4);
    assert_eq!(problem.model().num_vehicles, 1);
}

#[test]
fn can_accumulate_option_blocks() {
    let problem = RoutingProblem::builder()
        .duration_matrix(small_matrix())
        .num_vehicles(2)
        .time_limit(3)
        .with_capacity(Some(CapacityOption { capacities: vec![10, 10], demands: vec![1, 2, 3, 4] }))
        .build()
        .expect("valid problem");

    assert_eq!(problem.model().num_vehicles, 2);
    assert_eq!(problem.model().time_limit_seconds, 3);
    assert!(problem.model().with_capacity.is_some());
}

#[test]
fn cannot_build_an_invalid_problem() {
    let result = RoutingProblem::builder().duration_matrix(vec![]).build();

    assert_eq!(result.err().map(|error| error.to_string()), Some("durationMatrix is empty".to_string()));
}
