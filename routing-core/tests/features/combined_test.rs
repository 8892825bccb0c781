use crate::helpers::*;
use crate::models::{
    BreakTimeOption, CapacityOption, DepotConfig, DropPenalties, ServiceTimeOption, TimeWindow, TimeWindowOption,
};
use crate::problem::RoutingProblem;

#[test]
fn can_combine_every_option_on_one_vehicle() {
    let responses = RoutingProblem::builder()
        .duration_matrix(small_matrix())
        .depot_config(DepotConfig::StartEndPair { starts: vec![0], ends: vec![-1] })
        .with_service_time(Some(ServiceTimeOption { service_time: vec![0, 1, 1, 1] }))
        .with_pickup_delivery(Some(shared_node_pairs()))
        .with_capacity(Some(CapacityOption { capacities: vec![100], demands: vec![5, 10, 10, 30] }))
        .with_time_window(Some(TimeWindowOption {
            windows: vec![
                vec![TimeWindow { start: 0, end: 40 }],
                vec![TimeWindow { start: 10, end: 50 }],
                vec![TimeWindow { start: 20, end: 60 }],
                vec![TimeWindow { start: 30, end: 70 }],
            ],
        }))
        .with_vehicle_break_time(Some(BreakTimeOption { break_time: vec![vec![TimeWindow { start: 2, end: 3 }]] }))
        .with_drop_penalties(Some(DropPenalties::Uniform(1000)))
        .build()
        .expect("valid problem")
        .solve()
        .expect("solvable");

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].route, vec![0, 3, 3, 2, 2, 0, 1]);
    assert_eq!(responses[0].total_duration, 44);
}

#[test]
fn can_keep_the_served_demand_under_the_capacity() {
    let demands = vec![0i64, 10, 10, 25];
    let responses = RoutingProblem::builder()
        .duration_matrix(small_matrix())
        .depot_config(DepotConfig::SingleDepot { depot: 0 })
        .with_capacity(Some(CapacityOption { capacities: vec![20], demands: demands.clone() }))
        .with_drop_penalties(Some(DropPenalties::Uniform(1000)))
        .build()
        .expect("valid problem")
        .solve()
        .expect("solvable");

    let route = &responses[0].route;
    let served: i64 = route[1..route.len() - 1].iter().map(|&node| demands[node as usize]).sum();
    assert!(served <= 20, "served demand {served} blows the capacity in {route:?}");
    assert!(!route.contains(&3));
    assert_eq!(route[1..route.len() - 1].len(), 2);
}
