use crate::helpers::*;
use crate::models::{DepotConfig, ServiceTimeOption};
use crate::problem::RoutingProblem;

#[test]
fn can_route_a_single_vehicle_from_a_depot() {
    let responses = RoutingProblem::builder()
        .duration_matrix(city_matrix())
        .depot_config(DepotConfig::SingleDepot { depot: 0 })
        .time_limit(10)
        .build()
        .expect("valid problem")
        .solve()
        .expect("solvable");

    assert_eq!(responses.len(), 1);
    let route = &responses[0].route;
    assert_eq!(route.first(), Some(&0));
    assert_eq!(route.last(), Some(&0));
    assert_eq!(route.len(), 14);
    let mut visited: Vec<i32> = route[1..13].to_vec();
    visited.sort_unstable();
    assert_eq!(visited, (1..13).collect::<Vec<i32>>());
}

#[test]
fn can_route_with_an_open_end_and_service_times() {
    let mut service_time = vec![15; 13];
    service_time[0] = 0;

    let responses = RoutingProblem::builder()
        .duration_matrix(city_matrix())
        .depot_config(DepotConfig::StartEndPair { starts: vec![0], ends: vec![-1] })
        .with_service_time(Some(ServiceTimeOption { service_time }))
        .time_limit(10)
        .build()
        .expect("valid problem")
        .solve()
        .expect("solvable");

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].route, vec![0, 7, 2, 3, 9, 10, 5, 4, 12, 11, 1, 8, 6]);
}
