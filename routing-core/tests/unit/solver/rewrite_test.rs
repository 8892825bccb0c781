use super::*;
use crate::helpers::*;
use crate::models::{CapacityOption, PickupDelivery, PickupDeliveryOption, ServiceTimeOption};
use crate::problem::RoutingProblem;
use proptest::prelude::*;

fn problem_with(model: crate::models::RoutingModel) -> RoutingProblem {
    RoutingProblem::from_model(model).expect("valid model")
}

#[test]
fn can_materialise_open_routes_as_a_dummy_node() {
    let mut problem = problem_with(crate::models::RoutingModel {
        depot_config: DepotConfig::StartEndPair { starts: vec![0], ends: vec![OPEN_ROUTE] },
        with_capacity: Some(CapacityOption { capacities: vec![50], demands: vec![1, 2, 3, 4] }),
        with_time_window: Some(uniform_windows(4, 0, 100)),
        with_service_time: Some(ServiceTimeOption { service_time: vec![0, 5, 5, 5] }),
        with_drop_penalties: Some(DropPenalties::PerNode(vec![10, 10, 10, 10])),
        ..small_model()
    });

    let terminals = rewrite(&mut problem);

    assert_eq!(terminals, ResolvedTerminals::StartEnd { starts: vec![0], ends: vec![4] });
    let model = problem.model();
    assert_eq!(model.node_count(), 5);
    assert!(model.duration_matrix.iter().all(|row| row.len() == 5));
    assert!(model.duration_matrix[4].iter().all(|&value| value == 0));
    assert!(model.duration_matrix.iter().all(|row| row[4] == 0));
    assert_eq!(model.with_capacity.as_ref().map(|option| option.demands[4]), Some(0));
    assert_eq!(model.with_time_window.as_ref().map(|option| option.windows[4].clone()), Some(vec![TimeWindow {
        start: 0,
        end: i64::MAX
    }]));
    assert_eq!(model.with_service_time.as_ref().map(|option| option.service_time[4]), Some(0));
    assert_eq!(
        model.with_drop_penalties,
        Some(DropPenalties::PerNode(vec![10, 10, 10, 10, 0]))
    );
    assert!(problem.index_map().is_empty());
}

#[test]
fn can_duplicate_nodes_shared_between_pairs() {
    let mut problem = problem_with(crate::models::RoutingModel {
        depot_config: DepotConfig::StartEndPair { starts: vec![OPEN_ROUTE], ends: vec![OPEN_ROUTE] },
        with_pickup_delivery: Some(shared_node_pairs()),
        with_capacity: Some(CapacityOption { capacities: vec![40], demands: vec![5, 10, 10, 30] }),
        ..small_model()
    });

    rewrite(&mut problem);

    let model = problem.model();
    // node 3 and node 2 appear twice across the pairs and gain duplicates
    assert_eq!(model.node_count(), 7);
    let pairs = &model.with_pickup_delivery.as_ref().expect("pairs").pairs;
    assert_eq!(pairs[0], PickupDelivery { pickup: 2, delivery: 0 });
    assert_eq!(pairs[1], PickupDelivery { pickup: 3, delivery: 1 });
    assert_eq!(pairs[2], PickupDelivery { pickup: 4, delivery: 5 });
    assert_eq!(problem.index_map().get(&4), Some(&3));
    assert_eq!(problem.index_map().get(&5), Some(&2));

    // the duplicate of node 3 copies its row and column
    assert_eq!(&model.duration_matrix[4][..4], &model.duration_matrix[3][..4]);
    for node in 0..4 {
        assert_eq!(model.duration_matrix[node][4], model.duration_matrix[3][node]);
    }
    assert_eq!(model.duration_matrix[4][4], 0);

    // duplicated demands inflate every capacity to keep the plan feasible
    let capacity = model.with_capacity.as_ref().expect("capacity");
    assert_eq!(capacity.demands, vec![5, 10, 10, 30, 30, 10, 0]);
    assert_eq!(capacity.capacities, vec![80]);
}

#[test]
fn can_duplicate_a_depot_cited_by_a_pair() {
    let mut problem = problem_with(crate::models::RoutingModel {
        depot_config: DepotConfig::SingleDepot { depot: 1 },
        with_pickup_delivery: Some(shared_node_pairs()),
        ..small_model()
    });

    let terminals = rewrite(&mut problem);

    assert_eq!(terminals, ResolvedTerminals::Depot(6));
    assert_eq!(problem.model().node_count(), 7);
    assert_eq!(problem.index_map().get(&6), Some(&1));
}

#[test]
fn can_leave_a_clean_problem_untouched() {
    let mut problem = problem_with(crate::models::RoutingModel {
        depot_config: DepotConfig::SingleDepot { depot: 0 },
        with_pickup_delivery: Some(PickupDeliveryOption {
            policy: None,
            pairs: vec![PickupDelivery { pickup: 1, delivery: 2 }],
        }),
        ..small_model()
    });
    let before = problem.model().clone();

    let first = rewrite(&mut problem);
    let after_first = problem.model().clone();
    let second = rewrite(&mut problem);

    assert_eq!(first, ResolvedTerminals::Depot(0));
    assert_eq!(first, second);
    assert_eq!(before, after_first);
    assert_eq!(after_first, *problem.model());
    assert!(problem.index_map().is_empty());
}

proptest! {
    /// After the rewrite no node is cited twice across pairs, every citation
    /// is a concrete matrix position and the matrix stays square with a zero
    /// diagonal.
    #[test]
    fn rewriting_always_yields_unique_in_range_citations(
        raw_pairs in proptest::collection::vec((0usize..6, 0usize..6), 1..8),
        depot in -1i32..6,
    ) {
        let pairs: Vec<PickupDelivery> = raw_pairs
            .iter()
            .filter(|(pickup, delivery)| pickup != delivery)
            .map(|&(pickup, delivery)| PickupDelivery { pickup: pickup as i64, delivery: delivery as i64 })
            .collect();
        prop_assume!(!pairs.is_empty());

        let matrix: Vec<Vec<i64>> = (0..6)
            .map(|row: usize| (0..6).map(|column: usize| if row == column { 0 } else { (row + column) as i64 }).collect())
            .collect();
        let mut problem = problem_with(crate::models::RoutingModel {
            duration_matrix: matrix,
            depot_config: DepotConfig::SingleDepot { depot },
            with_capacity: Some(CapacityOption { capacities: vec![100], demands: vec![1, 2, 3, 4, 5, 6] }),
            ..crate::models::RoutingModel::default()
        });
        let original_demand_total: i64 = 1 + 2 + 3 + 4 + 5 + 6;

        let terminals = rewrite(&mut problem);

        let model = problem.model();
        let node_count = model.node_count();

        // P2: still square, zero diagonal
        prop_assert!(model.duration_matrix.iter().all(|row| row.len() == node_count));
        prop_assert!((0..node_count).all(|node| model.duration_matrix[node][node] == 0));

        // P1: every citation is in range and no node is shared between pairs
        let mut cited = hashbrown::HashSet::new();
        for pair in &model.with_pickup_delivery.as_ref().expect("pairs").pairs {
            prop_assert!((0..node_count as i64).contains(&pair.pickup));
            prop_assert!((0..node_count as i64).contains(&pair.delivery));
            prop_assert!(cited.insert(pair.pickup));
            prop_assert!(cited.insert(pair.delivery));
        }
        let ResolvedTerminals::Depot(resolved) = terminals else { panic!("single depot expected") };
        prop_assert!(resolved < node_count);

        // duplicated demands are mirrored into the capacity inflation
        let capacity = model.with_capacity.as_ref().expect("capacity");
        let duplicated_demand: i64 = capacity.demands.iter().sum::<i64>() - original_demand_total;
        prop_assert_eq!(capacity.capacities[0], 100 + duplicated_demand);

        // the index map covers exactly the appended duplicates
        for (&new_node, &old_node) in problem.index_map() {
            prop_assert!(new_node >= 6);
            prop_assert!(old_node < new_node);
        }
    }
}
