use super::*;

#[test]
fn can_order_time_windows_by_start_then_end() {
    let mut windows = vec![
        TimeWindow { start: 5, end: 10 },
        TimeWindow { start: 0, end: 20 },
        TimeWindow { start: 5, end: 7 },
        TimeWindow { start: 0, end: 3 },
    ];

    windows.sort();

    assert_eq!(
        windows,
        vec![
            TimeWindow { start: 0, end: 3 },
            TimeWindow { start: 0, end: 20 },
            TimeWindow { start: 5, end: 7 },
            TimeWindow { start: 5, end: 10 },
        ]
    );
}

#[test]
fn can_compare_pairs_structurally() {
    let pair = PickupDelivery { pickup: 2, delivery: 0 };

    assert_eq!(pair, PickupDelivery { pickup: 2, delivery: 0 });
    assert_ne!(pair, PickupDelivery { pickup: 0, delivery: 2 });
}

#[test]
fn can_default_to_one_vehicle_and_one_second() {
    let model = RoutingModel::default();

    assert_eq!(model.num_vehicles, 1);
    assert_eq!(model.time_limit_seconds, 1);
    assert_eq!(model.depot_config, DepotConfig::SingleDepot { depot: 0 });
    assert!(model.with_capacity.is_none());
}
