use super::*;
use crate::models::{DepotConfig, DropPenalties, PickupDelivery, RoutingModel, TimeWindow};
use serde_json::{json, Value};

fn complete_document() -> Value {
    json!({
        "durationMatrix": [[1, 2, 3], [1, 2, 3], [1, 2, 3]],
        "numVehicles": 2,
        "routingMode": {
            "type": "startEnd",
            "payload": { "starts": [1, 2], "ends": [1, 2] }
        },
        "apiTimeLimit": 1,
        "withCapacity": { "vehicleCapacity": [1, 2], "demands": [1, 2, 3] },
        "withPickupAndDeliveries": { "pickDrops": [{ "pickup": 1, "drop": 2 }] },
        "withTimeWindows": { "timeWindows": [[{ "start": 1, "end": 2 }]] },
        "withServiceTime": { "serviceTime": [1, 1, 1] },
        "withDropPenalties": { "penalty": 1 },
        "withVehicleBreakTime": { "breakTimes": [[{ "start": 1, "end": 2 }]] }
    })
}

#[test]
fn can_parse_a_complete_document() {
    let model = parse_model(&complete_document()).expect("parsable");

    assert_eq!(model.duration_matrix, vec![vec![1, 2, 3], vec![1, 2, 3], vec![1, 2, 3]]);
    assert_eq!(model.num_vehicles, 2);
    assert_eq!(model.time_limit_seconds, 1);
    assert_eq!(model.depot_config, DepotConfig::StartEndPair { starts: vec![1, 2], ends: vec![1, 2] });

    let capacity = model.with_capacity.expect("capacity block");
    assert_eq!(capacity.capacities, vec![1, 2]);
    assert_eq!(capacity.demands, vec![1, 2, 3]);

    let pairs = model.with_pickup_delivery.expect("pickup block");
    assert_eq!(pairs.pairs, vec![PickupDelivery { pickup: 1, delivery: 2 }]);
    assert_eq!(pairs.policy, None);

    let windows = model.with_time_window.expect("window block");
    assert_eq!(windows.windows, vec![vec![TimeWindow { start: 1, end: 2 }]]);

    assert_eq!(model.with_service_time.expect("service block").service_time, vec![1, 1, 1]);
    assert_eq!(model.with_drop_penalties, Some(DropPenalties::Uniform(1)));
    assert_eq!(
        model.with_vehicle_break_time.expect("break block").break_time,
        vec![vec![TimeWindow { start: 1, end: 2 }]]
    );
}

#[test]
fn can_default_the_optional_scalars() {
    let document = json!({
        "durationMatrix": [[0, 1], [1, 0]],
        "routingMode": { "type": "depot", "payload": { "depot": 0 } }
    });

    let model = parse_model(&document).expect("parsable");

    assert_eq!(model.num_vehicles, 1);
    assert_eq!(model.time_limit_seconds, 1);
    assert_eq!(model.depot_config, DepotConfig::SingleDepot { depot: 0 });
    assert!(model.with_capacity.is_none());
    assert!(model.with_drop_penalties.is_none());
}

#[test]
fn can_fall_back_on_a_malformed_time_limit() {
    let mut document = complete_document();
    document["apiTimeLimit"] = json!("soon");

    let model = parse_model(&document).expect("parsable");

    assert_eq!(model.time_limit_seconds, 1);
}

#[test]
fn can_treat_an_empty_penalty_block_as_absent() {
    let mut document = complete_document();
    document["withDropPenalties"] = json!({});

    let model = parse_model(&document).expect("parsable");

    assert!(model.with_drop_penalties.is_none());
}

#[test]
fn can_parse_the_per_node_penalty_form() {
    let mut document = complete_document();
    document["withDropPenalties"] = json!({ "penalties": [0, 10, 20] });

    let model = parse_model(&document).expect("parsable");

    assert_eq!(model.with_drop_penalties, Some(DropPenalties::PerNode(vec![0, 10, 20])));
}

#[test]
fn can_match_the_typed_projection() {
    let document = complete_document();
    let request: RoutingRequest = serde_json::from_value(document.clone()).expect("typed request");

    let typed = RoutingModel::from(request);
    let parsed = parse_model(&document).expect("parsable");

    assert_eq!(typed, parsed);
}

#[test]
fn can_round_trip_the_typed_request() {
    let request: RoutingRequest = serde_json::from_value(complete_document()).expect("typed request");

    let serialized = serde_json::to_value(&request).expect("serializable");
    let reparsed = parse_model(&serialized).expect("parsable");

    assert_eq!(reparsed, RoutingModel::from(request));
}

fn first_error(document: &Value) -> (String, Option<Vec<String>>) {
    let error = parse_model(document).expect_err("parse error");
    assert_eq!(error.code, "PARSE_ERROR");
    (error.key, error.values)
}

#[test]
fn cannot_parse_without_a_duration_matrix() {
    let (key, values) = first_error(&json!({ "routingMode": { "type": "depot", "payload": { "depot": 0 } } }));
    assert_eq!(key, "durationMatrix");
    assert_eq!(values, Some(vec!["expected arrays".to_string()]));
}

#[test]
fn cannot_parse_a_ragged_matrix_row() {
    let mut document = complete_document();
    document["durationMatrix"][1] = json!("row");
    let (key, _) = first_error(&document);
    assert_eq!(key, "durationMatrix[1]");
}

#[test]
fn cannot_parse_a_fractional_duration() {
    let mut document = complete_document();
    document["durationMatrix"][0][2] = json!(1.5);
    let (key, values) = first_error(&document);
    assert_eq!(key, "durationMatrix[0]");
    assert_eq!(values, Some(vec!["value is not integer".to_string()]));
}

#[test]
fn cannot_parse_without_a_routing_mode() {
    let document = json!({ "durationMatrix": [[0]] });
    let (key, values) = first_error(&document);
    assert_eq!(key, "routingMode");
    assert_eq!(values, Some(vec!["value is required".to_string()]));
}

#[test]
fn cannot_parse_an_unknown_routing_mode() {
    let mut document = complete_document();
    document["routingMode"] = json!({ "type": "roundRobin", "payload": {} });
    let (key, values) = first_error(&document);
    assert_eq!(key, "routingMode.type");
    assert_eq!(values, Some(vec!["expected to be enum of 'depot' | 'startEnd'".to_string()]));
}

#[test]
fn cannot_parse_a_non_integer_start() {
    let mut document = complete_document();
    document["routingMode"]["payload"]["starts"][1] = json!("two");
    let (key, values) = first_error(&document);
    assert_eq!(key, "routingMode.payload.starts[1]");
    assert_eq!(values, Some(vec!["expected to be an integer".to_string()]));
}

#[test]
fn cannot_parse_capacity_without_demands() {
    let mut document = complete_document();
    document["withCapacity"] = json!({ "vehicleCapacity": [1, 2] });
    let (key, values) = first_error(&document);
    assert_eq!(key, "withCapacity.demands");
    assert_eq!(values, Some(vec!["value is required".to_string()]));
}

#[test]
fn cannot_parse_a_pick_drop_without_its_drop() {
    let mut document = complete_document();
    document["withPickupAndDeliveries"]["pickDrops"][0] = json!({ "pickup": 1 });
    let (key, values) = first_error(&document);
    assert_eq!(key, "withPickupAndDeliveries.pickDrops[0].drop");
    assert_eq!(values, Some(vec!["value is required".to_string()]));
}

#[test]
fn cannot_parse_a_window_without_an_end() {
    let mut document = complete_document();
    document["withTimeWindows"]["timeWindows"][0][0] = json!({ "start": 1 });
    let (key, values) = first_error(&document);
    assert_eq!(key, "withTimeWindows.timeWindows[0][0].end");
    assert_eq!(values, Some(vec!["value is required".to_string()]));
}

#[test]
fn cannot_parse_a_non_integer_service_time() {
    let mut document = complete_document();
    document["withServiceTime"]["serviceTime"][2] = json!(true);
    let (key, values) = first_error(&document);
    assert_eq!(key, "withServiceTime.serviceTime[2]");
    assert_eq!(values, Some(vec!["value is expected to be int64".to_string()]));
}

#[test]
fn cannot_parse_a_malformed_break_list() {
    let mut document = complete_document();
    document["withVehicleBreakTime"]["breakTimes"][0] = json!(42);
    let (key, values) = first_error(&document);
    assert_eq!(key, "withVehicleBreakTime.breakTimes[0]");
    assert_eq!(values, Some(vec!["value is not an array".to_string()]));
}
