//! Turns external payloads into a [`RoutingModel`].
//!
//! The typed path is a plain projection of [`RoutingRequest`]. The free-form
//! path walks a raw json tree and reports the first mismatch as a
//! [`ParseError`] carrying the dotted path of the offending field.

#[cfg(test)]
#[path = "../../../tests/unit/format/problem/reader_test.rs"]
mod reader_test;

use crate::format::problem::model::*;
use crate::format::ParseError;
use crate::models::{
    BreakTimeOption, CapacityOption, DepotConfig, DropPenalties, PickupDelivery, PickupDeliveryOption, RoutingModel,
    ServiceTimeOption, TimeWindow, TimeWindowOption,
};
use serde_json::Value;

impl From<RoutingRequest> for RoutingModel {
    fn from(request: RoutingRequest) -> Self {
        let depot_config = match request.routing_mode {
            RoutingMode::Depot { depot } => DepotConfig::SingleDepot { depot },
            RoutingMode::StartEnd { starts, ends } => DepotConfig::StartEndPair { starts, ends },
        };

        let with_capacity = request.with_capacity.map(|capacity| CapacityOption {
            capacities: capacity.vehicle_capacity,
            demands: capacity.demands,
        });

        let with_pickup_delivery = request.with_pickup_and_deliveries.map(|option| PickupDeliveryOption {
            policy: None,
            pairs: option
                .pick_drops
                .into_iter()
                .map(|pair| PickupDelivery { pickup: pair.pickup, delivery: pair.drop })
                .collect(),
        });

        let with_time_window = request.with_time_windows.map(|option| TimeWindowOption {
            windows: option.time_windows.into_iter().map(|windows| windows.into_iter().map(into_window).collect()).collect(),
        });

        let with_drop_penalties = request.with_drop_penalties.and_then(|option| match (option.penalty, option.penalties) {
            (Some(penalty), _) => Some(DropPenalties::Uniform(penalty)),
            (None, Some(penalties)) => Some(DropPenalties::PerNode(penalties)),
            (None, None) => None,
        });

        let with_vehicle_break_time = request.with_vehicle_break_time.map(|option| BreakTimeOption {
            break_time: option.break_times.into_iter().map(|breaks| breaks.into_iter().map(into_window).collect()).collect(),
        });

        RoutingModel {
            duration_matrix: request.duration_matrix,
            depot_config,
            num_vehicles: request.num_vehicles.unwrap_or(1),
            time_limit_seconds: request.api_time_limit.unwrap_or(1),
            with_capacity,
            with_pickup_delivery,
            with_time_window,
            with_service_time: request.with_service_time.map(|option| ServiceTimeOption { service_time: option.service_time }),
            with_drop_penalties,
            with_vehicle_break_time,
        }
    }
}

fn into_window(window: TimeWindowRequest) -> TimeWindow {
    TimeWindow { start: window.start, end: window.end }
}

/// Reads a [`RoutingModel`] out of a free-form json tree, failing on the
/// first field that does not match the expected shape.
pub fn parse_model(json: &Value) -> Result<RoutingModel, ParseError> {
    let duration_matrix = parse_duration_matrix(json)?;
    let num_vehicles = parse_num_vehicles(json)?;
    let depot_config = parse_routing_mode(json)?;

    // a missing or malformed time limit falls back to the default budget
    let time_limit_seconds = json.get("apiTimeLimit").and_then(Value::as_i64).unwrap_or(1);

    let with_capacity = parse_capacity(json)?;
    let with_pickup_delivery = parse_pickup_deliveries(json)?;
    let with_time_window = parse_time_windows(json)?;
    let with_service_time = parse_service_time(json)?;
    let with_drop_penalties = parse_drop_penalties(json)?;
    let with_vehicle_break_time = parse_break_time(json)?;

    Ok(RoutingModel {
        duration_matrix,
        depot_config,
        num_vehicles,
        time_limit_seconds,
        with_capacity,
        with_pickup_delivery,
        with_time_window,
        with_service_time,
        with_drop_penalties,
        with_vehicle_break_time,
    })
}

fn parse_duration_matrix(json: &Value) -> Result<Vec<Vec<i64>>, ParseError> {
    let rows = json
        .get("durationMatrix")
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::with_values("durationMatrix", &["expected arrays"]))?;

    let mut duration_matrix = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let row = row
            .as_array()
            .ok_or_else(|| ParseError::with_values(&format!("durationMatrix[{i}]"), &["expected arrays"]))?;
        let mut values = Vec::with_capacity(row.len());
        for value in row {
            let value = value
                .as_i64()
                .ok_or_else(|| ParseError::with_values(&format!("durationMatrix[{i}]"), &["value is not integer"]))?;
            values.push(value);
        }
        duration_matrix.push(values);
    }
    Ok(duration_matrix)
}

fn parse_num_vehicles(json: &Value) -> Result<i32, ParseError> {
    match json.get("numVehicles") {
        None => Ok(1),
        Some(value) => value
            .as_i64()
            .map(|vehicles| vehicles as i32)
            .ok_or_else(|| ParseError::with_values("numVehicles", &["value is not integer"])),
    }
}

fn parse_routing_mode(json: &Value) -> Result<DepotConfig, ParseError> {
    let mode = json.get("routingMode").ok_or_else(|| ParseError::with_values("routingMode", &["value is required"]))?;
    let mode_type = mode.get("type").ok_or_else(|| ParseError::with_values("routingMode.type", &["value is required"]))?;
    let payload =
        mode.get("payload").ok_or_else(|| ParseError::with_values("routingMode.payload", &["value is required"]))?;
    let mode_type = mode_type
        .as_str()
        .ok_or_else(|| ParseError::with_values("routingMode.type", &["value is expected to be string"]))?;

    match mode_type {
        "depot" => {
            let depot = payload
                .get("depot")
                .ok_or_else(|| ParseError::with_values("routingMode.payload.depot", &["value is required"]))?
                .as_i64()
                .ok_or_else(|| ParseError::with_values("routingMode.payload.depot", &["value is expected to be int"]))?;
            Ok(DepotConfig::SingleDepot { depot: depot as i32 })
        }
        "startEnd" => {
            let starts = parse_terminal_list(payload, "starts")?;
            let ends = parse_terminal_list(payload, "ends")?;
            Ok(DepotConfig::StartEndPair { starts, ends })
        }
        _ => Err(ParseError::with_values("routingMode.type", &["expected to be enum of 'depot' | 'startEnd'"])),
    }
}

fn parse_terminal_list(payload: &Value, field: &str) -> Result<Vec<i32>, ParseError> {
    let key = format!("routingMode.payload.{field}");
    let values = payload
        .get(field)
        .ok_or_else(|| ParseError::with_values(&key, &["value is required"]))?
        .as_array()
        .ok_or_else(|| ParseError::with_values(&key, &["expected to be an array"]))?;

    let mut terminals = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        let value = value
            .as_i64()
            .ok_or_else(|| ParseError::with_values(&format!("{key}[{i}]"), &["expected to be an integer"]))?;
        terminals.push(value as i32);
    }
    Ok(terminals)
}

fn parse_capacity(json: &Value) -> Result<Option<CapacityOption>, ParseError> {
    let Some(option) = json.get("withCapacity") else {
        return Ok(None);
    };
    let capacities = parse_integer_list(option, "withCapacity.vehicleCapacity", "vehicleCapacity")?;
    let demands = parse_integer_list(option, "withCapacity.demands", "demands")?;
    Ok(Some(CapacityOption { capacities, demands }))
}

fn parse_integer_list(option: &Value, key: &str, field: &str) -> Result<Vec<i64>, ParseError> {
    let values = option
        .get(field)
        .ok_or_else(|| ParseError::with_values(key, &["value is required"]))?
        .as_array()
        .ok_or_else(|| ParseError::with_values(key, &["value is expected to be an array"]))?;

    let mut integers = Vec::with_capacity(values.len());
    for value in values {
        let value = value.as_i64().ok_or_else(|| ParseError::with_values(key, &["value is not integer"]))?;
        integers.push(value);
    }
    Ok(integers)
}

fn parse_pickup_deliveries(json: &Value) -> Result<Option<PickupDeliveryOption>, ParseError> {
    let Some(option) = json.get("withPickupAndDeliveries") else {
        return Ok(None);
    };
    let pick_drops = option
        .get("pickDrops")
        .ok_or_else(|| ParseError::with_values("withPickupAndDeliveries.pickDrops", &["value is required"]))?
        .as_array()
        .ok_or_else(|| ParseError::with_values("withPickupAndDeliveries.pickDrops", &["value is expected to be an array"]))?;

    let mut pairs = Vec::with_capacity(pick_drops.len());
    for (i, pair) in pick_drops.iter().enumerate() {
        let pickup = parse_integer_member(pair, &format!("withPickupAndDeliveries.pickDrops[{i}].pickup"), "pickup")?;
        let delivery = parse_integer_member(pair, &format!("withPickupAndDeliveries.pickDrops[{i}].drop"), "drop")?;
        pairs.push(PickupDelivery { pickup, delivery });
    }
    Ok(Some(PickupDeliveryOption { policy: None, pairs }))
}

fn parse_integer_member(value: &Value, key: &str, field: &str) -> Result<i64, ParseError> {
    value
        .get(field)
        .ok_or_else(|| ParseError::with_values(key, &["value is required"]))?
        .as_i64()
        .ok_or_else(|| ParseError::with_values(key, &["value is expected to be int64"]))
}

fn parse_time_windows(json: &Value) -> Result<Option<TimeWindowOption>, ParseError> {
    let Some(option) = json.get("withTimeWindows") else {
        return Ok(None);
    };
    let windows = parse_window_lists(option, "withTimeWindows.timeWindows", "timeWindows")?;
    Ok(Some(TimeWindowOption { windows }))
}

fn parse_break_time(json: &Value) -> Result<Option<BreakTimeOption>, ParseError> {
    let Some(option) = json.get("withVehicleBreakTime") else {
        return Ok(None);
    };
    let break_time = parse_window_lists(option, "withVehicleBreakTime.breakTimes", "breakTimes")?;
    Ok(Some(BreakTimeOption { break_time }))
}

fn parse_window_lists(option: &Value, key: &str, field: &str) -> Result<Vec<Vec<TimeWindow>>, ParseError> {
    let lists = option
        .get(field)
        .ok_or_else(|| ParseError::with_values(key, &["value is required"]))?
        .as_array()
        .ok_or_else(|| ParseError::with_values(key, &["value is expected to be an array"]))?;

    let mut parsed = Vec::with_capacity(lists.len());
    for (i, list) in lists.iter().enumerate() {
        let list = list
            .as_array()
            .ok_or_else(|| ParseError::with_values(&format!("{key}[{i}]"), &["value is not an array"]))?;
        let mut windows = Vec::with_capacity(list.len());
        for (j, window) in list.iter().enumerate() {
            let start = parse_integer_member(window, &format!("{key}[{i}][{j}].start"), "start")?;
            let end = parse_integer_member(window, &format!("{key}[{i}][{j}].end"), "end")?;
            windows.push(TimeWindow { start, end });
        }
        parsed.push(windows);
    }
    Ok(parsed)
}

fn parse_service_time(json: &Value) -> Result<Option<ServiceTimeOption>, ParseError> {
    let Some(option) = json.get("withServiceTime") else {
        return Ok(None);
    };
    let values = option
        .get("serviceTime")
        .ok_or_else(|| ParseError::with_values("withServiceTime.serviceTime", &["value is required"]))?
        .as_array()
        .ok_or_else(|| ParseError::with_values("withServiceTime.serviceTime", &["value is expected to be an array"]))?;

    let mut service_time = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        let value = value.as_i64().ok_or_else(|| {
            ParseError::with_values(&format!("withServiceTime.serviceTime[{i}]"), &["value is expected to be int64"])
        })?;
        service_time.push(value);
    }
    Ok(Some(ServiceTimeOption { service_time }))
}

fn parse_drop_penalties(json: &Value) -> Result<Option<DropPenalties>, ParseError> {
    let Some(option) = json.get("withDropPenalties") else {
        return Ok(None);
    };
    if let Some(penalty) = option.get("penalty") {
        let penalty = penalty
            .as_i64()
            .ok_or_else(|| ParseError::with_values("withDropPenalties.penalty", &["value is expected to be int64"]))?;
        return Ok(Some(DropPenalties::Uniform(penalty)));
    }
    if let Some(penalties) = option.get("penalties") {
        let penalties = penalties
            .as_array()
            .ok_or_else(|| ParseError::with_values("withDropPenalties.penalties", &["value is expected to be an array"]))?;
        let mut parsed = Vec::with_capacity(penalties.len());
        for (i, value) in penalties.iter().enumerate() {
            let value = value.as_i64().ok_or_else(|| {
                ParseError::with_values(&format!("withDropPenalties.penalties[{i}]"), &["value is expected to be int64"])
            })?;
            parsed.push(value);
        }
        return Ok(Some(DropPenalties::PerNode(parsed)));
    }
    // a block naming neither penalty form means no drop penalties at all
    Ok(None)
}
