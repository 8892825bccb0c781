//! Shape checks run on a [`RoutingModel`] before any rewrite touches it.
//!
//! Checks run in a fixed order and the first violated invariant wins; the
//! error message names the invariant.

#[cfg(test)]
#[path = "../tests/unit/validation_test.rs"]
mod validation_test;

use crate::models::{DropPenalties, RoutingModel};
use std::fmt;

/// A violated model invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError(String);

impl ValidationError {
    /// Creates an error naming the violated invariant.
    pub fn new(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Validates every invariant of the model, first failure wins.
pub fn validate(model: &RoutingModel) -> Result<(), ValidationError> {
    check_duration_matrix(model)?;
    check_fleet(model)?;
    check_capacity(model)?;
    check_pickup_deliveries(model)?;
    check_time_windows(model)?;
    check_service_time(model)?;
    check_drop_penalties(model)?;
    check_break_time(model)?;
    Ok(())
}

fn check_duration_matrix(model: &RoutingModel) -> Result<(), ValidationError> {
    if model.duration_matrix.is_empty() {
        return Err("durationMatrix is empty".into());
    }
    let node_count = model.node_count();
    if model.duration_matrix.iter().any(|row| row.len() != node_count) {
        return Err("durationMatrix is not square".into());
    }
    Ok(())
}

fn check_fleet(model: &RoutingModel) -> Result<(), ValidationError> {
    if model.num_vehicles <= 0 {
        return Err("numVehicles is not positive".into());
    }
    if model.time_limit_seconds <= 0 {
        return Err("time limit is not positive".into());
    }
    Ok(())
}

fn check_capacity(model: &RoutingModel) -> Result<(), ValidationError> {
    let Some(capacity) = &model.with_capacity else {
        return Ok(());
    };
    if capacity.capacities.len() != model.num_vehicles as usize {
        return Err("capacities size is not equal to numVehicles".into());
    }
    if capacity.capacities.iter().any(|&value| value <= 0) {
        return Err("capacities is not positive".into());
    }
    if capacity.demands.len() != model.node_count() {
        return Err("demands size is not equal to nodeCount".into());
    }
    if capacity.demands.iter().any(|&value| value < 0) {
        return Err("demands is negative".into());
    }
    Ok(())
}

fn check_pickup_deliveries(model: &RoutingModel) -> Result<(), ValidationError> {
    let Some(option) = &model.with_pickup_delivery else {
        return Ok(());
    };
    if option.pairs.is_empty() {
        return Err("pickups_deliveries size is empty".into());
    }
    let node_count = model.node_count() as i64;
    for pair in &option.pairs {
        if pair.pickup < 0 || pair.pickup >= node_count {
            return Err("pickup index is out of range".into());
        }
        if pair.delivery < 0 || pair.delivery >= node_count {
            return Err("delivery index is out of range".into());
        }
        if pair.pickup == pair.delivery {
            return Err("pickup and delivery index are equal".into());
        }
    }
    Ok(())
}

fn check_time_windows(model: &RoutingModel) -> Result<(), ValidationError> {
    let Some(option) = &model.with_time_window else {
        return Ok(());
    };
    if option.windows.len() != model.node_count() {
        return Err("time_windows size is not equal to nodeCount".into());
    }
    for windows in &option.windows {
        if windows.is_empty() {
            return Err("time_windows is empty".into());
        }
        for window in windows {
            if window.start < 0 || window.end < 0 {
                return Err("time_windows start or end is negative".into());
            }
            if window.start > window.end {
                return Err("time_windows start is greater than end".into());
            }
        }
    }
    Ok(())
}

fn check_service_time(model: &RoutingModel) -> Result<(), ValidationError> {
    let Some(option) = &model.with_service_time else {
        return Ok(());
    };
    if option.service_time.len() != model.node_count() {
        return Err("service_time size is not equal to nodeCount".into());
    }
    if option.service_time.iter().any(|&value| value < 0) {
        return Err("service_time is negative".into());
    }
    Ok(())
}

fn check_drop_penalties(model: &RoutingModel) -> Result<(), ValidationError> {
    match &model.with_drop_penalties {
        None => Ok(()),
        Some(DropPenalties::Uniform(penalty)) => {
            if *penalty < 0 {
                return Err("penalty is negative".into());
            }
            Ok(())
        }
        Some(DropPenalties::PerNode(penalties)) => {
            if penalties.len() != model.node_count() {
                return Err("penalties size is not equal to nodeCount".into());
            }
            if penalties.iter().any(|&value| value < 0) {
                return Err("penalties is negative".into());
            }
            Ok(())
        }
    }
}

fn check_break_time(model: &RoutingModel) -> Result<(), ValidationError> {
    let Some(option) = &model.with_vehicle_break_time else {
        return Ok(());
    };
    if option.break_time.len() != model.num_vehicles as usize {
        return Err("break_time size is not equal to numVehicles".into());
    }
    for breaks in &option.break_time {
        if breaks.is_empty() {
            return Err("break_time is empty".into());
        }
        for window in breaks {
            if window.start < 0 || window.end < 0 {
                return Err("break_time start or end is negative".into());
            }
            if window.start > window.end {
                return Err("break_time start is greater than end".into());
            }
        }
    }
    Ok(())
}
