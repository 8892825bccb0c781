//! The validated routing problem and its fluent builder.

#[cfg(test)]
#[path = "../../tests/unit/problem_test.rs"]
mod problem_test;

use crate::models::{
    BreakTimeOption, CapacityOption, DepotConfig, DropPenalties, PickupDeliveryOption, RoutingModel, ServiceTimeOption,
    TimeWindowOption, VehicleRoute,
};
use crate::solver::{self, SolveError};
use crate::validation::{validate, ValidationError};
use hashbrown::HashMap;

/// A validated model plus the index bookkeeping of the pre-solve rewrite.
///
/// Built by [`RoutingBuilder::build`], grown in place by the rewriter, and
/// consumed by [`RoutingProblem::solve`].
#[derive(Clone, Debug)]
pub struct RoutingProblem {
    pub(crate) model: RoutingModel,
    /// Maps nodes appended by the rewriter back to the node they duplicate.
    /// Nodes absent from the map project onto themselves.
    pub(crate) index_map: HashMap<usize, usize>,
}

impl RoutingProblem {
    /// Starts a fluent builder.
    pub fn builder() -> RoutingBuilder {
        RoutingBuilder::default()
    }

    /// Validates `model` and wraps it with an identity index map.
    pub fn from_model(model: RoutingModel) -> Result<Self, ValidationError> {
        validate(&model)?;
        Ok(Self { model, index_map: HashMap::new() })
    }

    /// The underlying model.
    pub fn model(&self) -> &RoutingModel {
        &self.model
    }

    /// The rewritten-to-original node map.
    pub fn index_map(&self) -> &HashMap<usize, usize> {
        &self.index_map
    }

    /// Solves the problem and returns one route per vehicle.
    ///
    /// The problem is consumed: the rewrite grows it in place and nothing of
    /// it is needed once the routes are projected back.
    pub fn solve(self) -> Result<Vec<VehicleRoute>, SolveError> {
        solver::solve(self)
    }
}

/// Fluent assembly of a [`RoutingProblem`]; setters are pure, `build` checks
/// every invariant before anything downstream may mutate the model.
#[derive(Clone, Debug, Default)]
pub struct RoutingBuilder {
    model: RoutingModel,
}

impl RoutingBuilder {
    /// Sets the duration matrix.
    pub fn duration_matrix(mut self, matrix: Vec<Vec<i64>>) -> Self {
        self.model.duration_matrix = matrix;
        self
    }

    /// Sets the depot configuration.
    pub fn depot_config(mut self, depot_config: DepotConfig) -> Self {
        self.model.depot_config = depot_config;
        self
    }

    /// Sets the fleet size.
    pub fn num_vehicles(mut self, num_vehicles: i32) -> Self {
        self.model.num_vehicles = num_vehicles;
        self
    }

    /// Sets the solve budget in seconds.
    pub fn time_limit(mut self, seconds: i64) -> Self {
        self.model.time_limit_seconds = seconds;
        self
    }

    /// Sets or clears the capacity option.
    pub fn with_capacity(mut self, option: Option<CapacityOption>) -> Self {
        self.model.with_capacity = option;
        self
    }

    /// Sets or clears the pickup and delivery option.
    pub fn with_pickup_delivery(mut self, option: Option<PickupDeliveryOption>) -> Self {
        self.model.with_pickup_delivery = option;
        self
    }

    /// Sets or clears the time window option.
    pub fn with_time_window(mut self, option: Option<TimeWindowOption>) -> Self {
        self.model.with_time_window = option;
        self
    }

    /// Sets or clears the service time option.
    pub fn with_service_time(mut self, option: Option<ServiceTimeOption>) -> Self {
        self.model.with_service_time = option;
        self
    }

    /// Sets or clears the drop penalty option.
    pub fn with_drop_penalties(mut self, option: Option<DropPenalties>) -> Self {
        self.model.with_drop_penalties = option;
        self
    }

    /// Sets or clears the vehicle break option.
    pub fn with_vehicle_break_time(mut self, option: Option<BreakTimeOption>) -> Self {
        self.model.with_vehicle_break_time = option;
        self
    }

    /// Validates the accumulated model and freezes it into a problem.
    pub fn build(self) -> Result<RoutingProblem, ValidationError> {
        RoutingProblem::from_model(self.model)
    }
}
