//! Value types describing a routing problem and its solution.

#[cfg(test)]
#[path = "../../tests/unit/models_test.rs"]
mod models_test;

/// Marks an open route endpoint: the vehicle may start or end anywhere.
pub const OPEN_ROUTE: i32 = -1;

/// Where vehicles start and end their routes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DepotConfig {
    /// Every vehicle starts and ends at one depot node.
    SingleDepot {
        /// The depot node, or [`OPEN_ROUTE`].
        depot: i32,
    },
    /// Per-vehicle start and end nodes.
    StartEndPair {
        /// One start node per vehicle, [`OPEN_ROUTE`] allowed.
        starts: Vec<i32>,
        /// One end node per vehicle, [`OPEN_ROUTE`] allowed.
        ends: Vec<i32>,
    },
}

impl Default for DepotConfig {
    fn default() -> Self {
        DepotConfig::SingleDepot { depot: 0 }
    }
}

/// A pickup node and the node its load is delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickupDelivery {
    /// Node where the load is picked up.
    pub pickup: i64,
    /// Node where the load is dropped.
    pub delivery: i64,
}

/// A closed interval of time. Ordered by start, then end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: i64,
    /// Inclusive upper bound.
    pub end: i64,
}

/// Relative order of deliveries on a vehicle serving several pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupDropPolicy {
    /// First picked up, first delivered.
    Fifo,
    /// Last picked up, first delivered.
    Lifo,
}

/// Vehicle capacities and per-node demands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapacityOption {
    /// Maximum load per vehicle.
    pub capacities: Vec<i64>,
    /// Load consumed at each node.
    pub demands: Vec<i64>,
}

/// Pickup and delivery pairs with an optional ordering policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickupDeliveryOption {
    /// Delivery ordering policy, if any.
    pub policy: Option<PickupDropPolicy>,
    /// The pairs to serve.
    pub pairs: Vec<PickupDelivery>,
}

/// Per-node lists of allowed visit windows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeWindowOption {
    /// One list of windows per node; a visit must fall inside one of them.
    pub windows: Vec<Vec<TimeWindow>>,
}

/// Per-node service durations, folded into the cost of leaving the node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceTimeOption {
    /// Time spent at each node before departing.
    pub service_time: Vec<i64>,
}

/// Cost of leaving a node unvisited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropPenalties {
    /// The same penalty for every node.
    Uniform(i64),
    /// One penalty per node.
    PerNode(Vec<i64>),
}

/// Per-vehicle break intervals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakTimeOption {
    /// One non-empty list of breaks per vehicle.
    pub break_time: Vec<Vec<TimeWindow>>,
}

/// The declarative description of one routing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutingModel {
    /// Square travel time matrix, zero on the diagonal.
    pub duration_matrix: Vec<Vec<i64>>,
    /// Route endpoint configuration.
    pub depot_config: DepotConfig,
    /// Fleet size, positive.
    pub num_vehicles: i32,
    /// Wall-clock budget of the solve, in seconds.
    pub time_limit_seconds: i64,
    /// Capacity constraint, if any.
    pub with_capacity: Option<CapacityOption>,
    /// Pickup and delivery constraint, if any.
    pub with_pickup_delivery: Option<PickupDeliveryOption>,
    /// Time window constraint, if any.
    pub with_time_window: Option<TimeWindowOption>,
    /// Service times, if any.
    pub with_service_time: Option<ServiceTimeOption>,
    /// Drop penalties, if any.
    pub with_drop_penalties: Option<DropPenalties>,
    /// Vehicle breaks, if any.
    pub with_vehicle_break_time: Option<BreakTimeOption>,
}

impl Default for RoutingModel {
    fn default() -> Self {
        Self {
            duration_matrix: vec![],
            depot_config: DepotConfig::default(),
            num_vehicles: 1,
            time_limit_seconds: 1,
            with_capacity: None,
            with_pickup_delivery: None,
            with_time_window: None,
            with_service_time: None,
            with_drop_penalties: None,
            with_vehicle_break_time: None,
        }
    }
}

impl RoutingModel {
    /// Number of nodes of the duration matrix.
    pub fn node_count(&self) -> usize {
        self.duration_matrix.len()
    }
}

/// The route of one vehicle in the caller's node space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VehicleRoute {
    /// Visited nodes in order, trimmed of open endpoints.
    pub route: Vec<i32>,
    /// Time cumul at the route end.
    pub total_duration: i64,
}
