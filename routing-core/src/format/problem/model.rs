//! The typed request mirroring the wire format field by field.

use serde::{Deserialize, Serialize};

/// A routing request as carried on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRequest {
    /// Square travel time matrix.
    pub duration_matrix: Vec<Vec<i64>>,
    /// Fleet size; one vehicle when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_vehicles: Option<i32>,
    /// Solve budget in seconds; one second when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_time_limit: Option<i64>,
    /// Route endpoint configuration.
    pub routing_mode: RoutingMode,
    /// Capacity constraint block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_capacity: Option<CapacityRequest>,
    /// Pickup and delivery block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_pickup_and_deliveries: Option<PickupDeliveriesRequest>,
    /// Time window block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_time_windows: Option<TimeWindowsRequest>,
    /// Service time block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_service_time: Option<ServiceTimeRequest>,
    /// Drop penalty block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_drop_penalties: Option<DropPenaltiesRequest>,
    /// Vehicle break block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_vehicle_break_time: Option<BreakTimeRequest>,
}

/// Tagged routing mode: one depot for the fleet, or per-vehicle endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum RoutingMode {
    /// Every vehicle starts and ends at `depot`; `-1` opens the routes.
    Depot {
        /// The depot node.
        depot: i32,
    },
    /// Per-vehicle start and end nodes; `-1` opens an endpoint.
    StartEnd {
        /// One start per vehicle.
        starts: Vec<i32>,
        /// One end per vehicle.
        ends: Vec<i32>,
    },
}

/// Vehicle capacities and node demands.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityRequest {
    /// Maximum load per vehicle.
    pub vehicle_capacity: Vec<i64>,
    /// Load consumed per node.
    pub demands: Vec<i64>,
}

/// Pickup and delivery pairs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupDeliveriesRequest {
    /// The pairs to serve.
    pub pick_drops: Vec<PickDrop>,
}

/// One pickup node and the node it is dropped at.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PickDrop {
    /// Pickup node.
    pub pickup: i64,
    /// Drop node.
    pub drop: i64,
}

/// Per-node time window lists.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindowsRequest {
    /// One list of windows per node.
    pub time_windows: Vec<Vec<TimeWindowRequest>>,
}

/// An inclusive time interval.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeWindowRequest {
    /// Inclusive lower bound.
    pub start: i64,
    /// Inclusive upper bound.
    pub end: i64,
}

/// Per-node service times.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTimeRequest {
    /// Time spent at each node.
    pub service_time: Vec<i64>,
}

/// Drop penalties: a uniform `penalty` or a per-node `penalties` vector.
///
/// When neither field is present the block means "no drop penalties".
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DropPenaltiesRequest {
    /// Uniform penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty: Option<i64>,
    /// Per-node penalties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalties: Option<Vec<i64>>,
}

/// Per-vehicle break interval lists.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakTimeRequest {
    /// One list of breaks per vehicle.
    pub break_times: Vec<Vec<TimeWindowRequest>>,
}
