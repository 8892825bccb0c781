//! Serialization of solved routes into the response body of the service.

use crate::models::VehicleRoute;
use serde::{Deserialize, Serialize};

/// One vehicle's routes entry as carried on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteView {
    /// Visited nodes in order.
    pub routes: Vec<i32>,
    /// Time cumul at the route end.
    pub total_duration: i64,
}

/// The body of a successful response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SolutionResponse {
    /// Always `success`.
    pub status: String,
    /// One entry per vehicle, in vehicle order.
    pub data: Vec<RouteView>,
}

impl SolutionResponse {
    /// Wraps solved routes in the response envelope.
    pub fn success(routes: Vec<VehicleRoute>) -> Self {
        Self {
            status: "success".to_string(),
            data: routes
                .into_iter()
                .map(|vehicle| RouteView { routes: vehicle.route, total_duration: vehicle.total_duration })
                .collect(),
        }
    }
}
