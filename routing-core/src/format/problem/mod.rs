//! Request ingestion: the typed request model and the free-form parser.

mod model;
mod reader;

pub use self::model::{
    BreakTimeRequest, CapacityRequest, DropPenaltiesRequest, PickDrop, PickupDeliveriesRequest, RoutingMode,
    RoutingRequest, ServiceTimeRequest, TimeWindowRequest, TimeWindowsRequest,
};
pub use self::reader::parse_model;
