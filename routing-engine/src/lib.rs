//! A small constraint-programming routing engine.
//!
//! The engine models a vehicle routing problem as a set of vehicles travelling
//! over an index space managed by a [`RoutingIndexManager`]: every vehicle owns
//! a dedicated start and end index, every other node is a visit index. On top
//! of that space a [`RoutingModel`] accumulates transit callbacks, dimensions
//! (quantities such as time or load whose cumulative value is tracked along a
//! route), pickup-and-delivery relations, disjunctions with drop penalties and
//! per-vehicle break intervals. Solving is a deterministic depth-first
//! branch-and-bound seeded by a cheapest-arc construction, bounded by a
//! wall-clock deadline.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod manager;
pub mod model;
pub mod search;

pub use manager::RoutingIndexManager;
pub use model::{Assignment, BreakInterval, CumulVar, DimensionId, PickupDeliveryPolicy, RoutingModel};
pub use search::{FirstSolutionStrategy, LocalSearchMetaheuristic, RoutingSearchParameters};
