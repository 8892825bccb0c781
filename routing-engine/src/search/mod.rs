//! Search: parameters, schedule evaluation and the branch-and-bound driver.

mod deadline;
mod params;
mod schedule;
mod solve;

pub use params::{FirstSolutionStrategy, LocalSearchMetaheuristic, RoutingSearchParameters};

pub(crate) use deadline::Deadline;
pub(crate) use schedule::schedule_route;
pub(crate) use solve::solve;
