//! Knobs controlling the search.

use std::time::Duration;

/// Strategy used to build the seed solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirstSolutionStrategy {
    /// Greedily extend each route with the cheapest feasible arc.
    PathCheapestArc,
    /// Let the engine pick.
    Automatic,
}

/// Improvement scheme applied after the first solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalSearchMetaheuristic {
    /// Penalty-guided exploration of the neighbourhood of the incumbent.
    GuidedLocalSearch,
    /// Let the engine pick.
    Automatic,
}

/// Parameters of a single `solve` call.
#[derive(Clone, Debug)]
pub struct RoutingSearchParameters {
    /// How the seed solution is built.
    pub first_solution_strategy: FirstSolutionStrategy,
    /// How the seed solution is improved.
    pub local_search_metaheuristic: LocalSearchMetaheuristic,
    /// Wall-clock budget of the whole search.
    pub time_limit: Duration,
}

impl Default for RoutingSearchParameters {
    fn default() -> Self {
        Self {
            first_solution_strategy: FirstSolutionStrategy::Automatic,
            local_search_metaheuristic: LocalSearchMetaheuristic::Automatic,
            time_limit: Duration::from_secs(1),
        }
    }
}
