//! Translation between the caller's node space and the solver's index space.

#[cfg(test)]
#[path = "../tests/unit/manager_test.rs"]
mod manager_test;

/// Maps problem nodes to solver indices and back.
///
/// Visit nodes keep their position as index. Every vehicle start and end gets
/// a dedicated index past the node range, so two vehicles sharing a depot node
/// still own distinct route endpoints.
#[derive(Clone, Debug)]
pub struct RoutingIndexManager {
    num_nodes: usize,
    num_vehicles: usize,
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl RoutingIndexManager {
    /// Creates a manager where every vehicle starts and ends at `depot`.
    pub fn new_single_depot(num_nodes: usize, num_vehicles: usize, depot: usize) -> Self {
        assert!(depot < num_nodes, "depot node out of range");
        Self { num_nodes, num_vehicles, starts: vec![depot; num_vehicles], ends: vec![depot; num_vehicles] }
    }

    /// Creates a manager with per-vehicle start and end nodes.
    pub fn new_start_end(num_nodes: usize, num_vehicles: usize, starts: Vec<usize>, ends: Vec<usize>) -> Self {
        assert_eq!(starts.len(), num_vehicles, "one start node per vehicle expected");
        assert_eq!(ends.len(), num_vehicles, "one end node per vehicle expected");
        assert!(starts.iter().chain(ends.iter()).all(|&node| node < num_nodes), "terminal node out of range");
        Self { num_nodes, num_vehicles, starts, ends }
    }

    /// Returns the number of nodes of the managed problem.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of vehicles of the managed problem.
    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Returns the total amount of indices: one per node plus one per route endpoint.
    pub fn num_indices(&self) -> usize {
        self.num_nodes + 2 * self.num_vehicles
    }

    /// Returns the index of the route start of `vehicle`.
    pub fn start_index(&self, vehicle: usize) -> i64 {
        debug_assert!(vehicle < self.num_vehicles);
        (self.num_nodes + vehicle) as i64
    }

    /// Returns the index of the route end of `vehicle`.
    pub fn end_index(&self, vehicle: usize) -> i64 {
        debug_assert!(vehicle < self.num_vehicles);
        (self.num_nodes + self.num_vehicles + vehicle) as i64
    }

    /// Returns true if `index` is the route end of some vehicle.
    pub fn is_end(&self, index: i64) -> bool {
        index >= (self.num_nodes + self.num_vehicles) as i64 && (index as usize) < self.num_indices()
    }

    /// Translates a solver index back to the node it visits.
    pub fn index_to_node(&self, index: i64) -> usize {
        let index = index as usize;
        if index < self.num_nodes {
            index
        } else if index < self.num_nodes + self.num_vehicles {
            self.starts[index - self.num_nodes]
        } else {
            self.ends[index - self.num_nodes - self.num_vehicles]
        }
    }

    /// Translates a node to its solver index.
    ///
    /// A node serving as terminal of exactly one route endpoint resolves to
    /// that endpoint. A node shared between several endpoints has no single
    /// index and yields `None`, as does a terminal node asked for its visit
    /// index: terminals are never visited in the middle of a route.
    pub fn node_to_index(&self, node: usize) -> Option<i64> {
        if node >= self.num_nodes {
            return None;
        }
        let mut found = None;
        for vehicle in 0..self.num_vehicles {
            if self.starts[vehicle] == node {
                if found.is_some() {
                    return None;
                }
                found = Some(self.start_index(vehicle));
            }
            if self.ends[vehicle] == node {
                if found.is_some() {
                    return None;
                }
                found = Some(self.end_index(vehicle));
            }
        }
        match found {
            Some(index) => Some(index),
            None => Some(node as i64),
        }
    }

    /// Returns true if `node` is a start or end node of some vehicle.
    pub fn is_terminal_node(&self, node: usize) -> bool {
        self.starts.contains(&node) || self.ends.contains(&node)
    }

    /// Iterates over the indices of nodes that can be visited in the middle of a route.
    pub fn visit_indices(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.num_nodes).filter(move |&node| !self.is_terminal_node(node)).map(|node| node as i64)
    }
}
