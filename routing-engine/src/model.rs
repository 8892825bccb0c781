//! The routing model: constraints accumulated on top of the index space.

#[cfg(test)]
#[path = "../tests/unit/model_test.rs"]
mod model_test;

use crate::manager::RoutingIndexManager;
use crate::search::{solve, RoutingSearchParameters};
use hashbrown::HashMap;

/// A registered transit callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitCallbackId(pub(crate) usize);

/// A dimension added to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DimensionId(pub(crate) usize);

/// A handle to the cumulative value of a dimension at a given index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CumulVar {
    pub(crate) dimension: DimensionId,
    pub(crate) index: i64,
}

/// Relative order imposed between deliveries of pairs served by one vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupDeliveryPolicy {
    /// Deliveries happen in the order of their pickups.
    Fifo,
    /// Deliveries happen in the reverse order of their pickups.
    Lifo,
}

/// A break of fixed duration, anchored relative to the route start cumul.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakInterval {
    /// Offset of the break start from the route start cumul.
    pub start_offset: i64,
    /// Length of the break.
    pub duration: i64,
    /// Diagnostic name.
    pub name: String,
}

impl BreakInterval {
    /// Creates a break starting `start_offset` after the route start and lasting `duration`.
    pub fn new(start_offset: i64, duration: i64, name: String) -> Self {
        Self { start_offset, duration, name }
    }
}

/// Upper bound on the cumulative value of a dimension.
#[derive(Clone, Debug)]
pub(crate) enum CapacityBound {
    Global(i64),
    PerVehicle(Vec<i64>),
}

impl CapacityBound {
    pub(crate) fn for_vehicle(&self, vehicle: usize) -> i64 {
        match self {
            CapacityBound::Global(capacity) => *capacity,
            CapacityBound::PerVehicle(capacities) => capacities[vehicle],
        }
    }
}

pub(crate) struct Dimension {
    pub(crate) name: String,
    pub(crate) transit: TransitCallbackId,
    pub(crate) slack_max: i64,
    pub(crate) capacity: CapacityBound,
    pub(crate) start_cumul_to_zero: bool,
    /// Allowed range per index; intersected on repeated application.
    pub(crate) ranges: HashMap<i64, (i64, i64)>,
    /// Inclusive forbidden intervals per index.
    pub(crate) removed: HashMap<i64, Vec<(i64, i64)>>,
}

impl Dimension {
    /// True when no schedule simulation is needed to validate cumuls.
    pub(crate) fn is_unconstrained(&self) -> bool {
        self.ranges.is_empty() && self.removed.is_empty()
    }
}

pub(crate) struct VehicleBreaks {
    pub(crate) dimension: DimensionId,
    pub(crate) intervals: Vec<BreakInterval>,
    pub(crate) node_visit_transits: Vec<i64>,
}

pub(crate) struct Disjunction {
    pub(crate) indices: Vec<i64>,
    pub(crate) penalty: i64,
}

type TransitCallback = Box<dyn Fn(i64, i64) -> i64>;

/// A routing problem expressed as callbacks and constraints over an index space.
pub struct RoutingModel {
    pub(crate) manager: RoutingIndexManager,
    pub(crate) callbacks: Vec<TransitCallback>,
    pub(crate) arc_cost: Option<TransitCallbackId>,
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) pairs: Vec<(i64, i64)>,
    pub(crate) pair_policy: Option<PickupDeliveryPolicy>,
    pub(crate) same_vehicle: Vec<(i64, i64)>,
    pub(crate) precedences: Vec<(CumulVar, CumulVar)>,
    pub(crate) disjunctions: Vec<Disjunction>,
    pub(crate) breaks: HashMap<usize, VehicleBreaks>,
    pub(crate) finalizers: Vec<CumulVar>,
}

impl RoutingModel {
    /// Creates an empty model over the given index space.
    pub fn new(manager: RoutingIndexManager) -> Self {
        Self {
            manager,
            callbacks: vec![],
            arc_cost: None,
            dimensions: vec![],
            pairs: vec![],
            pair_policy: None,
            same_vehicle: vec![],
            precedences: vec![],
            disjunctions: vec![],
            breaks: HashMap::new(),
            finalizers: vec![],
        }
    }

    /// Returns the index manager the model was built on.
    pub fn manager(&self) -> &RoutingIndexManager {
        &self.manager
    }

    /// Registers a callback evaluated on `(from_index, to_index)` arcs.
    pub fn register_transit_callback(&mut self, callback: impl Fn(i64, i64) -> i64 + 'static) -> TransitCallbackId {
        self.callbacks.push(Box::new(callback));
        TransitCallbackId(self.callbacks.len() - 1)
    }

    /// Registers a callback evaluated on the `from_index` of an arc only.
    pub fn register_unary_transit_callback(&mut self, callback: impl Fn(i64) -> i64 + 'static) -> TransitCallbackId {
        self.register_transit_callback(move |from, _| callback(from))
    }

    /// Uses the given callback as the arc cost of every vehicle.
    pub fn set_arc_cost_evaluator_of_all_vehicles(&mut self, callback: TransitCallbackId) {
        self.arc_cost = Some(callback);
    }

    /// Adds a dimension with a single capacity shared by all vehicles.
    pub fn add_dimension(
        &mut self,
        transit: TransitCallbackId,
        slack_max: i64,
        capacity: i64,
        start_cumul_to_zero: bool,
        name: &str,
    ) -> DimensionId {
        self.push_dimension(transit, slack_max, CapacityBound::Global(capacity), start_cumul_to_zero, name)
    }

    /// Adds a dimension bounded by a per-vehicle capacity vector.
    pub fn add_dimension_with_vehicle_capacity(
        &mut self,
        transit: TransitCallbackId,
        slack_max: i64,
        capacities: Vec<i64>,
        start_cumul_to_zero: bool,
        name: &str,
    ) -> DimensionId {
        assert_eq!(capacities.len(), self.manager.num_vehicles(), "one capacity per vehicle expected");
        self.push_dimension(transit, slack_max, CapacityBound::PerVehicle(capacities), start_cumul_to_zero, name)
    }

    fn push_dimension(
        &mut self,
        transit: TransitCallbackId,
        slack_max: i64,
        capacity: CapacityBound,
        start_cumul_to_zero: bool,
        name: &str,
    ) -> DimensionId {
        assert!(transit.0 < self.callbacks.len(), "unknown transit callback");
        self.dimensions.push(Dimension {
            name: name.to_string(),
            transit,
            slack_max,
            capacity,
            start_cumul_to_zero,
            ranges: HashMap::new(),
            removed: HashMap::new(),
        });
        DimensionId(self.dimensions.len() - 1)
    }

    /// Looks a dimension up by name.
    pub fn dimension(&self, name: &str) -> Option<DimensionId> {
        self.dimensions.iter().position(|dimension| dimension.name == name).map(DimensionId)
    }

    /// Returns the cumul handle of `dimension` at `index`.
    pub fn cumul_var(&self, dimension: DimensionId, index: i64) -> CumulVar {
        debug_assert!((index as usize) < self.manager.num_indices());
        CumulVar { dimension, index }
    }

    /// Restricts the cumul to `[min, max]`, intersecting any earlier restriction.
    pub fn set_cumul_range(&mut self, var: CumulVar, min: i64, max: i64) {
        let ranges = &mut self.dimensions[var.dimension.0].ranges;
        let entry = ranges.entry(var.index).or_insert((i64::MIN, i64::MAX));
        entry.0 = entry.0.max(min);
        entry.1 = entry.1.min(max);
    }

    /// Forbids every cumul value in the inclusive interval `[min, max]`.
    pub fn remove_cumul_interval(&mut self, var: CumulVar, min: i64, max: i64) {
        self.dimensions[var.dimension.0].removed.entry(var.index).or_default().push((min, max));
    }

    /// Declares `pickup` and `delivery` a pair that a single route serves in order.
    pub fn add_pickup_and_delivery(&mut self, pickup: i64, delivery: i64) {
        self.pairs.push((pickup, delivery));
    }

    /// Imposes a delivery ordering policy on every vehicle.
    pub fn set_pickup_and_delivery_policy_of_all_vehicles(&mut self, policy: PickupDeliveryPolicy) {
        self.pair_policy = Some(policy);
    }

    /// Constrains two indices to be served by the same vehicle.
    pub fn add_same_vehicle_constraint(&mut self, first: i64, second: i64) {
        self.same_vehicle.push((first, second));
    }

    /// Constrains the cumul of `before` to never exceed the cumul of `after`.
    pub fn add_cumul_precedence_constraint(&mut self, before: CumulVar, after: CumulVar) {
        debug_assert_eq!(before.dimension, after.dimension);
        self.precedences.push((before, after));
    }

    /// Makes the given indices optional: visiting none of them costs `penalty`,
    /// visiting more than one is forbidden.
    pub fn add_disjunction(&mut self, indices: &[i64], penalty: i64) {
        self.disjunctions.push(Disjunction { indices: indices.to_vec(), penalty });
    }

    /// Installs break intervals for `vehicle` on `dimension`.
    ///
    /// `node_visit_transits` gives, per node, the portion of the outgoing
    /// transit spent at the node itself; breaks may interrupt travel but never
    /// a node visit.
    pub fn set_break_intervals_of_vehicle(
        &mut self,
        dimension: DimensionId,
        vehicle: usize,
        intervals: Vec<BreakInterval>,
        node_visit_transits: Vec<i64>,
    ) {
        assert_eq!(node_visit_transits.len(), self.manager.num_nodes(), "one visit transit per node expected");
        self.breaks.insert(vehicle, VehicleBreaks { dimension, intervals, node_visit_transits });
    }

    /// Asks the solver to keep the cumul as small as the constraints allow.
    pub fn add_variable_minimized_by_finalizer(&mut self, var: CumulVar) {
        self.finalizers.push(var);
    }

    /// Returns the route start index of `vehicle`.
    pub fn start(&self, vehicle: usize) -> i64 {
        self.manager.start_index(vehicle)
    }

    /// Returns the route end index of `vehicle`.
    pub fn end(&self, vehicle: usize) -> i64 {
        self.manager.end_index(vehicle)
    }

    /// Returns true if `index` ends a route.
    pub fn is_end(&self, index: i64) -> bool {
        self.manager.is_end(index)
    }

    /// Returns true if `vehicle` visits at least one node in `assignment`.
    pub fn is_vehicle_used(&self, assignment: &Assignment, vehicle: usize) -> bool {
        assignment.next(self.start(vehicle)) != self.end(vehicle)
    }

    /// Runs the search and returns the best assignment found, if any.
    pub fn solve_with_parameters(&self, parameters: &RoutingSearchParameters) -> Option<Assignment> {
        solve(self, parameters)
    }

    pub(crate) fn transit(&self, callback: TransitCallbackId, from: i64, to: i64) -> i64 {
        (self.callbacks[callback.0])(from, to)
    }

    pub(crate) fn arc_cost(&self, from: i64, to: i64) -> i64 {
        match self.arc_cost {
            Some(callback) => self.transit(callback, from, to),
            None => 0,
        }
    }
}

/// The result of a successful search: one `next` pointer per index plus the
/// cumul value of every dimension at every index on a route.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub(crate) nexts: Vec<i64>,
    pub(crate) cumuls: Vec<Vec<i64>>,
    pub(crate) objective: i64,
}

impl Assignment {
    /// Returns the index following `index` on its route.
    ///
    /// A dropped index points to itself.
    pub fn next(&self, index: i64) -> i64 {
        self.nexts[index as usize]
    }

    /// Returns the cumul value of `var` in this assignment.
    pub fn cumul_value(&self, var: CumulVar) -> i64 {
        self.cumuls[var.dimension.0][var.index as usize]
    }

    /// Returns the objective value: arc costs plus drop penalties.
    pub fn objective_value(&self) -> i64 {
        self.objective
    }
}
