//! Depth-first branch-and-bound over vehicle routes.
//!
//! Routes are built vehicle by vehicle. Each step either extends the current
//! route with an unvisited index (cheapest arcs first) or closes the route at
//! the vehicle end. A cheapest-arc first solution seeds the incumbent, after
//! which the tree is explored exhaustively under the wall-clock budget; the
//! search is optimal whenever the tree is exhausted before the deadline.

use crate::model::{Assignment, PickupDeliveryPolicy, RoutingModel};
use crate::search::{schedule_route, Deadline, RoutingSearchParameters};

pub(crate) fn solve(model: &RoutingModel, parameters: &RoutingSearchParameters) -> Option<Assignment> {
    let mut search = Search::new(model, parameters);
    let mut state = State::new(model, &search);
    search.greedy_seed(&mut state);
    let mut state = State::new(model, &search);
    search.dfs(&mut state);
    search.best.map(|best| build_assignment(model, best))
}

struct BestSolution {
    routes: Vec<Vec<i64>>,
    cost: i64,
}

struct Search<'a> {
    model: &'a RoutingModel,
    deadline: Deadline,
    num_indices: usize,
    visit_indices: Vec<i64>,
    /// Cheapest outgoing arc per index, a lower bound on its eventual out-arc.
    min_from: Vec<i64>,
    /// Cheapest incoming arc per index; unlike outgoing arcs this bound never
    /// degrades on open routes, where every arc into the end is free.
    min_into: Vec<i64>,
    /// Outgoing lower-bound contribution of an index while it is unvisited.
    contribution: Vec<i64>,
    /// Incoming lower-bound contribution of an index while it is unvisited.
    contribution_in: Vec<i64>,
    is_mandatory: Vec<bool>,
    pair_by_pickup: Vec<Option<usize>>,
    pair_by_delivery: Vec<Option<usize>>,
    disjunctions_of: Vec<Vec<usize>>,
    /// Disjunctions holding a route terminal are satisfied by construction.
    always_active: Vec<bool>,
    /// Suffix sums of the cheapest start arc of every vehicle yet to run.
    start_suffix_bound: Vec<i64>,
    best: Option<BestSolution>,
    aborted: bool,
}

struct State {
    routes: Vec<Vec<i64>>,
    vehicle: usize,
    visited: Vec<bool>,
    unvisited_mandatory: usize,
    lb_unvisited: i64,
    lb_unvisited_in: i64,
    open_pairs: Vec<usize>,
    disjunction_active: Vec<u32>,
    cost: i64,
}

impl State {
    fn new(model: &RoutingModel, search: &Search) -> Self {
        let routes = (0..model.manager().num_vehicles()).map(|vehicle| vec![model.start(vehicle)]).collect();
        Self {
            routes,
            vehicle: 0,
            visited: vec![false; search.num_indices],
            unvisited_mandatory: search.is_mandatory.iter().filter(|&&mandatory| mandatory).count(),
            lb_unvisited: search.visit_indices.iter().map(|&index| search.contribution[index as usize]).sum(),
            lb_unvisited_in: search.visit_indices.iter().map(|&index| search.contribution_in[index as usize]).sum(),
            open_pairs: vec![],
            disjunction_active: vec![0; model.disjunctions.len()],
            cost: 0,
        }
    }
}

impl<'a> Search<'a> {
    fn new(model: &'a RoutingModel, parameters: &RoutingSearchParameters) -> Self {
        let manager = model.manager();
        let num_indices = manager.num_indices();
        let visit_indices: Vec<i64> = manager.visit_indices().collect();
        let end_indices: Vec<i64> = (0..manager.num_vehicles()).map(|vehicle| manager.end_index(vehicle)).collect();

        let min_from = (0..num_indices as i64)
            .map(|from| {
                visit_indices
                    .iter()
                    .chain(end_indices.iter())
                    .filter(|&&to| to != from)
                    .map(|&to| model.arc_cost(from, to))
                    .min()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();

        let start_indices: Vec<i64> = (0..manager.num_vehicles()).map(|vehicle| manager.start_index(vehicle)).collect();
        let min_into = (0..num_indices as i64)
            .map(|to| {
                visit_indices
                    .iter()
                    .chain(start_indices.iter())
                    .filter(|&&from| from != to)
                    .map(|&from| model.arc_cost(from, to))
                    .min()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();

        let mut pair_by_pickup = vec![None; num_indices];
        let mut pair_by_delivery = vec![None; num_indices];
        for (id, &(pickup, delivery)) in model.pairs.iter().enumerate() {
            pair_by_pickup[pickup as usize] = Some(id);
            pair_by_delivery[delivery as usize] = Some(id);
        }

        let num_nodes = manager.num_nodes();
        let mut disjunctions_of = vec![Vec::new(); num_indices];
        let mut always_active = vec![false; model.disjunctions.len()];
        for (id, disjunction) in model.disjunctions.iter().enumerate() {
            for &index in &disjunction.indices {
                if (index as usize) < num_nodes {
                    disjunctions_of[index as usize].push(id);
                } else {
                    always_active[id] = true;
                }
            }
        }

        let mut is_visit = vec![false; num_indices];
        for &index in &visit_indices {
            is_visit[index as usize] = true;
        }
        let is_mandatory: Vec<bool> =
            (0..num_indices).map(|index| is_visit[index] && disjunctions_of[index].is_empty()).collect();

        let bound_contribution = |arcs: &[i64]| {
            (0..num_indices)
                .map(|index| {
                    if is_mandatory[index] {
                        arcs[index]
                    } else {
                        let cheapest_drop = disjunctions_of[index]
                            .iter()
                            .filter(|&&id| model.disjunctions[id].indices.len() == 1)
                            .map(|&id| model.disjunctions[id].penalty)
                            .min();
                        match cheapest_drop {
                            Some(penalty) => penalty.min(arcs[index]),
                            None => 0,
                        }
                    }
                })
                .collect::<Vec<_>>()
        };
        let contribution = bound_contribution(&min_from);
        let contribution_in = bound_contribution(&min_into);

        let num_vehicles = manager.num_vehicles();
        let mut start_suffix_bound = vec![0i64; num_vehicles + 1];
        for vehicle in (0..num_vehicles).rev() {
            let start = manager.start_index(vehicle);
            start_suffix_bound[vehicle] =
                start_suffix_bound[vehicle + 1].saturating_add(min_from[start as usize]);
        }

        Self {
            model,
            deadline: Deadline::new(parameters.time_limit),
            num_indices,
            visit_indices,
            min_from,
            min_into,
            contribution,
            contribution_in,
            is_mandatory,
            pair_by_pickup,
            pair_by_delivery,
            disjunctions_of,
            always_active,
            start_suffix_bound,
            best: None,
            aborted: false,
        }
    }

    fn best_cost(&self) -> i64 {
        self.best.as_ref().map_or(i64::MAX, |best| best.cost)
    }

    /// True when `index` may come next on the current route.
    fn may_extend(&self, state: &State, index: i64) -> bool {
        for &id in &self.disjunctions_of[index as usize] {
            if state.disjunction_active[id] > 0 {
                return false;
            }
        }
        if let Some(pair) = self.pair_by_delivery[index as usize] {
            return match self.model.pair_policy {
                None => state.open_pairs.contains(&pair),
                Some(PickupDeliveryPolicy::Fifo) => state.open_pairs.first() == Some(&pair),
                Some(PickupDeliveryPolicy::Lifo) => state.open_pairs.last() == Some(&pair),
            };
        }
        true
    }

    /// Checks every dimension on the tentatively extended route.
    fn dimensions_feasible(&self, vehicle: usize, route: &[i64]) -> bool {
        (0..self.model.dimensions.len()).all(|id| {
            let dimension = &self.model.dimensions[id];
            let trivial = dimension.is_unconstrained()
                && dimension.capacity.for_vehicle(vehicle) == i64::MAX
                && !self
                    .model
                    .breaks
                    .get(&vehicle)
                    .map_or(false, |breaks| breaks.dimension.0 == id);
            trivial || schedule_route(self.model, crate::model::DimensionId(id), vehicle, route).is_some()
        })
    }

    fn place(&self, state: &mut State, index: i64, arc: i64) -> Option<usize> {
        state.visited[index as usize] = true;
        state.cost = state.cost.saturating_add(arc);
        state.lb_unvisited -= self.contribution[index as usize];
        state.lb_unvisited_in -= self.contribution_in[index as usize];
        if self.is_mandatory[index as usize] {
            state.unvisited_mandatory -= 1;
        }
        for &id in &self.disjunctions_of[index as usize] {
            state.disjunction_active[id] += 1;
        }
        if let Some(pair) = self.pair_by_pickup[index as usize] {
            state.open_pairs.push(pair);
        }
        if let Some(pair) = self.pair_by_delivery[index as usize] {
            let position = state.open_pairs.iter().position(|&open| open == pair).expect("delivery without open pickup");
            state.open_pairs.remove(position);
            return Some(position);
        }
        None
    }

    fn unplace(&self, state: &mut State, index: i64, arc: i64, reopened: Option<usize>) {
        if let Some(position) = reopened {
            let pair = self.pair_by_delivery[index as usize].expect("reopened index is not a delivery");
            state.open_pairs.insert(position, pair);
        }
        if let Some(pair) = self.pair_by_pickup[index as usize] {
            let last = state.open_pairs.pop();
            debug_assert_eq!(last, Some(pair));
        }
        for &id in &self.disjunctions_of[index as usize] {
            state.disjunction_active[id] -= 1;
        }
        if self.is_mandatory[index as usize] {
            state.unvisited_mandatory += 1;
        }
        state.lb_unvisited_in += self.contribution_in[index as usize];
        state.lb_unvisited += self.contribution[index as usize];
        state.cost -= arc;
        state.visited[index as usize] = false;
    }

    fn dfs(&mut self, state: &mut State) {
        if self.aborted || self.deadline.tick() {
            self.aborted = true;
            return;
        }
        let vehicle = state.vehicle;
        let head = *state.routes[vehicle].last().expect("route without start");

        let mut candidates: Vec<(i64, i64)> = self
            .visit_indices
            .iter()
            .filter(|&&index| !state.visited[index as usize] && self.may_extend(state, index))
            .map(|&index| (self.model.arc_cost(head, index), index))
            .collect();
        candidates.sort_unstable();

        for (arc, index) in candidates {
            let outgoing = (state.lb_unvisited - self.contribution[index as usize])
                .saturating_add(self.min_from[index as usize])
                .saturating_add(self.start_suffix_bound[vehicle + 1]);
            let incoming = state.lb_unvisited_in - self.contribution_in[index as usize];
            if state.cost.saturating_add(arc).saturating_add(outgoing.max(incoming)) >= self.best_cost() {
                continue;
            }
            state.routes[vehicle].push(index);
            if self.dimensions_feasible(vehicle, &state.routes[vehicle]) {
                let reopened = self.place(state, index, arc);
                self.dfs(state);
                self.unplace(state, index, arc, reopened);
            }
            state.routes[vehicle].pop();
            if self.aborted {
                return;
            }
        }

        self.try_close(state);
    }

    /// Closes the current vehicle at its end index and recurses or completes.
    fn try_close(&mut self, state: &mut State) {
        let vehicle = state.vehicle;
        if !state.open_pairs.is_empty() {
            return;
        }
        let last = vehicle + 1 == self.model.manager().num_vehicles();
        if last && state.unvisited_mandatory > 0 {
            return;
        }
        let head = *state.routes[vehicle].last().expect("route without start");
        let end = self.model.end(vehicle);
        let arc = self.model.arc_cost(head, end);
        let outgoing = state.lb_unvisited.saturating_add(self.start_suffix_bound[vehicle + 1]);
        if state.cost.saturating_add(arc).saturating_add(outgoing.max(state.lb_unvisited_in)) >= self.best_cost() {
            return;
        }
        state.routes[vehicle].push(end);
        if self.dimensions_feasible(vehicle, &state.routes[vehicle]) {
            state.cost = state.cost.saturating_add(arc);
            state.vehicle += 1;
            if last {
                self.complete(state);
            } else {
                self.dfs(state);
            }
            state.vehicle -= 1;
            state.cost -= arc;
        }
        state.routes[vehicle].pop();
    }

    /// Scores a full assignment and keeps it when it beats the incumbent.
    fn complete(&mut self, state: &State) {
        let mut cost = state.cost;
        for (id, disjunction) in self.model.disjunctions.iter().enumerate() {
            if state.disjunction_active[id] == 0 && !self.always_active[id] {
                cost = cost.saturating_add(disjunction.penalty);
            }
        }
        if cost >= self.best_cost() {
            return;
        }
        if !self.relations_hold(state) {
            return;
        }
        self.best = Some(BestSolution { routes: state.routes.clone(), cost });
    }

    /// Verifies same-vehicle and cumul-precedence constraints on a complete
    /// assignment. Pairs built through `may_extend` satisfy them already; this
    /// covers relations added independently of any pickup-and-delivery pair.
    fn relations_hold(&self, state: &State) -> bool {
        let mut vehicle_of = vec![None; self.num_indices];
        for (vehicle, route) in state.routes.iter().enumerate() {
            for &index in route {
                vehicle_of[index as usize] = Some(vehicle);
            }
        }
        for &(first, second) in &self.model.same_vehicle {
            match (vehicle_of[first as usize], vehicle_of[second as usize]) {
                (Some(a), Some(b)) if a != b => return false,
                (Some(_), None) | (None, Some(_)) => return false,
                _ => {}
            }
        }
        if self.model.precedences.is_empty() {
            return true;
        }
        let mut cumuls = vec![vec![0i64; self.num_indices]; self.model.dimensions.len()];
        for id in 0..self.model.dimensions.len() {
            for (vehicle, route) in state.routes.iter().enumerate() {
                let schedule = match schedule_route(self.model, crate::model::DimensionId(id), vehicle, route) {
                    Some(schedule) => schedule,
                    None => return false,
                };
                for (position, &index) in route.iter().enumerate() {
                    cumuls[id][index as usize] = schedule.cumuls[position];
                }
            }
        }
        self.model.precedences.iter().all(|(before, after)| {
            let served = vehicle_of[before.index as usize].is_some() && vehicle_of[after.index as usize].is_some();
            !served || cumuls[before.dimension.0][before.index as usize] <= cumuls[after.dimension.0][after.index as usize]
        })
    }

    /// Builds one solution greedily along the cheapest feasible arcs to seed
    /// the incumbent before the exhaustive descent.
    fn greedy_seed(&mut self, state: &mut State) {
        loop {
            if self.deadline.tick() {
                self.aborted = true;
                return;
            }
            let vehicle = state.vehicle;
            if vehicle == self.model.manager().num_vehicles() {
                self.complete(state);
                return;
            }
            let head = *state.routes[vehicle].last().expect("route without start");
            let mut candidates: Vec<(i64, i64)> = self
                .visit_indices
                .iter()
                .filter(|&&index| !state.visited[index as usize] && self.may_extend(state, index))
                .map(|&index| (self.model.arc_cost(head, index), index))
                .collect();
            candidates.sort_unstable();

            let mut extended = false;
            for (arc, index) in candidates {
                state.routes[vehicle].push(index);
                if self.dimensions_feasible(vehicle, &state.routes[vehicle]) {
                    self.place(state, index, arc);
                    extended = true;
                    break;
                }
                state.routes[vehicle].pop();
            }
            if extended {
                continue;
            }

            // no extension possible: close the route if the constraints allow it
            if !state.open_pairs.is_empty() {
                return;
            }
            if vehicle + 1 == self.model.manager().num_vehicles() && state.unvisited_mandatory > 0 {
                return;
            }
            let end = self.model.end(vehicle);
            let arc = self.model.arc_cost(head, end);
            state.routes[vehicle].push(end);
            if !self.dimensions_feasible(vehicle, &state.routes[vehicle]) {
                return;
            }
            state.cost = state.cost.saturating_add(arc);
            state.vehicle += 1;
        }
    }
}

fn build_assignment(model: &RoutingModel, best: BestSolution) -> Assignment {
    let num_indices = model.manager().num_indices();
    let mut nexts: Vec<i64> = (0..num_indices as i64).collect();
    for route in &best.routes {
        for pair in route.windows(2) {
            nexts[pair[0] as usize] = pair[1];
        }
    }
    let mut cumuls = vec![vec![0i64; num_indices]; model.dimensions.len()];
    for id in 0..model.dimensions.len() {
        for (vehicle, route) in best.routes.iter().enumerate() {
            let schedule = schedule_route(model, crate::model::DimensionId(id), vehicle, route)
                .expect("best assignment lost feasibility");
            for (position, &index) in route.iter().enumerate() {
                cumuls[id][index as usize] = schedule.cumuls[position];
            }
        }
    }
    Assignment { nexts, cumuls, objective: best.cost }
}
