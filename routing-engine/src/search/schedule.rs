//! Evaluation of dimension cumuls along a fixed route.
//!
//! Given a route as a sequence of indices, the scheduler decides the cumul of
//! every stop: transits accumulate, slack absorbs waiting, window ranges and
//! removed intervals restrict cumuls, and break intervals interrupt travel.
//! The returned schedule is the feasible one with the smallest end cumul,
//! which is what cumul finalizers ask for.

#[cfg(test)]
#[path = "../../tests/unit/schedule_test.rs"]
mod schedule_test;

use crate::model::{Dimension, DimensionId, RoutingModel, VehicleBreaks};

/// Cumul values along one route, one entry per route position.
#[derive(Clone, Debug)]
pub(crate) struct RouteSchedule {
    pub(crate) cumuls: Vec<i64>,
}

impl RouteSchedule {
    pub(crate) fn end_cumul(&self) -> i64 {
        *self.cumuls.last().expect("schedule of empty route")
    }
}

/// An absolute break occurrence, derived from the route start cumul.
#[derive(Clone, Copy, Debug)]
struct AbsoluteBreak {
    start: i64,
    end: i64,
}

/// Computes the best feasible schedule of `route` on `dimension`, or `None`
/// when no start cumul makes the route feasible.
///
/// `route` holds solver indices; the first entry must be the vehicle start.
/// Pass the end index as the last entry to validate a complete route.
pub(crate) fn schedule_route(
    model: &RoutingModel,
    dimension: DimensionId,
    vehicle: usize,
    route: &[i64],
) -> Option<RouteSchedule> {
    debug_assert!(!route.is_empty());
    let dim = &model.dimensions[dimension.0];
    let breaks = model.breaks.get(&vehicle).filter(|breaks| breaks.dimension == dimension);
    let capacity = dim.capacity.for_vehicle(vehicle);

    // a finalizer on the last cumul asks for the earliest feasible schedule;
    // without one any feasible schedule will do
    let minimize_end = route
        .last()
        .map_or(false, |&index| model.finalizers.iter().any(|var| var.dimension == dimension && var.index == index));

    let mut best: Option<RouteSchedule> = None;
    for candidate in start_candidates(model, dim, vehicle, route, breaks, capacity) {
        if let Some(schedule) = simulate(model, dim, vehicle, route, breaks, capacity, candidate) {
            let better = match &best {
                None => true,
                Some(current) => minimize_end && schedule.end_cumul() < current.end_cumul(),
            };
            if better {
                best = Some(schedule);
            }
        }
    }
    best
}

/// Start cumul values worth trying.
///
/// With `start_cumul_to_zero` the start is pinned. Otherwise the earliest
/// allowed start is tried along with every value that lines a later stop up
/// with one of its window edges, shifted back by the transit prefix and by
/// each prefix sum of break durations that may have been inserted on the way.
fn start_candidates(
    model: &RoutingModel,
    dim: &Dimension,
    vehicle: usize,
    route: &[i64],
    breaks: Option<&VehicleBreaks>,
    capacity: i64,
) -> Vec<i64> {
    if dim.start_cumul_to_zero {
        return vec![0];
    }

    let mut candidates = vec![];
    if let Some(earliest) = next_allowed(dim, route[0], 0, capacity) {
        candidates.push(earliest);
    }

    let mut break_prefixes = vec![0i64];
    if let Some(breaks) = breaks {
        let mut sum = 0;
        for interval in &breaks.intervals {
            sum += interval.duration;
            break_prefixes.push(sum);
        }
    }

    let mut prefix = 0i64;
    for window in 1..route.len() {
        prefix += model.transit(dim.transit, route[window - 1], route[window]);
        for edge in window_edges(dim, route[window]) {
            for shift in &break_prefixes {
                let candidate = edge - prefix - shift;
                if candidate >= 0 {
                    if let Some(start) = next_allowed(dim, route[0], candidate, capacity) {
                        candidates.push(start);
                    }
                }
            }
        }
    }

    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

/// Lower edges of the allowed set of `index`: the range minimum plus the first
/// value past each removed interval.
fn window_edges(dim: &Dimension, index: i64) -> Vec<i64> {
    let mut edges = vec![];
    if let Some(&(min, _)) = dim.ranges.get(&index) {
        edges.push(min.max(0));
    }
    if let Some(removed) = dim.removed.get(&index) {
        edges.extend(removed.iter().map(|&(_, max)| max.saturating_add(1)));
    }
    edges
}

/// Smallest allowed cumul value of `index` that is `>= value`, or `None` when
/// the allowed set is empty past `value`.
fn next_allowed(dim: &Dimension, index: i64, value: i64, capacity: i64) -> Option<i64> {
    let (min, max) = dim.ranges.get(&index).copied().unwrap_or((i64::MIN, i64::MAX));
    let hi = max.min(capacity);
    let mut value = value.max(min).max(0);
    if let Some(removed) = dim.removed.get(&index) {
        // intervals are few and unsorted; rescan until the value settles
        let mut moved = true;
        while moved {
            moved = false;
            for &(lo, up) in removed {
                if value >= lo && value <= up {
                    value = up.saturating_add(1);
                    moved = true;
                }
            }
        }
    }
    (value <= hi).then_some(value)
}

fn visit_duration(model: &RoutingModel, breaks: Option<&VehicleBreaks>, index: i64) -> i64 {
    breaks.map_or(0, |breaks| breaks.node_visit_transits[model.manager.index_to_node(index)])
}

/// Forward simulation from a fixed start cumul.
fn simulate(
    model: &RoutingModel,
    dim: &Dimension,
    _vehicle: usize,
    route: &[i64],
    breaks: Option<&VehicleBreaks>,
    capacity: i64,
    start: i64,
) -> Option<RouteSchedule> {
    // the start cumul must itself be allowed
    if next_allowed(dim, route[0], start, capacity) != Some(start) {
        return None;
    }

    let absolute: Vec<AbsoluteBreak> = breaks
        .map(|breaks| {
            let mut intervals: Vec<AbsoluteBreak> = breaks
                .intervals
                .iter()
                .map(|interval| AbsoluteBreak {
                    start: start + interval.start_offset,
                    end: start + interval.start_offset + interval.duration,
                })
                .collect();
            intervals.sort_unstable_by_key(|interval| interval.start);
            intervals
        })
        .unwrap_or_default();

    let mut cumuls = Vec::with_capacity(route.len());
    let mut now = start;
    if overlaps_visit(&absolute, now, visit_duration(model, breaks, route[0])) {
        return None;
    }
    cumuls.push(now);

    for window in 1..route.len() {
        let from = route[window - 1];
        let to = route[window];
        let transit = model.transit(dim.transit, from, to);
        let depart = now + visit_duration(model, breaks, from);

        // breaks overlapping the travel span extend the arc; iterate until the
        // arrival no longer pulls new breaks in
        let mut arrival = now + transit;
        loop {
            let mut interrupted = 0;
            for interval in &absolute {
                if interval.end > depart && interval.start < arrival {
                    if interval.start < depart {
                        // a break may not cut a node visit short
                        return None;
                    }
                    interrupted += interval.end - interval.start;
                }
            }
            let extended = now + transit + interrupted;
            if extended == arrival {
                break;
            }
            arrival = extended;
        }

        // waiting for a window is slack as well; a cumul never lands inside a
        // break, nor may the next visit overlap one
        let visit = if window + 1 < route.len() { visit_duration(model, breaks, to) } else { 0 };
        let mut cumul = next_allowed(dim, to, arrival, capacity)?;
        loop {
            let blocking = absolute.iter().find(|b| {
                if visit > 0 {
                    b.start < cumul + visit && b.end > cumul
                } else {
                    b.start < cumul && b.end > cumul
                }
            });
            match blocking {
                Some(interval) => cumul = next_allowed(dim, to, interval.end, capacity)?,
                None => break,
            }
        }

        if cumul - now - transit > dim.slack_max {
            return None;
        }
        now = cumul;
        cumuls.push(now);
    }

    Some(RouteSchedule { cumuls })
}

/// True when a break overlaps the visit `[at, at + duration)`.
fn overlaps_visit(breaks: &[AbsoluteBreak], at: i64, duration: i64) -> bool {
    if duration == 0 {
        return false;
    }
    breaks.iter().any(|interval| interval.start < at + duration && interval.end > at)
}
