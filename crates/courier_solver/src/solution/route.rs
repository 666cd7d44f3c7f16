use crate::graph::{Graph, NodeIdx};
use crate::problem::schedule_profile::ScheduleProfile;
use crate::problem::travel_estimate::TravelEstimate;
use crate::problem::vehicle::{Vehicle, VehicleIdx};

/// Slack kept free inside the time window so a route is never planned right
/// up to the limit.
pub const TIME_WINDOW_SAFETY_MARGIN_HOURS: f64 = 0.25;

/// An ordered stop sequence for one vehicle.
///
/// While a route is open its stops are package nodes only; closing the route
/// puts the depot at the head and tail. Load and time accounting runs
/// alongside the stop list so feasibility checks are O(1) against the
/// running totals.
#[derive(Debug, Clone)]
pub struct Route {
    vehicle: VehicleIdx,
    stops: Vec<NodeIdx>,
    closed: bool,

    load_weight: f64,
    load_volume: f64,
    est_distance_miles: f64,
    est_time_mins: f64,

    actual_distance_miles: f64,
    actual_time_mins: f64,
    actual_reconciled: bool,
}

impl Route {
    pub fn new(vehicle: VehicleIdx) -> Self {
        Self {
            vehicle,
            stops: Vec::new(),
            closed: false,
            load_weight: 0.0,
            load_volume: 0.0,
            est_distance_miles: 0.0,
            est_time_mins: 0.0,
            actual_distance_miles: 0.0,
            actual_time_mins: 0.0,
            actual_reconciled: false,
        }
    }

    pub fn vehicle(&self) -> VehicleIdx {
        self.vehicle
    }

    pub fn stops(&self) -> &[NodeIdx] {
        &self.stops
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.package_count() == 0
    }

    /// Number of package stops (the depot head/tail never counts).
    pub fn package_count(&self) -> usize {
        if self.closed {
            self.stops.len().saturating_sub(2)
        } else {
            self.stops.len()
        }
    }

    /// Package stops in visit order, without the depot.
    pub fn package_stops(&self) -> &[NodeIdx] {
        if self.closed {
            &self.stops[1..self.stops.len() - 1]
        } else {
            &self.stops
        }
    }

    pub fn load_weight(&self) -> f64 {
        self.load_weight
    }

    pub fn load_volume(&self) -> f64 {
        self.load_volume
    }

    pub fn est_distance_miles(&self) -> f64 {
        self.est_distance_miles
    }

    pub fn est_time_mins(&self) -> f64 {
        self.est_time_mins
    }

    pub fn actual_reconciled(&self) -> bool {
        self.actual_reconciled
    }

    /// Real travel distance when reconciled, otherwise the Euclidean
    /// estimate.
    pub fn distance_miles(&self) -> f64 {
        if self.actual_reconciled {
            self.actual_distance_miles
        } else {
            self.est_distance_miles
        }
    }

    /// Real travel plus service time when reconciled, otherwise the
    /// estimate.
    pub fn duration_mins(&self) -> f64 {
        if self.actual_reconciled {
            self.actual_time_mins
        } else {
            self.est_time_mins
        }
    }

    /// Overwrites the route's actual metrics with real travel data.
    pub fn set_actual_travel(&mut self, distance_miles: f64, duration_mins: f64) {
        self.actual_distance_miles = distance_miles;
        self.actual_time_mins = duration_mins;
        self.actual_reconciled = true;
    }

    /// Minutes a route may spend inside the configured time window.
    pub fn available_minutes(profile: &ScheduleProfile) -> f64 {
        (profile.time_window_hours - TIME_WINDOW_SAFETY_MARGIN_HOURS) * 60.0
    }

    /// The stop new work would depart from: the last package stop, or the
    /// depot for an empty route. For a closed route this skips the depot
    /// tail so insertions extend the path, not the return leg.
    fn anchor(&self, graph: &Graph) -> NodeIdx {
        let interior = self.package_stops();
        interior.last().copied().unwrap_or_else(|| graph.depot())
    }

    /// Shared feasibility check for adding one node: weight, volume and the
    /// time window (with safety margin) must all hold.
    pub fn can_fit(
        &self,
        graph: &Graph,
        vehicle: &Vehicle,
        node: NodeIdx,
        profile: &ScheduleProfile,
        estimate: &TravelEstimate,
    ) -> bool {
        self.can_fit_group(graph, vehicle, std::slice::from_ref(&node), profile, estimate)
    }

    /// Group variant of the feasibility check: the whole group must fit
    /// both capacity bounds and the remaining time window when visited in
    /// sequence from the route's current anchor.
    pub fn can_fit_group(
        &self,
        graph: &Graph,
        vehicle: &Vehicle,
        nodes: &[NodeIdx],
        profile: &ScheduleProfile,
        estimate: &TravelEstimate,
    ) -> bool {
        let group_weight: f64 = nodes.iter().map(|&n| graph.node(n).weight()).sum();
        let group_volume: f64 = nodes.iter().map(|&n| graph.node(n).volume()).sum();

        if self.load_weight + group_weight > vehicle.max_load() {
            return false;
        }
        if self.load_volume + group_volume > vehicle.max_volume() {
            return false;
        }

        let mut time = self.est_time_mins;
        let mut from = self.anchor(graph);
        for &node in nodes {
            time += estimate.travel_minutes(graph.distance(from, node)) + profile.delivery_time_mins;
            from = node;
        }

        time <= Self::available_minutes(profile)
    }

    /// Appends a package stop to an open route, updating the running
    /// totals.
    pub fn push_stop(
        &mut self,
        graph: &Graph,
        node: NodeIdx,
        profile: &ScheduleProfile,
        estimate: &TravelEstimate,
    ) {
        debug_assert!(!self.closed, "cannot push onto a closed route");

        let from = self.anchor(graph);
        let leg = graph.distance(from, node);

        self.load_weight += graph.node(node).weight();
        self.load_volume += graph.node(node).volume();
        self.est_distance_miles += leg;
        self.est_time_mins += estimate.travel_minutes(leg) + profile.delivery_time_mins;
        self.stops.push(node);
    }

    /// Inserts a package stop before the depot tail of a closed route and
    /// recomputes the measurements.
    pub fn insert_stop(
        &mut self,
        graph: &Graph,
        node: NodeIdx,
        profile: &ScheduleProfile,
        estimate: &TravelEstimate,
    ) {
        debug_assert!(self.closed, "insert_stop targets closed routes");
        self.stops.insert(self.stops.len() - 1, node);
        self.update_measurements(graph, profile, estimate);
    }

    /// Replaces the interior package stops of a closed route.
    pub fn replace_package_stops(
        &mut self,
        graph: &Graph,
        stops: Vec<NodeIdx>,
        profile: &ScheduleProfile,
        estimate: &TravelEstimate,
    ) {
        debug_assert!(self.closed, "replace_package_stops targets closed routes");
        let tail = self.stops.len() - 1;
        self.stops.splice(1..tail, stops);
        self.update_measurements(graph, profile, estimate);
    }

    /// Drops stops rejected by the predicate. Measurements are left stale;
    /// callers recompute them afterwards.
    pub fn retain_stops(&mut self, mut keep: impl FnMut(NodeIdx) -> bool) {
        self.stops.retain(|&stop| keep(stop));
    }

    /// Closes the route: the depot becomes head and tail.
    pub fn close(&mut self, depot: NodeIdx) {
        if self.closed {
            return;
        }
        self.stops.insert(0, depot);
        self.stops.push(depot);
        self.closed = true;
    }

    /// Recomputes loads, distance and estimated time from scratch. The path
    /// always starts at the depot, whether or not the route is closed yet.
    pub fn update_measurements(
        &mut self,
        graph: &Graph,
        profile: &ScheduleProfile,
        estimate: &TravelEstimate,
    ) {
        self.load_weight = 0.0;
        self.load_volume = 0.0;
        self.est_distance_miles = 0.0;
        self.est_time_mins = 0.0;

        let mut from = graph.depot();
        let legs: &[NodeIdx] = if self.closed {
            &self.stops[1..]
        } else {
            &self.stops
        };

        for &stop in legs {
            let leg = graph.distance(from, stop);
            self.est_distance_miles += leg;
            self.est_time_mins += estimate.travel_minutes(leg);

            let node = graph.node(stop);
            if !node.is_depot() {
                self.load_weight += node.weight();
                self.load_volume += node.volume();
                self.est_time_mins += profile.delivery_time_mins;
            }
            from = stop;
        }
    }

    /// Whether the route as a whole honours both capacity bounds and the
    /// time window.
    pub fn is_feasible(&self, vehicle: &Vehicle, profile: &ScheduleProfile) -> bool {
        self.load_weight <= vehicle.max_load()
            && self.load_volume <= vehicle.max_volume()
            && self.est_time_mins <= Self::available_minutes(profile)
    }

    /// Cumulative `(weight, volume)` after each package stop; every prefix
    /// must stay within the vehicle's bounds.
    pub fn prefix_loads(&self, graph: &Graph) -> Vec<(f64, f64)> {
        let mut weight = 0.0;
        let mut volume = 0.0;
        self.package_stops()
            .iter()
            .map(|&stop| {
                weight += graph.node(stop).weight();
                volume += graph.node(stop).volume();
                (weight, volume)
            })
            .collect()
    }
}
