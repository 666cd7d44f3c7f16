use fxhash::FxHashSet;

use crate::graph::NodeIdx;
use crate::solution::route::Route;

/// One complete assignment of package nodes to vehicle routes, plus the
/// nodes no route could take.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    routes: Vec<Route>,
    unassigned: Vec<NodeIdx>,
}

impl Solution {
    pub fn new(routes: Vec<Route>, unassigned: Vec<NodeIdx>) -> Self {
        Self { routes, unassigned }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut [Route] {
        &mut self.routes
    }

    pub fn unassigned(&self) -> &[NodeIdx] {
        &self.unassigned
    }

    pub fn set_unassigned(&mut self, unassigned: Vec<NodeIdx>) {
        self.unassigned = unassigned;
    }

    /// Routes that actually carry at least one package.
    pub fn used_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn used_vehicle_count(&self) -> usize {
        self.used_routes().count()
    }

    pub fn scheduled_package_count(&self) -> usize {
        self.routes.iter().map(Route::package_count).sum()
    }

    pub fn total_distance_miles(&self) -> f64 {
        self.used_routes().map(Route::distance_miles).sum()
    }

    pub fn total_duration_mins(&self) -> f64 {
        self.used_routes().map(Route::duration_mins).sum()
    }

    pub fn total_load_weight(&self) -> f64 {
        self.used_routes().map(Route::load_weight).sum()
    }

    pub fn total_load_volume(&self) -> f64 {
        self.used_routes().map(Route::load_volume).sum()
    }

    /// Every package node appears exactly once, either on a route or in the
    /// unassigned set.
    pub fn conserves_packages(&self, expected: usize) -> bool {
        let mut seen: FxHashSet<NodeIdx> = FxHashSet::default();
        for route in &self.routes {
            for &stop in route.package_stops() {
                if !seen.insert(stop) {
                    return false;
                }
            }
        }
        for &node in &self.unassigned {
            if !seen.insert(node) {
                return false;
            }
        }
        seen.len() == expected
    }
}
