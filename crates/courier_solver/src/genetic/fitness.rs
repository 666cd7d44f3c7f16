use crate::problem::schedule_profile::ScheduleProfile;
use crate::problem::vehicle::Vehicle;
use crate::solution::{Route, Solution};

/// Added once per violated constraint. Must dwarf any gain a single stop
/// move can produce so an infeasible candidate never beats a feasible one.
pub const CONSTRAINT_PENALTY: f64 = 500.0;

/// Cost of one route, lower is better: travel distance plus travel and
/// service time, with a penalty per violated constraint.
pub fn route_fitness(route: &Route, vehicle: &Vehicle, profile: &ScheduleProfile) -> f64 {
    let mut cost = route.est_distance_miles() + route.est_time_mins();

    if route.load_weight() > vehicle.max_load() {
        cost += CONSTRAINT_PENALTY;
    }
    if route.load_volume() > vehicle.max_volume() {
        cost += CONSTRAINT_PENALTY;
    }
    if route.est_time_mins() > Route::available_minutes(profile) {
        cost += CONSTRAINT_PENALTY;
    }

    cost
}

pub fn total_fitness(solution: &Solution, vehicles: &[Vehicle], profile: &ScheduleProfile) -> f64 {
    solution
        .routes()
        .iter()
        .map(|route| route_fitness(route, &vehicles[route.vehicle()], profile))
        .sum()
}
