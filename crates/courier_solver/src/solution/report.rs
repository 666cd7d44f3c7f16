use serde::Serialize;
use uuid::Uuid;

use crate::graph::Graph;
use crate::problem::schedule_profile::{Initialiser, Optimiser, ScheduleProfile};
use crate::problem::travel_estimate::TravelEstimate;
use crate::problem::vehicle::Vehicle;
use crate::solution::efficiency::EfficiencyScores;
use crate::solution::vrp_solution::Solution;

/// One delivery stop in reporting order.
#[derive(Debug, Clone, Serialize)]
pub struct StopReport {
    pub package_id: Uuid,
    pub recipient_address: String,
    pub weight: f64,
    pub volume: f64,
}

/// One vehicle's planned route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub vehicle_id: Uuid,
    pub registration: String,
    pub stops: Vec<StopReport>,
    pub load_weight: f64,
    pub load_volume: f64,
    pub distance_miles: f64,
    pub duration_mins: f64,
    /// Whether distance and duration come from real travel data rather
    /// than the straight-line estimate.
    pub travel_reconciled: bool,
}

/// Score summary for a candidate the orchestrator considered but did not
/// select.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub initialiser: Initialiser,
    pub optimiser: Optimiser,
    pub overall_efficiency: f64,
    pub scores: EfficiencyScores,
}

/// The full outcome of a scheduling run, shaped for serialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub initialiser: Initialiser,
    pub optimiser: Optimiser,
    pub iterations: u64,

    pub distance_multiplier: Option<f64>,
    pub average_speed_mph: f64,
    pub time_window_hours: f64,
    pub delivery_time_mins: f64,
    pub driver_break_mins: f64,

    pub vehicles_available: usize,
    pub vehicles_used: usize,
    pub total_packages: usize,
    pub scheduled_packages: usize,
    pub unassigned_packages: usize,

    pub total_distance_miles: f64,
    pub total_duration_hours: f64,

    pub scores: EfficiencyScores,
    pub overall_efficiency: f64,

    pub routes: Vec<RouteReport>,
    pub other_solutions: Vec<CandidateReport>,
}

impl ScheduleReport {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        graph: &Graph,
        solution: &Solution,
        vehicles: &[Vehicle],
        profile: &ScheduleProfile,
        estimate: &TravelEstimate,
        initialiser: Initialiser,
        optimiser: Optimiser,
        iterations: u64,
        other_solutions: Vec<CandidateReport>,
    ) -> Self {
        let scores = EfficiencyScores::of(solution, vehicles);

        let routes = solution
            .used_routes()
            .map(|route| {
                let vehicle = &vehicles[route.vehicle()];
                let stops = route
                    .package_stops()
                    .iter()
                    .filter_map(|&stop| graph.node(stop).package_ref())
                    .map(|package| StopReport {
                        package_id: package.id(),
                        recipient_address: package.recipient_address().to_owned(),
                        weight: package.weight(),
                        volume: package.volume(),
                    })
                    .collect();

                RouteReport {
                    vehicle_id: vehicle.id(),
                    registration: vehicle.registration().to_owned(),
                    stops,
                    load_weight: route.load_weight(),
                    load_volume: route.load_volume(),
                    distance_miles: route.distance_miles(),
                    duration_mins: route.duration_mins(),
                    travel_reconciled: route.actual_reconciled(),
                }
            })
            .collect();

        Self {
            initialiser,
            optimiser,
            iterations,
            distance_multiplier: graph.distance_multiplier(),
            average_speed_mph: estimate.average_speed_mph,
            time_window_hours: profile.time_window_hours,
            delivery_time_mins: profile.delivery_time_mins,
            driver_break_mins: profile.driver_break_mins,
            vehicles_available: vehicles.len(),
            vehicles_used: solution.used_vehicle_count(),
            total_packages: graph.package_count(),
            scheduled_packages: solution.scheduled_package_count(),
            unassigned_packages: solution.unassigned().len(),
            total_distance_miles: solution.total_distance_miles(),
            total_duration_hours: solution.total_duration_mins() / 60.0,
            overall_efficiency: scores.overall(),
            scores,
            routes,
            other_solutions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeMode;
    use crate::problem::vehicle::VehicleIdx;
    use crate::solution::route::Route;
    use crate::test_utils;

    #[test]
    fn report_counts_match_the_solution() {
        let graph = test_utils::line_graph(3, EdgeMode::Complete);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();
        let vehicles = test_utils::vehicles(2);
        let nodes: Vec<_> = graph.package_nodes().collect();

        let mut route = Route::new(VehicleIdx::new(0));
        route.push_stop(&graph, nodes[0], &profile, &estimate);
        route.push_stop(&graph, nodes[1], &profile, &estimate);
        let solution = Solution::new(
            vec![route, Route::new(VehicleIdx::new(1))],
            vec![nodes[2]],
        );

        let report = ScheduleReport::build(
            &graph,
            &solution,
            &vehicles,
            &profile,
            &estimate,
            Initialiser::RoundRobin,
            Optimiser::None,
            0,
            Vec::new(),
        );

        assert_eq!(report.vehicles_available, 2);
        assert_eq!(report.vehicles_used, 1);
        assert_eq!(report.total_packages, 3);
        assert_eq!(report.scheduled_packages, 2);
        assert_eq!(report.unassigned_packages, 1);
        assert_eq!(report.routes.len(), 1);
        assert_eq!(report.routes[0].stops.len(), 2);
        assert_eq!(report.routes[0].registration, "VAN-0");
    }
}
