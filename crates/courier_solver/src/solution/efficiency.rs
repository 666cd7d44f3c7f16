use serde::Serialize;

use crate::problem::vehicle::Vehicle;
use crate::solution::vrp_solution::Solution;

/// Scores comparing candidate schedules to each other. Each score is a
/// ratio scaled by 100; higher is better throughout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EfficiencyScores {
    /// Packages delivered per minute of driving and service time.
    pub time_efficiency: f64,
    /// Packages delivered per mile driven.
    pub distance_efficiency: f64,
    /// Share of the used vehicles' weight capacity that is carried.
    pub weight_utilisation: f64,
    /// Share of the used vehicles' volume capacity that is carried.
    pub volume_utilisation: f64,
}

impl EfficiencyScores {
    pub fn of(solution: &Solution, vehicles: &[Vehicle]) -> Self {
        let scheduled = solution.scheduled_package_count() as f64;

        let max_load: f64 = solution
            .used_routes()
            .map(|route| vehicles[route.vehicle()].max_load())
            .sum();
        let max_volume: f64 = solution
            .used_routes()
            .map(|route| vehicles[route.vehicle()].max_volume())
            .sum();

        Self {
            time_efficiency: ratio(scheduled, solution.total_duration_mins()),
            distance_efficiency: ratio(scheduled, solution.total_distance_miles()),
            weight_utilisation: ratio(solution.total_load_weight(), max_load),
            volume_utilisation: ratio(solution.total_load_volume(), max_volume),
        }
    }

    /// Equal-weight mean of the four scores, used to rank candidates.
    pub fn overall(&self) -> f64 {
        (self.time_efficiency
            + self.distance_efficiency
            + self.weight_utilisation
            + self.volume_utilisation)
            / 4.0
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}
