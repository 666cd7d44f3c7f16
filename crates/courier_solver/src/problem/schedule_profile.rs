use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimisationProfile {
    Eco,
    Space,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initialiser {
    RoundRobin,
    KMeans,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Optimiser {
    None,
    Genetic,
}

/// Which initialiser/optimiser combinations a run considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Strategy {
    /// All four combinations, best overall efficiency wins.
    #[default]
    Hybrid,
    /// One pinned combination, no alternatives.
    Fixed {
        initialiser: Initialiser,
        optimiser: Optimiser,
    },
}

/// Configuration for one scheduling run. Omitted fields deserialize to the
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleProfile {
    pub optimisation_profile: OptimisationProfile,

    pub strategy: Strategy,

    /// Maximum elapsed hours allowed for a vehicle's entire route.
    pub time_window_hours: f64,

    /// Estimated time to hand over one parcel, in minutes.
    pub delivery_time_mins: f64,

    /// Driver break budget in minutes, carried through to reports.
    pub driver_break_mins: f64,

    /// When set, the orchestrator selects the minimum vehicle prefix
    /// projected to cover the pending demand before scheduling.
    pub auto_vehicle_selection: bool,

    /// Generation budget for the genetic optimiser.
    pub generations: u64,
}

impl Default for ScheduleProfile {
    fn default() -> Self {
        Self {
            optimisation_profile: OptimisationProfile::Eco,
            strategy: Strategy::default(),
            time_window_hours: 8.0,
            delivery_time_mins: 3.0,
            driver_break_mins: 30.0,
            auto_vehicle_selection: false,
            generations: 1_000_000,
        }
    }
}
