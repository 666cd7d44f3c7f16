use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use jiff::Timestamp;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::info;

use courier_travel::provider::TravelProvider;

use crate::genetic::ProgressHandler;
use crate::graph::{EdgeMode, Graph};
use crate::hybrid::{self, HybridOutcome};
use crate::problem::location::LatLng;
use crate::problem::package::Package;
use crate::problem::schedule_profile::ScheduleProfile;
use crate::problem::travel_estimate::TravelEstimate;
use crate::problem::vehicle::Vehicle;

/// Below this many package nodes the graph is fully connected; larger runs
/// use the sparse nearest-neighbour edge set.
const COMPLETE_GRAPH_LIMIT: usize = 200;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SchedulerStatus {
    Pending,
    Running,
    Completed,
}

/// Everything one scheduling run consumes.
pub struct ScheduleRequest {
    pub packages: Vec<Package>,
    pub vehicles: Vec<Vehicle>,
    pub depot: LatLng,
    pub profile: ScheduleProfile,
    pub estimate: TravelEstimate,
    pub seed: Option<u64>,
}

/// Entry point for callers: owns the run's status and stop flag so an
/// interactive caller can cancel a long search from another task.
pub struct Scheduler {
    status: RwLock<SchedulerStatus>,
    is_stopped: Arc<AtomicBool>,
    on_progress: Option<ProgressHandler>,
    created_at: Timestamp,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            status: RwLock::new(SchedulerStatus::Pending),
            is_stopped: Arc::new(AtomicBool::new(false)),
            on_progress: None,
            created_at: Timestamp::now(),
        }
    }

    /// Registers a callback invoked with the generation number and fitness
    /// whenever the search finds a better schedule. Runs on the optimiser
    /// threads, so it must be quick.
    pub fn on_progress<F>(&mut self, callback: F)
    where
        F: FnMut(u64, f64) + Send + 'static,
    {
        self.on_progress = Some(Arc::new(Mutex::new(callback)));
    }

    pub fn status(&self) -> SchedulerStatus {
        *self.status.read()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Requests cancellation; the search honours it at the next generation
    /// boundary and still returns its best candidate so far.
    pub fn stop(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    pub async fn schedule(
        &self,
        request: ScheduleRequest,
        provider: Option<&TravelProvider>,
    ) -> HybridOutcome {
        *self.status.write() = SchedulerStatus::Running;
        info!(
            packages = request.packages.len(),
            vehicles = request.vehicles.len(),
            "scheduling run started"
        );

        let mode = if request.packages.len() <= COMPLETE_GRAPH_LIMIT {
            EdgeMode::Complete
        } else {
            EdgeMode::Sparse
        };
        let multiplier = request.estimate.distance_multiplier;
        let calibration = (multiplier != 1.0).then_some(multiplier);
        let graph = Graph::build(request.packages, request.depot, mode, calibration);

        let outcome = hybrid::run(
            &graph,
            &request.vehicles,
            &request.profile,
            &request.estimate,
            provider,
            &self.is_stopped,
            self.on_progress.as_ref(),
            request.seed,
        )
        .await;

        *self.status.write() = SchedulerStatus::Completed;
        info!(
            scheduled = outcome.report.scheduled_packages,
            unassigned = outcome.report.unassigned_packages,
            efficiency = outcome.report.overall_efficiency,
            "scheduling run completed"
        );
        outcome
    }
}
