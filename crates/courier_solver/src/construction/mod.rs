pub mod kmeans;
pub mod nearest_neighbor;
pub mod round_robin;

use crate::graph::Graph;
use crate::problem::schedule_profile::ScheduleProfile;
use crate::problem::travel_estimate::TravelEstimate;
use crate::problem::vehicle::Vehicle;
use crate::queue::NodeQueue;
use crate::solution::Solution;

/// What an initialiser hands back: a closed-route solution and the backlog
/// of nodes it could not place. The backlog feeds straggler insertion
/// during genetic refinement.
#[derive(Debug, Clone)]
pub struct Construction {
    pub solution: Solution,
    pub backlog: NodeQueue,
}

/// Shared inputs for one construction pass.
#[derive(Debug, Clone, Copy)]
pub struct ConstructionContext<'a> {
    pub graph: &'a Graph,
    pub vehicles: &'a [Vehicle],
    pub profile: &'a ScheduleProfile,
    pub estimate: &'a TravelEstimate,
}

impl ConstructionContext<'_> {
    /// An empty result with every package node left unassigned. Returned
    /// when there is nothing to schedule or no fleet to schedule onto.
    pub fn nothing_scheduled(&self) -> Construction {
        let backlog: NodeQueue = self.graph.package_nodes().collect();
        Construction {
            solution: Solution::new(Vec::new(), backlog.iter().collect()),
            backlog,
        }
    }
}
