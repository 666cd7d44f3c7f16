use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

use crate::construction::ConstructionContext;
use crate::genetic::fitness;
use crate::queue::NodeQueue;
use crate::solution::Solution;

/// Extra cost a straggler insertion may add before it is rolled back. Just
/// under one constraint penalty, so an insertion that breaks a constraint
/// is always rejected while any feasible placement is accepted.
pub const ACCEPTANCE_TOLERANCE: f64 = 499.0;

/// Tries to fold one backlog node back into the candidate. Routes are
/// probed in shuffled order; the first feasible placement is kept when the
/// total fitness does not rise by more than [`ACCEPTANCE_TOLERANCE`]. On
/// rejection the node rotates to the back of the queue so later attempts
/// try its siblings first. Returns whether a node was placed.
pub fn insert_straggler<R: Rng>(
    ctx: &ConstructionContext<'_>,
    best: &mut Solution,
    backlog: &mut NodeQueue,
    rng: &mut R,
) -> bool {
    let Some(node) = backlog.peek() else {
        return false;
    };

    let before = fitness::total_fitness(best, ctx.vehicles, ctx.profile);
    let mut candidate = best.clone();

    let mut order: Vec<usize> = (0..candidate.routes().len()).collect();
    order.shuffle(rng);

    let mut placed = false;
    for idx in order {
        let route = &mut candidate.routes_mut()[idx];
        if !route.is_closed() {
            continue;
        }
        route.update_measurements(ctx.graph, ctx.profile, ctx.estimate);

        let vehicle = &ctx.vehicles[route.vehicle()];
        if route.can_fit(ctx.graph, vehicle, node, ctx.profile, ctx.estimate) {
            route.insert_stop(ctx.graph, node, ctx.profile, ctx.estimate);
            placed = true;
            break;
        }
    }

    backlog.dequeue();
    if !placed {
        backlog.enqueue(node);
        return false;
    }

    let after = fitness::total_fitness(&candidate, ctx.vehicles, ctx.profile);
    if after - before > ACCEPTANCE_TOLERANCE {
        trace!(node = %node, cost = after - before, "straggler insertion rolled back");
        backlog.enqueue(node);
        return false;
    }

    let remaining = candidate
        .unassigned()
        .iter()
        .copied()
        .filter(|&n| n != node)
        .collect();
    candidate.set_unassigned(remaining);
    *best = candidate;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::graph::EdgeMode;
    use crate::problem::travel_estimate::TravelEstimate;
    use crate::problem::vehicle::VehicleIdx;
    use crate::solution::Route;
    use crate::test_utils;

    #[test]
    fn nearby_straggler_is_absorbed() {
        let graph = test_utils::line_graph(4, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(1);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();
        let ctx = ConstructionContext {
            graph: &graph,
            vehicles: &vehicles,
            profile: &profile,
            estimate: &estimate,
        };
        let nodes: Vec<_> = graph.package_nodes().collect();

        let mut route = Route::new(VehicleIdx::new(0));
        for &node in &nodes[..3] {
            route.push_stop(&graph, node, &profile, &estimate);
        }
        route.close(graph.depot());
        let mut best = Solution::new(vec![route], vec![nodes[3]]);
        let mut backlog: NodeQueue = [nodes[3]].into_iter().collect();

        let mut rng = SmallRng::seed_from_u64(5);
        assert!(insert_straggler(&ctx, &mut best, &mut backlog, &mut rng));
        assert!(backlog.is_empty());
        assert_eq!(best.scheduled_package_count(), 4);
        assert_eq!(best.routes()[0].package_stops().last(), Some(&nodes[3]));
        assert!(best.conserves_packages(4));
    }

    #[test]
    fn overweight_straggler_rotates_back_into_the_queue() {
        let graph = test_utils::line_graph(3, EdgeMode::Complete);
        let vehicles = vec![crate::problem::vehicle::Vehicle::new(
            "STRAG-1".to_owned(),
            2.0 * test_utils::PACKAGE_WEIGHT,
            100.0,
        )];
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();
        let ctx = ConstructionContext {
            graph: &graph,
            vehicles: &vehicles,
            profile: &profile,
            estimate: &estimate,
        };
        let nodes: Vec<_> = graph.package_nodes().collect();

        let mut route = Route::new(VehicleIdx::new(0));
        for &node in &nodes[..2] {
            route.push_stop(&graph, node, &profile, &estimate);
        }
        route.close(graph.depot());
        let mut best = Solution::new(vec![route], vec![nodes[2]]);
        let mut backlog: NodeQueue = [nodes[2]].into_iter().collect();

        let mut rng = SmallRng::seed_from_u64(5);
        assert!(!insert_straggler(&ctx, &mut best, &mut backlog, &mut rng));
        assert_eq!(backlog.len(), 1);
        assert_eq!(best.scheduled_package_count(), 2);
    }
}
