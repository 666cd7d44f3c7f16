use rand::Rng;

use crate::construction::ConstructionContext;
use crate::graph::NodeIdx;
use crate::solution::Solution;

/// Exchanges a contiguous stop segment between two randomly chosen routes.
/// The swap is committed only when both resulting routes stay feasible;
/// otherwise the solution is left untouched. Returns whether a swap took
/// place.
pub fn crossover<R: Rng>(
    ctx: &ConstructionContext<'_>,
    solution: &mut Solution,
    rng: &mut R,
) -> bool {
    let loaded: Vec<usize> = solution
        .routes()
        .iter()
        .enumerate()
        .filter(|(_, route)| !route.is_empty())
        .map(|(i, _)| i)
        .collect();
    if loaded.len() < 2 {
        return false;
    }

    let a = loaded[rng.random_range(0..loaded.len())];
    let b = loop {
        let candidate = loaded[rng.random_range(0..loaded.len())];
        if candidate != a {
            break candidate;
        }
    };

    let (segment_a, range_a) = random_segment(solution.routes()[a].package_stops(), rng);
    let (segment_b, range_b) = random_segment(solution.routes()[b].package_stops(), rng);

    let stops_a = splice(solution.routes()[a].package_stops(), range_a, &segment_b);
    let stops_b = splice(solution.routes()[b].package_stops(), range_b, &segment_a);

    let mut candidate_a = solution.routes()[a].clone();
    let mut candidate_b = solution.routes()[b].clone();
    candidate_a.replace_package_stops(ctx.graph, stops_a, ctx.profile, ctx.estimate);
    candidate_b.replace_package_stops(ctx.graph, stops_b, ctx.profile, ctx.estimate);

    let feasible = candidate_a.is_feasible(&ctx.vehicles[candidate_a.vehicle()], ctx.profile)
        && candidate_b.is_feasible(&ctx.vehicles[candidate_b.vehicle()], ctx.profile);
    if !feasible {
        return false;
    }

    solution.routes_mut()[a] = candidate_a;
    solution.routes_mut()[b] = candidate_b;
    true
}

/// A random non-empty contiguous slice of the stops, returned with its
/// index range.
fn random_segment<R: Rng>(stops: &[NodeIdx], rng: &mut R) -> (Vec<NodeIdx>, (usize, usize)) {
    let start = rng.random_range(0..stops.len());
    let end = rng.random_range(start..stops.len()) + 1;
    (stops[start..end].to_vec(), (start, end))
}

fn splice(stops: &[NodeIdx], (start, end): (usize, usize), replacement: &[NodeIdx]) -> Vec<NodeIdx> {
    let mut spliced = Vec::with_capacity(stops.len() - (end - start) + replacement.len());
    spliced.extend_from_slice(&stops[..start]);
    spliced.extend_from_slice(replacement);
    spliced.extend_from_slice(&stops[end..]);
    spliced
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
    fn swap_preserves_package_conservation() {
        let graph = test_utils::line_graph(8, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(2);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();
        let ctx = ConstructionContext {
            graph: &graph,
            vehicles: &vehicles,
            profile: &profile,
            estimate: &estimate,
        };
        let nodes: Vec<_> = graph.package_nodes().collect();

        let mut routes = vec![
            Route::new(VehicleIdx::new(0)),
            Route::new(VehicleIdx::new(1)),
        ];
        for &node in &nodes[..4] {
            routes[0].push_stop(&graph, node, &profile, &estimate);
        }
        for &node in &nodes[4..] {
            routes[1].push_stop(&graph, node, &profile, &estimate);
        }
        for route in &mut routes {
            route.close(graph.depot());
        }
        let mut solution = Solution::new(routes, Vec::new());

        let mut rng = SmallRng::seed_from_u64(11);
        let mut swapped = false;
        for _ in 0..50 {
            swapped |= crossover(&ctx, &mut solution, &mut rng);
            assert!(solution.conserves_packages(8));
            for route in solution.routes() {
                assert!(route.is_closed());
                assert!(route.is_feasible(&vehicles[route.vehicle()], &profile));
            }
        }
        assert!(swapped);
    }

    #[test]
    fn single_route_never_crosses() {
        let graph = test_utils::line_graph(3, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(1);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();
        let ctx = ConstructionContext {
            graph: &graph,
            vehicles: &vehicles,
            profile: &profile,
            estimate: &estimate,
        };

        let mut route = Route::new(VehicleIdx::new(0));
        for node in graph.package_nodes() {
            route.push_stop(&graph, node, &profile, &estimate);
        }
        route.close(graph.depot());
        let mut solution = Solution::new(vec![route], Vec::new());

        let mut rng = SmallRng::seed_from_u64(11);
        assert!(!crossover(&ctx, &mut solution, &mut rng));
    }
}
