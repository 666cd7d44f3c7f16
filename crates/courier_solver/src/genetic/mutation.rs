use rand::Rng;

use crate::construction::ConstructionContext;
use crate::solution::Route;

/// Structural perturbation of one route's stop order. Half the time a
/// random interior segment is reversed, otherwise a single stop is
/// relocated to another position. The depot anchors at both ends are never
/// touched.
pub fn mutate<R: Rng>(ctx: &ConstructionContext<'_>, route: &mut Route, rng: &mut R) {
    let mut stops = route.package_stops().to_vec();
    if stops.len() < 2 {
        return;
    }

    if rng.random_bool(0.5) {
        // Segment reversal.
        let start = rng.random_range(0..stops.len() - 1);
        let end = rng.random_range(start + 1..stops.len());
        stops[start..=end].reverse();
    } else {
        // Single stop relocation.
        let from = rng.random_range(0..stops.len());
        let stop = stops.remove(from);
        let to = rng.random_range(0..=stops.len());
        stops.insert(to, stop);
    }

    route.replace_package_stops(ctx.graph, stops, ctx.profile, ctx.estimate);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::graph::EdgeMode;
    use crate::problem::travel_estimate::TravelEstimate;
    use crate::problem::vehicle::VehicleIdx;
    use crate::test_utils;

    #[test]
    fn mutation_permutes_but_never_loses_stops() {
        let graph = test_utils::line_graph(6, EdgeMode::Complete);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();
        let ctx = ConstructionContext {
            graph: &graph,
            vehicles: &[],
            profile: &profile,
            estimate: &estimate,
        };

        let mut route = Route::new(VehicleIdx::new(0));
        for node in graph.package_nodes() {
            route.push_stop(&graph, node, &profile, &estimate);
        }
        route.close(graph.depot());
        let original: Vec<_> = route.package_stops().to_vec();

        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            mutate(&ctx, &mut route, &mut rng);

            let mut sorted = route.package_stops().to_vec();
            sorted.sort();
            let mut expected = original.clone();
            expected.sort();
            assert_eq!(sorted, expected);
            assert_eq!(route.stops().first(), Some(&graph.depot()));
            assert_eq!(route.stops().last(), Some(&graph.depot()));
        }
    }

    #[test]
    fn single_stop_routes_are_left_alone() {
        let graph = test_utils::line_graph(1, EdgeMode::Complete);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();
        let ctx = ConstructionContext {
            graph: &graph,
            vehicles: &[],
            profile: &profile,
            estimate: &estimate,
        };

        let mut route = Route::new(VehicleIdx::new(0));
        route.push_stop(
            &graph,
            graph.package_nodes().next().unwrap(),
            &profile,
            &estimate,
        );
        route.close(graph.depot());
        let before: Vec<_> = route.stops().to_vec();

        let mut rng = SmallRng::seed_from_u64(3);
        mutate(&ctx, &mut route, &mut rng);
        assert_eq!(route.stops(), before);
    }
}
