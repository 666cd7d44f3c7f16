use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::construction::{Construction, ConstructionContext};
use crate::graph::NodeIdx;
use crate::problem::vehicle::VehicleIdx;
use crate::queue::NodeQueue;
use crate::solution::{Route, Solution};

/// FIFO construction: oldest packages first, grouped by recipient address,
/// dealt to vehicles in rotation. Groups that fit nowhere are halved and
/// retried until they fit or shrink to single leftover nodes.
pub fn construct(ctx: &ConstructionContext<'_>) -> Construction {
    if ctx.graph.is_degenerate() || ctx.vehicles.is_empty() {
        return ctx.nothing_scheduled();
    }

    let mut routes: Vec<Route> = (0..ctx.vehicles.len())
        .map(|i| Route::new(VehicleIdx::new(i)))
        .collect();
    let mut backlog = NodeQueue::new();

    let mut pending: VecDeque<Vec<NodeIdx>> = address_groups(ctx);
    let mut cursor = 0usize;

    while let Some(group) = pending.pop_front() {
        let mut placed = false;

        for attempt in 0..routes.len() {
            let idx = (cursor + attempt) % routes.len();
            let vehicle = &ctx.vehicles[routes[idx].vehicle()];

            if routes[idx].can_fit_group(ctx.graph, vehicle, &group, ctx.profile, ctx.estimate) {
                for &node in &group {
                    routes[idx].push_stop(ctx.graph, node, ctx.profile, ctx.estimate);
                }
                cursor = (idx + 1) % routes.len();
                placed = true;
                break;
            }
        }

        if placed {
            continue;
        }

        if group.len() > 1 {
            let half = group.len().div_ceil(2);
            let (front, back) = group.split_at(half);
            pending.push_back(front.to_vec());
            pending.push_back(back.to_vec());
        } else {
            backlog.enqueue(group[0]);
        }
    }

    dedup_routes(&mut routes);

    for route in &mut routes {
        route.close(ctx.graph.depot());
        route.update_measurements(ctx.graph, ctx.profile, ctx.estimate);
    }

    debug!(
        routes = routes.iter().filter(|r| !r.is_empty()).count(),
        leftover = backlog.len(),
        "round-robin construction finished"
    );

    let unassigned = backlog.iter().collect();
    Construction {
        solution: Solution::new(routes, unassigned),
        backlog,
    }
}

/// Package nodes sorted oldest first, then grouped by identical recipient
/// address in first-seen order.
fn address_groups(ctx: &ConstructionContext<'_>) -> VecDeque<Vec<NodeIdx>> {
    let mut nodes: Vec<NodeIdx> = ctx.graph.package_nodes().collect();
    nodes.sort_by_key(|&n| ctx.graph.node(n).package_ref().map(|p| p.created_at()));

    let mut order: Vec<String> = Vec::new();
    let mut groups: FxHashMap<String, Vec<NodeIdx>> = FxHashMap::default();
    for node in nodes {
        let Some(package) = ctx.graph.node(node).package_ref() else {
            continue;
        };
        let address = package.recipient_address().to_owned();
        groups
            .entry(address.clone())
            .or_insert_with(|| {
                order.push(address);
                Vec::new()
            })
            .push(node);
    }

    order
        .into_iter()
        .filter_map(|address| groups.remove(&address))
        .collect()
}

/// A node appearing on two routes keeps its first occurrence only. This is
/// an invariant guard rather than an expected outcome.
fn dedup_routes(routes: &mut [Route]) {
    let mut seen: FxHashSet<NodeIdx> = FxHashSet::default();
    let duplicated = routes
        .iter()
        .flat_map(|route| route.stops().iter().copied())
        .any(|stop| !seen.insert(stop));
    if !duplicated {
        return;
    }

    debug!("duplicate stop detected across routes, keeping first occurrence");
    seen.clear();
    for route in routes.iter_mut() {
        route.retain_stops(|stop| seen.insert(stop));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeMode, Graph};
    use crate::problem::travel_estimate::TravelEstimate;
    use crate::test_utils;

    fn context<'a>(
        graph: &'a Graph,
        vehicles: &'a [crate::problem::vehicle::Vehicle],
        profile: &'a crate::problem::schedule_profile::ScheduleProfile,
        estimate: &'a TravelEstimate,
    ) -> ConstructionContext<'a> {
        ConstructionContext {
            graph,
            vehicles,
            profile,
            estimate,
        }
    }

    #[test]
    fn all_packages_scheduled_and_conserved() {
        let graph = test_utils::line_graph(6, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(2);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();

        let built = construct(&context(&graph, &vehicles, &profile, &estimate));

        assert!(built.backlog.is_empty());
        assert!(built.solution.conserves_packages(6));
        for route in built.solution.routes() {
            assert!(route.is_closed());
            assert_eq!(route.stops().first(), Some(&graph.depot()));
            assert_eq!(route.stops().last(), Some(&graph.depot()));
        }
    }

    #[test]
    fn vehicles_take_turns() {
        let graph = test_utils::line_graph(4, EdgeMode::Complete);
        let vehicles = test_utils::vehicles(2);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();

        let built = construct(&context(&graph, &vehicles, &profile, &estimate));

        // Four distinct addresses over two vehicles: two groups each.
        assert_eq!(built.solution.routes()[0].package_count(), 2);
        assert_eq!(built.solution.routes()[1].package_count(), 2);
    }

    #[test]
    fn oversized_address_group_is_split_until_it_fits() {
        // Five packages at one address, each vehicle holds two of them.
        let packages = (0..5).map(|_| test_utils::package_at(1.0, 1.0)).collect();
        let graph = Graph::build(packages, test_utils::DEPOT, EdgeMode::Complete, None);
        let vehicles: Vec<_> = (0..3)
            .map(|i| {
                crate::problem::vehicle::Vehicle::new(
                    format!("SPLIT-{i}"),
                    2.0 * test_utils::PACKAGE_WEIGHT,
                    2.0 * test_utils::PACKAGE_VOLUME,
                )
            })
            .collect();
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();

        let built = construct(&context(&graph, &vehicles, &profile, &estimate));

        assert!(built.backlog.is_empty());
        assert!(built.solution.conserves_packages(5));
        for route in built.solution.used_routes() {
            assert!(route.package_count() <= 2);
        }
    }

    #[test]
    fn every_route_prefix_stays_within_vehicle_bounds() {
        // Tight capacities so the prefix walk is load-bearing rather than
        // trivially satisfied.
        let packages = (0..7).map(|i| test_utils::package_at(i as f64, 0.0)).collect();
        let graph = Graph::build(packages, test_utils::DEPOT, EdgeMode::Complete, None);
        let vehicles: Vec<_> = (0..3)
            .map(|i| {
                crate::problem::vehicle::Vehicle::new(
                    format!("PREFIX-{i}"),
                    3.0 * test_utils::PACKAGE_WEIGHT,
                    3.0 * test_utils::PACKAGE_VOLUME,
                )
            })
            .collect();
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();

        let built = construct(&context(&graph, &vehicles, &profile, &estimate));

        assert!(built.solution.conserves_packages(7));
        for route in built.solution.used_routes() {
            let vehicle = &vehicles[route.vehicle()];
            for (weight, volume) in route.prefix_loads(&graph) {
                assert!(weight <= vehicle.max_load());
                assert!(volume <= vehicle.max_volume());
            }
        }
    }

    #[test]
    fn unfittable_single_node_lands_in_the_backlog() {
        let graph = test_utils::line_graph(2, EdgeMode::Complete);
        let vehicles = vec![crate::problem::vehicle::Vehicle::new(
            "TINY-1".to_owned(),
            1.5 * test_utils::PACKAGE_WEIGHT,
            100.0,
        )];
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();

        let built = construct(&context(&graph, &vehicles, &profile, &estimate));

        assert_eq!(built.solution.scheduled_package_count(), 1);
        assert_eq!(built.backlog.len(), 1);
        assert!(built.solution.conserves_packages(2));
    }

    #[test]
    fn degenerate_inputs_schedule_nothing() {
        let graph = test_utils::line_graph(3, EdgeMode::Complete);
        let profile = test_utils::profile();
        let estimate = TravelEstimate::default();

        let built = construct(&context(&graph, &[], &profile, &estimate));
        assert_eq!(built.solution.routes().len(), 0);
        assert_eq!(built.backlog.len(), 3);
    }
}
