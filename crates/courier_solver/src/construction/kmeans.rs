use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::construction::nearest_neighbor;
use crate::construction::{Construction, ConstructionContext};
use crate::graph::{Graph, NodeIdx};
use crate::problem::location::LatLng;
use crate::problem::vehicle::VehicleIdx;
use crate::queue::NodeQueue;
use crate::solution::{Route, Solution};

const MAX_ITERATIONS: usize = 100;
const MAX_RESTARTS: usize = 10;

/// A rescued backlog node may not cost more than this multiple of the
/// target route's average per-stop travel time.
const RESCUE_COST_FACTOR: f64 = 3.0;

/// Clustering construction: partition package nodes into one cluster per
/// vehicle by location, greedily fill each cluster's vehicle, rescue what
/// the clusters rejected, then re-sequence every route as a
/// nearest-neighbour path.
pub fn construct<R: Rng>(ctx: &ConstructionContext<'_>, rng: &mut R) -> Construction {
    if ctx.graph.is_degenerate() || ctx.vehicles.is_empty() {
        return ctx.nothing_scheduled();
    }

    let nodes: Vec<NodeIdx> = ctx.graph.package_nodes().collect();
    let k = ctx.vehicles.len().min(nodes.len());
    let clusters = cluster(ctx.graph, &nodes, k, rng);

    let mut routes: Vec<Route> = (0..ctx.vehicles.len())
        .map(|i| Route::new(VehicleIdx::new(i)))
        .collect();
    let mut master = NodeQueue::new();

    // Greedy fill: each cluster feeds its own vehicle through a transient
    // queue; rejected nodes fall through to the shared master backlog.
    for (i, cluster_nodes) in clusters.into_iter().enumerate() {
        let mut queue: NodeQueue = cluster_nodes.into_iter().collect();
        let vehicle = &ctx.vehicles[routes[i].vehicle()];

        while let Some(node) = queue.peek() {
            queue.dequeue();
            if routes[i].can_fit(ctx.graph, vehicle, node, ctx.profile, ctx.estimate) {
                routes[i].push_stop(ctx.graph, node, ctx.profile, ctx.estimate);
            } else {
                master.enqueue(node);
            }
        }
    }

    let backlog = rescue_backlog(ctx, &mut routes, master);

    // Cluster membership says nothing about visit order, so rebuild every
    // route as a nearest-neighbour path before closing it.
    let routes = routes
        .into_iter()
        .map(|route| {
            let ordered = nearest_neighbor::sequence(ctx.graph, route.package_stops());
            let mut rebuilt = Route::new(route.vehicle());
            for node in ordered {
                rebuilt.push_stop(ctx.graph, node, ctx.profile, ctx.estimate);
            }
            rebuilt.close(ctx.graph.depot());
            rebuilt.update_measurements(ctx.graph, ctx.profile, ctx.estimate);
            rebuilt
        })
        .collect();

    let unassigned = backlog.iter().collect();
    Construction {
        solution: Solution::new(routes, unassigned),
        backlog,
    }
}

/// Lloyd's algorithm with shuffled seeding. An empty cluster triggers a
/// full restart from a fresh shuffle; after the restart cap the nodes are
/// dealt out round-robin instead, which always yields `k` non-empty
/// clusters for `k <= nodes.len()`.
fn cluster<R: Rng>(
    graph: &Graph,
    nodes: &[NodeIdx],
    k: usize,
    rng: &mut R,
) -> Vec<Vec<NodeIdx>> {
    for restart in 0..MAX_RESTARTS {
        let mut shuffled = nodes.to_vec();
        shuffled.shuffle(rng);

        let mut centroids: Vec<LatLng> = shuffled
            .iter()
            .take(k)
            .map(|&n| graph.node(n).location())
            .collect();

        let mut clusters: Vec<Vec<NodeIdx>> = vec![Vec::new(); k];
        for _ in 0..MAX_ITERATIONS {
            for cluster_nodes in &mut clusters {
                cluster_nodes.clear();
            }
            for &node in &shuffled {
                let location = graph.node(node).location();
                let nearest = centroids
                    .iter()
                    .enumerate()
                    .min_by(|a, b| {
                        location
                            .planar_distance(a.1)
                            .total_cmp(&location.planar_distance(b.1))
                    })
                    .map(|(i, _)| i)
                    .unwrap_or_default();
                clusters[nearest].push(node);
            }

            let mut moved = false;
            for (centroid, cluster_nodes) in centroids.iter_mut().zip(&clusters) {
                if cluster_nodes.is_empty() {
                    continue;
                }
                let updated = mean_location(graph, cluster_nodes);
                if updated != *centroid {
                    *centroid = updated;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }

        if clusters.iter().all(|c| !c.is_empty()) {
            return clusters;
        }
        debug!(restart, "clustering produced an empty cluster, reshuffling");
    }

    debug!("clustering restarts exhausted, dealing nodes out evenly");
    let mut dealt: Vec<Vec<NodeIdx>> = vec![Vec::new(); k];
    for (i, &node) in nodes.iter().enumerate() {
        dealt[i % k].push(node);
    }
    dealt
}

fn mean_location(graph: &Graph, nodes: &[NodeIdx]) -> LatLng {
    let n = nodes.len() as f64;
    let (lat, lng) = nodes.iter().fold((0.0, 0.0), |(lat, lng), &node| {
        let loc = graph.node(node).location();
        (lat + loc.lat, lng + loc.lng)
    });
    LatLng::new(lat / n, lng / n)
}

/// Second chance for nodes the clusters rejected: try routes nearest to the
/// node first, skipping any route where the marginal leg would cost more
/// than [`RESCUE_COST_FACTOR`] times its current per-stop average.
fn rescue_backlog(
    ctx: &ConstructionContext<'_>,
    routes: &mut [Route],
    mut master: NodeQueue,
) -> NodeQueue {
    let mut leftovers = NodeQueue::new();

    while let Some(node) = master.dequeue() {
        let location = ctx.graph.node(node).location();

        let mut candidates: Vec<usize> = (0..routes.len()).collect();
        candidates.sort_by(|&a, &b| {
            route_distance(ctx.graph, &routes[a], &location)
                .total_cmp(&route_distance(ctx.graph, &routes[b], &location))
        });

        let mut rescued = false;
        for idx in candidates {
            let route = &routes[idx];
            let vehicle = &ctx.vehicles[route.vehicle()];

            if !route.can_fit(ctx.graph, vehicle, node, ctx.profile, ctx.estimate) {
                continue;
            }
            if exceeds_marginal_cost(ctx, route, node) {
                continue;
            }

            routes[idx].push_stop(ctx.graph, node, ctx.profile, ctx.estimate);
            rescued = true;
            break;
        }

        if !rescued {
            leftovers.enqueue(node);
        }
    }

    leftovers
}

/// Planar distance from a point to a route's centroid. Empty routes sort
/// last.
fn route_distance(graph: &Graph, route: &Route, location: &LatLng) -> f64 {
    if route.is_empty() {
        return f64::MAX;
    }
    location.planar_distance(&mean_location(graph, route.package_stops()))
}

fn exceeds_marginal_cost(ctx: &ConstructionContext<'_>, route: &Route, node: NodeIdx) -> bool {
    let count = route.package_count();
    if count == 0 {
        return false;
    }

    let anchor = route.package_stops().last().copied().unwrap_or_default();
    let marginal = ctx
        .estimate
        .travel_minutes(ctx.graph.distance(anchor, node));
    let average = route.est_time_mins() / count as f64;

    marginal > RESCUE_COST_FACTOR * average
}
