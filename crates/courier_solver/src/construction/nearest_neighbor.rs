use crate::graph::{Graph, NodeIdx};

/// Orders an unordered stop set as a greedy nearest-neighbour path from the
/// depot. Sparse adjacency is consulted first; when none of the current
/// node's neighbours remain unvisited the scan falls back to the full
/// remaining set. Deterministic and non-optimal, which is fine because the
/// genetic pass refines the order afterwards.
pub fn sequence(graph: &Graph, stops: &[NodeIdx]) -> Vec<NodeIdx> {
    let mut remaining: Vec<NodeIdx> = stops.to_vec();
    let mut path = Vec::with_capacity(remaining.len());
    let mut current = graph.depot();

    while !remaining.is_empty() {
        let next = nearest_adjacent(graph, current, &remaining)
            .unwrap_or_else(|| nearest_by_scan(graph, current, &remaining));

        let pos = remaining
            .iter()
            .position(|&n| n == next)
            .unwrap_or_default();
        remaining.swap_remove(pos);
        path.push(next);
        current = next;
    }

    path
}

fn nearest_adjacent(graph: &Graph, from: NodeIdx, remaining: &[NodeIdx]) -> Option<NodeIdx> {
    graph
        .neighbors(from)
        .filter(|(node, _)| remaining.contains(node))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(node, _)| node)
}

fn nearest_by_scan(graph: &Graph, from: NodeIdx, remaining: &[NodeIdx]) -> NodeIdx {
    remaining
        .iter()
        .copied()
        .min_by(|&a, &b| graph.distance(from, a).total_cmp(&graph.distance(from, b)))
        .unwrap_or(from)
}
