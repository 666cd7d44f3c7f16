pub mod node;

use tracing::debug;

use crate::problem::location::LatLng;
use crate::problem::package::Package;

pub use node::{Node, NodeIdx};

/// Every package node is connected to this many nearest package nodes, plus
/// the depot.
pub const NEAREST_NEIGHBOR_EDGES: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeMode {
    /// Each package node connects to its nearest neighbours and the depot.
    Sparse,
    /// Every node pair is connected. Only sensible for small graphs.
    Complete,
}

/// An undirected weighted relation between two nodes, with the scaled
/// Euclidean cost precomputed at build time.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    a: NodeIdx,
    b: NodeIdx,
    cost: f64,
}

impl Edge {
    pub fn endpoints(&self) -> (NodeIdx, NodeIdx) {
        (self.a, self.b)
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The endpoint opposite `node`, if this edge touches it.
    pub fn other(&self, node: NodeIdx) -> Option<NodeIdx> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }
}

/// The routing network for one scheduling run: an index-addressed arena of
/// nodes (the depot plus one node per pending package) and a sparse edge
/// set. Routes reference nodes by [`NodeIdx`]; the graph stays immutable for
/// the duration of the run.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    depot: NodeIdx,
    distance_multiplier: Option<f64>,
}

impl Graph {
    /// Builds the graph from the pending package snapshot. The depot node is
    /// created first, before any edge, and is the only node without a
    /// package.
    pub fn build(
        packages: Vec<Package>,
        depot: LatLng,
        mode: EdgeMode,
        distance_multiplier: Option<f64>,
    ) -> Self {
        let mut nodes = Vec::with_capacity(packages.len() + 1);
        nodes.push(Node::depot(depot));
        let depot_idx = NodeIdx::new(0);

        for package in packages {
            nodes.push(Node::package(package));
        }

        let mut graph = Graph {
            nodes,
            edges: Vec::new(),
            depot: depot_idx,
            distance_multiplier,
        };
        graph.connect(mode);

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built routing graph"
        );

        graph
    }

    fn connect(&mut self, mode: EdgeMode) {
        match mode {
            EdgeMode::Complete => {
                for a in 0..self.nodes.len() {
                    for b in (a + 1)..self.nodes.len() {
                        self.push_edge(NodeIdx::new(a), NodeIdx::new(b));
                    }
                }
            }
            EdgeMode::Sparse => {
                let package_nodes: Vec<NodeIdx> = self.package_nodes().collect();

                for &node in &package_nodes {
                    self.push_edge(node, self.depot);

                    let mut distances: Vec<(NodeIdx, f64)> = package_nodes
                        .iter()
                        .filter(|&&other| other != node)
                        .map(|&other| (other, self.distance(node, other)))
                        .collect();
                    distances
                        .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

                    for &(neighbor, cost) in distances.iter().take(NEAREST_NEIGHBOR_EDGES) {
                        self.edges.push(Edge {
                            a: node,
                            b: neighbor,
                            cost,
                        });
                    }
                }
            }
        }
    }

    fn push_edge(&mut self, a: NodeIdx, b: NodeIdx) {
        let cost = self.distance(a, b);
        self.edges.push(Edge { a, b, cost });
    }

    pub fn depot(&self) -> NodeIdx {
        self.depot
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Indices of all package nodes, in insertion order.
    pub fn package_nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_depot())
            .map(|(i, _)| NodeIdx::new(i))
    }

    pub fn package_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Fewer than two nodes means there is nothing to schedule.
    pub fn is_degenerate(&self) -> bool {
        self.nodes.len() < 2
    }

    pub fn distance_multiplier(&self) -> Option<f64> {
        self.distance_multiplier
    }

    pub fn set_distance_multiplier(&mut self, multiplier: f64) {
        self.distance_multiplier = Some(multiplier);
        for edge in &mut self.edges {
            edge.cost = self.nodes[edge.a]
                .location()
                .distance_miles(&self.nodes[edge.b].location(), Some(multiplier));
        }
    }

    /// Scaled Euclidean miles between two nodes.
    pub fn distance(&self, a: NodeIdx, b: NodeIdx) -> f64 {
        self.nodes[a]
            .location()
            .distance_miles(&self.nodes[b].location(), self.distance_multiplier)
    }

    /// Sparse adjacency of one node: `(neighbour, cost)` pairs.
    pub fn neighbors(&self, node: NodeIdx) -> impl Iterator<Item = (NodeIdx, f64)> + '_ {
        self.edges
            .iter()
            .filter_map(move |edge| edge.other(node).map(|other| (other, edge.cost)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn depot_is_first_and_flagged() {
        let graph = test_utils::line_graph(4, EdgeMode::Sparse);

        assert_eq!(graph.depot(), NodeIdx::new(0));
        assert!(graph.node(graph.depot()).is_depot());
        assert_eq!(
            graph.nodes().iter().filter(|n| n.is_depot()).count(),
            1,
            "exactly one depot node"
        );
        assert_eq!(graph.package_count(), 4);
    }

    #[test]
    fn debug_output_names_the_arenas() {
        let graph = test_utils::line_graph(2, EdgeMode::Sparse);

        let rendered = format!("{graph:?}");
        assert!(rendered.contains("nodes"));
        assert!(rendered.contains("edges"));
    }

    #[test]
    fn sparse_mode_connects_to_depot_and_nearest_neighbors() {
        let graph = test_utils::line_graph(5, EdgeMode::Sparse);

        for node in graph.package_nodes() {
            let neighbors: std::collections::BTreeSet<NodeIdx> =
                graph.neighbors(node).map(|(n, _)| n).collect();
            assert!(
                neighbors.contains(&graph.depot()),
                "package node must connect to the depot"
            );
            // Fewer than NEAREST_NEIGHBOR_EDGES package nodes exist, so every
            // other node is a neighbour.
            assert_eq!(neighbors.len(), 5);
        }
    }

    #[test]
    fn complete_mode_connects_all_pairs() {
        let graph = test_utils::line_graph(3, EdgeMode::Complete);
        // 4 nodes -> C(4, 2) undirected edges.
        assert_eq!(graph.edges().len(), 6);
    }

    #[test]
    fn distance_applies_multiplier() {
        let mut graph = test_utils::line_graph(2, EdgeMode::Complete);
        let a = NodeIdx::new(1);
        let b = NodeIdx::new(2);

        let base = graph.distance(a, b);
        graph.set_distance_multiplier(1.5);
        assert!((graph.distance(a, b) - base * 1.5).abs() < 1e-9);
    }

    #[test]
    fn empty_package_list_is_degenerate() {
        let graph = test_utils::line_graph(0, EdgeMode::Sparse);
        assert!(graph.is_degenerate());
        assert_eq!(graph.edges().len(), 0);
    }
}
