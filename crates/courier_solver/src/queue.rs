use std::collections::VecDeque;

use crate::graph::NodeIdx;

/// FIFO backlog of unrouted package nodes.
///
/// Insertion order is the only ordering guarantee; callers that need a
/// different order sort before enqueueing. Used both as the master backlog
/// of a scheduling run and as the transient per-cluster queues during
/// k-means allocation.
#[derive(Debug, Clone, Default)]
pub struct NodeQueue {
    items: VecDeque<NodeIdx>,
}

impl NodeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, node: NodeIdx) {
        self.items.push_back(node);
    }

    /// Removes and returns the front node.
    pub fn dequeue(&mut self) -> Option<NodeIdx> {
        self.items.pop_front()
    }

    /// Inspects the front node without removing it.
    pub fn peek(&self) -> Option<NodeIdx> {
        self.peek_at(0)
    }

    /// Inspects the node `offset` positions behind the front without
    /// removing anything.
    pub fn peek_at(&self, offset: usize) -> Option<NodeIdx> {
        self.items.get(offset).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.items.iter().copied()
    }

    /// Removes and returns all queued nodes, front first.
    pub fn drain(&mut self) -> Vec<NodeIdx> {
        self.items.drain(..).collect()
    }
}

impl FromIterator<NodeIdx> for NodeQueue {
    fn from_iter<T: IntoIterator<Item = NodeIdx>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
