//! Open-node container for B&B tree exploration.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::SearchNode;
use crate::settings::NodeSelection;

/// Heap entry ordered by lowest dual bound, then lowest id.
struct QueuedNode(SearchNode);

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the smaller bound must compare greater
        other
            .0
            .dual_bound
            .total_cmp(&self.0.dual_bound)
            .then_with(|| other.0.id.cmp(&self.0.id))
    }
}

enum Storage {
    Stack(Vec<SearchNode>),
    Heap(BinaryHeap<QueuedNode>),
}

/// Open nodes of the B&B tree.
///
/// Depth-first selection is a plain LIFO stack: the last child pushed is
/// the next node popped.
pub struct NodeQueue {
    storage: Storage,
}

impl NodeQueue {
    /// Create a new node queue with the given strategy.
    pub fn new(strategy: NodeSelection) -> Self {
        let storage = match strategy {
            NodeSelection::DepthFirst => Storage::Stack(Vec::new()),
            NodeSelection::BestBound => Storage::Heap(BinaryHeap::new()),
        };
        Self { storage }
    }

    /// Add a node to the queue.
    pub fn push(&mut self, node: SearchNode) {
        match &mut self.storage {
            Storage::Stack(stack) => stack.push(node),
            Storage::Heap(heap) => heap.push(QueuedNode(node)),
        }
    }

    /// Get the next node to process.
    pub fn pop(&mut self) -> Option<SearchNode> {
        match &mut self.storage {
            Storage::Stack(stack) => stack.pop(),
            Storage::Heap(heap) => heap.pop().map(|q| q.0),
        }
    }

    /// Get the best (lowest) dual bound across all open nodes.
    ///
    /// `+inf` when the queue is empty.
    pub fn best_bound(&self) -> f64 {
        match &self.storage {
            Storage::Stack(stack) => stack
                .iter()
                .map(|n| n.dual_bound)
                .fold(f64::INFINITY, f64::min),
            Storage::Heap(heap) => heap.peek().map_or(f64::INFINITY, |q| q.0.dual_bound),
        }
    }

    /// Drop nodes whose bound cannot beat `incumbent_obj` by more than `tol`.
    ///
    /// Returns the number of pruned nodes.
    pub fn prune_by_bound(&mut self, incumbent_obj: f64, tol: f64) -> usize {
        let before = self.len();
        match &mut self.storage {
            Storage::Stack(stack) => stack.retain(|n| !n.can_prune(incumbent_obj, tol)),
            Storage::Heap(heap) => heap.retain(|q| !q.0.can_prune(incumbent_obj, tol)),
        }
        before - self.len()
    }

    /// Remove and return every open node, in pop order.
    pub fn drain(&mut self) -> Vec<SearchNode> {
        let mut nodes = Vec::with_capacity(self.len());
        while let Some(node) = self.pop() {
            nodes.push(node);
        }
        nodes
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of nodes in the queue.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Stack(stack) => stack.len(),
            Storage::Heap(heap) => heap.len(),
        }
    }
}
