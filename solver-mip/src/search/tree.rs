//! Branch-and-bound tree controller.

use std::sync::atomic::Ordering;
use std::time::Instant;

use solver_core::EPSILON;

use super::{BranchDecision, IncumbentStore, NodeQueue, SearchNode};
use crate::model::{IncumbentTracker, TerminationReason};
use crate::settings::MipSettings;

/// Branch-and-bound tree controller.
///
/// Manages the node queue, the local incumbent, counters and termination.
/// All objectives are on the minimization scale.
pub struct BranchAndBound<'s> {
    /// Node queue.
    queue: NodeQueue,

    /// Incumbent solution tracker.
    pub incumbent: IncumbentTracker,

    /// Next node ID to assign.
    next_node_id: u64,

    /// Total nodes explored.
    nodes_explored: u64,

    /// Nodes fathomed by infeasibility or bound.
    nodes_pruned: u64,

    /// Simplex pivots over all relaxations.
    lp_iterations: u64,

    /// Integral nodes that needed rounding beyond noise.
    tolerance_warnings: u64,

    /// Start time of the overall solve.
    start_time: Instant,

    /// Settings.
    settings: &'s MipSettings,
}

impl<'s> BranchAndBound<'s> {
    /// Create a new B&B controller.
    pub fn new(settings: &'s MipSettings, start_time: Instant) -> Self {
        Self {
            queue: NodeQueue::new(settings.node_selection),
            incumbent: IncumbentTracker::new(EPSILON),
            next_node_id: 1, // 0 reserved for root
            nodes_explored: 0,
            nodes_pruned: 0,
            lp_iterations: 0,
            tolerance_warnings: 0,
            start_time,
            settings,
        }
    }

    /// Seed the tree with a starting node (the root, or a subtree root).
    ///
    /// Ids of nodes created later never collide with `node.id`.
    pub fn initialize(&mut self, node: SearchNode) {
        self.next_node_id = self.next_node_id.max(node.id + 1);
        self.queue.push(node);
    }

    /// Get the next node to process.
    pub fn next_node(&mut self) -> Option<SearchNode> {
        self.queue.pop()
    }

    /// Number of open nodes.
    pub fn open_nodes(&self) -> usize {
        self.queue.len()
    }

    /// Remove every open node.
    pub fn take_open_nodes(&mut self) -> Vec<SearchNode> {
        self.queue.drain()
    }

    /// Mark a node as explored.
    pub fn node_explored(&mut self) {
        self.nodes_explored += 1;
    }

    /// Record that a node was pruned.
    pub fn node_pruned(&mut self) {
        self.nodes_pruned += 1;
    }

    /// Integrality tolerance for binaries.
    pub fn int_feas_tol(&self) -> f64 {
        self.settings.int_feas_tol
    }

    /// Record simplex pivots.
    pub fn lp_iterations(&mut self, iterations: usize) {
        self.lp_iterations += iterations as u64;
    }

    /// Record an integral node that needed rounding.
    pub fn tolerance_warning(&mut self) {
        self.tolerance_warnings += 1;
    }

    /// Create child nodes from a branching decision.
    ///
    /// Returns the two child nodes (down, up).
    pub fn branch(
        &mut self,
        parent: &SearchNode,
        decision: &BranchDecision,
        relaxation_obj: f64,
    ) -> (SearchNode, SearchNode) {
        let down_id = self.next_node_id;
        let up_id = self.next_node_id + 1;
        self.next_node_id += 2;

        let down_child = parent.child(down_id, decision.down_branch, relaxation_obj);
        let up_child = parent.child(up_id, decision.up_branch, relaxation_obj);

        (down_child, up_child)
    }

    /// Add a node to the queue.
    pub fn enqueue(&mut self, node: SearchNode) {
        self.queue.push(node);
    }

    /// Best objective known locally or through `store`.
    pub fn incumbent_bound<S: IncumbentStore>(&self, store: &S) -> f64 {
        store.tighten(self.incumbent.obj_val)
    }

    /// Update incumbent with a new solution.
    ///
    /// The point must beat both the local and the shared incumbent by more
    /// than EPSILON. Returns true if incumbent was improved.
    pub fn update_incumbent<S: IncumbentStore>(&mut self, x: &[f64], obj: f64, store: &S) -> bool {
        if obj >= self.incumbent_bound(store) - EPSILON {
            return false;
        }
        let improved = self.incumbent.update(x, obj);
        if improved {
            store.offer(x, obj);

            // Prune nodes dominated by new incumbent
            let pruned = self.queue.prune_by_bound(obj, EPSILON);
            self.nodes_pruned += pruned as u64;

            if self.settings.verbose {
                log::info!(
                    "New incumbent: obj={:.6e} at node {}, pruned {} nodes",
                    obj,
                    self.nodes_explored,
                    pruned
                );
            }
        }
        improved
    }

    /// Get elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Check if time limit is exceeded.
    pub fn time_limit_exceeded(&self) -> bool {
        if let Some(limit) = self.settings.time_limit_ms {
            self.elapsed_ms() >= limit
        } else {
            false
        }
    }

    /// Check cancellation conditions before popping the next node.
    ///
    /// Returns Some(reason) if we should stop, None otherwise.
    pub fn check_termination(&self) -> Option<TerminationReason> {
        if let Some(flag) = &self.settings.interrupt {
            if flag.load(Ordering::Relaxed) {
                return Some(TerminationReason::Interrupted);
            }
        }

        if self.time_limit_exceeded() {
            return Some(TerminationReason::TimeLimit);
        }

        if self.nodes_explored >= self.settings.max_nodes {
            return Some(TerminationReason::NodeLimit);
        }

        None
    }

    /// Log progress every `log_freq` nodes.
    pub fn log_progress(&self) {
        if self.nodes_explored % self.settings.log_freq != 0 {
            return;
        }

        log::debug!(
            "Nodes: {} ({} open) | Bound: {:.6e} | Incumbent: {:.6e} | Pruned: {} | Time: {:.1}s",
            self.nodes_explored,
            self.queue.len(),
            self.queue.best_bound(),
            self.incumbent.obj_val,
            self.nodes_pruned,
            self.elapsed_ms() as f64 / 1000.0,
        );
    }

    /// Get statistics for display.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            nodes_explored: self.nodes_explored,
            nodes_pruned: self.nodes_pruned,
            nodes_open: self.queue.len() as u64,
            incumbent_updates: self.incumbent.update_count,
            lp_iterations: self.lp_iterations,
            tolerance_warnings: self.tolerance_warnings,
            best_bound: self.queue.best_bound(),
            incumbent_obj: self.incumbent.obj_val,
            elapsed_ms: self.elapsed_ms(),
        }
    }
}

/// Statistics from the B&B tree.
#[derive(Debug, Clone, Default)]
pub struct TreeStats {
    /// Nodes whose relaxation was solved.
    pub nodes_explored: u64,
    /// Nodes fathomed by infeasibility or bound.
    pub nodes_pruned: u64,
    /// Nodes still open.
    pub nodes_open: u64,
    /// Incumbent improvements.
    pub incumbent_updates: u64,
    /// Simplex pivots.
    pub lp_iterations: u64,
    /// Tolerance warnings.
    pub tolerance_warnings: u64,
    /// Best bound over open nodes.
    pub best_bound: f64,
    /// Local incumbent objective.
    pub incumbent_obj: f64,
    /// Elapsed time.
    pub elapsed_ms: u64,
}

impl TreeStats {
    /// Add the counters of another tree.
    pub fn merge(&mut self, other: &TreeStats) {
        self.nodes_explored += other.nodes_explored;
        self.nodes_pruned += other.nodes_pruned;
        self.nodes_open += other.nodes_open;
        self.incumbent_updates += other.incumbent_updates;
        self.lp_iterations += other.lp_iterations;
        self.tolerance_warnings += other.tolerance_warnings;
        self.best_bound = self.best_bound.min(other.best_bound);
        self.incumbent_obj = self.incumbent_obj.min(other.incumbent_obj);
        self.elapsed_ms = self.elapsed_ms.max(other.elapsed_ms);
    }
}
