//! Search node representation.

use solver_core::BoundOverrides;

/// Lifecycle of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Node is waiting to be processed.
    Pending,

    /// Node relaxation has been solved.
    Relaxed,

    /// Node was discarded (relaxation infeasible or bound >= incumbent).
    Fathomed,

    /// Node relaxation is integral; it was offered as an incumbent.
    Integral,

    /// Node was branched (children created).
    Branched,
}

/// A bound change from branching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundChange {
    /// Variable index.
    pub var: usize,

    /// New lower bound.
    pub new_lb: f64,

    /// New upper bound.
    pub new_ub: f64,
}

impl BoundChange {
    /// Create a "down" branch: x <= floor(value).
    pub fn down_branch(var: usize, lb: f64, value: f64) -> Self {
        Self {
            var,
            new_lb: lb,
            new_ub: value.floor(),
        }
    }

    /// Create an "up" branch: x >= ceil(value).
    pub fn up_branch(var: usize, ub: f64, value: f64) -> Self {
        Self {
            var,
            new_lb: value.ceil(),
            new_ub: ub,
        }
    }
}

/// A node in the B&B search tree.
///
/// `bound_changes` holds every change on the path from the root, so a node
/// can be solved without its ancestors; children copy and extend it.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Unique node identifier.
    pub id: u64,

    /// Parent node ID (None for root).
    pub parent_id: Option<u64>,

    /// Depth in the tree (0 for root).
    pub depth: usize,

    /// Bound changes from the root to this node.
    pub bound_changes: Vec<BoundChange>,

    /// Parent relaxation objective (minimization scale).
    /// Lower bound on optimal objective in this subtree.
    pub dual_bound: f64,

    /// Node processing state.
    pub state: NodeState,
}

impl SearchNode {
    /// Create the root node.
    pub fn root() -> Self {
        Self {
            id: 0,
            parent_id: None,
            depth: 0,
            bound_changes: Vec::new(),
            dual_bound: f64::NEG_INFINITY,
            state: NodeState::Pending,
        }
    }

    /// Create a child node from a bound change.
    pub fn child(&self, id: u64, bound_change: BoundChange, dual_bound: f64) -> Self {
        let mut bound_changes = Vec::with_capacity(self.bound_changes.len() + 1);
        bound_changes.extend_from_slice(&self.bound_changes);
        bound_changes.push(bound_change);

        Self {
            id,
            parent_id: Some(self.id),
            depth: self.depth + 1,
            bound_changes,
            dual_bound,
            state: NodeState::Pending,
        }
    }

    /// Bounds of this node: the root bounds tightened by every change.
    pub fn bounds(&self, root: &BoundOverrides) -> BoundOverrides {
        let mut bounds = root.clone();
        for change in &self.bound_changes {
            bounds.tighten_lower(change.var, change.new_lb);
            bounds.tighten_upper(change.var, change.new_ub);
        }
        bounds
    }

    /// Check if this node can be pruned by an incumbent.
    ///
    /// A node can be pruned if its dual bound >= incumbent objective - tol.
    pub fn can_prune(&self, incumbent_obj: f64, tol: f64) -> bool {
        self.dual_bound >= incumbent_obj - tol
    }
}
