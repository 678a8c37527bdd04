//! LP solve results.

/// Outcome of an LP relaxation solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    /// An optimal basic solution was found.
    Optimal,
    /// No point satisfies the constraints and bounds.
    Infeasible,
    /// The objective improves without limit along a feasible ray.
    Unbounded,
}

/// Solution of an LP relaxation.
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Solve status.
    pub status: LpStatus,

    /// Primal values indexed by variable id (empty unless `Optimal`).
    pub x: Vec<f64>,

    /// Objective in the model's own sense.
    ///
    /// For `Infeasible` this is the sense's worst value (`+inf` when
    /// minimizing); for `Unbounded` it is the best one.
    pub objective: f64,

    /// Pivots performed (both phases).
    pub iterations: usize,
}

impl LpSolution {
    /// True if the status is `Optimal`.
    pub fn is_optimal(&self) -> bool {
        self.status == LpStatus::Optimal
    }
}
