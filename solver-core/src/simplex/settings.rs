//! Simplex settings.

use crate::EPSILON;

/// Settings for the LP relaxation engine.
#[derive(Debug, Clone)]
pub struct LpSettings {
    /// Maximum number of pivots (both phases together).
    pub max_iter: usize,

    /// Smallest tableau entry accepted as a pivot element.
    pub pivot_tol: f64,

    /// Bound relaxation used by the first pass of the Harris ratio test.
    pub harris_tol: f64,

    /// Reduced-cost tolerance for optimality.
    pub opt_tol: f64,

    /// Feasibility tolerance; the Phase I optimum must not exceed it.
    pub feas_tol: f64,

    /// Number of consecutive degenerate pivots after which pricing switches
    /// from Dantzig's rule to Bland's rule for the rest of the phase.
    pub bland_after_degenerate: usize,

    /// Pivots between two refactorizations of the basis.
    pub refactor_every: usize,
}

impl Default for LpSettings {
    fn default() -> Self {
        Self {
            max_iter: 50_000,
            pivot_tol: 1e-7,
            harris_tol: 1e-9,
            opt_tol: 1e-9,
            feas_tol: EPSILON,
            bland_after_degenerate: 50,
            refactor_every: 100,
        }
    }
}

impl LpSettings {
    /// Set the pivot budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the refactorization period (at least one pivot).
    pub fn with_refactor_every(mut self, pivots: usize) -> Self {
        self.refactor_every = pivots.max(1);
        self
    }
}
