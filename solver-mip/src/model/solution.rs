//! MIP solution types.

use std::fmt;

/// Status of a MIP solve that produced an incumbent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipStatus {
    /// The search tree was exhausted; the incumbent is optimal.
    Optimal,

    /// The search was cancelled; the incumbent is the best found so far.
    Suboptimal,
}

impl MipStatus {
    /// Returns true if optimality was proven.
    pub fn is_optimal(&self) -> bool {
        matches!(self, MipStatus::Optimal)
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Every node was processed.
    Completed,

    /// `max_nodes` nodes were explored.
    NodeLimit,

    /// The wall-clock limit elapsed.
    TimeLimit,

    /// The interrupt flag was raised.
    Interrupted,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationReason::Completed => "search completed",
            TerminationReason::NodeLimit => "node limit reached",
            TerminationReason::TimeLimit => "time limit reached",
            TerminationReason::Interrupted => "interrupted",
        };
        f.write_str(s)
    }
}

/// Complete MIP solution with diagnostics.
#[derive(Debug, Clone)]
pub struct MipSolution {
    /// Solve status.
    pub status: MipStatus,

    /// Why the search stopped.
    pub reason: TerminationReason,

    /// Primal solution, binaries rounded to {0, 1}.
    pub x: Vec<f64>,

    /// Objective value of the incumbent, in the model's sense.
    pub objective: f64,

    /// Root relaxation objective, in the model's sense.
    /// Never worse than `objective`.
    pub root_bound: f64,

    /// Number of B&B nodes explored.
    pub nodes_explored: u64,

    /// Number of nodes fathomed by infeasibility or bound.
    pub nodes_pruned: u64,

    /// Number of times incumbent was updated.
    pub incumbent_updates: u64,

    /// Simplex pivots over all node relaxations.
    pub lp_iterations: u64,

    /// Total solve time in milliseconds.
    pub solve_time_ms: u64,

    /// Integral nodes whose binaries were within tolerance of, but not
    /// exactly at, an integer.
    pub tolerance_warnings: u64,
}

impl MipSolution {
    /// Gap between the root bound and the incumbent, relative to the
    /// incumbent.
    pub fn root_gap(&self) -> f64 {
        compute_gap(self.objective, self.root_bound)
    }
}

/// Compute relative gap.
pub(crate) fn compute_gap(primal: f64, dual: f64) -> f64 {
    if primal.is_infinite() || dual.is_infinite() {
        return f64::INFINITY;
    }
    let denom = primal.abs().max(1e-10);
    (primal - dual).abs() / denom
}

/// Tracks the best known feasible solution (incumbent).
///
/// Objectives are on the minimization scale.
#[derive(Debug, Clone)]
pub struct IncumbentTracker {
    /// Current best solution (if any).
    pub solution: Option<Vec<f64>>,

    /// Objective value of incumbent (primal bound).
    /// Initialized to +inf.
    pub obj_val: f64,

    /// Number of times incumbent was updated.
    pub update_count: u64,

    /// Improvement required for a new point to replace the incumbent.
    tol: f64,
}

impl Default for IncumbentTracker {
    fn default() -> Self {
        Self::new(solver_core::EPSILON)
    }
}

impl IncumbentTracker {
    /// Create a new incumbent tracker.
    pub fn new(tol: f64) -> Self {
        Self {
            solution: None,
            obj_val: f64::INFINITY,
            update_count: 0,
            tol,
        }
    }

    /// Check if we have an incumbent.
    pub fn has_incumbent(&self) -> bool {
        self.solution.is_some()
    }

    /// Try to update incumbent with a new solution.
    ///
    /// Returns true if the incumbent was improved, i.e. `obj` is lower than
    /// the current value by more than the tolerance.
    pub fn update(&mut self, x: &[f64], obj: f64) -> bool {
        if self.is_improvement(obj) {
            self.solution = Some(x.to_vec());
            self.obj_val = obj;
            self.update_count += 1;
            true
        } else {
            false
        }
    }

    /// True if `obj` would replace the incumbent.
    pub fn is_improvement(&self, obj: f64) -> bool {
        !self.has_incumbent() || obj < self.obj_val - self.tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incumbent_tracker() {
        let mut tracker = IncumbentTracker::new(1e-6);

        assert!(!tracker.has_incumbent());
        assert_eq!(tracker.obj_val, f64::INFINITY);

        // First solution
        assert!(tracker.update(&[1.0, 2.0], 10.0));
        assert!(tracker.has_incumbent());
        assert_eq!(tracker.obj_val, 10.0);
        assert_eq!(tracker.update_count, 1);

        // Worse solution (rejected)
        assert!(!tracker.update(&[2.0, 3.0], 15.0));
        assert_eq!(tracker.obj_val, 10.0);

        // Within tolerance (rejected)
        assert!(!tracker.update(&[2.0, 3.0], 10.0 - 1e-7));
        assert_eq!(tracker.update_count, 1);

        // Better solution (accepted)
        assert!(tracker.update(&[0.5, 1.0], 5.0));
        assert_eq!(tracker.obj_val, 5.0);
        assert_eq!(tracker.update_count, 2);
    }

    #[test]
    fn test_gap_computation() {
        // Gap = |10 - 8| / |10| = 0.2
        let gap = compute_gap(10.0, 8.0);
        assert!((gap - 0.2).abs() < 1e-10);

        assert_eq!(compute_gap(10.0, f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(TerminationReason::NodeLimit.to_string(), "node limit reached");
        assert!(MipStatus::Optimal.is_optimal());
        assert!(!MipStatus::Suboptimal.is_optimal());
    }
}
