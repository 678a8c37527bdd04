//! Relaxation backend trait and types.

use solver_core::BoundOverrides;

use crate::error::MipResult;

/// Status of a node relaxation solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationStatus {
    /// Optimal solution found.
    Optimal,

    /// Relaxation is infeasible (node can be pruned).
    Infeasible,

    /// Relaxation is unbounded (fatal for the whole solve).
    Unbounded,
}

/// Result from solving a node relaxation.
#[derive(Debug, Clone)]
pub struct RelaxationResult {
    /// Solve status.
    pub status: RelaxationStatus,

    /// Primal solution x (empty unless optimal).
    pub x: Vec<f64>,

    /// Objective on the minimization scale, without the model constant.
    pub obj_val: f64,

    /// Pivots spent on this solve.
    pub iterations: usize,
}

impl RelaxationResult {
    /// Create an infeasible result.
    pub fn infeasible(iterations: usize) -> Self {
        Self {
            status: RelaxationStatus::Infeasible,
            x: Vec::new(),
            obj_val: f64::INFINITY,
            iterations,
        }
    }
}

/// Trait for relaxation backends.
///
/// A backend solves the continuous relaxation of one fixed problem under
/// per-node bounds. Objectives are reported on the minimization scale so
/// the search never needs to know the model's sense.
pub trait RelaxationBackend {
    /// Solve the relaxation with the given bounds.
    fn solve(&mut self, bounds: &BoundOverrides) -> MipResult<RelaxationResult>;

    /// Get the number of variables.
    fn num_vars(&self) -> usize;
}
