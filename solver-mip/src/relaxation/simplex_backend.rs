//! Relaxation backend using the solver-core simplex.

use solver_core::{solve_relaxation, BoundOverrides, LpSettings, LpStatus, StandardForm};

use super::{RelaxationBackend, RelaxationResult, RelaxationStatus};
use crate::error::MipResult;

/// Relaxation backend using the bounded-variable simplex.
///
/// Every node is solved from scratch on the shared standard form; only the
/// bounds differ between calls.
#[derive(Debug, Clone)]
pub struct SimplexBackend<'a> {
    form: &'a StandardForm,
    settings: LpSettings,
}

impl<'a> SimplexBackend<'a> {
    /// Create a backend over `form`.
    pub fn new(form: &'a StandardForm, settings: LpSettings) -> Self {
        Self { form, settings }
    }
}

impl RelaxationBackend for SimplexBackend<'_> {
    fn solve(&mut self, bounds: &BoundOverrides) -> MipResult<RelaxationResult> {
        let sol = solve_relaxation(self.form, bounds, &self.settings)?;

        let result = match sol.status {
            LpStatus::Optimal => RelaxationResult {
                status: RelaxationStatus::Optimal,
                obj_val: self.form.min_objective(&sol.x),
                x: sol.x,
                iterations: sol.iterations,
            },
            LpStatus::Infeasible => RelaxationResult::infeasible(sol.iterations),
            LpStatus::Unbounded => RelaxationResult {
                status: RelaxationStatus::Unbounded,
                x: Vec::new(),
                obj_val: f64::NEG_INFINITY,
                iterations: sol.iterations,
            },
        };
        Ok(result)
    }

    fn num_vars(&self) -> usize {
        self.form.num_cols()
    }
}
