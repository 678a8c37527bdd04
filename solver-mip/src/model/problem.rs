//! MIP problem representation.

use solver_core::{BoundOverrides, Model, StandardForm};

/// Mixed-integer problem wrapper.
///
/// Holds the minimization standard form of a [`Model`] together with the
/// columns that must end up in `{0, 1}`, and the model itself for checking
/// candidate points against the rows as written.
#[derive(Debug, Clone)]
pub struct MipProblem {
    /// Source model.
    pub model: Model,

    /// Minimization standard form.
    pub form: StandardForm,

    /// Column indices of binary variables, ascending.
    pub binary_vars: Vec<usize>,

    /// Model bounds of all variables.
    pub root_bounds: BoundOverrides,
}

impl MipProblem {
    /// Create a MipProblem from a model.
    pub fn new(model: &Model) -> Self {
        let form = model.standard_form();
        let root_bounds = BoundOverrides::from_form(&form);
        let binary_vars = model.binary_vars().iter().map(|v| v.index()).collect();
        Self {
            model: model.clone(),
            form,
            binary_vars,
            root_bounds,
        }
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.form.num_cols()
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.form.num_rows()
    }

    /// Number of binary variables.
    pub fn num_binaries(&self) -> usize {
        self.binary_vars.len()
    }

    /// Check if all binaries are within `tol` of 0 or 1.
    pub fn is_integer_feasible(&self, x: &[f64], tol: f64) -> bool {
        self.binary_vars
            .iter()
            .all(|&i| fractionality(x[i]) <= tol)
    }

    /// Get binaries that are more than `tol` away from an integer.
    ///
    /// Returns (var_index, value, fractionality).
    pub fn get_fractional_vars(&self, x: &[f64], tol: f64) -> Vec<(usize, f64, f64)> {
        self.binary_vars
            .iter()
            .filter_map(|&i| {
                let frac = fractionality(x[i]);
                (frac > tol).then_some((i, x[i], frac))
            })
            .collect()
    }

    /// Round every binary to the nearest integer in place.
    ///
    /// Returns the number of values that were off by more than round-off
    /// noise and had to be snapped.
    pub fn round_binaries(&self, x: &mut [f64]) -> usize {
        let mut snapped = 0;
        for &i in &self.binary_vars {
            let rounded = x[i].round().clamp(0.0, 1.0);
            if (x[i] - rounded).abs() > ROUNDING_NOISE {
                snapped += 1;
            }
            x[i] = rounded;
        }
        snapped
    }

    /// Copy of `bounds` with every binary fixed to its value in `x`.
    pub fn fix_binaries(&self, bounds: &BoundOverrides, x: &[f64]) -> BoundOverrides {
        let mut fixed = bounds.clone();
        for &i in &self.binary_vars {
            fixed.fix(i, x[i]);
        }
        fixed
    }

    /// True if `x` may become an incumbent: binaries within `int_tol` of an
    /// integer and every bound and row of the model satisfied within
    /// `feas_tol`.
    pub fn accepts_candidate(&self, x: &[f64], int_tol: f64, feas_tol: f64) -> bool {
        self.is_integer_feasible(x, int_tol) && self.model.is_feasible(x, feas_tol)
    }
}

/// Differences at or below this are treated as exact integers.
const ROUNDING_NOISE: f64 = 1e-12;

/// Distance to the nearest integer.
pub fn fractionality(val: f64) -> f64 {
    (val - val.round()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_core::{ConstraintOp, LinExpr, Sense};

    fn sample() -> MipProblem {
        let mut model = Model::new(Sense::Maximize);
        let a = model.add_binary().unwrap();
        let y = model.add_continuous(0.0, 5.0).unwrap();
        let b = model.add_binary().unwrap();
        model
            .add_constraint(LinExpr::from(a) + y + b, ConstraintOp::Le, 4.0)
            .unwrap();
        model.set_objective(LinExpr::from(a) + y + b).unwrap();
        MipProblem::new(&model)
    }

    #[test]
    fn test_binary_columns() {
        let prob = sample();
        assert_eq!(prob.binary_vars, vec![0, 2]);
        assert_eq!(prob.num_vars(), 3);
        assert_eq!(prob.num_constraints(), 1);
        assert_eq!(prob.root_bounds.upper, vec![1.0, 5.0, 1.0]);
    }

    #[test]
    fn test_fractional_detection() {
        let prob = sample();
        // Continuous column 1 is ignored
        let x = [0.4, 2.5, 1.0 - 1e-8];
        let frac = prob.get_fractional_vars(&x, 1e-6);
        assert_eq!(frac.len(), 1);
        assert_eq!(frac[0].0, 0);
        assert!((frac[0].2 - 0.4).abs() < 1e-12);
        assert!(!prob.is_integer_feasible(&x, 1e-6));
    }

    #[test]
    fn test_rounding_counts_snaps() {
        let prob = sample();
        let mut x = [1.0 - 1e-8, 2.5, 0.0];
        assert_eq!(prob.round_binaries(&mut x), 1);
        assert_eq!(x, [1.0, 2.5, 0.0]);
    }

    #[test]
    fn test_candidate_must_satisfy_rows() {
        let prob = sample();
        assert!(prob.accepts_candidate(&[1.0, 2.0, 1.0], 0.0, 1e-6));
        // Integral but the row a + y + b <= 4 is off by 0.5
        assert!(!prob.accepts_candidate(&[1.0, 2.5, 1.0], 0.0, 1e-6));
        // Row holds but a binary is fractional
        assert!(!prob.accepts_candidate(&[0.5, 2.0, 1.0], 1e-6, 1e-6));
    }

    #[test]
    fn test_fix_binaries_pins_only_binary_columns() {
        let prob = sample();
        let fixed = prob.fix_binaries(&prob.root_bounds, &[1.0, 2.5, 0.0]);
        assert_eq!(fixed.lower, vec![1.0, 0.0, 0.0]);
        assert_eq!(fixed.upper, vec![1.0, 5.0, 0.0]);
    }
}
