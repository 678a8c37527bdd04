//! Sparse standard form of a model.
//!
//! The LP engine works on
//!
//! ```text
//! minimize    cost^T x
//! subject to  A x (ops) rhs
//!             lower <= x <= upper
//! ```
//!
//! where `cost = sign * c` and `sign` is `+1` for minimization and `-1` for
//! maximization, so every solver layer above this one reasons about a single
//! minimization problem and converts back with [`StandardForm::model_objective`].

use sprs::{CsMat, TriMat};

use crate::model::{ConstraintOp, Model, Sense};

/// Sparse matrix in CSC format.
pub type SparseCsc = CsMat<f64>;

/// Minimization standard form of a [`Model`].
#[derive(Debug, Clone)]
pub struct StandardForm {
    /// Constraint matrix (rows = constraints, columns = variables).
    pub a: SparseCsc,
    /// Operator of each row.
    pub ops: Vec<ConstraintOp>,
    /// Right-hand side of each row.
    pub rhs: Vec<f64>,
    /// Minimization cost vector.
    pub cost: Vec<f64>,
    /// Objective constant in the model's own sense.
    pub objective_constant: f64,
    /// Direction of the originating model.
    pub sense: Sense,
    /// Variable lower bounds.
    pub lower: Vec<f64>,
    /// Variable upper bounds.
    pub upper: Vec<f64>,
}

impl StandardForm {
    /// Build the standard form of a model.
    pub fn from_model(model: &Model) -> Self {
        let m = model.num_constraints();
        let n = model.num_vars();

        let mut tri = TriMat::new((m, n));
        for row in model.constraints() {
            for &(var, coef) in &row.terms {
                tri.add_triplet(row.id.index(), var.index(), coef);
            }
        }

        let sign = model.sense().sign();
        let mut cost = vec![0.0; n];
        for &(var, coef) in model.objective_terms() {
            cost[var.index()] = sign * coef;
        }

        Self {
            a: tri.to_csc(),
            ops: model.constraints().iter().map(|c| c.op).collect(),
            rhs: model.constraints().iter().map(|c| c.rhs).collect(),
            cost,
            objective_constant: model.objective_constant(),
            sense: model.sense(),
            lower: model.lower_bounds(),
            upper: model.upper_bounds(),
        }
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rhs.len()
    }

    /// Number of columns.
    pub fn num_cols(&self) -> usize {
        self.cost.len()
    }

    /// Minimization objective `cost^T x` (without the constant).
    pub fn min_objective(&self, x: &[f64]) -> f64 {
        self.cost.iter().zip(x).map(|(c, xi)| c * xi).sum()
    }

    /// Convert a minimization objective value back to the model's sense,
    /// adding the objective constant.
    pub fn model_objective(&self, min_obj: f64) -> f64 {
        self.sense.sign() * min_obj + self.objective_constant
    }

    /// Convert a model objective value to the minimization scale.
    pub fn to_min_objective(&self, model_obj: f64) -> f64 {
        self.sense.sign() * (model_obj - self.objective_constant)
    }

    /// Largest amount by which `x` violates a row.
    pub fn max_row_violation(&self, x: &[f64]) -> f64 {
        let mut activity = vec![0.0; self.num_rows()];
        for (&val, (row, col)) in self.a.iter() {
            activity[row] += val * x[col];
        }
        activity
            .iter()
            .zip(self.ops.iter().zip(&self.rhs))
            .map(|(&lhs, (op, &rhs))| match op {
                ConstraintOp::Le => lhs - rhs,
                ConstraintOp::Ge => rhs - lhs,
                ConstraintOp::Eq => (lhs - rhs).abs(),
            })
            .fold(0.0, f64::max)
    }

    /// Dense copy of the constraint matrix, row-major.
    pub fn dense_rows(&self) -> Vec<Vec<f64>> {
        let mut rows = vec![vec![0.0; self.num_cols()]; self.num_rows()];
        for (&val, (row, col)) in self.a.iter() {
            rows[row][col] += val;
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinExpr;

    #[test]
    fn test_maximize_is_negated() {
        let mut model = Model::new(Sense::Maximize);
        let x = model.add_binary().unwrap();
        let y = model.add_continuous(0.0, 4.0).unwrap();
        model
            .add_constraint(LinExpr::from(x) + 2.0 * y, ConstraintOp::Ge, 1.0)
            .unwrap();
        model.set_objective(3.0 * x - y + 10.0).unwrap();

        let form = model.standard_form();
        assert_eq!(form.num_rows(), 1);
        assert_eq!(form.num_cols(), 2);
        assert_eq!(form.cost, vec![-3.0, 1.0]);
        assert_eq!(form.dense_rows(), vec![vec![1.0, 2.0]]);

        // x = 1, y = 0: model objective 13, min objective -3
        let min_obj = form.min_objective(&[1.0, 0.0]);
        assert_eq!(min_obj, -3.0);
        assert_eq!(form.model_objective(min_obj), 13.0);
        assert_eq!(form.to_min_objective(13.0), -3.0);
    }

    #[test]
    fn test_row_violation() {
        let mut model = Model::new(Sense::Minimize);
        let x = model.add_continuous(0.0, 10.0).unwrap();
        let y = model.add_continuous(0.0, 10.0).unwrap();
        model
            .add_constraint(LinExpr::from(x) + y, ConstraintOp::Le, 4.0)
            .unwrap();
        model
            .add_constraint(LinExpr::from(x) - y, ConstraintOp::Eq, 1.0)
            .unwrap();
        let form = model.standard_form();

        assert_eq!(form.max_row_violation(&[2.5, 1.5]), 0.0);
        assert_eq!(form.max_row_violation(&[3.0, 2.0]), 1.0);
        assert_eq!(form.max_row_violation(&[0.0, 0.5]), 1.5);
    }
}
