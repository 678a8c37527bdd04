//! Linear constraints.

use std::fmt;

use super::VarId;

/// Comparison operator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
    /// `expr == rhs`
    Eq,
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "==",
        };
        f.write_str(s)
    }
}

/// Identifier of a constraint inside one model (row index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    /// Row index of this constraint.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A validated linear constraint `sum_j a_j x_j (op) rhs`.
///
/// The expression's constant has already been moved into `rhs` and duplicate
/// terms have been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Row index.
    pub id: ConstraintId,
    /// Merged terms, sorted by variable.
    pub terms: Vec<(VarId, f64)>,
    /// Operator.
    pub op: ConstraintOp,
    /// Right-hand side.
    pub rhs: f64,
    /// Optional name.
    pub name: Option<String>,
}

impl Constraint {
    /// Left-hand side value at `x`.
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * x[var.index()])
            .sum()
    }

    /// Amount by which `x` violates the constraint (zero when satisfied).
    pub fn violation(&self, x: &[f64]) -> f64 {
        let lhs = self.activity(x);
        match self.op {
            ConstraintOp::Le => (lhs - self.rhs).max(0.0),
            ConstraintOp::Ge => (self.rhs - lhs).max(0.0),
            ConstraintOp::Eq => (lhs - self.rhs).abs(),
        }
    }

    /// True if the violation is at most `tol`.
    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        self.violation(x) <= tol
    }
}
