//! Linear expressions.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use super::VarId;

/// Linear expression `sum_j a_j x_j + c`.
///
/// Terms are kept in insertion order and may repeat a variable; duplicates are
/// merged when the expression is handed to a [`Model`](super::Model).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinExpr {
    /// Empty expression (evaluates to zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression consisting of a single constant.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }

    /// Expression `coef * var`.
    pub fn term(var: VarId, coef: f64) -> Self {
        Self {
            terms: vec![(var, coef)],
            constant: 0.0,
        }
    }

    /// `sum_j coefs[j] * vars[j]`, zipping the two slices.
    pub fn weighted_sum(vars: &[VarId], coefs: &[f64]) -> Self {
        Self {
            terms: vars.iter().copied().zip(coefs.iter().copied()).collect(),
            constant: 0.0,
        }
    }

    /// Append `coef * var`.
    pub fn add_term(&mut self, var: VarId, coef: f64) -> &mut Self {
        self.terms.push((var, coef));
        self
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, var: VarId, coef: f64) -> Self {
        self.terms.push((var, coef));
        self
    }

    /// Add a constant offset.
    pub fn add_constant(&mut self, c: f64) -> &mut Self {
        self.constant += c;
        self
    }

    /// Raw terms, in insertion order.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Constant offset.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// True if the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate at a primal point indexed by [`VarId::index`].
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * x[var.index()])
            .sum::<f64>()
            + self.constant
    }

    /// Terms with duplicate variables summed, zero coefficients dropped,
    /// sorted by variable id.
    pub fn merged_terms(&self) -> Vec<(VarId, f64)> {
        let mut terms = self.terms.clone();
        terms.sort_by_key(|&(var, _)| var);

        let mut merged: Vec<(VarId, f64)> = Vec::with_capacity(terms.len());
        for (var, coef) in terms {
            match merged.last_mut() {
                Some((last, acc)) if *last == var => *acc += coef,
                _ => merged.push((var, coef)),
            }
        }
        merged.retain(|&(_, coef)| coef != 0.0);
        merged
    }

    fn scale(mut self, factor: f64) -> Self {
        for (_, coef) in &mut self.terms {
            *coef *= factor;
        }
        self.constant *= factor;
        self
    }
}

impl From<VarId> for LinExpr {
    fn from(var: VarId) -> Self {
        Self::term(var, 1.0)
    }
}

impl From<f64> for LinExpr {
    fn from(c: f64) -> Self {
        Self::from_constant(c)
    }
}

impl AddAssign<LinExpr> for LinExpr {
    fn add_assign(&mut self, rhs: LinExpr) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl SubAssign<LinExpr> for LinExpr {
    fn sub_assign(&mut self, rhs: LinExpr) {
        *self += -rhs;
    }
}

impl<T: Into<LinExpr>> Add<T> for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: T) -> LinExpr {
        self += rhs.into();
        self
    }
}

impl<T: Into<LinExpr>> Sub<T> for LinExpr {
    type Output = LinExpr;

    fn sub(mut self, rhs: T) -> LinExpr {
        self -= rhs.into();
        self
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;

    fn neg(self) -> LinExpr {
        self.scale(-1.0)
    }
}

impl Mul<f64> for LinExpr {
    type Output = LinExpr;

    fn mul(self, rhs: f64) -> LinExpr {
        self.scale(rhs)
    }
}

impl Mul<LinExpr> for f64 {
    type Output = LinExpr;

    fn mul(self, rhs: LinExpr) -> LinExpr {
        rhs.scale(self)
    }
}

impl Mul<VarId> for f64 {
    type Output = LinExpr;

    fn mul(self, rhs: VarId) -> LinExpr {
        LinExpr::term(rhs, self)
    }
}

impl Sum for LinExpr {
    fn sum<I: Iterator<Item = LinExpr>>(iter: I) -> Self {
        iter.fold(LinExpr::new(), |acc, e| acc + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_and_evaluation() {
        let x = VarId::new(0);
        let y = VarId::new(1);

        // 2x - (y - 3) + 1 = 2x - y + 4
        let e = 2.0 * x - (LinExpr::from(y) - 3.0) + 1.0;
        assert!((e.constant() - 4.0).abs() < 1e-12);
        assert!((e.evaluate(&[1.0, 5.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_merged_terms() {
        let x = VarId::new(0);
        let y = VarId::new(1);
        let e = LinExpr::from(y) + 2.0 * x + 3.0 * y - 2.0 * x;

        // x cancels out, y accumulates to 4
        assert_eq!(e.merged_terms(), vec![(y, 4.0)]);
    }

    #[test]
    fn test_sum_of_expressions() {
        let vars: Vec<VarId> = (0..3).map(VarId::new).collect();
        let e: LinExpr = vars.iter().map(|&v| LinExpr::from(v)).sum();
        assert_eq!(e.terms().len(), 3);
        assert!((e.evaluate(&[1.0, 2.0, 3.0]) - 6.0).abs() < 1e-12);
    }
}
