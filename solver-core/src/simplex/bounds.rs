//! Per-variable bound overrides.

use crate::error::{LpError, LpResult};
use crate::standard::StandardForm;
use crate::EPSILON;

/// Per-variable bounds applied on top of a model's own bounds.
///
/// Branch-and-bound nodes tighten binaries by replacing `[0, 1]` with
/// `[0, 0]` or `[1, 1]`. Overrides that cross (`lower > upper`) make the
/// relaxation infeasible rather than invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundOverrides {
    /// Lower bound of each column.
    pub lower: Vec<f64>,
    /// Upper bound of each column.
    pub upper: Vec<f64>,
}

impl BoundOverrides {
    /// Bounds taken verbatim from a standard form.
    pub fn from_form(form: &StandardForm) -> Self {
        Self {
            lower: form.lower.clone(),
            upper: form.upper.clone(),
        }
    }

    /// Number of columns covered.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// True if no columns are covered.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Fix column `j` to `value`.
    pub fn fix(&mut self, j: usize, value: f64) {
        self.lower[j] = value;
        self.upper[j] = value;
    }

    /// Raise the lower bound of column `j` to at least `value`.
    pub fn tighten_lower(&mut self, j: usize, value: f64) {
        self.lower[j] = self.lower[j].max(value);
    }

    /// Lower the upper bound of column `j` to at most `value`.
    pub fn tighten_upper(&mut self, j: usize, value: f64) {
        self.upper[j] = self.upper[j].min(value);
    }

    /// True if some column has `lower > upper` beyond tolerance.
    pub fn has_crossing(&self) -> bool {
        self.lower
            .iter()
            .zip(&self.upper)
            .any(|(&lo, &hi)| lo > hi + EPSILON)
    }

    pub(crate) fn check_dims(&self, expected: usize) -> LpResult<()> {
        let got = if self.lower.len() != expected {
            self.lower.len()
        } else {
            self.upper.len()
        };
        if got != expected {
            return Err(LpError::DimensionMismatch { expected, got });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tighten_only_shrinks() {
        let mut b = BoundOverrides {
            lower: vec![0.0, 0.0],
            upper: vec![1.0, 1.0],
        };
        b.tighten_lower(0, -5.0);
        b.tighten_upper(1, 3.0);
        assert_eq!(b.lower, vec![0.0, 0.0]);
        assert_eq!(b.upper, vec![1.0, 1.0]);

        b.fix(1, 1.0);
        b.tighten_upper(0, 0.0);
        assert_eq!(b.lower, vec![0.0, 1.0]);
        assert_eq!(b.upper, vec![0.0, 1.0]);
        assert!(!b.has_crossing());

        b.tighten_lower(0, 1.0);
        assert!(b.has_crossing());
    }

    #[test]
    fn test_dimension_check() {
        let b = BoundOverrides {
            lower: vec![0.0],
            upper: vec![1.0],
        };
        assert!(b.check_dims(1).is_ok());
        assert_eq!(
            b.check_dims(2),
            Err(LpError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
    }
}
