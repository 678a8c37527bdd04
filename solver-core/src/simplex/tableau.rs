//! Dense bounded-variable tableau.
//!
//! Column layout: `n` structurals, then one slack per row, then one
//! artificial per row. The tableau holds `B^{-1} [A | S | G]` for the
//! current basis `B`, plus the reduced-cost row of the active phase.
//! Product-form updates drift, so [`Tableau::refactor`] rebuilds both from
//! the untouched initial system.

use nalgebra::{DMatrix, DVector};

use crate::model::ConstraintOp;
use crate::standard::StandardForm;

use super::bounds::BoundOverrides;

/// Position of a column relative to its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColState {
    Basic,
    AtLower,
    AtUpper,
    /// Nonbasic free column resting at zero.
    Free,
}

pub(crate) struct Tableau {
    /// Number of structural columns.
    pub n: usize,
    /// Number of rows.
    pub m: usize,
    /// `B^{-1} [A | S | G]`, `m x (n + 2m)`.
    pub t: DMatrix<f64>,
    /// Value of every column.
    pub x: DVector<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub state: Vec<ColState>,
    /// Column basic in each row.
    pub basis: Vec<usize>,
    /// Phase cost vector.
    pub cost: Vec<f64>,
    /// Reduced costs for `cost`.
    pub d: DVector<f64>,
    /// Sign-adjusted `[A | S | G]` as built, never pivoted.
    orig: DMatrix<f64>,
    /// Sign-adjusted right-hand side matching `orig`.
    rhs: DVector<f64>,
}

impl Tableau {
    /// Build the Phase I tableau.
    ///
    /// Nonbasic structurals start at their lower bound when finite, else at
    /// their upper bound, else at zero. Each row's artificial absorbs the
    /// residual `b - A x_N` with a sign that makes its value nonnegative.
    pub fn phase_one(form: &StandardForm, bounds: &BoundOverrides) -> Self {
        let m = form.num_rows();
        let n = form.num_cols();
        let cols = n + 2 * m;

        let mut lower = Vec::with_capacity(cols);
        let mut upper = Vec::with_capacity(cols);
        let mut state = Vec::with_capacity(cols);
        let mut x = DVector::zeros(cols);

        for j in 0..n {
            let lo = bounds.lower[j];
            let hi = bounds.upper[j].max(lo);
            lower.push(lo);
            upper.push(hi);
            if lo.is_finite() {
                x[j] = lo;
                state.push(ColState::AtLower);
            } else if hi.is_finite() {
                x[j] = hi;
                state.push(ColState::AtUpper);
            } else {
                state.push(ColState::Free);
            }
        }

        // Slacks: Le rows get +s, Ge rows get -s, Eq rows get a slack fixed at 0
        let mut t = DMatrix::zeros(m, cols);
        for (i, op) in form.ops.iter().enumerate() {
            let (coef, hi) = match op {
                ConstraintOp::Le => (1.0, f64::INFINITY),
                ConstraintOp::Ge => (-1.0, f64::INFINITY),
                ConstraintOp::Eq => (1.0, 0.0),
            };
            t[(i, n + i)] = coef;
            lower.push(0.0);
            upper.push(hi);
            state.push(ColState::AtLower);
        }
        for (&val, (row, col)) in form.a.iter() {
            t[(row, col)] += val;
        }

        let mut basis = Vec::with_capacity(m);
        let mut rhs = DVector::zeros(m);
        for i in 0..m {
            let activity: f64 = (0..n).map(|j| t[(i, j)] * x[j]).sum();
            let residual = form.rhs[i] - activity;
            let sign = if residual < 0.0 { -1.0 } else { 1.0 };

            let art = n + m + i;
            t[(i, art)] = sign;
            // Scale the row so the artificial column becomes a unit vector
            if sign < 0.0 {
                for j in 0..cols {
                    t[(i, j)] = -t[(i, j)];
                }
            }
            rhs[i] = sign * form.rhs[i];
            x[art] = residual.abs();
            basis.push(art);
        }
        for _ in 0..m {
            lower.push(0.0);
            upper.push(f64::INFINITY);
        }
        state.extend(std::iter::repeat(ColState::Basic).take(m));

        let mut cost = vec![0.0; cols];
        for c in &mut cost[n + m..] {
            *c = 1.0;
        }

        let mut tab = Self {
            n,
            m,
            orig: t.clone(),
            rhs,
            t,
            x,
            lower,
            upper,
            state,
            basis,
            cost,
            d: DVector::zeros(cols),
        };
        tab.refresh_reduced_costs();
        tab
    }

    pub fn num_cols(&self) -> usize {
        self.t.ncols()
    }

    /// Switch to the Phase II cost and pin every artificial at zero.
    pub fn start_phase_two(&mut self, cost: &[f64]) {
        let cols = self.num_cols();
        self.cost = vec![0.0; cols];
        self.cost[..self.n].copy_from_slice(cost);

        for j in self.n + self.m..cols {
            self.upper[j] = 0.0;
            if self.state[j] != ColState::Basic {
                self.x[j] = 0.0;
                self.state[j] = ColState::AtLower;
            }
        }
        self.refresh_reduced_costs();
    }

    /// Rebuild `B^{-1} [A | S | G]` and the basic values from the initial
    /// system with a fresh LU factorization of the basis.
    ///
    /// Returns `false` and leaves the tableau untouched when the basis
    /// matrix is numerically singular.
    pub fn refactor(&mut self) -> bool {
        if self.m == 0 {
            self.refresh_reduced_costs();
            return true;
        }

        let basis_matrix = self.orig.select_columns(&self.basis);
        let lu = basis_matrix.lu();

        let mut residual = self.rhs.clone();
        for j in 0..self.num_cols() {
            if self.state[j] != ColState::Basic && self.x[j] != 0.0 {
                residual.axpy(-self.x[j], &self.orig.column(j), 1.0);
            }
        }

        let (t, x_b) = match (lu.solve(&self.orig), lu.solve(&residual)) {
            (Some(t), Some(x_b)) if t.iter().chain(x_b.iter()).all(|v| v.is_finite()) => {
                (t, x_b)
            }
            _ => {
                log::warn!("LP: basis matrix is singular, keeping the updated tableau");
                return false;
            }
        };

        self.t = t;
        for (i, &b) in self.basis.iter().enumerate() {
            self.x[b] = x_b[i];
            // Exact unit columns for the basis
            for k in 0..self.m {
                self.t[(k, b)] = if k == i { 1.0 } else { 0.0 };
            }
        }
        self.refresh_reduced_costs();
        true
    }

    /// Recompute `d = c - c_B^T B^{-1} A` from scratch.
    pub fn refresh_reduced_costs(&mut self) {
        let cols = self.num_cols();
        for j in 0..cols {
            let mut dj = self.cost[j];
            for (i, &b) in self.basis.iter().enumerate() {
                dj -= self.cost[b] * self.t[(i, j)];
            }
            self.d[j] = dj;
        }
    }

    /// Current value of the phase objective.
    pub fn objective(&self) -> f64 {
        self.cost.iter().zip(self.x.iter()).map(|(c, x)| c * x).sum()
    }

    /// Sum of the artificial columns.
    pub fn infeasibility(&self) -> f64 {
        self.x.iter().skip(self.n + self.m).sum()
    }

    /// True if column `j` can move at all.
    pub fn is_fixed(&self, j: usize) -> bool {
        self.upper[j] - self.lower[j] <= 0.0
    }

    /// Move nonbasic column `q` by `step` in direction `dir`, updating the
    /// basic values along the column.
    pub fn shift(&mut self, q: usize, dir: f64, step: f64) {
        if step == 0.0 {
            return;
        }
        self.x[q] += dir * step;
        for i in 0..self.m {
            let b = self.basis[i];
            self.x[b] -= self.t[(i, q)] * dir * step;
        }
    }

    /// Replace the basic column of row `r` with column `q`.
    ///
    /// The leaving column is snapped to the bound it reached.
    pub fn pivot(&mut self, r: usize, q: usize, leave_state: ColState) {
        let cols = self.num_cols();
        let leaving = self.basis[r];

        let p = self.t[(r, q)];
        for j in 0..cols {
            self.t[(r, j)] /= p;
        }
        for i in 0..self.m {
            if i == r {
                continue;
            }
            let f = self.t[(i, q)];
            if f != 0.0 {
                for j in 0..cols {
                    let v = self.t[(r, j)];
                    self.t[(i, j)] -= f * v;
                }
            }
        }
        let dq = self.d[q];
        if dq != 0.0 {
            for j in 0..cols {
                self.d[j] -= dq * self.t[(r, j)];
            }
        }

        self.basis[r] = q;
        self.state[q] = ColState::Basic;
        self.state[leaving] = leave_state;
        self.x[leaving] = match leave_state {
            ColState::AtUpper => self.upper[leaving],
            _ => self.lower[leaving],
        };
    }

    /// Structural part of the primal point.
    pub fn structural_values(&self) -> Vec<f64> {
        (0..self.n)
            .map(|j| {
                let v = self.x[j];
                // Remove round-off just outside the box
                if v < self.lower[j] {
                    self.lower[j]
                } else if v > self.upper[j] {
                    self.upper[j]
                } else {
                    v
                }
            })
            .collect()
    }
}
