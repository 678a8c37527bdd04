//! Bounded-variable primal simplex for LP relaxations.
//!
//! The engine solves the continuous relaxation of a [`StandardForm`] under a
//! set of [`BoundOverrides`]:
//!
//! 1. Rows are turned into equalities with nonnegative slacks.
//! 2. Phase I adds one bounded artificial per row and minimizes their sum.
//!    A positive optimum proves the relaxation infeasible.
//! 3. Artificials are fixed to zero and Phase II minimizes the real cost.
//!
//! Variables keep their bounds throughout (nonbasic at a bound, or at zero
//! when free), so binary columns never need explicit `x <= 1` rows.
//!
//! Pricing is Dantzig's rule with ties broken by the lowest column index.
//! After a streak of degenerate pivots the engine switches to Bland's rule,
//! which cannot cycle. Both rules are deterministic: the same input always
//! produces the same pivot sequence.
//!
//! Under Dantzig pricing the leaving row comes from a two-pass Harris ratio
//! test, which trades a bounded infeasibility for larger pivots. The basis
//! is refactored with a dense LU every `refactor_every` pivots and before
//! any optimality or unboundedness verdict, and the returned point is
//! checked against the original rows.

mod bounds;
mod result;
mod settings;
mod solver;
mod tableau;

pub use bounds::BoundOverrides;
pub use result::{LpSolution, LpStatus};
pub use settings::LpSettings;
pub use solver::solve_relaxation;
