//! Minix core: linear models and their continuous relaxations.
//!
//! This crate provides the two lowest layers of the solver stack:
//!
//! - **Model builder** ([`model`]): variables, linear constraints and a linear
//!   objective, validated eagerly as they are added.
//! - **LP relaxation engine** ([`simplex`]): a bounded-variable primal simplex
//!   that solves the continuous relaxation of a model under per-variable bound
//!   overrides.
//!
//! Integrality is never enforced here. Binary variables are plain `[0, 1]`
//! columns as far as the simplex is concerned; the branch-and-bound layer in
//! `solver-mip` is responsible for driving them to `{0, 1}`.
//!
//! # Example
//!
//! ```
//! use solver_core::{ConstraintOp, LinExpr, LpSettings, LpStatus, Model, Sense};
//!
//! // max x + 2y  s.t.  x + y <= 4,  0 <= x <= 3,  0 <= y <= 3
//! let mut model = Model::new(Sense::Maximize);
//! let x = model.add_continuous(0.0, 3.0).unwrap();
//! let y = model.add_continuous(0.0, 3.0).unwrap();
//! model
//!     .add_constraint(LinExpr::from(x) + y, ConstraintOp::Le, 4.0)
//!     .unwrap();
//! model.set_objective(LinExpr::from(x) + 2.0 * y).unwrap();
//!
//! let sol = model.solve_relaxation(&LpSettings::default()).unwrap();
//! assert_eq!(sol.status, LpStatus::Optimal);
//! assert!((sol.objective - 7.0).abs() < 1e-9);
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod model;
pub mod simplex;
pub mod standard;

pub use error::{LpError, LpResult, ModelError, ModelResult};
pub use model::{
    Constraint, ConstraintId, ConstraintOp, LinExpr, Model, Sense, VarDomain, VarId, VarTag,
    Variable,
};
pub use simplex::{solve_relaxation, BoundOverrides, LpSettings, LpSolution, LpStatus};
pub use standard::StandardForm;

/// Global tolerance for feasibility and integrality checks.
///
/// A value within `EPSILON` of an integer is treated as integral, and a
/// constraint violated by at most `EPSILON` is treated as satisfied.
pub const EPSILON: f64 = 1e-6;
