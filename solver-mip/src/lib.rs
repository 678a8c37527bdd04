//! Mixed-integer layer for the minix solver.
//!
//! Branch-and-bound over the binary variables of a
//! [`solver_core::Model`], using the bounded simplex of `solver-core` for
//! node relaxations.
//!
//! Internally every objective is on the minimization scale: a maximization
//! model is negated once when its standard form is built, and results are
//! converted back to the model's sense in [`MipSolution`].
//!
//! ```
//! use solver_core::{LinExpr, Model, Sense};
//! use solver_mip::{solve_mip, MipSettings, MipStatus};
//!
//! // max 5a + 4b + 3c  s.t.  2a + 3b + c <= 5
//! let mut model = Model::new(Sense::Maximize);
//! let x: Vec<_> = (0..3).map(|_| model.add_binary().unwrap()).collect();
//! model.add_budget_constraint(&x, &[2.0, 3.0, 1.0], 5.0).unwrap();
//! model.set_objective(LinExpr::weighted_sum(&x, &[5.0, 4.0, 3.0])).unwrap();
//!
//! let sol = solve_mip(&model, &MipSettings::default()).unwrap();
//! assert_eq!(sol.status, MipStatus::Optimal);
//! assert!((sol.objective - 9.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod relaxation;
pub mod search;
pub mod settings;

#[cfg(feature = "parallel")]
mod parallel;
mod solve;

pub use error::{MipError, MipResult};
pub use model::{IncumbentTracker, MipProblem, MipSolution, MipStatus, TerminationReason};
pub use search::{IncumbentStore, NoSharedIncumbent, SharedIncumbent};
pub use settings::{MipSettings, NodeSelection};
pub use solve::solve_mip;

#[cfg(feature = "parallel")]
pub use parallel::solve_mip_parallel;
