//! Robust combinatorial optimization on the minix MILP core.
//!
//! Two problem families are formulated as MILPs, solved with
//! [`solver_mip::solve_mip`] and decoded back to domain terms:
//!
//! * budgeted project selection with per-scenario utilities
//!   ([`selection`]),
//! * shortest path with per-scenario arc costs ([`path`]).
//!
//! Each supports a single scenario, maximin, minimax regret, OWA, OWA of
//! regrets and a weighted sum of scenarios. Regret criteria first solve
//! every single-scenario problem and use the optima as constants.
//!
//! ```
//! use solver_mip::MipSettings;
//! use solver_robust::{data, solve_selection, SelectionCriterion};
//!
//! let inst = data::portfolio_example().unwrap();
//! let res = solve_selection(&inst, &SelectionCriterion::Maximin, &MipSettings::default()).unwrap();
//! assert!((res.objective - 66.0).abs() < 1e-6);
//! ```

#![warn(missing_docs)]

pub mod criterion;
pub mod data;
pub mod error;
pub mod instance;
pub mod owa;
pub mod path;
pub mod result;
pub mod selection;

pub use criterion::{PathCriterion, SelectionCriterion};
pub use error::{RobustError, RobustResult};
pub use instance::{PathArc, PathInstance, ProjectInstance};
pub use path::{shortest_paths, solve_path, PathModel};
pub use result::{PathResult, SelectionResult};
pub use selection::{scenario_optima, solve_selection, SelectionModel};
