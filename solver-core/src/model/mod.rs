//! In-memory linear model: variables, constraints and objective.

mod blocks;
mod builder;
mod constraint;
mod expr;
mod variable;

pub use builder::{Model, Sense};
pub use constraint::{Constraint, ConstraintId, ConstraintOp};
pub use expr::LinExpr;
pub use variable::{VarDomain, VarId, VarTag, Variable};
