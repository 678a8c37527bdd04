//! Error types for model construction and LP solves.

use thiserror::Error;

/// Errors raised while assembling a [`Model`](crate::Model).
///
/// These are construction-time errors: a model that was built without error
/// never produces them later.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// An expression references a variable that does not belong to the model.
    #[error("Unknown variable x{var} (model has {num_vars} variables)")]
    UnknownVariable {
        /// Index of the offending variable.
        var: usize,
        /// Number of variables in the model.
        num_vars: usize,
    },

    /// A constraint has a non-finite coefficient or right-hand side, or its
    /// structural inputs are inconsistent (mismatched lengths, bad node ids).
    #[error("Malformed constraint: {0}")]
    MalformedConstraint(String),

    /// The objective has a non-finite coefficient or constant.
    #[error("Malformed objective: {0}")]
    MalformedObjective(String),

    /// Variable bounds are NaN, inverted, or outside `[0, 1]` for a binary.
    #[error("Invalid bounds [{lower}, {upper}] for {domain} variable")]
    InvalidBounds {
        /// Requested lower bound.
        lower: f64,
        /// Requested upper bound.
        upper: f64,
        /// Domain name of the variable.
        domain: &'static str,
    },
}

/// Errors raised by the LP relaxation engine.
///
/// Infeasibility and unboundedness are not errors; they are reported through
/// [`LpStatus`](crate::LpStatus).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LpError {
    /// The simplex exceeded its pivot budget.
    #[error("Simplex iteration limit ({0}) reached")]
    IterationLimit(usize),

    /// Bound overrides do not match the number of model columns.
    #[error("Bound overrides have {got} entries, model has {expected} variables")]
    DimensionMismatch {
        /// Number of model variables.
        expected: usize,
        /// Number of override entries supplied.
        got: usize,
    },

    /// The final point violates a row by more than the feasibility
    /// tolerance even after re-solving with a refactorization every pivot.
    #[error("Simplex lost accuracy: row violation {violation:.3e} exceeds tolerance")]
    NumericalTrouble {
        /// Largest row violation of the returned point.
        violation: f64,
    },
}

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;

/// Result type for LP solves.
pub type LpResult<T> = Result<T, LpError>;
