//! Error types for the MIP solver.

use solver_core::{LpError, ModelError};
use thiserror::Error;

use crate::model::TerminationReason;

/// Errors that can occur during MIP solving.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MipError {
    /// The search completed without finding an integer-feasible point.
    #[error("Problem is infeasible: no integer-feasible node")]
    Infeasible,

    /// A node relaxation is unbounded; the model is missing a bounding
    /// constraint.
    #[error("Problem is unbounded: relaxation has an improving ray")]
    Unbounded,

    /// The search was cancelled before any incumbent was found.
    #[error("No solution found before termination ({reason})")]
    NoSolution {
        /// What stopped the search.
        reason: TerminationReason,
    },

    /// Model construction failed
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// LP relaxation failed
    #[error("LP relaxation failed: {0}")]
    Lp(#[from] LpError),

    /// Settings are out of range
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for MIP operations.
pub type MipResult<T> = Result<T, MipError>;
