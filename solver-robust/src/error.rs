//! Error types for the robust formulations.

use solver_core::ModelError;
use solver_mip::MipError;
use thiserror::Error;

/// Errors raised while validating, building, solving or decoding a robust
/// problem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RobustError {
    /// Instance data is inconsistent or out of range.
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// Building the model failed.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The MILP solve failed.
    #[error(transparent)]
    Solve(#[from] MipError),

    /// The solution could not be mapped back to domain terms.
    #[error("Cannot decode solution: {0}")]
    Decode(String),
}

/// Result type for robust formulations.
pub type RobustResult<T> = Result<T, RobustError>;
