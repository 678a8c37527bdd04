//! Node relaxation backends.

mod backend;
mod simplex_backend;

pub use backend::{RelaxationBackend, RelaxationResult, RelaxationStatus};
pub use simplex_backend::SimplexBackend;
