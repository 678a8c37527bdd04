//! Branch-and-bound search tree management.

mod branching;
mod incumbent;
mod node;
mod queue;
mod tree;

pub use branching::{select_most_fractional, BranchDecision};
pub use incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbent};
pub use node::{BoundChange, NodeState, SearchNode};
pub use queue::NodeQueue;
pub use tree::{BranchAndBound, TreeStats};
