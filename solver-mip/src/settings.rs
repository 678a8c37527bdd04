//! Configuration settings for the MIP solver.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use solver_core::{LpSettings, EPSILON};

use crate::error::{MipError, MipResult};

/// Node selection strategy for the B&B tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSelection {
    /// LIFO stack: always continue below the most recently branched node.
    #[default]
    DepthFirst,

    /// Always select the node with the best (lowest) parent bound.
    BestBound,
}

/// MIP solver settings.
#[derive(Debug, Clone)]
pub struct MipSettings {
    // === Termination criteria ===
    /// Maximum number of nodes to explore.
    pub max_nodes: u64,

    /// Time limit in milliseconds (None = unlimited).
    pub time_limit_ms: Option<u64>,

    /// External cancellation flag, polled once per popped node.
    pub interrupt: Option<Arc<AtomicBool>>,

    /// Integer feasibility tolerance.
    /// A binary is considered integral if |x - round(x)| <= int_feas_tol.
    pub int_feas_tol: f64,

    // === Search strategy ===
    /// Node selection strategy.
    pub node_selection: NodeSelection,

    /// Number of open subtrees the parallel solver expands before
    /// fanning out.
    pub frontier_size: usize,

    // === Solver settings ===
    /// Settings for the node relaxations.
    pub lp_settings: LpSettings,

    // === Output ===
    /// Log incumbents and the solve summary at `info` level.
    pub verbose: bool,

    /// Log frequency (log every N nodes at `debug` level).
    pub log_freq: u64,
}

impl Default for MipSettings {
    fn default() -> Self {
        Self {
            max_nodes: 1_000_000,
            time_limit_ms: None,
            interrupt: None,
            int_feas_tol: EPSILON,
            node_selection: NodeSelection::default(),
            frontier_size: 16,
            lp_settings: LpSettings::default(),
            verbose: false,
            log_freq: 100,
        }
    }
}

impl MipSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_freq: 1,
            ..Self::default()
        }
    }

    /// Set time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_ms = Some((seconds * 1000.0) as u64);
        self
    }

    /// Set maximum nodes.
    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Set the node selection strategy.
    pub fn with_node_selection(mut self, selection: NodeSelection) -> Self {
        self.node_selection = selection;
        self
    }

    /// Attach an interrupt flag.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Toggle verbose logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check that every setting is in range.
    pub fn validate(&self) -> MipResult<()> {
        if !(self.int_feas_tol > 0.0 && self.int_feas_tol < 0.5) {
            return Err(MipError::InvalidSettings(format!(
                "int_feas_tol must lie in (0, 0.5), got {}",
                self.int_feas_tol
            )));
        }
        if self.log_freq == 0 {
            return Err(MipError::InvalidSettings("log_freq must be positive".into()));
        }
        if self.frontier_size == 0 {
            return Err(MipError::InvalidSettings(
                "frontier_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let s = MipSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.node_selection, NodeSelection::DepthFirst);
        assert!(s.interrupt.is_none());
    }

    #[test]
    fn test_builders() {
        let s = MipSettings::default()
            .with_time_limit(1.5)
            .with_max_nodes(10)
            .with_node_selection(NodeSelection::BestBound);
        assert_eq!(s.time_limit_ms, Some(1500));
        assert_eq!(s.max_nodes, 10);
        assert_eq!(s.node_selection, NodeSelection::BestBound);
    }

    #[test]
    fn test_rejects_bad_tolerance() {
        let s = MipSettings {
            int_feas_tol: 0.5,
            ..MipSettings::default()
        };
        assert!(matches!(s.validate(), Err(MipError::InvalidSettings(_))));
    }
}
