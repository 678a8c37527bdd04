//! Decoded solutions.

use std::fmt;

use solver_mip::MipStatus;

/// Solution of a budgeted selection problem.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    /// Selected projects, 0-based and ascending.
    pub selected: Vec<usize>,
    /// Objective value of the criterion.
    pub objective: f64,
    /// Utility of the selection in each scenario.
    pub scenario_values: Vec<f64>,
    /// Regret per scenario, for regret criteria.
    pub regrets: Option<Vec<f64>>,
    /// Whether the search completed.
    pub status: MipStatus,
}

impl SelectionResult {
    /// Worst-scenario utility.
    pub fn min_value(&self) -> f64 {
        self.scenario_values
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }
}

impl fmt::Display for SelectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "objective: {}", self.objective)?;
        writeln!(f, "selected projects: {:?}", self.selected)?;
        write!(f, "scenario utilities: {:?}", self.scenario_values)?;
        if let Some(regrets) = &self.regrets {
            write!(f, "\nregrets: {regrets:?}")?;
        }
        if !self.status.is_optimal() {
            write!(f, "\n(search stopped early, solution may be suboptimal)")?;
        }
        Ok(())
    }
}

/// Solution of a shortest-path problem.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Node names from source to sink.
    pub nodes: Vec<String>,
    /// Arc indices in path order.
    pub arcs: Vec<usize>,
    /// Objective value of the criterion.
    pub objective: f64,
    /// Cost of the path in each scenario.
    pub scenario_costs: Vec<f64>,
    /// Regret per scenario, for regret criteria.
    pub regrets: Option<Vec<f64>>,
    /// Whether the search completed.
    pub status: MipStatus,
}

impl PathResult {
    /// Path rendered as `a -> b -> c`.
    pub fn route(&self) -> String {
        self.nodes.join(" -> ")
    }

    /// Worst-scenario cost.
    pub fn max_cost(&self) -> f64 {
        self.scenario_costs
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "objective: {}", self.objective)?;
        writeln!(f, "path: {}", self.route())?;
        write!(f, "scenario costs: {:?}", self.scenario_costs)?;
        if let Some(regrets) = &self.regrets {
            write!(f, "\nregrets: {regrets:?}")?;
        }
        if !self.status.is_optimal() {
            write!(f, "\n(search stopped early, solution may be suboptimal)")?;
        }
        Ok(())
    }
}
