//! Robustness criteria.

use std::fmt;

/// Criterion of a budgeted selection problem (utilities, maximized).
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionCriterion {
    /// Maximize the utility of one scenario.
    Scenario(usize),
    /// Maximize the worst-scenario utility.
    Maximin,
    /// Minimize the largest regret `z*_i - utility_i(x)`.
    MinimaxRegret,
    /// Maximize the OWA of the utilities.
    MaxOwa(Vec<f64>),
    /// Minimize the OWA of the regrets.
    MinOwaRegret(Vec<f64>),
    /// Maximize `sum_i lambda_i utility_i(x)`.
    WeightedSum(Vec<f64>),
}

impl SelectionCriterion {
    /// True if the criterion needs the per-scenario optima first.
    pub fn needs_scenario_optima(&self) -> bool {
        matches!(self, Self::MinimaxRegret | Self::MinOwaRegret(_))
    }
}

impl fmt::Display for SelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scenario(s) => write!(f, "scenario {s}"),
            Self::Maximin => f.write_str("maximin"),
            Self::MinimaxRegret => f.write_str("minimax regret"),
            Self::MaxOwa(w) => write!(f, "max-OWA {w:?}"),
            Self::MinOwaRegret(w) => write!(f, "min-OWA of regrets {w:?}"),
            Self::WeightedSum(w) => write!(f, "weighted sum {w:?}"),
        }
    }
}

/// Criterion of a shortest-path problem (costs, minimized).
#[derive(Debug, Clone, PartialEq)]
pub enum PathCriterion {
    /// Minimize the cost of one scenario.
    Scenario(usize),
    /// Minimize the worst-scenario cost.
    Maximin,
    /// Minimize the largest regret `cost_s(x) - z*_s`.
    MinimaxRegret,
    /// Minimize the OWA of the costs.
    Owa(Vec<f64>),
    /// Minimize the OWA of the regrets.
    MinOwaRegret(Vec<f64>),
    /// Minimize `sum_s lambda_s cost_s(x)`.
    WeightedSum(Vec<f64>),
}

impl PathCriterion {
    /// True if the criterion needs the per-scenario shortest paths first.
    pub fn needs_scenario_optima(&self) -> bool {
        matches!(self, Self::MinimaxRegret | Self::MinOwaRegret(_))
    }
}

impl fmt::Display for PathCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scenario(s) => write!(f, "scenario {s}"),
            Self::Maximin => f.write_str("min-max cost"),
            Self::MinimaxRegret => f.write_str("minimax regret"),
            Self::Owa(w) => write!(f, "OWA {w:?}"),
            Self::MinOwaRegret(w) => write!(f, "min-OWA of regrets {w:?}"),
            Self::WeightedSum(w) => write!(f, "weighted sum {w:?}"),
        }
    }
}
