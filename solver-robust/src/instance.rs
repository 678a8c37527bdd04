//! Problem instances.
//!
//! Instances are validated on construction; every formulator can assume
//! consistent dimensions and finite data afterwards.

use crate::error::{RobustError, RobustResult};

fn invalid(msg: impl Into<String>) -> RobustError {
    RobustError::InvalidInstance(msg.into())
}

/// Budgeted project selection under scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInstance {
    costs: Vec<f64>,
    utilities: Vec<Vec<f64>>,
    budget: f64,
}

impl ProjectInstance {
    /// Create an instance.
    ///
    /// `utilities[i][j]` is the utility of project `j` in scenario `i`.
    /// Costs must be positive, the budget nonnegative, every utility row
    /// must cover every project, and there must be at least one scenario.
    pub fn new(costs: Vec<f64>, utilities: Vec<Vec<f64>>, budget: f64) -> RobustResult<Self> {
        if costs.is_empty() {
            return Err(invalid("no projects"));
        }
        if let Some(j) = costs.iter().position(|c| !(c.is_finite() && *c > 0.0)) {
            return Err(invalid(format!("project {j} has cost {}", costs[j])));
        }
        if !(budget.is_finite() && budget >= 0.0) {
            return Err(invalid(format!("budget {budget} must be finite and nonnegative")));
        }
        if utilities.is_empty() {
            return Err(invalid("no scenarios"));
        }
        for (i, row) in utilities.iter().enumerate() {
            if row.len() != costs.len() {
                return Err(invalid(format!(
                    "scenario {i} has {} utilities for {} projects",
                    row.len(),
                    costs.len()
                )));
            }
            if row.iter().any(|u| !u.is_finite()) {
                return Err(invalid(format!("scenario {i} has a non-finite utility")));
            }
        }
        Ok(Self {
            costs,
            utilities,
            budget,
        })
    }

    /// Number of projects.
    pub fn num_projects(&self) -> usize {
        self.costs.len()
    }

    /// Number of scenarios.
    pub fn num_scenarios(&self) -> usize {
        self.utilities.len()
    }

    /// Project costs.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Utilities of every project in scenario `i`.
    pub fn utilities(&self, i: usize) -> &[f64] {
        &self.utilities[i]
    }

    /// Budget.
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Utility of a selection in every scenario.
    pub fn scenario_values(&self, selected: &[usize]) -> Vec<f64> {
        self.utilities
            .iter()
            .map(|row| selected.iter().map(|&j| row[j]).sum())
            .collect()
    }

    /// Total cost of a selection.
    pub fn selection_cost(&self, selected: &[usize]) -> f64 {
        selected.iter().map(|&j| self.costs[j]).sum()
    }
}

/// A directed arc with one cost per scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct PathArc {
    /// Tail node index.
    pub from: usize,
    /// Head node index.
    pub to: usize,
    /// Cost in each scenario.
    pub costs: Vec<f64>,
}

/// Shortest path under scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct PathInstance {
    nodes: Vec<String>,
    arcs: Vec<PathArc>,
    source: usize,
    sink: usize,
}

impl PathInstance {
    /// Create an instance from node indices.
    pub fn new(
        nodes: Vec<String>,
        arcs: Vec<PathArc>,
        source: usize,
        sink: usize,
    ) -> RobustResult<Self> {
        let n = nodes.len();
        if source >= n || sink >= n {
            return Err(invalid(format!(
                "source {source} / sink {sink} out of range for {n} nodes"
            )));
        }
        if source == sink {
            return Err(invalid("source and sink coincide"));
        }
        let scenarios = arcs.first().map_or(0, |a| a.costs.len());
        if scenarios == 0 {
            return Err(invalid("no arcs or no scenarios"));
        }
        for (a, arc) in arcs.iter().enumerate() {
            if arc.from >= n || arc.to >= n {
                return Err(invalid(format!("arc {a} references a missing node")));
            }
            if arc.costs.len() != scenarios {
                return Err(invalid(format!(
                    "arc {a} has {} costs, expected {scenarios}",
                    arc.costs.len()
                )));
            }
            if arc.costs.iter().any(|c| !(c.is_finite() && *c >= 0.0)) {
                return Err(invalid(format!("arc {a} has a negative or non-finite cost")));
            }
        }
        Ok(Self {
            nodes,
            arcs,
            source,
            sink,
        })
    }

    /// Create an instance from node names.
    ///
    /// Arcs are `(from, to, costs)`; every name must appear in `nodes`.
    pub fn from_named(
        nodes: &[&str],
        arcs: &[(&str, &str, &[f64])],
        source: &str,
        sink: &str,
    ) -> RobustResult<Self> {
        let index = |name: &str| {
            nodes
                .iter()
                .position(|n| *n == name)
                .ok_or_else(|| invalid(format!("unknown node '{name}'")))
        };
        let arcs = arcs
            .iter()
            .map(|&(from, to, costs)| {
                Ok(PathArc {
                    from: index(from)?,
                    to: index(to)?,
                    costs: costs.to_vec(),
                })
            })
            .collect::<RobustResult<Vec<_>>>()?;
        Self::new(
            nodes.iter().map(|n| n.to_string()).collect(),
            arcs,
            index(source)?,
            index(sink)?,
        )
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of scenarios.
    pub fn num_scenarios(&self) -> usize {
        self.arcs[0].costs.len()
    }

    /// Node names.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Arcs.
    pub fn arcs(&self) -> &[PathArc] {
        &self.arcs
    }

    /// Source node index.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Sink node index.
    pub fn sink(&self) -> usize {
        self.sink
    }

    /// `(from, to)` pairs of all arcs.
    pub fn endpoints(&self) -> Vec<(usize, usize)> {
        self.arcs.iter().map(|a| (a.from, a.to)).collect()
    }

    /// Costs of all arcs in scenario `s`.
    pub fn scenario_costs(&self, s: usize) -> Vec<f64> {
        self.arcs.iter().map(|a| a.costs[s]).collect()
    }

    /// Cost of a set of arcs in every scenario.
    pub fn path_costs(&self, arcs: &[usize]) -> Vec<f64> {
        (0..self.num_scenarios())
            .map(|s| arcs.iter().map(|&a| self.arcs[a].costs[s]).sum())
            .collect()
    }

    /// `"from->to"` label of arc `a`.
    pub fn arc_label(&self, a: usize) -> String {
        let arc = &self.arcs[a];
        format!("{}->{}", self.nodes[arc.from], self.nodes[arc.to])
    }
}

/// Check OWA or weighted-sum weights against a scenario count.
pub fn validate_weights(weights: &[f64], num_scenarios: usize) -> RobustResult<()> {
    if weights.len() != num_scenarios {
        return Err(invalid(format!(
            "{} weights for {num_scenarios} scenarios",
            weights.len()
        )));
    }
    if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
        return Err(invalid("weights must be finite and nonnegative"));
    }
    Ok(())
}
