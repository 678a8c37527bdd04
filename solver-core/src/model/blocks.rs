//! Reusable constraint blocks shared by the problem formulations.

use super::{ConstraintId, ConstraintOp, LinExpr, Model, VarId};
use crate::error::{ModelError, ModelResult};

impl Model {
    /// Add the knapsack row `sum_j costs[j] * vars[j] <= budget`.
    pub fn add_budget_constraint(
        &mut self,
        vars: &[VarId],
        costs: &[f64],
        budget: f64,
    ) -> ModelResult<ConstraintId> {
        if vars.len() != costs.len() {
            return Err(ModelError::MalformedConstraint(format!(
                "budget: {} variables but {} costs",
                vars.len(),
                costs.len()
            )));
        }
        self.add_named_constraint(
            "budget",
            LinExpr::weighted_sum(vars, costs),
            ConstraintOp::Le,
            budget,
        )
    }

    /// Add unit-flow conservation rows for a directed network.
    ///
    /// `arcs[a] = (from, to)` with node indices below `num_nodes`, and
    /// `arc_vars[a]` is the flow variable of arc `a`. For every node `v` the
    /// row `outflow(v) - inflow(v) = d(v)` is added, with `d(source) = 1`,
    /// `d(sink) = -1` and `d(v) = 0` otherwise. Rows are returned in node
    /// order.
    pub fn add_flow_conservation(
        &mut self,
        num_nodes: usize,
        arcs: &[(usize, usize)],
        arc_vars: &[VarId],
        source: usize,
        sink: usize,
    ) -> ModelResult<Vec<ConstraintId>> {
        if arcs.len() != arc_vars.len() {
            return Err(ModelError::MalformedConstraint(format!(
                "flow: {} arcs but {} arc variables",
                arcs.len(),
                arc_vars.len()
            )));
        }
        if source >= num_nodes || sink >= num_nodes || source == sink {
            return Err(ModelError::MalformedConstraint(format!(
                "flow: invalid source {source} / sink {sink} for {num_nodes} nodes"
            )));
        }

        let mut balance = vec![LinExpr::new(); num_nodes];
        for (a, (&(from, to), &var)) in arcs.iter().zip(arc_vars).enumerate() {
            if from >= num_nodes || to >= num_nodes {
                return Err(ModelError::MalformedConstraint(format!(
                    "flow: arc {a} ({from} -> {to}) references a missing node"
                )));
            }
            balance[from].add_term(var, 1.0);
            balance[to].add_term(var, -1.0);
        }

        balance
            .into_iter()
            .enumerate()
            .map(|(v, expr)| {
                let demand = if v == source {
                    1.0
                } else if v == sink {
                    -1.0
                } else {
                    0.0
                };
                self.add_named_constraint(&format!("flow_{v}"), expr, ConstraintOp::Eq, demand)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sense;

    #[test]
    fn test_budget_block() {
        let mut model = Model::new(Sense::Maximize);
        let x: Vec<VarId> = (0..3).map(|_| model.add_binary().unwrap()).collect();

        let id = model.add_budget_constraint(&x, &[3.0, 4.0, 5.0], 8.0).unwrap();
        let row = model.constraint(id).unwrap();
        assert_eq!(row.op, ConstraintOp::Le);
        assert_eq!(row.rhs, 8.0);
        assert_eq!(row.name.as_deref(), Some("budget"));

        assert!(model.add_budget_constraint(&x, &[1.0], 8.0).is_err());
    }

    #[test]
    fn test_flow_block_balances() {
        // 0 -> 1 -> 2, plus shortcut 0 -> 2
        let arcs = [(0, 1), (1, 2), (0, 2)];
        let mut model = Model::new(Sense::Minimize);
        let vars: Vec<VarId> = arcs.iter().map(|_| model.add_binary().unwrap()).collect();

        let rows = model.add_flow_conservation(3, &arcs, &vars, 0, 2).unwrap();
        assert_eq!(rows.len(), 3);

        // Path through node 1 is feasible, a lone arc into node 1 is not
        assert!(model.is_feasible(&[1.0, 1.0, 0.0], 1e-9));
        assert!(model.is_feasible(&[0.0, 0.0, 1.0], 1e-9));
        assert!(!model.is_feasible(&[1.0, 0.0, 0.0], 1e-9));
    }

    #[test]
    fn test_flow_block_rejects_bad_nodes() {
        let mut model = Model::new(Sense::Minimize);
        let v = model.add_binary().unwrap();
        assert!(model.add_flow_conservation(2, &[(0, 5)], &[v], 0, 1).is_err());
        assert!(model.add_flow_conservation(2, &[(0, 1)], &[v], 1, 1).is_err());
    }
}
