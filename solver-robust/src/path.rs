//! Shortest path under scenarios.
//!
//! One tagged binary `y_a` per arc and unit-flow conservation from the
//! source to the sink. All criteria minimize.

use log::{debug, info};
use solver_core::{ConstraintOp, LinExpr, Model, Sense, VarId, VarTag};
use solver_mip::{solve_mip, MipSettings, MipStatus};

use crate::criterion::PathCriterion;
use crate::error::{RobustError, RobustResult};
use crate::instance::{validate_weights, PathInstance};
use crate::owa::linearize_min_owa;
use crate::result::PathResult;

/// A built path model and its arc columns.
#[derive(Debug, Clone)]
pub struct PathModel {
    /// The MILP.
    pub model: Model,
    /// `arcs[a]` selects arc `a`.
    pub arcs: Vec<VarId>,
}

impl PathModel {
    fn new(inst: &PathInstance) -> RobustResult<Self> {
        let mut model = Model::named("path", Sense::Minimize);
        let arcs = (0..inst.arcs().len())
            .map(|a| model.add_binary_tagged(VarTag::Arc(a), &format!("y_{}", inst.arc_label(a))))
            .collect::<Result<Vec<_>, _>>()?;
        model.add_flow_conservation(
            inst.num_nodes(),
            &inst.endpoints(),
            &arcs,
            inst.source(),
            inst.sink(),
        )?;
        Ok(Self { model, arcs })
    }

    fn cost(&self, inst: &PathInstance, s: usize) -> LinExpr {
        LinExpr::weighted_sum(&self.arcs, &inst.scenario_costs(s))
    }

    fn regret(&self, inst: &PathInstance, s: usize, optimum: f64) -> LinExpr {
        self.cost(inst, s) - optimum
    }

    /// Minimize `z` subject to `z >= scores[s]`.
    fn minimize_worst(&mut self, scores: Vec<LinExpr>) -> RobustResult<()> {
        let z = self.model.add_free_named("z")?;
        for (s, score) in scores.into_iter().enumerate() {
            let row = LinExpr::from(z) - score;
            self.model
                .add_named_constraint(&format!("worst_{s}"), row, ConstraintOp::Ge, 0.0)?;
        }
        self.model.set_objective(LinExpr::from(z))?;
        Ok(())
    }
}

fn check_scenario(inst: &PathInstance, s: usize) -> RobustResult<()> {
    if s >= inst.num_scenarios() {
        return Err(RobustError::InvalidInstance(format!(
            "scenario {s} out of range ({} scenarios)",
            inst.num_scenarios()
        )));
    }
    Ok(())
}

fn check_optima(inst: &PathInstance, optima: &[f64]) -> RobustResult<()> {
    if optima.len() != inst.num_scenarios() || optima.iter().any(|z| !z.is_finite()) {
        return Err(RobustError::InvalidInstance(format!(
            "{} shortest-path costs for {} scenarios",
            optima.len(),
            inst.num_scenarios()
        )));
    }
    Ok(())
}

/// Minimize the cost of scenario `s`.
pub fn build_scenario_model(inst: &PathInstance, s: usize) -> RobustResult<PathModel> {
    check_scenario(inst, s)?;
    let mut pm = PathModel::new(inst)?;
    let objective = pm.cost(inst, s);
    pm.model.set_objective(objective)?;
    Ok(pm)
}

/// Minimize the worst-scenario cost.
pub fn build_maximin_model(inst: &PathInstance) -> RobustResult<PathModel> {
    let mut pm = PathModel::new(inst)?;
    let scores = (0..inst.num_scenarios()).map(|s| pm.cost(inst, s)).collect();
    pm.minimize_worst(scores)?;
    Ok(pm)
}

/// Minimize the largest regret against the per-scenario shortest paths.
pub fn build_regret_model(inst: &PathInstance, optima: &[f64]) -> RobustResult<PathModel> {
    check_optima(inst, optima)?;
    let mut pm = PathModel::new(inst)?;
    let scores = optima
        .iter()
        .enumerate()
        .map(|(s, &z)| pm.regret(inst, s, z))
        .collect();
    pm.minimize_worst(scores)?;
    Ok(pm)
}

/// Minimize the OWA of the scenario costs.
pub fn build_owa_model(inst: &PathInstance, weights: &[f64]) -> RobustResult<PathModel> {
    validate_weights(weights, inst.num_scenarios())?;
    let mut pm = PathModel::new(inst)?;
    let scores: Vec<LinExpr> = (0..inst.num_scenarios()).map(|s| pm.cost(inst, s)).collect();
    let objective = linearize_min_owa(&mut pm.model, &scores, weights)?;
    pm.model.set_objective(objective)?;
    Ok(pm)
}

/// Minimize the OWA of the scenario regrets.
pub fn build_min_owa_regret_model(
    inst: &PathInstance,
    weights: &[f64],
    optima: &[f64],
) -> RobustResult<PathModel> {
    validate_weights(weights, inst.num_scenarios())?;
    check_optima(inst, optima)?;
    let mut pm = PathModel::new(inst)?;
    let scores: Vec<LinExpr> = optima
        .iter()
        .enumerate()
        .map(|(s, &z)| pm.regret(inst, s, z))
        .collect();
    let objective = linearize_min_owa(&mut pm.model, &scores, weights)?;
    pm.model.set_objective(objective)?;
    Ok(pm)
}

/// Minimize `sum_s lambda_s cost_s(x)`.
pub fn build_weighted_sum_model(inst: &PathInstance, lambdas: &[f64]) -> RobustResult<PathModel> {
    validate_weights(lambdas, inst.num_scenarios())?;
    let mut pm = PathModel::new(inst)?;
    let objective: LinExpr = lambdas
        .iter()
        .enumerate()
        .map(|(s, &l)| l * pm.cost(inst, s))
        .sum();
    pm.model.set_objective(objective)?;
    Ok(pm)
}

/// Build the model of any criterion.
pub fn build_path_model(
    inst: &PathInstance,
    criterion: &PathCriterion,
    optima: Option<&[f64]>,
) -> RobustResult<PathModel> {
    let need = || {
        optima.ok_or_else(|| {
            RobustError::InvalidInstance(format!("{criterion} requires shortest-path costs"))
        })
    };
    match criterion {
        PathCriterion::Scenario(s) => build_scenario_model(inst, *s),
        PathCriterion::Maximin => build_maximin_model(inst),
        PathCriterion::MinimaxRegret => build_regret_model(inst, need()?),
        PathCriterion::Owa(w) => build_owa_model(inst, w),
        PathCriterion::MinOwaRegret(w) => build_min_owa_regret_model(inst, w, need()?),
        PathCriterion::WeightedSum(l) => build_weighted_sum_model(inst, l),
    }
}

/// Trace the selected arcs from the source to the sink.
///
/// At each node the lowest-index unused selected arc is followed. Selected
/// arcs that are not on the traced path (zero-cost cycles) are ignored.
/// Returns the arc indices in path order.
pub fn decode_path(inst: &PathInstance, model: &Model, x: &[f64]) -> RobustResult<Vec<usize>> {
    let mut selected: Vec<usize> = model
        .tagged_vars()
        .filter_map(|v| match v.tag {
            VarTag::Arc(a) if x[v.id.index()] > 0.5 => Some(a),
            _ => None,
        })
        .collect();
    selected.sort_unstable();

    let mut used = vec![false; selected.len()];
    let mut path = Vec::new();
    let mut node = inst.source();
    while node != inst.sink() {
        let next = selected
            .iter()
            .enumerate()
            .find(|&(k, &a)| !used[k] && inst.arcs()[a].from == node);
        match next {
            Some((k, &a)) => {
                used[k] = true;
                path.push(a);
                node = inst.arcs()[a].to;
            }
            None => {
                return Err(RobustError::Decode(format!(
                    "no selected arc leaves node '{}'",
                    inst.nodes()[node]
                )))
            }
        }
    }
    Ok(path)
}

/// Node names visited by an arc sequence starting at the source.
pub fn path_nodes(inst: &PathInstance, arcs: &[usize]) -> Vec<String> {
    let mut nodes = vec![inst.nodes()[inst.source()].clone()];
    nodes.extend(arcs.iter().map(|&a| inst.nodes()[inst.arcs()[a].to].clone()));
    nodes
}

/// Solve every single-scenario shortest path.
pub fn shortest_paths(inst: &PathInstance, settings: &MipSettings) -> RobustResult<Vec<PathResult>> {
    (0..inst.num_scenarios())
        .map(|s| solve_built(inst, build_scenario_model(inst, s)?, None, settings))
        .collect()
}

/// Build, solve and decode a path problem.
///
/// Regret criteria solve every single-scenario shortest path first.
pub fn solve_path(
    inst: &PathInstance,
    criterion: &PathCriterion,
    settings: &MipSettings,
) -> RobustResult<PathResult> {
    let (optima, phase_one_status) = if criterion.needs_scenario_optima() {
        let results = shortest_paths(inst, settings)?;
        let status = if results.iter().all(|r| r.status.is_optimal()) {
            MipStatus::Optimal
        } else {
            MipStatus::Suboptimal
        };
        let optima: Vec<f64> = results.iter().map(|r| r.objective).collect();
        debug!("shortest-path costs {optima:?}");
        (Some(optima), status)
    } else {
        (None, MipStatus::Optimal)
    };

    let pm = build_path_model(inst, criterion, optima.as_deref())?;
    info!(
        "solving path {criterion}: {} variables, {} constraints",
        pm.model.num_vars(),
        pm.model.num_constraints()
    );
    let mut result = solve_built(inst, pm, optima.as_deref(), settings)?;
    if !phase_one_status.is_optimal() {
        result.status = MipStatus::Suboptimal;
    }
    Ok(result)
}

fn solve_built(
    inst: &PathInstance,
    pm: PathModel,
    optima: Option<&[f64]>,
    settings: &MipSettings,
) -> RobustResult<PathResult> {
    let sol = solve_mip(&pm.model, settings)?;
    let arcs = decode_path(inst, &pm.model, &sol.x)?;
    let scenario_costs = inst.path_costs(&arcs);
    let regrets = optima.map(|z| {
        scenario_costs
            .iter()
            .zip(z)
            .map(|(c, z)| c - z)
            .collect()
    });
    Ok(PathResult {
        nodes: path_nodes(inst, &arcs),
        arcs,
        objective: sol.objective,
        scenario_costs,
        regrets,
        status: sol.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> PathInstance {
        // s -> a -> t costs (1, 4), s -> b -> t costs (3, 2)
        PathInstance::from_named(
            &["s", "a", "b", "t"],
            &[
                ("s", "a", &[1.0, 2.0]),
                ("a", "t", &[0.0, 2.0]),
                ("s", "b", &[1.0, 1.0]),
                ("b", "t", &[2.0, 1.0]),
            ],
            "s",
            "t",
        )
        .unwrap()
    }

    #[test]
    fn test_decode_follows_arcs() {
        let inst = diamond();
        let pm = build_scenario_model(&inst, 0).unwrap();
        let arcs = decode_path(&inst, &pm.model, &[0.0, 0.0, 1.0, 1.0]).unwrap();
        assert_eq!(arcs, vec![2, 3]);
        assert_eq!(path_nodes(&inst, &arcs), vec!["s", "b", "t"]);
    }

    #[test]
    fn test_decode_rejects_broken_path() {
        let inst = diamond();
        let pm = build_scenario_model(&inst, 0).unwrap();
        let err = decode_path(&inst, &pm.model, &[1.0, 0.0, 0.0, 1.0]).unwrap_err();
        assert!(matches!(err, RobustError::Decode(_)));
    }

    #[test]
    fn test_diamond_criteria() {
        let inst = diamond();
        let settings = MipSettings::default();

        let per_scenario = shortest_paths(&inst, &settings).unwrap();
        assert_eq!(per_scenario[0].route(), "s -> a -> t");
        assert_eq!(per_scenario[1].route(), "s -> b -> t");

        // worst costs: via a = 4, via b = 3
        let r = solve_path(&inst, &PathCriterion::Maximin, &settings).unwrap();
        assert_eq!(r.route(), "s -> b -> t");
        assert!((r.objective - 3.0).abs() < 1e-6);

        // regrets: via a = (0, 2), via b = (2, 0); tie at 2
        let r = solve_path(&inst, &PathCriterion::MinimaxRegret, &settings).unwrap();
        assert!((r.objective - 2.0).abs() < 1e-6);
    }
}
