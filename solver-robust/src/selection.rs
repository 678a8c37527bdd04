//! Budgeted project selection under scenarios.
//!
//! Every model shares the same core: one tagged binary `x_j` per project and
//! the budget row `sum_j cost_j x_j <= budget`. The criteria differ only in
//! the auxiliary columns and rows they add on top.

use log::{debug, info, warn};
use solver_core::{ConstraintOp, LinExpr, Model, Sense, VarId, VarTag};
use solver_mip::{solve_mip, MipSettings, MipStatus};

use crate::criterion::SelectionCriterion;
use crate::error::{RobustError, RobustResult};
use crate::instance::{validate_weights, ProjectInstance};
use crate::owa::{linearize_max_owa, linearize_min_owa};
use crate::result::SelectionResult;

/// A built selection model and its project columns.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    /// The MILP.
    pub model: Model,
    /// `x[j]` selects project `j`.
    pub x: Vec<VarId>,
}

impl SelectionModel {
    fn new(inst: &ProjectInstance, sense: Sense) -> RobustResult<Self> {
        let mut model = Model::named("selection", sense);
        let x = (0..inst.num_projects())
            .map(|j| model.add_binary_tagged(VarTag::Project(j), &format!("x_{j}")))
            .collect::<Result<Vec<_>, _>>()?;
        model.add_budget_constraint(&x, inst.costs(), inst.budget())?;
        Ok(Self { model, x })
    }

    /// `utility_i(x)` as an expression.
    fn utility(&self, inst: &ProjectInstance, i: usize) -> LinExpr {
        LinExpr::weighted_sum(&self.x, inst.utilities(i))
    }

    /// `z*_i - utility_i(x)` as an expression.
    fn regret(&self, inst: &ProjectInstance, i: usize, optimum: f64) -> LinExpr {
        LinExpr::from_constant(optimum) - self.utility(inst, i)
    }
}

fn check_scenario(inst: &ProjectInstance, s: usize) -> RobustResult<()> {
    if s >= inst.num_scenarios() {
        return Err(RobustError::InvalidInstance(format!(
            "scenario {s} out of range ({} scenarios)",
            inst.num_scenarios()
        )));
    }
    Ok(())
}

fn check_optima(inst: &ProjectInstance, optima: &[f64]) -> RobustResult<()> {
    if optima.len() != inst.num_scenarios() || optima.iter().any(|z| !z.is_finite()) {
        return Err(RobustError::InvalidInstance(format!(
            "{} scenario optima for {} scenarios",
            optima.len(),
            inst.num_scenarios()
        )));
    }
    Ok(())
}

/// Maximize the utility of scenario `s`.
pub fn build_scenario_model(inst: &ProjectInstance, s: usize) -> RobustResult<SelectionModel> {
    check_scenario(inst, s)?;
    let mut sm = SelectionModel::new(inst, Sense::Maximize)?;
    let objective = sm.utility(inst, s);
    sm.model.set_objective(objective)?;
    Ok(sm)
}

/// Maximize `t` subject to `t <= utility_i(x)` for every scenario.
pub fn build_maximin_model(inst: &ProjectInstance) -> RobustResult<SelectionModel> {
    let mut sm = SelectionModel::new(inst, Sense::Maximize)?;
    let t = sm.model.add_free_named("t")?;
    for i in 0..inst.num_scenarios() {
        let row = LinExpr::from(t) - sm.utility(inst, i);
        sm.model
            .add_named_constraint(&format!("worst_{i}"), row, ConstraintOp::Le, 0.0)?;
    }
    sm.model.set_objective(LinExpr::from(t))?;
    Ok(sm)
}

/// Minimize `t` subject to `t >= z*_i - utility_i(x)` for every scenario.
pub fn build_regret_model(inst: &ProjectInstance, optima: &[f64]) -> RobustResult<SelectionModel> {
    check_optima(inst, optima)?;
    let mut sm = SelectionModel::new(inst, Sense::Minimize)?;
    let t = sm.model.add_free_named("t")?;
    for (i, &z) in optima.iter().enumerate() {
        let row = LinExpr::from(t) - sm.regret(inst, i, z);
        sm.model
            .add_named_constraint(&format!("regret_{i}"), row, ConstraintOp::Ge, 0.0)?;
    }
    sm.model.set_objective(LinExpr::from(t))?;
    Ok(sm)
}

/// Maximize the OWA of the scenario utilities.
pub fn build_max_owa_model(inst: &ProjectInstance, weights: &[f64]) -> RobustResult<SelectionModel> {
    validate_weights(weights, inst.num_scenarios())?;
    let mut sm = SelectionModel::new(inst, Sense::Maximize)?;
    let scores: Vec<LinExpr> = (0..inst.num_scenarios()).map(|i| sm.utility(inst, i)).collect();
    let objective = linearize_max_owa(&mut sm.model, &scores, weights)?;
    sm.model.set_objective(objective)?;
    Ok(sm)
}

/// Minimize the OWA of the scenario regrets.
pub fn build_min_owa_regret_model(
    inst: &ProjectInstance,
    weights: &[f64],
    optima: &[f64],
) -> RobustResult<SelectionModel> {
    validate_weights(weights, inst.num_scenarios())?;
    check_optima(inst, optima)?;
    let mut sm = SelectionModel::new(inst, Sense::Minimize)?;
    let scores: Vec<LinExpr> = optima
        .iter()
        .enumerate()
        .map(|(i, &z)| sm.regret(inst, i, z))
        .collect();
    let objective = linearize_min_owa(&mut sm.model, &scores, weights)?;
    sm.model.set_objective(objective)?;
    Ok(sm)
}

/// Maximize `sum_i lambda_i utility_i(x)`.
pub fn build_weighted_sum_model(inst: &ProjectInstance, lambdas: &[f64]) -> RobustResult<SelectionModel> {
    validate_weights(lambdas, inst.num_scenarios())?;
    let mut sm = SelectionModel::new(inst, Sense::Maximize)?;
    let objective: LinExpr = lambdas
        .iter()
        .enumerate()
        .map(|(i, &l)| l * sm.utility(inst, i))
        .sum();
    sm.model.set_objective(objective)?;
    Ok(sm)
}

/// Build the model of any criterion.
///
/// Regret criteria need `optima` (see [`scenario_optima`]).
pub fn build_selection_model(
    inst: &ProjectInstance,
    criterion: &SelectionCriterion,
    optima: Option<&[f64]>,
) -> RobustResult<SelectionModel> {
    let need = || {
        optima.ok_or_else(|| {
            RobustError::InvalidInstance(format!("{criterion} requires scenario optima"))
        })
    };
    match criterion {
        SelectionCriterion::Scenario(s) => build_scenario_model(inst, *s),
        SelectionCriterion::Maximin => build_maximin_model(inst),
        SelectionCriterion::MinimaxRegret => build_regret_model(inst, need()?),
        SelectionCriterion::MaxOwa(w) => build_max_owa_model(inst, w),
        SelectionCriterion::MinOwaRegret(w) => build_min_owa_regret_model(inst, w, need()?),
        SelectionCriterion::WeightedSum(l) => build_weighted_sum_model(inst, l),
    }
}

/// Selected projects of a primal point, in ascending order.
pub fn decode_selection(model: &Model, x: &[f64]) -> Vec<usize> {
    let mut selected: Vec<usize> = model
        .tagged_vars()
        .filter_map(|v| match v.tag {
            VarTag::Project(j) if x[v.id.index()] > 0.5 => Some(j),
            _ => None,
        })
        .collect();
    selected.sort_unstable();
    selected
}

/// Solve every single-scenario problem.
pub fn solve_scenarios(inst: &ProjectInstance, settings: &MipSettings) -> RobustResult<Vec<SelectionResult>> {
    (0..inst.num_scenarios())
        .map(|s| solve_built(inst, build_scenario_model(inst, s)?, None, settings))
        .collect()
}

/// Per-scenario optimal utilities `z*_i`.
pub fn scenario_optima(inst: &ProjectInstance, settings: &MipSettings) -> RobustResult<Vec<f64>> {
    let results = solve_scenarios(inst, settings)?;
    if results.iter().any(|r| !r.status.is_optimal()) {
        warn!("scenario optima are incumbents of an interrupted search");
    }
    Ok(results.iter().map(|r| r.objective).collect())
}

/// Build, solve and decode a selection problem.
///
/// Regret criteria solve every single-scenario problem first.
pub fn solve_selection(
    inst: &ProjectInstance,
    criterion: &SelectionCriterion,
    settings: &MipSettings,
) -> RobustResult<SelectionResult> {
    let (optima, phase_one_status) = if criterion.needs_scenario_optima() {
        let results = solve_scenarios(inst, settings)?;
        let status = if results.iter().all(|r| r.status.is_optimal()) {
            MipStatus::Optimal
        } else {
            MipStatus::Suboptimal
        };
        let optima: Vec<f64> = results.iter().map(|r| r.objective).collect();
        debug!("scenario optima {optima:?}");
        (Some(optima), status)
    } else {
        (None, MipStatus::Optimal)
    };

    let sm = build_selection_model(inst, criterion, optima.as_deref())?;
    info!(
        "solving {criterion}: {} variables, {} constraints",
        sm.model.num_vars(),
        sm.model.num_constraints()
    );
    let mut result = solve_built(inst, sm, optima.as_deref(), settings)?;
    if !phase_one_status.is_optimal() {
        result.status = MipStatus::Suboptimal;
    }
    Ok(result)
}

fn solve_built(
    inst: &ProjectInstance,
    sm: SelectionModel,
    optima: Option<&[f64]>,
    settings: &MipSettings,
) -> RobustResult<SelectionResult> {
    let sol = solve_mip(&sm.model, settings)?;
    let selected = decode_selection(&sm.model, &sol.x);
    let scenario_values = inst.scenario_values(&selected);
    let regrets = optima.map(|z| {
        z.iter()
            .zip(&scenario_values)
            .map(|(z, v)| z - v)
            .collect()
    });
    Ok(SelectionResult {
        selected,
        objective: sol.objective,
        scenario_values,
        regrets,
        status: sol.status,
    })
}
