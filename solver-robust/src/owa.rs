//! Ordered weighted averaging.
//!
//! An OWA aggregate applies its largest weight to the worst scenario value.
//! For costs or regrets the worst value is the largest one; for utilities
//! it is the smallest. Both linearizations below use the marginal weights
//! `w'_k = w_k - w_{k+1}` (`w'_n = w_n`) of the weights sorted in
//! descending order, and are exact whenever the weights are nonnegative.
//!
//! ```text
//! max form (utilities):   r_k - b_ik <= z_i,  b_ik >= 0
//!                         maximize sum_k w'_k (k r_k - sum_i b_ik)
//! min form (costs):       r_k + b_ik >= z_i,  b_ik >= 0
//!                         minimize sum_k w'_k (k r_k + sum_i b_ik)
//! ```
//!
//! with `k` counted from 1. At the optimum `k r_k - sum_i b_ik` is the sum
//! of the `k` smallest `z_i` (resp. `k r_k + sum_i b_ik` the sum of the `k`
//! largest).

use solver_core::{ConstraintOp, LinExpr, Model};

use crate::error::RobustResult;

/// Copy of `values` sorted in descending order.
pub fn sorted_desc(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted
}

/// Marginal weights of the descending-sorted `weights`.
pub fn marginal_weights(weights: &[f64]) -> Vec<f64> {
    let w = sorted_desc(weights);
    (0..w.len())
        .map(|k| w[k] - w.get(k + 1).copied().unwrap_or(0.0))
        .collect()
}

/// OWA of costs: largest weight on the largest value.
pub fn owa_value(weights: &[f64], values: &[f64]) -> f64 {
    sorted_desc(weights)
        .iter()
        .zip(sorted_desc(values))
        .map(|(w, v)| w * v)
        .sum()
}

/// OWA of utilities: largest weight on the smallest value.
pub fn owa_utility(weights: &[f64], values: &[f64]) -> f64 {
    sorted_desc(weights)
        .iter()
        .zip(sorted_desc(values).iter().rev())
        .map(|(w, v)| w * v)
        .sum()
}

/// Add the max-form OWA rows for `scores` and return the objective to
/// maximize.
pub fn linearize_max_owa(model: &mut Model, scores: &[LinExpr], weights: &[f64]) -> RobustResult<LinExpr> {
    linearize(model, scores, weights, -1.0)
}

/// Add the min-form OWA rows for `scores` and return the objective to
/// minimize.
pub fn linearize_min_owa(model: &mut Model, scores: &[LinExpr], weights: &[f64]) -> RobustResult<LinExpr> {
    linearize(model, scores, weights, 1.0)
}

/// `sign = -1` is the max form, `sign = +1` the min form.
fn linearize(model: &mut Model, scores: &[LinExpr], weights: &[f64], sign: f64) -> RobustResult<LinExpr> {
    let marginal = marginal_weights(weights);
    let mut objective = LinExpr::new();

    for (k, &wk) in marginal.iter().enumerate() {
        let r = model.add_free_named(&format!("r_{k}"))?;
        let mut term = LinExpr::term(r, (k + 1) as f64);

        for (i, score) in scores.iter().enumerate() {
            let b = model.add_continuous_named(0.0, f64::INFINITY, &format!("b_{i}_{k}"))?;
            term.add_term(b, sign);
            let row = LinExpr::from(r) + sign * b - score.clone();
            let op = if sign > 0.0 { ConstraintOp::Ge } else { ConstraintOp::Le };
            model.add_named_constraint(&format!("owa_{i}_{k}"), row, op, 0.0)?;
        }
        objective += wk * term;
    }
    Ok(objective)
}
