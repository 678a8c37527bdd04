//! Sequential branch-and-bound driver.

use std::time::Instant;

use solver_core::{BoundOverrides, Model, EPSILON};

use crate::error::{MipError, MipResult};
use crate::model::{IncumbentTracker, MipProblem, MipSolution, MipStatus, TerminationReason};
use crate::relaxation::{RelaxationBackend, RelaxationStatus, SimplexBackend};
use crate::search::{
    select_most_fractional, BranchAndBound, IncumbentStore, NoSharedIncumbent, NodeState,
    SearchNode, TreeStats,
};
use crate::settings::MipSettings;

/// Solve a model to binary optimality.
///
/// Binaries are driven to `{0, 1}` by depth-first branch-and-bound (or
/// best-bound, per [`MipSettings::node_selection`]); continuous variables
/// are left to the relaxations.
///
/// # Errors
///
/// - [`MipError::Infeasible`] if the complete search found no integral point.
/// - [`MipError::NoSolution`] if the search was cancelled before one was found.
/// - [`MipError::Unbounded`] if any node relaxation is unbounded.
/// - [`MipError::Lp`] if a relaxation exceeds its pivot budget.
pub fn solve_mip(model: &Model, settings: &MipSettings) -> MipResult<MipSolution> {
    settings.validate()?;
    let start = Instant::now();

    let prob = MipProblem::new(model);
    let mut backend = SimplexBackend::new(&prob.form, settings.lp_settings.clone());

    if settings.verbose {
        log::info!(
            "B&B: {} variables ({} binary), {} constraints",
            prob.num_vars(),
            prob.num_binaries(),
            prob.num_constraints()
        );
    }

    let mut tree = BranchAndBound::new(settings, start);
    tree.initialize(SearchNode::root());
    let outcome = run_search(&prob, &mut backend, &NoSharedIncumbent, &mut tree, usize::MAX)?;

    finish(&prob, settings, outcome.incumbent, outcome.stats, outcome.root_bound, outcome.reason)
}

/// Result of running (part of) a search on one tree.
pub(crate) struct SearchOutcome {
    pub incumbent: IncumbentTracker,
    pub stats: TreeStats,
    /// Root relaxation objective (minimization scale), if the root was solved.
    pub root_bound: Option<f64>,
    pub reason: TerminationReason,
}

/// Process nodes until the tree is empty, a cancellation trigger fires, or
/// `max_open` nodes are open.
///
/// Stopping on `max_open` leaves the open nodes in the tree and reports
/// `Completed`; callers that pass a finite limit take care of them.
pub(crate) fn run_search<B, S>(
    prob: &MipProblem,
    backend: &mut B,
    store: &S,
    tree: &mut BranchAndBound<'_>,
    max_open: usize,
) -> MipResult<SearchOutcome>
where
    B: RelaxationBackend,
    S: IncumbentStore,
{
    let mut root_bound = None;
    let mut reason = TerminationReason::Completed;

    while tree.open_nodes() > 0 && tree.open_nodes() < max_open {
        if let Some(stop) = tree.check_termination() {
            reason = stop;
            break;
        }
        let Some(mut node) = tree.next_node() else {
            break;
        };

        let relax_obj = process_node(prob, backend, store, tree, &mut node)?;
        if node.parent_id.is_none() {
            root_bound = relax_obj;
        }
        tree.log_progress();
    }

    Ok(SearchOutcome {
        incumbent: tree.incumbent.clone(),
        stats: tree.stats(),
        root_bound,
        reason,
    })
}

/// Relax, fathom, accept or branch one node.
///
/// Returns the relaxation objective when the relaxation was optimal.
fn process_node<B, S>(
    prob: &MipProblem,
    backend: &mut B,
    store: &S,
    tree: &mut BranchAndBound<'_>,
    node: &mut SearchNode,
) -> MipResult<Option<f64>>
where
    B: RelaxationBackend,
    S: IncumbentStore,
{
    let bounds = node.bounds(&prob.root_bounds);
    let relax = backend.solve(&bounds)?;
    tree.node_explored();
    tree.lp_iterations(relax.iterations);
    node.state = NodeState::Relaxed;

    match relax.status {
        RelaxationStatus::Optimal => {}
        RelaxationStatus::Infeasible => {
            node.state = NodeState::Fathomed;
            tree.node_pruned();
            return Ok(None);
        }
        RelaxationStatus::Unbounded => {
            log::warn!("Node {} relaxation is unbounded", node.id);
            return Err(MipError::Unbounded);
        }
    }

    // Bound pruning
    if relax.obj_val >= tree.incumbent_bound(store) - EPSILON {
        node.state = NodeState::Fathomed;
        tree.node_pruned();
        return Ok(Some(relax.obj_val));
    }

    let decision = select_most_fractional(
        &relax.x,
        prob,
        &bounds.lower,
        &bounds.upper,
        tree.int_feas_tol(),
    );

    let decision = match decision {
        Some(decision) => Some(decision),
        None => {
            let candidate = integral_candidate(prob, backend, tree, &bounds, node.id, &relax.x)?;
            if let Some(x) = candidate {
                let obj = prob.form.min_objective(&x);
                tree.update_incumbent(&x, obj, store);
                node.state = NodeState::Integral;
                None
            } else {
                // Near-integral binaries still free can be branched on exactly
                let fallback =
                    select_most_fractional(&relax.x, prob, &bounds.lower, &bounds.upper, 0.0);
                log::warn!(
                    "Node {} rounded point violates the model beyond {:.1e}, {}",
                    node.id,
                    EPSILON,
                    if fallback.is_some() { "branching" } else { "fathomed" }
                );
                tree.tolerance_warning();
                if fallback.is_none() {
                    node.state = NodeState::Fathomed;
                    tree.node_pruned();
                }
                fallback
            }
        }
    };

    if let Some(decision) = decision {
        let (down, up) = tree.branch(node, &decision, relax.obj_val);
        // Down first so the up child is popped first from the stack
        tree.enqueue(down);
        tree.enqueue(up);
        node.state = NodeState::Branched;
    }

    Ok(Some(relax.obj_val))
}

/// Round a relaxation point that is integral within tolerance and check it.
///
/// When rounding moved a binary by more than round-off, the continuous
/// columns are re-optimized with the binaries fixed. Returns `None` if the
/// resulting point misses a bound or row of the model by more than
/// [`EPSILON`].
fn integral_candidate<B: RelaxationBackend>(
    prob: &MipProblem,
    backend: &mut B,
    tree: &mut BranchAndBound<'_>,
    bounds: &BoundOverrides,
    node_id: u64,
    relaxed: &[f64],
) -> MipResult<Option<Vec<f64>>> {
    let mut x = relaxed.to_vec();
    let snapped = prob.round_binaries(&mut x);
    if snapped > 0 {
        log::warn!(
            "Numeric tolerance: node {} had {} binaries within tolerance but not integral",
            node_id,
            snapped
        );
        tree.tolerance_warning();

        let polished = backend.solve(&prob.fix_binaries(bounds, &x))?;
        tree.lp_iterations(polished.iterations);
        if polished.status == RelaxationStatus::Optimal {
            x = polished.x;
            prob.round_binaries(&mut x);
        }
    }

    Ok(prob.accepts_candidate(&x, 0.0, EPSILON).then_some(x))
}

/// Turn the final incumbent into a solution or an error.
pub(crate) fn finish(
    prob: &MipProblem,
    settings: &MipSettings,
    incumbent: IncumbentTracker,
    stats: TreeStats,
    root_bound: Option<f64>,
    reason: TerminationReason,
) -> MipResult<MipSolution> {
    let Some(x) = incumbent.solution else {
        if settings.verbose {
            log::info!("B&B: no solution after {} nodes ({})", stats.nodes_explored, reason);
        }
        return Err(match reason {
            TerminationReason::Completed => MipError::Infeasible,
            reason => MipError::NoSolution { reason },
        });
    };

    let status = match reason {
        TerminationReason::Completed => MipStatus::Optimal,
        _ => MipStatus::Suboptimal,
    };
    let objective = prob.form.model_objective(incumbent.obj_val);
    let root_bound = prob
        .form
        .model_objective(root_bound.unwrap_or(f64::NEG_INFINITY));

    let solution = MipSolution {
        status,
        reason,
        x,
        objective,
        root_bound,
        nodes_explored: stats.nodes_explored,
        nodes_pruned: stats.nodes_pruned,
        incumbent_updates: incumbent.update_count,
        lp_iterations: stats.lp_iterations,
        solve_time_ms: stats.elapsed_ms,
        tolerance_warnings: stats.tolerance_warnings,
    };

    if settings.verbose {
        log::info!(
            "B&B: {:?} ({}) obj={:.6e} root={:.6e} gap={:.2e} nodes={} pruned={} pivots={} time={}ms",
            solution.status,
            solution.reason,
            solution.objective,
            solution.root_bound,
            solution.root_gap(),
            solution.nodes_explored,
            solution.nodes_pruned,
            solution.lp_iterations,
            solution.solve_time_ms
        );
    }

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_core::{ConstraintOp, LinExpr, Sense};

    fn knapsack() -> Model {
        // max 5a + 4b + 3c  s.t.  2a + 3b + c <= 5
        let mut model = Model::new(Sense::Maximize);
        let v: Vec<_> = (0..3).map(|_| model.add_binary().unwrap()).collect();
        model
            .add_budget_constraint(&v, &[2.0, 3.0, 1.0], 5.0)
            .unwrap();
        model
            .set_objective(LinExpr::weighted_sum(&v, &[5.0, 4.0, 3.0]))
            .unwrap();
        model
    }

    #[test]
    fn test_knapsack_optimum() {
        let model = knapsack();
        let sol = solve_mip(&model, &MipSettings::default()).unwrap();

        assert_eq!(sol.status, MipStatus::Optimal);
        assert_eq!(sol.reason, TerminationReason::Completed);
        // a + b: weight 5, value 9
        assert!((sol.objective - 9.0).abs() < 1e-9);
        assert_eq!(sol.x, vec![1.0, 1.0, 0.0]);
        assert!(sol.root_bound >= sol.objective - 1e-9);
        // Root relaxation 8 + 8/3
        assert!((sol.root_gap() - (5.0 / 3.0) / 9.0).abs() < 1e-9);
        assert!(sol.nodes_explored >= 1);
    }

    #[test]
    fn test_rounded_point_violating_row_is_rejected() {
        // The relaxation puts b at 0.9999999, integral within tolerance,
        // but b = 1 breaks the row by 1e-5
        let mut model = Model::new(Sense::Maximize);
        let b = model.add_binary().unwrap();
        model
            .add_constraint(100.0 * b, ConstraintOp::Le, 99.99999)
            .unwrap();
        model.set_objective(LinExpr::from(b)).unwrap();

        let sol = solve_mip(&model, &MipSettings::default()).unwrap();
        assert_eq!(sol.status, MipStatus::Optimal);
        assert_eq!(sol.x, vec![0.0]);
        assert_eq!(sol.objective, 0.0);
        assert!(sol.tolerance_warnings >= 1);
        assert!(model.is_feasible(&sol.x, EPSILON));
    }

    #[test]
    fn test_infeasible_binaries() {
        // x + y = 1.5 has no binary solution
        let mut model = Model::new(Sense::Minimize);
        let x = model.add_binary().unwrap();
        let y = model.add_binary().unwrap();
        model
            .add_constraint(LinExpr::from(x) + y, ConstraintOp::Eq, 1.5)
            .unwrap();
        model.set_objective(LinExpr::from(x)).unwrap();

        assert_eq!(
            solve_mip(&model, &MipSettings::default()).unwrap_err(),
            MipError::Infeasible
        );
    }

    #[test]
    fn test_unbounded_is_fatal() {
        let mut model = Model::new(Sense::Maximize);
        let x = model.add_binary().unwrap();
        let t = model.add_free().unwrap();
        model
            .add_constraint(LinExpr::from(t) - x, ConstraintOp::Ge, 0.0)
            .unwrap();
        model.set_objective(LinExpr::from(t)).unwrap();

        assert_eq!(
            solve_mip(&model, &MipSettings::default()).unwrap_err(),
            MipError::Unbounded
        );
    }

    #[test]
    fn test_zero_node_budget_has_no_solution() {
        let settings = MipSettings::default().with_max_nodes(0);
        assert_eq!(
            solve_mip(&knapsack(), &settings).unwrap_err(),
            MipError::NoSolution {
                reason: TerminationReason::NodeLimit
            }
        );
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = MipSettings {
            log_freq: 0,
            ..MipSettings::default()
        };
        assert!(matches!(
            solve_mip(&knapsack(), &settings),
            Err(MipError::InvalidSettings(_))
        ));
    }
}
