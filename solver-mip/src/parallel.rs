//! Parallel subtree search (feature `parallel`).
//!
//! The root is expanded sequentially until `frontier_size` nodes are open.
//! Each open node then roots an independent subtree solved on the rayon
//! pool. Subtrees share a [`SharedIncumbent`], so an incumbent found in one
//! subtree prunes the others; a stale read only costs extra nodes.
//!
//! `max_nodes` applies to the frontier expansion and to each subtree
//! separately.

use std::time::Instant;

use rayon::prelude::*;
use solver_core::{Model, EPSILON};

use crate::error::MipResult;
use crate::model::{MipProblem, MipSolution, TerminationReason};
use crate::relaxation::SimplexBackend;
use crate::search::{BranchAndBound, SearchNode, SharedIncumbent, TreeStats};
use crate::settings::MipSettings;
use crate::solve::{finish, run_search, SearchOutcome};

/// Solve a model with subtrees explored in parallel.
///
/// Returns the same optimal objective as [`solve_mip`](crate::solve_mip);
/// the primal point may differ when several optima exist.
pub fn solve_mip_parallel(model: &Model, settings: &MipSettings) -> MipResult<MipSolution> {
    settings.validate()?;
    let start = Instant::now();

    let prob = MipProblem::new(model);
    let shared = SharedIncumbent::new(EPSILON);

    let mut tree = BranchAndBound::new(settings, start);
    tree.initialize(SearchNode::root());

    let mut backend = SimplexBackend::new(&prob.form, settings.lp_settings.clone());
    let head = run_search(&prob, &mut backend, &shared, &mut tree, settings.frontier_size)?;
    let frontier = tree.take_open_nodes();

    if settings.verbose {
        log::info!(
            "Parallel B&B: {} subtrees after {} nodes",
            frontier.len(),
            head.stats.nodes_explored
        );
    }

    let mut stats: TreeStats = head.stats;
    let mut reason = head.reason;
    let mut root_bound = head.root_bound;

    // A cancelled expansion leaves the frontier unexplored
    if reason == TerminationReason::Completed {
        let subtrees: Vec<MipResult<SearchOutcome>> = frontier
            .into_par_iter()
            .map(|mut node| {
                let mut backend = SimplexBackend::new(&prob.form, settings.lp_settings.clone());
                let mut subtree = BranchAndBound::new(settings, start);
                // Keep node ids disjoint between subtrees
                node.id += node.id << 32;
                subtree.initialize(node);
                run_search(&prob, &mut backend, &shared, &mut subtree, usize::MAX)
            })
            .collect();

        for outcome in subtrees {
            let outcome = outcome?;
            stats.merge(&outcome.stats);
            root_bound = root_bound.or(outcome.root_bound);
            if reason == TerminationReason::Completed {
                reason = outcome.reason;
            }
        }
    }

    // Every local update was offered, so the shared tracker holds the best
    let mut incumbent = shared.into_inner();
    incumbent.update_count = stats.incumbent_updates;

    stats.elapsed_ms = start.elapsed().as_millis() as u64;
    finish(&prob, settings, incumbent, stats, root_bound, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve_mip;
    use solver_core::{LinExpr, Sense};

    #[test]
    fn test_matches_sequential() {
        let weights = [12.0, 7.0, 11.0, 8.0, 9.0, 6.0, 5.0, 14.0];
        let values = [24.0, 13.0, 23.0, 15.0, 16.0, 11.0, 9.0, 27.0];

        let mut model = Model::new(Sense::Maximize);
        let x: Vec<_> = (0..weights.len())
            .map(|_| model.add_binary().unwrap())
            .collect();
        model.add_budget_constraint(&x, &weights, 26.0).unwrap();
        model
            .set_objective(LinExpr::weighted_sum(&x, &values))
            .unwrap();

        let seq = solve_mip(&model, &MipSettings::default()).unwrap();
        for frontier_size in [1, 2, 4, 16] {
            let settings = MipSettings {
                frontier_size,
                ..MipSettings::default()
            };
            let par = solve_mip_parallel(&model, &settings).unwrap();
            assert!((par.objective - seq.objective).abs() < 1e-9);
            assert!(model.is_feasible(&par.x, 1e-9));
        }
    }
}
