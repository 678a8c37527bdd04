//! Branching variable selection.

use super::BoundChange;
use crate::model::MipProblem;

/// A branching decision.
#[derive(Debug, Clone)]
pub struct BranchDecision {
    /// Variable to branch on.
    pub var: usize,

    /// Current (fractional) value.
    pub value: f64,

    /// Bound change for "down" branch (x <= floor(value)).
    pub down_branch: BoundChange,

    /// Bound change for "up" branch (x >= ceil(value)).
    pub up_branch: BoundChange,

    /// Distance of `value` to the nearest integer.
    pub score: f64,
}

/// Most-fractional branching.
///
/// Picks the binary whose value is closest to 0.5, breaking ties by the
/// lowest variable index. Binaries whose bounds are already fixed are
/// skipped. Returns None if every other binary is within `tol` of an
/// integer.
pub fn select_most_fractional(
    x: &[f64],
    prob: &MipProblem,
    lower: &[f64],
    upper: &[f64],
    tol: f64,
) -> Option<BranchDecision> {
    let (var, value, score) = prob
        .get_fractional_vars(x, tol)
        .into_iter()
        .filter(|&(i, _, _)| lower[i] < upper[i])
        .fold(None, |best: Option<(usize, f64, f64)>, cand| match best {
            Some(b) if b.2 >= cand.2 => Some(b),
            _ => Some(cand),
        })?;

    Some(BranchDecision {
        var,
        value,
        down_branch: BoundChange::down_branch(var, lower[var], value),
        up_branch: BoundChange::up_branch(var, upper[var], value),
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_core::{Model, Sense};

    fn problem(n: usize) -> MipProblem {
        let mut model = Model::new(Sense::Minimize);
        for _ in 0..n {
            model.add_binary().unwrap();
        }
        MipProblem::new(&model)
    }

    #[test]
    fn test_picks_closest_to_half() {
        let prob = problem(4);
        let lo = vec![0.0; 4];
        let hi = vec![1.0; 4];
        let x = [0.1, 0.45, 0.8, 1.0];

        let d = select_most_fractional(&x, &prob, &lo, &hi, 1e-6).unwrap();
        assert_eq!(d.var, 1);
        assert_eq!(d.down_branch.new_ub, 0.0);
        assert_eq!(d.up_branch.new_lb, 1.0);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let prob = problem(3);
        let lo = vec![0.0; 3];
        let hi = vec![1.0; 3];
        let x = [0.0, 0.5, 0.5];

        let d = select_most_fractional(&x, &prob, &lo, &hi, 1e-6).unwrap();
        assert_eq!(d.var, 1);
    }

    #[test]
    fn test_integral_point_has_no_decision() {
        let prob = problem(2);
        let x = [1.0, 1e-9];
        assert!(select_most_fractional(&x, &prob, &[0.0; 2], &[1.0; 2], 1e-6).is_none());
    }
}
