//! Two-phase driver.

use crate::error::{LpError, LpResult};
use crate::standard::StandardForm;

use super::bounds::BoundOverrides;
use super::result::{LpSolution, LpStatus};
use super::settings::LpSettings;
use super::tableau::{ColState, Tableau};

/// Steps at or below this length count as degenerate.
const DEGENERATE_STEP: f64 = 1e-12;

/// Ratios within this distance are treated as tied.
const RATIO_TIE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseOutcome {
    Optimal,
    Unbounded,
}

/// Blocking row chosen by the ratio test.
#[derive(Debug, Clone, Copy)]
struct Blocking {
    row: usize,
    step: f64,
    leave_state: ColState,
}

/// Solve the continuous relaxation of `form` under `bounds`.
///
/// Crossing bounds yield `Infeasible` without pivoting. An optimal point is
/// checked against every row; if it misses one by more than `feas_tol` the
/// solve is repeated with a refactorization after every pivot, and a second
/// miss is [`LpError::NumericalTrouble`].
pub fn solve_relaxation(
    form: &StandardForm,
    bounds: &BoundOverrides,
    settings: &LpSettings,
) -> LpResult<LpSolution> {
    bounds.check_dims(form.num_cols())?;

    if bounds.has_crossing() {
        log::debug!("LP: crossing bounds, relaxation infeasible");
        return Ok(infeasible(form, 0));
    }

    let first = two_phase(form, bounds, settings, settings.refactor_every)?;
    let violation = row_violation(form, &first);
    if violation <= settings.feas_tol {
        return Ok(first);
    }

    log::warn!(
        "LP: optimal point violates a row by {:.3e}, re-solving with exact refactorization",
        violation
    );
    let mut second = two_phase(form, bounds, settings, 1)?;
    second.iterations += first.iterations;
    let violation = row_violation(form, &second);
    if violation > settings.feas_tol {
        return Err(LpError::NumericalTrouble { violation });
    }
    Ok(second)
}

fn row_violation(form: &StandardForm, sol: &LpSolution) -> f64 {
    match sol.status {
        LpStatus::Optimal => form.max_row_violation(&sol.x),
        _ => 0.0,
    }
}

fn two_phase(
    form: &StandardForm,
    bounds: &BoundOverrides,
    settings: &LpSettings,
    refactor_every: usize,
) -> LpResult<LpSolution> {
    let mut tab = Tableau::phase_one(form, bounds);
    let mut iterations = 0;

    let phase_one = run_phase(&mut tab, settings, refactor_every, &mut iterations)?;
    let infeasibility = tab.infeasibility();
    if infeasibility > settings.feas_tol {
        log::debug!(
            "LP: phase I ended {:?} with infeasibility {:.3e} after {} pivots",
            phase_one,
            infeasibility,
            iterations
        );
        return Ok(infeasible(form, iterations));
    }

    tab.start_phase_two(&form.cost);
    match run_phase(&mut tab, settings, refactor_every, &mut iterations)? {
        PhaseOutcome::Optimal => {
            let x = tab.structural_values();
            let objective = form.model_objective(form.min_objective(&x));
            log::debug!("LP: optimal {:.6} after {} pivots", objective, iterations);
            Ok(LpSolution {
                status: LpStatus::Optimal,
                x,
                objective,
                iterations,
            })
        }
        PhaseOutcome::Unbounded => {
            log::debug!("LP: unbounded after {} pivots", iterations);
            Ok(LpSolution {
                status: LpStatus::Unbounded,
                x: Vec::new(),
                objective: -form.sense.worst(),
                iterations,
            })
        }
    }
}

fn infeasible(form: &StandardForm, iterations: usize) -> LpSolution {
    LpSolution {
        status: LpStatus::Infeasible,
        x: Vec::new(),
        objective: form.sense.worst(),
        iterations,
    }
}

/// Pivot until the phase cost is optimal or a ray is found.
///
/// Neither conclusion is drawn from an updated tableau: the basis is
/// refactored first and the test repeated on the fresh values.
fn run_phase(
    tab: &mut Tableau,
    settings: &LpSettings,
    refactor_every: usize,
    iterations: &mut usize,
) -> LpResult<PhaseOutcome> {
    let mut degenerate = 0usize;
    let mut bland = false;
    let mut since_refactor = 0usize;
    let mut fresh = true;

    loop {
        if since_refactor >= refactor_every {
            tab.refactor();
            since_refactor = 0;
            fresh = true;
        }

        let (q, dir) = match select_entering(tab, settings.opt_tol, bland) {
            Some(e) => e,
            None if fresh => return Ok(PhaseOutcome::Optimal),
            None => {
                tab.refactor();
                since_refactor = 0;
                fresh = true;
                continue;
            }
        };

        let flip = tab.upper[q] - tab.lower[q];
        let blocking = if bland {
            min_ratio(tab, q, dir, settings.pivot_tol)
        } else {
            harris_ratio(tab, q, dir, settings.pivot_tol, settings.harris_tol)
        };
        if blocking.is_none() && flip.is_infinite() {
            if fresh {
                return Ok(PhaseOutcome::Unbounded);
            }
            tab.refactor();
            since_refactor = 0;
            fresh = true;
            continue;
        }

        if *iterations >= settings.max_iter {
            return Err(LpError::IterationLimit(settings.max_iter));
        }
        *iterations += 1;
        since_refactor += 1;
        fresh = false;

        let step = match blocking {
            Some(b) if flip <= b.step => {
                bound_flip(tab, q, dir, flip);
                flip
            }
            Some(b) => {
                tab.shift(q, dir, b.step);
                tab.pivot(b.row, q, b.leave_state);
                b.step
            }
            None => {
                bound_flip(tab, q, dir, flip);
                flip
            }
        };

        if step <= DEGENERATE_STEP {
            degenerate += 1;
            if !bland && degenerate >= settings.bland_after_degenerate {
                log::debug!(
                    "LP: {} degenerate pivots, switching to Bland's rule",
                    degenerate
                );
                bland = true;
            }
        } else {
            degenerate = 0;
        }
    }
}

/// Pick the entering column and its direction (`+1` increase, `-1` decrease).
///
/// Dantzig's rule takes the largest `|d_j|`; Bland's rule takes the first
/// eligible column. Both break ties by the lowest index.
fn select_entering(tab: &Tableau, opt_tol: f64, bland: bool) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64, f64)> = None;

    for j in 0..tab.num_cols() {
        if tab.state[j] == ColState::Basic || tab.is_fixed(j) {
            continue;
        }
        let dj = tab.d[j];
        let dir = match tab.state[j] {
            ColState::AtLower | ColState::Free if dj < -opt_tol => 1.0,
            ColState::AtUpper | ColState::Free if dj > opt_tol => -1.0,
            _ => continue,
        };
        if bland {
            return Some((j, dir));
        }
        let score = dj.abs();
        if best.map_or(true, |(_, _, s)| score > s) {
            best = Some((j, dir, score));
        }
    }

    best.map(|(j, dir, _)| (j, dir))
}

/// Rows of column `q` that block a move in direction `dir`, as
/// `(row, |alpha|, distance to the bound, bound reached)`.
fn blocking_rows(
    tab: &Tableau,
    q: usize,
    dir: f64,
    pivot_tol: f64,
) -> impl Iterator<Item = (usize, f64, f64, ColState)> + '_ {
    (0..tab.m).filter_map(move |i| {
        let alpha = dir * tab.t[(i, q)];
        let b = tab.basis[i];
        if alpha > pivot_tol && tab.lower[b].is_finite() {
            Some((i, alpha, (tab.x[b] - tab.lower[b]).max(0.0), ColState::AtLower))
        } else if alpha < -pivot_tol && tab.upper[b].is_finite() {
            Some((i, -alpha, (tab.upper[b] - tab.x[b]).max(0.0), ColState::AtUpper))
        } else {
            None
        }
    })
}

/// Textbook ratio test: smallest ratio, ties to the lowest basic column.
fn min_ratio(tab: &Tableau, q: usize, dir: f64, pivot_tol: f64) -> Option<Blocking> {
    let mut best: Option<Blocking> = None;

    for (i, alpha, slack, leave_state) in blocking_rows(tab, q, dir, pivot_tol) {
        let ratio = slack / alpha;
        let better = match best {
            None => true,
            Some(cur) => {
                ratio < cur.step - RATIO_TIE
                    || (ratio <= cur.step + RATIO_TIE && tab.basis[i] < tab.basis[cur.row])
            }
        };
        if better {
            best = Some(Blocking {
                row: i,
                step: ratio,
                leave_state,
            });
        }
    }

    best
}

/// Two-pass Harris ratio test.
///
/// Pass one finds the longest step that keeps every basic column within
/// `harris_tol` of its bounds. Pass two picks, among rows whose exact ratio
/// fits that step, the one with the largest pivot magnitude; ties go to the
/// lowest basic column.
fn harris_ratio(
    tab: &Tableau,
    q: usize,
    dir: f64,
    pivot_tol: f64,
    harris_tol: f64,
) -> Option<Blocking> {
    let max_step = blocking_rows(tab, q, dir, pivot_tol)
        .map(|(_, alpha, slack, _)| (slack + harris_tol) / alpha)
        .fold(f64::INFINITY, f64::min);
    if max_step.is_infinite() {
        return None;
    }

    let mut best: Option<(Blocking, f64)> = None;
    for (i, alpha, slack, leave_state) in blocking_rows(tab, q, dir, pivot_tol) {
        let ratio = slack / alpha;
        if ratio > max_step {
            continue;
        }
        let better = match best {
            None => true,
            Some((cur, cur_alpha)) => {
                alpha > cur_alpha || (alpha == cur_alpha && tab.basis[i] < tab.basis[cur.row])
            }
        };
        if better {
            let blocking = Blocking {
                row: i,
                step: ratio,
                leave_state,
            };
            best = Some((blocking, alpha));
        }
    }

    best.map(|(b, _)| b)
}

fn bound_flip(tab: &mut Tableau, q: usize, dir: f64, flip: f64) {
    tab.shift(q, dir, flip);
    if dir > 0.0 {
        tab.x[q] = tab.upper[q];
        tab.state[q] = ColState::AtUpper;
    } else {
        tab.x[q] = tab.lower[q];
        tab.state[q] = ColState::AtLower;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstraintOp, LinExpr, Model, Sense};

    fn solve(model: &Model) -> LpSolution {
        model.solve_relaxation(&LpSettings::default()).unwrap()
    }

    #[test]
    fn test_bounded_maximization() {
        let mut model = Model::new(Sense::Maximize);
        let x = model.add_continuous(0.0, 3.0).unwrap();
        let y = model.add_continuous(0.0, 3.0).unwrap();
        model
            .add_constraint(LinExpr::from(x) + y, ConstraintOp::Le, 4.0)
            .unwrap();
        model.set_objective(LinExpr::from(x) + 2.0 * y).unwrap();

        let sol = solve(&model);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!((sol.objective - 7.0).abs() < 1e-9);
        assert!((sol.x[0] - 1.0).abs() < 1e-9);
        assert!((sol.x[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_equality_and_ge_rows() {
        // min 2x + 3y  s.t.  x + y = 4,  x - y >= 2
        let mut model = Model::new(Sense::Minimize);
        let x = model.add_continuous(0.0, 10.0).unwrap();
        let y = model.add_continuous(0.0, 10.0).unwrap();
        model
            .add_constraint(LinExpr::from(x) + y, ConstraintOp::Eq, 4.0)
            .unwrap();
        model
            .add_constraint(LinExpr::from(x) - y, ConstraintOp::Ge, 2.0)
            .unwrap();
        model.set_objective(2.0 * x + 3.0 * y).unwrap();

        let sol = solve(&model);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!((sol.objective - 8.0).abs() < 1e-9);
        assert!(model.is_feasible(&sol.x, 1e-9));
    }

    #[test]
    fn test_infeasible_rows() {
        let mut model = Model::new(Sense::Maximize);
        let x = model.add_continuous(0.0, 2.0).unwrap();
        let y = model.add_continuous(0.0, 2.0).unwrap();
        model
            .add_constraint(LinExpr::from(x) + y, ConstraintOp::Ge, 5.0)
            .unwrap();
        model.set_objective(LinExpr::from(x)).unwrap();

        let sol = solve(&model);
        assert_eq!(sol.status, LpStatus::Infeasible);
        assert_eq!(sol.objective, f64::NEG_INFINITY);
        assert!(sol.x.is_empty());
    }

    #[test]
    fn test_unbounded_ray() {
        // min -x  s.t.  x - y <= 1,  x, y >= 0
        let mut model = Model::new(Sense::Minimize);
        let x = model.add_continuous(0.0, f64::INFINITY).unwrap();
        let y = model.add_continuous(0.0, f64::INFINITY).unwrap();
        model
            .add_constraint(LinExpr::from(x) - y, ConstraintOp::Le, 1.0)
            .unwrap();
        model.set_objective(-1.0 * x).unwrap();

        let sol = solve(&model);
        assert_eq!(sol.status, LpStatus::Unbounded);
        assert_eq!(sol.objective, f64::NEG_INFINITY);
    }

    #[test]
    fn test_free_variable_goes_negative() {
        // min z  s.t.  z >= x - 3,  z >= 3 - x,  z >= -5,  x in [0, 10]
        let mut model = Model::new(Sense::Minimize);
        let x = model.add_continuous(0.0, 10.0).unwrap();
        let z = model.add_free().unwrap();
        model
            .add_constraint(LinExpr::from(z) - x, ConstraintOp::Ge, -3.0)
            .unwrap();
        model
            .add_constraint(LinExpr::from(z) + x, ConstraintOp::Ge, 3.0)
            .unwrap();
        model.set_objective(LinExpr::from(z)).unwrap();

        let sol = solve(&model);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!(sol.objective.abs() < 1e-9);
        assert!((sol.x[0] - 3.0).abs() < 1e-9);

        let mut model = Model::new(Sense::Minimize);
        let z = model.add_free().unwrap();
        model
            .add_constraint(LinExpr::from(z), ConstraintOp::Ge, -5.0)
            .unwrap();
        model.set_objective(LinExpr::from(z)).unwrap();
        let sol = solve(&model);
        assert!((sol.objective + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_rows() {
        let mut model = Model::new(Sense::Maximize);
        let x = model.add_binary().unwrap();
        let y = model.add_continuous(-2.0, 1.0).unwrap();
        model.set_objective(3.0 * x - y).unwrap();

        let sol = solve(&model);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!((sol.objective - 5.0).abs() < 1e-9);
    }

    fn knapsack() -> Model {
        // max 5a + 4b + 3c  s.t.  2a + 3b + c <= 5, binaries
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
    fn test_overrides_tighten_relaxation() {
        let model = knapsack();
        let form = model.standard_form();
        let settings = LpSettings::default();

        let mut bounds = BoundOverrides::from_form(&form);
        let root = solve_relaxation(&form, &bounds, &settings).unwrap();
        assert!((root.objective - (8.0 + 8.0 / 3.0)).abs() < 1e-9);

        bounds.fix(0, 0.0);
        let child = solve_relaxation(&form, &bounds, &settings).unwrap();
        assert!((child.objective - 7.0).abs() < 1e-9);
        assert!(child.x[0].abs() < 1e-12);
        assert!(child.objective <= root.objective);
    }

    #[test]
    fn test_crossing_overrides_are_infeasible() {
        let model = knapsack();
        let form = model.standard_form();
        let mut bounds = BoundOverrides::from_form(&form);
        bounds.lower[1] = 1.0;
        bounds.upper[1] = 0.0;

        let sol = solve_relaxation(&form, &bounds, &LpSettings::default()).unwrap();
        assert_eq!(sol.status, LpStatus::Infeasible);
        assert_eq!(sol.iterations, 0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = knapsack();
        let form = model.standard_form();
        let bounds = BoundOverrides {
            lower: vec![0.0; 2],
            upper: vec![1.0; 2],
        };
        let err = solve_relaxation(&form, &bounds, &LpSettings::default()).unwrap_err();
        assert_eq!(
            err,
            LpError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_iteration_limit() {
        let model = knapsack();
        let settings = LpSettings::default().with_max_iter(0);
        assert_eq!(
            model.solve_relaxation(&settings).unwrap_err(),
            LpError::IterationLimit(0)
        );
    }

    #[test]
    fn test_harris_prefers_larger_pivot() {
        // Both rows block x at about 1; the second has the larger pivot
        let mut model = Model::new(Sense::Maximize);
        let x = model.add_continuous(0.0, 10.0).unwrap();
        model
            .add_constraint(LinExpr::from(x), ConstraintOp::Le, 1.0)
            .unwrap();
        model
            .add_constraint(2.0 * x, ConstraintOp::Le, 2.0 + 1e-10)
            .unwrap();
        model.set_objective(LinExpr::from(x)).unwrap();
        let form = model.standard_form();
        let tab = Tableau::phase_one(&form, &BoundOverrides::from_form(&form));

        let exact = min_ratio(&tab, 0, 1.0, 1e-7).unwrap();
        assert_eq!(exact.row, 0);
        assert!((exact.step - 1.0).abs() < 1e-15);

        let harris = harris_ratio(&tab, 0, 1.0, 1e-7, 1e-9).unwrap();
        assert_eq!(harris.row, 1);
        assert!(harris.step > 1.0 && harris.step < 1.0 + 1e-9);

        let sol = solve(&model);
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!(form.max_row_violation(&sol.x) <= 1e-9);
    }

    #[test]
    fn test_refactor_reproduces_updated_tableau() {
        let model = knapsack();
        let form = model.standard_form();
        let settings = LpSettings::default();
        let mut tab = Tableau::phase_one(&form, &BoundOverrides::from_form(&form));

        let (q, dir) = select_entering(&tab, settings.opt_tol, false).unwrap();
        let b = harris_ratio(&tab, q, dir, settings.pivot_tol, settings.harris_tol).unwrap();
        tab.shift(q, dir, b.step);
        tab.pivot(b.row, q, b.leave_state);

        let t = tab.t.clone();
        let x = tab.x.clone();
        let d = tab.d.clone();
        assert!(tab.refactor());
        assert!((&tab.t - t).amax() < 1e-12);
        assert!((&tab.x - x).amax() < 1e-12);
        assert!((&tab.d - d).amax() < 1e-12);
    }

    fn dense_lp(rows: usize, cols: usize) -> Model {
        // max sum_j c_j x_j  s.t.  mixed-sign rows, x in [0, 5]
        let mut model = Model::new(Sense::Maximize);
        let v: Vec<_> = (0..cols)
            .map(|_| model.add_continuous(0.0, 5.0).unwrap())
            .collect();
        let mut seed = 7u64;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((seed >> 33) % 97) as f64 / 7.0 - 6.0
        };
        for _ in 0..rows {
            let coefs: Vec<f64> = (0..cols).map(|_| next()).collect();
            model
                .add_constraint(LinExpr::weighted_sum(&v, &coefs), ConstraintOp::Le, 10.0)
                .unwrap();
        }
        let costs: Vec<f64> = (0..cols).map(|_| next() + 6.5).collect();
        model
            .set_objective(LinExpr::weighted_sum(&v, &costs))
            .unwrap();
        model
    }

    #[test]
    fn test_refactor_period_does_not_change_optimum() {
        let model = dense_lp(30, 40);
        let form = model.standard_form();
        let bounds = BoundOverrides::from_form(&form);

        let periodic = solve_relaxation(&form, &bounds, &LpSettings::default()).unwrap();
        let every = LpSettings::default().with_refactor_every(1);
        let exact = solve_relaxation(&form, &bounds, &every).unwrap();

        assert_eq!(periodic.status, LpStatus::Optimal);
        assert_eq!(exact.status, LpStatus::Optimal);
        assert!((periodic.objective - exact.objective).abs() < 1e-7);
        assert!(form.max_row_violation(&periodic.x) <= crate::EPSILON);
        assert!(model.is_feasible(&periodic.x, crate::EPSILON));
    }

    #[test]
    fn test_numerical_trouble_message() {
        let err = LpError::NumericalTrouble { violation: 2.5e-3 };
        assert_eq!(
            err.to_string(),
            "Simplex lost accuracy: row violation 2.500e-3 exceeds tolerance"
        );
    }

    #[test]
    fn test_repeat_solves_are_identical() {
        let model = knapsack();
        let a = solve(&model);
        let b = solve(&model);
        assert_eq!(a.x, b.x);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.objective, b.objective);
    }
}
