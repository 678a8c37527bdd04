//! Model assembly with eager validation.

use super::{Constraint, ConstraintId, ConstraintOp, LinExpr, VarDomain, VarId, VarTag, Variable};
use crate::error::{LpResult, ModelError, ModelResult};
use crate::simplex::{solve_relaxation, BoundOverrides, LpSettings, LpSolution};
use crate::standard::StandardForm;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    /// Minimize the objective.
    #[default]
    Minimize,
    /// Maximize the objective.
    Maximize,
}

impl Sense {
    /// `+1` for minimization, `-1` for maximization.
    ///
    /// Multiplying a model objective by this sign yields the minimization
    /// objective used internally by the solvers.
    pub fn sign(self) -> f64 {
        match self {
            Sense::Minimize => 1.0,
            Sense::Maximize => -1.0,
        }
    }

    /// Objective value worse than any finite value.
    pub fn worst(self) -> f64 {
        match self {
            Sense::Minimize => f64::INFINITY,
            Sense::Maximize => f64::NEG_INFINITY,
        }
    }

    /// True if `a` is better than `b` by more than `tol`.
    pub fn is_better(self, a: f64, b: f64, tol: f64) -> bool {
        match self {
            Sense::Minimize => a < b - tol,
            Sense::Maximize => a > b + tol,
        }
    }
}

/// A linear (mixed-binary) optimization model.
///
/// ```text
/// min / max   c^T x + c0
/// subject to  a_i^T x (<=, >=, ==) b_i    for every constraint i
///             lo_j <= x_j <= hi_j          for every variable j
///             x_j in {0, 1}                for every binary j
/// ```
///
/// Every expression handed to the model is checked against its variable
/// table and for non-finite data before it is stored. A constructed model
/// therefore never references unknown variables.
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: Option<String>,
    sense: Sense,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<(VarId, f64)>,
    objective_constant: f64,
}

impl Model {
    /// Create an empty model with an empty (zero) objective.
    pub fn new(sense: Sense) -> Self {
        Self {
            sense,
            ..Default::default()
        }
    }

    /// Create an empty named model.
    pub fn named(name: impl Into<String>, sense: Sense) -> Self {
        Self {
            name: Some(name.into()),
            sense,
            ..Default::default()
        }
    }

    /// Model name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Optimization direction.
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// All variables in creation order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Look up a variable.
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// All constraints in creation order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Look up a constraint.
    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id.index())
    }

    /// Merged objective terms.
    pub fn objective_terms(&self) -> &[(VarId, f64)] {
        &self.objective
    }

    /// Objective constant.
    pub fn objective_constant(&self) -> f64 {
        self.objective_constant
    }

    /// Ids of the binary variables, in increasing order.
    pub fn binary_vars(&self) -> Vec<VarId> {
        self.variables
            .iter()
            .filter(|v| v.is_binary())
            .map(|v| v.id)
            .collect()
    }

    /// Variables carrying a project or arc tag (anything but auxiliary).
    pub fn tagged_vars(&self) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(|v| v.tag != VarTag::Auxiliary)
    }

    /// Add a variable with the given domain and bounds.
    ///
    /// Binary bounds must lie in `[0, 1]` and are rounded inwards to
    /// integers, so `[0, 1]`, `[0, 0]` and `[1, 1]` are the only effective
    /// binary domains.
    pub fn add_variable(&mut self, domain: VarDomain, lower: f64, upper: f64) -> ModelResult<VarId> {
        self.add_variable_full(domain, lower, upper, VarTag::Auxiliary, None)
    }

    /// Add a variable with a tag and an optional name.
    pub fn add_variable_full(
        &mut self,
        domain: VarDomain,
        lower: f64,
        upper: f64,
        tag: VarTag,
        name: Option<&str>,
    ) -> ModelResult<VarId> {
        let invalid = || ModelError::InvalidBounds {
            lower,
            upper,
            domain: domain.as_str(),
        };

        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(invalid());
        }
        if lower == f64::INFINITY || upper == f64::NEG_INFINITY {
            return Err(invalid());
        }

        let (lower, upper) = match domain {
            VarDomain::Continuous => (lower, upper),
            VarDomain::Binary => {
                if lower < 0.0 || upper > 1.0 {
                    return Err(invalid());
                }
                let (lo, hi) = (lower.ceil(), upper.floor());
                if lo > hi {
                    return Err(invalid());
                }
                (lo, hi)
            }
        };

        let id = VarId::new(self.variables.len());
        self.variables.push(Variable {
            id,
            domain,
            lower,
            upper,
            name: name.map(str::to_string),
            tag,
        });
        Ok(id)
    }

    /// Add a binary variable.
    pub fn add_binary(&mut self) -> ModelResult<VarId> {
        self.add_variable(VarDomain::Binary, 0.0, 1.0)
    }

    /// Add a tagged, named binary variable.
    pub fn add_binary_tagged(&mut self, tag: VarTag, name: &str) -> ModelResult<VarId> {
        self.add_variable_full(VarDomain::Binary, 0.0, 1.0, tag, Some(name))
    }

    /// Add a continuous variable in `[lower, upper]`.
    pub fn add_continuous(&mut self, lower: f64, upper: f64) -> ModelResult<VarId> {
        self.add_variable(VarDomain::Continuous, lower, upper)
    }

    /// Add a named continuous variable in `[lower, upper]`.
    pub fn add_continuous_named(&mut self, lower: f64, upper: f64, name: &str) -> ModelResult<VarId> {
        self.add_variable_full(VarDomain::Continuous, lower, upper, VarTag::Auxiliary, Some(name))
    }

    /// Add a free continuous variable.
    pub fn add_free(&mut self) -> ModelResult<VarId> {
        self.add_continuous(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Add a named free continuous variable.
    pub fn add_free_named(&mut self, name: &str) -> ModelResult<VarId> {
        self.add_continuous_named(f64::NEG_INFINITY, f64::INFINITY, name)
    }

    /// Add the constraint `expr (op) rhs`.
    ///
    /// The constant of `expr` is moved to the right-hand side.
    pub fn add_constraint(&mut self, expr: LinExpr, op: ConstraintOp, rhs: f64) -> ModelResult<ConstraintId> {
        self.push_constraint(None, expr, op, rhs)
    }

    /// Add a named constraint.
    pub fn add_named_constraint(
        &mut self,
        name: &str,
        expr: LinExpr,
        op: ConstraintOp,
        rhs: f64,
    ) -> ModelResult<ConstraintId> {
        self.push_constraint(Some(name.to_string()), expr, op, rhs)
    }

    fn push_constraint(
        &mut self,
        name: Option<String>,
        expr: LinExpr,
        op: ConstraintOp,
        rhs: f64,
    ) -> ModelResult<ConstraintId> {
        let label = name.as_deref().unwrap_or("<unnamed>");
        let terms = self
            .validate_expr(&expr)
            .map_err(|e| relabel(e, label, ModelError::MalformedConstraint))?;

        let rhs = rhs - expr.constant();
        if !rhs.is_finite() {
            return Err(ModelError::MalformedConstraint(format!(
                "{label}: right-hand side {rhs} is not finite"
            )));
        }

        let id = ConstraintId(self.constraints.len());
        self.constraints.push(Constraint {
            id,
            terms,
            op,
            rhs,
            name,
        });
        Ok(id)
    }

    /// Replace the objective.
    pub fn set_objective(&mut self, expr: LinExpr) -> ModelResult<()> {
        let terms = self
            .validate_expr(&expr)
            .map_err(|e| relabel(e, "objective", ModelError::MalformedObjective))?;
        self.objective = terms;
        self.objective_constant = expr.constant();
        Ok(())
    }

    /// Check variable references and coefficients; return merged terms.
    fn validate_expr(&self, expr: &LinExpr) -> ModelResult<Vec<(VarId, f64)>> {
        let num_vars = self.variables.len();
        for &(var, coef) in expr.terms() {
            if var.index() >= num_vars {
                return Err(ModelError::UnknownVariable {
                    var: var.index(),
                    num_vars,
                });
            }
            if !coef.is_finite() {
                return Err(ModelError::MalformedConstraint(format!(
                    "coefficient {coef} on {var} is not finite"
                )));
            }
        }
        if !expr.constant().is_finite() {
            return Err(ModelError::MalformedConstraint(format!(
                "constant {} is not finite",
                expr.constant()
            )));
        }
        Ok(expr.merged_terms())
    }

    /// Objective value at `x`.
    pub fn evaluate_objective(&self, x: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|&(var, coef)| coef * x[var.index()])
            .sum::<f64>()
            + self.objective_constant
    }

    /// True if `x` satisfies all bounds, constraints and integrality
    /// requirements within `tol`.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        if x.len() != self.variables.len() {
            return false;
        }
        let bounds_ok = self.variables.iter().all(|v| {
            let val = x[v.id.index()];
            let in_bounds = val >= v.lower - tol && val <= v.upper + tol;
            let integral = !v.is_binary() || (val - val.round()).abs() <= tol;
            in_bounds && integral
        });
        bounds_ok && self.constraints.iter().all(|c| c.is_satisfied(x, tol))
    }

    /// Lower bounds of all variables.
    pub fn lower_bounds(&self) -> Vec<f64> {
        self.variables.iter().map(|v| v.lower).collect()
    }

    /// Upper bounds of all variables.
    pub fn upper_bounds(&self) -> Vec<f64> {
        self.variables.iter().map(|v| v.upper).collect()
    }

    /// Assemble the sparse standard form consumed by the LP engine.
    pub fn standard_form(&self) -> StandardForm {
        StandardForm::from_model(self)
    }

    /// Solve the continuous relaxation with the model's own bounds.
    pub fn solve_relaxation(&self, settings: &LpSettings) -> LpResult<LpSolution> {
        let form = self.standard_form();
        let bounds = BoundOverrides::from_form(&form);
        solve_relaxation(&form, &bounds, settings)
    }
}

/// Prefix coefficient errors with the row label and pick the error kind.
fn relabel(err: ModelError, label: &str, kind: fn(String) -> ModelError) -> ModelError {
    match err {
        ModelError::MalformedConstraint(msg) => kind(format!("{label}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variable_rejected() {
        let mut other = Model::new(Sense::Minimize);
        other.add_binary().unwrap();
        let stranger = other.add_binary().unwrap();

        let mut model = Model::new(Sense::Minimize);
        model.add_binary().unwrap();

        let err = model
            .add_constraint(LinExpr::from(stranger), ConstraintOp::Le, 1.0)
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownVariable { var: 1, num_vars: 1 });

        let err = model.set_objective(LinExpr::from(stranger)).unwrap_err();
        assert!(matches!(err, ModelError::UnknownVariable { .. }));
        assert_eq!(model.num_constraints(), 0);
    }

    #[test]
    fn test_nan_coefficient_rejected() {
        let mut model = Model::new(Sense::Maximize);
        let x = model.add_binary().unwrap();

        let err = model
            .add_named_constraint("cap", LinExpr::term(x, f64::NAN), ConstraintOp::Le, 1.0)
            .unwrap_err();
        match err {
            ModelError::MalformedConstraint(msg) => assert!(msg.starts_with("cap:")),
            other => panic!("unexpected error {other:?}"),
        }

        let err = model
            .add_constraint(LinExpr::from(x), ConstraintOp::Le, f64::INFINITY)
            .unwrap_err();
        assert!(matches!(err, ModelError::MalformedConstraint(_)));

        let err = model.set_objective(LinExpr::term(x, f64::INFINITY)).unwrap_err();
        assert!(matches!(err, ModelError::MalformedObjective(_)));
    }

    #[test]
    fn test_bounds_validation() {
        let mut model = Model::new(Sense::Minimize);
        assert!(model.add_continuous(2.0, 1.0).is_err());
        assert!(model.add_continuous(f64::NAN, 1.0).is_err());
        assert!(model.add_continuous(f64::INFINITY, f64::INFINITY).is_err());
        assert!(model.add_variable(VarDomain::Binary, -1.0, 1.0).is_err());
        assert!(model.add_variable(VarDomain::Binary, 0.2, 0.8).is_err());

        let fixed = model.add_variable(VarDomain::Binary, 0.5, 1.0).unwrap();
        let var = model.variable(fixed).unwrap();
        assert_eq!((var.lower, var.upper), (1.0, 1.0));
    }

    #[test]
    fn test_constant_moves_to_rhs() {
        let mut model = Model::new(Sense::Minimize);
        let x = model.add_continuous(0.0, 10.0).unwrap();
        let id = model
            .add_constraint(LinExpr::from(x) + 3.0, ConstraintOp::Le, 5.0)
            .unwrap();

        let row = model.constraint(id).unwrap();
        assert_eq!(row.rhs, 2.0);
        assert!(model.is_feasible(&[2.0], 1e-9));
        assert!(!model.is_feasible(&[2.5], 1e-9));
    }

    #[test]
    fn test_feasibility_checks_integrality() {
        let mut model = Model::new(Sense::Maximize);
        let x = model.add_binary().unwrap();
        model
            .add_constraint(LinExpr::from(x), ConstraintOp::Le, 1.0)
            .unwrap();

        assert!(model.is_feasible(&[1.0], 1e-6));
        assert!(!model.is_feasible(&[0.5], 1e-6));
        assert!(model.is_feasible(&[0.9999999], 1e-6));
    }

    #[test]
    fn test_sense_comparisons() {
        assert!(Sense::Maximize.is_better(2.0, 1.0, 1e-6));
        assert!(!Sense::Maximize.is_better(1.0 + 1e-9, 1.0, 1e-6));
        assert!(Sense::Minimize.is_better(1.0, 2.0, 1e-6));
        assert_eq!(Sense::Maximize.worst(), f64::NEG_INFINITY);
    }
}
