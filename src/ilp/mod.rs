//! Solver-independent 0/1 integer linear programs.
//!
//! A [`BinaryProgram`] is a plain description: named binary variables,
//! a linear objective, and named linear constraints. It holds no solver
//! state, so building one is a pure function of its inputs and it can be
//! inspected and compared in tests. Any [`IlpSolver`] can consume it.
//!
//! # Reference
//! - Wolsey (2020), "Integer Programming", Ch. 1
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete Programming Problems"

mod backend;

pub use backend::MicroLpSolver;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of a binary variable within its program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    /// Position of this variable in the program's variable list.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A linear expression `Σ coef·x + constant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    /// `(variable, coefficient)` terms.
    pub terms: Vec<(VarId, f64)>,
    /// Constant offset.
    pub constant: f64,
}

impl LinearExpr {
    /// Creates an empty expression (value 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables with unit coefficients.
    pub fn sum_of(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Adds `coef·var`.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    /// Builder form of [`LinearExpr::add_term`].
    pub fn with_term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    /// Whether the expression references no variables.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression under an assignment indexed by [`VarId`].
    ///
    /// Variables missing from `values` count as 0.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.index()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

/// Relation between a constraint's expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// `expr <= rhs`
    LessOrEqual,
    /// `expr == rhs`
    Equal,
    /// `expr >= rhs`
    GreaterOrEqual,
}

impl Comparison {
    /// Checks `lhs (op) rhs` with an absolute tolerance.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Self::LessOrEqual => lhs <= rhs + tolerance,
            Self::Equal => (lhs - rhs).abs() <= tolerance,
            Self::GreaterOrEqual => lhs + tolerance >= rhs,
        }
    }
}

/// A named linear constraint `expr (op) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Constraint name (for diagnostics).
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation.
    pub comparison: Comparison,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Creates a constraint.
    pub fn new(name: impl Into<String>, expr: LinearExpr, comparison: Comparison, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            comparison,
            rhs,
        }
    }

    /// Whether the constraint holds under `values`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.comparison
            .holds(self.expr.evaluate(values), self.rhs, tolerance)
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// Maximize the objective.
    Maximize,
    /// Minimize the objective.
    Minimize,
}

/// A 0/1 integer linear program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryProgram {
    /// Program name.
    pub name: String,
    /// Binary variable names, indexed by [`VarId`].
    pub variables: Vec<String>,
    /// Optimization direction.
    pub sense: Sense,
    /// Objective expression.
    pub objective: LinearExpr,
    /// Linear constraints.
    pub constraints: Vec<LinearConstraint>,
}

impl BinaryProgram {
    /// Creates an empty maximization program.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            sense: Sense::Maximize,
            objective: LinearExpr::new(),
            constraints: Vec::new(),
        }
    }

    /// Adds a binary variable and returns its id.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.variables.push(name.into());
        VarId(self.variables.len() - 1)
    }

    /// Sets the objective and direction.
    pub fn set_objective(&mut self, sense: Sense, objective: LinearExpr) {
        self.sense = sense;
        self.objective = objective;
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Looks up a constraint by name.
    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Whether every constraint holds under `values`.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        self.constraints
            .iter()
            .all(|c| c.is_satisfied(values, tolerance))
    }
}

/// Termination status of a solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// A proven optimum was found.
    Optimal,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
    /// The solver stopped for another reason.
    Failed(String),
}

impl SolveStatus {
    /// Short description of the status.
    pub fn describe(&self) -> String {
        match self {
            Self::Optimal => "optimal".to_string(),
            Self::Infeasible => "infeasible".to_string(),
            Self::Unbounded => "unbounded".to_string(),
            Self::Failed(reason) => format!("solver stopped: {reason}"),
        }
    }
}

/// Solution returned by an [`IlpSolver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlpSolution {
    /// Termination status.
    pub status: SolveStatus,
    /// Variable values indexed by [`VarId`] (empty unless optimal).
    pub values: Vec<f64>,
    /// Objective value (0 unless optimal).
    pub objective_value: f64,
}

impl IlpSolution {
    /// An optimal solution.
    pub fn optimal(values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective_value,
        }
    }

    /// A solution carrying only a non-optimal status.
    pub fn without_values(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: 0.0,
        }
    }

    /// Whether the solver proved optimality.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Value of one variable (0 when absent).
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }
}

/// Fatal solver failures.
///
/// Distinct from non-optimal termination, which is reported through
/// [`SolveStatus`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The solver cannot be used in this environment (license, missing library).
    #[error("solver unavailable: {0}")]
    Unavailable(String),
    /// The backend rejected the program.
    #[error("solver backend error: {0}")]
    Backend(String),
}

/// A 0/1 integer linear program solver.
pub trait IlpSolver {
    /// Solver name.
    fn name(&self) -> &'static str;

    /// Checks that the solver can be used at all.
    ///
    /// Called once when a selector is created, so environment problems
    /// surface at initialization rather than at the first solve.
    fn ensure_available(&self) -> Result<(), SolverError> {
        Ok(())
    }

    /// Solves `program` to optimality.
    ///
    /// Non-optimal termination is returned as `Ok` with a non-optimal
    /// [`SolveStatus`]; `Err` is reserved for the solver being unusable.
    fn solve(&self, program: &BinaryProgram) -> Result<IlpSolution, SolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_binary_ids() {
        let mut p = BinaryProgram::new("p");
        let a = p.add_binary("a");
        let b = p.add_binary("b");
        assert_eq!(a, VarId(0));
        assert_eq!(b.index(), 1);
        assert_eq!(p.variable_count(), 2);
    }

    #[test]
    fn test_expr_evaluate() {
        let expr = LinearExpr::new()
            .with_term(VarId(0), 2.0)
            .with_term(VarId(1), -1.5);
        assert!((expr.evaluate(&[1.0, 1.0]) - 0.5).abs() < 1e-12);
        // Missing variables count as zero
        assert!((expr.evaluate(&[1.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sum_of() {
        let expr = LinearExpr::sum_of([VarId(0), VarId(2)]);
        assert_eq!(expr.terms.len(), 2);
        assert!((expr.evaluate(&[1.0, 1.0, 1.0]) - 2.0).abs() < 1e-12);
        assert!(LinearExpr::sum_of(Vec::<VarId>::new()).is_constant());
    }

    #[test]
    fn test_constraint_satisfaction() {
        let mut p = BinaryProgram::new("p");
        let x = p.add_binary("x");
        let y = p.add_binary("y");
        p.add_constraint(LinearConstraint::new(
            "one",
            LinearExpr::sum_of([x, y]),
            Comparison::Equal,
            1.0,
        ));
        p.add_constraint(LinearConstraint::new(
            "y_le_x",
            LinearExpr::new().with_term(y, 1.0).with_term(x, -1.0),
            Comparison::LessOrEqual,
            0.0,
        ));

        assert!(p.is_feasible(&[1.0, 0.0], 1e-9));
        assert!(!p.is_feasible(&[0.0, 1.0], 1e-9));
        assert!(!p.is_feasible(&[1.0, 1.0], 1e-9));
        assert!(p.constraint("one").is_some());
        assert!(p.constraint("missing").is_none());
    }

    #[test]
    fn test_comparison_tolerance() {
        assert!(Comparison::Equal.holds(1.0 + 1e-10, 1.0, 1e-9));
        assert!(Comparison::GreaterOrEqual.holds(0.0, 0.0, 0.0));
        assert!(!Comparison::LessOrEqual.holds(1.1, 1.0, 1e-9));
    }

    #[test]
    fn test_solution_value() {
        let sol = IlpSolution::optimal(vec![0.0, 1.0], 3.0);
        assert!(sol.is_optimal());
        assert_eq!(sol.value(VarId(1)), 1.0);
        assert_eq!(sol.value(VarId(9)), 0.0);

        let none = IlpSolution::without_values(SolveStatus::Infeasible);
        assert!(!none.is_optimal());
        assert_eq!(none.status.describe(), "infeasible");
    }
}
