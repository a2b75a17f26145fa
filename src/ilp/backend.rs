//! `good_lp` backend using the pure-Rust `microlp` branch-and-bound solver.

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::{debug, trace};

use super::{
    BinaryProgram, Comparison, IlpSolution, IlpSolver, LinearExpr, Sense, SolveStatus,
    SolverError,
};

/// Feasibility tolerance for constraints without variables.
const CONSTANT_ROW_TOLERANCE: f64 = 1e-9;

/// Solves [`BinaryProgram`]s with `microlp` through `good_lp`.
///
/// Deterministic: solving the same program twice yields the same values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl IlpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, program: &BinaryProgram) -> Result<IlpSolution, SolverError> {
        // Rows without variables never reach the backend.
        for c in program.constraints.iter().filter(|c| c.expr.is_constant()) {
            if !c.is_satisfied(&[], CONSTANT_ROW_TOLERANCE) {
                debug!(constraint = %c.name, "constant row is unsatisfiable");
                return Ok(IlpSolution::without_values(SolveStatus::Infeasible));
            }
        }

        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = program
            .variables
            .iter()
            .map(|name| vars.add(variable().binary().name(name.clone())))
            .collect();

        let objective = to_expression(&program.objective, &handles)?;
        let unsolved = match program.sense {
            Sense::Maximize => vars.maximise(objective),
            Sense::Minimize => vars.minimise(objective),
        };
        let mut model = unsolved.using(microlp);

        for c in program.constraints.iter().filter(|c| !c.expr.is_constant()) {
            let lhs = to_expression(&c.expr, &handles)?;
            let rhs = Expression::from(c.rhs);
            let row = match c.comparison {
                Comparison::LessOrEqual => constraint::leq(lhs, rhs),
                Comparison::Equal => constraint::eq(lhs, rhs),
                Comparison::GreaterOrEqual => constraint::geq(lhs, rhs),
            };
            model.add_constraint(row);
        }

        trace!(
            program = %program.name,
            variables = program.variable_count(),
            constraints = program.constraint_count(),
            "solving with microlp"
        );

        let status = match model.solve() {
            Ok(solution) => {
                let values: Vec<f64> = handles.iter().map(|&v| solution.value(v)).collect();
                let objective_value = program.objective.evaluate(&values);
                return Ok(IlpSolution::optimal(values, objective_value));
            }
            Err(ResolutionError::Infeasible) => SolveStatus::Infeasible,
            Err(ResolutionError::Unbounded) => SolveStatus::Unbounded,
            Err(other) => SolveStatus::Failed(other.to_string()),
        };

        Ok(IlpSolution::without_values(status))
    }
}

/// Translates a [`LinearExpr`] into a `good_lp` expression.
fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Result<Expression, SolverError> {
    let mut out = Expression::from(expr.constant);
    for &(var, coef) in &expr.terms {
        let handle = handles.get(var.index()).ok_or_else(|| {
            SolverError::Backend(format!("variable index {} is not declared", var.index()))
        })?;
        out.add_mul(coef, *handle);
    }
    Ok(out)
}
