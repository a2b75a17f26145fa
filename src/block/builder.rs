//! Block selection formulation.
//!
//! Builds a [`BinaryProgram`] from a preference matrix and a block length.
//!
//! # Variables
//! - `y[j]` for every slot `j`: slot `j` is part of the chosen block.
//! - `start[i]` for every valid start `i ∈ [0, T - k]`: the block begins at `i`.
//!
//! # Objective
//! ```text
//! attending(j) = |{ p : m[p][j] > 0 }|
//! preference(j) = Σ_p m[p][j]
//! score(j) = (1 - 1/P)·attending(j) + (1/P)·preference(j)
//! maximize Σ_j score(j)·y[j]
//! ```
//!
//! # Constraints
//! ```text
//! choose_start:  Σ_i start[i] = 1
//! link_j:        y[j] <= Σ_{i ≤ j < i+k} start[i]    (or = with LinkMode::Exact)
//! zero_out_j:    y[j] = 0                             (no start covers j)
//! ```
//!
//! `zero_out_j` only appears when `k > T`; `choose_start` is then an
//! empty row and the program is infeasible.

use crate::config::LinkMode;
use crate::ilp::{
    BinaryProgram, Comparison, IlpSolution, LinearConstraint, LinearExpr, Sense, VarId,
};
use crate::models::{BlockSelection, OptimizationResult, PreferenceMatrix};
use crate::validation::{validate_matrix, ValidationError, ValidationErrorKind};

/// Coverage and preference weights of the objective.
///
/// The two weights sum to 1, so each attending person contributes
/// roughly one unit regardless of group size. Coverage dominates as the
/// group grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveWeights {
    /// Weight of "one more person can attend": `1 - 1/P`.
    pub coverage: f64,
    /// Weight of summed preference intensity: `1/P`.
    pub preference: f64,
}

impl ObjectiveWeights {
    /// Weights for a group of `num_people`.
    pub fn for_group(num_people: usize) -> Self {
        let preference = 1.0 / num_people as f64;
        Self {
            coverage: 1.0 - preference,
            preference,
        }
    }

    /// Score of one slot given its preference column.
    pub fn score(&self, column: impl IntoIterator<Item = f64>) -> f64 {
        let (attending, preference) = column
            .into_iter()
            .fold((0usize, 0.0), |(count, sum), v| {
                (count + usize::from(v > 0.0), sum + v)
            });
        self.coverage * attending as f64 + self.preference * preference
    }
}

/// Per-slot objective coefficients of `matrix`.
pub fn slot_scores(matrix: &PreferenceMatrix, weights: &ObjectiveWeights) -> Vec<f64> {
    (0..matrix.num_slots())
        .map(|j| weights.score(matrix.rows().iter().map(|row| row[j])))
        .collect()
}

/// A built block selection program with its variable layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockModel {
    program: BinaryProgram,
    slot_vars: Vec<VarId>,
    start_vars: Vec<VarId>,
    slot_scores: Vec<f64>,
    weights: ObjectiveWeights,
    block_length: usize,
}

impl BlockModel {
    /// The underlying 0/1 program.
    pub fn program(&self) -> &BinaryProgram {
        &self.program
    }

    /// `y[j]` variables, indexed by slot.
    pub fn slot_vars(&self) -> &[VarId] {
        &self.slot_vars
    }

    /// `start[i]` variables, indexed by start position.
    pub fn start_vars(&self) -> &[VarId] {
        &self.start_vars
    }

    /// Objective coefficient of every slot.
    pub fn slot_scores(&self) -> &[f64] {
        &self.slot_scores
    }

    /// Objective coefficient of one slot.
    pub fn slot_score(&self, slot: usize) -> Option<f64> {
        self.slot_scores.get(slot).copied()
    }

    /// Objective weights.
    pub fn weights(&self) -> ObjectiveWeights {
        self.weights
    }

    /// Block length `k` the model was built for.
    pub fn block_length(&self) -> usize {
        self.block_length
    }

    /// Number of valid block starts.
    pub fn start_count(&self) -> usize {
        self.start_vars.len()
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.program.variable_count()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.program.constraint_count()
    }

    /// Reads a solver solution back as a block selection.
    ///
    /// A variable counts as 1 when its value exceeds `threshold`.
    pub fn decode(&self, solution: &IlpSolution, threshold: f64) -> OptimizationResult {
        if !solution.is_optimal() {
            return OptimizationResult::no_solution(solution.status.describe());
        }

        let selected_slots: Vec<usize> = self
            .slot_vars
            .iter()
            .enumerate()
            .filter(|&(_, &var)| solution.value(var) > threshold)
            .map(|(j, _)| j)
            .collect();

        let Some(start_slot) = self
            .start_vars
            .iter()
            .position(|&var| solution.value(var) > threshold)
        else {
            return OptimizationResult::no_solution("optimal solution selects no block start");
        };

        OptimizationResult::Solved(BlockSelection {
            selected_slots,
            start_slot,
            total_score: solution.objective_value,
        })
    }
}

/// Builds a [`BlockModel`] from a preference matrix.
///
/// # Example
/// ```
/// use u_slotblock::block::BlockModelBuilder;
/// use u_slotblock::models::PreferenceMatrix;
///
/// let matrix = PreferenceMatrix::new(vec![vec![1.0, 0.5, 0.0]]).unwrap();
/// let model = BlockModelBuilder::new(&matrix, 2).try_build().unwrap();
///
/// // 3 slot variables + 2 start variables
/// assert_eq!(model.variable_count(), 5);
/// // choose_start + one link per slot
/// assert_eq!(model.constraint_count(), 4);
///
/// // k = 0 is rejected
/// assert!(BlockModelBuilder::new(&matrix, 0).try_build().is_err());
/// ```
pub struct BlockModelBuilder<'a> {
    matrix: &'a PreferenceMatrix,
    block_length: usize,
    link_mode: LinkMode,
    name: String,
}

impl<'a> BlockModelBuilder<'a> {
    /// Creates a builder for blocks of `block_length` slots.
    pub fn new(matrix: &'a PreferenceMatrix, block_length: usize) -> Self {
        Self {
            matrix,
            block_length,
            link_mode: LinkMode::default(),
            name: "TimeSlotSelection".to_string(),
        }
    }

    /// Sets the slot linking formulation.
    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }

    /// Sets the program name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validates the block length and builds the program.
    ///
    /// `k = 0` is rejected. `k` longer than the slot count is accepted and
    /// yields an infeasible program (empty `choose_start` row).
    ///
    /// # Errors
    /// [`ValidationErrorKind::ZeroBlockLength`] when `k = 0`.
    pub fn try_build(&self) -> Result<BlockModel, Vec<ValidationError>> {
        let errors: Vec<ValidationError> =
            match validate_matrix(self.matrix.rows(), self.block_length) {
                Ok(()) => Vec::new(),
                Err(errors) => errors
                    .into_iter()
                    .filter(|e| e.kind != ValidationErrorKind::BlockTooLong)
                    .collect(),
            };

        if errors.is_empty() {
            Ok(self.build())
        } else {
            Err(errors)
        }
    }

    /// Builds the program without checking the block length.
    ///
    /// Callers must guarantee `k >= 1`.
    pub(crate) fn build(&self) -> BlockModel {
        let num_slots = self.matrix.num_slots();
        let k = self.block_length;
        let weights = ObjectiveWeights::for_group(self.matrix.num_people());
        let scores = slot_scores(self.matrix, &weights);

        let mut program = BinaryProgram::new(self.name.clone());

        let slot_vars: Vec<VarId> = (0..num_slots)
            .map(|j| program.add_binary(format!("y[{j}]")))
            .collect();

        let mut objective = LinearExpr::new();
        for (&var, &score) in slot_vars.iter().zip(&scores) {
            objective.add_term(var, score);
        }
        program.set_objective(Sense::Maximize, objective);

        let start_count = (num_slots + 1).saturating_sub(k);
        let start_vars: Vec<VarId> = (0..start_count)
            .map(|i| program.add_binary(format!("start[{i}]")))
            .collect();

        program.add_constraint(LinearConstraint::new(
            "choose_start",
            LinearExpr::sum_of(start_vars.iter().copied()),
            Comparison::Equal,
            1.0,
        ));

        let link_comparison = match self.link_mode {
            LinkMode::UpperBound => Comparison::LessOrEqual,
            LinkMode::Exact => Comparison::Equal,
        };

        for (j, &y) in slot_vars.iter().enumerate() {
            let covering: Vec<VarId> = start_vars
                .iter()
                .enumerate()
                .filter(|&(i, _)| i <= j && j < i + k)
                .map(|(_, &s)| s)
                .collect();

            if covering.is_empty() {
                program.add_constraint(LinearConstraint::new(
                    format!("zero_out_{j}"),
                    LinearExpr::new().with_term(y, 1.0),
                    Comparison::Equal,
                    0.0,
                ));
            } else {
                // y[j] - Σ start[i] (op) 0
                let mut expr = LinearExpr::new().with_term(y, 1.0);
                for s in covering {
                    expr.add_term(s, -1.0);
                }
                program.add_constraint(LinearConstraint::new(
                    format!("link_{j}"),
                    expr,
                    link_comparison,
                    0.0,
                ));
            }
        }

        BlockModel {
            program,
            slot_vars,
            start_vars,
            slot_scores: scores,
            weights,
            block_length: k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ilp::{IlpSolver, MicroLpSolver, SolveStatus};

    fn example_matrix() -> PreferenceMatrix {
        PreferenceMatrix::new(vec![
            vec![0.6, 1.0, 1.0, 0.6],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_weights_sum_to_one() {
        let w = ObjectiveWeights::for_group(4);
        assert!((w.coverage - 0.75).abs() < 1e-12);
        assert!((w.preference - 0.25).abs() < 1e-12);

        let single = ObjectiveWeights::for_group(1);
        assert!((single.coverage - 0.0).abs() < 1e-12);
        assert!((single.preference - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_slot_scores() {
        let m = example_matrix();
        let scores = slot_scores(&m, &ObjectiveWeights::for_group(4));
        // 0.75 * 4 attending + 0.25 * (3.6 or 4.0)
        let expected = [3.9, 4.0, 4.0, 3.9];
        for (s, e) in scores.iter().zip(expected) {
            assert!((s - e).abs() < 1e-9, "{s} vs {e}");
        }
    }

    #[test]
    fn test_score_ignores_non_positive_for_coverage() {
        let w = ObjectiveWeights::for_group(2);
        // Nobody attends; preference -1.0 * 0.5
        assert!((w.score([0.0, -1.0]) + 0.5).abs() < 1e-12);
        // One attends: 0.5 * 1 + 0.5 * 0.4
        assert!((w.score([0.4, 0.0]) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_structure_k1() {
        let m = example_matrix();
        let model = BlockModelBuilder::new(&m, 1).build();
        assert_eq!(model.slot_vars().len(), 4);
        assert_eq!(model.start_count(), 4);
        assert_eq!(model.variable_count(), 8);
        // choose_start + 4 links
        assert_eq!(model.constraint_count(), 5);
        assert_eq!(model.program().variables[0], "y[0]");
        assert_eq!(model.program().variables[4], "start[0]");
        assert_eq!(model.program().sense, Sense::Maximize);
    }

    #[test]
    fn test_link_covers_window() {
        let m = example_matrix();
        let model = BlockModelBuilder::new(&m, 2).build();
        assert_eq!(model.start_count(), 3);

        let starts = model.start_vars();
        // Slot 0 is covered only by start 0; slot 2 by starts 1 and 2.
        let link0 = model.program().constraint("link_0").unwrap();
        assert_eq!(link0.expr.terms.len(), 2);
        assert!(link0.expr.terms.contains(&(starts[0], -1.0)));
        assert_eq!(link0.comparison, Comparison::LessOrEqual);

        let link2 = model.program().constraint("link_2").unwrap();
        assert!(link2.expr.terms.contains(&(starts[1], -1.0)));
        assert!(link2.expr.terms.contains(&(starts[2], -1.0)));
        assert!(!link2.expr.terms.contains(&(starts[0], -1.0)));
    }

    #[test]
    fn test_exact_link_mode() {
        let m = example_matrix();
        let model = BlockModelBuilder::new(&m, 2)
            .with_link_mode(LinkMode::Exact)
            .build();
        let link = model.program().constraint("link_1").unwrap();
        assert_eq!(link.comparison, Comparison::Equal);
    }

    #[test]
    fn test_block_longer_than_slots() {
        let m = PreferenceMatrix::new(vec![vec![1.0, 1.0]]).unwrap();
        let model = BlockModelBuilder::new(&m, 3).try_build().unwrap();
        assert_eq!(model.start_count(), 0);
        assert!(model.program().constraint("zero_out_0").is_some());
        assert!(model.program().constraint("zero_out_1").is_some());
        assert!(model.program().constraint("choose_start").unwrap().expr.is_constant());

        let sol = MicroLpSolver::new().solve(model.program()).unwrap();
        assert_eq!(sol.status, SolveStatus::Infeasible);
        assert!(!model.decode(&sol, 0.5).is_solved());
    }

    #[test]
    fn test_zero_block_length_rejected() {
        let m = PreferenceMatrix::new(vec![vec![1.0, 1.0]]).unwrap();
        let errors = BlockModelBuilder::new(&m, 0).try_build().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ZeroBlockLength);
    }

    #[test]
    fn test_try_build_matches_build() {
        let m = example_matrix();
        let checked = BlockModelBuilder::new(&m, 4).try_build().unwrap();
        assert_eq!(checked, BlockModelBuilder::new(&m, 4).build());
        assert_eq!(checked.start_count(), 1);
    }

    #[test]
    fn test_build_is_pure() {
        let m = example_matrix();
        let a = BlockModelBuilder::new(&m, 2).build();
        let b = BlockModelBuilder::new(&m, 2).build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode() {
        let m = example_matrix();
        let model = BlockModelBuilder::new(&m, 2).build();
        // y = [0,1,1,0], start = [0,1,0]
        let values = vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        assert!(model.program().is_feasible(&values, 1e-9));
        let sol = IlpSolution::optimal(values, 8.0);

        let result = model.decode(&sol, 0.5);
        let sel = result.selection().unwrap();
        assert_eq!(sel.selected_slots, vec![1, 2]);
        assert_eq!(sel.start_slot, 1);
        assert!((sel.total_score - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_decode_threshold() {
        let m = example_matrix();
        let model = BlockModelBuilder::new(&m, 1).build();
        let values = vec![0.0, 0.6, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let sol = IlpSolution::optimal(values, 4.0);
        assert_eq!(model.decode(&sol, 0.5).selected_slots(), Some(&[1][..]));
        assert_eq!(model.decode(&sol, 0.7).selected_slots(), Some(&[][..]));
    }

    #[test]
    fn test_decode_without_start_is_no_solution() {
        let m = example_matrix();
        let model = BlockModelBuilder::new(&m, 1).build();
        // y[1] set but no start variable chosen
        let values = vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let sol = IlpSolution::optimal(values, 4.0);
        assert!(!model.decode(&sol, 0.5).is_solved());
    }
}
