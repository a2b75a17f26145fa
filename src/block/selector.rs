//! Block selector: matrix store, model rebuild, and solve.
//!
//! # Algorithm
//!
//! 1. Hold the canonical preference matrix and block length `k`.
//! 2. After construction and after every mutation, rebuild the whole
//!    program from the matrix (no incremental patching).
//! 3. On `optimize`, hand the current program to the solver and decode
//!    the result.

use tracing::{debug, info, warn};

use super::builder::{BlockModel, BlockModelBuilder, ObjectiveWeights};
use crate::config::SelectorConfig;
use crate::error::SelectorError;
use crate::ilp::{IlpSolver, MicroLpSolver};
use crate::models::{OptimizationResult, PreferenceMatrix};

/// Chooses the best block of `k` consecutive slots.
///
/// Starts with `k = 1`. [`BlockSelector::double_resolution`] splits every
/// slot in two and doubles `k`, so the block keeps covering the same
/// stretch of time at a finer granularity.
///
/// Not reentrant: mutations take `&mut self`, so concurrent use must be
/// serialized by the caller.
///
/// # Example
///
/// ```
/// use u_slotblock::block::BlockSelector;
///
/// let mut selector = BlockSelector::new(vec![
///     vec![0.6, 1.0, 1.0, 0.6],
///     vec![1.0, 1.0, 1.0, 1.0],
///     vec![1.0, 1.0, 1.0, 1.0],
///     vec![1.0, 1.0, 1.0, 1.0],
/// ])
/// .unwrap();
///
/// let result = selector.optimize().unwrap();
/// assert_eq!(result.selected_slots().map(<[usize]>::len), Some(1));
///
/// selector.double_resolution();
/// assert_eq!(selector.block_length(), 2);
/// assert_eq!(selector.num_slots(), 8);
/// ```
#[derive(Debug)]
pub struct BlockSelector<S: IlpSolver = MicroLpSolver> {
    matrix: PreferenceMatrix,
    block_length: usize,
    config: SelectorConfig,
    solver: S,
    model: BlockModel,
}

impl BlockSelector<MicroLpSolver> {
    /// Creates a selector over per-person preference rows with `k = 1`.
    ///
    /// # Errors
    /// [`SelectorError::InvalidMatrix`] for ragged, empty, or non-finite input.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, SelectorError> {
        Self::with_config(rows, SelectorConfig::default())
    }

    /// Creates a selector with a custom configuration.
    pub fn with_config(rows: Vec<Vec<f64>>, config: SelectorConfig) -> Result<Self, SelectorError> {
        let matrix = PreferenceMatrix::new(rows)?;
        Self::with_solver(matrix, config, MicroLpSolver::new())
    }
}

impl<S: IlpSolver> BlockSelector<S> {
    /// Creates a selector backed by a specific solver.
    ///
    /// # Errors
    /// - [`SelectorError::InvalidConfig`] for an unusable configuration.
    /// - [`SelectorError::Solver`] when the solver reports it is unavailable.
    pub fn with_solver(
        matrix: PreferenceMatrix,
        config: SelectorConfig,
        solver: S,
    ) -> Result<Self, SelectorError> {
        config.validate()?;
        solver.ensure_available()?;

        let block_length = 1;
        let model = build_model(&matrix, block_length, &config);
        info!(
            solver = solver.name(),
            people = matrix.num_people(),
            slots = matrix.num_slots(),
            "block selector created"
        );

        Ok(Self {
            matrix,
            block_length,
            config,
            solver,
            model,
        })
    }

    /// Solves the current program.
    ///
    /// Returns [`OptimizationResult::NoSolution`] when the solver stops
    /// without a proven optimum.
    ///
    /// # Errors
    /// [`SelectorError::Solver`] when the solver itself fails.
    pub fn optimize(&self) -> Result<OptimizationResult, SelectorError> {
        let solution = self.solver.solve(self.model.program())?;
        let result = self
            .model
            .decode(&solution, self.config.selection_threshold);

        match &result {
            OptimizationResult::Solved(selection) => info!(
                slots = ?selection.selected_slots,
                score = selection.total_score,
                "optimal block found"
            ),
            OptimizationResult::NoSolution { reason } => warn!(%reason, "no optimal block"),
        }

        Ok(result)
    }

    /// Overwrites one preference value and rebuilds the program.
    ///
    /// Any finite value is accepted, including ones outside `[0, 1]`.
    ///
    /// # Errors
    /// - [`SelectorError::IndexOutOfBounds`] if `row` or `slot` is outside the matrix.
    /// - [`SelectorError::InvalidValue`] if `value` is NaN or infinite.
    pub fn change_entry(&mut self, row: usize, slot: usize, value: f64) -> Result<(), SelectorError> {
        if !value.is_finite() {
            return Err(SelectorError::InvalidValue { row, slot, value });
        }

        let previous = self
            .matrix
            .set(row, slot, value)
            .ok_or(SelectorError::IndexOutOfBounds {
                row,
                slot,
                num_people: self.matrix.num_people(),
                num_slots: self.matrix.num_slots(),
            })?;

        info!(row, slot, previous, value, "preference changed");
        self.rebuild();
        Ok(())
    }

    /// Splits every slot into two identical sub-slots and doubles `k`.
    pub fn double_resolution(&mut self) {
        self.matrix = self.matrix.doubled();
        self.block_length *= 2;
        info!(
            slots = self.matrix.num_slots(),
            block_length = self.block_length,
            "resolution doubled"
        );
        self.rebuild();
    }

    /// Current preference matrix.
    pub fn matrix(&self) -> &PreferenceMatrix {
        &self.matrix
    }

    /// Current block length `k`.
    pub fn block_length(&self) -> usize {
        self.block_length
    }

    /// Number of people.
    pub fn num_people(&self) -> usize {
        self.matrix.num_people()
    }

    /// Number of slots at the current resolution.
    pub fn num_slots(&self) -> usize {
        self.matrix.num_slots()
    }

    /// Objective weights for the current group.
    pub fn weights(&self) -> ObjectiveWeights {
        self.model.weights()
    }

    /// Objective coefficient of every slot.
    pub fn slot_scores(&self) -> &[f64] {
        self.model.slot_scores()
    }

    /// The current program.
    pub fn model(&self) -> &BlockModel {
        &self.model
    }

    /// Active configuration.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    fn rebuild(&mut self) {
        self.model = build_model(&self.matrix, self.block_length, &self.config);
    }
}

// k starts at 1 and only doubles together with the slot count, so
// 1 <= k <= num_slots always holds here.
fn build_model(matrix: &PreferenceMatrix, block_length: usize, config: &SelectorConfig) -> BlockModel {
    let model = BlockModelBuilder::new(matrix, block_length)
        .with_link_mode(config.link_mode)
        .with_name(config.model_name.clone())
        .build();
    debug!(
        block_length,
        variables = model.variable_count(),
        constraints = model.constraint_count(),
        "block model built"
    );
    model
}
