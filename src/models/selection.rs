//! Optimization result model.
//!
//! A result is produced fresh by every solve and is not retained by
//! the selector.

use serde::{Deserialize, Serialize};

/// The block chosen by an optimal solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSelection {
    /// Slot indices with `y[j] = 1`, ascending.
    pub selected_slots: Vec<usize>,
    /// First slot of the chosen block (the start with `s[i] = 1`).
    pub start_slot: usize,
    /// Objective value of the optimal solution.
    pub total_score: f64,
}

impl BlockSelection {
    /// Number of selected slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.selected_slots.len()
    }

    /// Whether no slot was selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selected_slots.is_empty()
    }

    /// Whether the selected slots form one gap-free run.
    pub fn is_contiguous(&self) -> bool {
        self.selected_slots.windows(2).all(|w| w[1] == w[0] + 1)
    }

    /// Whether `slot` is part of the selection.
    pub fn contains(&self, slot: usize) -> bool {
        self.selected_slots.binary_search(&slot).is_ok()
    }
}

/// Outcome of a single `optimize` call.
///
/// Non-optimal termination is a normal outcome, not an error; callers
/// branch on [`OptimizationResult::is_solved`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OptimizationResult {
    /// The solver proved optimality.
    Solved(BlockSelection),
    /// The solver stopped without a proven optimum (infeasible, unbounded, failed).
    NoSolution {
        /// Why no solution is available.
        reason: String,
    },
}

impl OptimizationResult {
    /// Message carried by every no-solution result.
    pub const NO_SOLUTION: &'static str = "No optimal solution found.";

    pub(crate) fn no_solution(detail: impl AsRef<str>) -> Self {
        Self::NoSolution {
            reason: format!("{} ({})", Self::NO_SOLUTION, detail.as_ref()),
        }
    }

    /// Whether an optimal block was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    /// The chosen block, if any.
    pub fn selection(&self) -> Option<&BlockSelection> {
        match self {
            Self::Solved(selection) => Some(selection),
            Self::NoSolution { .. } => None,
        }
    }

    /// Selected slot indices, if solved.
    pub fn selected_slots(&self) -> Option<&[usize]> {
        self.selection().map(|s| s.selected_slots.as_slice())
    }

    /// Optimal objective value, if solved.
    pub fn total_score(&self) -> Option<f64> {
        self.selection().map(|s| s.total_score)
    }
}
