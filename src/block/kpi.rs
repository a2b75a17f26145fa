//! Block quality metrics (KPIs).
//!
//! Summarizes how well a selected block serves the group.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fully available | People with a positive value in every selected slot |
//! | Partially available | People with a positive value in at least one selected slot |
//! | Coverage rate | Fully available / people |
//! | Mean preference | Mean of all selected cells |
//! | Min preference | Smallest selected cell |

use crate::models::{BlockSelection, PreferenceMatrix};

/// Block performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockKpi {
    /// People able to attend the whole block.
    pub fully_available: usize,
    /// People able to attend part of the block.
    pub partially_available: usize,
    /// Fraction of people able to attend the whole block (0.0..1.0).
    pub coverage_rate: f64,
    /// Mean preference over selected cells.
    pub mean_preference: f64,
    /// Lowest preference over selected cells.
    pub min_preference: f64,
}

impl BlockKpi {
    /// Computes KPIs for a selection against the matrix it was solved on.
    ///
    /// Slots outside the matrix are ignored. An empty selection yields
    /// all-zero metrics.
    pub fn calculate(matrix: &PreferenceMatrix, selection: &BlockSelection) -> Self {
        let slots: Vec<usize> = selection
            .selected_slots
            .iter()
            .copied()
            .filter(|&j| j < matrix.num_slots())
            .collect();

        if slots.is_empty() {
            return Self {
                fully_available: 0,
                partially_available: 0,
                coverage_rate: 0.0,
                mean_preference: 0.0,
                min_preference: 0.0,
            };
        }

        let mut fully = 0;
        let mut partially = 0;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;

        for row in matrix.rows() {
            let available = slots.iter().filter(|&&j| row[j] > 0.0).count();
            if available == slots.len() {
                fully += 1;
            }
            if available > 0 {
                partially += 1;
            }
            for &j in &slots {
                sum += row[j];
                min = min.min(row[j]);
            }
        }

        let cells = (matrix.num_people() * slots.len()) as f64;

        Self {
            fully_available: fully,
            partially_available: partially,
            coverage_rate: fully as f64 / matrix.num_people() as f64,
            mean_preference: sum / cells,
            min_preference: min,
        }
    }

    /// Whether at least `min_coverage_rate` of the group can attend the whole block.
    pub fn meets_threshold(&self, min_coverage_rate: f64) -> bool {
        self.coverage_rate >= min_coverage_rate
    }
}
