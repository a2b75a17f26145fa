//! Preference matrix model.
//!
//! A preference matrix holds one row per person and one column per
//! time slot. Each cell is that person's availability/preference for
//! the slot: `0` means "cannot attend", larger values mean stronger
//! preference. Values are typically in `[0, 1]` but the range is not
//! enforced.

use serde::{Deserialize, Serialize};

use crate::validation::{validate_matrix, ValidationError};

/// A `num_people × num_slots` matrix of preference values.
///
/// Always rectangular with at least one person and one slot.
/// Construct through [`PreferenceMatrix::new`], which validates the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PreferenceMatrix {
    rows: Vec<Vec<f64>>,
}

impl PreferenceMatrix {
    /// Creates a matrix from per-person rows.
    ///
    /// # Errors
    /// Returns every structural problem found: no people, no slots,
    /// ragged rows, or non-finite values.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, Vec<ValidationError>> {
        validate_matrix(&rows, 1)?;
        Ok(Self { rows })
    }

    /// Number of people (rows).
    #[inline]
    pub fn num_people(&self) -> usize {
        self.rows.len()
    }

    /// Number of time slots (columns).
    #[inline]
    pub fn num_slots(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Value at `(person, slot)`, or `None` when out of bounds.
    pub fn get(&self, person: usize, slot: usize) -> Option<f64> {
        self.rows.get(person).and_then(|row| row.get(slot)).copied()
    }

    /// One person's preferences across all slots.
    pub fn row(&self, person: usize) -> Option<&[f64]> {
        self.rows.get(person).map(Vec::as_slice)
    }

    /// All people's preferences for one slot.
    pub fn column(&self, slot: usize) -> Option<Vec<f64>> {
        if slot >= self.num_slots() {
            return None;
        }
        Some(self.rows.iter().map(|row| row[slot]).collect())
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Overwrites a single cell.
    ///
    /// Returns the previous value, or `None` (leaving the matrix untouched)
    /// when `person` or `slot` is out of bounds.
    pub fn set(&mut self, person: usize, slot: usize, value: f64) -> Option<f64> {
        let cell = self.rows.get_mut(person)?.get_mut(slot)?;
        Some(std::mem::replace(cell, value))
    }

    /// Returns a matrix with every column duplicated in place.
    ///
    /// Column `j` becomes columns `2j` and `2j + 1`, both carrying the
    /// original value. This models splitting each slot into two
    /// finer sub-slots with unchanged preference.
    pub fn doubled(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().flat_map(|&v| [v, v]).collect())
            .collect();
        Self { rows }
    }
}

impl TryFrom<Vec<Vec<f64>>> for PreferenceMatrix {
    type Error = String;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows).map_err(|errors| {
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        })
    }
}

impl From<PreferenceMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PreferenceMatrix) -> Self {
        matrix.rows
    }
}
