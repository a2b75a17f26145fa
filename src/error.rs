//! Selector errors.

use thiserror::Error;

use crate::ilp::SolverError;
use crate::validation::ValidationError;

/// Errors raised by [`BlockSelector`](crate::block::BlockSelector).
///
/// A solve that ends without an optimum is not an error; see
/// [`OptimizationResult`](crate::models::OptimizationResult).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectorError {
    /// The preference matrix is malformed.
    #[error("invalid preference matrix: {}", join_messages(.0))]
    InvalidMatrix(Vec<ValidationError>),

    /// A cell address lies outside the matrix.
    #[error("cell ({row}, {slot}) is out of bounds for a {num_people}x{num_slots} matrix")]
    IndexOutOfBounds {
        row: usize,
        slot: usize,
        num_people: usize,
        num_slots: usize,
    },

    /// A preference value is NaN or infinite.
    #[error("cell ({row}, {slot}) cannot hold non-finite value {value}")]
    InvalidValue { row: usize, slot: usize, value: f64 },

    /// A configuration value is unusable.
    #[error("invalid selector configuration: {0}")]
    InvalidConfig(String),

    /// The solver cannot be used.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for SelectorError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidMatrix(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PreferenceMatrix;

    #[test]
    fn test_invalid_matrix_message() {
        let errors = PreferenceMatrix::new(vec![vec![1.0, 1.0], vec![1.0]]).unwrap_err();
        let err = SelectorError::from(errors);
        let message = err.to_string();
        assert!(message.starts_with("invalid preference matrix"));
        assert!(message.contains("Row 1"));
    }

    #[test]
    fn test_index_message() {
        let err = SelectorError::IndexOutOfBounds {
            row: 4,
            slot: 0,
            num_people: 4,
            num_slots: 4,
        };
        assert_eq!(err.to_string(), "cell (4, 0) is out of bounds for a 4x4 matrix");
    }

    #[test]
    fn test_solver_error_transparent() {
        let err: SelectorError = SolverError::Unavailable("no license".into()).into();
        assert_eq!(err.to_string(), "solver unavailable: no license");
    }
}
