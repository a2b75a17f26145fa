//! Input validation for block selection problems.
//!
//! Checks structural integrity of a preference matrix and block length
//! before a model is built. Detects:
//! - Empty matrices (no people or no slots)
//! - Ragged rows
//! - Non-finite preference values (NaN, ±∞)
//! - Block lengths of zero or longer than the slot count
//!
//! Range of finite values is deliberately not checked: any real
//! preference is accepted.

use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The matrix has no rows.
    NoPeople,
    /// The first row has no columns.
    NoSlots,
    /// A row's length differs from the first row's.
    RaggedRow,
    /// A cell holds NaN or an infinity.
    NonFiniteValue,
    /// Block length is zero.
    ZeroBlockLength,
    /// Block length exceeds the number of slots.
    BlockTooLong,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a preference matrix together with the block length it will be used with.
///
/// Checks:
/// 1. At least one person
/// 2. At least one slot
/// 3. All rows have the same length
/// 4. All values are finite
/// 5. `1 <= block_length <= num_slots`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_matrix(rows: &[Vec<f64>], block_length: usize) -> ValidationResult {
    let mut errors = Vec::new();

    let Some(first) = rows.first() else {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoPeople,
            "Preference matrix has no rows",
        ));
        return Err(errors);
    };

    let num_slots = first.len();
    if num_slots == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoSlots,
            "Preference matrix has no slots",
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        if row.len() != num_slots {
            errors.push(ValidationError::new(
                ValidationErrorKind::RaggedRow,
                format!("Row {i} has {} slots, expected {num_slots}", row.len()),
            ));
        }

        for (j, value) in row.iter().enumerate() {
            if !value.is_finite() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonFiniteValue,
                    format!("Row {i}, slot {j} holds non-finite value {value}"),
                ));
            }
        }
    }

    if block_length == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroBlockLength,
            "Block length must be at least 1",
        ));
    } else if num_slots > 0 && block_length > num_slots {
        errors.push(ValidationError::new(
            ValidationErrorKind::BlockTooLong,
            format!("Block length {block_length} exceeds {num_slots} slots"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_kind(result: ValidationResult, kind: ValidationErrorKind) -> bool {
        result.unwrap_err().iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_matrix() {
        let rows = vec![vec![0.6, 1.0, 1.0, 0.6], vec![1.0; 4]];
        assert!(validate_matrix(&rows, 1).is_ok());
        assert!(validate_matrix(&rows, 4).is_ok());
    }

    #[test]
    fn test_no_people() {
        assert!(has_kind(validate_matrix(&[], 1), ValidationErrorKind::NoPeople));
    }

    #[test]
    fn test_no_slots() {
        let rows = vec![vec![], vec![]];
        assert!(has_kind(validate_matrix(&rows, 1), ValidationErrorKind::NoSlots));
    }

    #[test]
    fn test_ragged_row() {
        let rows = vec![vec![1.0, 1.0], vec![1.0], vec![1.0, 1.0, 1.0]];
        let errors = validate_matrix(&rows, 1).unwrap_err();
        let ragged = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::RaggedRow)
            .count();
        assert_eq!(ragged, 2);
        assert!(errors[0].message.contains("Row 1"));
    }

    #[test]
    fn test_non_finite_value() {
        let rows = vec![vec![1.0, f64::NAN], vec![f64::INFINITY, 0.0]];
        let errors = validate_matrix(&rows, 1).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::NonFiniteValue));
    }

    #[test]
    fn test_out_of_range_values_accepted() {
        let rows = vec![vec![-3.0, 42.0]];
        assert!(validate_matrix(&rows, 2).is_ok());
    }

    #[test]
    fn test_zero_block_length() {
        let rows = vec![vec![1.0]];
        assert!(has_kind(
            validate_matrix(&rows, 0),
            ValidationErrorKind::ZeroBlockLength
        ));
    }

    #[test]
    fn test_block_too_long() {
        let rows = vec![vec![1.0, 1.0]];
        assert!(has_kind(
            validate_matrix(&rows, 3),
            ValidationErrorKind::BlockTooLong
        ));
    }

    #[test]
    fn test_multiple_errors() {
        let rows = vec![vec![1.0, f64::NAN], vec![1.0]];
        let errors = validate_matrix(&rows, 5).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
