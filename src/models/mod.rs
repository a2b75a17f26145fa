//! Block selection domain models.
//!
//! Provides the data types for a block selection problem (the
//! preference matrix) and its outcome (the selected block).
//!
//! # Domain Mappings
//!
//! | u-slotblock | Meetings | Classes | On-call |
//! |-------------|----------|---------|---------|
//! | Person (row) | Attendee | Student | Engineer |
//! | Slot (column) | Half-hour | Period | Shift |
//! | Block | Meeting | Lecture | Rotation |

mod matrix;
mod selection;

pub use matrix::PreferenceMatrix;
pub use selection::{BlockSelection, OptimizationResult};
