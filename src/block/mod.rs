//! Contiguous block selection.
//!
//! Formulates "pick `k` consecutive slots" as a 0/1 integer program,
//! solves it, and keeps the program in sync with the preference matrix.
//!
//! # Components
//!
//! - [`BlockModelBuilder`]: pure `(matrix, k) → program` derivation
//! - [`BlockSelector`]: matrix store, mutators, rebuild-on-change, solve
//! - [`BlockKpi`]: attendance and preference metrics of a chosen block
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1
//! - Wolsey (2020), "Integer Programming", Ch. 1.3 (formulations)

mod builder;
mod kpi;
mod selector;

pub use builder::{slot_scores, BlockModel, BlockModelBuilder, ObjectiveWeights};
pub use kpi::BlockKpi;
pub use selector::BlockSelector;
