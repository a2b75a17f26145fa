//! Contiguous time-slot block selection for the U-Engine ecosystem.
//!
//! Given a `people × slots` matrix of availability/preference values,
//! chooses `k` consecutive slots for a recurring event, trading off how
//! many people can attend at all against how strongly they prefer the
//! chosen slots. The choice is formulated as a 0/1 integer linear
//! program and solved exactly.
//!
//! # Modules
//!
//! - **`models`**: `PreferenceMatrix`, `BlockSelection`, `OptimizationResult`
//! - **`validation`**: Matrix integrity checks (shape, finiteness, block length)
//! - **`ilp`**: Solver-independent 0/1 programs, the `IlpSolver` trait, and the
//!   bundled `MicroLpSolver`
//! - **`block`**: Model builder, `BlockSelector`, and block KPIs
//! - **`config`**: `SelectorConfig` and `LinkMode`
//!
//! # Example
//!
//! ```
//! use u_slotblock::block::{BlockKpi, BlockSelector};
//!
//! let mut selector = BlockSelector::new(vec![
//!     vec![0.6, 1.0, 1.0, 0.6],
//!     vec![1.0, 1.0, 1.0, 1.0],
//! ])
//! .unwrap();
//!
//! selector.double_resolution();
//! let result = selector.optimize().unwrap();
//!
//! if let Some(selection) = result.selection() {
//!     assert_eq!(selection.len(), 2);
//!     let kpi = BlockKpi::calculate(selector.matrix(), selection);
//!     assert_eq!(kpi.fully_available, 2);
//! }
//! ```

pub mod block;
pub mod config;
pub mod error;
pub mod ilp;
pub mod models;
pub mod validation;

pub use block::BlockSelector;
pub use config::{LinkMode, SelectorConfig};
pub use error::SelectorError;
pub use models::{BlockSelection, OptimizationResult, PreferenceMatrix};
