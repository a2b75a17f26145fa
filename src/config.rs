//! Selector configuration.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SelectorError;

/// How slot variables are tied to the chosen block start.
///
/// With `UpperBound`, `y[j] <= Σ s[i]` only caps a slot at the block's
/// indicator and maximization pulls positive-score slots up to 1. A slot
/// with zero or negative score inside the window may then stay at 0, so
/// the selection can be shorter than the block length. `Exact` uses
/// `y[j] == Σ s[i]` and always selects the whole window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    /// `y[j] <= Σ s[i]` (objective-driven tightening).
    #[default]
    UpperBound,
    /// `y[j] == Σ s[i]`.
    Exact,
}

/// Configuration for a [`BlockSelector`](crate::block::BlockSelector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Slot linking formulation.
    pub link_mode: LinkMode,
    /// A slot is selected when its solved value exceeds this. Must lie in `(0, 1)`.
    #[serde(deserialize_with = "deserialize_threshold")]
    pub selection_threshold: f64,
    /// Name given to every built program.
    pub model_name: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            link_mode: LinkMode::UpperBound,
            selection_threshold: 0.5,
            model_name: "TimeSlotSelection".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the linking formulation.
    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }

    /// Sets the selection threshold.
    ///
    /// Values outside `(0, 1)` are rejected by [`SelectorConfig::validate`]
    /// when a selector is created.
    pub fn with_selection_threshold(mut self, threshold: f64) -> Self {
        self.selection_threshold = threshold;
        self
    }

    /// Sets the program name.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    /// [`SelectorError::InvalidConfig`] when `selection_threshold` is not
    /// a finite value strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), SelectorError> {
        check_threshold(self.selection_threshold).map_err(SelectorError::InvalidConfig)
    }
}

/// A binary value reads as 1 only when the threshold separates 0 from 1.
fn check_threshold(threshold: f64) -> Result<(), String> {
    if threshold.is_finite() && threshold > 0.0 && threshold < 1.0 {
        Ok(())
    } else {
        Err(format!(
            "selection_threshold must lie strictly between 0 and 1, got {threshold}"
        ))
    }
}

fn deserialize_threshold<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let threshold = f64::deserialize(deserializer)?;
    check_threshold(threshold).map_err(serde::de::Error::custom)?;
    Ok(threshold)
}
