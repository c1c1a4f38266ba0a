//! Analysis configuration passed explicitly into every pipeline stage.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BASELINE_LABEL, DEFAULT_STEP_SIZE, GAIN_CURVE_NAME, PERCENT_GRID_END, PERCENT_GRID_START,
    PERCENT_GRID_STEP, RANK_OFFSET, REFERENCE_RANK, STEPPED_CURVE_NAME,
};
use crate::numbers::grid_len;

/// Errors raised when analysis configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    #[error("baseline label {label:?} collides with curve name {curve:?}")]
    NameCollision { label: String, curve: String },
    #[error("percent grid invalid: start {start:.2}, end {end:.2}, step {step:.2}")]
    PercentGrid { start: f64, end: f64, step: f64 },
}

/// Grid of percent-gain points used by the gain curve builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentGrid {
    #[serde(default = "PercentGrid::default_start")]
    pub start: f64,
    #[serde(default = "PercentGrid::default_end")]
    pub end: f64,
    #[serde(default = "PercentGrid::default_step")]
    pub step: f64,
}

impl PercentGrid {
    #[must_use]
    pub const fn default_start() -> f64 {
        PERCENT_GRID_START
    }

    #[must_use]
    pub const fn default_end() -> f64 {
        PERCENT_GRID_END
    }

    #[must_use]
    pub const fn default_step() -> f64 {
        PERCENT_GRID_STEP
    }

    /// Number of points on the grid, both bounds included.
    #[must_use]
    pub fn len(&self) -> u32 {
        grid_len(self.start, self.end, self.step)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Percent value of the `index`-th grid point.
    #[must_use]
    pub fn point(&self, index: u32) -> f64 {
        self.start + f64::from(index) * self.step
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.start.is_finite() && self.end.is_finite() && self.step.is_finite();
        if !finite || self.start <= 0.0 || self.is_empty() {
            return Err(ConfigError::PercentGrid {
                start: self.start,
                end: self.end,
                step: self.step,
            });
        }
        Ok(())
    }
}

impl Default for PercentGrid {
    fn default() -> Self {
        Self {
            start: Self::default_start(),
            end: Self::default_end(),
            step: Self::default_step(),
        }
    }
}

/// Names and constants the curve pipeline runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "AnalysisConfig::default_baseline_label")]
    pub baseline_label: String,
    #[serde(default = "AnalysisConfig::default_stepped_curve")]
    pub stepped_curve: String,
    #[serde(default = "AnalysisConfig::default_gain_curve")]
    pub gain_curve: String,
    #[serde(default = "AnalysisConfig::default_step_size")]
    pub step_size: u32,
    /// Ordinal position (1-based) of the rank used as the cutoff reference.
    #[serde(default = "AnalysisConfig::default_reference_rank")]
    pub reference_rank: u32,
    /// Added to every rank when emitting weight tokens.
    #[serde(default = "AnalysisConfig::default_rank_offset")]
    pub rank_offset: u32,
    #[serde(default)]
    pub percent_grid: PercentGrid,
}

impl AnalysisConfig {
    #[must_use]
    pub fn default_baseline_label() -> String {
        BASELINE_LABEL.to_string()
    }

    #[must_use]
    pub fn default_stepped_curve() -> String {
        STEPPED_CURVE_NAME.to_string()
    }

    #[must_use]
    pub fn default_gain_curve() -> String {
        GAIN_CURVE_NAME.to_string()
    }

    #[must_use]
    pub const fn default_step_size() -> u32 {
        DEFAULT_STEP_SIZE
    }

    #[must_use]
    pub const fn default_reference_rank() -> u32 {
        REFERENCE_RANK
    }

    #[must_use]
    pub const fn default_rank_offset() -> u32 {
        RANK_OFFSET
    }

    /// Default configuration with a different item level step size.
    #[must_use]
    pub fn with_step_size(step_size: u32) -> Self {
        Self {
            step_size,
            ..Self::default()
        }
    }

    /// Validate configuration invariants before any batch is analyzed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_names()?;
        if self.step_size == 0 {
            return Err(ConfigError::MinViolation {
                field: "step_size",
                min: 1,
                value: self.step_size,
            });
        }
        if self.reference_rank == 0 {
            return Err(ConfigError::MinViolation {
                field: "reference_rank",
                min: 1,
                value: self.reference_rank,
            });
        }
        self.percent_grid.validate()
    }

    fn validate_names(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("baseline_label", &self.baseline_label),
            ("stepped_curve", &self.stepped_curve),
            ("gain_curve", &self.gain_curve),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyName { field });
            }
        }
        for curve in [&self.stepped_curve, &self.gain_curve] {
            if *curve == self.baseline_label {
                return Err(ConfigError::NameCollision {
                    label: self.baseline_label.clone(),
                    curve: curve.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            baseline_label: Self::default_baseline_label(),
            stepped_curve: Self::default_stepped_curve(),
            gain_curve: Self::default_gain_curve(),
            step_size: Self::default_step_size(),
            reference_rank: Self::default_reference_rank(),
            rank_offset: Self::default_rank_offset(),
            percent_grid: PercentGrid::default(),
        }
    }
}
