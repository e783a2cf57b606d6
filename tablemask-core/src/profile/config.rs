//! Profiling configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for profiling configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ProfileConfigError {
    /// Negative or non-finite IQR multiplier
    #[error("iqr_multiplier must be finite and non-negative, got {0}")]
    InvalidIqrMultiplier(f64),
    /// Missing-value threshold outside `[0, 1]`
    #[error("high_missing_threshold must be between 0.0 and 1.0, got {0}")]
    InvalidMissingThreshold(f64),
    /// Cardinality threshold outside `[0, 1]`
    #[error("high_cardinality_threshold must be between 0.0 and 1.0, got {0}")]
    InvalidCardinalityThreshold(f64),
}

/// Data profiling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Non-null values reported per column in `sample_data`
    pub sample_values: usize,
    /// Entries kept in a categorical column's `top_values`
    pub top_values: usize,
    /// Tukey fence multiplier
    pub iqr_multiplier: f64,
    /// Run the anomaly scan as part of profiling
    pub detect_anomalies: bool,
    /// Missing ratio above which a column is reported (0.0-1.0)
    pub high_missing_threshold: f64,
    /// Unique ratio above which a column is reported (0.0-1.0)
    pub high_cardinality_threshold: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            sample_values: 5,
            top_values: 10,
            iqr_multiplier: 1.5,
            detect_anomalies: true,
            high_missing_threshold: 0.5,
            high_cardinality_threshold: 0.9,
        }
    }
}

impl ProfileConfig {
    /// Creates a new profile config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the sample value count.
    pub fn with_sample_values(mut self, count: usize) -> Self {
        self.sample_values = count;
        self
    }

    /// Builder method to set the top value count.
    pub fn with_top_values(mut self, count: usize) -> Self {
        self.top_values = count;
        self
    }

    /// Builder method to set the IQR multiplier.
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        if !multiplier.is_finite() || multiplier < 0.0 {
            tracing::warn!("iqr_multiplier {} replaced with 1.5", multiplier);
            self.iqr_multiplier = 1.5;
        } else {
            self.iqr_multiplier = multiplier;
        }
        self
    }

    /// Builder method to enable/disable the anomaly scan.
    pub fn with_detect_anomalies(mut self, enabled: bool) -> Self {
        self.detect_anomalies = enabled;
        self
    }

    /// Builder method to set the high-missing threshold.
    pub fn with_high_missing_threshold(mut self, threshold: f64) -> Self {
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(
                "high_missing_threshold {} clamped to valid range [0.0, 1.0]",
                threshold
            );
        }
        self.high_missing_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set the high-cardinality threshold.
    pub fn with_high_cardinality_threshold(mut self, threshold: f64) -> Self {
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(
                "high_cardinality_threshold {} clamped to valid range [0.0, 1.0]",
                threshold
            );
        }
        self.high_cardinality_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ProfileConfigError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ProfileConfigError::InvalidIqrMultiplier(self.iqr_multiplier));
        }
        if !(0.0..=1.0).contains(&self.high_missing_threshold) {
            return Err(ProfileConfigError::InvalidMissingThreshold(
                self.high_missing_threshold,
            ));
        }
        if !(0.0..=1.0).contains(&self.high_cardinality_threshold) {
            return Err(ProfileConfigError::InvalidCardinalityThreshold(
                self.high_cardinality_threshold,
            ));
        }
        Ok(())
    }
}
