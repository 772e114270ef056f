//! Error types and validation functions for risk and fractal diagnostics.
//!
//! Hard precondition violations (non-positive prices, too few observations for
//! the requested window, malformed configuration) are raised as
//! [`RiskAnalysisError`]. Mathematically defined but degenerate outcomes are
//! not errors; they travel as [`crate::results::MetricValue::Undefined`].

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error types for risk and fractal analysis operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum RiskAnalysisError {
    /// Insufficient data for the requested analysis method.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Invalid parameter value for analysis configuration.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Mathematically degenerate input, e.g. non-positive prices.
    #[error("Degenerate input: {reason}")]
    DegenerateInput {
        /// Why the input cannot be processed
        reason: String,
    },

    /// Numerical computation failed.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },

    /// No observation fell at or below the VaR quantile.
    #[error("Empty tail: no returns at or below VaR {var} for alpha = {alpha}")]
    EmptyTail {
        /// Tail probability
        alpha: f64,
        /// Quantile the tail was cut at
        var: f64,
    },

    /// Price observations are not strictly increasing in time.
    #[error("Timestamps must be strictly increasing: violation at index {index}")]
    UnorderedTimestamps {
        /// Index of the first offending observation
        index: usize,
    },
}

/// Result type for risk analysis operations.
pub type RiskResult<T> = Result<T, RiskAnalysisError>;

/// Validates that data has sufficient length for analysis.
///
/// # Example
/// ```rust
/// use fractal_risk::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2, "test").is_ok());
/// assert!(validate_data_length(&data, 5, "test").is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize, operation: &str) -> RiskResult<()> {
    if data.len() < min_required {
        log::debug!(
            "{}: {} points supplied, {} required",
            operation,
            data.len(),
            min_required
        );
        Err(RiskAnalysisError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter lies within the closed range `[min, max]`.
///
/// # Example
/// ```rust
/// use fractal_risk::errors::validate_parameter;
///
/// assert!(validate_parameter(0.5, 0.0, 1.0, "alpha").is_ok());
/// assert!(validate_parameter(1.5, 0.0, 1.0, "alpha").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> RiskResult<()> {
    if value.is_nan() {
        return Err(RiskAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if value < min || value > max {
        Err(RiskAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that a probability lies in the open interval `(0, 1)`.
pub fn validate_probability(value: f64, name: &str) -> RiskResult<()> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        return Err(RiskAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "(0, 1)".to_string(),
        });
    }
    Ok(())
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value.
pub fn validate_all_finite(data: &[f64], name: &str) -> RiskResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(RiskAnalysisError::DegenerateInput {
            reason: format!("{} contains non-finite value at index {}: {}", name, i, value),
        });
    }
    Ok(())
}

/// Validates that every value is strictly positive.
///
/// Price levels must pass this check; a failure usually means the caller
/// handed over returns or already-normalised data.
pub fn validate_positive(data: &[f64], name: &str) -> RiskResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, v)| !(**v > 0.0)) {
        return Err(RiskAnalysisError::DegenerateInput {
            reason: format!(
                "{} must be strictly positive price levels; found {} at index {}",
                name, value, i
            ),
        });
    }
    Ok(())
}
