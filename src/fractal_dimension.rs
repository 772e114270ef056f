//! Katz fractal dimension of a return path.
//!
//! The series is read as a planar curve sampled at unit steps. With path
//! length L = Σ|xᵢ₊₁ − xᵢ| and diameter d = max|xᵢ − x₀|,
//!
//! D = log₁₀(n) / (log₁₀(d/L) + log₁₀(n))
//!
//! A flat curve has d = 0 and is assigned D = 1 exactly.

use crate::errors::{validate_all_finite, validate_data_length, RiskResult};

/// Katz dimension of `series` (normally log returns).
///
/// # Example
/// ```rust
/// use fractal_risk::fractal_dimension::katz_fractal_dimension;
///
/// assert_eq!(katz_fractal_dimension(&[0.0, 0.0, 0.0]).unwrap(), 1.0);
/// ```
pub fn katz_fractal_dimension(series: &[f64]) -> RiskResult<f64> {
    validate_data_length(series, 1, "Katz fractal dimension")?;
    validate_all_finite(series, "Katz input")?;

    let first = series[0];
    let diameter = series
        .iter()
        .map(|x| (x - first).abs())
        .fold(0.0, f64::max);
    if diameter == 0.0 {
        return Ok(1.0);
    }

    // d ≤ L, so L is positive here.
    let length: f64 = series.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    let log_n = (series.len() as f64).log10();
    Ok(log_n / ((diameter / length).log10() + log_n))
}
