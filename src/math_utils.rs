//! Mathematical utility functions shared by the estimators.
//!
//! Order statistics, least-squares line fitting, series integration, local
//! linear detrending and finite-difference gradients.

use crate::errors::{RiskAnalysisError, RiskResult};

/// Numerical tolerances
pub mod constants {
    /// Default epsilon for approximate comparisons
    pub const DEFAULT_EPSILON: f64 = 1e-12;
    /// Smallest predictor spread accepted by the line fit
    pub const MIN_PREDICTOR_SPREAD: f64 = 1e-14;
}

/// Safe comparison for floating point values (NaN sorts last)
pub fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.total_cmp(b),
    }
}

/// Percentile of already-sorted data using linear interpolation.
///
/// The fractional rank is `p·(n−1)`; values between two order statistics are
/// interpolated linearly. This is the "linear" (type 7) definition.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return f64::NAN;
    }

    if p <= 0.0 {
        return sorted_data[0];
    }

    if p >= 1.0 {
        return sorted_data[sorted_data.len() - 1];
    }

    let n = sorted_data.len();
    let index = p * (n - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        // Exact on ties and never below the lower order statistic.
        let weight = index - lower as f64;
        sorted_data[lower] + weight * (sorted_data[upper] - sorted_data[lower])
    }
}

/// Linear-interpolated quantile of unsorted data.
pub fn quantile(data: &[f64], p: f64) -> RiskResult<f64> {
    if data.is_empty() {
        return Err(RiskAnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(float_total_cmp);
    Ok(percentile(&sorted, p))
}

/// Safe floating point helpers
pub mod float_ops {
    use super::constants::DEFAULT_EPSILON;

    /// Check if a floating point number is approximately zero
    #[inline]
    pub fn approx_zero(x: f64) -> bool {
        x.abs() < DEFAULT_EPSILON
    }

    /// Logarithm of a strictly positive finite value
    pub fn safe_ln(x: f64) -> Option<f64> {
        if x > 0.0 && x.is_finite() {
            Some(x.ln())
        } else {
            None
        }
    }
}

/// Ordinary least-squares fit of `y = intercept + slope·x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    /// Estimated slope
    pub slope: f64,
    /// Estimated intercept
    pub intercept: f64,
    /// Residuals `y − ŷ`, in input order
    pub residuals: Vec<f64>,
}

/// Ordinary least squares on centred data.
///
/// Two points are enough: log-log scaling fits are routinely done on very
/// short ladders. Fails when lengths differ, inputs are non-finite, or the
/// predictor has no spread.
///
/// # Example
/// ```rust
/// use fractal_risk::math_utils::ols_regression;
///
/// let fit = ols_regression(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// ```
pub fn ols_regression(x: &[f64], y: &[f64]) -> RiskResult<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return Err(RiskAnalysisError::InsufficientData {
            required: 2,
            actual: x.len().min(y.len()),
        });
    }

    if !x.iter().chain(y).all(|v| v.is_finite()) {
        return Err(RiskAnalysisError::NumericalError {
            reason: "Non-finite values in regression data".to_string(),
            operation: Some("ols_regression".to_string()),
        });
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (sxy, sxx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
            let dx = xi - mean_x;
            (sxy + dx * (yi - mean_y), sxx + dx * dx)
        });

    if sxx < constants::MIN_PREDICTOR_SPREAD {
        return Err(RiskAnalysisError::NumericalError {
            reason: "Predictor variable has zero variance (constant values)".to_string(),
            operation: Some("ols_regression".to_string()),
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let residuals = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| yi - (intercept + slope * xi))
        .collect();

    Ok(LinearFit {
        slope,
        intercept,
        residuals,
    })
}

/// Cumulative sum of mean-removed values (the DFA profile)
pub fn integrate_series(data: &[f64]) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    data.iter()
        .scan(0.0, |cumsum, &value| {
            *cumsum += value - mean;
            Some(*cumsum)
        })
        .collect()
}

/// Mean squared residual of a segment after removing its least-squares line.
///
/// Uses the closed forms for Σx and Σx² over `x = 0..n`.
pub fn linear_detrended_variance(segment: &[f64]) -> RiskResult<f64> {
    let n = segment.len();
    if n < 2 {
        return Err(RiskAnalysisError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    let n_f64 = n as f64;
    let sum_x = (n - 1) as f64 * n_f64 / 2.0;
    let sum_x_sq = (n - 1) as f64 * n_f64 * (2 * n - 1) as f64 / 6.0;
    let sum_y: f64 = segment.iter().sum();
    let sum_xy: f64 = segment.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();

    let denom = n_f64 * sum_x_sq - sum_x * sum_x;
    let slope = (n_f64 * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f64;

    let sum_sq: f64 = segment
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let r = y - (intercept + slope * i as f64);
            r * r
        })
        .sum();

    Ok(sum_sq / n_f64)
}

/// Gradient of `y` with respect to `x`.
///
/// Interior points use second-order central differences that stay exact for
/// quadratics on uneven spacing; the end points use one-sided first
/// differences. `x` must be strictly increasing.
pub fn gradient(y: &[f64], x: &[f64]) -> RiskResult<Vec<f64>> {
    let n = y.len();
    if n != x.len() || n < 2 {
        return Err(RiskAnalysisError::InsufficientData {
            required: 2,
            actual: n.min(x.len()),
        });
    }
    if x.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(RiskAnalysisError::NumericalError {
            reason: "gradient abscissae must be strictly increasing".to_string(),
            operation: Some("gradient".to_string()),
        });
    }

    let mut grad = Vec::with_capacity(n);
    grad.push((y[1] - y[0]) / (x[1] - x[0]));
    for i in 1..n - 1 {
        let hl = x[i] - x[i - 1];
        let hr = x[i + 1] - x[i];
        let value = (hl * hl * y[i + 1] - hr * hr * y[i - 1] + (hr * hr - hl * hl) * y[i])
            / (hl * hr * (hl + hr));
        grad.push(value);
    }
    grad.push((y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]));
    Ok(grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_percentile_linear_interpolation() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert_approx_eq!(percentile(&sorted, 0.5), 2.5, 1e-12);
        assert_approx_eq!(percentile(&sorted, 0.25), 1.75, 1e-12);
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 4.0);
        assert!(percentile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_percentile_exact_on_tied_order_statistics() {
        let sorted = vec![-0.3, -0.3, 0.1, 0.2];
        assert_eq!(percentile(&sorted, 0.025), -0.3);
        assert!(percentile(&sorted, 0.4) >= -0.3);
    }

    #[test]
    fn test_quantile_sorts_input() {
        let data = vec![4.0, 1.0, 3.0, 2.0];
        assert_approx_eq!(quantile(&data, 1.0 / 3.0).unwrap(), 2.0, 1e-12);
        assert!(quantile(&[], 0.5).is_err());
    }

    #[test]
    fn test_ols_regression_perfect_fit() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![3.0, 5.0, 7.0, 9.0, 11.0];
        let fit = ols_regression(&x, &y).unwrap();
        assert_approx_eq!(fit.slope, 2.0, 1e-10);
        assert_approx_eq!(fit.intercept, 1.0, 1e-10);
        for residual in fit.residuals {
            assert_approx_eq!(residual, 0.0, 1e-10);
        }
    }

    #[test]
    fn test_ols_regression_two_points() {
        let fit = ols_regression(&[0.0, 2.0], &[1.0, 0.0]).unwrap();
        assert_approx_eq!(fit.slope, -0.5, 1e-12);
    }

    #[test]
    fn test_ols_regression_constant_x_error() {
        let result = ols_regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(RiskAnalysisError::NumericalError { .. })));
    }

    #[test]
    fn test_integrate_series_removes_mean() {
        let profile = integrate_series(&[1.0, 2.0, 3.0]);
        assert_eq!(profile, vec![-1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_linear_detrended_variance() {
        // A straight line leaves nothing behind.
        let line: Vec<f64> = (0..10).map(|i| 3.0 - 0.5 * i as f64).collect();
        assert_approx_eq!(linear_detrended_variance(&line).unwrap(), 0.0, 1e-20);

        // Alternating ±1 around a flat line: slope is tiny, variance near 1.
        let zigzag = vec![1.0, -1.0, 1.0, -1.0];
        let fit = ols_regression(&[0.0, 1.0, 2.0, 3.0], &zigzag).unwrap();
        let expected = fit.residuals.iter().map(|r| r * r).sum::<f64>() / 4.0;
        assert_approx_eq!(linear_detrended_variance(&zigzag).unwrap(), expected, 1e-12);
    }

    #[test]
    fn test_gradient_matches_quadratic() {
        // y = x² on uneven spacing: interior derivative is exact.
        let x = vec![-5.0, -3.0, -1.0, 0.0, 1.0, 3.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let g = gradient(&y, &x).unwrap();
        for i in 1..x.len() - 1 {
            assert_approx_eq!(g[i], 2.0 * x[i], 1e-12);
        }
        assert_approx_eq!(g[0], -8.0, 1e-12);
        assert_approx_eq!(g[6], 8.0, 1e-12);
    }

    #[test]
    fn test_gradient_rejects_unsorted_abscissae() {
        assert!(gradient(&[1.0, 2.0], &[1.0, 1.0]).is_err());
    }
}
