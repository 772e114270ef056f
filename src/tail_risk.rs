//! Historical (empirical) Value-at-Risk and Expected Shortfall.
//!
//! Both are stated as signed log returns, so a loss shows up as a negative
//! number. Quantiles use linear interpolation between order statistics.

use crate::errors::{
    validate_all_finite, validate_data_length, validate_probability, RiskAnalysisError, RiskResult,
};
use crate::math_utils::{float_total_cmp, percentile};
use statrs::statistics::Statistics;

/// α-quantile of the return distribution; α = 0.025 gives the 97.5% VaR.
pub fn historical_var(returns: &[f64], alpha: f64) -> RiskResult<f64> {
    validate_probability(alpha, "alpha")?;
    validate_data_length(returns, 1, "historical VaR")?;
    validate_all_finite(returns, "returns")?;

    let mut sorted = returns.to_vec();
    sorted.sort_by(float_total_cmp);
    Ok(percentile(&sorted, alpha))
}

/// Mean of all returns at or below the α-VaR.
///
/// # Errors
/// `EmptyTail` when no return lies at or below the interpolated quantile.
/// That only happens through rounding when the lowest order statistics tie;
/// an empty mean is reported rather than replaced by zero.
pub fn expected_shortfall(returns: &[f64], alpha: f64) -> RiskResult<f64> {
    let var = historical_var(returns, alpha)?;
    let tail: Vec<f64> = returns.iter().copied().filter(|&r| r <= var).collect();
    if tail.is_empty() {
        return Err(RiskAnalysisError::EmptyTail { alpha, var });
    }
    Ok(tail.iter().mean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn log_returns_of(prices: &[f64]) -> Vec<f64> {
        prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
    }

    #[test]
    fn test_historical_var_interpolates_between_order_statistics() {
        let returns = log_returns_of(&[100.0, 110.0, 90.0, 120.0]);
        let mut sorted = returns.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        // rank = 0.025 · 2 = 0.05
        let expected = sorted[0] * 0.95 + sorted[1] * 0.05;
        assert_approx_eq!(historical_var(&returns, 0.025).unwrap(), expected, 1e-15);
    }

    #[test]
    fn test_expected_shortfall_is_mean_of_tail() {
        let returns = log_returns_of(&[100.0, 110.0, 90.0, 120.0]);
        let var = historical_var(&returns, 0.025).unwrap();
        let tail: Vec<f64> = returns.iter().copied().filter(|&r| r <= var).collect();
        let expected = tail.iter().sum::<f64>() / tail.len() as f64;

        let es = expected_shortfall(&returns, 0.025).unwrap();
        assert_approx_eq!(es, expected, 1e-15);
        assert!(es <= var);
    }

    #[test]
    fn test_expected_shortfall_wider_tail() {
        let returns: Vec<f64> = (1..=100).map(|i| i as f64 / 100.0 - 0.5).collect();
        let var = historical_var(&returns, 0.1).unwrap();
        // rank 9.9 between -0.40 and -0.39
        assert_approx_eq!(var, -0.391, 1e-12);
        let es = expected_shortfall(&returns, 0.1).unwrap();
        // returns -0.49 ..= -0.40
        assert_approx_eq!(es, -0.445, 1e-12);
    }

    #[test]
    fn test_tied_minimum_returns_keep_tail_non_empty() {
        let returns = [0.1, -0.3, 0.2, -0.3];
        assert_eq!(historical_var(&returns, 0.025).unwrap(), -0.3);
        assert_eq!(expected_shortfall(&returns, 0.025).unwrap(), -0.3);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        assert!(historical_var(&[0.1, -0.1], 0.0).is_err());
        assert!(historical_var(&[0.1, -0.1], 1.5).is_err());
    }

    #[test]
    fn test_empty_returns_rejected() {
        assert!(matches!(
            historical_var(&[], 0.05),
            Err(RiskAnalysisError::InsufficientData { .. })
        ));
    }
}
