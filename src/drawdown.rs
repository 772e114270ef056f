//! Maximum peak-to-trough decline of a price path.

use crate::errors::{validate_data_length, validate_positive, RiskResult};

/// Largest `1 − price / running_max` over the series, in `[0, 1)`.
///
/// # Errors
/// `DegenerateInput` if any price is zero, negative or NaN. Returns and
/// normalised series trip this check.
pub fn maximum_drawdown(prices: &[f64]) -> RiskResult<f64> {
    validate_data_length(prices, 1, "maximum drawdown")?;
    validate_positive(prices, "drawdown prices")?;

    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;
    for &price in prices {
        peak = peak.max(price);
        max_drawdown = max_drawdown.max(1.0 - price / peak);
    }
    Ok(max_drawdown)
}
