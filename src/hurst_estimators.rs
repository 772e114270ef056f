//! Rescaled-range (R/S) estimation of the Hurst exponent.
//!
//! For every window length t in the sweep, all contiguous blocks of length t
//! are formed. Each block contributes R/S, where R is the range of its
//! mean-centred cumulative sum and S its sample standard deviation
//! (Bessel-corrected). Blocks with zero or non-finite S are discarded and the
//! remaining ratios are averaged. H is the slope of ln(R/S) against ln(t).
//!
//! - H ≈ 0.5: no memory
//! - H > 0.5: persistent
//! - H < 0.5: mean-reverting

use crate::config::HurstConfig;
use crate::errors::{validate_all_finite, validate_data_length, RiskAnalysisError, RiskResult};
use crate::math_utils::ols_regression;
use statrs::statistics::Statistics;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of an R/S sweep
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RescaledRangeEstimate {
    /// Slope of ln(R/S) on ln(t)
    pub hurst: f64,
    /// Intercept of the same fit
    pub intercept: f64,
    /// Window lengths with at least one valid block
    pub window_sizes: Vec<usize>,
    /// Average R/S for each entry of `window_sizes`
    pub rs_values: Vec<f64>,
}

/// Estimate H with the default sweep (8 ..= n/2, step 1)
pub fn hurst_rs(data: &[f64]) -> RiskResult<f64> {
    estimate_hurst_rescaled_range(data, &HurstConfig::default()).map(|e| e.hurst)
}

/// Estimate H by rescaled-range analysis.
///
/// # Errors
/// - `InsufficientData` if the series is shorter than `2 · min_window`
/// - `NumericalError` if fewer than two window lengths produce a finite
///   average R/S
pub fn estimate_hurst_rescaled_range(
    data: &[f64],
    config: &HurstConfig,
) -> RiskResult<RescaledRangeEstimate> {
    config.validate()?;
    validate_all_finite(data, "R/S input")?;
    let n = data.len();
    validate_data_length(data, 2 * config.min_window, "R/S analysis")?;

    let max_window = config.max_window.unwrap_or(n / 2).min(n);
    let windows: Vec<usize> = (config.min_window..=max_window)
        .step_by(config.step)
        .collect();

    #[cfg(feature = "parallel")]
    let averages: Vec<(usize, f64)> = {
        use rayon::prelude::*;
        windows
            .par_iter()
            .filter_map(|&t| mean_rescaled_range(data, t).map(|rs| (t, rs)))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let averages: Vec<(usize, f64)> = windows
        .iter()
        .filter_map(|&t| mean_rescaled_range(data, t).map(|rs| (t, rs)))
        .collect();

    log::debug!(
        "R/S sweep: {} of {} window lengths usable",
        averages.len(),
        windows.len()
    );

    if averages.len() < 2 {
        return Err(RiskAnalysisError::NumericalError {
            reason: format!(
                "Not enough windows with finite (R/S) values: {} usable",
                averages.len()
            ),
            operation: Some("R/S analysis".to_string()),
        });
    }

    let (window_sizes, rs_values): (Vec<usize>, Vec<f64>) = averages.into_iter().unzip();
    let log_t: Vec<f64> = window_sizes.iter().map(|&t| (t as f64).ln()).collect();
    let log_rs: Vec<f64> = rs_values.iter().map(|rs| rs.ln()).collect();
    let fit = ols_regression(&log_t, &log_rs)?;

    Ok(RescaledRangeEstimate {
        hurst: fit.slope,
        intercept: fit.intercept,
        window_sizes,
        rs_values,
    })
}

/// Average R/S over every contiguous block of length `window`.
///
/// `None` when no block has a positive, finite standard deviation.
fn mean_rescaled_range(data: &[f64], window: usize) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for block in data.windows(window) {
        let mean = block.iter().mean();
        let std_dev = block.iter().std_dev();
        if !std_dev.is_finite() || std_dev <= 0.0 {
            continue;
        }

        let (mut cumsum, mut max_dev, mut min_dev) = (0.0, f64::NEG_INFINITY, f64::INFINITY);
        for &value in block {
            cumsum += value - mean;
            max_dev = max_dev.max(cumsum);
            min_dev = min_dev.min(cumsum);
        }

        let rs = (max_dev - min_dev) / std_dev;
        if rs.is_finite() {
            sum += rs;
            count += 1;
        }
    }

    (count > 0).then(|| sum / count as f64)
}
