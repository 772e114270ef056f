//! Multifractal Detrended Fluctuation Analysis (MF-DFA).
//!
//! The log returns are integrated into a profile, which is cut into
//! non-overlapping segments at each scale of a geometric ladder. Every
//! segment is linearly detrended and its residual variance F² feeds the
//! q-th order fluctuation function F_q(s). The scaling slope of F_q(s)
//! gives the generalized Hurst exponent H(q), from which the mass exponents
//! τ(q) = q·H(q) − 1 and the singularity exponents α(q) = dτ/dq follow.
//! The width max α − min α measures how multifractal the series is.

use crate::config::MfdfaConfig;
use crate::errors::{validate_all_finite, RiskResult};
use crate::math_utils::{float_ops, float_total_cmp, gradient, integrate_series};
use crate::math_utils::{linear_detrended_variance, ols_regression};
use crate::results::MetricValue;
use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full MF-DFA output for one series
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultifractalSpectrum {
    /// Scales that produced at least two segments, in ladder order
    pub scales: Vec<usize>,
    /// Generalized Hurst exponents (q, H(q)) for every q with a defined slope
    pub generalized_hurst_exponents: Vec<(f64, f64)>,
    /// Mass exponents (q, τ(q)), sorted by q
    pub mass_exponents: Vec<(f64, f64)>,
    /// Singularity exponents (q, α(q)), sorted by q
    pub singularity_exponents: Vec<(f64, f64)>,
    /// max α − min α, or undefined with fewer than two H(q)
    pub width: MetricValue,
}

/// Geometric ladder of integer window sizes.
///
/// Starts at `scale_min` and multiplies by `scale_ratio` while the
/// untruncated value stays at or below `scale_max`. Truncation can repeat a
/// size at small scales with ratios close to 1; repeats are kept.
pub fn scale_ladder(scale_min: usize, scale_max: usize, scale_ratio: f64) -> Vec<usize> {
    let mut scales = Vec::new();
    if !(scale_ratio > 1.0) {
        return scales;
    }
    let mut s = scale_min as f64;
    while s <= scale_max as f64 {
        scales.push(s as usize);
        s *= scale_ratio;
    }
    scales
}

/// Spectrum width with the given configuration.
pub fn mfdfa_spectrum_width(log_returns: &[f64], config: &MfdfaConfig) -> RiskResult<MetricValue> {
    mfdfa_spectrum(log_returns, config).map(|spectrum| spectrum.width)
}

/// Run MF-DFA on a log-return series.
///
/// Short series are not an error: when fewer than two moment orders get a
/// defined H(q) the width is [`MetricValue::Undefined`] and a warning is
/// logged. Invalid configuration and non-finite input are hard errors.
pub fn mfdfa_spectrum(log_returns: &[f64], config: &MfdfaConfig) -> RiskResult<MultifractalSpectrum> {
    config.validate()?;
    validate_all_finite(log_returns, "MF-DFA input")?;

    let profile = integrate_series(log_returns);
    let ladder = scale_ladder(config.scale_min, config.scale_max, config.scale_ratio);

    // (scale, squared fluctuation of every segment)
    let mut segment_variances: Vec<(usize, Vec<f64>)> = Vec::with_capacity(ladder.len());
    for &scale in &ladder {
        let num_segments = profile.len() / scale;
        if num_segments < 2 {
            continue;
        }
        let variances = profile
            .chunks_exact(scale)
            .map(|segment| linear_detrended_variance(segment).map(|f2| f2 + config.epsilon))
            .collect::<RiskResult<Vec<f64>>>()?;
        segment_variances.push((scale, variances));
    }

    debug!(
        "MF-DFA: {} of {} ladder scales usable for {} observations",
        segment_variances.len(),
        ladder.len(),
        log_returns.len()
    );

    let mut generalized_hurst_exponents = Vec::with_capacity(config.q_values.len());
    for &q in &config.q_values {
        let (log_s, log_f): (Vec<f64>, Vec<f64>) = segment_variances
            .iter()
            .filter_map(|(scale, variances)| {
                let fq = fluctuation_function(variances, q);
                float_ops::safe_ln(fq).map(|ln_f| ((*scale as f64).ln(), ln_f))
            })
            .unzip();

        if log_s.len() < 2 {
            continue;
        }
        // Repeated scales only can leave the predictor without spread.
        if let Ok(fit) = ols_regression(&log_s, &log_f) {
            if fit.slope.is_finite() {
                generalized_hurst_exponents.push((q, fit.slope));
            }
        }
    }

    let scales = segment_variances.iter().map(|(scale, _)| *scale).collect();

    if generalized_hurst_exponents.len() < 2 {
        warn!(
            "MF-DFA spectrum width undefined: {} finite H(q) from {} observations",
            generalized_hurst_exponents.len(),
            log_returns.len()
        );
        return Ok(MultifractalSpectrum {
            scales,
            generalized_hurst_exponents,
            mass_exponents: Vec::new(),
            singularity_exponents: Vec::new(),
            width: MetricValue::undefined("fewer than two finite generalized Hurst exponents"),
        });
    }

    let mut sorted = generalized_hurst_exponents.clone();
    sorted.sort_by(|a, b| float_total_cmp(&a.0, &b.0));
    let q: Vec<f64> = sorted.iter().map(|&(q, _)| q).collect();
    let tau: Vec<f64> = sorted.iter().map(|&(q, h)| q * h - 1.0).collect();
    let alpha = gradient(&tau, &q)?;

    let alpha_max = alpha.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let alpha_min = alpha.iter().copied().fold(f64::INFINITY, f64::min);

    Ok(MultifractalSpectrum {
        scales,
        generalized_hurst_exponents,
        mass_exponents: q.iter().copied().zip(tau).collect(),
        singularity_exponents: q.iter().copied().zip(alpha).collect(),
        width: MetricValue::Value(alpha_max - alpha_min),
    })
}

/// F_q(s) from the per-segment squared fluctuations at one scale.
fn fluctuation_function(variances: &[f64], q: f64) -> f64 {
    let n = variances.len() as f64;
    if float_ops::approx_zero(q) {
        let mean_log = variances.iter().map(|f2| f2.ln()).sum::<f64>() / n;
        (0.5 * mean_log).exp()
    } else {
        let mean_power = variances.iter().map(|f2| f2.powf(q / 2.0)).sum::<f64>() / n;
        mean_power.powf(1.0 / q)
    }
}
