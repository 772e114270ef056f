//! Peaks-over-threshold tail model.
//!
//! Excesses beyond a quantile threshold u of the log returns are fitted with
//! a Generalised Pareto Distribution (location fixed at 0) by maximum
//! likelihood. The fitted tail gives an extrapolated VaR and, when the shape
//! stays below one, a closed-form Expected Shortfall.
//!
//! ## GPD conventions
//!
//! With shape c and scale σ:
//! - CDF: F(x) = 1 − (1 + c·x/σ)^(−1/c), or 1 − e^(−x/σ) when c = 0
//! - Quantile: F⁻¹(p) = σ/c · ((1 − p)^(−c) − 1), or −σ·ln(1 − p) when c = 0
//!
//! ## Fitting
//!
//! The likelihood is profiled on θ = c/σ: for fixed θ the optimal shape is
//! c(θ) = mean ln(1 + θx) and σ = c/θ. The one-dimensional profile is scanned
//! on a grid over the admissible range θ > −1/max(x) and the best cell is
//! refined by golden-section search. Shapes at or below −1 are excluded because
//! the likelihood is unbounded there.

use crate::config::TailRiskConfig;
use crate::errors::{validate_all_finite, RiskAnalysisError, RiskResult};
use crate::math_utils::quantile;
use crate::results::MetricValue;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// |θ·mean| below this is treated as the exponential limit c = 0
const EXPONENTIAL_LIMIT: f64 = 1e-9;
/// Grid cells on each side of θ = 0
const PROFILE_GRID_POINTS: usize = 200;
/// Largest scaled θ probed on the positive side
const PROFILE_GRID_MAX_EXPONENT: f64 = 4.0;
/// Golden-section iterations
const GOLDEN_ITERATIONS: usize = 200;
/// Golden-section stopping width (scaled θ units)
const GOLDEN_TOLERANCE: f64 = 1e-12;

/// Fitted GPD parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpdFit {
    /// Shape c
    pub shape: f64,
    /// Scale σ
    pub scale: f64,
    /// Maximised log-likelihood
    pub log_likelihood: f64,
}

/// Peaks-over-threshold risk estimate
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PotEstimate {
    /// Threshold u, the `threshold_quantile` quantile of the returns
    pub threshold: f64,
    /// Number of strictly positive excesses u − r
    pub exceedances: usize,
    /// Fitted GPD shape c
    pub shape: f64,
    /// Fitted GPD scale σ
    pub scale: f64,
    /// p = α / (1 − q_u)
    pub exceedance_probability: f64,
    /// Tail VaR as a signed return
    pub var: f64,
    /// Tail ES; undefined when c ≥ 1
    pub es: MetricValue,
    /// Set when fewer excesses than `min_exceedances` were available
    pub fit_warning: bool,
}

impl PotEstimate {
    /// `(VaR, ES)` pair as reported
    pub fn pair(&self) -> (MetricValue, MetricValue) {
        (MetricValue::Value(self.var), self.es.clone())
    }
}

/// GPD cumulative distribution function (location 0)
pub fn gpd_cdf(x: f64, shape: f64, scale: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if shape.abs() < EXPONENTIAL_LIMIT {
        return 1.0 - (-x / scale).exp();
    }
    let z = 1.0 + shape * x / scale;
    if z <= 0.0 {
        // beyond the upper endpoint of a bounded tail
        return 1.0;
    }
    1.0 - z.powf(-1.0 / shape)
}

/// GPD quantile function (location 0)
pub fn gpd_ppf(p: f64, shape: f64, scale: f64) -> f64 {
    if shape.abs() < EXPONENTIAL_LIMIT {
        -scale * (-p).ln_1p()
    } else {
        scale / shape * ((1.0 - p).powf(-shape) - 1.0)
    }
}

/// GPD log-likelihood of a sample (location 0).
///
/// Returns −∞ when a point falls outside the support or σ ≤ 0.
pub fn gpd_log_likelihood(data: &[f64], shape: f64, scale: f64) -> f64 {
    if !(scale > 0.0) {
        return f64::NEG_INFINITY;
    }
    let n = data.len() as f64;
    if shape.abs() < EXPONENTIAL_LIMIT {
        return -n * scale.ln() - data.iter().sum::<f64>() / scale;
    }
    let mut log_sum = 0.0;
    for &x in data {
        let z = shape * x / scale;
        if x < 0.0 || z <= -1.0 {
            return f64::NEG_INFINITY;
        }
        log_sum += z.ln_1p();
    }
    -n * scale.ln() - (1.0 + 1.0 / shape) * log_sum
}

/// Maximum-likelihood GPD fit with location fixed at 0.
///
/// # Errors
/// - `InsufficientData` for fewer than two excesses
/// - `DegenerateInput` for negative or non-finite excesses
/// - `NumericalError` when every excess is identical
pub fn fit_gpd(excesses: &[f64]) -> RiskResult<GpdFit> {
    if excesses.len() < 2 {
        return Err(RiskAnalysisError::InsufficientData {
            required: 2,
            actual: excesses.len(),
        });
    }
    validate_all_finite(excesses, "excesses")?;
    if excesses.iter().any(|&x| x < 0.0) {
        return Err(RiskAnalysisError::DegenerateInput {
            reason: "GPD excesses must be non-negative".to_string(),
        });
    }

    let mean = excesses.iter().sum::<f64>() / excesses.len() as f64;
    let max = excesses.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let min = excesses.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    if !(max > min) || !(mean > 0.0) {
        return Err(RiskAnalysisError::NumericalError {
            reason: "GPD excesses have no spread".to_string(),
            operation: Some("fit_gpd".to_string()),
        });
    }

    let profile = ProfileLikelihood {
        data: excesses,
        mean,
    };

    // Scaled θ (t = θ·mean) stays above −mean/max.
    let lower = -mean / max;
    let mut grid: Vec<f64> = (1..PROFILE_GRID_POINTS)
        .rev()
        .map(|k| lower * k as f64 / PROFILE_GRID_POINTS as f64)
        .collect();
    grid.push(0.0);
    grid.extend((0..=PROFILE_GRID_POINTS).map(|k| {
        let exponent = -PROFILE_GRID_MAX_EXPONENT
            + 2.0 * PROFILE_GRID_MAX_EXPONENT * k as f64 / PROFILE_GRID_POINTS as f64;
        10f64.powf(exponent)
    }));

    let objective = |t: f64| {
        profile
            .evaluate(t)
            .map_or(f64::NEG_INFINITY, |fit| fit.log_likelihood)
    };
    let (best, _) = grid
        .iter()
        .enumerate()
        .map(|(i, &t)| (i, objective(t)))
        .fold((0, f64::NEG_INFINITY), |acc, cur| if cur.1 > acc.1 { cur } else { acc });

    let a = if best == 0 { lower } else { grid[best - 1] };
    let b = grid.get(best + 1).copied().unwrap_or(grid[best]);
    let refined = golden_section_max(objective, a, b);

    let candidate = [refined, grid[best]]
        .into_iter()
        .filter_map(|t| profile.evaluate(t))
        .fold(None::<GpdFit>, |acc, fit| match acc {
            Some(prev) if prev.log_likelihood >= fit.log_likelihood => Some(prev),
            _ => Some(fit),
        });

    candidate.ok_or_else(|| RiskAnalysisError::NumericalError {
        reason: "GPD profile likelihood has no finite maximum".to_string(),
        operation: Some("fit_gpd".to_string()),
    })
}

/// Peaks-over-threshold VaR and ES of a log-return series.
///
/// u is the `threshold_quantile` quantile of the returns, the excesses are
/// u − r for every r below u, and the fitted tail is evaluated at
/// p = α / (1 − q_u):
///
/// - VaR = u − F⁻¹(p; c, σ)
/// - ES = VaR + (σ − c·(u − VaR)) / (1 − c), undefined when c ≥ 1
pub fn pot_var_es(returns: &[f64], config: &TailRiskConfig) -> RiskResult<PotEstimate> {
    config.validate()?;
    validate_all_finite(returns, "returns")?;

    let threshold = quantile(returns, config.threshold_quantile)?;
    let excesses: Vec<f64> = returns
        .iter()
        .map(|&r| threshold - r)
        .filter(|&x| x > 0.0)
        .collect();

    let fit_warning = excesses.len() < config.min_exceedances;
    if fit_warning {
        log::warn!(
            "Fewer than {} tail exceedances ({}): GPD fit may be unstable",
            config.min_exceedances,
            excesses.len()
        );
    }

    let fit = fit_gpd(&excesses)?;
    let (shape, scale) = (fit.shape, fit.scale);
    let exceedance_probability = config.exceedance_probability();

    let var = threshold - gpd_ppf(exceedance_probability, shape, scale);
    let es = if shape >= 1.0 {
        MetricValue::undefined(format!("GPD shape {:.4} >= 1: tail mean diverges", shape))
    } else {
        MetricValue::Value(var + (scale - shape * (threshold - var)) / (1.0 - shape))
    };

    Ok(PotEstimate {
        threshold,
        exceedances: excesses.len(),
        shape,
        scale,
        exceedance_probability,
        var,
        es,
        fit_warning,
    })
}

struct ProfileLikelihood<'a> {
    data: &'a [f64],
    mean: f64,
}

impl ProfileLikelihood<'_> {
    /// Profile fit at scaled θ, `None` outside the admissible region
    fn evaluate(&self, scaled_theta: f64) -> Option<GpdFit> {
        let n = self.data.len() as f64;
        if scaled_theta.abs() < EXPONENTIAL_LIMIT {
            let scale = self.mean;
            return Some(GpdFit {
                shape: 0.0,
                scale,
                log_likelihood: -n * (scale.ln() + 1.0),
            });
        }

        let theta = scaled_theta / self.mean;
        let mut log_sum = 0.0;
        for &x in self.data {
            let z = theta * x;
            if z <= -1.0 {
                return None;
            }
            log_sum += z.ln_1p();
        }
        let shape = log_sum / n;
        let scale = shape / theta;
        if shape <= -1.0 || !(scale > 0.0) || !scale.is_finite() {
            return None;
        }

        Some(GpdFit {
            shape,
            scale,
            log_likelihood: -n * (scale.ln() + 1.0 + shape),
        })
    }
}

/// Golden-section search for a maximum of `f` on `[a, b]`
fn golden_section_max<F: Fn(f64) -> f64>(f: F, mut a: f64, mut b: f64) -> f64 {
    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let (mut fc, mut fd) = (f(c), f(d));

    for _ in 0..GOLDEN_ITERATIONS {
        if (b - a).abs() < GOLDEN_TOLERANCE {
            break;
        }
        if fc >= fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d);
        }
    }
    (a + b) / 2.0
}
