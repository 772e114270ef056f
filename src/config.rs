//! # Report Configuration
//!
//! Parameters for every estimator in the report. Defaults reproduce the
//! conventional settings: R/S windows from 8 to n/2, a 97.5% tail with a
//! 90% POT threshold, and MF-DFA over q ∈ {-5,-3,-1,0,1,3,5} on a dyadic
//! scale ladder from 16 to 1024.

use crate::errors::{validate_parameter, validate_probability, RiskAnalysisError, RiskResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default smallest R/S window
pub const DEFAULT_MIN_WINDOW: usize = 8;
/// Default left-tail probability (97.5% VaR)
pub const DEFAULT_ALPHA: f64 = 0.025;
/// Default quantile defining the POT threshold
pub const DEFAULT_THRESHOLD_QUANTILE: f64 = 0.90;
/// Exceedance count below which a GPD fit is flagged as unstable
pub const DEFAULT_MIN_EXCEEDANCES: usize = 50;
/// Default MF-DFA moment orders
pub const DEFAULT_Q_VALUES: [f64; 7] = [-5.0, -3.0, -1.0, 0.0, 1.0, 3.0, 5.0];
/// Default MF-DFA smallest scale
pub const DEFAULT_SCALE_MIN: usize = 16;
/// Default MF-DFA largest scale
pub const DEFAULT_SCALE_MAX: usize = 1024;
/// Default MF-DFA scale growth ratio
pub const DEFAULT_SCALE_RATIO: f64 = 2.0;
/// Default stabiliser added to segment variances
pub const DEFAULT_EPSILON: f64 = 1e-12;

/// Rescaled-range sweep parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HurstConfig {
    /// Smallest window length
    pub min_window: usize,
    /// Largest window length; `None` uses half the series length
    pub max_window: Option<usize>,
    /// Increment between window lengths
    pub step: usize,
}

impl Default for HurstConfig {
    fn default() -> Self {
        Self {
            min_window: DEFAULT_MIN_WINDOW,
            max_window: None,
            step: 1,
        }
    }
}

impl HurstConfig {
    /// Check window parameters
    pub fn validate(&self) -> RiskResult<()> {
        if self.min_window < 2 {
            return Err(RiskAnalysisError::InvalidParameter {
                parameter: "min_window".to_string(),
                value: self.min_window as f64,
                constraint: ">= 2".to_string(),
            });
        }
        if self.step == 0 {
            return Err(RiskAnalysisError::InvalidParameter {
                parameter: "step".to_string(),
                value: 0.0,
                constraint: ">= 1".to_string(),
            });
        }
        if let Some(max_window) = self.max_window {
            if max_window < self.min_window {
                return Err(RiskAnalysisError::InvalidParameter {
                    parameter: "max_window".to_string(),
                    value: max_window as f64,
                    constraint: format!(">= min_window ({})", self.min_window),
                });
            }
        }
        Ok(())
    }
}

/// Tail-risk parameters shared by historical and POT estimators
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TailRiskConfig {
    /// Left-tail probability; 0.025 gives the 97.5% VaR
    pub alpha: f64,
    /// Quantile of log returns used as POT threshold u
    pub threshold_quantile: f64,
    /// Exceedances below this count trigger the fit-instability warning
    pub min_exceedances: usize,
}

impl Default for TailRiskConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            threshold_quantile: DEFAULT_THRESHOLD_QUANTILE,
            min_exceedances: DEFAULT_MIN_EXCEEDANCES,
        }
    }
}

impl TailRiskConfig {
    /// Check probabilities; the exceedance probability α/(1−q_u) must stay below 1
    pub fn validate(&self) -> RiskResult<()> {
        validate_probability(self.alpha, "alpha")?;
        validate_probability(self.threshold_quantile, "threshold_quantile")?;
        let p_exceed = self.exceedance_probability();
        if p_exceed >= 1.0 {
            return Err(RiskAnalysisError::InvalidParameter {
                parameter: "alpha".to_string(),
                value: self.alpha,
                constraint: format!("< 1 - threshold_quantile ({})", 1.0 - self.threshold_quantile),
            });
        }
        Ok(())
    }

    /// p = α / (1 − q_u)
    pub fn exceedance_probability(&self) -> f64 {
        self.alpha / (1.0 - self.threshold_quantile)
    }
}

/// MF-DFA parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MfdfaConfig {
    /// Moment orders q
    pub q_values: Vec<f64>,
    /// Smallest segment length
    pub scale_min: usize,
    /// Largest segment length
    pub scale_max: usize,
    /// Geometric growth factor of the scale ladder
    pub scale_ratio: f64,
    /// Added to each segment variance
    pub epsilon: f64,
}

impl Default for MfdfaConfig {
    fn default() -> Self {
        Self {
            q_values: DEFAULT_Q_VALUES.to_vec(),
            scale_min: DEFAULT_SCALE_MIN,
            scale_max: DEFAULT_SCALE_MAX,
            scale_ratio: DEFAULT_SCALE_RATIO,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl MfdfaConfig {
    /// Check scale ladder and moment orders
    pub fn validate(&self) -> RiskResult<()> {
        if self.q_values.is_empty() {
            return Err(RiskAnalysisError::InvalidParameter {
                parameter: "q_values".to_string(),
                value: 0.0,
                constraint: "at least one moment order".to_string(),
            });
        }
        for (i, &q) in self.q_values.iter().enumerate() {
            if !q.is_finite() {
                return Err(RiskAnalysisError::InvalidParameter {
                    parameter: "q_values".to_string(),
                    value: q,
                    constraint: "finite".to_string(),
                });
            }
            if self.q_values[..i].contains(&q) {
                return Err(RiskAnalysisError::InvalidParameter {
                    parameter: "q_values".to_string(),
                    value: q,
                    constraint: "distinct moment orders".to_string(),
                });
            }
        }
        // A detrending line needs at least two points per segment.
        if self.scale_min < 2 {
            return Err(RiskAnalysisError::InvalidParameter {
                parameter: "scale_min".to_string(),
                value: self.scale_min as f64,
                constraint: ">= 2".to_string(),
            });
        }
        if self.scale_max < self.scale_min {
            return Err(RiskAnalysisError::InvalidParameter {
                parameter: "scale_max".to_string(),
                value: self.scale_max as f64,
                constraint: format!(">= scale_min ({})", self.scale_min),
            });
        }
        if !(self.scale_ratio > 1.0) || !self.scale_ratio.is_finite() {
            return Err(RiskAnalysisError::InvalidParameter {
                parameter: "scale_ratio".to_string(),
                value: self.scale_ratio,
                constraint: "> 1".to_string(),
            });
        }
        validate_parameter(self.epsilon, f64::MIN_POSITIVE, f64::MAX, "epsilon")?;
        Ok(())
    }
}

/// Configuration for a full metric report
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReportConfig {
    /// R/S Hurst estimator settings
    pub hurst: HurstConfig,
    /// Historical and POT tail settings
    pub tail: TailRiskConfig,
    /// MF-DFA settings
    pub mfdfa: MfdfaConfig,
}

impl ReportConfig {
    /// Validate every section
    pub fn validate(&self) -> RiskResult<()> {
        self.hurst.validate()?;
        self.tail.validate()?;
        self.mfdfa.validate()
    }
}
