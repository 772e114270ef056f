//! # Result Structures
//!
//! [`MetricValue`] carries a scalar that may be mathematically undefined,
//! [`MetricOutcome`] records whether a metric could be computed at all, and
//! [`MetricReport`] is the fixed-shape, per-instrument report.

use crate::errors::{RiskAnalysisError, RiskResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Report key for the ticker symbol
pub const KEY_TICKER: &str = "ticker";
/// Report key for the display name
pub const KEY_NAME: &str = "name";
/// Report key for the R/S Hurst exponent
pub const KEY_HURST: &str = "Hurst exponent";
/// Report key for historical VaR
pub const KEY_HISTORICAL_VAR: &str = "Historical Value-at-Risk (VaR 97.5%)";
/// Report key for historical ES
pub const KEY_EXPECTED_SHORTFALL: &str = "Expected Shortfall (ES)";
/// Report key for the POT (VaR, ES) pair
pub const KEY_POT_VAR_ES: &str = "Peaks-over-Threshold (POT) VaR and ES";
/// Report key for the Katz dimension
pub const KEY_KATZ: &str = "Katz Fractal Dimension";
/// Report key for maximum drawdown
pub const KEY_MAX_DRAWDOWN: &str = "Maximum Drawdown";
/// Report key for the MF-DFA spectrum width
pub const KEY_MFDFA_WIDTH: &str = "MFDFA Spectrum Width";

/// Every report key in output order
pub const REPORT_KEYS: [&str; 9] = [
    KEY_TICKER,
    KEY_NAME,
    KEY_HURST,
    KEY_HISTORICAL_VAR,
    KEY_EXPECTED_SHORTFALL,
    KEY_POT_VAR_ES,
    KEY_KATZ,
    KEY_MAX_DRAWDOWN,
    KEY_MFDFA_WIDTH,
];

/// A scalar that is either a number or explicitly undefined.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum MetricValue {
    /// Well-defined value
    Value(f64),
    /// The quantity does not exist for this input (e.g. diverging tail mean)
    Undefined {
        /// Why the value is undefined
        reason: String,
    },
}

impl MetricValue {
    /// Undefined value with a reason
    pub fn undefined(reason: impl Into<String>) -> Self {
        Self::Undefined {
            reason: reason.into(),
        }
    }

    /// The number, if defined
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Undefined { .. } => None,
        }
    }

    /// True for the undefined variant
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined { .. })
    }

    /// The number, or NaN when undefined
    pub fn to_f64_or_nan(&self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

/// Outcome of computing one report metric.
///
/// A failed metric carries its error instead of aborting the whole report.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum MetricOutcome<T> {
    /// Metric computed
    Computed(T),
    /// Metric failed with a hard error
    Failed {
        /// The error raised by the estimator
        error: RiskAnalysisError,
    },
}

impl<T> MetricOutcome<T> {
    /// Computed payload, if any
    pub fn computed(&self) -> Option<&T> {
        match self {
            Self::Computed(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }

    /// Error, if the metric failed
    pub fn error(&self) -> Option<&RiskAnalysisError> {
        match self {
            Self::Computed(_) => None,
            Self::Failed { error } => Some(error),
        }
    }

    /// True when the metric failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl<T> From<RiskResult<T>> for MetricOutcome<T> {
    fn from(result: RiskResult<T>) -> Self {
        match result {
            Ok(value) => Self::Computed(value),
            Err(error) => Self::Failed { error },
        }
    }
}

impl MetricOutcome<MetricValue> {
    /// Defined number, if the metric was computed and defined
    pub fn value(&self) -> Option<f64> {
        self.computed().and_then(MetricValue::value)
    }
}

/// Borrowed view of one report field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportField<'a> {
    /// `ticker` or `name`
    Text(&'a str),
    /// Scalar metric
    Scalar(&'a MetricOutcome<MetricValue>),
    /// The POT `(VaR, ES)` pair
    Pair(&'a MetricOutcome<(MetricValue, MetricValue)>),
}

/// Diagnostics for one instrument, immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricReport {
    #[cfg_attr(feature = "serde", serde(rename = "ticker"))]
    ticker: String,
    #[cfg_attr(feature = "serde", serde(rename = "name"))]
    name: String,
    #[cfg_attr(feature = "serde", serde(rename = "Hurst exponent"))]
    hurst_exponent: MetricOutcome<MetricValue>,
    #[cfg_attr(feature = "serde", serde(rename = "Historical Value-at-Risk (VaR 97.5%)"))]
    historical_var: MetricOutcome<MetricValue>,
    #[cfg_attr(feature = "serde", serde(rename = "Expected Shortfall (ES)"))]
    expected_shortfall: MetricOutcome<MetricValue>,
    #[cfg_attr(feature = "serde", serde(rename = "Peaks-over-Threshold (POT) VaR and ES"))]
    pot_var_es: MetricOutcome<(MetricValue, MetricValue)>,
    #[cfg_attr(feature = "serde", serde(rename = "Katz Fractal Dimension"))]
    katz_fractal_dimension: MetricOutcome<MetricValue>,
    #[cfg_attr(feature = "serde", serde(rename = "Maximum Drawdown"))]
    maximum_drawdown: MetricOutcome<MetricValue>,
    #[cfg_attr(feature = "serde", serde(rename = "MFDFA Spectrum Width"))]
    mfdfa_spectrum_width: MetricOutcome<MetricValue>,
}

/// Assembles a [`MetricReport`]; metrics not supplied are recorded as failed.
#[derive(Debug, Clone)]
pub struct MetricReportBuilder {
    report: MetricReport,
}

impl MetricReportBuilder {
    /// Start a report for one instrument
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            report: MetricReport {
                ticker: ticker.into(),
                name: name.into(),
                hurst_exponent: not_computed(),
                historical_var: not_computed(),
                expected_shortfall: not_computed(),
                pot_var_es: not_computed(),
                katz_fractal_dimension: not_computed(),
                maximum_drawdown: not_computed(),
                mfdfa_spectrum_width: not_computed(),
            },
        }
    }

    /// Set the Hurst exponent
    pub fn hurst_exponent(mut self, outcome: MetricOutcome<MetricValue>) -> Self {
        self.report.hurst_exponent = outcome;
        self
    }

    /// Set historical VaR
    pub fn historical_var(mut self, outcome: MetricOutcome<MetricValue>) -> Self {
        self.report.historical_var = outcome;
        self
    }

    /// Set historical ES
    pub fn expected_shortfall(mut self, outcome: MetricOutcome<MetricValue>) -> Self {
        self.report.expected_shortfall = outcome;
        self
    }

    /// Set the POT pair
    pub fn pot_var_es(mut self, outcome: MetricOutcome<(MetricValue, MetricValue)>) -> Self {
        self.report.pot_var_es = outcome;
        self
    }

    /// Set the Katz dimension
    pub fn katz_fractal_dimension(mut self, outcome: MetricOutcome<MetricValue>) -> Self {
        self.report.katz_fractal_dimension = outcome;
        self
    }

    /// Set maximum drawdown
    pub fn maximum_drawdown(mut self, outcome: MetricOutcome<MetricValue>) -> Self {
        self.report.maximum_drawdown = outcome;
        self
    }

    /// Set the MF-DFA width
    pub fn mfdfa_spectrum_width(mut self, outcome: MetricOutcome<MetricValue>) -> Self {
        self.report.mfdfa_spectrum_width = outcome;
        self
    }

    /// Finish the report
    pub fn build(self) -> MetricReport {
        self.report
    }
}

fn not_computed<T>() -> MetricOutcome<T> {
    MetricOutcome::Failed {
        error: RiskAnalysisError::NumericalError {
            reason: "metric not computed".to_string(),
            operation: None,
        },
    }
}

impl MetricReport {
    /// Ticker symbol
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// R/S Hurst exponent of the non-zero simple returns
    pub fn hurst_exponent(&self) -> &MetricOutcome<MetricValue> {
        &self.hurst_exponent
    }

    /// Historical VaR of the log returns
    pub fn historical_var(&self) -> &MetricOutcome<MetricValue> {
        &self.historical_var
    }

    /// Historical ES of the log returns
    pub fn expected_shortfall(&self) -> &MetricOutcome<MetricValue> {
        &self.expected_shortfall
    }

    /// POT `(VaR, ES)`
    pub fn pot_var_es(&self) -> &MetricOutcome<(MetricValue, MetricValue)> {
        &self.pot_var_es
    }

    /// Katz fractal dimension of the log returns
    pub fn katz_fractal_dimension(&self) -> &MetricOutcome<MetricValue> {
        &self.katz_fractal_dimension
    }

    /// Maximum drawdown of the closes
    pub fn maximum_drawdown(&self) -> &MetricOutcome<MetricValue> {
        &self.maximum_drawdown
    }

    /// MF-DFA singularity spectrum width
    pub fn mfdfa_spectrum_width(&self) -> &MetricOutcome<MetricValue> {
        &self.mfdfa_spectrum_width
    }

    /// Field by report key
    pub fn get(&self, key: &str) -> Option<ReportField<'_>> {
        let field = match key {
            KEY_TICKER => ReportField::Text(&self.ticker),
            KEY_NAME => ReportField::Text(&self.name),
            KEY_HURST => ReportField::Scalar(&self.hurst_exponent),
            KEY_HISTORICAL_VAR => ReportField::Scalar(&self.historical_var),
            KEY_EXPECTED_SHORTFALL => ReportField::Scalar(&self.expected_shortfall),
            KEY_POT_VAR_ES => ReportField::Pair(&self.pot_var_es),
            KEY_KATZ => ReportField::Scalar(&self.katz_fractal_dimension),
            KEY_MAX_DRAWDOWN => ReportField::Scalar(&self.maximum_drawdown),
            KEY_MFDFA_WIDTH => ReportField::Scalar(&self.mfdfa_spectrum_width),
            _ => return None,
        };
        Some(field)
    }

    /// All fields in key order
    pub fn entries(&self) -> Vec<(&'static str, ReportField<'_>)> {
        REPORT_KEYS
            .iter()
            .filter_map(|&key| self.get(key).map(|field| (key, field)))
            .collect()
    }

    /// Metrics that failed with a hard error, by key
    pub fn failures(&self) -> Vec<(&'static str, &RiskAnalysisError)> {
        self.entries()
            .into_iter()
            .filter_map(|(key, field)| match field {
                ReportField::Text(_) => None,
                ReportField::Scalar(outcome) => outcome.error().map(|e| (key, e)),
                ReportField::Pair(outcome) => outcome.error().map(|e| (key, e)),
            })
            .collect()
    }
}
