//! # Fractal Risk Diagnostics
//!
//! Risk and fractal-geometry diagnostics for financial price series.
//!
//! Given the closing prices of an instrument, this crate measures long memory
//! (rescaled-range Hurst exponent), fat-tail risk (historical and
//! peaks-over-threshold Value-at-Risk and Expected Shortfall), path roughness
//! (Katz fractal dimension, MF-DFA spectrum width) and drawdown severity, and
//! collects them into one fixed-shape report per instrument.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fractal_risk::{analyze_instruments, Instrument, PriceSeries, ReportConfig};
//! use rand::prelude::*;
//! use rand_chacha::ChaCha20Rng;
//! use rand_distr::StandardNormal;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut rng = ChaCha20Rng::seed_from_u64(7);
//!     let mut price = 100.0f64;
//!     let closes: Vec<f64> = (0..2000)
//!         .map(|_| {
//!             let shock: f64 = rng.sample(StandardNormal);
//!             price *= (0.0002 + 0.012 * shock).exp();
//!             price
//!         })
//!         .collect();
//!
//!     let instruments = vec![Instrument::new("DEMO", "Demo Asset", PriceSeries::from_closes(closes)?)];
//!     for report in analyze_instruments(&instruments, &ReportConfig::default()) {
//!         for (key, value) in report.entries() {
//!             println!("{:<40} {:?}", key, value);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Metrics
//!
//! - **Hurst exponent**: R/S analysis over all sliding blocks of the non-zero
//!   simple returns
//! - **Historical VaR / ES**: linear-interpolated α-quantile of the log returns
//!   and the mean below it
//! - **POT VaR / ES**: generalized Pareto tail fitted by maximum likelihood to
//!   the excesses over a quantile threshold
//! - **Katz fractal dimension**: path length against diameter of the log returns
//! - **Maximum drawdown**: largest decline from a running peak
//! - **MF-DFA spectrum width**: spread of the singularity exponents α(q)
//!
//! Degenerate but well-posed results (a diverging tail mean, too few MF-DFA
//! scales) are [`MetricValue::Undefined`]; precondition violations are
//! [`RiskAnalysisError`]s. Inside a report, a failing metric never prevents
//! the others from being computed.
//!
//! ## Features
//!
//! - `serde` (default): `Serialize`/`Deserialize` on configs and results
//! - `parallel` (default): rayon for the R/S window sweep and batch reports

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod config;
pub mod drawdown;
pub mod errors;
pub mod extreme_value;
pub mod fractal_dimension;
pub mod hurst_estimators;
pub mod math_utils;
pub mod multifractal;
pub mod results;
pub mod returns;
pub mod tail_risk;

pub use analyzer::{analyze_instruments, build_report, Instrument};
pub use config::{HurstConfig, MfdfaConfig, ReportConfig, TailRiskConfig};
pub use drawdown::maximum_drawdown;
pub use errors::{RiskAnalysisError, RiskResult};
pub use extreme_value::{fit_gpd, gpd_cdf, gpd_ppf, pot_var_es, GpdFit, PotEstimate};
pub use fractal_dimension::katz_fractal_dimension;
pub use hurst_estimators::{estimate_hurst_rescaled_range, hurst_rs, RescaledRangeEstimate};
pub use multifractal::{mfdfa_spectrum, mfdfa_spectrum_width, MultifractalSpectrum};
pub use results::{MetricOutcome, MetricReport, MetricValue, ReportField, REPORT_KEYS};
pub use returns::{log_returns, simple_returns, PriceSeries, ReturnKind, ReturnSeries};
pub use tail_risk::{expected_shortfall, historical_var};
