//! # Instrument Analyzer
//!
//! [`Instrument`] binds a ticker and display name to a validated
//! [`PriceSeries`] and derives the closing prices, simple returns and log
//! returns on first use. Each derived series is computed at most once, even
//! when several threads ask for it at the same time.
//!
//! [`build_report`] runs every estimator against one instrument and collects
//! the results into a [`MetricReport`]. A failing metric is recorded as
//! [`MetricOutcome::Failed`] and logged; the other metrics are still computed.
//!
//! ## Usage Example
//!
//! ```rust
//! use fractal_risk::analyzer::{build_report, Instrument};
//! use fractal_risk::config::ReportConfig;
//! use fractal_risk::returns::PriceSeries;
//! use fractal_risk::errors::RiskAnalysisError;
//!
//! # fn main() -> Result<(), RiskAnalysisError> {
//! let closes: Vec<f64> = (0..600)
//!     .map(|i| 100.0 * (1.0 + 0.02 * ((i as f64) * 0.7).sin()))
//!     .collect();
//! let instrument = Instrument::new("DEMO", "Demo Asset", PriceSeries::from_closes(closes)?);
//!
//! let report = build_report(&instrument, &ReportConfig::default());
//! for (key, field) in report.entries() {
//!     println!("{}: {:?}", key, field);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
    config::{HurstConfig, MfdfaConfig, ReportConfig, TailRiskConfig},
    drawdown,
    errors::RiskResult,
    extreme_value::{self, PotEstimate},
    fractal_dimension,
    hurst_estimators::{self, RescaledRangeEstimate},
    multifractal::{self, MultifractalSpectrum},
    results::{MetricOutcome, MetricReport, MetricReportBuilder, MetricValue},
    returns::{PriceSeries, ReturnKind, ReturnSeries},
    tail_risk,
};
use once_cell::sync::OnceCell;

/// One instrument and its lazily derived series.
#[derive(Debug, Clone)]
pub struct Instrument {
    ticker: String,
    name: String,
    prices: PriceSeries,
    closes: OnceCell<Vec<f64>>,
    simple_returns: OnceCell<ReturnSeries>,
    log_returns: OnceCell<ReturnSeries>,
}

impl Instrument {
    /// Wrap a price series; nothing is derived until first requested.
    pub fn new(ticker: impl Into<String>, name: impl Into<String>, prices: PriceSeries) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            prices,
            closes: OnceCell::new(),
            simple_returns: OnceCell::new(),
            log_returns: OnceCell::new(),
        }
    }

    /// Ticker symbol
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying observations
    pub fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    /// Closing prices with missing observations removed
    pub fn closes(&self) -> &[f64] {
        self.closes.get_or_init(|| self.prices.closing_prices())
    }

    /// Simple returns, derived once
    pub fn simple_returns(&self) -> RiskResult<&ReturnSeries> {
        self.simple_returns
            .get_or_try_init(|| ReturnSeries::from_prices(self.closes(), ReturnKind::Simple))
    }

    /// Log returns, derived once
    pub fn log_returns(&self) -> RiskResult<&ReturnSeries> {
        self.log_returns
            .get_or_try_init(|| ReturnSeries::from_prices(self.closes(), ReturnKind::Log))
    }

    /// Full R/S sweep on the non-zero simple returns
    pub fn rescaled_range(&self, config: &HurstConfig) -> RiskResult<RescaledRangeEstimate> {
        let returns = self.simple_returns()?.without_zeros();
        hurst_estimators::estimate_hurst_rescaled_range(&returns, config)
    }

    /// R/S Hurst exponent
    pub fn hurst(&self, config: &HurstConfig) -> RiskResult<f64> {
        self.rescaled_range(config).map(|estimate| estimate.hurst)
    }

    /// Historical VaR of the log returns
    pub fn historical_var(&self, alpha: f64) -> RiskResult<f64> {
        tail_risk::historical_var(self.log_returns()?.values(), alpha)
    }

    /// Historical ES of the log returns
    pub fn expected_shortfall(&self, alpha: f64) -> RiskResult<f64> {
        tail_risk::expected_shortfall(self.log_returns()?.values(), alpha)
    }

    /// POT tail estimate of the log returns
    pub fn pot_var_es(&self, config: &TailRiskConfig) -> RiskResult<PotEstimate> {
        extreme_value::pot_var_es(self.log_returns()?.values(), config)
    }

    /// Katz dimension of the log-return path
    pub fn katz_fractal_dimension(&self) -> RiskResult<f64> {
        fractal_dimension::katz_fractal_dimension(self.log_returns()?.values())
    }

    /// Maximum drawdown of the closes
    pub fn maximum_drawdown(&self) -> RiskResult<f64> {
        drawdown::maximum_drawdown(self.closes())
    }

    /// MF-DFA spectrum of the log returns
    pub fn mfdfa_spectrum(&self, config: &MfdfaConfig) -> RiskResult<MultifractalSpectrum> {
        multifractal::mfdfa_spectrum(self.log_returns()?.values(), config)
    }

    /// MF-DFA spectrum width of the log returns
    pub fn mfdfa_spectrum_width(&self, config: &MfdfaConfig) -> RiskResult<MetricValue> {
        self.mfdfa_spectrum(config).map(|spectrum| spectrum.width)
    }

    /// Build this instrument's report
    pub fn report(&self, config: &ReportConfig) -> MetricReport {
        build_report(self, config)
    }
}

/// Compute every metric for one instrument, isolating failures per metric.
pub fn build_report(instrument: &Instrument, config: &ReportConfig) -> MetricReport {
    let ticker = instrument.ticker();
    let alpha = config.tail.alpha;

    let hurst = isolate(ticker, "Hurst exponent", instrument.hurst(&config.hurst));
    let var = isolate(ticker, "historical VaR", instrument.historical_var(alpha));
    let es = isolate(ticker, "expected shortfall", instrument.expected_shortfall(alpha));
    let pot = isolate(ticker, "POT VaR/ES", instrument.pot_var_es(&config.tail));
    let katz = isolate(ticker, "Katz dimension", instrument.katz_fractal_dimension());
    let drawdown = isolate(ticker, "maximum drawdown", instrument.maximum_drawdown());
    let width = isolate(
        ticker,
        "MF-DFA width",
        instrument.mfdfa_spectrum_width(&config.mfdfa),
    );

    MetricReportBuilder::new(ticker, instrument.name())
        .hurst_exponent(scalar(hurst))
        .historical_var(scalar(var))
        .expected_shortfall(scalar(es))
        .pot_var_es(match pot {
            MetricOutcome::Computed(estimate) => MetricOutcome::Computed(estimate.pair()),
            MetricOutcome::Failed { error } => MetricOutcome::Failed { error },
        })
        .katz_fractal_dimension(scalar(katz))
        .maximum_drawdown(scalar(drawdown))
        .mfdfa_spectrum_width(width)
        .build()
}

/// One report per instrument, in input order.
///
/// Instruments are independent; with the `parallel` feature they are
/// processed on the rayon pool.
pub fn analyze_instruments(instruments: &[Instrument], config: &ReportConfig) -> Vec<MetricReport> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        instruments
            .par_iter()
            .map(|instrument| build_report(instrument, config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        instruments
            .iter()
            .map(|instrument| build_report(instrument, config))
            .collect()
    }
}

fn isolate<T>(ticker: &str, metric: &str, result: RiskResult<T>) -> MetricOutcome<T> {
    if let Err(e) = &result {
        log::warn!("{}: {} failed: {}", ticker, metric, e);
    }
    MetricOutcome::from(result)
}

fn scalar(outcome: MetricOutcome<f64>) -> MetricOutcome<MetricValue> {
    match outcome {
        MetricOutcome::Computed(value) => MetricOutcome::Computed(MetricValue::Value(value)),
        MetricOutcome::Failed { error } => MetricOutcome::Failed { error },
    }
}
