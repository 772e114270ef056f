//! Price series and the return series derived from them.
//!
//! A [`PriceSeries`] is an ordered run of `(timestamp, close)` observations
//! with strictly increasing timestamps. Missing closes are stored as NaN and
//! dropped before any differencing.

use crate::errors::{validate_positive, RiskAnalysisError, RiskResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered closing prices of one instrument.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceSeries {
    timestamps: Vec<i64>,
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Build from `(timestamp, close)` pairs.
    ///
    /// Timestamps must be strictly increasing. A NaN close marks a missing
    /// observation; infinite closes are rejected.
    pub fn new(observations: Vec<(i64, f64)>) -> RiskResult<Self> {
        for (i, window) in observations.windows(2).enumerate() {
            if window[1].0 <= window[0].0 {
                return Err(RiskAnalysisError::UnorderedTimestamps { index: i + 1 });
            }
        }
        if let Some((i, (_, close))) = observations
            .iter()
            .enumerate()
            .find(|(_, (_, close))| close.is_infinite())
        {
            return Err(RiskAnalysisError::DegenerateInput {
                reason: format!("close at index {} is {}", i, close),
            });
        }

        let (timestamps, closes) = observations.into_iter().unzip();
        Ok(Self { timestamps, closes })
    }

    /// Build from closes alone, indexing them 0, 1, 2, …
    pub fn from_closes(closes: Vec<f64>) -> RiskResult<Self> {
        Self::new(
            closes
                .into_iter()
                .enumerate()
                .map(|(i, close)| (i as i64, close))
                .collect(),
        )
    }

    /// Number of observations, missing ones included
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// True when there are no observations
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Observation timestamps
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Raw closes, NaN where an observation is missing
    pub fn raw_closes(&self) -> &[f64] {
        &self.closes
    }

    /// Closes with missing observations dropped
    pub fn closing_prices(&self) -> Vec<f64> {
        drop_missing(&self.closes)
    }
}

/// How a return series was derived from prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReturnKind {
    /// (P[i] − P[i−1]) / P[i−1]
    Simple,
    /// ln P[i] − ln P[i−1]
    Log,
}

/// Immutable return series of length `prices − 1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReturnSeries {
    kind: ReturnKind,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Derive returns of the given kind from a price sequence.
    ///
    /// Missing (NaN) prices are dropped first and at least two valid prices
    /// must remain. Log returns need strictly positive prices; simple returns
    /// only need a non-zero divisor.
    pub fn from_prices(prices: &[f64], kind: ReturnKind) -> RiskResult<Self> {
        let prices = drop_missing(prices);
        if prices.len() < 2 {
            return Err(RiskAnalysisError::InsufficientData {
                required: 2,
                actual: prices.len(),
            });
        }
        match kind {
            ReturnKind::Log => validate_positive(&prices, "prices")?,
            ReturnKind::Simple => {
                if let Some(i) = prices.iter().position(|&p| p == 0.0) {
                    return Err(RiskAnalysisError::DegenerateInput {
                        reason: format!("zero price at index {} has no simple return", i),
                    });
                }
            }
        }

        let values = prices
            .windows(2)
            .map(|w| match kind {
                ReturnKind::Simple => (w[1] - w[0]) / w[0],
                ReturnKind::Log => w[1].ln() - w[0].ln(),
            })
            .collect();

        Ok(Self { kind, values })
    }

    /// Return kind
    pub fn kind(&self) -> ReturnKind {
        self.kind
    }

    /// Return values in time order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of returns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the series holds no returns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of the series with exact zero returns removed
    pub fn without_zeros(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|&r| r != 0.0).collect()
    }
}

/// Simple (percentage-change) returns
pub fn simple_returns(prices: &[f64]) -> RiskResult<ReturnSeries> {
    ReturnSeries::from_prices(prices, ReturnKind::Simple)
}

/// Logarithmic returns
pub fn log_returns(prices: &[f64]) -> RiskResult<ReturnSeries> {
    ReturnSeries::from_prices(prices, ReturnKind::Log)
}

fn drop_missing(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}
