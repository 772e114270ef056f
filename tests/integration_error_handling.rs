//! Error propagation and per-metric failure isolation.

use fractal_risk::*;

fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0 + i as f64 * 0.01).collect()
}

#[test]
fn test_duplicate_timestamps_rejected() {
    let result = PriceSeries::new(vec![(1, 10.0), (2, 11.0), (2, 12.0)]);
    assert_eq!(
        result.unwrap_err(),
        RiskAnalysisError::UnorderedTimestamps { index: 2 }
    );
}

#[test]
fn test_decreasing_timestamps_rejected() {
    assert!(matches!(
        PriceSeries::new(vec![(5, 10.0), (3, 11.0)]),
        Err(RiskAnalysisError::UnorderedTimestamps { index: 1 })
    ));
}

#[test]
fn test_infinite_close_rejected() {
    assert!(matches!(
        PriceSeries::from_closes(vec![1.0, f64::INFINITY]),
        Err(RiskAnalysisError::DegenerateInput { .. })
    ));
}

#[test]
fn test_negative_price_fails_log_and_drawdown_metrics_only() {
    let mut closes = ramp(300);
    closes[150] = -1.0;
    let instrument = Instrument::new("NEG", "Negative", PriceSeries::from_closes(closes).unwrap());

    let report = build_report(&instrument, &ReportConfig::default());
    assert_eq!(report.ticker(), "NEG");
    let failures = report.failures();
    let failed: Vec<&str> = failures.iter().map(|(key, _)| *key).collect();
    assert_eq!(
        failed,
        vec![
            "Historical Value-at-Risk (VaR 97.5%)",
            "Expected Shortfall (ES)",
            "Peaks-over-Threshold (POT) VaR and ES",
            "Katz Fractal Dimension",
            "Maximum Drawdown",
            "MFDFA Spectrum Width",
        ]
    );
    assert!(failures
        .iter()
        .all(|(_, error)| matches!(error, RiskAnalysisError::DegenerateInput { .. })));
    // Simple returns are defined for any non-zero close.
    assert!(report.hurst_exponent().value().is_some());
}

#[test]
fn test_zero_price_fails_every_metric_but_report_is_built() {
    let mut closes = ramp(300);
    closes[150] = 0.0;
    let instrument = Instrument::new("ZERO", "Zero", PriceSeries::from_closes(closes).unwrap());

    let report = build_report(&instrument, &ReportConfig::default());
    assert_eq!(report.failures().len(), 7);
}

#[test]
fn test_invalid_tail_config_only_fails_tail_metrics() {
    let instrument = Instrument::new("CFG", "Config", PriceSeries::from_closes(ramp(400)).unwrap());
    let mut config = ReportConfig::default();
    config.tail.alpha = 1.5;

    let report = build_report(&instrument, &config);
    let failed: Vec<&str> = report.failures().into_iter().map(|(key, _)| key).collect();
    assert_eq!(
        failed,
        vec![
            "Historical Value-at-Risk (VaR 97.5%)",
            "Expected Shortfall (ES)",
            "Peaks-over-Threshold (POT) VaR and ES",
        ]
    );
    assert!(report.hurst_exponent().value().is_some());
    assert!(report.maximum_drawdown().value().is_some());
}

#[test]
fn test_invalid_mfdfa_config_is_hard_error() {
    let instrument = Instrument::new("Q", "Duplicate q", PriceSeries::from_closes(ramp(400)).unwrap());
    let config = MfdfaConfig {
        q_values: vec![1.0, 1.0],
        ..MfdfaConfig::default()
    };
    assert!(matches!(
        instrument.mfdfa_spectrum_width(&config),
        Err(RiskAnalysisError::InvalidParameter { .. })
    ));
}

#[test]
fn test_hurst_window_too_large_for_series() {
    let instrument = Instrument::new("SHORT", "Short", PriceSeries::from_closes(ramp(30)).unwrap());
    let config = HurstConfig {
        min_window: 20,
        ..HurstConfig::default()
    };
    match instrument.hurst(&config) {
        Err(RiskAnalysisError::InsufficientData { required, actual }) => {
            assert_eq!(required, 40);
            assert_eq!(actual, 29);
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_missing_closes_do_not_break_returns() {
    let mut closes = ramp(200);
    closes[10] = f64::NAN;
    closes[11] = f64::NAN;
    let instrument = Instrument::new("GAP", "Gappy", PriceSeries::from_closes(closes).unwrap());
    assert_eq!(instrument.prices().len(), 200);
    assert_eq!(instrument.closes().len(), 198);
    assert_eq!(instrument.log_returns().unwrap().len(), 197);
    assert!(instrument
        .log_returns()
        .unwrap()
        .values()
        .iter()
        .all(|r| r.is_finite()));
}

#[test]
fn test_error_messages_are_readable() {
    let error = maximum_drawdown(&[1.0, 0.0]).unwrap_err();
    assert!(error.to_string().starts_with("Degenerate input"));
}
