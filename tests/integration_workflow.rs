//! End-to-end report generation on synthetic price paths.

use fractal_risk::*;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use rand_distr::{StandardNormal, StudentT};

/// Geometric random walk with Student-t shocks, stamped one day apart.
fn heavy_tailed_prices(n: usize, seed: u64) -> PriceSeries {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let shocks = StudentT::new(4.0).unwrap();
    let mut price = 100.0f64;
    let observations = (0..n)
        .map(|i| {
            let shock: f64 = rng.sample(&shocks);
            price *= (0.0002 + 0.01 * shock).exp();
            (1_600_000_000 + 86_400 * i as i64, price)
        })
        .collect();
    PriceSeries::new(observations).unwrap()
}

fn gaussian_prices(n: usize, seed: u64) -> PriceSeries {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut price = 20.0f64;
    let closes = (0..n)
        .map(|_| {
            price *= (0.012 * rng.sample::<f64, _>(StandardNormal)).exp();
            price
        })
        .collect();
    PriceSeries::from_closes(closes).unwrap()
}

#[test]
fn test_full_report_on_heavy_tailed_series() {
    let instrument = Instrument::new("HTAIL", "Heavy Tail Corp", heavy_tailed_prices(2500, 42));
    let report = build_report(&instrument, &ReportConfig::default());

    assert_eq!(report.ticker(), "HTAIL");
    assert_eq!(report.name(), "Heavy Tail Corp");
    assert!(report.failures().is_empty(), "{:?}", report.failures());

    let hurst = report.hurst_exponent().value().unwrap();
    assert!(hurst > 0.3 && hurst < 0.8, "H = {}", hurst);

    let var = report.historical_var().value().unwrap();
    let es = report.expected_shortfall().value().unwrap();
    assert!(var < 0.0);
    assert!(es <= var);

    let (pot_var, pot_es) = report.pot_var_es().computed().unwrap();
    assert!(pot_var.value().unwrap().is_finite());
    assert!(pot_es.value().is_some());

    assert!(report.katz_fractal_dimension().value().unwrap() > 1.0);

    let drawdown = report.maximum_drawdown().value().unwrap();
    assert!(drawdown > 0.0 && drawdown < 1.0);

    assert!(report.mfdfa_spectrum_width().value().unwrap() >= 0.0);
}

#[test]
fn test_report_matches_individual_estimators() {
    let instrument = Instrument::new("GAUSS", "Gaussian Walk", gaussian_prices(1500, 8));
    let config = ReportConfig::default();
    let report = instrument.report(&config);

    let closes = instrument.closes().to_vec();
    let log_r = log_returns(&closes).unwrap();
    let simple_r = simple_returns(&closes).unwrap();

    assert_eq!(
        report.hurst_exponent().value(),
        Some(hurst_rs(&simple_r.without_zeros()).unwrap())
    );
    assert_eq!(
        report.historical_var().value(),
        Some(historical_var(log_r.values(), config.tail.alpha).unwrap())
    );
    assert_eq!(
        report.expected_shortfall().value(),
        Some(expected_shortfall(log_r.values(), config.tail.alpha).unwrap())
    );
    assert_eq!(
        report.katz_fractal_dimension().value(),
        Some(katz_fractal_dimension(log_r.values()).unwrap())
    );
    assert_eq!(
        report.maximum_drawdown().value(),
        Some(maximum_drawdown(&closes).unwrap())
    );

    let pot = pot_var_es(log_r.values(), &config.tail).unwrap();
    assert_eq!(report.pot_var_es().computed(), Some(&pot.pair()));
}

#[test]
fn test_batch_analysis_preserves_input_order() {
    let instruments: Vec<Instrument> = (0..4)
        .map(|i| {
            Instrument::new(
                format!("T{}", i),
                format!("Instrument {}", i),
                gaussian_prices(600, 100 + i as u64),
            )
        })
        .collect();

    let reports = analyze_instruments(&instruments, &ReportConfig::default());
    assert_eq!(reports.len(), 4);
    for (instrument, report) in instruments.iter().zip(&reports) {
        assert_eq!(report.ticker(), instrument.ticker());
        assert_eq!(
            format!("{:?}", report),
            format!("{:?}", build_report(instrument, &ReportConfig::default()))
        );
    }
}

#[test]
fn test_entries_use_report_keys() {
    let instrument = Instrument::new("KEYS", "Key Check", gaussian_prices(300, 1));
    let report = build_report(&instrument, &ReportConfig::default());
    let keys: Vec<&str> = report.entries().into_iter().map(|(key, _)| key).collect();
    assert_eq!(
        keys,
        vec![
            "ticker",
            "name",
            "Hurst exponent",
            "Historical Value-at-Risk (VaR 97.5%)",
            "Expected Shortfall (ES)",
            "Peaks-over-Threshold (POT) VaR and ES",
            "Katz Fractal Dimension",
            "Maximum Drawdown",
            "MFDFA Spectrum Width",
        ]
    );
    assert!(matches!(
        report.get("Maximum Drawdown"),
        Some(ReportField::Scalar(_))
    ));
    assert!(matches!(
        report.get("Peaks-over-Threshold (POT) VaR and ES"),
        Some(ReportField::Pair(_))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_report_serializes_with_exact_keys() {
    let instrument = Instrument::new("JSON", "Json Export", gaussian_prices(400, 3));
    let report = build_report(&instrument, &ReportConfig::default());
    let json = serde_json::to_value(&report).unwrap();
    let object = json.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = REPORT_KEYS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);

    assert_eq!(object["ticker"], "JSON");
    assert!(object["Maximum Drawdown"].is_number());
    assert_eq!(
        object["Peaks-over-Threshold (POT) VaR and ES"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
    // 399 returns leave scales 16 through 128 usable.
    assert!(object["MFDFA Spectrum Width"].is_number());
}
