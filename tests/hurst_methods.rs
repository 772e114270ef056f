use fractal_risk::{estimate_hurst_rescaled_range, HurstConfig, Instrument, PriceSeries};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use rand_distr::StandardNormal;

fn white_noise(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
}

fn ar1(n: usize, phi: f64, seed: u64) -> Vec<f64> {
    let shocks = white_noise(n, seed);
    let mut previous = 0.0;
    shocks
        .into_iter()
        .map(|e| {
            previous = phi * previous + e;
            previous
        })
        .collect()
}

fn short_sweep() -> HurstConfig {
    HurstConfig {
        max_window: Some(256),
        ..HurstConfig::default()
    }
}

#[test]
fn test_white_noise_has_no_memory() {
    let estimate = estimate_hurst_rescaled_range(&white_noise(1024, 7), &short_sweep()).unwrap();
    assert!(
        estimate.hurst > 0.4 && estimate.hurst < 0.72,
        "white noise gave H = {}",
        estimate.hurst
    );
    assert_eq!(estimate.window_sizes.first(), Some(&8));
    assert_eq!(estimate.window_sizes.last(), Some(&256));
}

#[test]
fn test_persistent_series_exceeds_white_noise() {
    let config = short_sweep();
    let noise = estimate_hurst_rescaled_range(&white_noise(1024, 11), &config).unwrap();
    let persistent = estimate_hurst_rescaled_range(&ar1(1024, 0.9, 11), &config).unwrap();
    assert!(persistent.hurst > 0.65, "AR(1) gave H = {}", persistent.hurst);
    assert!(persistent.hurst > noise.hurst);
}

#[test]
fn test_rs_values_grow_with_window() {
    let estimate = estimate_hurst_rescaled_range(&white_noise(512, 3), &short_sweep()).unwrap();
    let first = estimate.rs_values[0];
    let last = estimate.rs_values[estimate.rs_values.len() - 1];
    assert!(last > first);
    assert!(estimate.rs_values.iter().all(|rs| rs.is_finite() && *rs > 0.0));
}

#[test]
fn test_instrument_hurst_skips_zero_returns() {
    // Every other close repeats, so half the simple returns are exactly zero.
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let mut price = 100.0f64;
    let mut closes = Vec::with_capacity(1200);
    for _ in 0..600 {
        price *= (0.01 * rng.sample::<f64, _>(StandardNormal)).exp();
        closes.push(price);
        closes.push(price);
    }
    let instrument = Instrument::new("ZERO", "Stale Quotes", PriceSeries::from_closes(closes).unwrap());

    let non_zero = instrument.simple_returns().unwrap().without_zeros();
    assert!(non_zero.len() < 700);

    let direct = estimate_hurst_rescaled_range(&non_zero, &HurstConfig::default()).unwrap();
    let via_instrument = instrument.hurst(&HurstConfig::default()).unwrap();
    assert_eq!(direct.hurst, via_instrument);
}
