//! Compensation statistics over market salary samples.

use serde::{Deserialize, Serialize};

/// p25 / median / p75 over a slice of salary samples (INR lakhs per annum).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompensationBenchmarks {
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub sample_size: usize,
}

/// Nearest-rank percentile on an ascending slice: the element at
/// `p * (n - 1)` rounded to the nearest index. Returns 0.0 for an empty slice.
///
/// This departs from a plain `floor(p * (n - 1))` rank when the fraction is
/// at least one half: p25 of `[10, 20, 30, 40]` is 20 here, not 10, and p75
/// of two samples is the larger one.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    let index = (p * (sorted.len() - 1) as f64).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Median of an ascending slice; even counts average the two middle values.
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Sorts the samples and computes benchmarks. Empty input gives all zeros.
pub fn compensation_benchmarks(samples: &[f64]) -> CompensationBenchmarks {
    if samples.is_empty() {
        return CompensationBenchmarks::default();
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    CompensationBenchmarks {
        p25: percentile(&sorted, 0.25),
        median: median(&sorted),
        p75: percentile(&sorted, 0.75),
        sample_size: sorted.len(),
    }
}
