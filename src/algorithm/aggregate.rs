//! Per-window aggregation of metric values.

use crate::models::{Observation, WindowSummary};

/// Reduce a window's observations to summary statistics for one metric.
///
/// Absent values are dropped, not treated as zero. The standard deviation
/// uses the sample (n-1) denominator and is NaN below two values.
#[must_use]
pub fn aggregate(observations: &[&Observation], metric: &str) -> WindowSummary {
    let values: Vec<f64> = observations
        .iter()
        .filter_map(|obs| obs.value(metric))
        .collect();

    if values.is_empty() {
        return WindowSummary::empty();
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let stdev = if n >= 2 {
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    WindowSummary {
        mean,
        stdev,
        n_obs: n,
    }
}
