//! Per-metric overview of a result set.
//!
//! Mirrors the high-level overview table the study produced after an event
//! run: for each metric, the share of comparable rows that flagged and the
//! average change measures.

use crate::models::ComparisonResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate figures for one metric across all result rows
#[derive(Debug, Clone, Serialize)]
pub struct MetricOverview {
    /// Metric column name
    pub metric: String,
    /// Total result rows for this metric
    pub n_rows: usize,
    /// Rows where both windows held observations
    pub n_comparable: usize,
    /// Flagged rows as a share of comparable rows, NaN when none comparable
    pub flagged_share: f64,
    /// Mean delta over comparable rows, NaN when none comparable
    pub mean_delta: f64,
    /// Mean percent delta over rows where it was defined
    pub mean_percent_delta: f64,
}

#[derive(Default)]
struct Accumulator {
    n_rows: usize,
    n_comparable: usize,
    n_flagged: usize,
    delta_sum: f64,
    delta_n: usize,
    percent_sum: f64,
    percent_n: usize,
}

/// Group result rows by metric and summarize them, sorted by metric name
#[must_use]
pub fn build_overview(results: &[ComparisonResult]) -> Vec<MetricOverview> {
    let mut by_metric: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for row in results {
        let acc = by_metric.entry(row.metric.as_str()).or_default();
        acc.n_rows += 1;
        let c = &row.comparison;
        if c.comparable {
            acc.n_comparable += 1;
            if c.flagged {
                acc.n_flagged += 1;
            }
            if !c.delta.is_nan() {
                acc.delta_sum += c.delta;
                acc.delta_n += 1;
            }
            if !c.percent_delta.is_nan() {
                acc.percent_sum += c.percent_delta;
                acc.percent_n += 1;
            }
        }
    }

    by_metric
        .into_iter()
        .map(|(metric, acc)| MetricOverview {
            metric: metric.to_string(),
            n_rows: acc.n_rows,
            n_comparable: acc.n_comparable,
            flagged_share: ratio(acc.n_flagged, acc.n_comparable),
            mean_delta: mean(acc.delta_sum, acc.delta_n),
            mean_percent_delta: mean(acc.percent_sum, acc.percent_n),
        })
        .collect()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

fn mean(sum: f64, n: usize) -> f64 {
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comparison, ComparisonAnchor, EventType, WindowSummary};

    fn row(metric: &str, comparable: bool, flagged: bool, delta: f64) -> ComparisonResult {
        ComparisonResult {
            participant_id: "P1".to_string(),
            anchor: ComparisonAnchor::Event {
                event_type: EventType::Infection,
                event_day: 30,
            },
            metric: metric.to_string(),
            comparison: Comparison {
                baseline: WindowSummary {
                    mean: 100.0,
                    stdev: 5.0,
                    n_obs: 4,
                },
                target: if comparable {
                    WindowSummary {
                        mean: 100.0 + delta,
                        stdev: 5.0,
                        n_obs: 3,
                    }
                } else {
                    WindowSummary::empty()
                },
                delta: if comparable { delta } else { f64::NAN },
                percent_delta: if comparable { delta } else { f64::NAN },
                change: if comparable { delta } else { f64::NAN },
                comparable,
                flagged,
            },
        }
    }

    #[test]
    fn overview_counts_shares_over_comparable_rows() {
        let results = vec![
            row("total_steps", true, true, -50.0),
            row("total_steps", true, false, -10.0),
            row("total_steps", false, false, 0.0),
            row("mean_hr", true, false, 2.0),
        ];
        let overview = build_overview(&results);
        assert_eq!(overview.len(), 2);

        // sorted by metric name
        assert_eq!(overview[0].metric, "mean_hr");
        let steps = &overview[1];
        assert_eq!(steps.n_rows, 3);
        assert_eq!(steps.n_comparable, 2);
        assert!((steps.flagged_share - 0.5).abs() < 1e-12);
        assert!((steps.mean_delta - -30.0).abs() < 1e-12);
    }

    #[test]
    fn empty_metric_group_yields_nan_shares() {
        let results = vec![row("sleep_duration", false, false, 0.0)];
        let overview = build_overview(&results);
        assert_eq!(overview[0].n_comparable, 0);
        assert!(overview[0].flagged_share.is_nan());
        assert!(overview[0].mean_delta.is_nan());
    }
}
