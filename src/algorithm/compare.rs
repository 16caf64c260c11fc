//! Change comparison between a baseline and a target window summary.

use crate::config::MetricPolicy;
use crate::models::{ChangeMeasure, Comparison, FlagDirection, WindowSummary};

/// Compare a target summary against a baseline summary.
///
/// Degenerate measures (zero baseline mean for percent, zero or undefined
/// baseline stdev for standardized) yield NaN, never a division error and
/// never infinity. When either window is empty the row is non-comparable and
/// cannot flag; absence of data is never reported as "no change".
///
/// Flagging uses strict inequality: a change exactly at the threshold does
/// not flag.
#[must_use]
pub fn compare(
    baseline: WindowSummary,
    target: WindowSummary,
    measure: ChangeMeasure,
    policy: MetricPolicy,
) -> Comparison {
    let comparable = !baseline.is_empty() && !target.is_empty();

    let delta = if comparable {
        target.mean - baseline.mean
    } else {
        f64::NAN
    };

    let percent_delta = if comparable && baseline.mean != 0.0 {
        delta / baseline.mean.abs() * 100.0
    } else {
        f64::NAN
    };

    let change = match measure {
        ChangeMeasure::Absolute => delta,
        ChangeMeasure::Percent => percent_delta,
        ChangeMeasure::Standardized => {
            if comparable && baseline.stdev.is_finite() && baseline.stdev != 0.0 {
                delta / baseline.stdev
            } else {
                f64::NAN
            }
        }
    };

    let flagged = comparable
        && !change.is_nan()
        && match policy.direction {
            FlagDirection::DropOnly => change < policy.threshold,
            FlagDirection::EitherDirection => change.abs() > policy.threshold,
        };

    Comparison {
        baseline,
        target,
        delta,
        percent_delta,
        change,
        comparable,
        flagged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mean: f64, stdev: f64, n_obs: usize) -> WindowSummary {
        WindowSummary { mean, stdev, n_obs }
    }

    #[test]
    fn percent_drop_flags_past_threshold() {
        let baseline = summary(8050.0, 130.0, 4);
        let target = summary(3000.0, 100.0, 3);
        let result = compare(
            baseline,
            target,
            ChangeMeasure::Percent,
            MetricPolicy::drop_below(-30.0),
        );
        assert!(result.comparable);
        assert!((result.delta - -5050.0).abs() < 1e-9);
        assert!((result.percent_delta - -62.732_919_254_658_38).abs() < 1e-9);
        assert!(result.flagged);
    }

    #[test]
    fn threshold_boundary_does_not_flag() {
        // Exactly -30% against a -30 drop_only threshold
        let baseline = summary(100.0, 10.0, 5);
        let target = summary(70.0, 10.0, 5);
        let result = compare(
            baseline,
            target,
            ChangeMeasure::Percent,
            MetricPolicy::drop_below(-30.0),
        );
        assert!((result.percent_delta - -30.0).abs() < 1e-12);
        assert!(!result.flagged);

        // Strictly past it flags
        let target = summary(69.9, 10.0, 5);
        let result = compare(
            baseline,
            target,
            ChangeMeasure::Percent,
            MetricPolicy::drop_below(-30.0),
        );
        assert!(result.flagged);
    }

    #[test]
    fn either_direction_boundary_is_strict() {
        let baseline = summary(100.0, 10.0, 5);
        let policy = MetricPolicy::either_beyond(20.0);

        let at = compare(
            baseline,
            summary(120.0, 10.0, 5),
            ChangeMeasure::Absolute,
            policy,
        );
        assert!(!at.flagged);

        let above = compare(
            baseline,
            summary(121.0, 10.0, 5),
            ChangeMeasure::Absolute,
            policy,
        );
        assert!(above.flagged);

        let below = compare(
            baseline,
            summary(79.0, 10.0, 5),
            ChangeMeasure::Absolute,
            policy,
        );
        assert!(below.flagged);
    }

    #[test]
    fn drop_only_ignores_increases() {
        let baseline = summary(100.0, 10.0, 5);
        let target = summary(300.0, 10.0, 5);
        let result = compare(
            baseline,
            target,
            ChangeMeasure::Percent,
            MetricPolicy::drop_below(-30.0),
        );
        assert!(!result.flagged);
    }

    #[test]
    fn zero_baseline_mean_yields_nan_percent() {
        let baseline = summary(0.0, 1.0, 5);
        let target = summary(10.0, 1.0, 5);
        let result = compare(
            baseline,
            target,
            ChangeMeasure::Percent,
            MetricPolicy::drop_below(-30.0),
        );
        assert!(result.comparable);
        assert!(result.percent_delta.is_nan());
        assert!(result.change.is_nan());
        assert!(!result.flagged);
    }

    #[test]
    fn degenerate_stdev_yields_nan_standardized() {
        let target = summary(90.0, 5.0, 5);
        for stdev in [0.0, f64::NAN] {
            let baseline = summary(100.0, stdev, 5);
            let result = compare(
                baseline,
                target,
                ChangeMeasure::Standardized,
                MetricPolicy::drop_below(-0.5),
            );
            assert!(result.change.is_nan());
            assert!(!result.flagged);
        }
    }

    #[test]
    fn empty_window_is_non_comparable_and_never_flagged() {
        let baseline = summary(100.0, 10.0, 5);
        let result = compare(
            baseline,
            WindowSummary::empty(),
            ChangeMeasure::Percent,
            MetricPolicy::drop_below(-0.0001),
        );
        assert!(!result.comparable);
        assert!(!result.flagged);
        assert!(result.delta.is_nan());
        assert!(result.percent_delta.is_nan());
    }
}
