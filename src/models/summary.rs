//! Window summaries and comparison result records.

use crate::models::types::EventType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregated statistics for one metric over one window of observations.
///
/// An empty summary (no observations carried the metric) has `n_obs = 0` and
/// NaN statistics; downstream code must check `n_obs` before trusting `mean`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Arithmetic mean of the collected values, NaN when empty
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator), NaN when `n_obs < 2`
    pub stdev: f64,
    /// Number of non-absent values in the window
    pub n_obs: usize,
}

impl WindowSummary {
    /// Summary of a window with no observations
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            mean: f64::NAN,
            stdev: f64::NAN,
            n_obs: 0,
        }
    }

    /// Whether the window carried no values for the metric
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n_obs == 0
    }
}

/// What a comparison row is anchored on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonAnchor {
    /// Windows relative to a clinical event day
    Event {
        /// Kind of event
        event_type: EventType,
        /// Event day in the shared day-offset space
        event_day: i32,
    },
    /// Caregiver's designated baseline period vs the patient's recovery range
    CaregiverBaseline {
        /// Caregiver participant id
        caregiver_id: String,
    },
}

impl fmt::Display for ComparisonAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event {
                event_type,
                event_day,
            } => write!(f, "{event_type}@{event_day}"),
            Self::CaregiverBaseline { caregiver_id } => write!(f, "caregiver:{caregiver_id}"),
        }
    }
}

/// Outcome of comparing a target window against a baseline window
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Comparison {
    /// Baseline window statistics
    pub baseline: WindowSummary,
    /// Target (pre-event or recovery) window statistics
    pub target: WindowSummary,
    /// target mean - baseline mean, NaN when not comparable
    pub delta: f64,
    /// Percent change vs |baseline mean|, NaN when baseline mean is 0
    pub percent_delta: f64,
    /// Value of the configured change measure, NaN when undefined
    pub change: f64,
    /// Whether both windows held at least one observation
    pub comparable: bool,
    /// Whether the change measure strictly crossed the configured threshold
    pub flagged: bool,
}

/// One result row per (participant, anchor, metric) triple.
///
/// Created once by a pipeline run and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Study participant the row belongs to
    pub participant_id: String,
    /// Event or baseline-period the windows were anchored on
    pub anchor: ComparisonAnchor,
    /// Metric column that was compared
    pub metric: String,
    /// The windowed comparison itself
    pub comparison: Comparison,
}

/// Result set of one pipeline run, with the skip accounting the run
/// must surface so silent data loss stays visible.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Ordered comparison rows
    pub results: Vec<ComparisonResult>,
    /// Events or patients skipped for missing linkage/observations
    pub skipped: usize,
    /// Emitted rows where at least one window was empty
    pub non_comparable: usize,
}

impl PipelineReport {
    /// Number of flagged rows in the result set
    #[must_use]
    pub fn flagged_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.comparison.flagged)
            .count()
    }
}
