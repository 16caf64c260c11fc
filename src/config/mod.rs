//! Configuration for the analysis pipelines.
//!
//! All knobs the original study scripts kept as constants near the top of a
//! file live here as explicit, validated structures: window offsets, the
//! metric set, per-metric thresholds, and the change measure. Validation
//! happens at pipeline construction; a structural error invalidates every
//! subsequent result and aborts the run.

use crate::algorithm::window::Window;
use crate::error::{AnalysisError, Result};
use crate::models::{ChangeMeasure, FlagDirection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Threshold policy for a single metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPolicy {
    /// Flagging threshold in the units of the configured change measure
    pub threshold: f64,
    /// Direction in which the change flags
    pub direction: FlagDirection,
}

impl MetricPolicy {
    /// Flag when the change drops strictly below a (negative) threshold
    #[must_use]
    pub const fn drop_below(threshold: f64) -> Self {
        Self {
            threshold,
            direction: FlagDirection::DropOnly,
        }
    }

    /// Flag when the change magnitude strictly exceeds a threshold
    #[must_use]
    pub const fn either_beyond(threshold: f64) -> Self {
        Self {
            threshold,
            direction: FlagDirection::EitherDirection,
        }
    }
}

/// Metric set, thresholds, and change measure shared by both pipelines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSettings {
    /// Metric columns to compare
    pub metrics: Vec<String>,
    /// Per-metric threshold policies; every configured metric needs one
    pub policies: BTreeMap<String, MetricPolicy>,
    /// Change measure applied between baseline and target means
    pub change_measure: ChangeMeasure,
}

impl ComparisonSettings {
    /// Check the metric set and its threshold policies
    pub fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(AnalysisError::Configuration(
                "no metrics configured".to_string(),
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for metric in &self.metrics {
            if !seen.insert(metric.as_str()) {
                return Err(AnalysisError::Configuration(format!(
                    "metric '{metric}' configured twice"
                )));
            }
            if !self.policies.contains_key(metric) {
                return Err(AnalysisError::Configuration(format!(
                    "metric '{metric}' has no threshold policy"
                )));
            }
        }
        Ok(())
    }

    /// Policy for a configured metric; only valid after [`Self::validate`]
    #[must_use]
    pub fn policy(&self, metric: &str) -> MetricPolicy {
        self.policies[metric]
    }
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            policies: BTreeMap::new(),
            change_measure: ChangeMeasure::Percent,
        }
    }
}

/// Configuration for the event-centered pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAnalysisConfig {
    /// Baseline window relative to the event day
    pub baseline_window: Window,
    /// Pre-event window relative to the event day
    pub pre_event_window: Window,
    /// Metric set and thresholds
    pub settings: ComparisonSettings,
    /// Process events in parallel; never changes ordering or flags
    #[serde(default)]
    pub use_parallel: bool,
}

impl EventAnalysisConfig {
    /// Reject inverted or overlapping windows and bad metric settings
    pub fn validate(&self) -> Result<()> {
        self.baseline_window.validate()?;
        self.pre_event_window.validate()?;
        if self.baseline_window.overlaps(&self.pre_event_window) {
            return Err(AnalysisError::Configuration(format!(
                "baseline window [{}, {}] overlaps pre-event window [{}, {}]",
                self.baseline_window.start_offset,
                self.baseline_window.end_offset,
                self.pre_event_window.start_offset,
                self.pre_event_window.end_offset
            )));
        }
        self.settings.validate()
    }
}

impl Default for EventAnalysisConfig {
    fn default() -> Self {
        Self {
            baseline_window: Window::new(-30, -14),
            pre_event_window: Window::new(-7, -1),
            settings: ComparisonSettings::default(),
            use_parallel: false,
        }
    }
}

/// Configuration for the caregiver-baseline pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaregiverBaselineConfig {
    /// Patient recovery range as absolute post-transplant days (anchor 0)
    pub patient_period: Window,
    /// Metric set and thresholds
    pub settings: ComparisonSettings,
}

impl CaregiverBaselineConfig {
    /// Reject an inverted patient period and bad metric settings
    pub fn validate(&self) -> Result<()> {
        self.patient_period.validate()?;
        self.settings.validate()
    }
}

impl Default for CaregiverBaselineConfig {
    fn default() -> Self {
        Self {
            patient_period: Window::new(0, 90),
            settings: ComparisonSettings::default(),
        }
    }
}

/// On-disk run configuration consumed by the batch binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Day-level physiological/behavioral observation table
    pub observations_csv: PathBuf,
    /// Infection event table (optional)
    #[serde(default)]
    pub infection_events_csv: Option<PathBuf>,
    /// Outcome event table (optional)
    #[serde(default)]
    pub outcome_events_csv: Option<PathBuf>,
    /// Demographics table carrying transplant dates, used to convert raw
    /// event dates into day offsets (optional)
    #[serde(default)]
    pub demographics_csv: Option<PathBuf>,
    /// Caregiver day-level observation table (optional)
    #[serde(default)]
    pub caregiver_observations_csv: Option<PathBuf>,
    /// Patient-to-caregiver linkage table (optional)
    #[serde(default)]
    pub caregiver_links_csv: Option<PathBuf>,
    /// Directory for exported result files
    pub output_dir: PathBuf,
    /// Event-centered pipeline configuration
    pub event: EventAnalysisConfig,
    /// Caregiver-baseline pipeline configuration (optional)
    #[serde(default)]
    pub baseline: Option<CaregiverBaselineConfig>,
}

impl RunConfig {
    /// Read and parse a JSON run configuration
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config)
    }
}
