//! Event-centered windowing and comparison engine for transplant wearable
//! study data.
//!
//! Daily wearable observations are aligned against clinical event logs to
//! detect pre-event signal changes (the [`algorithm::EventWindowPipeline`])
//! and to compare patient recovery trajectories against caregiver baselines
//! (the [`algorithm::BaselineComparisonPipeline`]). CSV loading, console
//! reporting, and flat-file export wrap the windowing core.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{
    CaregiverBaselineConfig, ComparisonSettings, EventAnalysisConfig, MetricPolicy, RunConfig,
};
pub use error::{AnalysisError, Result};
pub use models::{
    CaregiverLink, ChangeMeasure, ClinicalEvent, Comparison, ComparisonAnchor, ComparisonResult,
    EventType, FlagDirection, Observation, PipelineReport, TimeSeriesTable, WindowSummary,
};

// Windowing and pipelines
pub use algorithm::{
    BaselineComparisonPipeline, EventWindowPipeline, MetricOverview, Window, aggregate,
    build_overview, compare, extract_window,
};

// Loading and export
pub use export::{write_overview, write_results};
pub use loader::{load_caregiver_links, load_events, load_observations, load_transplant_dates};
