//! Domain models for the early-warning analysis.
//!
//! Value types only: observation rows, events, window summaries, and
//! comparison results. Pipelines in [`crate::algorithm`] own the logic.

pub mod event;
pub mod observation;
pub mod summary;
pub mod types;

pub use event::{CaregiverLink, ClinicalEvent};
pub use observation::{Observation, TimeSeriesTable};
pub use summary::{Comparison, ComparisonAnchor, ComparisonResult, PipelineReport, WindowSummary};
pub use types::{ChangeMeasure, EventType, FlagDirection};
