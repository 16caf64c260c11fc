//! Windowing, aggregation, comparison, and the two analysis pipelines.

pub mod aggregate;
pub mod baseline_pipeline;
pub mod compare;
pub mod event_pipeline;
pub mod overview;
pub mod window;

pub use aggregate::aggregate;
pub use baseline_pipeline::BaselineComparisonPipeline;
pub use compare::compare;
pub use event_pipeline::EventWindowPipeline;
pub use overview::{MetricOverview, build_overview};
pub use window::{Window, extract_window};
