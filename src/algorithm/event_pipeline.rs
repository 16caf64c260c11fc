//! Event-centered windowing pipeline.
//!
//! For every (participant, event) pair this extracts a baseline window and a
//! pre-event window around the event day, aggregates each configured metric,
//! and compares the two summaries. One result row is emitted per
//! (participant, event, metric) triple. Failures are isolated per record:
//! an event without observations is counted and skipped, never aborting the
//! run. Only configuration errors are fatal.

use crate::algorithm::aggregate::aggregate;
use crate::algorithm::compare::compare;
use crate::algorithm::window::extract_window;
use crate::config::EventAnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{
    ClinicalEvent, ComparisonAnchor, ComparisonResult, PipelineReport, TimeSeriesTable,
};
use crate::utils::progress::create_main_progress_bar;
use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::time::Instant;

/// Pipeline comparing pre-event windows against event-relative baselines
#[derive(Debug, Clone)]
pub struct EventWindowPipeline {
    config: EventAnalysisConfig,
}

impl EventWindowPipeline {
    // Below this many events the parallel path is not worth spawning
    const PARALLEL_THRESHOLD: usize = 256;

    /// Create a pipeline, rejecting invalid configuration up front
    pub fn new(config: EventAnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Process every (participant, event, metric) triple against the table.
    ///
    /// Result rows are ordered by (participant, event day, event type,
    /// metric); re-running on unmodified inputs reproduces the sequence
    /// bit for bit.
    pub fn run(
        &self,
        table: &TimeSeriesTable,
        events: &[ClinicalEvent],
    ) -> Result<PipelineReport> {
        for metric in &self.config.settings.metrics {
            if !table.has_metric(metric) {
                return Err(AnalysisError::Configuration(format!(
                    "configured metric '{metric}' is not a column of the observation table"
                )));
            }
        }

        let start_time = Instant::now();
        let ordered: Vec<&ClinicalEvent> = events
            .iter()
            .sorted_by(|a, b| {
                a.participant_id
                    .cmp(&b.participant_id)
                    .then(a.event_day.cmp(&b.event_day))
                    .then(a.event_type.cmp(&b.event_type))
            })
            .collect();

        let pb = create_main_progress_bar(ordered.len() as u64, Some("comparing event windows"));
        let use_parallel =
            self.config.use_parallel && ordered.len() >= Self::PARALLEL_THRESHOLD;

        let per_event: Vec<Option<Vec<ComparisonResult>>> = if use_parallel {
            ordered
                .par_iter()
                .map(|&event| {
                    let rows = self.process_event(table, event);
                    pb.inc(1);
                    rows
                })
                .collect()
        } else {
            ordered
                .iter()
                .map(|&event| {
                    let rows = self.process_event(table, event);
                    pb.inc(1);
                    rows
                })
                .collect()
        };
        pb.finish_and_clear();

        let mut report = PipelineReport::default();
        for outcome in per_event {
            match outcome {
                None => report.skipped += 1,
                Some(rows) => {
                    report.non_comparable +=
                        rows.iter().filter(|r| !r.comparison.comparable).count();
                    report.results.extend(rows);
                }
            }
        }
        report.results.sort_by(compare_event_rows);

        info!(
            "Event pipeline: {} rows from {} events ({} skipped, {} non-comparable, {} flagged) in {:.2?}",
            report.results.len(),
            ordered.len(),
            report.skipped,
            report.non_comparable,
            report.flagged_count(),
            start_time.elapsed()
        );
        Ok(report)
    }

    /// Compare all configured metrics around one event.
    ///
    /// Returns `None` when the participant has no observations at all;
    /// windows that are merely empty still emit non-comparable rows.
    fn process_event(
        &self,
        table: &TimeSeriesTable,
        event: &ClinicalEvent,
    ) -> Option<Vec<ComparisonResult>> {
        if !table.has_participant(&event.participant_id) {
            return None;
        }

        let baseline_rows = extract_window(
            table,
            &event.participant_id,
            event.event_day,
            self.config.baseline_window,
        );
        let pre_event_rows = extract_window(
            table,
            &event.participant_id,
            event.event_day,
            self.config.pre_event_window,
        );

        let settings = &self.config.settings;
        let mut rows = Vec::with_capacity(settings.metrics.len());
        for metric in &settings.metrics {
            let baseline = aggregate(&baseline_rows, metric);
            let target = aggregate(&pre_event_rows, metric);
            let comparison = compare(
                baseline,
                target,
                settings.change_measure,
                settings.policy(metric),
            );
            rows.push(ComparisonResult {
                participant_id: event.participant_id.clone(),
                anchor: ComparisonAnchor::Event {
                    event_type: event.event_type,
                    event_day: event.event_day,
                },
                metric: metric.clone(),
                comparison,
            });
        }
        Some(rows)
    }
}

/// Deterministic (participant, event day, event type, metric) row order
fn compare_event_rows(a: &ComparisonResult, b: &ComparisonResult) -> Ordering {
    let key = |r: &ComparisonResult| match &r.anchor {
        ComparisonAnchor::Event {
            event_type,
            event_day,
        } => (*event_day, *event_type),
        // This pipeline never emits caregiver anchors
        ComparisonAnchor::CaregiverBaseline { .. } => unreachable!("event pipeline anchor"),
    };
    a.participant_id
        .cmp(&b.participant_id)
        .then_with(|| key(a).cmp(&key(b)))
        .then_with(|| a.metric.cmp(&b.metric))
}
