//! Caregiver-baseline comparison pipeline.
//!
//! Instead of event-relative windows, the baseline is a caregiver's
//! designated calendar period and the target is the patient's configured
//! post-transplant recovery range. Patients without a matched caregiver
//! record are skipped and counted, never aborting the run.

use crate::algorithm::aggregate::aggregate;
use crate::algorithm::compare::compare;
use crate::algorithm::window::extract_window;
use crate::config::CaregiverBaselineConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{
    CaregiverLink, ComparisonAnchor, ComparisonResult, PipelineReport, TimeSeriesTable,
};
use log::{info, warn};
use rustc_hash::FxHashMap;
use std::time::Instant;

/// Pipeline comparing patient recovery ranges against caregiver baselines
#[derive(Debug, Clone)]
pub struct BaselineComparisonPipeline {
    config: CaregiverBaselineConfig,
}

impl BaselineComparisonPipeline {
    /// Create a pipeline, rejecting invalid configuration up front
    pub fn new(config: CaregiverBaselineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Compare every linked patient against their caregiver's baseline.
    ///
    /// Result rows are ordered by (participant, metric). Patients with no
    /// linkage row, a malformed baseline period, or a caregiver absent from
    /// the caregiver table are skipped and counted.
    pub fn run(
        &self,
        patients: &TimeSeriesTable,
        caregivers: &TimeSeriesTable,
        links: &[CaregiverLink],
    ) -> Result<PipelineReport> {
        for metric in &self.config.settings.metrics {
            if !patients.has_metric(metric) {
                return Err(AnalysisError::Configuration(format!(
                    "configured metric '{metric}' is not a column of the patient table"
                )));
            }
        }

        let start_time = Instant::now();
        let mut link_by_patient: FxHashMap<&str, &CaregiverLink> = FxHashMap::default();
        for link in links {
            // First linkage row wins for duplicated patients
            link_by_patient
                .entry(link.participant_id.as_str())
                .or_insert(link);
        }

        let mut report = PipelineReport::default();
        for participant_id in patients.participant_ids() {
            let Some(link) = link_by_patient.get(participant_id) else {
                report.skipped += 1;
                continue;
            };
            if link.baseline_period.validate().is_err() {
                warn!(
                    "Skipping {participant_id}: inverted caregiver baseline period [{}, {}]",
                    link.baseline_period.start_offset, link.baseline_period.end_offset
                );
                report.skipped += 1;
                continue;
            }
            if !caregivers.has_participant(&link.caregiver_id) {
                warn!(
                    "Skipping {participant_id}: caregiver {} has no observations",
                    link.caregiver_id
                );
                report.skipped += 1;
                continue;
            }

            // Both windows are absolute day ranges, so the anchor is day 0
            let baseline_rows =
                extract_window(caregivers, &link.caregiver_id, 0, link.baseline_period);
            let patient_rows =
                extract_window(patients, participant_id, 0, self.config.patient_period);

            let settings = &self.config.settings;
            for metric in &settings.metrics {
                let baseline = aggregate(&baseline_rows, metric);
                let target = aggregate(&patient_rows, metric);
                let comparison = compare(
                    baseline,
                    target,
                    settings.change_measure,
                    settings.policy(metric),
                );
                if !comparison.comparable {
                    report.non_comparable += 1;
                }
                report.results.push(ComparisonResult {
                    participant_id: participant_id.to_string(),
                    anchor: ComparisonAnchor::CaregiverBaseline {
                        caregiver_id: link.caregiver_id.clone(),
                    },
                    metric: metric.clone(),
                    comparison,
                });
            }
        }

        // Participants come out sorted; only metrics may need reordering
        report
            .results
            .sort_by(|a, b| {
                a.participant_id
                    .cmp(&b.participant_id)
                    .then_with(|| a.metric.cmp(&b.metric))
            });

        info!(
            "Baseline pipeline: {} rows ({} patients skipped, {} non-comparable, {} flagged) in {:.2?}",
            report.results.len(),
            report.skipped,
            report.non_comparable,
            report.flagged_count(),
            start_time.elapsed()
        );
        Ok(report)
    }
}
