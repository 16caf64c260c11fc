//! CSV export of result rows and overview tables.
//!
//! Undefined statistics (NaN) are written as empty cells so downstream
//! spreadsheet/plotting tools treat them as missing rather than as text.

use crate::algorithm::MetricOverview;
use crate::error::Result;
use crate::models::{ComparisonAnchor, ComparisonResult};
use log::info;
use std::path::Path;

/// Write the ordered comparison rows to a CSV file
pub fn write_results(path: &Path, results: &[ComparisonResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "STUDY_PRTCPT_ID",
        "anchor",
        "event_day",
        "metric",
        "baseline_mean",
        "baseline_sd",
        "baseline_n",
        "target_mean",
        "target_sd",
        "target_n",
        "delta",
        "percent_delta",
        "change",
        "comparable",
        "flagged",
    ])?;

    for row in results {
        let event_day = match &row.anchor {
            ComparisonAnchor::Event { event_day, .. } => event_day.to_string(),
            ComparisonAnchor::CaregiverBaseline { .. } => String::new(),
        };
        let c = &row.comparison;
        writer.write_record([
            row.participant_id.clone(),
            row.anchor.to_string(),
            event_day,
            row.metric.clone(),
            fmt_stat(c.baseline.mean),
            fmt_stat(c.baseline.stdev),
            c.baseline.n_obs.to_string(),
            fmt_stat(c.target.mean),
            fmt_stat(c.target.stdev),
            c.target.n_obs.to_string(),
            fmt_stat(c.delta),
            fmt_stat(c.percent_delta),
            fmt_stat(c.change),
            c.comparable.to_string(),
            c.flagged.to_string(),
        ])?;
    }
    writer.flush()?;

    info!("Wrote {} result rows to {}", results.len(), path.display());
    Ok(())
}

/// Write the per-metric overview to a CSV file
pub fn write_overview(path: &Path, overview: &[MetricOverview]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "metric",
        "n_rows",
        "n_comparable",
        "flagged_share",
        "mean_delta",
        "mean_percent_delta",
    ])?;
    for row in overview {
        writer.write_record([
            row.metric.clone(),
            row.n_rows.to_string(),
            row.n_comparable.to_string(),
            fmt_stat(row.flagged_share),
            fmt_stat(row.mean_delta),
            fmt_stat(row.mean_percent_delta),
        ])?;
    }
    writer.flush()?;

    info!("Wrote overview for {} metrics to {}", overview.len(), path.display());
    Ok(())
}

fn fmt_stat(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
