//! Console output utilities
//!
//! Formatted summaries for interactive runs: table heads, pipeline reports,
//! and the per-metric overview.

use crate::algorithm::MetricOverview;
use crate::models::{PipelineReport, TimeSeriesTable};

/// Print the first rows of a loaded table, metric values by name
pub fn print_table_head(table: &TimeSeriesTable, num_rows: usize) {
    println!(
        "Table: {} rows, {} participants, {} metric columns",
        table.len(),
        table.participant_ids().len(),
        table.metric_names().count()
    );
    println!("First {num_rows} rows:");
    for obs in table.rows().take(num_rows) {
        print!(
            "  {} day {}: [",
            obs.participant_id, obs.day_offset
        );
        let mut first = true;
        for metric in table.metric_names() {
            if let Some(value) = obs.value(metric) {
                if !first {
                    print!(", ");
                }
                print!("{metric}: {value}");
                first = false;
            }
        }
        println!("]");
    }
}

/// Print a pipeline report summary with its skip accounting
pub fn print_report(label: &str, report: &PipelineReport) {
    println!("{label}:");
    println!("  Result rows: {}", report.results.len());
    println!("  Flagged: {}", report.flagged_count());
    println!("  Non-comparable: {}", report.non_comparable);
    println!("  Skipped records: {}", report.skipped);
}

/// Print the per-metric overview table
pub fn print_overview(overview: &[MetricOverview]) {
    println!("Per-metric overview:");
    for row in overview {
        println!(
            "  {}: {}/{} comparable, flagged share {:.1}%, mean delta {:.2}, mean pct {:.1}%",
            row.metric,
            row.n_comparable,
            row.n_rows,
            row.flagged_share * 100.0,
            row.mean_delta,
            row.mean_percent_delta
        );
    }
}
