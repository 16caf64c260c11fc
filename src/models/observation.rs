//! Daily observation rows and the in-memory time series table.

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// One participant-day of wearable measurements.
///
/// Metric values are stored sparsely: a metric that was not recorded for
/// this day is absent from the map, never stored as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Study participant identifier
    pub participant_id: String,
    /// Day relative to the participant's transplant (day 0)
    pub day_offset: i32,
    values: FxHashMap<String, f64>,
}

impl Observation {
    /// Create an empty observation for a participant-day
    #[must_use]
    pub fn new(participant_id: impl Into<String>, day_offset: i32) -> Self {
        Self {
            participant_id: participant_id.into(),
            day_offset,
            values: FxHashMap::default(),
        }
    }

    /// Record a metric value for this day, replacing any previous value
    pub fn set_value(&mut self, metric: &str, value: f64) {
        self.values.insert(metric.to_string(), value);
    }

    /// Look up a metric value; `None` means the metric is absent for this day
    #[must_use]
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }

    /// Number of metrics recorded for this day
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.values.len()
    }
}

/// Normalized in-memory table of daily observations.
///
/// Rows are keyed by (participant, day offset); inserting a metric value for
/// an existing participant-day merges into the same row, so the table holds
/// at most one observation per participant-day per metric.
#[derive(Debug, Default, Clone)]
pub struct TimeSeriesTable {
    rows: Vec<Observation>,
    row_index: FxHashMap<(String, i32), usize>,
    participant_index: FxHashMap<String, Vec<usize>>,
    metrics: BTreeSet<String>,
}

impl TimeSeriesTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a metric column as present in the source data.
    ///
    /// Presence is tracked separately from values so that a column that
    /// exists but is empty for every row still counts as a known metric.
    pub fn register_metric(&mut self, metric: &str) {
        self.metrics.insert(metric.to_string());
    }

    /// Record a metric value for a participant-day, creating the row if needed
    pub fn insert_value(&mut self, participant_id: &str, day_offset: i32, metric: &str, value: f64) {
        self.register_metric(metric);
        let idx = self.row_entry(participant_id, day_offset);
        self.rows[idx].set_value(metric, value);
    }

    /// Ensure a row exists for a participant-day and return its index
    fn row_entry(&mut self, participant_id: &str, day_offset: i32) -> usize {
        let key = (participant_id.to_string(), day_offset);
        if let Some(&idx) = self.row_index.get(&key) {
            return idx;
        }
        let idx = self.rows.len();
        self.rows.push(Observation::new(participant_id, day_offset));
        self.row_index.insert(key, idx);
        self.participant_index
            .entry(participant_id.to_string())
            .or_default()
            .push(idx);
        idx
    }

    /// Whether the source data carried the given metric column
    #[must_use]
    pub fn has_metric(&self, metric: &str) -> bool {
        self.metrics.contains(metric)
    }

    /// Known metric columns, sorted by name
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(String::as_str)
    }

    /// All rows for a participant, in insertion order
    pub fn participant_rows(&self, participant_id: &str) -> impl Iterator<Item = &Observation> {
        self.participant_index
            .get(participant_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.rows[idx])
    }

    /// Whether the table holds any rows for a participant
    #[must_use]
    pub fn has_participant(&self, participant_id: &str) -> bool {
        self.participant_index.contains_key(participant_id)
    }

    /// Distinct participant ids, sorted for deterministic iteration
    #[must_use]
    pub fn participant_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.participant_index.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Total number of participant-day rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in insertion order
    pub fn rows(&self) -> impl Iterator<Item = &Observation> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_merges_same_participant_day() {
        let mut table = TimeSeriesTable::new();
        table.insert_value("P1", 5, "total_steps", 8000.0);
        table.insert_value("P1", 5, "mean_hr", 72.0);
        table.insert_value("P1", 6, "total_steps", 7500.0);

        assert_eq!(table.len(), 2);
        let row = table.participant_rows("P1").next().unwrap();
        assert_eq!(row.value("total_steps"), Some(8000.0));
        assert_eq!(row.value("mean_hr"), Some(72.0));
        assert_eq!(row.value("sleep_duration"), None);
    }

    #[test]
    fn registered_metric_is_known_even_without_values() {
        let mut table = TimeSeriesTable::new();
        table.register_metric("sleep_duration");
        assert!(table.has_metric("sleep_duration"));
        assert!(!table.has_metric("total_steps"));
    }

    #[test]
    fn participant_ids_are_sorted() {
        let mut table = TimeSeriesTable::new();
        table.insert_value("P2", 0, "total_steps", 1.0);
        table.insert_value("P1", 0, "total_steps", 2.0);
        assert_eq!(table.participant_ids(), vec!["P1", "P2"]);
    }
}
