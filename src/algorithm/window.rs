//! Day-offset windows and window extraction.
//!
//! A window is an inclusive range of day offsets relative to an anchor day
//! (an event day, or day 0 for absolute post-transplant ranges). Extraction
//! is a read-only projection of the time series table.

use crate::error::{AnalysisError, Result};
use crate::models::{Observation, TimeSeriesTable};
use serde::{Deserialize, Serialize};

/// Inclusive range of day offsets relative to an anchor day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// First day of the window, relative to the anchor
    pub start_offset: i32,
    /// Last day of the window, relative to the anchor
    pub end_offset: i32,
}

impl Window {
    /// Create a window without validating it
    #[must_use]
    pub const fn new(start_offset: i32, end_offset: i32) -> Self {
        Self {
            start_offset,
            end_offset,
        }
    }

    /// Reject inverted windows (start after end)
    pub fn validate(&self) -> Result<()> {
        if self.start_offset > self.end_offset {
            return Err(AnalysisError::Configuration(format!(
                "inverted window: start {} is after end {}",
                self.start_offset, self.end_offset
            )));
        }
        Ok(())
    }

    /// Whether two windows share any day offset
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_offset <= other.end_offset && other.start_offset <= self.end_offset
    }

    /// Whether a day offset falls inside the window anchored at `anchor_day`
    #[must_use]
    pub const fn contains(&self, anchor_day: i32, day_offset: i32) -> bool {
        day_offset >= anchor_day + self.start_offset && day_offset <= anchor_day + self.end_offset
    }

    /// Number of days covered by the window
    #[must_use]
    pub const fn span_days(&self) -> i64 {
        self.end_offset as i64 - self.start_offset as i64 + 1
    }
}

/// Extract a participant's observations inside a window anchored at a day.
///
/// Returns an empty vector when nothing matches; missing wearable-days are a
/// normal outcome, not an error.
#[must_use]
pub fn extract_window<'a>(
    table: &'a TimeSeriesTable,
    participant_id: &str,
    anchor_day: i32,
    window: Window,
) -> Vec<&'a Observation> {
    table
        .participant_rows(participant_id)
        .filter(|obs| window.contains(anchor_day, obs.day_offset))
        .collect()
}
