//! Clinical event records and caregiver linkage.

use crate::algorithm::window::Window;
use crate::models::types::EventType;
use serde::{Deserialize, Serialize};

/// A clinical event anchored in the participant's day-offset space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalEvent {
    /// Study participant the event belongs to
    pub participant_id: String,
    /// Kind of event
    pub event_type: EventType,
    /// Day of the event, relative to transplant day 0
    pub event_day: i32,
}

impl ClinicalEvent {
    /// Create a new event record
    #[must_use]
    pub fn new(participant_id: impl Into<String>, event_type: EventType, event_day: i32) -> Self {
        Self {
            participant_id: participant_id.into(),
            event_type,
            event_day,
        }
    }
}

/// Linkage between a patient and their caregiver's designated baseline period.
///
/// The baseline period is an absolute day range in the shared day-offset
/// space, not an offset relative to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverLink {
    /// Patient participant id
    pub participant_id: String,
    /// Caregiver participant id in the caregiver observation table
    pub caregiver_id: String,
    /// The caregiver's designated baseline day range
    pub baseline_period: Window,
}
