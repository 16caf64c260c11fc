//! Common domain type definitions
//!
//! This module contains the enum types shared across the analysis models:
//! event categories, change measures, and flagging directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a clinical event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Infection event (e.g., positive culture)
    Infection,
    /// Clinical outcome event (e.g., readmission, graft failure)
    Outcome,
}

impl EventType {
    /// Stable lowercase label used in output files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infection => "infection",
            Self::Outcome => "outcome",
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "outcome" => Self::Outcome,
            _ => Self::Infection,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change measure applied between a baseline and a target window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeMeasure {
    /// target mean minus baseline mean
    Absolute,
    /// (target mean - baseline mean) / |baseline mean| * 100
    Percent,
    /// (target mean - baseline mean) / baseline stdev
    Standardized,
}

impl fmt::Display for ChangeMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Absolute => "absolute",
            Self::Percent => "percent",
            Self::Standardized => "standardized",
        };
        f.write_str(label)
    }
}

/// Direction in which a change flags a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagDirection {
    /// Only a drop below a (negative) threshold flags
    DropOnly,
    /// A change of sufficient magnitude in either direction flags
    EitherDirection,
}
