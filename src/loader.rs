//! CSV ingestion for the study's day-level tables.
//!
//! Loading follows the cleaning rules of the study's data-preparation
//! scripts: participant ids and cells are whitespace-trimmed, day offsets
//! and metric cells are coerced leniently (unparseable means absent, never
//! fatal), and rows with an unusable key are skipped and counted. Event
//! files may carry raw calendar dates, which are converted to day offsets
//! via per-participant transplant dates.

use crate::algorithm::window::Window;
use crate::error::{AnalysisError, Result};
use crate::models::{CaregiverLink, ClinicalEvent, EventType, TimeSeriesTable};
use chrono::NaiveDate;
use csv::StringRecord;
use log::{info, warn};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::time::Instant;

/// Participant key column shared by every input table
pub const PARTICIPANT_COL: &str = "STUDY_PRTCPT_ID";
/// Day-offset column of observation and event tables
pub const DAY_COL: &str = "DaysFromTransplant";
/// Alternative event-day column used by raw infection files
pub const CULTURE_DATE_COL: &str = "date_culture_drawn";
/// Transplant date column of the demographics table
pub const TRANSPLANT_DATE_COL: &str = "transplant_date";
/// Caregiver key column of the linkage table
pub const CAREGIVER_COL: &str = "CAREGIVER_ID";
/// Baseline period columns of the linkage table
pub const BASELINE_START_COL: &str = "baseline_start";
/// End of the caregiver baseline period
pub const BASELINE_END_COL: &str = "baseline_end";

/// Loaded observation table plus skip accounting
#[derive(Debug)]
pub struct TableLoad {
    /// The normalized table
    pub table: TimeSeriesTable,
    /// Rows dropped for a missing or unparseable key
    pub skipped_rows: usize,
}

/// Loaded event list plus skip accounting
#[derive(Debug)]
pub struct EventLoad {
    /// Events with resolved day offsets
    pub events: Vec<ClinicalEvent>,
    /// Rows dropped for a missing or unresolvable event day
    pub skipped_rows: usize,
}

/// Loaded caregiver linkage plus skip accounting
#[derive(Debug)]
pub struct LinkLoad {
    /// Patient-to-caregiver links
    pub links: Vec<CaregiverLink>,
    /// Rows dropped for missing keys or an unparseable period
    pub skipped_rows: usize,
}

/// Load a day-level observation CSV into a [`TimeSeriesTable`].
///
/// Every non-key column is treated as a metric column. The
/// `sleep_efficiency` ratio is derived only when both of its source columns
/// exist; a zero or absent denominator leaves the value absent.
pub fn load_observations(path: &Path) -> Result<TableLoad> {
    let start_time = Instant::now();
    let mut reader = csv_reader(path)?;
    let headers = reader.headers()?.clone();
    let participant_idx = find_column(&headers, PARTICIPANT_COL, path)?;
    let day_idx = find_column(&headers, DAY_COL, path)?;

    let mut table = TimeSeriesTable::new();
    for (idx, name) in headers.iter().enumerate() {
        if idx != participant_idx && idx != day_idx && !name.is_empty() {
            table.register_metric(name);
        }
    }

    let mut skipped_rows = 0;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed row in {}: {e}", path.display());
                skipped_rows += 1;
                continue;
            }
        };
        let Some((participant_id, day_offset)) = row_key(&record, participant_idx, day_idx)
        else {
            skipped_rows += 1;
            continue;
        };
        for (idx, cell) in record.iter().enumerate() {
            if idx == participant_idx || idx == day_idx {
                continue;
            }
            if let (Some(metric), Ok(value)) = (headers.get(idx), cell.trim().parse::<f64>()) {
                if value.is_finite() {
                    table.insert_value(participant_id, day_offset, metric, value);
                }
            }
        }
    }

    derive_sleep_efficiency(&mut table);

    info!(
        "Loaded {} observation rows for {} participants from {} ({} skipped) in {:.2?}",
        table.len(),
        table.participant_ids().len(),
        path.display(),
        skipped_rows,
        start_time.elapsed()
    );
    Ok(TableLoad {
        table,
        skipped_rows,
    })
}

/// Load a clinical event CSV.
///
/// The event day is taken from the `DaysFromTransplant` column, falling back
/// to `date_culture_drawn` for raw infection files. A cell holding a
/// calendar date is converted to a day offset through the participant's
/// transplant date when one is supplied; rows that cannot be resolved are
/// skipped and counted.
pub fn load_events(
    path: &Path,
    event_type: EventType,
    transplant_dates: Option<&FxHashMap<String, NaiveDate>>,
) -> Result<EventLoad> {
    let mut reader = csv_reader(path)?;
    let headers = reader.headers()?.clone();
    let participant_idx = find_column(&headers, PARTICIPANT_COL, path)?;
    let day_idx = headers
        .iter()
        .position(|h| h == DAY_COL)
        .or_else(|| headers.iter().position(|h| h == CULTURE_DATE_COL))
        .ok_or_else(|| AnalysisError::MissingColumn {
            column: DAY_COL.to_string(),
            path: path.display().to_string(),
        })?;

    let mut events = Vec::new();
    let mut skipped_rows = 0;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed row in {}: {e}", path.display());
                skipped_rows += 1;
                continue;
            }
        };
        let participant_id = record.get(participant_idx).unwrap_or("").trim();
        if participant_id.is_empty() {
            skipped_rows += 1;
            continue;
        }
        let cell = record.get(day_idx).unwrap_or("").trim();
        let event_day = parse_day(cell).or_else(|| {
            let date = cell.parse::<NaiveDate>().ok()?;
            let transplant = transplant_dates?.get(participant_id)?;
            i32::try_from((date - *transplant).num_days()).ok()
        });
        match event_day {
            Some(day) => events.push(ClinicalEvent::new(participant_id, event_type, day)),
            None => skipped_rows += 1,
        }
    }

    info!(
        "Loaded {} {event_type} events from {} ({} skipped)",
        events.len(),
        path.display(),
        skipped_rows
    );
    Ok(EventLoad {
        events,
        skipped_rows,
    })
}

/// Load per-participant transplant dates from a demographics CSV
pub fn load_transplant_dates(path: &Path) -> Result<FxHashMap<String, NaiveDate>> {
    let mut reader = csv_reader(path)?;
    let headers = reader.headers()?.clone();
    let participant_idx = find_column(&headers, PARTICIPANT_COL, path)?;
    let date_idx = find_column(&headers, TRANSPLANT_DATE_COL, path)?;

    let mut dates = FxHashMap::default();
    for record in reader.records() {
        let Ok(record) = record else { continue };
        let participant_id = record.get(participant_idx).unwrap_or("").trim();
        let Ok(date) = record.get(date_idx).unwrap_or("").trim().parse::<NaiveDate>() else {
            continue;
        };
        if !participant_id.is_empty() {
            dates.entry(participant_id.to_string()).or_insert(date);
        }
    }
    info!(
        "Loaded transplant dates for {} participants from {}",
        dates.len(),
        path.display()
    );
    Ok(dates)
}

/// Load the patient-to-caregiver linkage CSV
pub fn load_caregiver_links(path: &Path) -> Result<LinkLoad> {
    let mut reader = csv_reader(path)?;
    let headers = reader.headers()?.clone();
    let participant_idx = find_column(&headers, PARTICIPANT_COL, path)?;
    let caregiver_idx = find_column(&headers, CAREGIVER_COL, path)?;
    let start_idx = find_column(&headers, BASELINE_START_COL, path)?;
    let end_idx = find_column(&headers, BASELINE_END_COL, path)?;

    let mut links = Vec::new();
    let mut skipped_rows = 0;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed row in {}: {e}", path.display());
                skipped_rows += 1;
                continue;
            }
        };
        let participant_id = record.get(participant_idx).unwrap_or("").trim();
        let caregiver_id = record.get(caregiver_idx).unwrap_or("").trim();
        let start = parse_day(record.get(start_idx).unwrap_or("").trim());
        let end = parse_day(record.get(end_idx).unwrap_or("").trim());
        match (participant_id.is_empty() || caregiver_id.is_empty(), start, end) {
            (false, Some(start), Some(end)) => links.push(CaregiverLink {
                participant_id: participant_id.to_string(),
                caregiver_id: caregiver_id.to_string(),
                baseline_period: Window::new(start, end),
            }),
            _ => skipped_rows += 1,
        }
    }

    info!(
        "Loaded {} caregiver links from {} ({} skipped)",
        links.len(),
        path.display(),
        skipped_rows
    );
    Ok(LinkLoad {
        links,
        skipped_rows,
    })
}

fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?)
}

fn find_column(headers: &StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| AnalysisError::MissingColumn {
            column: column.to_string(),
            path: path.display().to_string(),
        })
}

/// Participant id and day offset of a row, `None` when either is unusable
fn row_key<'a>(
    record: &'a StringRecord,
    participant_idx: usize,
    day_idx: usize,
) -> Option<(&'a str, i32)> {
    let participant_id = record.get(participant_idx)?.trim();
    if participant_id.is_empty() {
        return None;
    }
    let day_offset = parse_day(record.get(day_idx)?.trim())?;
    Some((participant_id, day_offset))
}

/// Lenient day parsing: integers, or float-formatted day counts
fn parse_day(cell: &str) -> Option<i32> {
    if let Ok(day) = cell.parse::<i32>() {
        return Some(day);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() {
        Some(value.round() as i32)
    } else {
        None
    }
}

fn derive_sleep_efficiency(table: &mut TimeSeriesTable) {
    if !table.has_metric("ASLEEP_MIN") || !table.has_metric("INBED_VALUE") {
        return;
    }
    let derived: Vec<(String, i32, f64)> = table
        .rows()
        .filter_map(|obs| {
            let asleep = obs.value("ASLEEP_MIN")?;
            let in_bed = obs.value("INBED_VALUE")?;
            (in_bed != 0.0).then(|| (obs.participant_id.clone(), obs.day_offset, asleep / in_bed))
        })
        .collect();
    table.register_metric("sleep_efficiency");
    for (participant_id, day_offset, value) in derived {
        table.insert_value(&participant_id, day_offset, "sleep_efficiency", value);
    }
}
