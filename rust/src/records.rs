//! JSON record ingestion.
//!
//! Accepts tasks and schedule configuration in the shape they are persisted
//! in: snake_case task rows, and a camelCase config whose `workingHours` is a
//! sparse map keyed by weekday ("0" = Sunday) of `{start, end}` windows.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::calendar::{CalendarError, WorkingHours};
use crate::config::{ScheduleConfig, DEFAULT_HOURS_PER_DAY};
use crate::models::{wall_clock, Task};
use crate::scheduler::{compute_forward_schedule, ScheduleError};

/// Errors from parsing records or scheduling them.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// One working window as persisted: `{"start": "08:00", "end": "17:00"}`.
#[derive(Clone, Debug, Deserialize)]
pub struct WindowRecord {
    pub start: String,
    pub end: String,
}

/// Schedule configuration as persisted.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfigRecord {
    /// RFC 3339 or naive; the written wall-clock time is kept.
    #[serde(deserialize_with = "wall_clock::deserialize")]
    pub from: NaiveDateTime,
    /// Absent means the standard Monday-Friday week.
    #[serde(default)]
    pub working_hours: Option<BTreeMap<u8, Vec<WindowRecord>>>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    #[serde(default)]
    pub buffer_days_per_task: f64,
    #[serde(default)]
    pub hours_per_day: Option<f64>,
}

impl TryFrom<ScheduleConfigRecord> for ScheduleConfig {
    type Error = CalendarError;

    fn try_from(record: ScheduleConfigRecord) -> Result<Self, Self::Error> {
        let working_hours = match record.working_hours {
            Some(days) => WorkingHours::parse(days.into_iter().map(|(day, windows)| {
                let pairs: Vec<(String, String)> =
                    windows.into_iter().map(|w| (w.start, w.end)).collect();
                (day, pairs)
            }))?,
            None => WorkingHours::standard_week(),
        };

        Ok(Self {
            origin: record.from,
            working_hours,
            holidays: record.holidays,
            buffer_days_per_task: record.buffer_days_per_task,
            hours_per_day: record.hours_per_day.unwrap_or(DEFAULT_HOURS_PER_DAY),
            verbosity: 0,
        })
    }
}

pub fn parse_tasks(json: &str) -> Result<Vec<Task>, RecordError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_config(json: &str) -> Result<ScheduleConfig, RecordError> {
    let record: ScheduleConfigRecord = serde_json::from_str(json)?;
    Ok(ScheduleConfig::try_from(record)?)
}

/// Parse both records, schedule, and return the tasks as JSON.
pub fn schedule_json(tasks_json: &str, config_json: &str) -> Result<String, RecordError> {
    let tasks = parse_tasks(tasks_json)?;
    let config = parse_config(config_json)?;
    let scheduled = compute_forward_schedule(&tasks, &config)?;
    Ok(serde_json::to_string(&scheduled)?)
}
