//! Configuration for a forward scheduling run.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use pyo3::prelude::*;

use crate::calendar::{CalendarError, WorkCalendar, WorkingHours};
use crate::scheduler::ScheduleError;

/// Working hours that make up one "day" of task duration.
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Immutable inputs for one scheduling run.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleConfig {
    /// Instant no-dependency tasks become eligible (local wall-clock time).
    #[pyo3(get, set)]
    pub origin: NaiveDateTime,
    #[pyo3(get, set)]
    pub working_hours: WorkingHours,
    /// Dates with no working capacity regardless of weekday.
    #[pyo3(get, set)]
    pub holidays: Vec<NaiveDate>,
    /// Extra working time added per task, as a fraction of its duration.
    #[pyo3(get, set)]
    pub buffer_days_per_task: f64,
    /// Day-length reference: one duration day is this many working hours,
    /// regardless of how long a particular day's windows are.
    #[pyo3(get, set)]
    pub hours_per_day: f64,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            origin: NaiveDateTime::default(),
            working_hours: WorkingHours::standard_week(),
            holidays: Vec::new(),
            buffer_days_per_task: 0.0,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            verbosity: 0,
        }
    }
}

impl ScheduleConfig {
    /// Reject buffer, day length, or calendars that cannot be scheduled against.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !self.buffer_days_per_task.is_finite() || self.buffer_days_per_task < 0.0 {
            return Err(ScheduleError::InvalidBuffer(self.buffer_days_per_task));
        }
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 || self.hours_per_day > 24.0
        {
            return Err(ScheduleError::InvalidDayLength(self.hours_per_day));
        }
        if !self.working_hours.has_working_time() {
            return Err(CalendarError::NoWorkingTime.into());
        }
        Ok(())
    }

    /// Calendar combining the weekly windows with the holiday list.
    pub fn calendar(&self) -> Result<WorkCalendar, CalendarError> {
        WorkCalendar::new(self.working_hours.clone(), self.holidays.iter().copied())
    }

    /// Working time a task of `duration_days` consumes, buffer included.
    ///
    /// Rounded once to whole milliseconds so that identical inputs always
    /// produce identical timestamps.
    pub fn working_time_for(&self, duration_days: f64) -> Duration {
        let hours = duration_days * (1.0 + self.buffer_days_per_task) * self.hours_per_day;
        Duration::milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
    }
}

#[pymethods]
impl ScheduleConfig {
    #[new]
    #[pyo3(signature = (
        origin,
        working_hours=None,
        holidays=None,
        buffer_days_per_task=None,
        hours_per_day=None,
        verbosity=None
    ))]
    fn new(
        origin: NaiveDateTime,
        working_hours: Option<WorkingHours>,
        holidays: Option<Vec<NaiveDate>>,
        buffer_days_per_task: Option<f64>,
        hours_per_day: Option<f64>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            origin,
            working_hours: working_hours.unwrap_or(defaults.working_hours),
            holidays: holidays.unwrap_or(defaults.holidays),
            buffer_days_per_task: buffer_days_per_task.unwrap_or(defaults.buffer_days_per_task),
            hours_per_day: hours_per_day.unwrap_or(defaults.hours_per_day),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleConfig(origin={}, holidays={}, buffer_days_per_task={}, hours_per_day={})",
            self.origin,
            self.holidays.len(),
            self.buffer_days_per_task,
            self.hours_per_day
        )
    }
}
