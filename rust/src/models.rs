//! Core data types for the forward scheduler.

use chrono::NaiveDateTime;
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// Timestamp parsing for stored records.
///
/// Accepts RFC 3339 timestamps (`2025-12-01T08:00:00Z`,
/// `2025-12-01T08:00:00.000+02:00`) and plain naive ones
/// (`2025-12-01T08:00:00`). An offset is dropped and the wall-clock time as
/// written is kept, since working windows are expressed in that same local
/// time.
pub(crate) mod wall_clock {
    use chrono::{DateTime, NaiveDateTime};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(value)
            .map(|instant| instant.naive_local())
            .or_else(|_| value.parse::<NaiveDateTime>())
            .ok()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
            })
            .transpose()
    }
}

/// Lifecycle tag carried through scheduling untouched.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Planned,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A unit of work to be scheduled.
///
/// `scheduled_start` and `scheduled_end` are outputs: any values supplied on
/// input are overwritten by the scheduler.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    /// Unique within a scheduling run; referenced by `depends_on_codes`.
    #[pyo3(get, set)]
    pub code: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub label: String,
    /// Working days consumed once started (may be fractional).
    #[pyo3(get, set)]
    pub duration_days: f64,
    #[pyo3(get, set)]
    #[serde(default)]
    pub depends_on_codes: Vec<String>,
    /// Waiting task (curing, delivery) rather than crew work.
    #[pyo3(get, set)]
    #[serde(default)]
    pub lead_time: bool,
    #[pyo3(get, set)]
    #[serde(default)]
    pub status: TaskStatus,
    #[pyo3(get, set)]
    #[serde(default, deserialize_with = "wall_clock::deserialize_option")]
    pub scheduled_start: Option<NaiveDateTime>,
    #[pyo3(get, set)]
    #[serde(default, deserialize_with = "wall_clock::deserialize_option")]
    pub scheduled_end: Option<NaiveDateTime>,
}

impl Task {
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_start.is_some() && self.scheduled_end.is_some()
    }
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (
        id,
        code,
        duration_days,
        depends_on_codes=Vec::new(),
        label=String::new(),
        lead_time=false,
        status=TaskStatus::Planned,
        scheduled_start=None,
        scheduled_end=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        code: String,
        duration_days: f64,
        depends_on_codes: Vec<String>,
        label: String,
        lead_time: bool,
        status: TaskStatus,
        scheduled_start: Option<NaiveDateTime>,
        scheduled_end: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id,
            code,
            label,
            duration_days,
            depends_on_codes,
            lead_time,
            status,
            scheduled_start,
            scheduled_end,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(code={:?}, duration_days={}, deps={}, start={:?}, end={:?})",
            self.code,
            self.duration_days,
            self.depends_on_codes.len(),
            self.scheduled_start,
            self.scheduled_end
        )
    }
}

/// Output of one scheduling run.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleResult {
    /// Input tasks, in input order, with start/end populated.
    #[pyo3(get)]
    pub tasks: Vec<Task>,
    /// Codes in the order they were scheduled.
    #[pyo3(get)]
    pub topological_order: Vec<String>,
    /// Latest `scheduled_end` across all tasks (None for an empty run).
    #[pyo3(get)]
    pub project_end: Option<NaiveDateTime>,
}

impl ScheduleResult {
    /// Look up a scheduled task by code.
    pub fn task(&self, code: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.code == code)
    }
}

#[pymethods]
impl ScheduleResult {
    #[pyo3(name = "task")]
    fn py_task(&self, code: &str) -> Option<Task> {
        self.task(code).cloned()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(tasks={}, project_end={:?})",
            self.tasks.len(),
            self.project_end
        )
    }
}
