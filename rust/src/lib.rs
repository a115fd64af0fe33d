//! Forward project scheduler.
//!
//! Orders tasks by their dependencies and places each one on a working-time
//! calendar (weekly working windows, holidays, per-task buffer), producing a
//! concrete start/end for every task. The core is plain synchronous Rust;
//! this module also exposes it to Python.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod calendar;
pub mod codes;
mod config;
mod exceptions;
pub mod graph;
pub mod logging;
mod models;
pub mod records;
mod scheduler;

pub use calendar::{CalendarError, TimeWindow, WorkCalendar, WorkingHours};
pub use config::{ScheduleConfig, DEFAULT_HOURS_PER_DAY};
pub use exceptions::{CycleError, InvalidReferenceError, InvalidWindowError};
pub use graph::{DependencyGraph, GraphError};
pub use models::{ScheduleResult, Task, TaskStatus};
pub use records::{schedule_json, RecordError};
pub use scheduler::{compute_forward_schedule, ForwardScheduler, ScheduleError};

/// Schedule tasks forward from `config.origin`.
///
/// # Arguments
/// * `tasks` - Tasks to schedule; codes must be unique
/// * `config` - Origin, working hours, holidays, and buffer
///
/// # Returns
/// * ScheduleResult with every task's scheduled_start/scheduled_end set
///
/// # Raises
/// * InvalidWindowError, InvalidReferenceError, or CycleError (all
///   ValueError subclasses); plain ValueError for other invalid input
#[pyfunction]
#[pyo3(name = "compute_forward_schedule")]
fn py_compute_forward_schedule(tasks: Vec<Task>, config: ScheduleConfig) -> PyResult<ScheduleResult> {
    ForwardScheduler::new(&tasks, &config)
        .and_then(|scheduler| scheduler.schedule())
        .map_err(exceptions::schedule_err)
}

/// Schedule from persisted JSON records, returning the tasks as JSON.
#[pyfunction]
#[pyo3(name = "schedule_json")]
fn py_schedule_json(tasks_json: &str, config_json: &str) -> PyResult<String> {
    schedule_json(tasks_json, config_json).map_err(exceptions::record_err)
}

/// The forward_schedule Python module.
#[pymodule]
fn forward_schedule(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Task>()?;
    m.add_class::<TaskStatus>()?;
    m.add_class::<ScheduleResult>()?;

    // Config types
    m.add_class::<ScheduleConfig>()?;
    m.add_class::<WorkingHours>()?;

    // Errors
    exceptions::register(m)?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_compute_forward_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_schedule_json, m)?)?;

    Ok(())
}
