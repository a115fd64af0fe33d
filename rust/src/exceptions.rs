//! Python exception types for scheduling failures.
//!
//! Each is a `ValueError` subclass, so callers catching `ValueError` keep
//! working while those that care can tell the failures apart.

use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::calendar::CalendarError;
use crate::graph::GraphError;
use crate::records::RecordError;
use crate::scheduler::ScheduleError;

create_exception!(
    forward_schedule,
    InvalidReferenceError,
    PyValueError,
    "A dependency names a task code that is not in the task set."
);
create_exception!(
    forward_schedule,
    CycleError,
    PyValueError,
    "The dependency graph contains a cycle."
);
create_exception!(
    forward_schedule,
    InvalidWindowError,
    PyValueError,
    "A working window is malformed, inverted, overlapping, or on an unknown weekday."
);

/// Which Python exception a failure is raised as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorClass {
    InvalidReference,
    Cycle,
    InvalidWindow,
    Value,
}

impl ErrorClass {
    pub(crate) fn of_calendar(err: &CalendarError) -> Self {
        match err {
            CalendarError::InvalidWindow { .. } | CalendarError::InvalidWeekday(_) => {
                Self::InvalidWindow
            }
            CalendarError::NoWorkingTime | CalendarError::OutOfRange => Self::Value,
        }
    }

    pub(crate) fn of_schedule(err: &ScheduleError) -> Self {
        match err {
            ScheduleError::Calendar(inner) => Self::of_calendar(inner),
            ScheduleError::Graph(GraphError::InvalidReference { .. }) => Self::InvalidReference,
            ScheduleError::Graph(GraphError::Cycle { .. }) => Self::Cycle,
            _ => Self::Value,
        }
    }

    pub(crate) fn of_record(err: &RecordError) -> Self {
        match err {
            RecordError::Json(_) => Self::Value,
            RecordError::Calendar(inner) => Self::of_calendar(inner),
            RecordError::Schedule(inner) => Self::of_schedule(inner),
        }
    }

    pub(crate) fn into_err(self, message: String) -> PyErr {
        match self {
            Self::InvalidReference => InvalidReferenceError::new_err(message),
            Self::Cycle => CycleError::new_err(message),
            Self::InvalidWindow => InvalidWindowError::new_err(message),
            Self::Value => PyValueError::new_err(message),
        }
    }
}

pub(crate) fn calendar_err(err: CalendarError) -> PyErr {
    ErrorClass::of_calendar(&err).into_err(err.to_string())
}

pub(crate) fn schedule_err(err: ScheduleError) -> PyErr {
    ErrorClass::of_schedule(&err).into_err(err.to_string())
}

pub(crate) fn record_err(err: RecordError) -> PyErr {
    ErrorClass::of_record(&err).into_err(err.to_string())
}

/// Register the exception types on the Python module.
pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("InvalidReferenceError", py.get_type_bound::<InvalidReferenceError>())?;
    m.add("CycleError", py.get_type_bound::<CycleError>())?;
    m.add("InvalidWindowError", py.get_type_bound::<InvalidWindowError>())?;
    Ok(())
}
