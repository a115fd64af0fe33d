//! Forward scheduler.
//!
//! Places every task of a dependency graph on a working-time calendar,
//! moving forward from a fixed origin.

mod core;

pub use core::{compute_forward_schedule, ForwardScheduler, ScheduleError};
