//! Core forward scheduler implementation.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::calendar::{CalendarError, WorkCalendar};
use crate::codes::TaskIndex;
use crate::config::ScheduleConfig;
use crate::graph::{DependencyGraph, GraphError};
use crate::logging::verbosity_name;
use crate::models::{ScheduleResult, Task};
use crate::{log_changes, log_checks, log_debug};

/// Errors that can occur during scheduling.
///
/// Every variant is raised before any timestamp is computed; a run either
/// schedules every task or fails as a whole.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("Task {code} has invalid duration {duration_days} (expected a finite, non-negative number of days)")]
    InvalidDuration { code: String, duration_days: f64 },
    #[error("Invalid buffer fraction {0} (expected a finite, non-negative number)")]
    InvalidBuffer(f64),
    #[error("Invalid day length {0} hours (expected more than 0 and at most 24)")]
    InvalidDayLength(f64),
}

/// Forward scheduler over a validated task set.
///
/// Construction performs all validation (configuration, durations, codes,
/// references, cycles). `schedule` then walks tasks in topological order,
/// starting each at the latest end of its dependencies (or the origin),
/// advanced to the next working instant, and ending after its buffered
/// working time has been consumed from the calendar.
pub struct ForwardScheduler<'a> {
    tasks: &'a [Task],
    config: &'a ScheduleConfig,
    graph: DependencyGraph<'a>,
    calendar: WorkCalendar,
    order: Vec<TaskIndex>,
}

impl<'a> ForwardScheduler<'a> {
    /// Validate inputs and prepare a scheduler.
    pub fn new(tasks: &'a [Task], config: &'a ScheduleConfig) -> Result<Self, ScheduleError> {
        config.validate()?;
        let calendar = config.calendar()?;

        if let Some(task) = tasks
            .iter()
            .find(|t| !t.duration_days.is_finite() || t.duration_days < 0.0)
        {
            return Err(ScheduleError::InvalidDuration {
                code: task.code.clone(),
                duration_days: task.duration_days,
            });
        }

        let graph = DependencyGraph::build(tasks)?;
        let order = graph.topological_order()?;

        log_checks!(
            config.verbosity,
            "[forward] validated {} tasks, origin={}, holidays={}, buffer={}, verbosity={}",
            tasks.len(),
            config.origin,
            config.holidays.len(),
            config.buffer_days_per_task,
            verbosity_name(config.verbosity)
        );

        Ok(Self {
            tasks,
            config,
            graph,
            calendar,
            order,
        })
    }

    /// Codes in the order tasks will be scheduled.
    pub fn order(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.order.iter().map(|&index| self.graph.code(index))
    }

    /// Compute start/end for every task.
    ///
    /// Returned tasks keep their input order; `topological_order` records the
    /// order they were placed in.
    pub fn schedule(&self) -> Result<ScheduleResult, ScheduleError> {
        let verbosity = self.config.verbosity;
        let mut spans: Vec<Option<(NaiveDateTime, NaiveDateTime)>> = vec![None; self.tasks.len()];

        for &index in &self.order {
            let task = &self.tasks[index];

            // Dependencies precede this task in the order, so their spans exist.
            let eligible = self
                .graph
                .dependencies(index)
                .iter()
                .filter_map(|&dep| spans[dep].map(|(_, end)| end))
                .max()
                .unwrap_or(self.config.origin);

            let start = self.calendar.next_working_instant(eligible)?;
            if start != eligible {
                log_checks!(
                    verbosity,
                    "[forward] {} eligible at {}, advanced to working instant {}",
                    task.code,
                    eligible,
                    start
                );
            }

            let work = self.config.working_time_for(task.duration_days);
            log_debug!(
                verbosity,
                "[forward] {} needs {} min of working time ({} days, buffer {})",
                task.code,
                work.num_minutes(),
                task.duration_days,
                self.config.buffer_days_per_task
            );

            let end = self.calendar.add_working_time(start, work)?;
            log_changes!(
                verbosity,
                "[forward] scheduled {}: {} -> {}",
                task.code,
                start,
                end
            );

            spans[index] = Some((start, end));
        }

        let tasks: Vec<Task> = self
            .tasks
            .iter()
            .zip(&spans)
            .map(|(task, span)| {
                let mut scheduled = task.clone();
                if let Some((start, end)) = span {
                    scheduled.scheduled_start = Some(*start);
                    scheduled.scheduled_end = Some(*end);
                }
                scheduled
            })
            .collect();

        let project_end = spans.iter().flatten().map(|(_, end)| *end).max();

        Ok(ScheduleResult {
            tasks,
            topological_order: self.order().map(str::to_string).collect(),
            project_end,
        })
    }
}

/// Schedule `tasks` forward from `config.origin`.
///
/// Returns the tasks in input order with `scheduled_start`/`scheduled_end`
/// populated, or the first validation error found.
pub fn compute_forward_schedule(
    tasks: &[Task],
    config: &ScheduleConfig,
) -> Result<Vec<Task>, ScheduleError> {
    Ok(ForwardScheduler::new(tasks, config)?.schedule()?.tasks)
}
