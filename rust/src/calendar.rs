//! Working-time calendar: weekly working windows plus holiday dates.
//!
//! A calendar instant is "working" when it falls inside one of the windows
//! configured for its weekday and its date is not a holiday. Windows are
//! half-open `[start, end)`, so the end instant of a window is not itself a
//! working instant, but a task may finish exactly on it.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use pyo3::prelude::*;
use rustc_hash::FxHashSet;
use std::collections::HashMap;
use thiserror::Error;

/// Number of weekday slots (Sunday=0 .. Saturday=6).
pub const DAYS_PER_WEEK: usize = 7;

/// Errors raised while building a working calendar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid working window {start}-{end} on day {day}: {reason}")]
    InvalidWindow {
        day: u8,
        start: String,
        end: String,
        reason: &'static str,
    },
    #[error("Invalid weekday {0} (expected 0=Sunday .. 6=Saturday)")]
    InvalidWeekday(u8),
    #[error("Working hours contain no working window on any day")]
    NoWorkingTime,
    #[error("Calendar arithmetic overflowed the supported date range")]
    OutOfRange,
}

/// A working window within a single day, `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

/// Parse a 24-hour "HH:MM" time of day.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.split_once(':')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || hours.len() != 2 || !all_digits(minutes) || minutes.len() != 2 {
        return None;
    }
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Weekly working windows, one slot per weekday.
///
/// An empty slot means no work that day. Windows within a slot are kept
/// sorted by start and never overlap.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkingHours {
    days: [Vec<TimeWindow>; DAYS_PER_WEEK],
}

impl WorkingHours {
    /// Build working hours from a sparse weekday -> ["HH:MM", "HH:MM"] mapping.
    ///
    /// Days absent from the mapping get no windows, the same as an explicit
    /// empty list.
    pub fn parse<I, S>(entries: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = (u8, Vec<(S, S)>)>,
        S: AsRef<str>,
    {
        let mut hours = Self::default();
        for (day, windows) in entries {
            let slot = hours
                .days
                .get_mut(day as usize)
                .ok_or(CalendarError::InvalidWeekday(day))?;

            for (start, end) in windows {
                let (start, end) = (start.as_ref(), end.as_ref());
                let invalid = |reason: &'static str| CalendarError::InvalidWindow {
                    day,
                    start: start.to_string(),
                    end: end.to_string(),
                    reason,
                };
                let start_time = parse_hhmm(start).ok_or_else(|| invalid("expected HH:MM"))?;
                let end_time = parse_hhmm(end).ok_or_else(|| invalid("expected HH:MM"))?;
                if end_time <= start_time {
                    return Err(invalid("end must be after start"));
                }
                slot.push(TimeWindow {
                    start: start_time,
                    end: end_time,
                });
            }

            slot.sort_by_key(|w| w.start);
            if let Some(pair) = slot.windows(2).find(|pair| pair[1].start < pair[0].end) {
                return Err(CalendarError::InvalidWindow {
                    day,
                    start: format_hhmm(pair[1].start),
                    end: format_hhmm(pair[1].end),
                    reason: "overlaps another window",
                });
            }
        }
        Ok(hours)
    }

    /// Monday through Friday, 08:00-17:00.
    pub fn standard_week() -> Self {
        let window = TimeWindow {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        };
        let mut hours = Self::default();
        for day in 1..=5 {
            hours.days[day] = vec![window];
        }
        hours
    }

    /// Windows for a weekday (Sunday=0). Out-of-range weekdays have none.
    pub fn windows_on(&self, weekday: u32) -> &[TimeWindow] {
        self.days
            .get(weekday as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total configured working hours for a weekday.
    pub fn hours_on(&self, weekday: u32) -> f64 {
        let total: Duration = self
            .windows_on(weekday)
            .iter()
            .map(TimeWindow::duration)
            .fold(Duration::zero(), |acc, d| acc + d);
        total.num_seconds() as f64 / 3600.0
    }

    /// Whether any weekday has at least one window.
    pub fn has_working_time(&self) -> bool {
        self.days.iter().any(|windows| !windows.is_empty())
    }
}

#[pymethods]
impl WorkingHours {
    #[new]
    #[pyo3(signature = (windows=None))]
    fn new(windows: Option<HashMap<u8, Vec<(String, String)>>>) -> PyResult<Self> {
        match windows {
            None => Ok(Self::standard_week()),
            Some(windows) => Self::parse(windows).map_err(crate::exceptions::calendar_err),
        }
    }

    #[pyo3(name = "hours_on")]
    fn py_hours_on(&self, weekday: u32) -> f64 {
        self.hours_on(weekday)
    }

    fn __repr__(&self) -> String {
        let days: Vec<String> = self
            .days
            .iter()
            .enumerate()
            .filter(|(_, windows)| !windows.is_empty())
            .map(|(day, windows)| {
                let spans: Vec<String> = windows
                    .iter()
                    .map(|w| format!("{}-{}", format_hhmm(w.start), format_hhmm(w.end)))
                    .collect();
                format!("{}: [{}]", day, spans.join(", "))
            })
            .collect();
        format!("WorkingHours({{{}}})", days.join(", "))
    }
}

/// Working hours combined with a holiday set.
#[derive(Clone, Debug)]
pub struct WorkCalendar {
    hours: WorkingHours,
    holidays: FxHashSet<NaiveDate>,
}

impl WorkCalendar {
    /// Create a calendar. Fails if the week has no working time at all,
    /// since no instant could ever be scheduled.
    pub fn new(
        hours: WorkingHours,
        holidays: impl IntoIterator<Item = NaiveDate>,
    ) -> Result<Self, CalendarError> {
        if !hours.has_working_time() {
            return Err(CalendarError::NoWorkingTime);
        }
        Ok(Self {
            hours,
            holidays: holidays.into_iter().collect(),
        })
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Windows that actually apply on a date (none on holidays).
    pub fn windows_for(&self, date: NaiveDate) -> &[TimeWindow] {
        if self.is_holiday(date) {
            return &[];
        }
        self.hours.windows_on(date.weekday().num_days_from_sunday())
    }

    pub fn is_working_instant(&self, at: NaiveDateTime) -> bool {
        self.windows_for(at.date())
            .iter()
            .any(|w| w.contains(at.time()))
    }

    /// Earliest working instant at or after `at`.
    ///
    /// Returns `at` unchanged when it already lies inside a window.
    /// Otherwise moves to the start of the next window on the same day, or
    /// the first window of the next day that has one and is not a holiday.
    pub fn next_working_instant(&self, at: NaiveDateTime) -> Result<NaiveDateTime, CalendarError> {
        let mut date = at.date();
        let mut time = at.time();
        loop {
            // Sorted windows: the first one ending after `time` is either
            // the one containing it or the next one to open.
            if let Some(window) = self.windows_for(date).iter().find(|w| time < w.end) {
                return Ok(date.and_time(time.max(window.start)));
            }
            date = date.succ_opt().ok_or(CalendarError::OutOfRange)?;
            time = NaiveTime::default();
        }
    }

    /// Instant reached after consuming `work` of working time from `start`.
    ///
    /// The cursor first moves to the next working instant, then drains each
    /// window in turn, skipping gaps, non-working days, and holidays. Work
    /// that exactly fills a window ends on that window's end instant.
    pub fn add_working_time(
        &self,
        start: NaiveDateTime,
        work: Duration,
    ) -> Result<NaiveDateTime, CalendarError> {
        let mut cursor = self.next_working_instant(start)?;
        let mut remaining = work;

        while remaining > Duration::zero() {
            let date = cursor.date();
            let Some(window) = self
                .windows_for(date)
                .iter()
                .find(|w| w.contains(cursor.time()))
            else {
                cursor = self.next_working_instant(cursor)?;
                continue;
            };

            let window_end = date.and_time(window.end);
            let available = window_end - cursor;
            if remaining <= available {
                return cursor
                    .checked_add_signed(remaining)
                    .ok_or(CalendarError::OutOfRange);
            }

            remaining = remaining - available;
            cursor = self.next_working_instant(window_end)?;
        }

        Ok(cursor)
    }

    /// Working time contained in `[start, end)`.
    pub fn working_time_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Duration, CalendarError> {
        let mut total = Duration::zero();
        let mut cursor = self.next_working_instant(start)?;

        while cursor < end {
            let date = cursor.date();
            let Some(window) = self
                .windows_for(date)
                .iter()
                .find(|w| w.contains(cursor.time()))
            else {
                cursor = self.next_working_instant(cursor)?;
                continue;
            };

            let window_end = date.and_time(window.end);
            total = total + (window_end.min(end) - cursor);
            cursor = self.next_working_instant(window_end)?;
        }

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        d(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
    }

    fn weekdays(windows: Vec<(&str, &str)>) -> WorkingHours {
        WorkingHours::parse((1..=5).map(|day| (day, windows.clone()))).unwrap()
    }

    fn calendar(hours: WorkingHours, holidays: Vec<NaiveDate>) -> WorkCalendar {
        WorkCalendar::new(hours, holidays).unwrap()
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("08:00"), NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(parse_hhmm("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(parse_hhmm("00:00"), NaiveTime::from_hms_opt(0, 0, 0));
        // Hours must be zero-padded
        assert_eq!(parse_hhmm("8:30"), None);
        assert_eq!(parse_hhmm("108:30"), None);
        assert_eq!(parse_hhmm("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("12:60"), None);
        assert_eq!(parse_hhmm("12:5"), None);
        assert_eq!(parse_hhmm("noon"), None);
        assert_eq!(parse_hhmm("-1:00"), None);
        assert_eq!(parse_hhmm(""), None);
    }

    #[test]
    fn test_parse_rejects_end_before_start() {
        let err = WorkingHours::parse([(1, vec![("17:00", "08:00")])]).unwrap_err();
        assert_eq!(
            err,
            CalendarError::InvalidWindow {
                day: 1,
                start: "17:00".to_string(),
                end: "08:00".to_string(),
                reason: "end must be after start",
            }
        );

        let err = WorkingHours::parse([(1, vec![("08:00", "08:00")])]).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidWindow { .. }));
    }

    #[test]
    fn test_parse_rejects_malformed_time() {
        let err = WorkingHours::parse([(2, vec![("8am", "17:00")])]).unwrap_err();
        assert!(matches!(
            err,
            CalendarError::InvalidWindow {
                day: 2,
                reason: "expected HH:MM",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_unpadded_hour() {
        let err = WorkingHours::parse([(1, vec![("8:00", "17:00")])]).unwrap_err();
        assert_eq!(
            err,
            CalendarError::InvalidWindow {
                day: 1,
                start: "8:00".to_string(),
                end: "17:00".to_string(),
                reason: "expected HH:MM",
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_weekday_and_overlap() {
        assert_eq!(
            WorkingHours::parse([(7, vec![("08:00", "17:00")])]).unwrap_err(),
            CalendarError::InvalidWeekday(7)
        );

        let err = WorkingHours::parse([(1, vec![("08:00", "12:00"), ("11:00", "15:00")])])
            .unwrap_err();
        assert!(matches!(
            err,
            CalendarError::InvalidWindow {
                reason: "overlaps another window",
                ..
            }
        ));
    }

    #[test]
    fn test_windows_sorted_and_hours_summed() {
        let hours = WorkingHours::parse([(3, vec![("13:00", "17:00"), ("08:00", "12:00")])]).unwrap();
        let windows = hours.windows_on(3);
        assert_eq!(windows[0].start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(windows[1].start, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        assert_eq!(hours.hours_on(3), 8.0);
        assert_eq!(hours.hours_on(4), 0.0);
    }

    #[test]
    fn test_absent_day_equals_empty_day() {
        let absent = WorkingHours::parse([(1, vec![("08:00", "17:00")])]).unwrap();
        let empty = WorkingHours::parse([(1, vec![("08:00", "17:00")]), (2, vec![])]).unwrap();
        assert_eq!(absent, empty);
    }

    #[test]
    fn test_standard_week() {
        let hours = WorkingHours::standard_week();
        assert_eq!(hours.hours_on(0), 0.0);
        for day in 1..=5 {
            assert_eq!(hours.hours_on(day), 9.0);
        }
        assert_eq!(hours.hours_on(6), 0.0);
    }

    #[test]
    fn test_calendar_requires_working_time() {
        let err = WorkCalendar::new(WorkingHours::default(), Vec::<NaiveDate>::new()).unwrap_err();
        assert_eq!(err, CalendarError::NoWorkingTime);
    }

    #[test]
    fn test_next_working_instant_inside_window_is_unchanged() {
        let cal = calendar(WorkingHours::standard_week(), vec![]);
        let at = dt(2025, 12, 1, 10, 15);
        assert_eq!(cal.next_working_instant(at).unwrap(), at);
    }

    #[test]
    fn test_next_working_instant_before_between_after_windows() {
        let cal = calendar(weekdays(vec![("08:00", "12:00"), ("13:00", "17:00")]), vec![]);

        // Before the first window
        assert_eq!(
            cal.next_working_instant(dt(2025, 12, 1, 6, 0)).unwrap(),
            dt(2025, 12, 1, 8, 0)
        );
        // Lunch gap
        assert_eq!(
            cal.next_working_instant(dt(2025, 12, 1, 12, 30)).unwrap(),
            dt(2025, 12, 1, 13, 0)
        );
        // Exactly at a window end is outside the window
        assert_eq!(
            cal.next_working_instant(dt(2025, 12, 1, 12, 0)).unwrap(),
            dt(2025, 12, 1, 13, 0)
        );
        // After the last window rolls to the next day
        assert_eq!(
            cal.next_working_instant(dt(2025, 12, 1, 17, 0)).unwrap(),
            dt(2025, 12, 2, 8, 0)
        );
    }

    #[test]
    fn test_next_working_instant_skips_weekend() {
        let cal = calendar(WorkingHours::standard_week(), vec![]);
        // Friday evening -> Monday morning
        assert_eq!(
            cal.next_working_instant(dt(2025, 12, 5, 18, 0)).unwrap(),
            dt(2025, 12, 8, 8, 0)
        );
        // Saturday midday -> Monday morning
        assert_eq!(
            cal.next_working_instant(dt(2025, 12, 6, 12, 0)).unwrap(),
            dt(2025, 12, 8, 8, 0)
        );
    }

    #[test]
    fn test_next_working_instant_skips_holidays() {
        let cal = calendar(WorkingHours::standard_week(), vec![d(2025, 12, 24), d(2025, 12, 25)]);
        // Inside Wednesday's window, but Wednesday is a holiday
        assert_eq!(
            cal.next_working_instant(dt(2025, 12, 24, 10, 0)).unwrap(),
            dt(2025, 12, 26, 8, 0)
        );
        assert!(!cal.is_working_instant(dt(2025, 12, 25, 9, 0)));
        assert!(cal.is_working_instant(dt(2025, 12, 26, 9, 0)));
    }

    #[test]
    fn test_add_working_time_within_window() {
        let cal = calendar(WorkingHours::standard_week(), vec![]);
        assert_eq!(
            cal.add_working_time(dt(2025, 12, 1, 8, 0), Duration::hours(4))
                .unwrap(),
            dt(2025, 12, 1, 12, 0)
        );
    }

    #[test]
    fn test_add_working_time_ends_on_window_boundary() {
        let cal = calendar(weekdays(vec![("08:00", "12:00"), ("13:00", "17:00")]), vec![]);
        // Exactly fills the morning window: ends at 12:00, not 13:00
        assert_eq!(
            cal.add_working_time(dt(2025, 12, 1, 10, 0), Duration::hours(2))
                .unwrap(),
            dt(2025, 12, 1, 12, 0)
        );
        // Spills past lunch
        assert_eq!(
            cal.add_working_time(dt(2025, 12, 1, 10, 0), Duration::hours(4))
                .unwrap(),
            dt(2025, 12, 1, 15, 0)
        );
    }

    #[test]
    fn test_add_working_time_spans_days_and_weekend() {
        let cal = calendar(WorkingHours::standard_week(), vec![]);
        // Friday 15:00 + 5h: 2h Friday, 3h Monday
        assert_eq!(
            cal.add_working_time(dt(2025, 12, 5, 15, 0), Duration::hours(5))
                .unwrap(),
            dt(2025, 12, 8, 11, 0)
        );
        // Three full standard days from Monday 08:00
        assert_eq!(
            cal.add_working_time(dt(2025, 12, 1, 8, 0), Duration::hours(27))
                .unwrap(),
            dt(2025, 12, 3, 17, 0)
        );
    }

    #[test]
    fn test_add_working_time_skips_holiday() {
        let cal = calendar(WorkingHours::standard_week(), vec![d(2025, 12, 24), d(2025, 12, 25)]);
        // Tuesday 15:00 + 5h: 2h Tuesday, holidays Wed/Thu, 3h Friday
        assert_eq!(
            cal.add_working_time(dt(2025, 12, 23, 15, 0), Duration::hours(5))
                .unwrap(),
            dt(2025, 12, 26, 11, 0)
        );
    }

    #[test]
    fn test_add_working_time_zero_lands_on_working_instant() {
        let cal = calendar(WorkingHours::standard_week(), vec![]);
        assert_eq!(
            cal.add_working_time(dt(2025, 12, 1, 10, 0), Duration::zero())
                .unwrap(),
            dt(2025, 12, 1, 10, 0)
        );
        assert_eq!(
            cal.add_working_time(dt(2025, 12, 6, 10, 0), Duration::zero())
                .unwrap(),
            dt(2025, 12, 8, 8, 0)
        );
    }

    #[test]
    fn test_working_time_between() {
        let cal = calendar(WorkingHours::standard_week(), vec![d(2025, 12, 3)]);
        // Mon 16:00 -> Thu 09:00: 1h Mon, 9h Tue, holiday Wed, 1h Thu
        assert_eq!(
            cal.working_time_between(dt(2025, 12, 1, 16, 0), dt(2025, 12, 4, 9, 0))
                .unwrap(),
            Duration::hours(11)
        );
        assert_eq!(
            cal.working_time_between(dt(2025, 12, 1, 9, 0), dt(2025, 12, 1, 9, 0))
                .unwrap(),
            Duration::zero()
        );
    }
}
