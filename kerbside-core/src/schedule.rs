//! Projection of weekly and N-weekly collection dates from an anchor date.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

/// Number of upcoming dates reported per waste stream.
pub const DEFAULT_OCCURRENCES: usize = 4;

/// Format of anchor dates in zone datasets.
pub const ANCHOR_DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Reasons a waste stream's schedule attributes cannot be used.
pub enum ScheduleError {
    /// Weekday name is not a day of the week.
    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),
    /// Interval is zero or negative.
    #[error("Interval must be at least one week, got {0}")]
    NonPositiveInterval(i64),
    /// Interval is not an integer number of weeks.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),
    /// No anchor date was published for the stream.
    #[error("Missing anchor date")]
    MissingAnchor,
    /// Anchor date is not in `YYYY/MM/DD` form.
    #[error("Invalid anchor date: {0}")]
    InvalidAnchor(String),
    /// Projection ran past the representable calendar.
    #[error("Schedule exceeds the supported date range")]
    OutOfRange,
}

/// Validated recurrence for one waste stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSchedule {
    /// Day of the week collections happen on.
    pub weekday: Weekday,
    /// Weeks between collections.
    pub interval_weeks: i64,
    /// A known collection date.
    pub anchor: NaiveDate,
}

impl StreamSchedule {
    /// Project the next `count` collections on or after `today`.
    ///
    /// # Errors
    ///
    /// See [`project_dates`].
    pub fn project(&self, count: usize, today: NaiveDate) -> Result<Vec<NaiveDate>, ScheduleError> {
        project_dates(self.weekday, self.interval_weeks, self.anchor, count, today)
    }
}

/// Parse a weekday name such as `Monday` or `mon`, ignoring case.
///
/// # Errors
///
/// Returns [`ScheduleError::UnknownWeekday`] for anything else.
pub fn parse_weekday(name: &str) -> Result<Weekday, ScheduleError> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_err| ScheduleError::UnknownWeekday(name.to_owned()))
}

/// Parse a dataset anchor date (`YYYY/MM/DD`).
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidAnchor`] when the text is not a valid date.
pub fn parse_anchor(text: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(text.trim(), ANCHOR_DATE_FORMAT)
        .map_err(|_err| ScheduleError::InvalidAnchor(text.to_owned()))
}

/// Project `count` collection dates for a stream collected on `weekday` every
/// `interval_weeks` weeks, counting from the known collection on `anchor`.
///
/// The first date is the next `weekday` on or after `today`, moved up to
/// `anchor` if it would precede it, then pushed forward week by week until a
/// whole multiple of `interval_weeks` weeks has elapsed since `anchor`.
///
/// # Errors
///
/// Returns [`ScheduleError::NonPositiveInterval`] if `interval_weeks < 1` and
/// [`ScheduleError::OutOfRange`] if the projection overflows the calendar.
pub fn project_dates(
    weekday: Weekday,
    interval_weeks: i64,
    anchor: NaiveDate,
    count: usize,
    today: NaiveDate,
) -> Result<Vec<NaiveDate>, ScheduleError> {
    if interval_weeks < 1 {
        return Err(ScheduleError::NonPositiveInterval(interval_weeks));
    }
    let step = TimeDelta::try_weeks(interval_weeks).ok_or(ScheduleError::OutOfRange)?;

    let delta = (i64::from(weekday.num_days_from_monday())
        - i64::from(today.weekday().num_days_from_monday()))
    .rem_euclid(7);
    let mut candidate = today
        .checked_add_signed(TimeDelta::days(delta))
        .ok_or(ScheduleError::OutOfRange)?;

    if candidate < anchor {
        candidate = anchor;
    }

    // Each one-week hop adds exactly one to the elapsed week count, so the
    // number of hops needed is known up front.
    let elapsed_weeks = (candidate - anchor).num_days().div_euclid(7);
    let behind = elapsed_weeks.rem_euclid(interval_weeks);
    if behind != 0 {
        let hops = TimeDelta::try_weeks(interval_weeks - behind).ok_or(ScheduleError::OutOfRange)?;
        candidate = candidate
            .checked_add_signed(hops)
            .ok_or(ScheduleError::OutOfRange)?;
    }

    let dates: Vec<NaiveDate> =
        std::iter::successors(Some(candidate), |date| date.checked_add_signed(step))
            .take(count)
            .collect();
    if dates.len() < count {
        return Err(ScheduleError::OutOfRange);
    }
    Ok(dates)
}
