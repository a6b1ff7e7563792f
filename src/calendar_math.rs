//! Calendar date arithmetic.
//!
//! Everything here works on [`NaiveDate`]: recurrence is computed on calendar
//! days, never on instants, so DST never shifts an occurrence to another day.
//! Month and year steps clamp to the last valid day of the target month.

use crate::{RecurrenceError, RecurrenceResult};
use chrono::{Datelike as _, Duration, NaiveDate};

pub const DAYS_IN_WEEK: u32 = 7;

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> RecurrenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| RecurrenceError::InvalidDate(format!("'{}': {}", input, e)))
}

pub fn add_days(date: NaiveDate, days: i64) -> RecurrenceResult<NaiveDate> {
    checked_add_days(date, days).ok_or_else(|| out_of_range(date, days, "days"))
}

/// Adds `months` to `date`, clamping the day to the target month's length.
///
/// Jan 31 + 1 month is Feb 28 (or 29), never Mar 3.
pub fn add_months(date: NaiveDate, months: i32) -> RecurrenceResult<NaiveDate> {
    from_month_index(month_index(date) + i64::from(months), date.day())
        .ok_or_else(|| out_of_range(date, months.into(), "months"))
}

/// Adds `years` to `date`. Feb 29 lands on Feb 28 in non-leap years.
pub fn add_years(date: NaiveDate, years: i32) -> RecurrenceResult<NaiveDate> {
    date.year()
        .checked_add(years)
        .and_then(|year| checked_clamped(year, date.month(), date.day()))
        .ok_or_else(|| out_of_range(date, years.into(), "years"))
}

/// Weekday index with 0 = Sunday through 6 = Saturday.
pub fn weekday_of(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

pub fn last_day_of_month(year: i32, month: u32) -> RecurrenceResult<u32> {
    checked_last_day(year, month).ok_or_else(|| no_such_month(year, month))
}

/// Builds a date, clamping `day` to the length of the month.
pub fn clamped_date(year: i32, month: u32, day: u32) -> RecurrenceResult<NaiveDate> {
    if !(1..=31).contains(&day) {
        return Err(RecurrenceError::InvalidDate(format!(
            "day {} of {}-{:02} is not between 1 and 31",
            day, year, month
        )));
    }

    checked_clamped(year, month, day).ok_or_else(|| no_such_month(year, month))
}

pub(crate) fn checked_add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Months since year 0, so month arithmetic is plain integer arithmetic.
pub(crate) fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

pub(crate) fn from_month_index(index: i64, day: u32) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    checked_clamped(year, month, day)
}

pub(crate) fn checked_clamped(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = checked_last_day(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last))
}

fn checked_last_day(year: i32, month: u32) -> Option<u32> {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
}

fn no_such_month(year: i32, month: u32) -> RecurrenceError {
    RecurrenceError::InvalidDate(format!("no such month: {}-{:02}", year, month))
}

fn out_of_range(date: NaiveDate, amount: i64, unit: &str) -> RecurrenceError {
    RecurrenceError::InvalidDate(format!(
        "{} {:+} {} is outside the supported calendar range",
        date, amount, unit
    ))
}
