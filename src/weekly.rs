use crate::calendar_math::{checked_add_days, days_between, weekday_of, DAYS_IN_WEEK};
use chrono::{NaiveDate, Weekday};

/// Selected weekdays of every `interval`-th week, weeks starting on Sunday.
///
/// The first week is the one containing the anchor; its days before the
/// anchor are never produced.
#[derive(Clone, Debug)]
pub struct Weekly {
    anchor: NaiveDate,
    anchor_weekday: u32,
    interval: u32,
    /// Day offsets from Sunday, ascending and unique, never empty.
    weekdays: Vec<u32>,
    period: u64,
    index: usize,
}

impl Weekly {
    /// An empty `by_weekday` falls back to the anchor's own weekday.
    pub fn new(anchor: NaiveDate, interval: u32, by_weekday: &[Weekday]) -> Self {
        let anchor_weekday = weekday_of(anchor);

        let mut weekdays: Vec<u32> = by_weekday
            .iter()
            .map(Weekday::num_days_from_sunday)
            .collect();
        if weekdays.is_empty() {
            weekdays.push(anchor_weekday);
        }
        weekdays.sort_unstable();
        weekdays.dedup();

        Weekly {
            anchor,
            anchor_weekday,
            interval: interval.max(1),
            weekdays,
            period: 0,
            index: 0,
        }
    }

    /// Fast-forwards a fresh schedule past every week that ends before `min`.
    /// Returns how many candidates were passed over.
    pub fn skip_before(&mut self, min: NaiveDate) -> u64 {
        let since_week_start = days_between(self.anchor, min) + i64::from(self.anchor_weekday);
        if self.period != 0 || self.index != 0 || since_week_start <= 0 {
            return 0;
        }

        let span = u64::from(DAYS_IN_WEEK) * u64::from(self.interval);
        let periods = since_week_start as u64 / span;
        if periods == 0 {
            return 0;
        }

        let before_anchor = self
            .weekdays
            .iter()
            .filter(|&&weekday| weekday < self.anchor_weekday)
            .count() as u64;

        self.period = periods;
        periods * self.weekdays.len() as u64 - before_anchor
    }

    fn offset(&self) -> Option<i64> {
        let week = i64::try_from(self.period)
            .ok()?
            .checked_mul(i64::from(DAYS_IN_WEEK) * i64::from(self.interval))?;
        week.checked_add(i64::from(self.weekdays[self.index]) - i64::from(self.anchor_weekday))
    }
}

impl Iterator for Weekly {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            if self.index == self.weekdays.len() {
                self.index = 0;
                self.period += 1;
            }

            let offset = self.offset()?;
            if offset < 0 {
                self.index += 1;
                continue;
            }

            let date = checked_add_days(self.anchor, offset)?;
            self.index += 1;
            return Some(date);
        }
    }
}
