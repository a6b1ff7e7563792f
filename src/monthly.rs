use crate::calendar_math::{from_month_index, month_index};
use chrono::{Datelike as _, NaiveDate};

/// One day of every `interval`-th month.
///
/// The day is clamped to the month's length, so the 31st of a monthly
/// series lands on Feb 28/29 instead of skipping February.
#[derive(Clone, Debug)]
pub struct Monthly {
    anchor: NaiveDate,
    interval: u32,
    day: u32,
    period: u64,
}

impl Monthly {
    /// `by_month_day` defaults to the anchor's day of month.
    pub fn new(anchor: NaiveDate, interval: u32, by_month_day: Option<u32>) -> Self {
        Monthly {
            anchor,
            interval: interval.max(1),
            day: by_month_day.unwrap_or_else(|| anchor.day()),
            period: 0,
        }
    }

    /// Fast-forwards a fresh schedule past every month before `min`'s month.
    /// Returns how many candidates were passed over.
    pub fn skip_before(&mut self, min: NaiveDate) -> u64 {
        let months = month_index(min) - month_index(self.anchor);
        if self.period != 0 || months <= 0 {
            return 0;
        }

        let periods = (months as u64).div_ceil(u64::from(self.interval));
        let before_anchor = match self.candidate(0) {
            Some(first) if first < self.anchor => 1,
            _ => 0,
        };

        self.period = periods;
        periods - before_anchor
    }

    fn candidate(&self, period: u64) -> Option<NaiveDate> {
        let offset = i64::try_from(period)
            .ok()?
            .checked_mul(i64::from(self.interval))?;
        from_month_index(month_index(self.anchor).checked_add(offset)?, self.day)
    }
}

impl Iterator for Monthly {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            let date = self.candidate(self.period)?;
            self.period += 1;

            // only the anchor's own month can fall before it
            if date < self.anchor {
                continue;
            }
            return Some(date);
        }
    }
}
