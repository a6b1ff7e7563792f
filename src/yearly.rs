use crate::calendar_math::checked_clamped;
use chrono::{Datelike as _, NaiveDate};

/// The anchor's day of one month of every `interval`-th year.
#[derive(Clone, Debug)]
pub struct Yearly {
    anchor: NaiveDate,
    interval: u32,
    month: u32,
    period: u64,
}

impl Yearly {
    /// `by_month` defaults to the anchor's month.
    pub fn new(anchor: NaiveDate, interval: u32, by_month: Option<u32>) -> Self {
        Yearly {
            anchor,
            interval: interval.max(1),
            month: by_month.unwrap_or_else(|| anchor.month()),
            period: 0,
        }
    }

    /// Fast-forwards a fresh schedule past every year before `min`'s year.
    /// Returns how many candidates were passed over.
    pub fn skip_before(&mut self, min: NaiveDate) -> u64 {
        let years = i64::from(min.year()) - i64::from(self.anchor.year());
        if self.period != 0 || years <= 0 {
            return 0;
        }

        let periods = (years as u64).div_ceil(u64::from(self.interval));
        let before_anchor = match self.candidate(0) {
            Some(first) if first < self.anchor => 1,
            _ => 0,
        };

        self.period = periods;
        periods - before_anchor
    }

    fn candidate(&self, period: u64) -> Option<NaiveDate> {
        let offset = i32::try_from(period)
            .ok()?
            .checked_mul(i32::try_from(self.interval).ok()?)?;
        let year = self.anchor.year().checked_add(offset)?;
        checked_clamped(year, self.month, self.anchor.day())
    }
}

impl Iterator for Yearly {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            let date = self.candidate(self.period)?;
            self.period += 1;

            if date < self.anchor {
                continue;
            }
            return Some(date);
        }
    }
}
