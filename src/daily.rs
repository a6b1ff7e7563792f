use crate::calendar_math::{checked_add_days, days_between};
use chrono::NaiveDate;

/// Every `interval` days starting on the anchor.
#[derive(Clone, Debug)]
pub struct Daily {
    anchor: NaiveDate,
    interval: u32,
    period: u64,
}

impl Daily {
    pub fn new(anchor: NaiveDate, interval: u32) -> Self {
        Daily {
            anchor,
            interval: interval.max(1),
            period: 0,
        }
    }

    /// Fast-forwards a fresh schedule past every candidate before `min`.
    /// Returns how many candidates were passed over.
    pub fn skip_before(&mut self, min: NaiveDate) -> u64 {
        let days = days_between(self.anchor, min);
        if self.period != 0 || days <= 0 {
            return 0;
        }

        self.period = (days as u64).div_ceil(u64::from(self.interval));
        self.period
    }
}

impl Iterator for Daily {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let offset = i64::try_from(self.period)
            .ok()?
            .checked_mul(i64::from(self.interval))?;
        let date = checked_add_days(self.anchor, offset)?;
        self.period += 1;
        Some(date)
    }
}
