use crate::calendar_math::{clamped_date, last_day_of_month};
use crate::{Daily, End, Frequency, Monthly, RecurrenceResult, RecurrenceRule, Weekly, Yearly};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::iter::FusedIterator;

/// Inclusive date bounds for a query. A missing bound is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Window {
    pub fn unbounded() -> Self {
        Window::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Window {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn starting(start: NaiveDate) -> Self {
        Window {
            start: Some(start),
            end: None,
        }
    }

    pub fn ending(end: NaiveDate) -> Self {
        Window {
            start: None,
            end: Some(end),
        }
    }

    /// Every day of one calendar month, as a month view shows it.
    pub fn month(year: i32, month: u32) -> RecurrenceResult<Self> {
        let first = clamped_date(year, month, 1)?;
        let last = clamped_date(year, month, last_day_of_month(year, month)?)?;
        Ok(Window::between(first, last))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

#[derive(Clone, Debug)]
enum Schedule {
    Daily(Daily),
    Weekly(Weekly),
    Monthly(Monthly),
    Yearly(Yearly),
}

impl Schedule {
    fn new(anchor: NaiveDate, rule: &RecurrenceRule) -> Self {
        match rule.frequency {
            Frequency::Daily => Schedule::Daily(Daily::new(anchor, rule.interval)),
            Frequency::Weekly => {
                Schedule::Weekly(Weekly::new(anchor, rule.interval, &rule.by_weekday))
            }
            Frequency::Monthly => {
                Schedule::Monthly(Monthly::new(anchor, rule.interval, rule.by_month_day))
            }
            Frequency::Yearly => {
                Schedule::Yearly(Yearly::new(anchor, rule.interval, rule.by_month))
            }
        }
    }

    fn skip_before(&mut self, min: NaiveDate) -> u64 {
        match self {
            Schedule::Daily(d) => d.skip_before(min),
            Schedule::Weekly(w) => w.skip_before(min),
            Schedule::Monthly(m) => m.skip_before(min),
            Schedule::Yearly(y) => y.skip_before(min),
        }
    }
}

impl Iterator for Schedule {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        match self {
            Schedule::Daily(d) => d.next(),
            Schedule::Weekly(w) => w.next(),
            Schedule::Monthly(m) => m.next(),
            Schedule::Yearly(y) => y.next(),
        }
    }
}

/// Lazily expanded occurrence dates of one rule, strictly ascending.
///
/// Every scheduled candidate consumes one slot of an [`End::Count`] limit,
/// including candidates hidden by an exception or by the window start.
#[derive(Clone, Debug)]
pub struct Occurrences {
    schedule: Schedule,
    end: End,
    exceptions: BTreeSet<NaiveDate>,
    window: Window,
    consumed: u64,
    finished: bool,
}

impl Occurrences {
    /// Scheduled candidates seen so far, hidden ones included.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    fn finish(&mut self, reason: &'static str) -> Option<NaiveDate> {
        tracing::debug!(reason, consumed = self.consumed, "expansion finished");
        self.finished = true;
        None
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while !self.finished {
            if let End::Count(count) = self.end {
                if self.consumed >= u64::from(count) {
                    return self.finish("count");
                }
            }

            let candidate = match self.schedule.next() {
                Some(candidate) => candidate,
                None => return self.finish("calendar range"),
            };

            if let End::Until(until) = self.end {
                if candidate > until {
                    return self.finish("until");
                }
            }

            if let Some(end) = self.window.end {
                if candidate > end {
                    return self.finish("window end");
                }
            }

            self.consumed += 1;

            if self.exceptions.contains(&candidate) {
                tracing::trace!(%candidate, "skipping exception");
                continue;
            }

            if self.window.start.is_some_and(|start| candidate < start) {
                continue;
            }

            return Some(candidate);
        }

        None
    }
}

impl FusedIterator for Occurrences {}

/// Expands `rule` anchored on `anchor` into its occurrence dates.
///
/// Rule problems are reported here, before any date is produced. The
/// returned iterator is lazy; with [`End::Never`] and no window end it never
/// ends, so bound it with `take`/`take_while` or a window.
#[tracing::instrument(
    level = "debug",
    skip(rule),
    fields(frequency = ?rule.frequency, interval = rule.interval)
)]
pub fn expand(
    anchor: NaiveDate,
    rule: &RecurrenceRule,
    window: Window,
) -> RecurrenceResult<Occurrences> {
    rule.validate()?;

    let mut schedule = Schedule::new(anchor, rule);
    let consumed = match window.start {
        Some(start) if start > anchor => schedule.skip_before(start),
        _ => 0,
    };
    if consumed > 0 {
        tracing::trace!(consumed, "fast-forwarded to window start");
    }

    Ok(Occurrences {
        schedule,
        end: rule.end,
        exceptions: rule.exceptions.clone(),
        window,
        consumed,
        finished: false,
    })
}
