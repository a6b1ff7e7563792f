use crate::{
    expand, materialize, Event, Materialized, Occurrences, RecurrenceError, RecurrenceResult,
    RecurrenceRule, Window,
};
use chrono::NaiveDate;

/// A template event and the rule that repeats it.
///
/// The template's date anchors the rule. Removing a single occurrence only
/// records an exception; dropping the series removes template and rule
/// together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Series {
    template: Event,
    rule: RecurrenceRule,
}

impl Series {
    pub fn new(template: Event, rule: RecurrenceRule) -> RecurrenceResult<Self> {
        rule.validate()?;
        if template.id.trim().is_empty() {
            return Err(RecurrenceError::InvalidEvent(format!(
                "series template '{}' has no id",
                template.title
            )));
        }

        Ok(Series { template, rule })
    }

    /// The id every occurrence carries as its `series_id`.
    pub fn id(&self) -> &str {
        self.template
            .series_id
            .as_deref()
            .unwrap_or(self.template.id.as_str())
    }

    pub fn anchor(&self) -> NaiveDate {
        self.template.date
    }

    pub fn template(&self) -> &Event {
        &self.template
    }

    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    pub fn dates(&self, window: Window) -> RecurrenceResult<Occurrences> {
        expand(self.anchor(), &self.rule, window)
    }

    pub fn occurrences(&self, window: Window) -> RecurrenceResult<Materialized<Occurrences>> {
        materialize(&self.template, self.dates(window)?)
    }

    /// Whether `date` is a visible occurrence.
    pub fn occurs_on(&self, date: NaiveDate) -> RecurrenceResult<bool> {
        Ok(self.dates(Window::between(date, date))?.next().is_some())
    }

    /// Deletes the occurrence on `date` by recording an exception.
    ///
    /// Returns `false` when the date was already excepted. Dates the rule
    /// never schedules are rejected.
    pub fn exclude(&mut self, date: NaiveDate) -> RecurrenceResult<bool> {
        if self.rule.is_excepted(date) {
            return Ok(false);
        }

        if !self.occurs_on(date)? {
            return Err(RecurrenceError::InvalidDate(format!(
                "{} is not an occurrence of series '{}'",
                date,
                self.id()
            )));
        }

        tracing::debug!(series = self.id(), %date, "excluding occurrence");
        Ok(self.rule.exceptions.insert(date))
    }

    /// Undoes [`Series::exclude`]. Returns `false` if `date` was not excepted.
    pub fn restore(&mut self, date: NaiveDate) -> bool {
        self.rule.exceptions.remove(&date)
    }

    pub fn into_parts(self) -> (Event, RecurrenceRule) {
        (self.template, self.rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::{End, Frequency};
    use chrono::Weekday;

    fn mondays_and_thursdays() -> Series {
        let rule = RecurrenceRule {
            by_weekday: vec![Weekday::Mon, Weekday::Thu],
            end: End::Count(6),
            ..rule(Frequency::Weekly)
        };
        Series::new(standup(), rule).unwrap()
    }

    #[test]
    fn occurrences_carry_series_identity() {
        let series = mondays_and_thursdays();
        let events: Vec<_> = series.occurrences(Window::unbounded()).unwrap().collect();

        assert_eq!(events.len(), 6);
        assert!(events
            .iter()
            .all(|event| event.is_recurring() && event.series_id.as_deref() == Some("standup")));
        assert_eq!(events[1].date, date(2024, 7, 4));
        assert_eq!(events[5].date, date(2024, 7, 18));
    }

    #[test_log::test]
    fn excluding_hides_one_occurrence() {
        let mut series = mondays_and_thursdays();

        assert!(series.exclude(date(2024, 7, 8)).unwrap());
        assert!(!series.occurs_on(date(2024, 7, 8)).unwrap());

        let dates: Vec<_> = series.dates(Window::unbounded()).unwrap().collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 7, 1),
                date(2024, 7, 4),
                date(2024, 7, 11),
                date(2024, 7, 15),
                date(2024, 7, 18)
            ]
        );
    }

    #[test]
    fn excluding_twice() {
        let mut series = mondays_and_thursdays();
        assert!(series.exclude(date(2024, 7, 8)).unwrap());
        assert!(!series.exclude(date(2024, 7, 8)).unwrap());
    }

    #[test]
    fn excluding_an_unscheduled_date() {
        let mut series = mondays_and_thursdays();

        // a Tuesday, and a Monday past the count
        for date in [date(2024, 7, 2), date(2024, 7, 22)] {
            assert!(matches!(
                series.exclude(date),
                Err(RecurrenceError::InvalidDate(_))
            ));
        }
        assert!(series.rule().exceptions.is_empty());
    }

    #[test]
    fn restore_brings_it_back() {
        let mut series = mondays_and_thursdays();
        series.exclude(date(2024, 7, 11)).unwrap();

        assert!(series.restore(date(2024, 7, 11)));
        assert!(!series.restore(date(2024, 7, 11)));
        assert!(series.occurs_on(date(2024, 7, 11)).unwrap());
    }

    #[test]
    fn rejects_invalid_parts() {
        let zero = RecurrenceRule {
            interval: 0,
            ..rule(Frequency::Daily)
        };
        assert!(matches!(
            Series::new(standup(), zero),
            Err(RecurrenceError::InvalidRule(_))
        ));

        let anonymous = Event {
            id: " ".to_owned(),
            ..standup()
        };
        assert!(matches!(
            Series::new(anonymous, rule(Frequency::Daily)),
            Err(RecurrenceError::InvalidEvent(_))
        ));
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Series>();
        assert_send_sync::<crate::Agenda>();
        assert_send_sync::<Materialized<Occurrences>>();
    }

    #[test]
    fn deleting_the_series_returns_both_parts() {
        let mut series = mondays_and_thursdays();
        series.exclude(date(2024, 7, 4)).unwrap();

        let (template, rule) = series.into_parts();
        assert_eq!(template, standup());
        assert!(rule.is_excepted(date(2024, 7, 4)));
    }
}
