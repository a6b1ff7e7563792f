use crate::{RecurrenceError, RecurrenceResult};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, Offset as _, TimeZone as _};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A calendar event: a one-off, a series template, or one materialized
/// occurrence of a series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    /// Shared by every occurrence of one series, absent on one-off events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    pub date: NaiveDate,
    pub title: String,
    /// Wall-clock start; `None` for all-day events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    /// Length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Zone `time` is read in, UTC when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<Tz>,
}

impl Event {
    /// An all-day one-off event with a fresh id.
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Event {
            id: new_id(),
            series_id: None,
            date,
            title: title.into(),
            time: None,
            duration: None,
            color: None,
            description: None,
            timezone: None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.series_id.is_some()
    }

    /// The instant the event starts, or `None` for all-day events.
    ///
    /// A wall-clock time repeated by a DST fold resolves to its first
    /// instant; one skipped by a DST gap moves forward by the gap.
    pub fn starts_at(&self) -> Option<DateTime<Tz>> {
        let timezone = self.timezone.unwrap_or(Tz::UTC);
        let local = self.date.and_time(self.time?);

        match timezone.from_local_datetime(&local) {
            LocalResult::Single(start) => Some(start),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => {
                // read the wall clock with the offset in force before the gap
                let day_before = local.checked_sub_signed(Duration::days(1))?;
                let before = timezone
                    .offset_from_utc_datetime(&day_before)
                    .fix()
                    .local_minus_utc();
                let utc = local.checked_sub_signed(Duration::seconds(i64::from(before)))?;
                Some(timezone.from_utc_datetime(&utc))
            }
        }
    }

    /// `None` for all-day events and for ends past the last representable instant.
    pub fn ends_at(&self) -> Option<DateTime<Tz>> {
        let duration = Duration::minutes(i64::from(self.duration.unwrap_or(0)));
        self.starts_at()?.checked_add_signed(duration)
    }

    fn occurrence(&self, series_id: &str, date: NaiveDate) -> Event {
        Event {
            id: new_id(),
            series_id: Some(series_id.to_owned()),
            date,
            ..self.clone()
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Occurrence records produced from a template, one per input date.
#[derive(Clone, Debug)]
pub struct Materialized<I> {
    template: Event,
    series_id: String,
    dates: I,
}

impl<I: Iterator<Item = NaiveDate>> Iterator for Materialized<I> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let date = self.dates.next()?;
        Some(self.template.occurrence(&self.series_id, date))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.dates.size_hint()
    }
}

/// Maps occurrence dates onto copies of `template`, in input order.
///
/// Each copy gets a fresh id, the template's date replaced, and the series
/// id of the template (its own id when the template is not yet part of a
/// series). Nothing is reordered or dropped.
#[tracing::instrument(level = "debug", skip(template, dates), fields(template = %template.id))]
pub fn materialize<I>(template: &Event, dates: I) -> RecurrenceResult<Materialized<I::IntoIter>>
where
    I: IntoIterator<Item = NaiveDate>,
{
    if template.id.trim().is_empty() {
        return Err(RecurrenceError::InvalidEvent(format!(
            "template '{}' on {} has no id",
            template.title, template.date
        )));
    }

    let series_id = template
        .series_id
        .clone()
        .unwrap_or_else(|| template.id.clone());

    Ok(Materialized {
        template: template.clone(),
        series_id,
        dates: dates.into_iter(),
    })
}
