use crate::{Event, Frequency, RecurrenceRule};
use chrono::NaiveDate;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("bug: invalid test date")
}

/// Monday, July 1st 2024.
pub fn july_first() -> NaiveDate {
    date(2024, 7, 1)
}

pub fn rule(frequency: Frequency) -> RecurrenceRule {
    RecurrenceRule {
        frequency,
        ..RecurrenceRule::default()
    }
}

pub fn standup() -> Event {
    Event {
        id: "standup".to_owned(),
        ..Event::new("Standup", july_first())
    }
}
