//! Recurring calendar events.
//!
//! A [`RecurrenceRule`] anchored on a template event's date expands into a
//! lazy, ascending sequence of occurrence dates ([`expand`]), which
//! [`materialize`] turns back into [`Event`] records sharing a series id.
//!
//! ```
//! use recur::{expand, End, Frequency, RecurrenceRule, Window};
//! use chrono::NaiveDate;
//!
//! let anchor = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
//! let rule = RecurrenceRule {
//!     end: End::Count(2),
//!     ..RecurrenceRule::new(Frequency::Monthly)
//! };
//!
//! let dates: Vec<_> = expand(anchor, &rule, Window::unbounded()).unwrap().collect();
//! assert_eq!(dates[1], NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
//! ```

mod agenda;
pub mod calendar_math;
mod daily;
mod error;
mod event;
mod monthly;
mod occurrences;
mod rule;
mod series;
mod weekly;
mod yearly;

#[cfg(test)]
mod test_helpers;

pub use agenda::Agenda;
pub use daily::Daily;
pub use error::{RecurrenceError, RecurrenceResult};
pub use event::{materialize, Event, Materialized};
pub use monthly::Monthly;
pub use occurrences::{expand, Occurrences, Window};
pub use rule::{weekday_from_index, End, EndType, Frequency, RecurrenceRule, RuleRecord};
pub use series::Series;
pub use weekly::Weekly;
pub use yearly::Yearly;
