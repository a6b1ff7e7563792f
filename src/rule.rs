use crate::{RecurrenceError, RecurrenceResult};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// How a series terminates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum End {
    #[default]
    Never,
    /// Number of scheduled occurrences, excepted ones included.
    Count(u32),
    /// Last date (inclusive) an occurrence may fall on.
    Until(NaiveDate),
}

impl End {
    pub fn end_type(&self) -> EndType {
        match self {
            End::Never => EndType::Never,
            End::Count(_) => EndType::Count,
            End::Until(_) => EndType::Until,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndType {
    #[default]
    Never,
    Count,
    Until,
}

/// A recurrence rule attached to one anchor event.
///
/// The `by_*` fields only apply to their own frequency (`by_weekday` to
/// weekly, `by_month_day` to monthly, `by_month` to yearly) and are ignored
/// otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleRecord", into = "RuleRecord")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub end: End,
    pub by_weekday: Vec<Weekday>,
    pub by_month_day: Option<u32>,
    pub by_month: Option<u32>,
    pub exceptions: BTreeSet<NaiveDate>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        RecurrenceRule::new(Frequency::default())
    }
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        RecurrenceRule {
            frequency,
            interval: 1,
            end: End::Never,
            by_weekday: Vec::new(),
            by_month_day: None,
            by_month: None,
            exceptions: BTreeSet::new(),
        }
    }

    /// Checks the invariants the type system cannot express.
    pub fn validate(&self) -> RecurrenceResult<()> {
        if self.interval == 0 {
            return Err(invalid("interval must be at least 1"));
        }

        if let End::Count(0) = self.end {
            return Err(invalid("count must be at least 1"));
        }

        if let Some(day) = self.by_month_day {
            if !(1..=31).contains(&day) {
                let reason = format!("byMonthDay {} is not between 1 and 31", day);
                return Err(invalid(reason));
            }
        }

        if let Some(month) = self.by_month {
            if !(1..=12).contains(&month) {
                let reason = format!("byMonth {} is not between 1 and 12", month);
                return Err(invalid(reason));
            }
        }

        Ok(())
    }

    pub fn is_excepted(&self, date: NaiveDate) -> bool {
        self.exceptions.contains(&date)
    }
}

/// The rule as the front-end and event stores exchange it: a flat record
/// where `endType` selects which of `count`/`until` is meaningful.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub end_type: EndType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_weekday: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_month_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<NaiveDate>,
}

fn default_interval() -> u32 {
    1
}

impl TryFrom<RuleRecord> for RecurrenceRule {
    type Error = RecurrenceError;

    fn try_from(record: RuleRecord) -> RecurrenceResult<Self> {
        let end = match (record.end_type, record.count, record.until) {
            (EndType::Never, None, None) => End::Never,
            (EndType::Count, Some(count), None) => End::Count(count),
            (EndType::Until, None, Some(until)) => End::Until(until),
            (end_type, count, until) => {
                return Err(invalid(format!(
                    "endType {:?} does not match count {:?} and until {:?}",
                    end_type, count, until
                )))
            }
        };

        let by_weekday = record
            .by_weekday
            .iter()
            .map(|&index| {
                weekday_from_index(index)
                    .ok_or_else(|| invalid(format!("byWeekday {} is not between 0 and 6", index)))
            })
            .collect::<RecurrenceResult<_>>()?;

        let rule = RecurrenceRule {
            frequency: record.frequency,
            interval: record.interval,
            end,
            by_weekday,
            by_month_day: record.by_month_day,
            by_month: record.by_month,
            exceptions: record.exceptions.into_iter().collect(),
        };

        rule.validate()?;
        Ok(rule)
    }
}

impl From<RecurrenceRule> for RuleRecord {
    fn from(rule: RecurrenceRule) -> RuleRecord {
        let (count, until) = match rule.end {
            End::Never => (None, None),
            End::Count(count) => (Some(count), None),
            End::Until(until) => (None, Some(until)),
        };

        RuleRecord {
            frequency: rule.frequency,
            interval: rule.interval,
            end_type: rule.end.end_type(),
            count,
            until,
            by_weekday: rule
                .by_weekday
                .iter()
                .map(|weekday| weekday.num_days_from_sunday() as u8)
                .collect(),
            by_month_day: rule.by_month_day,
            by_month: rule.by_month,
            exceptions: rule.exceptions.into_iter().collect(),
        }
    }
}

const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Maps 0 = Sunday .. 6 = Saturday onto chrono's weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    WEEKDAYS_FROM_SUNDAY.get(usize::from(index)).copied()
}

fn invalid(reason: impl Into<String>) -> RecurrenceError {
    RecurrenceError::InvalidRule(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let rule = RecurrenceRule::default();
        assert_eq!(rule.frequency, Frequency::Daily);
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.end, End::Never);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn zero_interval() {
        let rule = RecurrenceRule {
            interval: 0,
            ..rule(Frequency::Weekly)
        };
        assert!(matches!(
            rule.validate(),
            Err(RecurrenceError::InvalidRule(_))
        ));
    }

    #[test]
    fn zero_count() {
        let rule = RecurrenceRule {
            end: End::Count(0),
            ..rule(Frequency::Daily)
        };
        assert!(matches!(
            rule.validate(),
            Err(RecurrenceError::InvalidRule(_))
        ));
    }

    #[test]
    fn out_of_range_by_fields() {
        let month_day = RecurrenceRule {
            by_month_day: Some(32),
            ..rule(Frequency::Monthly)
        };
        let month = RecurrenceRule {
            by_month: Some(0),
            ..rule(Frequency::Yearly)
        };

        assert!(month_day.validate().is_err());
        assert!(month.validate().is_err());
    }

    #[test]
    fn weekday_indices_start_on_sunday() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
    }

    #[test]
    fn deserializes_front_end_shape() {
        let rule: RecurrenceRule = serde_json::from_value(json!({
            "frequency": "weekly",
            "interval": 2,
            "endType": "until",
            "until": "2024-12-31",
            "byWeekday": [1, 3],
            "exceptions": ["2024-07-03"],
        }))
        .unwrap();

        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.end, End::Until(date(2024, 12, 31)));
        assert_eq!(rule.by_weekday, vec![Weekday::Mon, Weekday::Wed]);
        assert!(rule.is_excepted(date(2024, 7, 3)));
    }

    #[test]
    fn interval_and_end_type_default() {
        let record = json!({ "frequency": "monthly" });
        let rule: RecurrenceRule = serde_json::from_value(record).unwrap();
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.end, End::Never);
    }

    #[test]
    fn rejects_mismatched_end_type() {
        let missing_count = serde_json::from_value::<RecurrenceRule>(json!({
            "frequency": "daily",
            "endType": "count",
        }));
        let stray_until = serde_json::from_value::<RecurrenceRule>(json!({
            "frequency": "daily",
            "endType": "count",
            "count": 3,
            "until": "2024-01-01",
        }));

        assert!(missing_count.is_err());
        assert!(stray_until.is_err());
    }

    #[test]
    fn rejects_invalid_record() {
        let record = RuleRecord {
            interval: 0,
            ..RuleRecord::from(rule(Frequency::Daily))
        };
        assert!(matches!(
            RecurrenceRule::try_from(record),
            Err(RecurrenceError::InvalidRule(_))
        ));

        let weekday = serde_json::from_value::<RecurrenceRule>(json!({
            "frequency": "weekly",
            "byWeekday": [7],
        }));
        assert!(weekday.is_err());
    }

    #[test]
    fn serializes_front_end_shape() {
        let rule = RecurrenceRule {
            end: End::Count(5),
            by_weekday: vec![Weekday::Sun, Weekday::Fri],
            ..rule(Frequency::Weekly)
        };

        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "frequency": "weekly",
                "interval": 1,
                "endType": "count",
                "count": 5,
                "byWeekday": [0, 5],
            })
        );
    }

    #[test]
    fn survives_a_store_round_trip() {
        let rule = RecurrenceRule {
            end: End::Until(date(2025, 6, 30)),
            by_month_day: Some(31),
            exceptions: [date(2024, 8, 31)].into_iter().collect(),
            ..rule(Frequency::Monthly)
        };

        let stored = serde_json::to_string(&rule).unwrap();
        let loaded: RecurrenceRule = serde_json::from_str(&stored).unwrap();
        assert_eq!(rule, loaded);
    }
}
