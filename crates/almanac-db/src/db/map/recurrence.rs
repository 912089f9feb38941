use almanac_core::model::{RecurrencePattern, RecurrenceRule};

use crate::model::recurrence::{NewRecurrenceRule, RecurrenceRuleChangeset, RecurrenceRuleRecord};

impl From<RecurrenceRuleRecord> for RecurrenceRule {
    fn from(record: RecurrenceRuleRecord) -> Self {
        Self {
            id: record.id,
            pattern: RecurrencePattern {
                frequency: record.frequency.into(),
                monthly_type: record.monthly_type.map(Into::into),
                interval: record.interval,
                weekdays: record.weekdays,
                weekday_ordinal: record.weekday_ordinal,
                end_date: record.end_date,
                repeat_count: record.repeat_count,
            },
        }
    }
}

impl<'a> NewRecurrenceRule<'a> {
    #[must_use]
    pub fn from_rule(rule: &'a RecurrenceRule) -> Self {
        let pattern = &rule.pattern;
        Self {
            id: rule.id,
            frequency: pattern.frequency.into(),
            monthly_type: pattern.monthly_type.map(Into::into),
            interval: pattern.interval,
            weekdays: pattern.weekdays.as_deref(),
            weekday_ordinal: pattern.weekday_ordinal,
            end_date: pattern.end_date,
            repeat_count: pattern.repeat_count,
        }
    }
}

impl<'a> RecurrenceRuleChangeset<'a> {
    #[must_use]
    pub fn from_pattern(
        pattern: &'a RecurrencePattern,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            frequency: pattern.frequency.into(),
            monthly_type: pattern.monthly_type.map(Into::into),
            interval: pattern.interval,
            weekdays: pattern.weekdays.as_deref(),
            weekday_ordinal: pattern.weekday_ordinal,
            end_date: pattern.end_date,
            repeat_count: pattern.repeat_count,
            updated_at: now,
        }
    }
}
