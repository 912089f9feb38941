//! ## Summary
//! Recurrence definitions attached to events.
//!
//! A definition is stored, never expanded: the server keeps frequency,
//! interval, weekday set and end conditions, and clients compute occurrences.
//!
//! Three shapes appear here:
//! - [`RecurrenceInput`]: raw client fields, before typing
//! - [`RecurrenceBundle`]: typed fields of one request, every field optional
//! - [`RecurrencePattern`] / [`RecurrenceRule`]: a complete stored definition

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

pub const DEFAULT_INTERVAL: i32 = 1;
pub const MIN_INTERVAL: i32 = 1;
pub const MAX_INTERVAL: i32 = 365;

const WEEKDAYS_MESSAGE: &str = "weekdays must be a list of integers.";
const INTERVAL_MESSAGE: &str = "Interval must be between 1 and 365.";

/// Step unit between occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Case-insensitive parse of a frequency name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a monthly rule picks its day: by weekday position or by calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonthlyType {
    Weekday,
    Date,
}

impl MonthlyType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekday => "WEEKDAY",
            Self::Date => "DATE",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "WEEKDAY" => Some(Self::Weekday),
            "DATE" => Some(Self::Date),
            _ => None,
        }
    }
}

impl fmt::Display for MonthlyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Summary
/// Recurrence fields exactly as a client sent them.
///
/// `weekdays` stays an untyped JSON value so that a malformed list is reported
/// as a field error instead of failing body parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecurrenceInput {
    pub frequency: Option<String>,
    pub monthly_type: Option<String>,
    pub interval: Option<i64>,
    pub weekdays: Option<serde_json::Value>,
    pub weekday_ordinal: Option<i64>,
    pub end_date: Option<NaiveDate>,
    pub repeat_count: Option<i64>,
}

impl RecurrenceInput {
    /// ## Summary
    /// Types every field. Blank strings, `"none"` frequencies and empty weekday
    /// lists become absent values.
    ///
    /// ## Errors
    /// Returns field errors for unknown enum names, non-integer weekdays and
    /// integers that do not fit the stored column width.
    pub fn into_bundle(self) -> Result<RecurrenceBundle, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let frequency = match self.frequency.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) if name.eq_ignore_ascii_case("none") => None,
            Some(name) => {
                let parsed = Frequency::parse(name);
                if parsed.is_none() {
                    errors.push("frequency", format!("\"{name}\" is not a valid choice."));
                }
                parsed
            }
        };

        let monthly_type = match self.monthly_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => {
                let parsed = MonthlyType::parse(name);
                if parsed.is_none() {
                    errors.push(
                        "monthly_type",
                        format!("\"{name}\" is not a valid choice."),
                    );
                }
                parsed
            }
        };

        let interval = errors.capture(narrow("interval", self.interval)).flatten();
        let weekday_ordinal = errors
            .capture(narrow("weekday_ordinal", self.weekday_ordinal))
            .flatten();
        let repeat_count = errors
            .capture(narrow("repeat_count", self.repeat_count))
            .flatten();
        let weekdays = errors
            .capture(parse_weekdays(self.weekdays.as_ref()))
            .flatten();

        errors.into_result()?;

        Ok(RecurrenceBundle {
            frequency,
            monthly_type,
            interval,
            weekdays,
            weekday_ordinal,
            end_date: self.end_date,
            repeat_count,
        })
    }
}

fn narrow(field: &'static str, value: Option<i64>) -> Result<Option<i32>, ValidationErrors> {
    value
        .map(|v| {
            i32::try_from(v)
                .map_err(|_err| ValidationErrors::single(field, "Ensure this value fits in 32 bits."))
        })
        .transpose()
}

/// ## Summary
/// Checks that `weekdays` is a list of integers and returns it deduplicated,
/// keeping first-seen order.
///
/// ## Errors
/// Returns a `weekdays` field error for any non-list value or non-integer element.
pub fn parse_weekdays(
    value: Option<&serde_json::Value>,
) -> Result<Option<Vec<i32>>, ValidationErrors> {
    let items = match value {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Array(items)) => items,
        Some(_) => return Err(ValidationErrors::single("weekdays", WEEKDAYS_MESSAGE)),
    };

    let mut weekdays = Vec::with_capacity(items.len());
    for item in items {
        let code = item
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| ValidationErrors::single("weekdays", WEEKDAYS_MESSAGE))?;
        if !weekdays.contains(&code) {
            weekdays.push(code);
        }
    }

    Ok(if weekdays.is_empty() {
        None
    } else {
        Some(weekdays)
    })
}

/// ## Summary
/// Typed recurrence fields of one create or update request.
///
/// Every field is optional: on create the bundle describes a new rule, on
/// update it is a patch over the stored rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurrenceBundle {
    pub frequency: Option<Frequency>,
    pub monthly_type: Option<MonthlyType>,
    pub interval: Option<i32>,
    pub weekdays: Option<Vec<i32>>,
    pub weekday_ordinal: Option<i32>,
    pub end_date: Option<NaiveDate>,
    pub repeat_count: Option<i32>,
}

impl RecurrenceBundle {
    #[must_use]
    pub fn is_present(&self) -> bool {
        recurrence_bundle_is_present(self)
    }
}

/// ## Summary
/// True when at least one of frequency, interval, weekdays, weekday ordinal,
/// end date or repeat count is set and non-empty.
///
/// `monthly_type` alone does not count: it only refines a monthly frequency.
#[must_use]
pub fn recurrence_bundle_is_present(bundle: &RecurrenceBundle) -> bool {
    bundle.frequency.is_some()
        || bundle.interval.is_some()
        || bundle.weekdays.as_ref().is_some_and(|w| !w.is_empty())
        || bundle.weekday_ordinal.is_some()
        || bundle.end_date.is_some()
        || bundle.repeat_count.is_some()
}

/// ## Summary
/// A complete recurrence definition without its storage identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    pub monthly_type: Option<MonthlyType>,
    pub interval: i32,
    pub weekdays: Option<Vec<i32>>,
    pub weekday_ordinal: Option<i32>,
    pub end_date: Option<NaiveDate>,
    pub repeat_count: Option<i32>,
}

impl RecurrencePattern {
    /// ## Summary
    /// Builds a definition from exactly the supplied bundle. `interval`
    /// defaults to 1; `frequency` is required.
    ///
    /// ## Errors
    /// Returns field errors when `frequency` is missing or an invariant fails.
    pub fn from_bundle(bundle: &RecurrenceBundle) -> Result<Self, ValidationErrors> {
        let Some(frequency) = bundle.frequency else {
            let mut errors = ValidationErrors::single(
                "frequency",
                "This field is required when recurrence is set.",
            );
            check_bounds(
                bundle.interval.unwrap_or(DEFAULT_INTERVAL),
                bundle.repeat_count,
                &mut errors,
            );
            return Err(errors);
        };

        let pattern = Self {
            frequency,
            monthly_type: bundle.monthly_type,
            interval: bundle.interval.unwrap_or(DEFAULT_INTERVAL),
            weekdays: bundle.weekdays.clone().filter(|w| !w.is_empty()),
            weekday_ordinal: bundle.weekday_ordinal,
            end_date: bundle.end_date,
            repeat_count: bundle.repeat_count,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    /// ## Summary
    /// Overwrites the fields present in `patch`; omitted fields keep their
    /// current values. An empty weekday list counts as omitted.
    pub fn apply(&mut self, patch: &RecurrenceBundle) {
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if let Some(monthly_type) = patch.monthly_type {
            self.monthly_type = Some(monthly_type);
        }
        if let Some(interval) = patch.interval {
            self.interval = interval;
        }
        if let Some(weekdays) = patch.weekdays.as_ref().filter(|w| !w.is_empty()) {
            self.weekdays = Some(weekdays.clone());
        }
        if let Some(ordinal) = patch.weekday_ordinal {
            self.weekday_ordinal = Some(ordinal);
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = Some(end_date);
        }
        if let Some(count) = patch.repeat_count {
            self.repeat_count = Some(count);
        }
    }

    /// ## Summary
    /// Checks the stored-definition invariants.
    ///
    /// ## Errors
    /// Returns field errors when `interval` is outside [1, 365] or
    /// `repeat_count` is not positive.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_bounds(self.interval, self.repeat_count, &mut errors);
        errors.into_result()
    }
}

fn check_bounds(interval: i32, repeat_count: Option<i32>, errors: &mut ValidationErrors) {
    if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&interval) {
        errors.push("interval", INTERVAL_MESSAGE);
    }
    if repeat_count.is_some_and(|count| count < 1) {
        errors.push("repeat_count", "Ensure this value is greater than or equal to 1.");
    }
}

/// A stored recurrence definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub id: uuid::Uuid,
    #[serde(flatten)]
    pub pattern: RecurrencePattern,
}

impl RecurrenceRule {
    /// ## Summary
    /// Returns this rule with `patch` merged over it, re-validated.
    ///
    /// ## Errors
    /// Returns field errors if the merged definition violates an invariant.
    pub fn merged(&self, patch: &RecurrenceBundle) -> Result<Self, ValidationErrors> {
        let mut pattern = self.pattern.clone();
        pattern.apply(patch);
        pattern.validate()?;
        Ok(Self {
            id: self.id,
            pattern,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weekly(weekdays: &[i32]) -> RecurrenceBundle {
        RecurrenceBundle {
            frequency: Some(Frequency::Weekly),
            interval: Some(1),
            weekdays: Some(weekdays.to_vec()),
            ..RecurrenceBundle::default()
        }
    }

    fn input(value: serde_json::Value) -> RecurrenceInput {
        serde_json::from_value(value).expect("input should deserialize")
    }

    #[test]
    fn test_empty_bundle_is_absent() {
        assert!(!recurrence_bundle_is_present(&RecurrenceBundle::default()));
    }

    #[test]
    fn test_each_field_makes_bundle_present() {
        let cases = [
            RecurrenceBundle {
                frequency: Some(Frequency::Daily),
                ..RecurrenceBundle::default()
            },
            RecurrenceBundle {
                interval: Some(2),
                ..RecurrenceBundle::default()
            },
            RecurrenceBundle {
                weekdays: Some(vec![1]),
                ..RecurrenceBundle::default()
            },
            RecurrenceBundle {
                weekday_ordinal: Some(2),
                ..RecurrenceBundle::default()
            },
            RecurrenceBundle {
                end_date: NaiveDate::from_ymd_opt(2030, 1, 1),
                ..RecurrenceBundle::default()
            },
            RecurrenceBundle {
                repeat_count: Some(3),
                ..RecurrenceBundle::default()
            },
        ];

        for bundle in cases {
            assert!(bundle.is_present(), "{bundle:?} should be present");
        }
    }

    #[test]
    fn test_empty_weekdays_and_monthly_type_do_not_count() {
        let bundle = RecurrenceBundle {
            weekdays: Some(vec![]),
            monthly_type: Some(MonthlyType::Date),
            ..RecurrenceBundle::default()
        };
        assert!(!bundle.is_present());
    }

    #[test]
    fn test_input_normalizes_blank_values() {
        let bundle = input(json!({
            "frequency": "none",
            "monthly_type": "",
            "weekdays": [],
        }))
        .into_bundle()
        .expect("blank input is valid");

        assert_eq!(bundle, RecurrenceBundle::default());
    }

    #[test]
    fn test_input_parses_lowercase_choices() {
        let bundle = input(json!({
            "frequency": "monthly",
            "monthly_type": "weekday",
            "interval": 2,
            "weekdays": [2, 4, 2],
            "weekday_ordinal": 2,
            "end_date": "2030-06-30",
            "repeat_count": 10,
        }))
        .into_bundle()
        .expect("input is valid");

        assert_eq!(bundle.frequency, Some(Frequency::Monthly));
        assert_eq!(bundle.monthly_type, Some(MonthlyType::Weekday));
        assert_eq!(bundle.interval, Some(2));
        assert_eq!(bundle.weekdays, Some(vec![2, 4]));
        assert_eq!(bundle.weekday_ordinal, Some(2));
        assert_eq!(bundle.end_date, NaiveDate::from_ymd_opt(2030, 6, 30));
        assert_eq!(bundle.repeat_count, Some(10));
    }

    #[test]
    fn test_input_rejects_unknown_frequency() {
        let errors = input(json!({ "frequency": "fortnightly" }))
            .into_bundle()
            .expect_err("unknown frequency");
        assert!(errors.has_field("frequency"));
    }

    #[test]
    fn test_input_rejects_non_integer_weekdays() {
        for weekdays in [
            json!([1, "3"]),
            json!([1.5]),
            json!([true]),
            json!("1,3"),
            json!({ "mon": 1 }),
            json!([[1]]),
        ] {
            let errors = input(json!({ "frequency": "WEEKLY", "weekdays": weekdays }))
                .into_bundle()
                .expect_err("weekdays must be integers");
            assert!(errors.has_field("weekdays"), "{errors}");
        }
    }

    #[test]
    fn test_input_reports_every_bad_field() {
        let errors = input(json!({
            "frequency": "sometimes",
            "weekdays": "nope",
            "interval": 10_000_000_000_i64,
        }))
        .into_bundle()
        .expect_err("three bad fields");

        assert!(errors.has_field("frequency"));
        assert!(errors.has_field("weekdays"));
        assert!(errors.has_field("interval"));
    }

    #[test]
    fn test_pattern_defaults_interval() {
        let pattern = RecurrencePattern::from_bundle(&RecurrenceBundle {
            frequency: Some(Frequency::Daily),
            ..RecurrenceBundle::default()
        })
        .expect("daily rule");

        assert_eq!(pattern.interval, DEFAULT_INTERVAL);
        assert_eq!(pattern.weekdays, None);
    }

    #[test]
    fn test_pattern_requires_frequency() {
        let errors = RecurrencePattern::from_bundle(&RecurrenceBundle {
            interval: Some(2),
            ..RecurrenceBundle::default()
        })
        .expect_err("frequency missing");

        assert!(errors.has_field("frequency"));
        assert!(!errors.has_field("interval"));
    }

    #[test]
    fn test_interval_bounds() {
        for interval in [MIN_INTERVAL, 7, MAX_INTERVAL] {
            let mut bundle = weekly(&[1, 3]);
            bundle.interval = Some(interval);
            assert!(RecurrencePattern::from_bundle(&bundle).is_ok(), "{interval}");
        }

        for interval in [i32::MIN, -1, 0, 366, i32::MAX] {
            let mut bundle = weekly(&[1, 3]);
            bundle.interval = Some(interval);
            let errors = RecurrencePattern::from_bundle(&bundle).expect_err("out of range");
            assert!(errors.has_field("interval"), "{interval}");
        }
    }

    #[test]
    fn test_repeat_count_must_be_positive() {
        let mut bundle = weekly(&[1]);
        bundle.repeat_count = Some(0);
        let errors = RecurrencePattern::from_bundle(&bundle).expect_err("zero count");
        assert!(errors.has_field("repeat_count"));
    }

    #[test]
    fn test_merge_keeps_omitted_fields() {
        let rule = RecurrenceRule {
            id: uuid::Uuid::new_v4(),
            pattern: RecurrencePattern::from_bundle(&weekly(&[1, 3, 5])).expect("weekly rule"),
        };

        let merged = rule
            .merged(&RecurrenceBundle {
                interval: Some(2),
                ..RecurrenceBundle::default()
            })
            .expect("merge is valid");

        assert_eq!(merged.id, rule.id);
        assert_eq!(merged.pattern.frequency, Frequency::Weekly);
        assert_eq!(merged.pattern.interval, 2);
        assert_eq!(merged.pattern.weekdays, Some(vec![1, 3, 5]));
    }

    #[test]
    fn test_merge_ignores_empty_weekdays() {
        let rule = RecurrenceRule {
            id: uuid::Uuid::new_v4(),
            pattern: RecurrencePattern::from_bundle(&weekly(&[1, 3])).expect("weekly rule"),
        };

        let merged = rule
            .merged(&RecurrenceBundle {
                repeat_count: Some(4),
                weekdays: Some(vec![]),
                ..RecurrenceBundle::default()
            })
            .expect("merge is valid");

        assert_eq!(merged.pattern.weekdays, Some(vec![1, 3]));
        assert_eq!(merged.pattern.repeat_count, Some(4));
    }

    #[test]
    fn test_merge_revalidates() {
        let rule = RecurrenceRule {
            id: uuid::Uuid::new_v4(),
            pattern: RecurrencePattern::from_bundle(&weekly(&[1])).expect("weekly rule"),
        };

        let errors = rule
            .merged(&RecurrenceBundle {
                interval: Some(400),
                ..RecurrenceBundle::default()
            })
            .expect_err("interval out of range");
        assert!(errors.has_field("interval"));
    }

    #[test]
    fn test_rule_serializes_flat() {
        let rule = RecurrenceRule {
            id: uuid::Uuid::nil(),
            pattern: RecurrencePattern::from_bundle(&weekly(&[1])).expect("weekly rule"),
        };

        let value = serde_json::to_value(&rule).expect("serializable");
        assert_eq!(value["frequency"], "WEEKLY");
        assert_eq!(value["interval"], 1);
        assert_eq!(value["weekdays"], json!([1]));
        assert_eq!(value["monthly_type"], serde_json::Value::Null);
    }
}
