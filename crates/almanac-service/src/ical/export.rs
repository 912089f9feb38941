//! VCALENDAR document assembly.

use almanac_core::constants::{ICAL_PRODID, ICAL_UID_DOMAIN};
use almanac_core::model::{Event, Frequency, MonthlyType, RecurrenceRule};
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};

use super::escape::escape_text;
use super::fold::fold_line;

pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Weekday codes 0..=6, Sunday first.
const BYDAY_CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];

fn utc_stamp(value: DateTime<Utc>) -> String {
    value.format("%Y%m%dT%H%M%SZ").to_string()
}

fn date_stamp(value: NaiveDate) -> String {
    value.format("%Y%m%d").to_string()
}

/// ## Summary
/// Renders the RRULE value for a stored rule.
///
/// `start` supplies the day of month for monthly-by-date rules; `all_day`
/// selects the value type of UNTIL so it matches DTSTART.
#[must_use]
pub fn rrule_value(rule: &RecurrenceRule, start: DateTime<Utc>, all_day: bool) -> String {
    let pattern = &rule.pattern;
    let mut parts = vec![format!("FREQ={}", pattern.frequency.as_str())];

    if pattern.interval > 1 {
        parts.push(format!("INTERVAL={}", pattern.interval));
    }

    let monthly = (pattern.frequency == Frequency::Monthly)
        .then_some(pattern.monthly_type)
        .flatten();

    if monthly == Some(MonthlyType::Date) {
        parts.push(format!("BYMONTHDAY={}", start.day()));
    } else if let Some(weekdays) = pattern.weekdays.as_deref() {
        let prefix = match (monthly, pattern.weekday_ordinal) {
            (Some(MonthlyType::Weekday), Some(ordinal)) => ordinal.to_string(),
            _ => String::new(),
        };
        let days: Vec<String> = weekdays
            .iter()
            .filter_map(|code| usize::try_from(*code).ok())
            .filter_map(|code| BYDAY_CODES.get(code))
            .map(|day| format!("{prefix}{day}"))
            .collect();
        if !days.is_empty() {
            parts.push(format!("BYDAY={}", days.join(",")));
        }
    }

    if let Some(end_date) = pattern.end_date {
        if all_day {
            parts.push(format!("UNTIL={}", date_stamp(end_date)));
        } else {
            let end_of_day = end_date.and_hms_opt(23, 59, 59).unwrap_or_default().and_utc();
            parts.push(format!("UNTIL={}", utc_stamp(end_of_day)));
        }
    } else if let Some(count) = pattern.repeat_count {
        parts.push(format!("COUNT={count}"));
    }

    parts.join(";")
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold_line(line));
    out.push_str("\r\n");
}

fn push_event(out: &mut String, event: &Event, stamp: &str) {
    push_line(out, "BEGIN:VEVENT");
    push_line(out, &format!("UID:{}@{ICAL_UID_DOMAIN}", event.id));
    push_line(out, &format!("DTSTAMP:{stamp}"));

    if event.is_all_day {
        let start = event.start_time.date_naive();
        let mut end = event.end_time.date_naive();
        if end <= start {
            end = start + TimeDelta::days(1);
        }
        push_line(out, &format!("DTSTART;VALUE=DATE:{}", date_stamp(start)));
        push_line(out, &format!("DTEND;VALUE=DATE:{}", date_stamp(end)));
    } else {
        push_line(out, &format!("DTSTART:{}", utc_stamp(event.start_time)));
        push_line(out, &format!("DTEND:{}", utc_stamp(event.end_time)));
    }

    push_line(out, &format!("SUMMARY:{}", escape_text(&event.title)));
    if !event.description.is_empty() {
        push_line(
            out,
            &format!("DESCRIPTION:{}", escape_text(&event.description)),
        );
    }
    push_line(out, &format!("CATEGORIES:{}", event.calendar_id));
    push_line(out, &format!("CREATED:{}", utc_stamp(event.created_at)));
    push_line(out, &format!("LAST-MODIFIED:{}", utc_stamp(event.updated_at)));

    if let Some(rule) = &event.recurrence {
        push_line(
            out,
            &format!(
                "RRULE:{}",
                rrule_value(rule, event.start_time, event.is_all_day)
            ),
        );
    }

    push_line(out, "END:VEVENT");
}

/// ## Summary
/// Serializes events into one VCALENDAR document. `name`, when given, is
/// written as the calendar display name.
#[must_use]
pub fn export_events(events: &[Event], name: Option<&str>, now: DateTime<Utc>) -> String {
    let stamp = utc_stamp(now);
    let mut out = String::new();

    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{ICAL_PRODID}"));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");
    if let Some(name) = name {
        push_line(&mut out, &format!("X-WR-CALNAME:{}", escape_text(name)));
    }

    for event in events {
        push_event(&mut out, event, &stamp);
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}
