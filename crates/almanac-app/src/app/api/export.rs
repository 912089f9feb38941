use almanac_service::ical::CONTENT_TYPE;
use salvo::Response;
use salvo::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE as CONTENT_TYPE_HEADER, HeaderValue};

/// ## Summary
/// Writes an iCalendar document as a downloadable attachment.
pub fn write_calendar(res: &mut Response, document: String, filename: &str) {
    let headers = res.headers_mut();
    headers.insert(CONTENT_TYPE_HEADER, HeaderValue::from_static(CONTENT_TYPE));
    let disposition = format!("attachment; filename=\"{filename}\"");
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, value);
    }
    res.body(document);
}

/// Filename for an exported calendar: its name reduced to ASCII word
/// characters, or `calendar` when nothing is left.
#[must_use]
pub fn calendar_filename(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "calendar.ics".to_string()
    } else {
        format!("{stem}.ics")
    }
}
