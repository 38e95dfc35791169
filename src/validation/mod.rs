//! Save-time normalization shared by the event and booking pipelines.
//!
//! Every function here is pure: it takes the raw field value and returns the
//! canonical form or a [`Error::Validation`] describing why the value was
//! rejected. The repositories run these immediately before each write.

pub mod booking;
pub mod event;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static SLUG_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid slug strip regex"));

static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})(?::(\d{2}))?\s*(am|pm)?$").expect("valid time regex")
});

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %e, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Derives a URL slug: lowercase, drop anything outside `[a-z0-9\s-]`, trim,
/// then turn every whitespace run into a single hyphen.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = SLUG_STRIP_RE.replace_all(&lowered, "");
    WHITESPACE_RUN_RE
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

/// Parses a calendar date in any of the accepted layouts and renders it as `YYYY-MM-DD`.
pub fn normalize_date(input: &str) -> Result<String> {
    parse_calendar_date(input.trim())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| Error::validation("Invalid date value"))
}

fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(date);
        }
    }

    // Timestamps with an offset are reduced to their UTC calendar date.
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

/// Normalizes a clock time to zero-padded 24-hour `HH:MM`.
///
/// Accepts `H:MM` or `HH:MM`, optional `:SS` (discarded) and an optional
/// AM/PM marker in any case.
pub fn normalize_time(input: &str) -> Result<String> {
    let caps = TIME_RE
        .captures(input.trim())
        .ok_or_else(|| Error::validation("Invalid time format"))?;

    let mut hour: u32 = caps[1]
        .parse()
        .map_err(|_| Error::validation("Invalid time format"))?;
    let minute: u32 = caps[2]
        .parse()
        .map_err(|_| Error::validation("Invalid time format"))?;

    if let Some(meridiem) = caps.get(4) {
        if meridiem.as_str().eq_ignore_ascii_case("pm") {
            if hour != 12 {
                hour += 12;
            }
        } else if hour == 12 {
            hour = 0;
        }
    }

    if hour > 23 || minute > 59 {
        return Err(Error::validation("Time out of range"));
    }

    Ok(format!("{:02}:{:02}", hour, minute))
}

/// Trims a required string field, rejecting it when nothing is left.
pub fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trims every entry of a required list, dropping blanks. The list must keep at least one entry.
pub fn required_list(field: &str, values: &[String]) -> Result<Vec<String>> {
    let cleaned: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    if cleaned.is_empty() {
        return Err(Error::validation(format!("At least one {} item is required", field)));
    }
    Ok(cleaned)
}
