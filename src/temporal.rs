//! Timestamp parsing and date rendering in the display timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::constants::labels::{DATE_FORMAT, FETCH_ERROR, NOT_CONFIGURED};
use crate::errors::ReviewError;

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A course start/end timestamp after normalization.
#[derive(Clone, Debug, PartialEq)]
pub enum Timestamp {
    /// Parsed and converted to the display timezone.
    At(DateTime<Tz>),
    /// The LMS reported no value.
    NotConfigured,
    /// The course lookup itself failed.
    Unavailable,
    /// The LMS returned text that is not an ISO-8601 timestamp.
    Malformed(String),
}

impl Timestamp {
    /// Instant in the display timezone, when one exists.
    pub fn instant(&self) -> Option<&DateTime<Tz>> {
        match self {
            Timestamp::At(instant) => Some(instant),
            _ => None,
        }
    }

    /// Render as `DD-MM-YYYY` or one of the sentinel labels.
    pub fn display(&self) -> String {
        match self {
            Timestamp::At(instant) => render_instant(Some(instant)),
            Timestamp::NotConfigured => NOT_CONFIGURED.to_string(),
            Timestamp::Unavailable | Timestamp::Malformed(_) => FETCH_ERROR.to_string(),
        }
    }

    /// True when the LMS reported no value.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Timestamp::NotConfigured)
    }
}

/// Parse an optional LMS timestamp into the display timezone.
///
/// `None` and blank text yield `Ok(None)`. Input without offset information
/// is taken as UTC. Text that matches no ISO-8601 shape is an error.
pub fn parse_instant(raw: Option<&str>, tz: Tz) -> Result<Option<DateTime<Tz>>, ReviewError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    parse_iso_utc(raw)
        .map(|utc| Some(utc.with_timezone(&tz)))
        .ok_or_else(|| ReviewError::MalformedTimestamp {
            raw: raw.to_string(),
        })
}

/// Normalize an optional LMS timestamp, degrading malformed text to
/// [`Timestamp::Malformed`] instead of failing the row.
pub fn normalize_timestamp(raw: Option<&str>, tz: Tz) -> Timestamp {
    match parse_instant(raw, tz) {
        Ok(Some(instant)) => Timestamp::At(instant),
        Ok(None) => Timestamp::NotConfigured,
        Err(err) => {
            warn!("[closure_review:temporal] {err}");
            Timestamp::Malformed(raw.unwrap_or_default().to_string())
        }
    }
}

/// Render an optional instant as `DD-MM-YYYY`, or `not configured`.
pub fn render_instant(instant: Option<&DateTime<Tz>>) -> String {
    match instant {
        Some(instant) => instant.format(DATE_FORMAT).to_string(),
        None => NOT_CONFIGURED.to_string(),
    }
}

/// Render a calendar date as `DD-MM-YYYY`.
pub fn render_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a rendered `DD-MM-YYYY` date. Returns `None` for anything else.
pub fn parse_display_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Current calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

fn parse_iso_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
