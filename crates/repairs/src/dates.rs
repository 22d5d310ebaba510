//! Calendar-date parsing for stored and user-entered dates.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

const FALLBACK_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Parse a calendar day, ignoring any time-of-day component.
///
/// Accepts ISO dates (`2024-05-01`), RFC 3339 timestamps, and the German and US
/// day formats older records were entered with.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            // `2024-05-01T10:00:00` without an offset.
            raw.get(..10)
                .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
        })
}

/// `#[serde(deserialize_with = "calendar_date")]` for `NaiveDate` fields.
pub fn calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date: {raw:?}")))
}

/// Optional variant: `null`, missing and blank strings map to `None`.
pub fn optional_calendar_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_calendar_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date: {raw:?}"))),
    }
}

/// Never-failing variant for stored records: blank strings, unrecognized
/// dates and non-string values all map to `None`.
pub fn lenient_calendar_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(parse_calendar_date))
}
