//! Parsing of loosely-typed request input.
//!
//! Forms and the inline editor send every value as a string, while API
//! clients send JSON numbers. Both are accepted; anything malformed is a
//! `PortalError::Validation` rather than a silent NaN or zero.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::{PortalError, PortalResult};
use crate::types::RecordId;

/// Parse a currency amount such as `"-100.00"` or `"400.06"`.
pub fn parse_decimal(raw: &str) -> PortalResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|_| PortalError::Validation(format!("'{raw}' is not a valid amount")))
}

/// Parse a record id. Ids are positive integers.
pub fn parse_id(raw: &str) -> PortalResult<RecordId> {
    match raw.trim().parse::<RecordId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(PortalError::Validation(format!("'{raw}' is not a valid id"))),
    }
}

/// Parse a timestamp: RFC 3339, `YYYY-MM-DD`, or a `datetime-local` value.
pub fn parse_date(raw: &str) -> PortalResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.and_utc());
        }
    }

    Err(PortalError::Validation(format!("'{raw}' is not a valid date")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Number(u64),
    Text(String),
}

impl IdInput {
    fn resolve(self) -> PortalResult<RecordId> {
        match self {
            Self::Number(0) => Err(PortalError::Validation("id must be positive".into())),
            Self::Number(n) => Ok(n),
            Self::Text(s) => parse_id(&s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    /// Milliseconds since the epoch, as produced by `Date.now()`
    Millis(i64),
    Text(String),
}

impl DateInput {
    fn resolve(self) -> PortalResult<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| PortalError::Validation(format!("{ms} is out of range"))),
            Self::Text(s) => parse_date(&s),
        }
    }
}

/// Serde helper for a required id given as number or string
pub fn id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    IdInput::deserialize(deserializer)?
        .resolve()
        .map_err(D::Error::custom)
}

/// Serde helper for an optional id given as number or string
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    Option::<IdInput>::deserialize(deserializer)?
        .map(IdInput::resolve)
        .transpose()
        .map_err(D::Error::custom)
}

/// Serde helper for an optional timestamp given as string or epoch millis
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    Option::<DateInput>::deserialize(deserializer)?
        .map(DateInput::resolve)
        .transpose()
        .map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" -100.00 ").unwrap(), Decimal::new(-10000, 2));
        assert!(parse_decimal("12abc").is_err());
        assert!(parse_decimal("").is_err());
    }

    #[test]
    fn test_parse_id_rejects_zero_and_garbage() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("abc").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let plain = parse_date("2024-01-15").unwrap();
        assert_eq!((plain.year(), plain.month(), plain.day()), (2024, 1, 15));

        let local = parse_date("2024-01-15T10:30").unwrap();
        assert_eq!(local.format("%H:%M").to_string(), "10:30");

        let rfc = parse_date("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(rfc.format("%H:%M").to_string(), "08:30");

        assert!(parse_date("15/01/2024").is_err());
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_id")]
        account_id: Option<RecordId>,
        #[serde(default, deserialize_with = "opt_date")]
        date: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_serde_helpers_accept_strings_and_numbers() {
        let p: Probe = serde_json::from_str(r#"{"account_id": "2", "date": "2024-01-12"}"#).unwrap();
        assert_eq!(p.account_id, Some(2));
        assert!(p.date.is_some());

        let p: Probe = serde_json::from_str(r#"{"account_id": 3, "date": 1705276800000}"#).unwrap();
        assert_eq!(p.account_id, Some(3));
        assert_eq!(p.date.unwrap().day(), 15);

        let p: Probe = serde_json::from_str("{}").unwrap();
        assert!(p.account_id.is_none() && p.date.is_none());

        assert!(serde_json::from_str::<Probe>(r#"{"account_id": "x"}"#).is_err());
    }
}
