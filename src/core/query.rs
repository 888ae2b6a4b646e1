//! Query parameters for listing orders

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Message returned when `fromDate` cannot be parsed
pub const INVALID_FROM_DATE_MESSAGE: &str = "fromDate must be an ISO 8601 date-time.";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Query parameters accepted by `GET /orders`
///
/// Values are kept as raw strings; the handler decides how to treat an empty
/// district and reports an unparseable date itself.
///
/// # Example
/// ```text
/// GET /orders?fromDate=2030-05-01T12:00:00Z&district=North
/// GET /orders?fromdate=2030-05-01T12:00
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOrdersQuery {
    #[serde(rename = "fromDate", alias = "fromdate", alias = "FromDate")]
    pub from_date: Option<String>,

    #[serde(alias = "District")]
    pub district: Option<String>,
}

impl ListOrdersQuery {
    /// Parse `fromDate`, returning `Ok(None)` when it is absent or blank
    pub fn from_date(&self) -> Result<Option<DateTime<Utc>>, &'static str> {
        match self.from_date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_timestamp(raw)
                .map(Some)
                .ok_or(INVALID_FROM_DATE_MESSAGE),
        }
    }
}

/// Parse an RFC 3339 timestamp, or a naive one interpreted as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Serde helper for optional timestamps using [`parse_timestamp`]
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid date-time '{}'", raw))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_timestamp("2030-05-01T14:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let expected = Utc.with_ymd_and_hms(2030, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2030-05-01T12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2030-05-01T12:00"), Some(expected));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("tomorrow").is_none());
    }

    #[test]
    fn test_query_blank_from_date_is_none() {
        let query = ListOrdersQuery {
            from_date: Some("  ".to_string()),
            district: None,
        };
        assert_eq!(query.from_date(), Ok(None));
    }

    #[test]
    fn test_query_invalid_from_date() {
        let query = ListOrdersQuery {
            from_date: Some("not-a-date".to_string()),
            district: None,
        };
        assert_eq!(query.from_date(), Err(INVALID_FROM_DATE_MESSAGE));
    }

    #[test]
    fn test_deserialize_optional_timestamp_in_struct() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
            at: Option<DateTime<Utc>>,
        }

        let w: Wrapper = serde_json::from_str(r#"{"at":"2030-05-01T12:00:00"}"#).unwrap();
        assert!(w.at.is_some());

        let w: Wrapper = serde_json::from_str(r#"{}"#).unwrap();
        assert!(w.at.is_none());

        assert!(serde_json::from_str::<Wrapper>(r#"{"at":"nope"}"#).is_err());
    }
}
