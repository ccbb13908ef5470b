//! Handle formatting and parsing of scalar literals.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use uuid::Uuid;

use super::error::Error;

/// Characters escaped by [`url_encode`]: everything outside the unreserved
/// set `A-Z a-z 0-9 - _ . ! * ( )`.
const URL_ESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a value or property path for embedding in a query option.
pub fn url_encode(raw: &str) -> String {
    utf8_percent_encode(raw, URL_ESCAPED).to_string()
}

/// Quote a string literal: embedded single quotes are doubled and the result
/// percent-encoded inside `'…'`.
pub fn format_string(raw: &str) -> String {
    format!("'{}'", url_encode(&raw.replace('\'', "''")))
}

/// The inverse of [`format_string`].
pub fn parse_string(formatted: &str) -> Option<String> {
    let inner = formatted.strip_prefix('\'')?.strip_suffix('\'')?;
    let decoded = percent_decode_str(inner).decode_utf8().ok()?;
    Some(decoded.replace("''", "'"))
}

/// Format a date/time literal: date-only when no time of day is present,
/// otherwise a full UTC timestamp.
pub fn format_datetime(raw: &str) -> Result<String, Error> {
    let timestamp = parse_datetime(raw).ok_or_else(|| Error::InvalidLiteral {
        kind: "date/time",
        value: raw.to_string(),
    })?;

    if timestamp.time() == NaiveTime::MIN {
        Ok(timestamp.date().format("%Y-%m-%d").to_string())
    } else {
        Ok(timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }
}

/// Parse the date/time formats the Fetch side carries: a bare date, a naive
/// timestamp, or an RFC 3339 timestamp (normalized to UTC).
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp);
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.naive_utc())
}

/// Format a boolean literal. The Fetch side writes `1`/`0`.
pub fn format_boolean(raw: &str) -> Result<String, Error> {
    match raw {
        "1" | "true" => Ok("true".to_string()),
        "0" | "false" => Ok("false".to_string()),
        _ => Err(Error::InvalidLiteral {
            kind: "boolean",
            value: raw.to_string(),
        }),
    }
}

/// Format a unique identifier in its canonical hyphenated form, unquoted.
pub fn format_guid(raw: &str) -> Result<String, Error> {
    Uuid::parse_str(raw.trim())
        .map(|guid| guid.to_string())
        .map_err(|_| Error::InvalidLiteral {
            kind: "unique identifier",
            value: raw.to_string(),
        })
}

/// Format a whole-number literal.
pub fn format_integer(raw: &str) -> Result<String, Error> {
    raw.trim()
        .parse::<i64>()
        .map(|number| number.to_string())
        .map_err(|_| Error::InvalidLiteral {
            kind: "whole number",
            value: raw.to_string(),
        })
}

/// Validate a decimal literal and pass the original text through.
pub fn format_decimal(raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .map(|_| url_encode(trimmed))
        .map_err(|_| Error::InvalidLiteral {
            kind: "decimal",
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_quote_escape_and_round_trip() {
        assert_eq!(format_string("FXB"), "'FXB'");
        assert_eq!(format_string("it's"), "'it%27%27s'");
        assert_eq!(format_string("a b"), "'a%20b'");

        for raw in ["FXB", "it's", "a b", "100% [done]"] {
            assert_eq!(parse_string(&format_string(raw)).unwrap(), raw);
        }
    }

    #[test]
    fn dates_drop_midnight_times() {
        assert_eq!(format_datetime("2020-01-01").unwrap(), "2020-01-01");
        assert_eq!(format_datetime("2020-01-01T00:00:00").unwrap(), "2020-01-01");
        assert_eq!(
            format_datetime("2020-01-01T12:30:00").unwrap(),
            "2020-01-01T12:30:00Z"
        );
        assert_eq!(
            format_datetime("2020-01-01T12:30:00+02:00").unwrap(),
            "2020-01-01T10:30:00Z"
        );
        assert!(format_datetime("not a date").is_err());
    }

    #[test]
    fn datetime_formatting_round_trips() {
        for raw in ["2020-01-01", "2020-06-15T08:45:30Z"] {
            let formatted = format_datetime(raw).unwrap();
            let reparsed = parse_datetime(&formatted).unwrap();
            assert_eq!(reparsed, parse_datetime(raw).unwrap());
        }
    }

    #[test]
    fn booleans_accept_numeric_and_named_forms() {
        assert_eq!(format_boolean("1").unwrap(), "true");
        assert_eq!(format_boolean("true").unwrap(), "true");
        assert_eq!(format_boolean("0").unwrap(), "false");
        assert_eq!(format_boolean("false").unwrap(), "false");
        assert!(format_boolean("yes").is_err());
    }

    #[test]
    fn guids_canonicalize() {
        assert_eq!(
            format_guid("3FEE3D59-68C9-ED11-B597-0022489B41C4").unwrap(),
            "3fee3d59-68c9-ed11-b597-0022489b41c4"
        );
        assert!(format_guid("not-a-guid").is_err());
    }

    #[test]
    fn numbers_validate_and_normalize() {
        assert_eq!(format_integer(" 42 ").unwrap(), "42");
        assert!(format_integer("fortytwo").is_err());
        assert_eq!(format_decimal("10.50").unwrap(), "10.50");
        assert!(format_decimal("ten and a half").is_err());
    }
}
