//! Field rules shared by the request DTOs
//!
//! `validator` covers the stock rules (`email`, `length`, `range`). The
//! functions here fill in the rest and report codes that the web layer turns
//! into user-facing messages:
//!
//! ```text
//! required       not_blank
//! numericstring  numeric_string, non_negative_number
//! min            non_negative_number
//! oneof          priority, status, recurrence_type, recurrence_unit
//! date           date_string
//! ```
//!
//! The `de` submodule holds lenient deserializers for values that arrive as
//! HTML form strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex_lite::Regex;
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::OnceLock;
use validator::ValidationError;

use super::task::{Priority, RecurrenceType, RecurrenceUnit, TaskStatus};

fn numeric_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").ok())
        .as_ref()
}

/// True for optionally signed decimals such as `12`, `-3`, `4.50`
///
/// The empty string counts as numeric so optional inputs can be left blank.
pub fn is_numeric_string(value: &str) -> bool {
    value.is_empty() || numeric_pattern().is_some_and(|re| re.is_match(value))
}

/// Rejects empty and whitespace-only strings with code `required`
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub fn numeric_string(value: &str) -> Result<(), ValidationError> {
    if is_numeric_string(value) {
        Ok(())
    } else {
        Err(ValidationError::new("numericstring"))
    }
}

/// Numeric string that must also be `>= 0`
pub fn non_negative_number(value: &str) -> Result<(), ValidationError> {
    numeric_string(value)?;
    if value.is_empty() {
        return Ok(());
    }
    match value.parse::<f64>() {
        Ok(n) if n >= 0.0 => Ok(()),
        _ => {
            let mut err = ValidationError::new("min");
            err.add_param(Cow::from("min"), &0);
            Err(err)
        }
    }
}

fn one_of<T: FromStr>(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<T>().is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("oneof");
    err.message = Some(Cow::from(format!("Should be one of: {}", allowed.join(", "))));
    Err(err)
}

pub fn priority(value: &str) -> Result<(), ValidationError> {
    one_of::<Priority>(value, &Priority::ALL.map(Priority::as_str))
}

pub fn status(value: &str) -> Result<(), ValidationError> {
    one_of::<TaskStatus>(value, &TaskStatus::ALL.map(TaskStatus::as_str))
}

/// Status that must be present, for the dedicated status endpoint
pub fn required_status(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    status(value)
}

pub fn recurrence_type(value: &str) -> Result<(), ValidationError> {
    one_of::<RecurrenceType>(value, &RecurrenceType::ALL.map(RecurrenceType::as_str))
}

pub fn recurrence_unit(value: &str) -> Result<(), ValidationError> {
    one_of::<RecurrenceUnit>(value, &RecurrenceUnit::ALL.map(RecurrenceUnit::as_str))
}

/// Accepts anything [`parse_date`] understands, or the empty string
pub fn date_string(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_date(value).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("date");
    err.message = Some(Cow::from("Should be a valid date"));
    Err(err)
}

/// Parses the date shapes a browser or API client sends
///
/// RFC 3339 (`2025-03-01T10:00:00Z`), `datetime-local` (`2025-03-01T10:00`)
/// and plain dates (`2025-03-01`, read as midnight UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses an optional id field; blank means "not set"
pub fn parse_optional_id(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        value.parse().ok()
    }
}

pub mod de {
    //! Deserializers that tolerate HTML form encodings

    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Deserialize;
    use std::fmt;
    use std::str::FromStr;

    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("boolean")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" | "yes" => Ok(true),
                "false" | "off" | "0" | "no" | "" => Ok(false),
                _ => Err(E::invalid_type(Unexpected::Str(v), &self)),
            }
        }
    }

    /// `bool` that also accepts checkbox values (`on`, `1`, `""`)
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }

    struct IntVisitor;

    impl<'de> Visitor<'de> for IntVisitor {
        type Value = i32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i32, E> {
            i32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i32, E> {
            i32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<i32, E> {
            Ok(0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i32, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse()
                .map_err(|_| E::invalid_type(Unexpected::Str(v), &self))
        }
    }

    /// `i32` that also accepts numeric strings; blank reads as `0`
    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        deserializer.deserialize_any(IntVisitor)
    }

    /// Optional value parsed from a string; blank reads as `None`
    pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(|_| {
                de::Error::invalid_value(Unexpected::Str(s), &std::any::type_name::<T>())
            }),
        }
    }
}
