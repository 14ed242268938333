//! `format` predicates
//!
//! String formats only inspect strings and integer formats only inspect
//! numbers; values of any other type pass. Unknown format names have no
//! predicate and therefore never fail.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex")
});

/// Predicate for a known format name.
pub(crate) fn predicate(format: &str) -> Option<fn(&Value) -> bool> {
    let predicate: fn(&Value) -> bool = match format {
        "date" => |v| on_str(v, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
        "date-time" => |v| on_str(v, |s| DateTime::parse_from_rfc3339(s).is_ok()),
        "email" => |v| on_str(v, |s| EMAIL_PATTERN.is_match(s)),
        "uuid" => |v| on_str(v, |s| Uuid::parse_str(s).is_ok()),
        "uri" => |v| on_str(v, |s| Url::parse(s).is_ok()),
        "int32" => |v| on_integer(v, i64::from(i32::MIN), i64::from(i32::MAX)),
        "int64" => |v| on_integer(v, i64::MIN, i64::MAX),
        _ => return None,
    };
    Some(predicate)
}

fn on_str(value: &Value, check: fn(&str) -> bool) -> bool {
    value.as_str().is_none_or(check)
}

fn on_integer(value: &Value, min: i64, max: i64) -> bool {
    let Value::Number(number) = value else {
        return true;
    };
    match number.as_i64() {
        Some(n) => (min..=max).contains(&n),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(format: &str, value: Value) -> bool {
        predicate(format).expect("known format")(&value)
    }

    #[test]
    fn test_date() {
        assert!(check("date", json!("2024-02-29")));
        assert!(!check("date", json!("2023-02-29")));
        assert!(!check("date", json!("2024-13-01")));
        assert!(!check("date", json!("2024/01/01")));
    }

    #[test]
    fn test_date_time() {
        assert!(check("date-time", json!("2024-05-01T12:30:00Z")));
        assert!(check("date-time", json!("2024-05-01T12:30:00.123+09:00")));
        assert!(!check("date-time", json!("2024-05-01T25:30:00Z")));
        assert!(!check("date-time", json!("2024-05-01")));
        assert!(!check("date-time", json!("2024-05-01T12:30:00+25:99")));
        assert!(!check("date-time", json!("2024-02-30T00:00:00Z")));
    }

    #[test]
    fn test_uri() {
        assert!(check("uri", json!("https://example.com/a?b=c")));
        assert!(check("uri", json!("urn:isbn:0451450523")));
        assert!(!check("uri", json!("/relative/path")));
        assert!(!check("uri", json!("not a uri")));
    }

    #[test]
    fn test_int32_bounds() {
        assert!(check("int32", json!(2147483647)));
        assert!(!check("int32", json!(2147483648i64)));
        assert!(!check("int32", json!(1.5)));
    }

    #[test]
    fn test_string_formats_skip_other_types() {
        assert!(check("email", json!(12)));
        assert!(check("uuid", json!(null)));
        assert!(!check("email", json!("not-an-email")));
        assert!(check("uuid", json!("123e4567-e89b-12d3-a456-426614174000")));
        assert!(!check("uuid", json!("123e4567-e89b-12d3-a456-42661417400g")));
    }

    #[test]
    fn test_unknown_format() {
        assert!(predicate("x-custom").is_none());
    }
}
