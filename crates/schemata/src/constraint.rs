//! Leaf constraint predicates
//!
//! One factory per registry keyword. Each factory reads its parameter from
//! the schema, rejects malformed parameters with a [`ConstructionError`], and
//! returns a [`LeafValidator`] closed over the parsed parameter.
//!
//! Every predicate only inspects values of the JSON type it applies to
//! (`minLength` ignores numbers, `minProperties` ignores arrays, ...). Type
//! mismatches are the `type` keyword's job.

mod format;

use regex::Regex;
use serde_json::{Number, Value};

use crate::error::{ConstructionError, Violation};
use crate::registry::LeafValidator;
use crate::schema::{Context, Schema};

type FactoryResult = Result<Option<LeafValidator>, ConstructionError>;

// =============================================================================
// Helpers
// =============================================================================

/// JSON type name of a value as used by the `type` keyword.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if is_integer(n) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_integer(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "number" => value.is_number(),
        other => type_name(value) == other,
    }
}

fn param<'s>(schema: &'s Schema, keyword: &str) -> Result<&'s Value, ConstructionError> {
    schema
        .get(keyword)
        .ok_or_else(|| ConstructionError::invalid_parameter(keyword, "missing"))
}

fn number_param(schema: &Schema, keyword: &str) -> Result<Number, ConstructionError> {
    match param(schema, keyword)? {
        Value::Number(n) => Ok(n.clone()),
        other => Err(ConstructionError::invalid_parameter(
            keyword,
            format!("expected a number, got {}", type_name(other)),
        )),
    }
}

fn count_param(schema: &Schema, keyword: &str) -> Result<u64, ConstructionError> {
    param(schema, keyword)?.as_u64().ok_or_else(|| {
        ConstructionError::invalid_parameter(keyword, "expected a non-negative integer")
    })
}

fn bool_param(schema: &Schema, keyword: &str) -> Result<bool, ConstructionError> {
    param(schema, keyword)?
        .as_bool()
        .ok_or_else(|| ConstructionError::invalid_parameter(keyword, "expected a boolean"))
}

/// Optional boolean modifier such as `exclusiveMinimum`.
fn flag(schema: &Schema, keyword: &str) -> Result<bool, ConstructionError> {
    match schema.get(keyword) {
        None => Ok(false),
        Some(_) => bool_param(schema, keyword),
    }
}

fn as_i128(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn is_multiple_of(value: &Number, divisor: &Number) -> bool {
    if let (Some(v), Some(d)) = (as_i128(value), as_i128(divisor)) {
        return v % d == 0;
    }
    let (Some(v), Some(d)) = (value.as_f64(), divisor.as_f64()) else {
        return false;
    };
    let quotient = v / d;
    (quotient - quotient.round()).abs() < 1e-9
}

/// Structural equality where numbers compare by value, so `1` equals `1.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (as_i128(x), as_i128(y)) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, a)| y.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => a == b,
    }
}

fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

// =============================================================================
// Factories
// =============================================================================

pub(crate) fn type_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let expected: Vec<String> = match param(schema, "type")? {
        Value::String(name) => vec![name.clone()],
        Value::Array(names) => names
            .iter()
            .map(|name| {
                name.as_str().map(str::to_string).ok_or_else(|| {
                    ConstructionError::invalid_parameter("type", "type names must be strings")
                })
            })
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(ConstructionError::invalid_parameter(
                "type",
                "expected a type name or a list of type names",
            ));
        }
    };
    let display = expected.join(", ");

    Ok(Some(LeafValidator::new(move |value| {
        if expected.iter().any(|name| matches_type(value, name)) {
            Ok(())
        } else {
            Err(Violation::TypeMismatch {
                expected: display.clone(),
                actual: type_name(value),
            })
        }
    })))
}

pub(crate) fn multiple_of_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let divisor = number_param(schema, "multipleOf")?;
    if as_f64(&divisor) <= 0.0 {
        return Err(ConstructionError::invalid_parameter(
            "multipleOf",
            "must be greater than 0",
        ));
    }

    Ok(Some(LeafValidator::new(move |value| match value {
        Value::Number(n) if !is_multiple_of(n, &divisor) => Err(Violation::NotMultipleOf {
            value: n.clone(),
            divisor: divisor.clone(),
        }),
        _ => Ok(()),
    })))
}

pub(crate) fn minimum_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let minimum = number_param(schema, "minimum")?;
    let exclusive = flag(schema, "exclusiveMinimum")?;
    let bound = as_f64(&minimum);

    Ok(Some(LeafValidator::new(move |value| {
        let Value::Number(n) = value else {
            return Ok(());
        };
        let v = as_f64(n);
        match (exclusive, v < bound, v <= bound) {
            (false, true, _) => Err(Violation::BelowMinimum {
                value: n.clone(),
                minimum: minimum.clone(),
            }),
            (true, _, true) => Err(Violation::NotAboveExclusiveMinimum {
                value: n.clone(),
                minimum: minimum.clone(),
            }),
            _ => Ok(()),
        }
    })))
}

pub(crate) fn maximum_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let maximum = number_param(schema, "maximum")?;
    let exclusive = flag(schema, "exclusiveMaximum")?;
    let bound = as_f64(&maximum);

    Ok(Some(LeafValidator::new(move |value| {
        let Value::Number(n) = value else {
            return Ok(());
        };
        let v = as_f64(n);
        match (exclusive, v > bound, v >= bound) {
            (false, true, _) => Err(Violation::AboveMaximum {
                value: n.clone(),
                maximum: maximum.clone(),
            }),
            (true, _, true) => Err(Violation::NotBelowExclusiveMaximum {
                value: n.clone(),
                maximum: maximum.clone(),
            }),
            _ => Ok(()),
        }
    })))
}

pub(crate) fn min_length_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let min = count_param(schema, "minLength")?;
    Ok(Some(LeafValidator::new(move |value| {
        let Value::String(s) = value else {
            return Ok(());
        };
        let length = s.chars().count();
        if (length as u64) < min {
            Err(Violation::TooShort { length, min })
        } else {
            Ok(())
        }
    })))
}

pub(crate) fn max_length_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let max = count_param(schema, "maxLength")?;
    Ok(Some(LeafValidator::new(move |value| {
        let Value::String(s) = value else {
            return Ok(());
        };
        let length = s.chars().count();
        if length as u64 > max {
            Err(Violation::TooLong { length, max })
        } else {
            Ok(())
        }
    })))
}

pub(crate) fn min_items_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let min = count_param(schema, "minItems")?;
    Ok(Some(LeafValidator::new(move |value| match value {
        Value::Array(items) if (items.len() as u64) < min => Err(Violation::TooFewItems {
            count: items.len(),
            min,
        }),
        _ => Ok(()),
    })))
}

pub(crate) fn max_items_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let max = count_param(schema, "maxItems")?;
    Ok(Some(LeafValidator::new(move |value| match value {
        Value::Array(items) if items.len() as u64 > max => Err(Violation::TooManyItems {
            count: items.len(),
            max,
        }),
        _ => Ok(()),
    })))
}

pub(crate) fn unique_items_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    if !bool_param(schema, "uniqueItems")? {
        return Ok(None);
    }
    Ok(Some(LeafValidator::new(|value| {
        let Value::Array(items) = value else {
            return Ok(());
        };
        // O(n^2), values are not hashable
        for (i, item) in items.iter().enumerate() {
            if items[i + 1..].iter().any(|other| values_equal(item, other)) {
                return Err(Violation::DuplicateItems);
            }
        }
        Ok(())
    })))
}

pub(crate) fn enum_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let Value::Array(choices) = param(schema, "enum")? else {
        return Err(ConstructionError::invalid_parameter(
            "enum",
            "expected a list of values",
        ));
    };
    let choices = choices.clone();
    let display = Value::Array(choices.clone()).to_string();

    Ok(Some(LeafValidator::new(move |value| {
        if choices.iter().any(|choice| values_equal(choice, value)) {
            Ok(())
        } else {
            Err(Violation::NotInEnum {
                choices: display.clone(),
            })
        }
    })))
}

pub(crate) fn min_properties_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let min = count_param(schema, "minProperties")?;
    Ok(Some(LeafValidator::new(move |value| match value {
        Value::Object(object) if (object.len() as u64) < min => {
            Err(Violation::TooFewProperties {
                count: object.len(),
                min,
            })
        }
        _ => Ok(()),
    })))
}

pub(crate) fn max_properties_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let max = count_param(schema, "maxProperties")?;
    Ok(Some(LeafValidator::new(move |value| match value {
        Value::Object(object) if object.len() as u64 > max => {
            Err(Violation::TooManyProperties {
                count: object.len(),
                max,
            })
        }
        _ => Ok(()),
    })))
}

pub(crate) fn pattern_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let Value::String(pattern) = param(schema, "pattern")? else {
        return Err(ConstructionError::invalid_parameter(
            "pattern",
            "expected a regular expression string",
        ));
    };
    let regex = Regex::new(pattern)
        .map_err(|e| ConstructionError::invalid_parameter("pattern", e.to_string()))?;

    Ok(Some(LeafValidator::new(move |value| match value {
        Value::String(s) if !regex.is_match(s) => Err(Violation::PatternMismatch {
            pattern: regex.as_str().to_string(),
        }),
        _ => Ok(()),
    })))
}

pub(crate) fn format_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    let Value::String(name) = param(schema, "format")? else {
        return Err(ConstructionError::invalid_parameter(
            "format",
            "expected a format name",
        ));
    };
    let Some(predicate) = format::predicate(name) else {
        tracing::trace!(format = %name, "no predicate for format, accepting all values");
        return Ok(None);
    };
    let name = name.clone();

    Ok(Some(LeafValidator::new(move |value| {
        if predicate(value) {
            Ok(())
        } else {
            Err(Violation::InvalidFormat {
                format: name.clone(),
            })
        }
    })))
}

/// `required: true` on a parameter-style schema: the value must be present.
///
/// The object form (`required: [names]`) is wired into property validators by
/// the builder, so it produces no leaf here.
pub(crate) fn required_validator(schema: &Schema, _context: &Context) -> FactoryResult {
    match param(schema, "required")? {
        Value::Bool(true) => Ok(Some(LeafValidator::with_absent(|value| match value {
            Some(_) => Ok(()),
            None => Err(Violation::Required),
        }))),
        Value::Bool(false) | Value::Array(_) => Ok(None),
        _ => Err(ConstructionError::invalid_parameter(
            "required",
            "expected a boolean or a list of property names",
        )),
    }
}
