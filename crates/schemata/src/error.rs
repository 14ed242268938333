//! Error types
//!
//! Three layers:
//! - `ConstructionError`: malformed or unresolvable schemas, fail-fast
//! - `Violation`: a single failed constraint check
//! - `ValidationErrors`: every violation of one value, as a keyed tree
//!
//! `Error` is what [`validate`](crate::validate) returns and wraps all of them.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Number;
use thiserror::Error;

// =============================================================================
// ConstructionError (fail-fast)
// =============================================================================

/// Errors raised while building validators from a schema.
///
/// These are problems with the schema itself, never with the value being
/// validated, and are never aggregated with validation failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConstructionError {
    #[error("undefined reference: {name}")]
    UndefinedReference { name: String },

    #[error("property names collide with schema keywords: {}", names.join(", "))]
    PropertyKeywordCollision { names: Vec<String> },

    #[error("invalid '{keyword}' parameter: {reason}")]
    InvalidParameter { keyword: String, reason: String },
}

impl ConstructionError {
    pub(crate) fn invalid_parameter(keyword: &str, reason: impl Into<String>) -> Self {
        ConstructionError::InvalidParameter {
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Violation
// =============================================================================

/// A single failed constraint. `Display` gives the user-facing message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Violation {
    #[error("Got value of type '{actual}'. Value must be of type(s): {expected}.")]
    TypeMismatch { expected: String, actual: &'static str },

    #[error("Value {value} is not a multiple of {divisor}.")]
    NotMultipleOf { value: Number, divisor: Number },

    #[error("Value {value} must be greater than or equal to {minimum}.")]
    BelowMinimum { value: Number, minimum: Number },

    #[error("Value {value} must be greater than {minimum}.")]
    NotAboveExclusiveMinimum { value: Number, minimum: Number },

    #[error("Value {value} must be less than or equal to {maximum}.")]
    AboveMaximum { value: Number, maximum: Number },

    #[error("Value {value} must be less than {maximum}.")]
    NotBelowExclusiveMaximum { value: Number, maximum: Number },

    #[error("String must be at least {min} characters long. It had {length}.")]
    TooShort { length: usize, min: u64 },

    #[error("String must be at most {max} characters long. It had {length}.")]
    TooLong { length: usize, max: u64 },

    #[error("Array must have at least {min} items. It had {count}.")]
    TooFewItems { count: usize, min: u64 },

    #[error("Array must have at most {max} items. It had {count}.")]
    TooManyItems { count: usize, max: u64 },

    #[error("Array items must be unique.")]
    DuplicateItems,

    #[error("Value must be one of {choices}.")]
    NotInEnum { choices: String },

    #[error("Object must have at least {min} properties. It had {count}.")]
    TooFewProperties { count: usize, min: u64 },

    #[error("Object must have at most {max} properties. It had {count}.")]
    TooManyProperties { count: usize, max: u64 },

    #[error("String does not match pattern '{pattern}'.")]
    PatternMismatch { pattern: String },

    #[error("Value is not a valid '{format}'.")]
    InvalidFormat { format: String },

    #[error("This value is required.")]
    Required,
}

// =============================================================================
// ValidationErrors (aggregate tree)
// =============================================================================

/// Every violation found for one value.
///
/// Each level holds the messages for the value itself plus one child tree per
/// failing key (constraint keyword, property name or array position). Empty
/// children are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    messages: Vec<String>,
    fields: IndexMap<String, ValidationErrors>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message under `key`.
    pub fn keyed(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push_message_at(key, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.fields.is_empty()
    }

    /// Messages recorded at this level.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Keyed child errors, in the order they were recorded.
    pub fn fields(&self) -> &IndexMap<String, ValidationErrors> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&ValidationErrors> {
        self.fields.get(key)
    }

    /// Follow a path of keys down the tree.
    pub fn at<'k>(&self, path: impl IntoIterator<Item = &'k str>) -> Option<&ValidationErrors> {
        path.into_iter().try_fold(self, |errors, key| errors.get(key))
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn push_message_at(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(key.into())
            .or_default()
            .push_message(message);
    }

    /// Merge `errors` under `key`, combining with anything already there.
    pub fn merge(&mut self, key: impl Into<String>, errors: ValidationErrors) {
        if errors.is_empty() {
            return;
        }
        self.fields.entry(key.into()).or_default().absorb(errors);
    }

    /// Merge `errors` into this level, as if they had been recorded here.
    pub fn absorb(&mut self, errors: ValidationErrors) {
        self.messages.extend(errors.messages);
        for (key, child) in errors.fields {
            self.merge(key, child);
        }
    }

    /// Total number of messages in the tree.
    pub fn message_count(&self) -> usize {
        self.messages.len()
            + self
                .fields
                .values()
                .map(ValidationErrors::message_count)
                .sum::<usize>()
    }

    /// Flatten to `(dotted.path, message)` pairs in depth-first order.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.collect_flat(&mut Vec::new(), &mut out);
        out
    }

    fn collect_flat<'a>(&'a self, path: &mut Vec<&'a str>, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((path.join("."), message.clone()));
        }
        for (key, child) in &self.fields {
            path.push(key);
            child.collect_flat(path, out);
            path.pop();
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, message)) in self.flatten().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if path.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{path}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Serializes as `{key: [message, ..., {nested}]}`: a level with only
/// messages is a list of strings, a level with only keyed children is an
/// object, and a level with both is a list ending in the object.
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.fields.is_empty() {
            return self.messages.serialize(serializer);
        }
        if self.messages.is_empty() {
            return self.fields.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.messages.len() + 1))?;
        for message in &self.messages {
            seq.serialize_element(message)?;
        }
        seq.serialize_element(&self.fields)?;
        seq.end()
    }
}

// =============================================================================
// Error (top-level result)
// =============================================================================

/// Error returned when applying a validator mapping to a value.
#[derive(Debug, Error)]
pub enum Error {
    /// A lazily resolved reference could not be built.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// The value violated one or more constraints.
    #[error("validation failed:\n{0}")]
    Invalid(ValidationErrors),

    /// The value (or a self-aliasing reference chain) nested deeper than allowed.
    #[error("maximum validation depth of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}

impl Error {
    /// The aggregated violations, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
