//! Constraint registry
//!
//! Maps constraint keywords to factories producing leaf validators. The
//! registry is an ordinary value handed to the [`Builder`](crate::Builder);
//! there is no global table to mutate.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::constraint;
use crate::error::{ConstructionError, Violation};
use crate::schema::{Context, Schema};

/// Builds the leaf validator for one keyword.
///
/// Receives the full schema so a keyword can read its modifiers (e.g.
/// `minimum` reads `exclusiveMinimum`). Returns `Ok(None)` when the keyword
/// has nothing to check, such as `required: false`.
pub type Factory = fn(&Schema, &Context) -> Result<Option<LeafValidator>, ConstructionError>;

type Check = dyn Fn(Option<&Value>) -> Result<(), Violation> + Send + Sync;

// =============================================================================
// LeafValidator
// =============================================================================

/// A terminal check closed over one constraint parameter.
#[derive(Clone)]
pub struct LeafValidator {
    check: Arc<Check>,
    checks_absent: bool,
}

impl LeafValidator {
    /// A check that only ever sees present values.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), Violation> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(move |value| match value {
                Some(value) => check(value),
                None => Ok(()),
            }),
            checks_absent: false,
        }
    }

    /// A check that also runs when the value is absent.
    pub fn with_absent<F>(check: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<(), Violation> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            checks_absent: true,
        }
    }

    /// Whether this check runs for a missing value.
    pub fn checks_absent(&self) -> bool {
        self.checks_absent
    }

    pub fn check(&self, value: Option<&Value>) -> Result<(), Violation> {
        (self.check)(value)
    }
}

impl fmt::Debug for LeafValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafValidator")
            .field("checks_absent", &self.checks_absent)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Immutable keyword-to-factory table.
#[derive(Clone)]
pub struct Registry {
    factories: IndexMap<&'static str, Factory>,
}

impl Registry {
    /// A registry with no keywords.
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// The standard keyword table.
    pub fn standard() -> Self {
        Self::empty()
            .with("type", constraint::type_validator)
            .with("multipleOf", constraint::multiple_of_validator)
            .with("minimum", constraint::minimum_validator)
            .with("maximum", constraint::maximum_validator)
            .with("minLength", constraint::min_length_validator)
            .with("maxLength", constraint::max_length_validator)
            .with("minItems", constraint::min_items_validator)
            .with("maxItems", constraint::max_items_validator)
            .with("uniqueItems", constraint::unique_items_validator)
            .with("enum", constraint::enum_validator)
            .with("minProperties", constraint::min_properties_validator)
            .with("maxProperties", constraint::max_properties_validator)
            .with("pattern", constraint::pattern_validator)
            .with("format", constraint::format_validator)
            .with("required", constraint::required_validator)
    }

    /// Return a copy with `keyword` added or replaced.
    pub fn with(mut self, keyword: &'static str, factory: Factory) -> Self {
        self.factories.insert(keyword, factory);
        self
    }

    pub fn get(&self, keyword: &str) -> Option<Factory> {
        self.factories.get(keyword).copied()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.factories.contains_key(keyword)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
