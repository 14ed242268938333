//! Validator mapping: the constructed form of a schema

use indexmap::IndexMap;

use crate::items::ItemsValidator;
use crate::reference::LazyReferenceValidator;
use crate::registry::LeafValidator;

// =============================================================================
// ValidatorNode
// =============================================================================

/// One check in a [`ValidatorMapping`].
#[derive(Debug, Clone)]
pub enum ValidatorNode {
    /// Terminal constraint check (`type`, `minimum`, `pattern`, ...).
    Leaf(LeafValidator),
    /// Checks one property of an object against a nested mapping.
    Property(PropertyValidator),
    /// Deferred `$ref`, rebuilt each time it is applied.
    Reference(LazyReferenceValidator),
    /// Checks array elements.
    Items(ItemsValidator),
}

/// Validates the value found under `name` in an object.
#[derive(Debug, Clone)]
pub struct PropertyValidator {
    pub name: String,
    /// Listed in the parent schema's `required` array.
    pub required: bool,
    pub validators: ValidatorMapping,
}

// =============================================================================
// ValidatorMapping
// =============================================================================

/// Checks keyed by constraint keyword or property name.
///
/// Keywords and property names share this key space, which is why the
/// builder rejects schemas whose property names collide with their keywords.
#[derive(Debug, Clone, Default)]
pub struct ValidatorMapping {
    nodes: IndexMap<String, ValidatorNode>,
}

impl ValidatorMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, node: ValidatorNode) {
        self.nodes.insert(key.into(), node);
    }

    pub fn get(&self, key: &str) -> Option<&ValidatorNode> {
        self.nodes.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidatorNode)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'a> IntoIterator for &'a ValidatorMapping {
    type Item = (&'a String, &'a ValidatorNode);
    type IntoIter = indexmap::map::Iter<'a, String, ValidatorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
