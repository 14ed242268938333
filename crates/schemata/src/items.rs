//! Array `items` validator
//!
//! The shape of `items` (schema, reference name, or list) is decided once at
//! construction. Both shapes are consumed as an endless sequence of mappings
//! paired with the array's elements; only the array's length bounds the walk.

use std::iter::FusedIterator;

use serde_json::Value;

use crate::builder::Builder;
use crate::error::ConstructionError;
use crate::mapping::ValidatorMapping;
use crate::schema::keywords;

/// Item validators for one array schema.
#[derive(Debug, Clone)]
pub enum ItemsValidator {
    /// Every element is checked against the same mapping.
    Repeat(ValidatorMapping),
    /// Element `i` is checked against `schemas[i]`; elements past the end of
    /// the list are checked against `rest`, which is always empty.
    Positional {
        schemas: Vec<ValidatorMapping>,
        rest: ValidatorMapping,
    },
}

impl ItemsValidator {
    /// Classify and construct an `items` parameter.
    pub fn build(items: &Value, builder: &Builder) -> Result<Self, ConstructionError> {
        match items {
            Value::Array(entries) => {
                let schemas = entries
                    .iter()
                    .map(|entry| item_mapping(entry, builder))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::positional(schemas))
            }
            single => Ok(Self::Repeat(item_mapping(single, builder)?)),
        }
    }

    /// Positional validators followed by an always-pass tail.
    pub fn positional(schemas: Vec<ValidatorMapping>) -> Self {
        Self::Positional {
            schemas,
            rest: ValidatorMapping::new(),
        }
    }

    /// The endless sequence of per-position mappings.
    pub fn mappings(&self) -> ItemMappings<'_> {
        match self {
            Self::Repeat(mapping) => ItemMappings {
                positional: Default::default(),
                rest: mapping,
            },
            Self::Positional { schemas, rest } => ItemMappings {
                positional: schemas.iter(),
                rest,
            },
        }
    }
}

/// One `items` entry: an inline schema or the name of a definition.
fn item_mapping(entry: &Value, builder: &Builder) -> Result<ValidatorMapping, ConstructionError> {
    match entry {
        Value::Object(schema) => builder.construct(schema),
        Value::String(reference) => builder.reference_mapping(reference),
        _ => Err(ConstructionError::invalid_parameter(
            keywords::ITEMS,
            "expected a schema, a reference name, or a list of them",
        )),
    }
}

/// Iterator over item mappings. Never returns `None`.
#[derive(Debug, Clone)]
pub struct ItemMappings<'a> {
    positional: std::slice::Iter<'a, ValidatorMapping>,
    rest: &'a ValidatorMapping,
}

impl<'a> Iterator for ItemMappings<'a> {
    type Item = &'a ValidatorMapping;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.positional.next().unwrap_or(self.rest))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl FusedIterator for ItemMappings<'_> {}
