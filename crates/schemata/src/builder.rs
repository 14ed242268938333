//! Validator construction
//!
//! Turns a schema into a [`ValidatorMapping`]:
//! - `$ref`: a [`LazyReferenceValidator`] under `$ref`, target not expanded
//! - `properties` / `required: [...]`: one [`PropertyValidator`] per name
//! - `items`: an [`ItemsValidator`] under `items`
//! - any other keyword known to the registry: a leaf validator under that keyword
//!
//! Construction never mutates the schema or the context and may be re-entered
//! freely; lazy references call back into it during validation.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ConstructionError;
use crate::items::ItemsValidator;
use crate::mapping::{PropertyValidator, ValidatorMapping, ValidatorNode};
use crate::reference::LazyReferenceValidator;
use crate::registry::Registry;
use crate::schema::{Context, Schema, keywords};

/// Builds validator mappings against one registry and one context.
///
/// Cloning is cheap: both halves are shared.
#[derive(Debug, Clone)]
pub struct Builder {
    registry: Arc<Registry>,
    context: Arc<Context>,
}

impl Builder {
    /// A builder using the standard registry.
    pub fn new(context: Arc<Context>) -> Self {
        Self::with_registry(Arc::new(Registry::standard()), context)
    }

    pub fn with_registry(registry: Arc<Registry>, context: Arc<Context>) -> Self {
        Self { registry, context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Construct the validator mapping for `schema`.
    pub fn construct(&self, schema: &Schema) -> Result<ValidatorMapping, ConstructionError> {
        let mut validators = ValidatorMapping::new();

        if let Some(reference) = schema.get(keywords::REF) {
            let Value::String(name) = reference else {
                return Err(ConstructionError::invalid_parameter(
                    keywords::REF,
                    "expected a reference name",
                ));
            };
            validators.insert(
                keywords::REF,
                ValidatorNode::Reference(LazyReferenceValidator::new(name, self.clone())?),
            );
        }

        self.construct_properties(schema, &mut validators)?;

        if let Some(items) = schema.get(keywords::ITEMS) {
            validators.insert(
                keywords::ITEMS,
                ValidatorNode::Items(ItemsValidator::build(items, self)?),
            );
        }

        for key in schema.keys() {
            if is_structural(key) {
                continue;
            }
            let Some(factory) = self.registry.get(key) else {
                tracing::trace!(keyword = %key, "ignoring unregistered keyword");
                continue;
            };
            if let Some(leaf) = factory(schema, &self.context)? {
                validators.insert(key.as_str(), ValidatorNode::Leaf(leaf));
            }
        }

        tracing::trace!(keys = ?validators.keys().collect::<Vec<_>>(), "constructed validators");
        Ok(validators)
    }

    /// A mapping holding only a lazy reference to `reference`.
    pub fn reference_mapping(&self, reference: &str) -> Result<ValidatorMapping, ConstructionError> {
        let mut validators = ValidatorMapping::new();
        validators.insert(
            keywords::REF,
            ValidatorNode::Reference(LazyReferenceValidator::new(reference, self.clone())?),
        );
        Ok(validators)
    }

    fn construct_properties(
        &self,
        schema: &Schema,
        validators: &mut ValidatorMapping,
    ) -> Result<(), ConstructionError> {
        let required = required_names(schema)?;
        let properties = match schema.get(keywords::PROPERTIES) {
            None => None,
            Some(Value::Object(properties)) => Some(properties),
            Some(_) => {
                return Err(ConstructionError::invalid_parameter(
                    keywords::PROPERTIES,
                    "expected an object of property schemas",
                ));
            }
        };

        let names = properties
            .into_iter()
            .flat_map(|p| p.keys().map(String::as_str))
            .chain(required.iter().copied());
        check_collisions(schema, names)?;

        for (name, property_schema) in properties.into_iter().flatten() {
            let Value::Object(property_schema) = property_schema else {
                return Err(ConstructionError::invalid_parameter(
                    keywords::PROPERTIES,
                    format!("property '{name}' must be a schema object"),
                ));
            };
            let property = PropertyValidator {
                name: name.clone(),
                required: required.contains(&name.as_str()),
                validators: self.construct(property_schema)?,
            };
            validators.insert(name.as_str(), ValidatorNode::Property(property));
        }

        // Required names without a declared schema still need a presence check.
        for name in required {
            if validators.contains_key(name) {
                continue;
            }
            validators.insert(
                name,
                ValidatorNode::Property(PropertyValidator {
                    name: name.to_string(),
                    required: true,
                    validators: ValidatorMapping::new(),
                }),
            );
        }

        Ok(())
    }
}

/// Keywords the builder handles itself rather than through the registry.
fn is_structural(key: &str) -> bool {
    matches!(key, keywords::REF | keywords::PROPERTIES | keywords::ITEMS)
}

/// Property names from the object form of `required`.
fn required_names(schema: &Schema) -> Result<Vec<&str>, ConstructionError> {
    match schema.get(keywords::REQUIRED) {
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str().ok_or_else(|| {
                    ConstructionError::invalid_parameter(
                        keywords::REQUIRED,
                        "property names must be strings",
                    )
                })
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Property names share the mapping's key space with the schema's keywords.
fn check_collisions<'a>(
    schema: &Schema,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConstructionError> {
    let mut collisions: Vec<String> = names
        .filter(|name| schema.contains_key(*name))
        .map(str::to_string)
        .collect();
    if collisions.is_empty() {
        return Ok(());
    }
    collisions.sort();
    collisions.dedup();
    Err(ConstructionError::PropertyKeywordCollision { names: collisions })
}
