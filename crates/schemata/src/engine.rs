//! Validator application
//!
//! Walks a value with a [`ValidatorMapping`]. Every node is attempted; a failing
//! node never stops its siblings, so one pass reports every violated
//! constraint. Failures are keyed by the node that produced them, except lazy
//! references whose failures are merged as if the referenced schema had been
//! written inline.

use serde_json::Value;

use crate::config::ValidateConfig;
use crate::error::{Error, ValidationErrors, Violation};
use crate::items::ItemsValidator;
use crate::mapping::{PropertyValidator, ValidatorMapping, ValidatorNode};
use crate::reference::LazyReferenceValidator;
use crate::schema::keywords;

/// Applies validator mappings to values.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidateConfig,
}

impl Validator {
    pub fn new(config: ValidateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidateConfig {
        &self.config
    }

    /// Validate a value, failing with every violation found.
    pub fn validate(&self, value: &Value, mapping: &ValidatorMapping) -> Result<(), Error> {
        self.validate_optional(Some(value), mapping)
    }

    /// Validate a value that may be absent, such as an optional header.
    ///
    /// An absent value only runs presence checks (`required: true`),
    /// including those of referenced definitions.
    pub fn validate_optional(
        &self,
        value: Option<&Value>,
        mapping: &ValidatorMapping,
    ) -> Result<(), Error> {
        let errors = self.apply(value, mapping)?;
        if errors.is_empty() {
            return Ok(());
        }
        tracing::debug!(violations = errors.message_count(), "validation failed");
        Err(Error::Invalid(errors))
    }

    /// Apply every node of `mapping` and return the collected violations.
    ///
    /// The returned tree is bare: keyed by the mapping's own keys. Callers
    /// validating a nested value merge it under their key. `Err` is reserved
    /// for failures that abort the whole pass (unresolvable references and the
    /// depth limit).
    pub fn apply(
        &self,
        value: Option<&Value>,
        mapping: &ValidatorMapping,
    ) -> Result<ValidationErrors, Error> {
        self.apply_at(value, mapping, 0)
    }

    fn apply_at(
        &self,
        value: Option<&Value>,
        mapping: &ValidatorMapping,
        depth: usize,
    ) -> Result<ValidationErrors, Error> {
        if depth > self.config.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }

        let mut errors = ValidationErrors::new();
        let Some(value) = value else {
            for (key, node) in mapping {
                match node {
                    ValidatorNode::Leaf(leaf) if leaf.checks_absent() => {
                        if let Err(violation) = leaf.check(None) {
                            errors.push_message_at(key.as_str(), violation.to_string());
                        }
                    }
                    ValidatorNode::Reference(reference) => {
                        let mapping = reference.resolve()?;
                        errors.absorb(self.apply_at(None, &mapping, depth + 1)?);
                    }
                    _ => {}
                }
            }
            return Ok(errors);
        };

        for (key, node) in mapping {
            match node {
                ValidatorNode::Leaf(leaf) => {
                    if let Err(violation) = leaf.check(Some(value)) {
                        errors.push_message_at(key.as_str(), violation.to_string());
                    }
                }
                ValidatorNode::Property(property) => {
                    errors.merge(key.as_str(), self.apply_property(value, property, depth)?);
                }
                ValidatorNode::Reference(reference) => {
                    errors.absorb(self.apply_reference(value, reference, depth)?);
                }
                ValidatorNode::Items(items) => {
                    errors.merge(key.as_str(), self.apply_items(value, items, depth)?);
                }
            }
        }
        Ok(errors)
    }

    fn apply_property(
        &self,
        value: &Value,
        property: &PropertyValidator,
        depth: usize,
    ) -> Result<ValidationErrors, Error> {
        let Value::Object(object) = value else {
            return Ok(ValidationErrors::new());
        };
        match object.get(&property.name) {
            None if property.required => Ok(ValidationErrors::keyed(
                keywords::REQUIRED,
                Violation::Required.to_string(),
            )),
            found => self.apply_at(found, &property.validators, depth + 1),
        }
    }

    fn apply_reference(
        &self,
        value: &Value,
        reference: &LazyReferenceValidator,
        depth: usize,
    ) -> Result<ValidationErrors, Error> {
        let mapping = reference.resolve()?;
        self.apply_at(Some(value), &mapping, depth + 1)
    }

    fn apply_items(
        &self,
        value: &Value,
        items: &ItemsValidator,
        depth: usize,
    ) -> Result<ValidationErrors, Error> {
        let Value::Array(elements) = value else {
            return Ok(ValidationErrors::new());
        };

        let mut errors = ValidationErrors::new();
        for (index, (element, mapping)) in elements.iter().zip(items.mappings()).enumerate() {
            errors.merge(
                index.to_string(),
                self.apply_at(Some(element), mapping, depth + 1)?,
            );
        }
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::schema::Context;
    use serde_json::json;
    use std::sync::Arc;

    fn mapping(definitions: Value, schema: Value) -> ValidatorMapping {
        let context = Context::from_definitions(&definitions).unwrap();
        Builder::new(Arc::new(context))
            .construct(schema.as_object().unwrap())
            .unwrap()
    }

    fn errors(result: Result<(), Error>) -> ValidationErrors {
        match result {
            Err(Error::Invalid(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_passes() {
        let mapping = mapping(json!({}), json!({ "type": "string", "minLength": 2 }));
        assert!(Validator::default().validate(&json!("ok"), &mapping).is_ok());
    }

    #[test]
    fn test_validate_reports_every_leaf() {
        let mapping = mapping(
            json!({}),
            json!({ "type": "string", "minimum": 10, "multipleOf": 4 }),
        );
        let errors = errors(Validator::default().validate(&json!(7), &mapping));
        assert_eq!(errors.fields().keys().collect::<Vec<_>>(), ["type", "minimum", "multipleOf"]);
    }

    #[test]
    fn test_validate_nests_property_errors() {
        let mapping = mapping(
            json!({}),
            json!({
                "properties": {
                    "name": { "type": "string" },
                    "age": { "type": "integer", "minimum": 0 },
                },
            }),
        );
        let errors = errors(
            Validator::default().validate(&json!({ "name": 1, "age": -1 }), &mapping),
        );
        assert!(errors.at(["name", "type"]).is_some());
        assert!(errors.at(["age", "minimum"]).is_some());
        assert!(errors.at(["age", "type"]).is_none());
    }

    #[test]
    fn test_properties_skip_non_objects() {
        let mapping = mapping(
            json!({}),
            json!({ "properties": { "a": { "type": "string" } }, "required": ["a"] }),
        );
        assert!(Validator::default().validate(&json!([1, 2]), &mapping).is_ok());
    }

    #[test]
    fn test_reference_errors_are_inlined() {
        let mapping = mapping(
            json!({ "Name": { "type": "string", "maxLength": 2 } }),
            json!({ "$ref": "Name" }),
        );
        let errors = errors(Validator::default().validate(&json!("long"), &mapping));
        assert!(errors.get("maxLength").is_some());
        assert!(errors.get("$ref").is_none());
    }

    #[test]
    fn test_absent_value_runs_presence_checks_only() {
        let mapping = mapping(json!({}), json!({ "required": true, "type": "integer" }));
        let validator = Validator::default();

        let errors = errors(validator.validate_optional(None, &mapping));
        assert_eq!(errors.fields().keys().collect::<Vec<_>>(), ["required"]);

        let optional = self::mapping(json!({}), json!({ "type": "integer" }));
        assert!(validator.validate_optional(None, &optional).is_ok());
    }

    #[test]
    fn test_absent_value_runs_referenced_presence_checks() {
        let definitions = json!({
            "Header": { "type": "integer", "required": true },
            "Alias": { "$ref": "Header" },
            "Optional": { "type": "integer", "minimum": 3 },
        });
        let validator = Validator::default();

        for root in ["Header", "Alias"] {
            let mapping = mapping(definitions.clone(), json!({ "$ref": root }));
            let errors = errors(validator.validate_optional(None, &mapping));
            assert_eq!(errors.fields().keys().collect::<Vec<_>>(), ["required"]);
            assert_eq!(errors.message_count(), 1);
            assert!(validator.validate_optional(Some(&json!(4)), &mapping).is_ok());
        }

        let optional = mapping(definitions, json!({ "$ref": "Optional" }));
        assert!(validator.validate_optional(None, &optional).is_ok());
    }

    #[test]
    fn test_lazy_reference_construction_error_is_fatal() {
        let mapping = mapping(
            json!({ "Broken": { "properties": { "x": { "$ref": "Nowhere" } } } }),
            json!({ "$ref": "Broken" }),
        );
        let result = Validator::default().validate(&json!({}), &mapping);
        assert!(matches!(result, Err(Error::Construction(_))));
    }

    #[test]
    fn test_self_aliasing_reference_hits_depth_limit() {
        let mapping = mapping(json!({ "Loop": { "$ref": "Loop" } }), json!({ "$ref": "Loop" }));
        let validator = Validator::new(ValidateConfig { max_depth: 16 });
        let result = validator.validate(&json!(1), &mapping);
        assert!(matches!(result, Err(Error::DepthLimitExceeded { limit: 16 })));
    }

    #[test]
    fn test_depth_limit_counts_data_nesting() {
        let mapping = mapping(
            json!({ "List": { "type": "array", "items": "List" } }),
            json!({ "$ref": "List" }),
        );
        let shallow = json!([[[]]]);
        let deep = (0..20).fold(json!([]), |inner, _| json!([inner]));

        let validator = Validator::new(ValidateConfig { max_depth: 12 });
        assert!(validator.validate(&shallow, &mapping).is_ok());
        assert!(matches!(
            validator.validate(&deep, &mapping),
            Err(Error::DepthLimitExceeded { .. })
        ));
    }
}
