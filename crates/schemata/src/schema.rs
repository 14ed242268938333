//! Schema and definition context types

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ConstructionError;

/// A schema: constraint keyword to constraint parameter.
///
/// Schemas stay plain JSON objects. The builder reads them, it never
/// rewrites them.
pub type Schema = serde_json::Map<String, Value>;

/// Keywords with structural meaning to the builder.
pub mod keywords {
    pub const REF: &str = "$ref";
    pub const PROPERTIES: &str = "properties";
    pub const ITEMS: &str = "items";
    pub const REQUIRED: &str = "required";
    pub const DEFINITIONS: &str = "definitions";
}

// =============================================================================
// Context
// =============================================================================

/// Named schema definitions shared by every validator built in one session.
///
/// Built once and then only read; wrap it in an `Arc` and hand the same
/// instance to every [`Builder`](crate::Builder).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    definitions: IndexMap<String, Schema>,
}

impl Context {
    pub fn new(definitions: IndexMap<String, Schema>) -> Self {
        Self { definitions }
    }

    /// Build a context from a document's top-level `definitions` object.
    ///
    /// A document without `definitions` yields an empty context.
    pub fn from_document(document: &Value) -> Result<Self, ConstructionError> {
        let Some(document) = document.as_object() else {
            return Err(ConstructionError::invalid_parameter(
                keywords::DEFINITIONS,
                "document must be an object",
            ));
        };
        match document.get(keywords::DEFINITIONS) {
            Some(definitions) => Self::from_definitions(definitions),
            None => Ok(Self::default()),
        }
    }

    /// Build a context from a `definitions` object (name to schema).
    pub fn from_definitions(definitions: &Value) -> Result<Self, ConstructionError> {
        let Some(entries) = definitions.as_object() else {
            return Err(ConstructionError::invalid_parameter(
                keywords::DEFINITIONS,
                "must be an object of named schemas",
            ));
        };

        let mut resolved = IndexMap::with_capacity(entries.len());
        for (name, schema) in entries {
            let Some(schema) = schema.as_object() else {
                return Err(ConstructionError::invalid_parameter(
                    keywords::DEFINITIONS,
                    format!("definition '{name}' must be an object"),
                ));
            };
            resolved.insert(name.clone(), schema.clone());
        }
        Ok(Self::new(resolved))
    }

    /// Look up a named definition.
    pub fn definition(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn definitions(&self) -> &IndexMap<String, Schema> {
        &self.definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document_reads_definitions() {
        let context = Context::from_document(&json!({
            "definitions": {
                "Pet": { "type": "object" },
                "Tag": { "type": "string" },
            },
        }))
        .unwrap();

        assert!(context.contains("Pet"));
        assert_eq!(
            context.definition("Tag").and_then(|s| s.get("type")),
            Some(&json!("string"))
        );
        let names: Vec<_> = context.definitions().keys().cloned().collect();
        assert_eq!(names, vec!["Pet", "Tag"]);
    }

    #[test]
    fn test_from_document_without_definitions() {
        let context = Context::from_document(&json!({ "type": "object" })).unwrap();
        assert!(context.definitions().is_empty());
    }

    #[test]
    fn test_from_definitions_rejects_non_object_schema() {
        let err = Context::from_definitions(&json!({ "Pet": 3 })).unwrap_err();
        assert!(err.to_string().contains("Pet"));
    }
}
