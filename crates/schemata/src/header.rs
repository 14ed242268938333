//! Header validators
//!
//! Header definitions are a typed, restricted form of schema: a primitive or
//! array `type`, optional `format` and `items`, and a `collectionFormat` telling
//! how array values are joined on the wire. They are lowered to a plain
//! [`Schema`] and built with the same [`Builder`] as any other schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::Builder;
use crate::error::ConstructionError;
use crate::mapping::ValidatorMapping;
use crate::schema::{Schema, keywords};

/// Header value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
}

impl HeaderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderType::String => "string",
            HeaderType::Number => "number",
            HeaderType::Integer => "integer",
            HeaderType::Boolean => "boolean",
            HeaderType::Array => "array",
        }
    }
}

/// How an array header joins its elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    /// Comma separated: `a,b`
    #[default]
    Csv,
    /// Space separated: `a b`
    Ssv,
    /// Tab separated
    Tsv,
    /// Pipe separated: `a|b`
    Pipes,
}

impl CollectionFormat {
    pub fn delimiter(&self) -> char {
        match self {
            CollectionFormat::Csv => ',',
            CollectionFormat::Ssv => ' ',
            CollectionFormat::Tsv => '\t',
            CollectionFormat::Pipes => '|',
        }
    }
}

/// A header (or header `items`) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDefinition {
    #[serde(rename = "type")]
    pub kind: HeaderType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<HeaderDefinition>>,

    #[serde(default)]
    pub collection_format: CollectionFormat,

    #[serde(default)]
    pub required: bool,

    /// Remaining constraint keywords (`enum`, `minimum`, `pattern`, ...).
    #[serde(flatten)]
    pub constraints: Schema,
}

impl HeaderDefinition {
    pub fn new(kind: HeaderType) -> Self {
        Self {
            kind,
            format: None,
            items: None,
            collection_format: CollectionFormat::default(),
            required: false,
            constraints: Schema::new(),
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, ConstructionError> {
        Self::deserialize(value)
            .map_err(|e| ConstructionError::invalid_parameter("header", e.to_string()))
    }

    /// Lower to a plain schema. `collectionFormat` is wire syntax, not a
    /// constraint, and is dropped.
    pub fn to_schema(&self) -> Schema {
        let mut schema = self.constraints.clone();
        schema.insert("type".to_string(), Value::from(self.kind.as_str()));
        if let Some(format) = &self.format {
            schema.insert("format".to_string(), Value::from(format.as_str()));
        }
        if let Some(items) = &self.items {
            schema.insert(keywords::ITEMS.to_string(), Value::Object(items.to_schema()));
        }
        if self.required {
            schema.insert(keywords::REQUIRED.to_string(), Value::Bool(true));
        }
        schema
    }

    /// Split a raw array header into its elements. Non-array headers are a
    /// single element.
    pub fn split<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        match self.kind {
            HeaderType::Array => raw.split(self.collection_format.delimiter()).collect(),
            _ => vec![raw],
        }
    }
}

/// Construct the validator mapping for a header definition.
pub fn construct_header_validators(
    definition: &HeaderDefinition,
    builder: &Builder,
) -> Result<ValidatorMapping, ConstructionError> {
    builder.construct(&definition.to_schema())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_parses_definition() {
        let definition = HeaderDefinition::from_value(&json!({
            "type": "array",
            "collectionFormat": "pipes",
            "items": { "type": "integer", "minimum": 1 },
            "maxItems": 3,
        }))
        .unwrap();

        assert_eq!(definition.kind, HeaderType::Array);
        assert_eq!(definition.collection_format, CollectionFormat::Pipes);
        assert_eq!(definition.items.as_ref().unwrap().kind, HeaderType::Integer);
        assert_eq!(definition.constraints.get("maxItems"), Some(&json!(3)));
    }

    #[test]
    fn test_from_value_rejects_unknown_type() {
        let err = HeaderDefinition::from_value(&json!({ "type": "object" })).unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidParameter { .. }));
    }

    #[test]
    fn test_to_schema() {
        let mut definition = HeaderDefinition::new(HeaderType::Array);
        definition.items = Some(Box::new(HeaderDefinition::new(HeaderType::String)));
        definition.required = true;
        definition.collection_format = CollectionFormat::Ssv;

        assert_eq!(
            Value::Object(definition.to_schema()),
            json!({
                "type": "array",
                "items": { "type": "string" },
                "required": true,
            })
        );
    }

    #[test]
    fn test_split_by_collection_format() {
        let mut definition = HeaderDefinition::new(HeaderType::Array);
        assert_eq!(definition.split("a,b,c"), ["a", "b", "c"]);
        definition.collection_format = CollectionFormat::Tsv;
        assert_eq!(definition.split("a\tb"), ["a", "b"]);
        assert_eq!(HeaderDefinition::new(HeaderType::String).split("a,b"), ["a,b"]);
    }
}
