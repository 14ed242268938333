//! Lazy, cycle-tolerant validator trees for JSON-Schema-like documents.
//!
//! # Architecture
//!
//! Validation is split into two phases:
//! - **Construction**: [`Builder`] turns a [`Schema`] plus a shared [`Context`]
//!   into a [`ValidatorMapping`], a tree of per-key checks.
//! - **Application**: [`Validator`] walks a concrete value with a mapping and
//!   aggregates every failed check into a [`ValidationErrors`] tree.
//!
//! `$ref` entries are never expanded during construction. They become
//! [`LazyReferenceValidator`]s which rebuild the referenced definition each
//! time a value actually reaches them, so recursive definitions only cost as
//! much as the depth of the data being validated.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use schemata::{Context, construct, validate};
//! use serde_json::json;
//!
//! let context = Arc::new(Context::from_document(&json!({
//!     "definitions": {
//!         "Node": {
//!             "type": "object",
//!             "properties": { "child": { "$ref": "Node" } },
//!         },
//!     },
//! })).unwrap());
//!
//! let schema = json!({ "$ref": "Node" });
//! let mapping = construct(schema.as_object().unwrap(), &context).unwrap();
//!
//! assert!(validate(&json!({ "child": { "child": {} } }), &mapping).is_ok());
//! assert!(validate(&json!({ "child": { "child": 3 } }), &mapping).is_err());
//! ```

mod builder;
mod config;
mod constraint;
mod engine;
mod error;
mod header;
mod items;
mod mapping;
mod reference;
mod registry;
mod schema;

pub use builder::Builder;
pub use config::ValidateConfig;
pub use engine::Validator;
pub use error::{ConstructionError, Error, ValidationErrors, Violation};
pub use header::{CollectionFormat, HeaderDefinition, HeaderType, construct_header_validators};
pub use items::{ItemMappings, ItemsValidator};
pub use mapping::{PropertyValidator, ValidatorMapping, ValidatorNode};
pub use reference::LazyReferenceValidator;
pub use registry::{Factory, LeafValidator, Registry};
pub use schema::{Context, Schema, keywords};

use std::sync::Arc;

use serde_json::Value;

/// Construct a validator mapping for `schema` using the standard registry.
pub fn construct(
    schema: &Schema,
    context: &Arc<Context>,
) -> Result<ValidatorMapping, ConstructionError> {
    Builder::new(Arc::clone(context)).construct(schema)
}

/// Validate `value` against `mapping` with the default [`ValidateConfig`].
pub fn validate(value: &Value, mapping: &ValidatorMapping) -> Result<(), Error> {
    Validator::default().validate(value, mapping)
}
