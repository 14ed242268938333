//! Lazy `$ref` validator
//!
//! Building a self-referential definition eagerly never terminates. A
//! reference therefore only records its target name; the target's validator
//! mapping is built each time a value reaches it and dropped afterwards. The
//! amount of construction work follows the depth of the data being validated,
//! and no cycle ever exists in memory.

use std::fmt;

use crate::builder::Builder;
use crate::error::ConstructionError;
use crate::mapping::ValidatorMapping;

/// Deferred validator for a named definition.
#[derive(Clone)]
pub struct LazyReferenceValidator {
    reference: String,
    builder: Builder,
}

impl LazyReferenceValidator {
    /// Create a handle for `reference`.
    ///
    /// Only the target's existence is checked here; the target schema itself
    /// is not inspected until [`resolve`](Self::resolve).
    pub fn new(reference: impl Into<String>, builder: Builder) -> Result<Self, ConstructionError> {
        let reference = reference.into();
        if !builder.context().contains(&reference) {
            return Err(ConstructionError::UndefinedReference { name: reference });
        }
        Ok(Self { reference, builder })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Build the target definition's validator mapping.
    ///
    /// Never cached: every call constructs a fresh mapping.
    pub fn resolve(&self) -> Result<ValidatorMapping, ConstructionError> {
        tracing::trace!(reference = %self.reference, "resolving lazy reference");
        let schema = self
            .builder
            .context()
            .definition(&self.reference)
            .ok_or_else(|| ConstructionError::UndefinedReference {
                name: self.reference.clone(),
            })?;
        self.builder.construct(schema)
    }
}

impl fmt::Debug for LazyReferenceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyReferenceValidator")
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}
