/// Nesting depth allowed by [`ValidateConfig::default`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for applying validator mappings to values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateConfig {
    /// Maximum number of nested mapping applications (properties, array items
    /// and resolved references) before validation is aborted.
    pub max_depth: usize,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
