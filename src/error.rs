//! Error types for schema-driven extraction
//!
//! Two failure families exist: the schema is malformed (`SchemaError`) or a
//! CSS selector inside it cannot be compiled (`SelectorError`). Nothing
//! matching is never an error.

use thiserror::Error;

/// Result alias used by the public entry points
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Top-level error returned by the extraction engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

impl ExtractError {
    /// Short machine-readable kind, used by the C ABI error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::Schema(_) => "schema",
            ExtractError::Selector(_) => "selector",
        }
    }
}

/// Malformed or semantically invalid extraction schema
///
/// `field` values are dotted paths from the schema root, e.g. `details.brand`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {message}")]
    InvalidJson { message: String },

    #[error("schema is missing a non-empty baseSelector")]
    MissingBaseSelector,

    #[error("field at {location} is missing a non-empty name")]
    MissingFieldName { location: String },

    #[error("field '{field}' is missing a type")]
    MissingFieldType { field: String },

    #[error("field '{field}' has unknown type '{found}'")]
    UnknownFieldType { field: String, found: String },

    #[error("attribute field '{field}' must declare a non-empty attribute")]
    MissingAttribute { field: String },

    #[error("{kind} field '{field}' must declare non-empty fields")]
    MissingSubFields { field: String, kind: &'static str },

    #[error("duplicate field name '{field}'")]
    DuplicateFieldName { field: String },

    #[error("list field '{field}' is ambiguous: {reason}")]
    AmbiguousList { field: String, reason: String },

    #[error("schema nesting exceeds the maximum depth of {max_depth} at '{field}'")]
    MaxDepthExceeded { max_depth: usize, field: String },

    #[error("invalid engine configuration: {message}")]
    InvalidConfig { message: String },
}

/// CSS selector that the DOM backend could not compile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector '{selector}': {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

impl SelectorError {
    pub fn new(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            message: message.into(),
        }
    }
}
