//! Schema-driven structured extraction from HTML
//!
//! Turns a parsed document plus a declarative JSON schema into an ordered list
//! of records, without a language model:
//! - `baseSelector` picks the repeating element, one record per match
//! - `baseFields` read the matched element itself
//! - `fields` read descendants, recursing through `nested`, `list` and
//!   `nested_list` fields
//!
//! Nothing matching is never an error: single-valued fields become `null`,
//! list-valued fields become `[]`.

pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod schema;
pub mod value;

pub use config::EngineConfig;
pub use dom::{DomTree, HtmlDocument};
pub use engine::{extract_structured, records_to_json, ExtractionEngine};
pub use error::{ExtractError, Result, SchemaError, SelectorError};
pub use extractors::{build_records, FieldExtractor, RecordBuilder};
pub use ffi::*;
pub use schema::{
    parse_schema, parse_schema_value, ExtractionSchema, FieldDef, FieldKind, FieldType, ListItem,
};
pub use value::{Record, Value};
