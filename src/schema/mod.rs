//! Extraction schema model and parser
//!
//! Client JSON is validated once into a closed, typed tree. A schema has a
//! `baseSelector` naming the repeating element, `baseFields` read from that
//! element, and `fields` which may recurse through `nested`, `list` and
//! `nested_list` types.

mod parser;
mod types;

pub use parser::{parse_schema, parse_schema_value};
pub use types::{ExtractionSchema, FieldDef, FieldKind, FieldType, ListItem};
