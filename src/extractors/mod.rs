//! Schema-driven extraction over a `DomTree`
//!
//! `RecordBuilder` resolves the base selector and produces one record per
//! match; `FieldExtractor` evaluates each field, recursing for `nested`,
//! `list` and `nested_list` kinds.

mod field_extractor;
mod record_builder;

pub use field_extractor::*;
pub use record_builder::*;

use crate::dom::DomTree;
use crate::error::SelectorError;
use crate::schema::ExtractionSchema;
use crate::value::Record;

/// Build the records of `schema` from the whole of `dom`
pub fn build_records<D: DomTree>(
    dom: &D,
    schema: &ExtractionSchema,
) -> Result<Vec<Record>, SelectorError> {
    RecordBuilder::new(dom).build(schema)
}
