//! One record per base-selector match

use super::FieldExtractor;
use crate::dom::DomTree;
use crate::error::SelectorError;
use crate::schema::ExtractionSchema;
use crate::value::Record;

/// Builds the ordered record list for one document
pub struct RecordBuilder<'d, D: DomTree> {
    dom: &'d D,
    extractor: FieldExtractor<'d, D>,
}

impl<'d, D: DomTree> RecordBuilder<'d, D> {
    pub fn new(dom: &'d D) -> Self {
        Self {
            dom,
            extractor: FieldExtractor::new(dom),
        }
    }

    /// Records for every base match in the document, root element included
    pub fn build(&self, schema: &ExtractionSchema) -> Result<Vec<Record>, SelectorError> {
        let base_nodes = self.dom.select_document(schema.base_selector())?;
        self.build_records(base_nodes, schema)
    }

    /// Records for every base match under `root`, in document order
    ///
    /// Zero matches is an empty result. Records are neither sorted nor
    /// deduplicated.
    pub fn build_from(
        &self,
        root: D::Node<'d>,
        schema: &ExtractionSchema,
    ) -> Result<Vec<Record>, SelectorError> {
        let base_nodes = self.dom.select(root, schema.base_selector())?;
        self.build_records(base_nodes, schema)
    }

    fn build_records(
        &self,
        base_nodes: Vec<D::Node<'d>>,
        schema: &ExtractionSchema,
    ) -> Result<Vec<Record>, SelectorError> {
        tracing::debug!(
            schema = schema.name(),
            base_selector = schema.base_selector(),
            matches = base_nodes.len(),
            "Resolved base selector"
        );

        let width = schema.base_fields().len() + schema.fields().len();
        let mut records = Vec::with_capacity(base_nodes.len());

        for node in base_nodes {
            let mut record = Record::with_capacity(width);
            self.extractor
                .extract_into(node, schema.base_fields(), &mut record)?;
            self.extractor.extract_into(node, schema.fields(), &mut record)?;
            records.push(record);
        }

        Ok(records)
    }
}
