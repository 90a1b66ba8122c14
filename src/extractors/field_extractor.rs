//! Single-field evaluation
//!
//! Resolves a field's selector against a context node and turns the matched
//! nodes into a `Value` according to the field kind:
//!
//! | kind          | no match        | matches                          |
//! |---------------|-----------------|----------------------------------|
//! | `text`        | `Null`          | trimmed text of the first        |
//! | `html`        | `Null`          | inner HTML of the first          |
//! | `attribute`   | `Null`          | attribute of the first, or Null  |
//! | `nested`      | `Null`          | object built from the first      |
//! | `list`        | `[]`            | one leaf value per node          |
//! | `nested_list` | `[]`            | one object per node              |
//!
//! A `Null` result is replaced by the field default when one is declared.

use crate::dom::DomTree;
use crate::error::SelectorError;
use crate::schema::{FieldDef, FieldKind, ListItem};
use crate::value::{Record, Value};

/// Evaluates field definitions against nodes of one document
pub struct FieldExtractor<'d, D: DomTree> {
    dom: &'d D,
}

impl<'d, D: DomTree> Clone for FieldExtractor<'d, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'d, D: DomTree> Copy for FieldExtractor<'d, D> {}

impl<'d, D: DomTree> FieldExtractor<'d, D> {
    pub fn new(dom: &'d D) -> Self {
        Self { dom }
    }

    pub fn extract(&self, context: D::Node<'d>, field: &FieldDef) -> Result<Value, SelectorError> {
        let nodes = match field.selector() {
            Some(selector) => self.dom.select(context, selector)?,
            None => vec![context],
        };

        let value: Value = match field.kind() {
            FieldKind::Text => nodes.first().map(|&node| self.trimmed_text(node)).into(),
            FieldKind::Html => nodes.first().map(|&node| self.dom.inner_html(node)).into(),
            FieldKind::Attribute { attribute } => nodes
                .first()
                .and_then(|&node| self.dom.attribute(node, attribute))
                .into(),
            FieldKind::Nested { fields } => match nodes.first() {
                Some(&node) => Value::Object(self.extract_object(node, fields)?),
                None => Value::Null,
            },
            FieldKind::List { item } => Value::Sequence(
                nodes
                    .iter()
                    .map(|&node| self.list_item(node, item))
                    .collect::<Result<_, _>>()?,
            ),
            FieldKind::NestedList { fields } => Value::Sequence(
                nodes
                    .iter()
                    .map(|&node| self.extract_object(node, fields).map(Value::Object))
                    .collect::<Result<_, _>>()?,
            ),
        };

        tracing::trace!(
            field = field.name(),
            field_type = %field.field_type(),
            matches = nodes.len(),
            "Evaluated field"
        );

        Ok(match (value, field.default_value()) {
            (Value::Null, Some(default)) => default.clone(),
            (value, _) => value,
        })
    }

    /// Run every field against `node` and collect the results into a new record
    pub fn extract_object(&self, node: D::Node<'d>, fields: &[FieldDef]) -> Result<Record, SelectorError> {
        let mut record = Record::with_capacity(fields.len());
        self.extract_into(node, fields, &mut record)?;
        Ok(record)
    }

    /// Run every field against `node`, inserting results in declared order
    pub fn extract_into(
        &self,
        node: D::Node<'d>,
        fields: &[FieldDef],
        record: &mut Record,
    ) -> Result<(), SelectorError> {
        for field in fields {
            let value = self.extract(node, field)?;
            record.insert(field.name(), value);
        }
        Ok(())
    }

    fn list_item(&self, node: D::Node<'d>, item: &ListItem) -> Result<Value, SelectorError> {
        Ok(match item {
            ListItem::Text => Value::Scalar(self.trimmed_text(node)),
            // Missing attributes keep their slot so positions line up with the matches
            ListItem::Attribute(name) => self.dom.attribute(node, name).into(),
            ListItem::Field(field) => self.extract(node, field)?,
        })
    }

    fn trimmed_text(&self, node: D::Node<'d>) -> String {
        self.dom.text(node).trim().to_string()
    }
}
