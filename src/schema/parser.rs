//! Schema JSON → validated `ExtractionSchema`
//!
//! All structural checks happen here, once. Extraction never re-validates.

use std::collections::HashSet;

use serde::Deserialize;

use super::types::{ExtractionSchema, FieldDef, FieldKind, FieldType, ListItem};
use crate::config::MAX_DEPTH_CEILING;
use crate::error::SchemaError;
use crate::value::Value;

/// Schema as written by the client, before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "base_selector")]
    base_selector: Option<String>,
    #[serde(default, alias = "base_fields")]
    base_fields: Option<Vec<RawField>>,
    #[serde(default)]
    fields: Option<Vec<RawField>>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    selector: Option<String>,
    /// Kept as a string so unknown tags get a schema error naming the field
    #[serde(default, rename = "type")]
    field_type: Option<String>,
    #[serde(default)]
    attribute: Option<String>,
    #[serde(default)]
    fields: Option<Vec<RawField>>,
    #[serde(default)]
    default: Option<serde_json::Value>,
}

/// Parse a schema from its JSON text
pub fn parse_schema(raw: &str, max_depth: usize) -> Result<ExtractionSchema, SchemaError> {
    let max_depth = max_depth.min(MAX_DEPTH_CEILING);
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| json_error(e, max_depth))?;
    parse_schema_value(value, max_depth)
}

/// Parse a schema from an already-decoded JSON value
///
/// `max_depth` is clamped to [`MAX_DEPTH_CEILING`].
pub fn parse_schema_value(
    raw: serde_json::Value,
    max_depth: usize,
) -> Result<ExtractionSchema, SchemaError> {
    let max_depth = max_depth.min(MAX_DEPTH_CEILING);
    // Decoding into RawField recurses once per level, so the depth has to be
    // known before serde sees the tree
    check_depth(&raw, max_depth)?;
    let schema: RawSchema =
        serde_json::from_value(raw).map_err(|e| json_error(e, max_depth))?;
    SchemaParser { max_depth }.parse(schema)
}

/// Walk nested `fields` arrays without recursing and fail on the first list
/// deeper than `max_depth`
fn check_depth(raw: &serde_json::Value, max_depth: usize) -> Result<(), SchemaError> {
    // Popped last to first, so baseFields come out ahead of fields
    let mut stack: Vec<(&[serde_json::Value], usize, String)> = ["fields", "baseFields", "base_fields"]
        .iter()
        .filter_map(|key| raw.get(*key)?.as_array())
        .map(|list| (list.as_slice(), 1, String::new()))
        .collect();

    while let Some((list, depth, parent)) = stack.pop() {
        if list.is_empty() {
            continue;
        }
        if depth > max_depth {
            let name = list[0].get("name").and_then(|n| n.as_str()).unwrap_or("?");
            return Err(SchemaError::MaxDepthExceeded {
                max_depth,
                field: join_path(&parent, name),
            });
        }
        for field in list.iter().rev() {
            if let Some(sub_fields) = field.get("fields").and_then(|f| f.as_array()) {
                let name = field.get("name").and_then(|n| n.as_str()).unwrap_or("?");
                stack.push((sub_fields.as_slice(), depth + 1, join_path(&parent, name)));
            }
        }
    }

    Ok(())
}

fn json_error(e: serde_json::Error, max_depth: usize) -> SchemaError {
    let message = e.to_string();
    // serde_json gives up on deep input before we get to count levels
    if message.contains("recursion limit exceeded") {
        SchemaError::MaxDepthExceeded {
            max_depth,
            field: format!("<input line {}>", e.line()),
        }
    } else {
        SchemaError::InvalidJson { message }
    }
}

struct SchemaParser {
    max_depth: usize,
}

impl SchemaParser {
    fn parse(&self, raw: RawSchema) -> Result<ExtractionSchema, SchemaError> {
        let base_selector = non_empty(raw.base_selector).ok_or(SchemaError::MissingBaseSelector)?;

        let base_fields = self.parse_fields(raw.base_fields.unwrap_or_default(), 1, "", "baseFields")?;
        let fields = self.parse_fields(raw.fields.unwrap_or_default(), 1, "", "fields")?;

        // Both lists land in the same flat record
        let base_names: HashSet<&str> = base_fields.iter().map(FieldDef::name).collect();
        if let Some(dup) = fields.iter().find(|f| base_names.contains(f.name())) {
            return Err(SchemaError::DuplicateFieldName {
                field: dup.name.clone(),
            });
        }

        let schema = ExtractionSchema {
            name: raw.name.unwrap_or_default(),
            base_selector,
            base_fields,
            fields,
        };

        tracing::debug!(
            schema = %schema.name,
            base_selector = %schema.base_selector,
            base_fields = schema.base_fields.len(),
            fields = schema.fields.len(),
            depth = schema.depth(),
            "Parsed extraction schema"
        );

        Ok(schema)
    }

    fn parse_fields(
        &self,
        raw: Vec<RawField>,
        depth: usize,
        parent: &str,
        list_name: &str,
    ) -> Result<Vec<FieldDef>, SchemaError> {
        if depth > self.max_depth {
            if let Some(first) = raw.first() {
                let name = first.name.as_deref().unwrap_or("?");
                return Err(SchemaError::MaxDepthExceeded {
                    max_depth: self.max_depth,
                    field: join_path(parent, name),
                });
            }
        }

        let mut seen = HashSet::with_capacity(raw.len());
        let mut parsed = Vec::with_capacity(raw.len());

        for (index, field) in raw.into_iter().enumerate() {
            let location = if parent.is_empty() {
                format!("{}[{}]", list_name, index)
            } else {
                format!("{}.{}[{}]", parent, list_name, index)
            };
            let field = self.parse_field(field, depth, parent, &location)?;
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateFieldName {
                    field: join_path(parent, &field.name),
                });
            }
            parsed.push(field);
        }

        Ok(parsed)
    }

    fn parse_field(
        &self,
        raw: RawField,
        depth: usize,
        parent: &str,
        location: &str,
    ) -> Result<FieldDef, SchemaError> {
        // Names are record keys, so they are kept exactly as declared
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| SchemaError::MissingFieldName {
                location: location.to_string(),
            })?;
        let path = join_path(parent, &name);

        let tag = raw
            .field_type
            .ok_or_else(|| SchemaError::MissingFieldType { field: path.clone() })?;
        let field_type: FieldType = tag.trim().parse().map_err(|_| SchemaError::UnknownFieldType {
            field: path.clone(),
            found: tag.clone(),
        })?;

        let attribute = non_empty(raw.attribute);
        let sub_fields = raw.fields.filter(|f| !f.is_empty());

        let kind = match field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Html => FieldKind::Html,
            FieldType::Attribute => FieldKind::Attribute {
                attribute: attribute
                    .ok_or_else(|| SchemaError::MissingAttribute { field: path.clone() })?,
            },
            FieldType::Nested | FieldType::NestedList => {
                let sub_fields = sub_fields.ok_or_else(|| SchemaError::MissingSubFields {
                    field: path.clone(),
                    kind: field_type.as_str(),
                })?;
                let fields = self.parse_fields(sub_fields, depth + 1, &path, "fields")?;
                if field_type == FieldType::Nested {
                    FieldKind::Nested { fields }
                } else {
                    FieldKind::NestedList { fields }
                }
            }
            FieldType::List => FieldKind::List {
                item: self.parse_list_item(attribute, sub_fields, depth, &path)?,
            },
        };

        Ok(FieldDef {
            name,
            selector: non_empty(raw.selector),
            kind,
            default: raw
                .default
                .as_ref()
                .filter(|v| !v.is_null())
                .map(Value::from_json),
        })
    }

    /// `list` takes its item from, in order: a single leaf sub-field, the
    /// `attribute`, or the node text. Mixing the first two is rejected.
    fn parse_list_item(
        &self,
        attribute: Option<String>,
        sub_fields: Option<Vec<RawField>>,
        depth: usize,
        path: &str,
    ) -> Result<ListItem, SchemaError> {
        let Some(sub_fields) = sub_fields else {
            return Ok(attribute.map_or(ListItem::Text, ListItem::Attribute));
        };

        if attribute.is_some() {
            return Err(SchemaError::AmbiguousList {
                field: path.to_string(),
                reason: "declares both attribute and fields".to_string(),
            });
        }
        if sub_fields.len() != 1 {
            return Err(SchemaError::AmbiguousList {
                field: path.to_string(),
                reason: format!(
                    "fields must hold exactly one leaf sub-field, found {}; use nested_list for objects",
                    sub_fields.len()
                ),
            });
        }

        let mut item = self.parse_fields(sub_fields, depth + 1, path, "fields")?;
        let item = item.remove(0);
        if !item.field_type().is_leaf() {
            return Err(SchemaError::AmbiguousList {
                field: path.to_string(),
                reason: format!(
                    "item field '{}' has type {}; use nested_list for objects",
                    item.name,
                    item.field_type()
                ),
            });
        }

        Ok(ListItem::Field(Box::new(item)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}
