//! Typed, validated schema tree

use std::fmt;
use std::str::FromStr;

use crate::value::Value;

/// Field type tag as written in schema JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Html,
    Attribute,
    Nested,
    List,
    NestedList,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Html => "html",
            FieldType::Attribute => "attribute",
            FieldType::Nested => "nested",
            FieldType::List => "list",
            FieldType::NestedList => "nested_list",
        }
    }

    /// Leaf types read a single node and never recurse
    pub fn is_leaf(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Html | FieldType::Attribute)
    }
}

impl FromStr for FieldType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldType::Text),
            "html" => Ok(FieldType::Html),
            "attribute" => Ok(FieldType::Attribute),
            "nested" => Ok(FieldType::Nested),
            "list" => Ok(FieldType::List),
            "nested_list" => Ok(FieldType::NestedList),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one field derives its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Html,
    Attribute { attribute: String },
    Nested { fields: Vec<FieldDef> },
    List { item: ListItem },
    NestedList { fields: Vec<FieldDef> },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text => FieldType::Text,
            FieldKind::Html => FieldType::Html,
            FieldKind::Attribute { .. } => FieldType::Attribute,
            FieldKind::Nested { .. } => FieldType::Nested,
            FieldKind::List { .. } => FieldType::List,
            FieldKind::NestedList { .. } => FieldType::NestedList,
        }
    }
}

/// Per-item extractor of a `list` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// Trimmed text of each matched node
    Text,
    /// Named attribute of each matched node
    Attribute(String),
    /// A single leaf field evaluated with each matched node as context
    Field(Box<FieldDef>),
}

/// One named field of a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) selector: Option<String>,
    pub(crate) kind: FieldKind,
    pub(crate) default: Option<Value>,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Selector relative to the context node; `None` means the context node itself
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Value substituted when extraction yields `Null`
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A parsed extraction schema
///
/// Only obtainable through the parser, so every instance is validated.
/// Immutable and `Send + Sync`; one parsed schema may serve any number of
/// concurrent extractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSchema {
    pub(crate) name: String,
    pub(crate) base_selector: String,
    pub(crate) base_fields: Vec<FieldDef>,
    pub(crate) fields: Vec<FieldDef>,
}

impl ExtractionSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_selector(&self) -> &str {
        &self.base_selector
    }

    pub fn base_fields(&self) -> &[FieldDef] {
        &self.base_fields
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Record keys in output order: base fields first, then fields
    pub fn record_keys(&self) -> impl Iterator<Item = &str> {
        self.base_fields
            .iter()
            .chain(self.fields.iter())
            .map(FieldDef::name)
    }

    /// Deepest field nesting level, top-level fields being level 1
    pub fn depth(&self) -> usize {
        fn list_depth(fields: &[FieldDef]) -> usize {
            fields.iter().map(field_depth).max().unwrap_or(0)
        }
        fn field_depth(field: &FieldDef) -> usize {
            1 + match &field.kind {
                FieldKind::Nested { fields } | FieldKind::NestedList { fields } => {
                    list_depth(fields)
                }
                FieldKind::List {
                    item: ListItem::Field(inner),
                } => field_depth(inner),
                _ => 0,
            }
        }
        list_depth(&self.base_fields).max(list_depth(&self.fields))
    }
}
