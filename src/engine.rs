//! Extraction engine façade
//!
//! The single entry point for callers: schema JSON plus HTML in, ordered
//! records (or their JSON rendering) out. The schema is always parsed before
//! the document is touched, so schema errors never depend on page content.
//!
//! ```rust
//! use schema_extractor::{ExtractionEngine, Value};
//!
//! let html = r#"<ul><li data-id="1">One</li><li data-id="2">Two</li></ul>"#;
//! let schema = r#"{
//!     "name": "items",
//!     "baseSelector": "li",
//!     "baseFields": [{"name": "id", "type": "attribute", "attribute": "data-id"}],
//!     "fields": [{"name": "label", "type": "text"}]
//! }"#;
//!
//! let records = ExtractionEngine::default().extract(html, schema).unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1]["label"], Value::from("Two"));
//! ```

use crate::config::EngineConfig;
use crate::dom::{DomTree, HtmlDocument};
use crate::error::Result;
use crate::extractors::build_records;
use crate::schema::{parse_schema, parse_schema_value, ExtractionSchema};
use crate::value::Record;

/// Stateless extraction engine; cheap to clone and safe to share
#[derive(Debug, Clone, Default)]
pub struct ExtractionEngine {
    config: EngineConfig,
}

impl ExtractionEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate schema JSON into a reusable schema
    pub fn parse_schema(&self, raw_schema: &str) -> Result<ExtractionSchema> {
        Ok(parse_schema(raw_schema, self.config.max_depth)?)
    }

    pub fn parse_schema_value(&self, raw_schema: serde_json::Value) -> Result<ExtractionSchema> {
        Ok(parse_schema_value(raw_schema, self.config.max_depth)?)
    }

    /// Parse `raw_schema`, then `html`, and build the records
    pub fn extract(&self, html: &str, raw_schema: &str) -> Result<Vec<Record>> {
        let schema = self.parse_schema(raw_schema)?;
        self.extract_with_schema(html, &schema)
    }

    /// Extract with an already-parsed (possibly cached) schema
    pub fn extract_with_schema(&self, html: &str, schema: &ExtractionSchema) -> Result<Vec<Record>> {
        let document = HtmlDocument::parse(html);
        self.extract_from(&document, schema)
    }

    /// Extract from any `DomTree` backend
    pub fn extract_document<D: DomTree>(&self, dom: &D, raw_schema: &str) -> Result<Vec<Record>> {
        let schema = self.parse_schema(raw_schema)?;
        self.extract_from(dom, &schema)
    }

    pub fn extract_from<D: DomTree>(&self, dom: &D, schema: &ExtractionSchema) -> Result<Vec<Record>> {
        let records = build_records(dom, schema)?;
        tracing::debug!(
            schema = schema.name(),
            records = records.len(),
            "Structured extraction completed"
        );
        Ok(records)
    }

    /// Records rendered as a JSON array string, the `extracted_content` of a crawl result
    pub fn extracted_content(&self, html: &str, raw_schema: &str) -> Result<String> {
        let records = self.extract(html, raw_schema)?;
        Ok(records_to_json(records).to_string())
    }
}

/// JSON array of records, keys in declared order
pub fn records_to_json(records: Vec<Record>) -> serde_json::Value {
    serde_json::Value::Array(records.into_iter().map(Into::into).collect())
}

/// Extract with the default configuration
pub fn extract_structured(html: &str, raw_schema: &str) -> Result<Vec<Record>> {
    ExtractionEngine::default().extract(html, raw_schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryTree;
    use crate::error::{ExtractError, SchemaError};
    use serde_json::json;

    fn deep_schema(levels: usize) -> String {
        let mut field = json!({"name": "leaf", "type": "text"});
        for level in (1..levels).rev() {
            field = json!({
                "name": format!("n{}", level),
                "selector": "div",
                "type": "nested",
                "fields": [field]
            });
        }
        json!({"name": "deep", "baseSelector": "div", "fields": [field]}).to_string()
    }

    #[test]
    fn test_depth_error_before_dom_access() {
        let engine = ExtractionEngine::new(EngineConfig::default().with_max_depth(3)).unwrap();
        let mut tree = MemoryTree::new();
        tree.add(MemoryTree::ROOT, "div", &[], "x");

        let err = engine
            .extract_document(&tree, &deep_schema(4))
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Schema(SchemaError::MaxDepthExceeded { max_depth: 3, .. })
        ));
        assert_eq!(tree.accesses(), 0);

        assert!(engine.extract_document(&tree, &deep_schema(3)).is_ok());
        assert!(tree.accesses() > 0);
    }

    #[test]
    fn test_schema_error_before_dom_access() {
        let tree = MemoryTree::new();
        let err = ExtractionEngine::default()
            .extract_document(&tree, r#"{"name": "x", "fields": []}"#)
            .unwrap_err();
        assert_eq!(err, ExtractError::Schema(SchemaError::MissingBaseSelector));
        assert_eq!(tree.accesses(), 0);
    }

    #[test]
    fn test_selector_error_kind() {
        let err = ExtractionEngine::default()
            .extract(
                "<div><p>a</p></div>",
                r#"{"baseSelector": "div", "fields": [{"name": "p", "selector": "p[", "type": "text"}]}"#,
            )
            .unwrap_err();
        assert_eq!(err.kind(), "selector");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = ExtractionEngine::new(EngineConfig::default().with_max_depth(0)).unwrap_err();
        assert!(matches!(err, ExtractError::Schema(SchemaError::InvalidConfig { .. })));
    }

    #[test]
    fn test_extracted_content_keeps_key_order() {
        let content = extract_content(
            r#"<div class="c" data-id="7"><span class="z">last</span></div>"#,
            r#"{
                "baseSelector": "div.c",
                "baseFields": [{"name": "id", "type": "attribute", "attribute": "data-id"}],
                "fields": [
                    {"name": "z", "selector": "span.z", "type": "text"},
                    {"name": "a", "selector": "span.a", "type": "text"}
                ]
            }"#,
        );
        assert_eq!(content, r#"[{"id":"7","z":"last","a":null}]"#);
    }

    fn extract_content(html: &str, schema: &str) -> String {
        ExtractionEngine::default()
            .extracted_content(html, schema)
            .unwrap()
    }

    #[test]
    fn test_empty_page_yields_empty_array() {
        assert_eq!(
            extract_content("", r#"{"baseSelector": "div.card", "fields": []}"#),
            "[]"
        );
    }
}
