//! scraper-backed `DomTree`

use std::cell::RefCell;
use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};

use super::DomTree;
use crate::error::SelectorError;

/// Parsed HTML document
///
/// Compiled selectors are cached per document, since the same schema selector
/// runs once per base match.
pub struct HtmlDocument {
    html: Html,
    selectors: RefCell<HashMap<String, Selector>>,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        Self::from_html(Html::parse_document(html))
    }

    pub fn parse_fragment(html: &str) -> Self {
        Self::from_html(Html::parse_fragment(html))
    }

    pub fn from_html(html: Html) -> Self {
        Self {
            html,
            selectors: RefCell::new(HashMap::new()),
        }
    }

    fn with_selector<T>(
        &self,
        selector: &str,
        f: impl FnOnce(&Selector) -> T,
    ) -> Result<T, SelectorError> {
        let mut cache = self.selectors.borrow_mut();
        if !cache.contains_key(selector) {
            let compiled = Selector::parse(selector)
                .map_err(|e| SelectorError::new(selector, e.to_string()))?;
            cache.insert(selector.to_string(), compiled);
        }
        Ok(f(&cache[selector]))
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("cached_selectors", &self.selectors.borrow().len())
            .finish()
    }
}

impl DomTree for HtmlDocument {
    type Node<'a> = ElementRef<'a>;

    fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    fn select<'a>(
        &'a self,
        context: ElementRef<'a>,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, SelectorError> {
        self.with_selector(selector, |compiled| context.select(compiled).collect())
    }

    // ElementRef::select only walks descendants, so `<html>` is tested on its own
    fn select_document(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, SelectorError> {
        let root = self.html.root_element();
        self.with_selector(selector, |compiled| {
            let own = compiled.matches(&root).then_some(root);
            own.into_iter().chain(root.select(compiled)).collect()
        })
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.text().collect()
    }

    fn inner_html<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.inner_html()
    }

    fn attribute<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<String> {
        node.value().attr(name).map(String::from)
    }
}
