//! DOM and CSS selector capability
//!
//! The extraction engine only needs to select nodes relative to a context node
//! and read text, inner HTML and attributes from them. `DomTree` is that seam;
//! `HtmlDocument` implements it with the scraper crate.

mod html;
#[cfg(test)]
pub(crate) mod memory;

pub use html::HtmlDocument;

use crate::error::SelectorError;

/// Read-only view of a parsed document
pub trait DomTree {
    /// Handle to one element, valid as long as the tree is borrowed
    type Node<'a>: Copy
    where
        Self: 'a;

    /// Element that base selectors are resolved against
    fn root(&self) -> Self::Node<'_>;

    /// Descendants of `context` matching `selector`, in document order
    fn select<'a>(
        &'a self,
        context: Self::Node<'a>,
        selector: &str,
    ) -> Result<Vec<Self::Node<'a>>, SelectorError>;

    /// Elements anywhere in the document matching `selector`, in document
    /// order, the root element included
    fn select_document(&self, selector: &str) -> Result<Vec<Self::Node<'_>>, SelectorError> {
        self.select(self.root(), selector)
    }

    /// Concatenated text of the node and its descendants, untrimmed
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    fn inner_html<'a>(&'a self, node: Self::Node<'a>) -> String;

    fn attribute<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<String>;
}
