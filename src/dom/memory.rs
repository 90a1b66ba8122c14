//! In-memory `DomTree` for unit tests
//!
//! Supports compound selectors made of a tag, `.class`, `#id`, `[attr]` and
//! `[attr=value]`, joined by descendant combinators. Every DOM call bumps an
//! access counter.

use std::cell::Cell;

use super::DomTree;
use crate::error::SelectorError;

#[derive(Debug)]
struct MemoryNode {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct MemoryTree {
    nodes: Vec<MemoryNode>,
    accesses: Cell<usize>,
}

#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    id: Option<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl MemoryTree {
    pub(crate) const ROOT: usize = 0;

    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![MemoryNode {
                tag: "root".to_string(),
                attrs: vec![],
                text: String::new(),
                parent: None,
                children: vec![],
            }],
            accesses: Cell::new(0),
        }
    }

    /// Append an element under `parent` and return its handle
    pub(crate) fn add(&mut self, parent: usize, tag: &str, attrs: &[(&str, &str)], text: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(MemoryNode {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: text.to_string(),
            parent: Some(parent),
            children: vec![],
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub(crate) fn accesses(&self) -> usize {
        self.accesses.get()
    }

    fn touch(&self) {
        self.accesses.set(self.accesses.get() + 1);
    }

    fn attr(&self, node: usize, name: &str) -> Option<&str> {
        self.nodes[node]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn descendants(&self, node: usize, out: &mut Vec<usize>) {
        for &child in &self.nodes[node].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn matches(&self, node: usize, compound: &Compound) -> bool {
        let element = &self.nodes[node];
        if let Some(tag) = &compound.tag {
            if &element.tag != tag {
                return false;
            }
        }
        if let Some(id) = &compound.id {
            if self.attr(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        let classes: Vec<&str> = self
            .attr(node, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default();
        if !compound.classes.iter().all(|c| classes.contains(&c.as_str())) {
            return false;
        }
        compound.attrs.iter().all(|(name, value)| match value {
            Some(value) => self.attr(node, name) == Some(value.as_str()),
            None => self.attr(node, name).is_some(),
        })
    }

    /// Right-to-left match of a descendant chain
    fn matches_chain(&self, node: usize, chain: &[Compound]) -> bool {
        let Some((last, ancestors)) = chain.split_last() else {
            return false;
        };
        if !self.matches(node, last) {
            return false;
        }
        let mut remaining = ancestors;
        let mut current = self.nodes[node].parent;
        while let Some((wanted, rest)) = remaining.split_last() {
            match current {
                Some(ancestor) => {
                    if self.matches(ancestor, wanted) {
                        remaining = rest;
                    }
                    current = self.nodes[ancestor].parent;
                }
                None => return false,
            }
        }
        true
    }

    fn render(&self, node: usize, out: &mut String) {
        let element = &self.nodes[node];
        out.push('<');
        out.push_str(&element.tag);
        for (k, v) in &element.attrs {
            out.push_str(&format!(" {}=\"{}\"", k, v));
        }
        out.push('>');
        self.render_children(node, out);
        out.push_str(&format!("</{}>", element.tag));
    }

    fn render_children(&self, node: usize, out: &mut String) {
        out.push_str(&self.nodes[node].text);
        for &child in &self.nodes[node].children {
            self.render(child, out);
        }
    }

    fn collect_text(&self, node: usize, out: &mut String) {
        out.push_str(&self.nodes[node].text);
        for &child in &self.nodes[node].children {
            self.collect_text(child, out);
        }
    }
}

fn parse_selector(selector: &str) -> Result<Vec<Compound>, SelectorError> {
    let chain = selector
        .split_whitespace()
        .map(|part| parse_compound(part).map_err(|message| SelectorError::new(selector, message)))
        .collect::<Result<Vec<_>, _>>()?;
    if chain.is_empty() {
        return Err(SelectorError::new(selector, "empty selector"));
    }
    Ok(chain)
}

fn parse_compound(part: &str) -> Result<Compound, String> {
    fn ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
        let mut out = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                out.push(c);
                chars.next();
            } else {
                break;
            }
        }
        out
    }

    let mut compound = Compound::default();
    let mut chars = part.chars().peekable();

    let tag = ident(&mut chars);
    if !tag.is_empty() {
        compound.tag = Some(tag);
    }

    while let Some(c) = chars.next() {
        match c {
            '.' | '#' => {
                let name = ident(&mut chars);
                if name.is_empty() {
                    return Err(format!("expected a name after '{}'", c));
                }
                if c == '.' {
                    compound.classes.push(name);
                } else {
                    compound.id = Some(name);
                }
            }
            '[' => {
                let name = ident(&mut chars);
                if name.is_empty() {
                    return Err("expected an attribute name".to_string());
                }
                let value = if chars.peek() == Some(&'=') {
                    chars.next();
                    let mut value = String::new();
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                        value.push(c);
                    }
                    Some(value.trim_matches(|c| c == '"' || c == '\'').to_string())
                } else if chars.next() == Some(']') {
                    None
                } else {
                    return Err("unterminated attribute selector".to_string());
                };
                compound.attrs.push((name, value));
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    if compound == Compound::default() {
        return Err("empty compound selector".to_string());
    }
    Ok(compound)
}

impl DomTree for MemoryTree {
    type Node<'a> = usize;

    fn root(&self) -> usize {
        self.touch();
        Self::ROOT
    }

    fn select<'a>(&'a self, context: usize, selector: &str) -> Result<Vec<usize>, SelectorError> {
        self.touch();
        let chain = parse_selector(selector)?;
        let mut candidates = Vec::new();
        self.descendants(context, &mut candidates);
        Ok(candidates
            .into_iter()
            .filter(|&node| self.matches_chain(node, &chain))
            .collect())
    }

    fn text<'a>(&'a self, node: usize) -> String {
        self.touch();
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn inner_html<'a>(&'a self, node: usize) -> String {
        self.touch();
        let mut out = String::new();
        self.render_children(node, &mut out);
        out
    }

    fn attribute<'a>(&'a self, node: usize, name: &str) -> Option<String> {
        self.touch();
        self.attr(node, name).map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> MemoryTree {
        let mut tree = MemoryTree::new();
        let list = tree.add(MemoryTree::ROOT, "ul", &[("class", "features main")], "");
        tree.add(list, "li", &[("data-rank", "1")], "fast");
        let second = tree.add(list, "li", &[], "cheap ");
        tree.add(second, "b", &[], "!");
        tree.add(MemoryTree::ROOT, "li", &[("id", "loose")], "outside");
        tree
    }

    #[test]
    fn test_descendant_selection() {
        let tree = tree();
        let items = tree.select(MemoryTree::ROOT, "ul.features li").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(tree.text(items[1]), "cheap !");
        assert_eq!(tree.inner_html(items[1]), "cheap <b>!</b>");

        assert_eq!(tree.select(MemoryTree::ROOT, "li").unwrap().len(), 3);
        assert_eq!(tree.select(MemoryTree::ROOT, "#loose").unwrap().len(), 1);
        assert_eq!(tree.select(MemoryTree::ROOT, "li[data-rank]").unwrap().len(), 1);
        assert_eq!(tree.select(MemoryTree::ROOT, "li[data-rank='2']").unwrap().len(), 0);
    }

    #[test]
    fn test_invalid_selectors() {
        let tree = tree();
        assert!(tree.select(MemoryTree::ROOT, "").is_err());
        assert!(tree.select(MemoryTree::ROOT, "li > b").is_err());
        assert!(tree.select(MemoryTree::ROOT, "li[").is_err());
        assert!(tree.select(MemoryTree::ROOT, "li.").is_err());
    }

    #[test]
    fn test_counts_accesses() {
        let tree = tree();
        assert_eq!(tree.accesses(), 0);
        let root = tree.root();
        tree.select(root, "li").unwrap();
        assert_eq!(tree.accesses(), 2);
    }
}
