//! XML parsing and path/predicate matching.
//!
//! Documents are parsed strictly with `sxd-document`. Element and attribute
//! names are compared in their qualified form: `{namespace-uri}local` for
//! namespaced names, the bare local name otherwise.
//!
//! # Example
//!
//! ```rust
//! use quarry_core::query::XmlQuery;
//! use quarry_core::xml::XmlDocument;
//!
//! let doc = XmlDocument::parse(r#"<shelf><book lang="en">A</book><book lang="fr">B</book></shelf>"#).unwrap();
//! let matches = doc.find(&XmlQuery::parse("//book[@lang='fr']"));
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].text().as_deref(), Some("B"));
//! ```

use std::fmt;

use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};
use sxd_document::{Package, QName, parser};

use crate::query::{PathPredicate, XmlQuery};
use crate::{QuarryError, Result};

/// A parsed XML document.
pub struct XmlDocument {
    package: Package,
}

impl XmlDocument {
    /// Parses XML from a string.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::XmlParseError`] when the document is not well-formed.
    pub fn parse(xml: &str) -> Result<Self> {
        let package = parser::parse(xml).map_err(|e| QuarryError::XmlParseError(e.to_string()))?;
        Ok(Self { package })
    }

    /// Parses XML from bytes that must be valid UTF-8.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes).map_err(|_| QuarryError::InvalidEncoding)?;
        Self::parse(xml)
    }

    /// The document element, if any.
    pub fn root_element(&self) -> Option<Element<'_>> {
        self.package.as_document().root().children().into_iter().find_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Finds every element matching `query`, in document order.
    pub fn find(&self, query: &XmlQuery) -> Vec<XmlMatch<'_>> {
        let Some(root) = self.root_element() else {
            return Vec::new();
        };

        let elements = match query {
            XmlQuery::SimpleTag { tag } => find_steps(root, tag),
            XmlQuery::DescendantPath { tag, predicate } => pre_order(root)
                .into_iter()
                .filter(|el| qualified_name(el.name()) == *tag && predicate_holds(*el, predicate))
                .collect(),
        };

        elements.into_iter().map(|element| XmlMatch { element }).collect()
    }
}

/// Evaluates `a/b/c`: `a` at any depth (root included), then direct children.
fn find_steps<'d>(root: Element<'d>, path: &str) -> Vec<Element<'d>> {
    let steps = split_steps(path);
    if steps.iter().any(|step| step.is_empty()) {
        return Vec::new();
    }

    let mut current: Vec<Element<'d>> =
        pre_order(root).into_iter().filter(|el| step_matches(*el, steps[0])).collect();

    for step in &steps[1..] {
        current = current
            .iter()
            .flat_map(|el| child_elements(*el))
            .filter(|el| step_matches(*el, step))
            .collect();
    }

    current
}

/// Splits on `/` outside of `{namespace}` braces.
fn split_steps(path: &str) -> Vec<&str> {
    let mut steps = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in path.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                steps.push(path[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    steps.push(path[start..].trim());

    steps
}

fn step_matches(element: Element<'_>, step: &str) -> bool {
    step == "*" || qualified_name(element.name()) == step
}

fn predicate_holds(element: Element<'_>, predicate: &PathPredicate) -> bool {
    match predicate {
        PathPredicate::Any => true,
        PathPredicate::Attribute { name, value } => attribute(element, name) == Some(value.as_str()),
        PathPredicate::Unsupported(_) => false,
    }
}

/// Every element under and including `root`, pre-order. Iterative so deep
/// documents cannot exhaust the call stack.
fn pre_order(root: Element<'_>) -> Vec<Element<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![root];

    while let Some(element) = stack.pop() {
        out.push(element);
        let mut children = child_elements(element);
        children.reverse();
        stack.extend(children);
    }

    out
}

fn child_elements(element: Element<'_>) -> Vec<Element<'_>> {
    element
        .children()
        .into_iter()
        .filter_map(|child| match child {
            ChildOfElement::Element(el) => Some(el),
            _ => None,
        })
        .collect()
}

fn attribute<'d>(element: Element<'d>, name: &str) -> Option<&'d str> {
    element
        .attributes()
        .into_iter()
        .find(|attr| qualified_name(attr.name()) == name)
        .map(|attr| attr.value())
}

fn qualified_name(name: QName<'_>) -> String {
    match name.namespace_uri() {
        Some(uri) => format!("{{{}}}{}", uri, name.local_part()),
        None => name.local_part().to_string(),
    }
}

/// A matched element, borrowed from its [`XmlDocument`].
#[derive(Clone, Copy)]
pub struct XmlMatch<'d> {
    element: Element<'d>,
}

impl fmt::Debug for XmlMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlMatch").field("tag", &self.tag()).finish()
    }
}

impl<'d> XmlMatch<'d> {
    /// Qualified tag name.
    pub fn tag(&self) -> String {
        qualified_name(self.element.name())
    }

    /// Gets the value of an attribute by qualified name.
    pub fn attr(&self, name: &str) -> Option<&'d str> {
        attribute(self.element, name)
    }

    /// All attributes as `(qualified name, value)` pairs.
    pub fn attrs(&self) -> Vec<(String, &'d str)> {
        self.element
            .attributes()
            .into_iter()
            .map(|attr| (qualified_name(attr.name()), attr.value()))
            .collect()
    }

    /// Text that precedes the first child element, trimmed. `None` when blank.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        for child in self.element.children() {
            match child {
                ChildOfElement::Element(_) => break,
                ChildOfElement::Text(t) => text.push_str(t.text()),
                _ => {}
            }
        }

        let trimmed = text.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<catalog>
    <book id="1" lang="en">
        <title>Rust in Action</title>
        <item>first</item>
    </book>
    <book id="2" lang="fr">
        <title>Le Rust</title>
        <section>
            <item kind="note">nested</item>
        </section>
    </book>
    <item>last</item>
</catalog>"#;

    fn texts(matches: &[XmlMatch<'_>]) -> Vec<String> {
        matches.iter().map(|m| m.text().unwrap_or_default()).collect()
    }

    #[test]
    fn test_simple_tag_any_depth_in_order() {
        let doc = XmlDocument::parse(CATALOG).unwrap();
        let matches = doc.find(&XmlQuery::parse("item"));
        assert_eq!(texts(&matches), vec!["first", "nested", "last"]);
    }

    #[test]
    fn test_simple_tag_includes_root() {
        let doc = XmlDocument::parse(CATALOG).unwrap();
        let matches = doc.find(&XmlQuery::parse("catalog"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tag(), "catalog");
    }

    #[test]
    fn test_simple_tag_child_steps() {
        let doc = XmlDocument::parse(CATALOG).unwrap();
        let matches = doc.find(&XmlQuery::parse("book/title"));
        assert_eq!(texts(&matches), vec!["Rust in Action", "Le Rust"]);

        let matches = doc.find(&XmlQuery::parse("book/*/item"));
        assert_eq!(texts(&matches), vec!["nested"]);

        assert!(doc.find(&XmlQuery::parse("book//item")).is_empty());
    }

    #[test]
    fn test_descendant_path() {
        let doc = XmlDocument::parse(CATALOG).unwrap();
        let matches = doc.find(&XmlQuery::parse("//item"));
        assert_eq!(texts(&matches), vec!["first", "nested", "last"]);
    }

    #[test]
    fn test_descendant_path_attribute_predicate() {
        let doc = XmlDocument::parse(CATALOG).unwrap();

        let matches = doc.find(&XmlQuery::parse("//book[@lang='fr']"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].attr("id"), Some("2"));

        let matches = doc.find(&XmlQuery::parse("//item[@kind=\"note\"]"));
        assert_eq!(texts(&matches), vec!["nested"]);

        assert!(doc.find(&XmlQuery::parse("//book[@lang='de']")).is_empty());
        assert!(doc.find(&XmlQuery::parse("//title[@lang='en']")).is_empty());
    }

    #[test]
    fn test_positional_predicate_never_matches() {
        let doc = XmlDocument::parse(CATALOG).unwrap();
        assert!(doc.find(&XmlQuery::parse("//item[1]")).is_empty());
        assert!(doc.find(&XmlQuery::parse("//book[@id]")).is_empty());
    }

    #[test]
    fn test_descendant_path_is_exact_tag() {
        let doc = XmlDocument::parse(CATALOG).unwrap();
        assert!(doc.find(&XmlQuery::parse("//book/title")).is_empty());
    }

    #[test]
    fn test_attrs_and_direct_text() {
        let doc = XmlDocument::parse(CATALOG).unwrap();
        let books = doc.find(&XmlQuery::parse("book"));

        let mut attrs = books[0].attrs();
        attrs.sort();
        assert_eq!(attrs, vec![("id".to_string(), "1"), ("lang".to_string(), "en")]);
        assert_eq!(books[0].text(), None);
    }

    #[test]
    fn test_text_stops_at_first_child() {
        let doc = XmlDocument::parse("<p>  lead <b>bold</b> tail</p>").unwrap();
        let matches = doc.find(&XmlQuery::parse("p"));
        assert_eq!(matches[0].text().as_deref(), Some("lead"));
    }

    #[test]
    fn test_namespaced_names() {
        let doc = XmlDocument::parse(r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>x</entry></feed>"#).unwrap();
        assert!(doc.find(&XmlQuery::parse("entry")).is_empty());

        let matches = doc.find(&XmlQuery::parse("{http://www.w3.org/2005/Atom}entry"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tag(), "{http://www.w3.org/2005/Atom}entry");

        let matches = doc.find(&XmlQuery::parse("{http://www.w3.org/2005/Atom}feed/{http://www.w3.org/2005/Atom}entry"));
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_split_steps_respects_namespaces() {
        assert_eq!(split_steps("a/{urn:x/y}b"), vec!["a", "{urn:x/y}b"]);
        assert_eq!(split_steps(" a / b "), vec!["a", "b"]);
        assert_eq!(split_steps("a//b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_malformed_xml() {
        let result = XmlDocument::parse("<root><unclosed></root>");
        assert!(matches!(result, Err(QuarryError::XmlParseError(_))));
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        let result = XmlDocument::parse_bytes(b"<root>\xff</root>");
        assert!(matches!(result, Err(QuarryError::InvalidEncoding)));
    }
}
