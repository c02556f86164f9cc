//! HTML parsing and tag/attribute matching.
//!
//! This module provides [`HtmlDocument`], a tolerant HTML parse built on
//! `scraper`, and [`HtmlMatch`], a borrowed handle to a matched element.
//!
//! # Example
//!
//! ```rust
//! use quarry_core::html::HtmlDocument;
//! use quarry_core::query::HtmlQuery;
//!
//! let html = r#"
//!     <div class="card wide" id="main">First</div>
//!     <div class="card">Second</div>
//! "#;
//!
//! let doc = HtmlDocument::parse(html);
//! let matches = doc.find(&HtmlQuery::parse("div.card.wide"));
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].attr("id"), Some("main"));
//! ```

use encoding_rs::{Encoding, UTF_8};
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::query::HtmlQuery;

/// How many leading bytes are searched for a `<meta>` charset declaration.
const META_SNIFF_LIMIT: usize = 1024;

/// Elements the HTML5 parser inserts when the markup leaves them out.
const IMPLIED_ELEMENTS: [&str; 3] = ["html", "head", "body"];

/// Represents a parsed HTML document.
///
/// Parsing never fails: the underlying HTML5 parser recovers from any markup.
pub struct HtmlDocument {
    html: Html,
    /// Wrapper elements the parser synthesized; queries for them match nothing.
    implied: Vec<&'static str>,
}

impl HtmlDocument {
    /// Parses HTML from a string.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html), implied: implied_elements(html) }
    }

    /// Parses HTML from raw bytes.
    ///
    /// The encoding is taken from a byte order mark, then a `<meta>` charset
    /// declaration near the start of the document, then `charset` (usually
    /// from an HTTP `Content-Type` header), falling back to UTF-8.
    pub fn parse_bytes(bytes: &[u8], charset: Option<&str>) -> Self {
        Self::parse(&decode(bytes, charset))
    }

    /// Finds every element matching `query`, in document order.
    ///
    /// An empty tag never matches.
    pub fn find(&self, query: &HtmlQuery) -> Vec<HtmlMatch<'_>> {
        if query.tag.is_empty() || self.implied.iter().any(|name| *name == query.tag) {
            return Vec::new();
        }

        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches_element(el, query))
            .map(|element| HtmlMatch { element })
            .collect()
    }
}

/// Decodes HTML bytes to text.
///
/// Malformed sequences are replaced with U+FFFD rather than rejected.
fn decode(bytes: &[u8], charset: Option<&str>) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!(encoding = encoding.name(), "decoding html from byte order mark");
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    let encoding = sniff_meta_charset(bytes)
        .or_else(|| charset.and_then(|label| Encoding::for_label(label.trim().as_bytes())))
        .unwrap_or(UTF_8);
    debug!(encoding = encoding.name(), "decoding html");

    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Looks for `<meta charset=..>` or `<meta http-equiv=.. content="..; charset=..">`.
fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let end = tag.find('>').unwrap_or(tag.len());
        if let Some(label) = charset_label(&tag[..end])
            && let Some(encoding) = Encoding::for_label(label.as_bytes())
        {
            // A document that could be read as ASCII cannot really be UTF-16.
            return Some(encoding.output_encoding());
        }
        rest = &tag[end..];
    }

    None
}

/// Extracts the value of a `charset=` parameter, lowercased and unquoted.
pub(crate) fn charset_label(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let (_, rest) = lower.split_once("charset")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();

    let label: String = rest
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| !matches!(c, '"' | '\'' | ';' | '>' | '/') && !c.is_whitespace())
        .collect();

    (!label.is_empty()).then_some(label)
}

fn implied_elements(source: &str) -> Vec<&'static str> {
    let lower = source.to_ascii_lowercase();
    IMPLIED_ELEMENTS.into_iter().filter(|name| !has_start_tag(&lower, name)).collect()
}

fn has_start_tag(lower: &str, name: &str) -> bool {
    let needle = format!("<{}", name);
    lower.match_indices(&needle).any(|(i, _)| match lower.as_bytes().get(i + needle.len()) {
        None => true,
        Some(b) => *b == b'>' || *b == b'/' || b.is_ascii_whitespace(),
    })
}

fn matches_element(element: &ElementRef<'_>, query: &HtmlQuery) -> bool {
    let value = element.value();
    if value.name() != query.tag {
        return false;
    }

    let attributes_match = query
        .attributes
        .iter()
        .all(|(name, expected)| value.attr(name) == Some(expected.as_str()));
    if !attributes_match {
        return false;
    }

    query.classes.is_empty() || query.classes.iter().all(|class| value.classes().any(|c| c == class))
}

/// A matched element, borrowed from its [`HtmlDocument`].
#[derive(Clone, Debug)]
pub struct HtmlMatch<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlMatch<'a> {
    /// Gets the tag name of this element (lowercase, as normalized by the parser).
    pub fn tag_name(&self) -> &'a str {
        self.element.value().name()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// All attributes as `(name, value)` pairs, in source order.
    pub fn attrs(&self) -> Vec<(&'a str, &'a str)> {
        self.element.value().attrs().collect()
    }

    /// Class tokens of this element.
    pub fn classes(&self) -> Vec<&'a str> {
        self.element.value().classes().collect()
    }

    /// Text content with every text node trimmed and joined without separators.
    pub fn text(&self) -> String {
        self.element.text().map(str::trim).filter(|t| !t.is_empty()).collect()
    }
}
