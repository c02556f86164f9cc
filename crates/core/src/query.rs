//! Query mini-languages for each document format.
//!
//! Parsing is total: any input string yields a query. Malformed input becomes
//! a query that simply matches nothing, so there is no error path here.
//!
//! | Format | Syntax                                   | Example                    |
//! |--------|------------------------------------------|----------------------------|
//! | HTML   | `tag(.class)*(.attr=value)*`             | `div.card.id=main`         |
//! | XML    | `tag`, `a/b`, `//tag`, `//tag[@a='v']`   | `//book[@lang='en']`       |
//! | JSON   | key name or `*`                          | `name`                     |

use std::collections::HashMap;

use crate::Format;

/// Structured query for one of the supported formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpec {
    Html(HtmlQuery),
    Xml(XmlQuery),
    Json(JsonQuery),
}

impl QuerySpec {
    /// Parses `raw` according to the rules of `format`.
    pub fn parse(raw: &str, format: Format) -> Self {
        match format {
            Format::Html => QuerySpec::Html(HtmlQuery::parse(raw)),
            Format::Xml => QuerySpec::Xml(XmlQuery::parse(raw)),
            Format::Json => QuerySpec::Json(JsonQuery::parse(raw)),
        }
    }
}

/// Tag name plus class and attribute filters, e.g. `div.card.id=main`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlQuery {
    pub tag: String,
    /// Class tokens in the order given; duplicates kept.
    pub classes: Vec<String>,
    /// Attributes that must be present with exactly this value.
    pub attributes: HashMap<String, String>,
}

impl HtmlQuery {
    pub fn parse(raw: &str) -> Self {
        let mut segments = raw.split('.');
        let tag = segments.next().unwrap_or_default().trim().to_string();

        let mut query = HtmlQuery { tag, ..Default::default() };
        for segment in segments {
            match segment.split_once('=') {
                Some((name, value)) => {
                    query.attributes.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => query.classes.push(segment.trim().to_string()),
            }
        }

        query
    }
}

/// Attribute test inside a `//tag[...]` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPredicate {
    /// No brackets: tag equality alone decides.
    Any,
    /// `[@name='value']`
    Attribute { name: String, value: String },
    /// Brackets without an `@name=value` test, e.g. positional `[1]`. Never matches.
    Unsupported(String),
}

/// XML query: plain tag search or `//` descendant path with an optional predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlQuery {
    /// Tag name searched at any depth. May contain `/` separated child steps.
    SimpleTag { tag: String },
    /// `//tag` or `//tag[@attr='value']`.
    DescendantPath { tag: String, predicate: PathPredicate },
}

impl XmlQuery {
    pub fn parse(raw: &str) -> Self {
        let Some(path) = raw.strip_prefix("//") else {
            return XmlQuery::SimpleTag { tag: raw.to_string() };
        };

        if !(path.contains('[') && path.contains(']')) {
            return XmlQuery::DescendantPath { tag: path.to_string(), predicate: PathPredicate::Any };
        }

        let (tag, rest) = path.split_once('[').unwrap_or((path, ""));
        let inner = rest.split(['[', ']']).next().unwrap_or_default();

        XmlQuery::DescendantPath { tag: tag.trim().to_string(), predicate: parse_predicate(inner) }
    }
}

fn parse_predicate(inner: &str) -> PathPredicate {
    if !inner.contains('@') {
        return PathPredicate::Unsupported(inner.to_string());
    }

    match inner.split_once('=') {
        Some((name, value)) => PathPredicate::Attribute {
            name: name.replace('@', "").trim().to_string(),
            value: value.trim().trim_matches(['\'', '"']).to_string(),
        },
        None => PathPredicate::Unsupported(inner.to_string()),
    }
}

/// A single key name, or `*` for every key. Dots have no special meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonQuery {
    pub path: String,
}

impl JsonQuery {
    pub const WILDCARD: &'static str = "*";

    pub fn parse(raw: &str) -> Self {
        JsonQuery { path: raw.to_string() }
    }

    pub fn matches_key(&self, key: &str) -> bool {
        self.path == Self::WILDCARD || self.path == key
    }
}
