use serde::Serialize;
use serde_json::{Map, Value};

use crate::html::HtmlMatch;
use crate::json::JsonMatch;
use crate::xml::XmlMatch;
use crate::{Format, QuarryError, Result};

/// Machine-readable result of one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Format the document was parsed as
    pub format: Format,
    /// The query, trimmed
    pub query: String,
    /// Number of matches
    pub count: usize,
    /// Matches in document order
    pub matches: Vec<MatchRecord>,
}

/// One match: an HTML/XML element or a JSON key/value pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchRecord {
    Element(ElementRecord),
    Entry(JsonMatch),
}

/// Owned snapshot of a matched HTML or XML element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRecord {
    pub tag: String,
    /// Full element text; never truncated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Attributes in document order
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl Report {
    pub fn new(format: Format, query: &str, matches: Vec<MatchRecord>) -> Self {
        Self { format, query: query.to_string(), count: matches.len(), matches }
    }

    /// Serializes the report as indented JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| QuarryError::ReportError(e.to_string()))
    }
}

fn attribute_map<'a, N: AsRef<str>>(attrs: impl IntoIterator<Item = (N, &'a str)>) -> Map<String, Value> {
    attrs
        .into_iter()
        .map(|(name, value)| (name.as_ref().to_string(), Value::String(value.to_string())))
        .collect()
}

impl From<&HtmlMatch<'_>> for MatchRecord {
    fn from(element: &HtmlMatch<'_>) -> Self {
        let text = element.text();
        MatchRecord::Element(ElementRecord {
            tag: element.tag_name().to_string(),
            text: (!text.is_empty()).then_some(text),
            attributes: attribute_map(element.attrs()),
        })
    }
}

impl From<&XmlMatch<'_>> for MatchRecord {
    fn from(element: &XmlMatch<'_>) -> Self {
        MatchRecord::Element(ElementRecord {
            tag: element.tag(),
            text: element.text(),
            attributes: attribute_map(element.attrs()),
        })
    }
}

impl From<JsonMatch> for MatchRecord {
    fn from(entry: JsonMatch) -> Self {
        MatchRecord::Entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlDocument;
    use crate::query::{HtmlQuery, XmlQuery};
    use crate::xml::XmlDocument;
    use serde_json::json;

    #[test]
    fn test_html_report_json() {
        let doc = HtmlDocument::parse(r#"<a title="Docs" href="/docs">Read <b>more</b></a><a></a>"#);
        let matches = doc.find(&HtmlQuery::parse("a")).iter().map(MatchRecord::from).collect();
        let report = Report::new(Format::Html, "a", matches);

        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "format": "html",
                "query": "a",
                "count": 2,
                "matches": [
                    {"tag": "a", "text": "Readmore", "attributes": {"title": "Docs", "href": "/docs"}},
                    {"tag": "a"}
                ]
            })
        );
    }

    #[test]
    fn test_xml_record_keeps_full_text() {
        let text = "x".repeat(300);
        let doc = XmlDocument::parse(&format!("<root><item id='1'>{}</item></root>", text)).unwrap();
        let records: Vec<MatchRecord> = doc.find(&XmlQuery::parse("item")).iter().map(MatchRecord::from).collect();

        let MatchRecord::Element(record) = &records[0] else {
            panic!("expected an element record");
        };
        assert_eq!(record.tag, "item");
        assert_eq!(record.text.as_deref(), Some(text.as_str()));
        assert_eq!(record.attributes.get("id"), Some(&json!("1")));
    }

    #[test]
    fn test_json_entries_serialize_as_key_value() {
        let entry = JsonMatch { key: "id".into(), value: json!(7) };
        let report = Report::new(Format::Json, "id", vec![entry.into()]);

        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["format"], json!("json"));
        assert_eq!(value["matches"], json!([{"key": "id", "value": 7}]));
    }
}
