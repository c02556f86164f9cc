//! Recursive key matching over JSON documents.
//!
//! Every key of every nested object is a candidate; the top-level value is
//! never a match itself. Object keys keep their document order because
//! `serde_json` is built with `preserve_order`.

use serde::Serialize;
use serde_json::Value;

use crate::Result;
use crate::query::JsonQuery;

/// A matched `(key, value)` pair. The value is an owned copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonMatch {
    pub key: String,
    pub value: Value,
}

impl JsonMatch {
    /// Name of the value's type: `object`, `array`, `string`, `integer`,
    /// `float`, `boolean` or `null`.
    pub fn type_name(&self) -> &'static str {
        type_name(&self.value)
    }
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        // Integers wider than 64 bits keep their digits (`arbitrary_precision`).
        Value::Number(n) if !n.to_string().contains(['.', 'e', 'E']) => "integer",
        Value::Number(_) => "float",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

/// Decodes a JSON document from text.
pub fn parse(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Decodes a JSON document from bytes.
pub fn parse_bytes(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Depth-first search for keys matching `query`.
pub fn find(document: &Value, query: &JsonQuery) -> Vec<JsonMatch> {
    let mut matches = Vec::new();
    collect(document, query, &mut matches);
    matches
}

fn collect(value: &Value, query: &JsonQuery, out: &mut Vec<JsonMatch>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if query.matches_key(key) {
                    out.push(JsonMatch { key: key.clone(), value: child.clone() });
                }
                if is_container(child) {
                    collect(child, query, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter().filter(|item| is_container(item)) {
                collect(item, query, out);
            }
        }
        _ => {}
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}
