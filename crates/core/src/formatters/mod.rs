//! Rendering of match lists as human-readable text.
//!
//! All three formatters share one layout:
//!
//! ```text
//! Found 2 elements
//!
//! --- Element 1 ---
//! ...
//!
//! --- Element 2 ---
//! ...
//!
//! ```
//!
//! An empty match list renders [`NO_MATCHES`] instead.

pub mod html;
pub mod json;
pub mod report;
pub mod xml;

pub use html::format_html;
pub use json::format_json;
pub use report::{ElementRecord, MatchRecord, Report};
pub use xml::format_xml;

/// Sentinel rendered when a query matched nothing.
pub const NO_MATCHES: &str = "No elements found\n";

/// Default number of characters of element text shown before truncating.
pub const DEFAULT_TEXT_LIMIT: usize = 200;

/// Configuration shared by the result formatters.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Element text longer than this many characters is cut and suffixed with `...`.
    pub text_limit: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self { text_limit: DEFAULT_TEXT_LIMIT }
    }
}

/// Starts a report with the `Found N elements` header; `None` when nothing matched.
fn start_report(count: usize) -> Option<String> {
    if count == 0 {
        return None;
    }

    Some(format!("Found {} elements\n\n", count))
}

fn push_block_header(output: &mut String, index: usize) {
    output.push_str(&format!("--- Element {} ---\n", index));
}

fn push_attributes<N: AsRef<str>>(output: &mut String, attrs: &[(N, &str)]) {
    if attrs.is_empty() {
        return;
    }

    output.push_str("Attributes:\n");
    for (name, value) in attrs {
        output.push_str(&format!("  {}: {}\n", name.as_ref(), value));
    }
}

/// Cuts `text` to `limit` characters and appends `...` when it was longer.
pub fn truncate_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
