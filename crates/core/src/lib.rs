//! Query HTML, XML and JSON documents with a small per-format query syntax
//! and render the matches as readable text.
//!
//! ```rust
//! use quarry_core::{Content, Format, extract};
//!
//! let xml = Content::from(r#"<shelf><book lang="en">Dune</book></shelf>"#);
//! let report = extract(&xml, Format::Xml, "//book[@lang='en']").unwrap();
//! assert!(report.starts_with("Found 1 elements"));
//! ```

pub mod error;
pub mod fetch;
pub mod format;
pub mod formatters;
pub mod html;
pub mod json;
pub mod query;
pub mod service;
pub mod xml;

pub use error::{ErrorKind, QuarryError, Result};
pub use fetch::{Content, FetchConfig, Source};
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{fetch_file, fetch_file_bytes, fetch_stdin, fetch_stdin_bytes};
pub use format::Format;
pub use formatters::{
    ElementRecord, FormatterConfig, MatchRecord, NO_MATCHES, Report, format_html, format_json, format_xml,
};
pub use html::{HtmlDocument, HtmlMatch};
pub use json::JsonMatch;
pub use query::{HtmlQuery, JsonQuery, PathPredicate, QuerySpec, XmlQuery};
pub use service::{
    EMPTY_QUERY_MESSAGE, ExtractionConfig, ExtractionConfigBuilder, ExtractionService, extract, extract_source,
};
pub use xml::{XmlDocument, XmlMatch};
