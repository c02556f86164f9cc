//! Main extraction API.
//!
//! This module provides the single entry point presentation code calls:
//! [`ExtractionService`], along with the convenience functions [`extract`]
//! and [`extract_source`].
//!
//! # Example
//!
//! ```rust
//! use quarry_core::{Content, ExtractionService, Format};
//!
//! let service = ExtractionService::new();
//! let report = service.run(&Content::from(r#"{"id": 1}"#), Format::Json, "id").unwrap();
//! assert!(report.contains("Key: id"));
//! ```

use tracing::debug;

use crate::fetch::{Content, FetchConfig, Source};
use crate::formatters::{FormatterConfig, MatchRecord, Report, format_html, format_json, format_xml};
use crate::html::HtmlDocument;
use crate::query::QuerySpec;
use crate::xml::XmlDocument;
use crate::{Format, Result, json};

/// Message returned instead of a report when the query is blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Enter a query to search";

/// Configuration for an [`ExtractionService`].
///
/// # Example
///
/// ```rust
/// use quarry_core::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .text_limit(80)
///     .timeout(10)
///     .build();
/// assert_eq!(config.formatter.text_limit, 80);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    /// Settings for network retrieval.
    pub fetch: FetchConfig,
    /// Settings for result rendering.
    pub formatter: FormatterConfig,
}

impl ExtractionConfig {
    /// Creates a new config builder.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder::new()
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ExtractionConfig::default() }
    }

    /// Sets how many characters of element text are shown before truncating.
    pub fn text_limit(mut self, value: usize) -> Self {
        self.config.formatter.text_limit = value;
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the HTTP User-Agent.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> ExtractionConfig {
        self.config
    }
}

impl Default for ExtractionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs query parsing, matching and formatting for one document.
///
/// The service holds only immutable configuration; every call parses its own
/// document and drops it when the report is built, so repeated calls with the
/// same input produce the same output.
#[derive(Debug, Clone, Default)]
pub struct ExtractionService {
    config: ExtractionConfig,
}

impl ExtractionService {
    /// Creates a service with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service with custom configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Queries `content` and renders the matches.
    ///
    /// A blank query short-circuits to [`EMPTY_QUERY_MESSAGE`] without
    /// parsing the document. Zero matches is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when an XML or JSON document cannot be parsed.
    pub fn run(&self, content: &Content, format: Format, raw_query: &str) -> Result<String> {
        let raw_query = raw_query.trim();
        if raw_query.is_empty() {
            return Ok(EMPTY_QUERY_MESSAGE.to_string());
        }

        let spec = QuerySpec::parse(raw_query, format);
        debug!(%format, query = raw_query, ?spec, "parsed query");

        let formatter = &self.config.formatter;
        let report = match spec {
            QuerySpec::Html(query) => {
                let doc = html_document(content);
                let matches = doc.find(&query);
                debug!(matches = matches.len(), "html query finished");
                format_html(&matches, formatter)
            }
            QuerySpec::Xml(query) => {
                let doc = xml_document(content)?;
                let matches = doc.find(&query);
                debug!(matches = matches.len(), "xml query finished");
                format_xml(&matches, formatter)
            }
            QuerySpec::Json(query) => {
                let matches = json::find(&json_document(content)?, &query);
                debug!(matches = matches.len(), "json query finished");
                format_json(&matches)
            }
        };

        Ok(report)
    }

    /// Queries `content` and collects the matches into a [`Report`].
    ///
    /// Returns `Ok(None)` for a blank query. Element text is kept whole;
    /// the text limit only applies to [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns an error when an XML or JSON document cannot be parsed.
    pub fn report(&self, content: &Content, format: Format, raw_query: &str) -> Result<Option<Report>> {
        let raw_query = raw_query.trim();
        if raw_query.is_empty() {
            return Ok(None);
        }

        let records: Vec<MatchRecord> = match QuerySpec::parse(raw_query, format) {
            QuerySpec::Html(query) => html_document(content).find(&query).iter().map(MatchRecord::from).collect(),
            QuerySpec::Xml(query) => xml_document(content)?.find(&query).iter().map(MatchRecord::from).collect(),
            QuerySpec::Json(query) => {
                json::find(&json_document(content)?, &query).into_iter().map(MatchRecord::from).collect()
            }
        };
        debug!(%format, query = raw_query, matches = records.len(), "built report");

        Ok(Some(Report::new(format, raw_query, records)))
    }

    /// Fetches the document from `source`, then behaves like [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Propagates retrieval errors as well as document parse errors.
    pub fn run_source(&self, source: &Source, format: Format, raw_query: &str) -> Result<String> {
        let content = source.fetch(format, &self.config.fetch)?;
        self.run(&content, format, raw_query)
    }

    /// Fetches the document from `source`, then behaves like [`report`](Self::report).
    ///
    /// # Errors
    ///
    /// Propagates retrieval errors as well as document parse errors.
    pub fn report_source(&self, source: &Source, format: Format, raw_query: &str) -> Result<Option<Report>> {
        let content = source.fetch(format, &self.config.fetch)?;
        self.report(&content, format, raw_query)
    }

    /// Like [`run`](Self::run), but never fails: errors become `Error: <message>`.
    pub fn render(&self, content: &Content, format: Format, raw_query: &str) -> String {
        self.run(content, format, raw_query).unwrap_or_else(|e| format!("Error: {}", e))
    }

    /// Like [`run_source`](Self::run_source), but never fails.
    pub fn render_source(&self, source: &Source, format: Format, raw_query: &str) -> String {
        self.run_source(source, format, raw_query)
            .unwrap_or_else(|e| format!("Error: {}", e))
    }
}

fn html_document(content: &Content) -> HtmlDocument {
    match content {
        Content::Bytes { data, .. } => HtmlDocument::parse_bytes(data, content.charset()),
        Content::Text(text) => HtmlDocument::parse(text),
    }
}

fn xml_document(content: &Content) -> Result<XmlDocument> {
    match content {
        Content::Bytes { data, .. } => XmlDocument::parse_bytes(data),
        Content::Text(text) => XmlDocument::parse(text),
    }
}

fn json_document(content: &Content) -> Result<serde_json::Value> {
    match content {
        Content::Bytes { data, .. } => json::parse_bytes(data),
        Content::Text(text) => json::parse(text),
    }
}

/// Queries `content` with the default configuration.
///
/// This is the simplest way to run a query.
///
/// # Example
///
/// ```rust
/// use quarry_core::{Content, Format, extract};
///
/// let report = extract(&Content::from("<a href='/x'>X</a>"), Format::Html, "a").unwrap();
/// assert!(report.contains("Link: /x"));
/// ```
pub fn extract(content: &Content, format: Format, raw_query: &str) -> Result<String> {
    ExtractionService::new().run(content, format, raw_query)
}

/// Fetches and queries a document with the default configuration.
pub fn extract_source(source: &Source, format: Format, raw_query: &str) -> Result<String> {
    ExtractionService::new().run_source(source, format, raw_query)
}
