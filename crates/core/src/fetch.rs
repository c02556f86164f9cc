//! Document retrieval from URLs, files, and stdin.
//!
//! Sources hand the engine a [`Content`]: raw bytes for HTML (so the HTML
//! parser can pick the encoding itself, helped by any charset the server
//! declared) and decoded text for everything else. Retrieval is blocking and
//! never retried.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::blocking::Client;
#[cfg(feature = "fetch")]
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

#[cfg(feature = "fetch")]
use crate::html::charset_label;
use crate::{Format, QuarryError, Result};

/// HTTP client configuration for fetching documents.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("Mozilla/5.0 (compatible; Quarry/{})", env!("CARGO_PKG_VERSION")) }
    }
}

/// Raw document content as handed to the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Undecoded bytes, with the charset label the transport declared, if any.
    Bytes { data: Vec<u8>, charset: Option<String> },
    /// Decoded text.
    Text(String),
}

impl Content {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Content::Bytes { data, .. } => data,
            Content::Text(text) => text.as_bytes(),
        }
    }

    /// The declared charset label of byte content.
    pub fn charset(&self) -> Option<&str> {
        match self {
            Content::Bytes { charset, .. } => charset.as_deref(),
            Content::Text(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the content is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        match self {
            Content::Bytes { data, .. } => data.iter().all(u8::is_ascii_whitespace),
            Content::Text(text) => text.trim().is_empty(),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Content {
    fn from(data: Vec<u8>) -> Self {
        Content::Bytes { data, charset: None }
    }
}

impl From<&[u8]> for Content {
    fn from(data: &[u8]) -> Self {
        Content::Bytes { data: data.to_vec(), charset: None }
    }
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// `http://` or `https://` URL.
    Url(String),
    /// Local file.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

impl Source {
    /// Interprets a user-supplied input: `-` is stdin, `http(s)://` a URL, anything else a path.
    pub fn from_input(input: &str) -> Self {
        let input = input.trim();
        if input == "-" {
            Source::Stdin
        } else if input.starts_with("http://") || input.starts_with("https://") {
            Source::Url(input.to_string())
        } else {
            Source::File(PathBuf::from(input))
        }
    }

    /// Guesses the document format from the file or URL path extension.
    pub fn infer_format(&self) -> Option<Format> {
        match self {
            Source::File(path) => Format::from_path(path),
            Source::Url(url) => Url::parse(url).ok().and_then(|u| Format::from_path(Path::new(u.path()))),
            Source::Stdin => None,
        }
    }

    /// Retrieves the document.
    ///
    /// # Errors
    ///
    /// Fails when the source is unreachable, missing, unreadable, or blank.
    pub fn fetch(&self, format: Format, config: &FetchConfig) -> Result<Content> {
        let content = match self {
            #[cfg(feature = "fetch")]
            Source::Url(url) => fetch_url(url, format, config)?,
            #[cfg(not(feature = "fetch"))]
            Source::Url(url) => {
                let _ = (format, config);
                return Err(QuarryError::InvalidUrl(format!("network fetching is disabled: {}", url)));
            }
            Source::File(path) if format == Format::Html => Content::from(fetch_file_bytes(path)?),
            Source::File(path) => Content::Text(fetch_file(path)?),
            Source::Stdin if format == Format::Html => Content::from(fetch_stdin_bytes()?),
            Source::Stdin => Content::Text(fetch_stdin()?),
        };

        if content.is_blank() {
            return Err(QuarryError::EmptyDocument(self.to_string()));
        }

        debug!(source = %self, bytes = content.len(), "fetched document");
        Ok(content)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// `Accept` header advertising the expected document format.
#[cfg(feature = "fetch")]
fn accept_header(format: Format) -> &'static str {
    match format {
        Format::Html => "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        Format::Xml => "application/xml,text/xml;q=0.9,*/*;q=0.8",
        Format::Json => "application/json,*/*;q=0.8",
    }
}

/// Fetches a document from a URL.
///
/// Performs a blocking HTTP GET, follows redirects, and treats non-success
/// statuses as errors. HTML comes back as raw bytes tagged with the charset
/// from the `Content-Type` header, XML and JSON as text.
#[cfg(feature = "fetch")]
pub fn fetch_url(url: &str, format: Format, config: &FetchConfig) -> Result<Content> {
    let parsed_url = Url::parse(url).map_err(|e| QuarryError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(QuarryError::InvalidUrl(
            "URL must use the http:// or https:// scheme".to_string(),
        ));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(QuarryError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", accept_header(format))
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                QuarryError::Timeout { timeout: config.timeout }
            } else {
                QuarryError::HttpError(e)
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(QuarryError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    let content = match format {
        Format::Html => {
            let charset = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .and_then(charset_label);
            debug!(url, ?charset, "received html");
            Content::Bytes { data: response.bytes()?.to_vec(), charset }
        }
        Format::Xml | Format::Json => Content::Text(response.text()?),
    };

    Ok(content)
}

/// Reads a document from a local file as UTF-8 text.
pub fn fetch_file(path: &Path) -> Result<String> {
    if !path.exists() {
        Err(QuarryError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read_to_string(path).map_err(QuarryError::from)
    }
}

/// Reads a document from a local file without decoding it.
pub fn fetch_file_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        Err(QuarryError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read(path).map_err(QuarryError::from)
    }
}

/// Reads a document from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(QuarryError::from)?;

    Ok(buffer)
}

/// Reads standard input until EOF without decoding it.
pub fn fetch_stdin_bytes() -> Result<Vec<u8>> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).map_err(QuarryError::from)?;

    Ok(buffer)
}
