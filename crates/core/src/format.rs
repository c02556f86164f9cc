//! The closed set of document formats the engine understands.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

/// Document format; selects the query parser, matcher and formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Markup with attributes, parsed tolerantly.
    Html,
    /// Hierarchical markup, parsed strictly.
    Xml,
    /// Structured records.
    Json,
}

impl Format {
    /// All formats in display order.
    pub const ALL: [Format; 3] = [Format::Html, Format::Xml, Format::Json];

    /// Infers the format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" | "xhtml" => Some(Self::Html),
            "xml" | "rss" | "atom" => Some(Self::Xml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infers the format from the extension of a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }

    /// One-line query examples for this format.
    pub fn query_hint(&self) -> &'static str {
        match self {
            Self::Html => "Examples: a, div.header, p.text, div.id=main",
            Self::Xml => "Examples: item, book/title, //item, //div[@class='header']",
            Self::Json => "Examples: users, name, *",
        }
    }

    /// Longer usage examples with a short explanation per query.
    pub fn examples(&self) -> &'static str {
        match self {
            Self::Html => {
                "HTML examples:\n\
                 \x20 a              - every link\n\
                 \x20 div.header     - div elements with class header\n\
                 \x20 p.text         - paragraphs with class text\n\
                 \x20 div.id=main    - div elements with id=main\n\
                 \x20 img.avatar     - images with class avatar\n"
            }
            Self::Xml => {
                "XML examples:\n\
                 \x20 item                     - every item element\n\
                 \x20 book/title               - title elements directly inside book\n\
                 \x20 //item                   - every item element\n\
                 \x20 //div[@class='header']   - div elements with class='header'\n"
            }
            Self::Json => {
                "JSON examples:\n\
                 \x20 users   - every key named 'users' at any depth\n\
                 \x20 name    - every key named 'name' at any depth\n\
                 \x20 *       - every key at any depth\n"
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => f.write_str("html"),
            Self::Xml => f.write_str("xml"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, xml, json", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("HTML".parse::<Format>(), Ok(Format::Html));
        assert_eq!("xml".parse::<Format>(), Ok(Format::Xml));
        assert_eq!(" json ".parse::<Format>(), Ok(Format::Json));
        assert!("yaml".parse::<Format>().is_err());
    }

    #[test]
    fn test_display_round_trips_names() {
        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>(), Ok(format));
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Format::from_path(Path::new("feed.XML")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("index.htm")), Some(Format::Html));
        assert_eq!(Format::from_path(Path::new("data/users.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_examples_mention_hint_queries() {
        assert!(Format::Html.examples().contains("div.header"));
        assert!(Format::Xml.examples().contains("//item"));
        assert!(Format::Json.examples().contains("users"));
    }
}
