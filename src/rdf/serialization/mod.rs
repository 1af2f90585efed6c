//! RDF serialization
//!
//! Supports RDF/XML in both directions, plus extraction of the RDF/XML
//! block embedded in an XMP packet.

mod rdfxml;
mod xmp;

pub use rdfxml::{RdfXmlParser, RdfXmlSerializer};
pub use xmp::{extract_rdf_block, PacketError, PacketResult};

use super::namespace::{Vocab, ABOUT_THIS};
use super::Model;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RDF/XML
    #[error("RDF/XML error: {0}")]
    Syntax(#[from] rio_xml::RdfXmlError),

    /// Invalid base URI
    #[error("Invalid base URI {0}: {1}")]
    InvalidBase(String, String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Predicate that cannot be written as an XML element name
    #[error("Cannot abbreviate predicate as a qualified name: {0}")]
    UnsplittablePredicate(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF/XML serializer settings
///
/// Loadable from JSON:
///
/// ```json
/// { "base_uri": "about:this", "prefixes": { "dc": "http://purl.org/dc/elements/1.1/" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Base URI that written URIs are made relative to
    #[serde(default = "default_base_uri")]
    pub base_uri: String,

    /// Namespace prefixes declared on `rdf:RDF`, in declaration order
    #[serde(default = "default_prefixes")]
    pub prefixes: IndexMap<String, String>,

    /// Write URIs relative to `base_uri`
    #[serde(default = "default_true")]
    pub relative_uris: bool,

    /// Emit `xml:base` on the root element
    #[serde(default)]
    pub write_base_uri: bool,
}

fn default_base_uri() -> String {
    ABOUT_THIS.to_string()
}

fn default_prefixes() -> IndexMap<String, String> {
    Vocab::new().prefix_map().clone()
}

fn default_true() -> bool {
    true
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            prefixes: default_prefixes(),
            relative_uris: true,
            write_base_uri: false,
        }
    }
}

impl SerializerConfig {
    /// Default settings with a different base URI
    pub fn with_base_uri(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..Self::default()
        }
    }

    /// Load settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Parse RDF/XML text into a fresh model
pub fn parse(text: &str, base_uri: &str) -> ParseResult<Model> {
    RdfXmlParser::new(base_uri).parse(text)
}

/// Parse an RDF/XML file into a fresh model
pub fn parse_file(path: &Path, base_uri: &str) -> ParseResult<Model> {
    let text = std::fs::read_to_string(path)?;
    parse(&text, base_uri)
}

/// Serialize a model as RDF/XML
pub fn serialize(model: &Model, config: &SerializerConfig) -> SerializeResult<String> {
    RdfXmlSerializer::new(config.clone()).serialize(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SerializerConfig::default();
        assert_eq!(config.base_uri, "about:this");
        assert!(config.relative_uris);
        assert!(!config.write_base_uri);

        let prefixes: Vec<_> = config.prefixes.keys().cloned().collect();
        assert_eq!(prefixes, vec!["dc", "dcterms", "cc", "xhv", "og"]);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = SerializerConfig::from_json(r#"{"base_uri": "about:that"}"#).unwrap();
        assert_eq!(config.base_uri, "about:that");
        assert_eq!(config.prefixes.len(), 5);
        assert!(config.relative_uris);

        let config = SerializerConfig::from_json(
            r#"{"prefixes": {"ex": "http://example.org/"}, "write_base_uri": true}"#,
        )
        .unwrap();
        assert_eq!(config.prefixes.len(), 1);
        assert!(config.write_base_uri);
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("/nonexistent/attribution.rdf"), ABOUT_THIS);
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
