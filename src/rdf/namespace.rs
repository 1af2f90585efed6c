//! RDF namespace and prefix management
//!
//! The [`Vocab`] registry shortens URIs to `prefix:local` form for display
//! and expands qnames back. The submodules hold the IRIs the attribution
//! layer works with.

use indexmap::IndexMap;
use thiserror::Error;

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Invalid compact IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Base URI of a standalone image or layer graph
pub const ABOUT_THIS: &str = "about:this";
/// Base URI of a second graph merged into an image graph
pub const ABOUT_THAT: &str = "about:that";

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const SEQ: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Seq";
    pub const BAG: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Bag";
    pub const ALT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Alt";
}

pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
}

pub mod dc {
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";
    pub const CONTRIBUTOR: &str = "http://purl.org/dc/elements/1.1/contributor";
    pub const COVERAGE: &str = "http://purl.org/dc/elements/1.1/coverage";
    pub const CREATOR: &str = "http://purl.org/dc/elements/1.1/creator";
    pub const DATE: &str = "http://purl.org/dc/elements/1.1/date";
    pub const DESCRIPTION: &str = "http://purl.org/dc/elements/1.1/description";
    pub const FORMAT: &str = "http://purl.org/dc/elements/1.1/format";
    pub const IDENTIFIER: &str = "http://purl.org/dc/elements/1.1/identifier";
    pub const LANGUAGE: &str = "http://purl.org/dc/elements/1.1/language";
    pub const PUBLISHER: &str = "http://purl.org/dc/elements/1.1/publisher";
    pub const RELATION: &str = "http://purl.org/dc/elements/1.1/relation";
    pub const SOURCE: &str = "http://purl.org/dc/elements/1.1/source";
    pub const SUBJECT: &str = "http://purl.org/dc/elements/1.1/subject";
    pub const TITLE: &str = "http://purl.org/dc/elements/1.1/title";
    pub const TYPE: &str = "http://purl.org/dc/elements/1.1/type";
}

pub mod dcterms {
    pub const NS: &str = "http://purl.org/dc/terms/";
    pub const CONTRIBUTOR: &str = "http://purl.org/dc/terms/contributor";
    pub const COVERAGE: &str = "http://purl.org/dc/terms/coverage";
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const DATE: &str = "http://purl.org/dc/terms/date";
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const FORMAT: &str = "http://purl.org/dc/terms/format";
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
    pub const LANGUAGE: &str = "http://purl.org/dc/terms/language";
    pub const LICENSE: &str = "http://purl.org/dc/terms/license";
    pub const PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
    pub const RELATION: &str = "http://purl.org/dc/terms/relation";
    pub const SOURCE: &str = "http://purl.org/dc/terms/source";
    pub const SUBJECT: &str = "http://purl.org/dc/terms/subject";
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const TYPE: &str = "http://purl.org/dc/terms/type";
}

pub mod cc {
    pub const NS: &str = "http://creativecommons.org/ns#";
    pub const LICENSE: &str = "http://creativecommons.org/ns#license";
}

pub mod xhv {
    pub const NS: &str = "http://www.w3.org/1999/xhtml/vocab#";
    pub const LICENSE: &str = "http://www.w3.org/1999/xhtml/vocab#license";
}

pub mod og {
    pub const NS: &str = "http://ogp.me/ns#";
}

/// Namespace (prefix → IRI mapping)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Prefix
    pub prefix: String,
    /// IRI
    pub iri: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }
}

/// Namespace registry with the attribution vocabularies
#[derive(Debug, Clone)]
pub struct Vocab {
    /// Prefix → IRI mappings, in registration order
    prefixes: IndexMap<String, String>,
}

impl Vocab {
    /// Create a registry holding `dc`, `dcterms`, `cc`, `xhv` and `og`
    pub fn new() -> Self {
        let mut vocab = Self::empty();

        vocab.add_prefix("dc", dc::NS);
        vocab.add_prefix("dcterms", dcterms::NS);
        vocab.add_prefix("cc", cc::NS);
        vocab.add_prefix("xhv", xhv::NS);
        vocab.add_prefix("og", og::NS);

        vocab
    }

    /// Create a registry without any prefixes
    pub fn empty() -> Self {
        Self {
            prefixes: IndexMap::new(),
        }
    }

    /// Add a prefix, replacing an existing mapping for the same prefix
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        if let Some((prefix, local)) = compact_iri.split_once(':') {
            let iri = self.get_iri(prefix)?;
            Ok(format!("{}{}", iri, local))
        } else {
            Err(PrefixError::InvalidIri(compact_iri.to_string()))
        }
    }

    /// Shorten a URI to `prefix:local` using the longest matching namespace.
    ///
    /// Returns the input unchanged when no namespace matches or the local
    /// part would be empty.
    pub fn shorten(&self, uri: &str) -> String {
        self.prefixes
            .iter()
            .filter(|(_, namespace)| uri.len() > namespace.len() && uri.starts_with(namespace.as_str()))
            .max_by_key(|(_, namespace)| namespace.len())
            .map(|(prefix, namespace)| format!("{}:{}", prefix, &uri[namespace.len()..]))
            .unwrap_or_else(|| uri.to_string())
    }

    /// Get all registered namespaces in registration order
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| Namespace::new(prefix.clone(), iri.clone()))
            .collect()
    }

    /// Prefix table in registration order
    pub fn prefix_map(&self) -> &IndexMap<String, String> {
        &self.prefixes
    }
}

impl Default for Vocab {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_prefixes() {
        let vocab = Vocab::new();

        assert_eq!(vocab.get_iri("dc").unwrap(), "http://purl.org/dc/elements/1.1/");
        assert_eq!(vocab.get_iri("cc").unwrap(), "http://creativecommons.org/ns#");
        assert!(vocab.get_iri("foaf").is_err());

        let prefixes: Vec<_> = vocab.namespaces().into_iter().map(|ns| ns.prefix).collect();
        assert_eq!(prefixes, vec!["dc", "dcterms", "cc", "xhv", "og"]);
    }

    #[test]
    fn test_shorten() {
        let vocab = Vocab::new();

        assert_eq!(vocab.shorten("http://purl.org/dc/elements/1.1/creator"), "dc:creator");
        assert_eq!(vocab.shorten("http://purl.org/dc/terms/license"), "dcterms:license");
        assert_eq!(vocab.shorten("http://www.w3.org/1999/xhtml/vocab#license"), "xhv:license");
        assert_eq!(vocab.shorten("http://example.com/x"), "http://example.com/x");
    }

    #[test]
    fn test_shorten_never_fails() {
        let vocab = Vocab::new();

        assert_eq!(vocab.shorten(""), "");
        assert_eq!(vocab.shorten("::not a uri::"), "::not a uri::");
        assert_eq!(vocab.shorten("http://purl.org/dc/terms/"), "http://purl.org/dc/terms/");
    }

    #[test]
    fn test_shorten_prefers_longest_namespace() {
        let mut vocab = Vocab::new();
        vocab.add_prefix("purl", "http://purl.org/");

        assert_eq!(vocab.shorten("http://purl.org/dc/terms/title"), "dcterms:title");
        assert_eq!(vocab.shorten("http://purl.org/other"), "purl:other");
    }

    #[test]
    fn test_expand() {
        let vocab = Vocab::new();

        assert_eq!(vocab.expand("dc:source").unwrap(), dc::SOURCE);
        assert!(matches!(vocab.expand("ex:thing"), Err(PrefixError::UnknownPrefix(_))));
        assert!(matches!(vocab.expand("nocolon"), Err(PrefixError::InvalidIri(_))));
    }
}
