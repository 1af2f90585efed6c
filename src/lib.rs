//! Provenance RDF
//!
//! An embeddable RDF statement store for image provenance metadata: who
//! created an image or layer, where it was sourced from and under which
//! license it may be used.
//!
//! # Architecture
//!
//! - [`rdf`]: nodes, statements, the indexed in-memory [`Model`], the
//!   namespace registry and the RDF/XML codec (including XMP packets)
//! - [`sparql`]: a SELECT-only SPARQL subset evaluated lazily against a model
//! - [`attribution`]: the attribution graph of an image or layer, with
//!   load/save/combine, attribution checks, metadata tag export and a
//!   display tree
//!
//! ## Example Usage
//!
//! ```rust
//! use provenance_rdf::Attribution;
//!
//! let rdf_xml = r#"<rdf:RDF
//!     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
//!     xmlns:dc="http://purl.org/dc/elements/1.1/">
//!   <rdf:Description rdf:about="">
//!     <dc:creator>Alice</dc:creator>
//!   </rdf:Description>
//! </rdf:RDF>"#;
//!
//! let mut attribution = Attribution::new();
//! attribution.load_from_str(rdf_xml).unwrap();
//!
//! assert!(attribution.has_attribution());
//! assert_eq!(
//!     attribution.property_value("http://purl.org/dc/elements/1.1/creator"),
//!     Some("Alice")
//! );
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod attribution;
pub mod rdf;
pub mod sparql;

// Re-export main types for convenience
pub use rdf::{
    BlankNode, Literal, Model, NamedNode, Node, PartialStatement, RdfError, RdfResult, Statement,
    Statements, Subject, Vocab,
};

pub use rdf::serialization::{
    ParseError, ParseResult, RdfXmlParser, RdfXmlSerializer, SerializeError, SerializeResult,
    SerializerConfig,
};

pub use sparql::{
    PreparedQuery, QueryEngine, QuerySolution, QuerySolutions, SparqlError, SparqlResult,
    SparqlResults,
};

pub use attribution::{
    Attribution, AttributionError, AttributionResult, AttributionTree, MemoryTagStore, TagStore,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
