//! RDF (Resource Description Framework) support
//!
//! This module implements the statement store behind image provenance data:
//! - RDF nodes and statements (subject-predicate-object)
//! - An in-memory, indexed statement model with pattern lookup
//! - A namespace registry for display and qname expansion
//! - RDF/XML parsing and serialization, including XMP packets
//!
//! # Example
//!
//! ```rust
//! use provenance_rdf::rdf::{Model, NamedNode, PartialStatement, Statement};
//! use provenance_rdf::rdf::namespace::dc;
//!
//! let mut model = Model::new();
//! model.add(Statement::with_literal("about:this", dc::CREATOR, "Alice").unwrap());
//!
//! let creator = NamedNode::new(dc::CREATOR).unwrap();
//! let pattern = PartialStatement::new(None, Some(creator), None);
//! assert_eq!(model.find(&pattern).count(), 1);
//! ```

mod model;
pub mod namespace;
pub mod serialization;
mod types;

pub use types::{
    BlankNode, Literal, NamedNode, Node, PartialStatement, RdfError, RdfResult, Statement,
    Subject,
};

pub use model::{Model, Statements};

pub use namespace::{Namespace, PrefixError, PrefixResult, Vocab, ABOUT_THAT, ABOUT_THIS};

pub use serialization::{
    extract_rdf_block, PacketError, ParseError, ParseResult, RdfXmlParser, RdfXmlSerializer,
    SerializeError, SerializeResult, SerializerConfig,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_module_exports() {
        let _model: Model = Model::new();
        let _vocab = Vocab::new();
        let _config = SerializerConfig::default();
    }
}
