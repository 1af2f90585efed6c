//! Image attribution data
//!
//! [`Attribution`] is the interface image and layer code uses to keep
//! provenance metadata: it loads RDF/XML (standalone or from an XMP packet),
//! answers whether any creator/contributor/license data is reachable,
//! merges graphs, serializes them back and exports creators and sources into
//! a [`TagStore`].
//!
//! A standalone graph describes the subject `about:this`. When an image graph
//! is serialized on top of another one, the outer graph is rooted at
//! `about:that` and linked with `(about:that, dc:source, about:this)`.

mod tags;
mod tree;

pub use tags::{MemoryTagStore, TagMapping, TagStore, TAG_CREATOR, TAG_MAPPINGS, TAG_SOURCE};
pub use tree::{AttributionTree, TreeRow, BLANK_VALUE, DEFAULT_ROW, SOURCE_ROW};

use crate::rdf::namespace::{cc, dc, dcterms, xhv};
use crate::rdf::serialization::{self, SerializerConfig};
use crate::rdf::{
    extract_rdf_block, Literal, Model, NamedNode, Node, PacketError, ParseError, PartialStatement,
    RdfError, SerializeError, Statement, Subject, Vocab, ABOUT_THAT, ABOUT_THIS,
};
use crate::sparql::{QueryEngine, SparqlError};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Attribution errors
#[derive(Error, Debug)]
pub enum AttributionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Query error: {0}")]
    Query(#[from] SparqlError),

    #[error(transparent)]
    Rdf(#[from] RdfError),
}

pub type AttributionResult<T> = Result<T, AttributionError>;

/// Predicates that count as attribution data
pub const ATTRIBUTION_PREDICATES: &[&str] = &[
    dc::CONTRIBUTOR,
    dcterms::CONTRIBUTOR,
    dc::CREATOR,
    dcterms::CREATOR,
    xhv::LICENSE,
    dcterms::LICENSE,
    cc::LICENSE,
];

/// Every source label: direct `dc:source`/`dcterms:source` values plus the
/// members of `rdf:Seq`/`rdf:Bag` containers and the first `rdf:Alt` choice.
pub const SOURCE_QUERY: &str = r#"
PREFIX dc: <http://purl.org/dc/elements/1.1/>
PREFIX dcterms: <http://purl.org/dc/terms/>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>

SELECT ?subject ?label WHERE {
    {
        { ?subject dc:source ?label . }
        UNION
        { ?subject dcterms:source ?label . }
        FILTER(isLiteral(?label) || isURI(?label))
    }
    UNION
    {
        { ?subject dc:source ?node . }
        UNION
        { ?subject dcterms:source ?node . }
        ?node a rdf:Seq .
        ?node ?pred ?label .
        FILTER(isLiteral(?label) || isURI(?label))
        FILTER(?label != rdf:Seq)
    }
    UNION
    {
        { ?subject dc:source ?node . }
        UNION
        { ?subject dcterms:source ?node . }
        ?node a rdf:Bag .
        ?node ?pred ?label .
        FILTER(isLiteral(?label) || isURI(?label))
        FILTER(?label != rdf:Bag)
    }
    UNION
    {
        { ?subject dc:source ?node . }
        UNION
        { ?subject dcterms:source ?node . }
        ?node a rdf:Alt .
        ?node rdf:_1 ?label .
        FILTER(isLiteral(?label) || isURI(?label))
    }
}
"#;

/// Every creator label, expanded the same way as [`SOURCE_QUERY`]; Twitter
/// handles and `cc:attributionName` count as creators too.
pub const CREATOR_QUERY: &str = r#"
PREFIX dc: <http://purl.org/dc/elements/1.1/>
PREFIX dcterms: <http://purl.org/dc/terms/>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX cc: <http://creativecommons.org/ns#>

SELECT ?subject ?label WHERE {
    {
        { ?subject dc:creator ?label . }
        UNION
        { ?subject dcterms:creator ?label . }
        UNION
        { ?subject <twitter:creator> ?label . }
        UNION
        { ?subject <cc:attributionName> ?label . }
        FILTER(isLiteral(?label) || isURI(?label))
    }
    UNION
    {
        { ?subject dc:creator ?node . }
        UNION
        { ?subject dcterms:creator ?node . }
        ?node a rdf:Seq .
        ?node ?pred ?label .
        FILTER(isLiteral(?label) || isURI(?label))
        FILTER(?label != rdf:Seq)
    }
    UNION
    {
        { ?subject dc:creator ?node . }
        UNION
        { ?subject dcterms:creator ?node . }
        ?node a rdf:Bag .
        ?node ?pred ?label .
        FILTER(isLiteral(?label) || isURI(?label))
        FILTER(?label != rdf:Bag)
    }
    UNION
    {
        { ?subject dc:creator ?node . }
        UNION
        { ?subject dcterms:creator ?node . }
        ?node a rdf:Alt .
        ?node rdf:_1 ?label .
        FILTER(isLiteral(?label) || isURI(?label))
    }
}
"#;

/// Attribution graph of one image, layer or clipboard transfer
#[derive(Debug, Clone, Default)]
pub struct Attribution {
    model: Model,
}

impl Attribution {
    /// Create an empty attribution
    pub fn new() -> Self {
        Self::default()
    }

    /// New attribution holding the statements of `first`, then `second`
    pub fn from_pair(first: &Attribution, second: &Attribution) -> Self {
        let mut attribution = Self::new();
        attribution.combine(first);
        attribution.combine(second);
        attribution
    }

    /// The underlying statement model
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Mutable access to the underlying model
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Consume into the underlying model
    pub fn into_model(self) -> Model {
        self.model
    }

    /// Check if there are no statements at all
    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    /// Load RDF/XML text, resolving relative URIs against `about:this`
    pub fn load_from_str(&mut self, rdf_xml: &str) -> AttributionResult<()> {
        self.load_with_base(rdf_xml, ABOUT_THIS)
    }

    /// Load an RDF/XML file, resolving relative URIs against `about:this`.
    ///
    /// The model is left untouched when the file can't be read or parsed.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> AttributionResult<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .inspect_err(|e| warn!("Failed to read attribution file {}: {}", path.display(), e))?;
        self.load_from_str(&text)
    }

    /// Load the RDF block of an XMP packet.
    ///
    /// `about:this` is declared to be sourced from `base_uri`, which is also
    /// the base for relative URIs inside the packet.
    pub fn load_from_xmp(&mut self, packet: &str, base_uri: &str) -> AttributionResult<()> {
        let rdf_xml = extract_rdf_block(packet)?;
        let link = Statement::from_uris(ABOUT_THIS, dc::SOURCE, base_uri)?;
        let parsed = self.parse_scratch(rdf_xml, base_uri)?;

        self.model.add(link);
        self.model.combine(&parsed);
        Ok(())
    }

    fn load_with_base(&mut self, rdf_xml: &str, base_uri: &str) -> AttributionResult<()> {
        let parsed = self.parse_scratch(rdf_xml, base_uri)?;
        self.model.combine(&parsed);
        Ok(())
    }

    fn parse_scratch(&self, rdf_xml: &str, base_uri: &str) -> AttributionResult<Model> {
        let parsed = serialization::parse(rdf_xml, base_uri)
            .inspect_err(|e| warn!("Failed to load attribution: {}", e))?;
        debug!("Parsed {} attribution statements (base {})", parsed.len(), base_uri);
        Ok(parsed)
    }

    /// Serialize as RDF/XML.
    ///
    /// With `image`, this attribution becomes the outer `about:that` graph,
    /// linked to the image graph by `(about:that, dc:source, about:this)`.
    pub fn serialize_rdf(&self, image: Option<&Attribution>) -> AttributionResult<String> {
        let mut scratch = self.model.clone();

        let base_uri = match image {
            Some(image) => {
                scratch.add(Statement::from_uris(ABOUT_THAT, dc::SOURCE, ABOUT_THIS)?);
                scratch.combine(&image.model);
                ABOUT_THAT
            }
            None => ABOUT_THIS,
        };

        let config = SerializerConfig::with_base_uri(base_uri);
        let text = serialization::serialize(&scratch, &config)?;
        debug!("Serialized {} attribution statements", scratch.len());
        Ok(text)
    }

    /// Append every statement of `other`, duplicates included
    pub fn combine(&mut self, other: &Attribution) {
        self.model.combine(&other.model);
    }

    /// Deduplicate `other` in place, then append it.
    ///
    /// Statements already present here are not filtered out.
    pub fn combine_check(&mut self, other: &mut Attribution) {
        self.model.combine_check(&mut other.model);
    }

    /// Check if `subject_uri` has a contributor, creator or license
    pub fn has_attribution_subject(&self, subject_uri: &str) -> bool {
        let Ok(subject) = Subject::resource(subject_uri) else {
            return false;
        };
        self.has_attribution_for(&subject)
    }

    fn has_attribution_for(&self, subject: &Subject) -> bool {
        ATTRIBUTION_PREDICATES.iter().any(|predicate| {
            NamedNode::new(predicate)
                .map(|predicate| self.model.targets(subject, &predicate).next().is_some())
                .unwrap_or(false)
        })
    }

    /// Check if `about:this`, or any resource it declares as `dc:source`,
    /// carries attribution data
    pub fn has_attribution(&self) -> bool {
        let (Ok(this), Ok(source)) = (Subject::resource(ABOUT_THIS), NamedNode::new(dc::SOURCE))
        else {
            return false;
        };

        if self.has_attribution_for(&this) {
            return true;
        }

        self.model.targets(&this, &source).any(|object| match object {
            Node::Resource(uri) => self.has_attribution_for(&Subject::Resource(uri.clone())),
            _ => false,
        })
    }

    /// Literal value of the first `(about:this, predicate, ?)` statement
    pub fn property_value(&self, predicate_uri: &str) -> Option<&str> {
        let pattern = this_pattern(predicate_uri).ok()?;
        let statement = self.model.find(&pattern).next()?;
        statement.object.as_literal().map(Literal::value)
    }

    /// Replace every `(about:this, predicate, ?)` statement with one literal
    pub fn set_property_value(&mut self, predicate_uri: &str, value: &str) -> AttributionResult<()> {
        let pattern = this_pattern(predicate_uri)?;
        let removed = self.model.remove_matching(&pattern);
        debug!("Replacing {} value(s) of {}", removed, predicate_uri);

        self.model.add(Statement::with_literal(ABOUT_THIS, predicate_uri, value)?);
        Ok(())
    }

    /// Display tree rooted at `about:this`
    pub fn tree(&self, vocab: &Vocab) -> AttributionResult<AttributionTree> {
        let root = Subject::resource(ABOUT_THIS)?;
        Ok(AttributionTree::build(&self.model, &root, vocab))
    }

    /// Replace `Xmp.dc.source` and `Xmp.dc.creator` with the labels found by
    /// [`SOURCE_QUERY`] and [`CREATOR_QUERY`]
    pub fn write_metadata(&self, tags: &mut impl TagStore) -> AttributionResult<()> {
        self.write_query_labels(tags, TAG_SOURCE, SOURCE_QUERY)?;
        self.write_query_labels(tags, TAG_CREATOR, CREATOR_QUERY)?;
        Ok(())
    }

    fn write_query_labels(
        &self,
        tags: &mut impl TagStore,
        tag: &str,
        query: &str,
    ) -> AttributionResult<()> {
        tags.clear_tag(tag);

        for row in QueryEngine::new().query(&self.model, query)? {
            let row = row.map_err(SparqlError::from)?;
            if let Some(label) = row.value("label") {
                tags.append_tag_value(tag, label);
            }
        }
        Ok(())
    }

    /// Copy the Dublin Core metadata of the declared source into `tags`.
    ///
    /// The source is the first resource object of `(about:this, dc:source, ?)`.
    /// Returns `false` when there is none.
    pub fn write_source_metadata(&self, tags: &mut impl TagStore) -> AttributionResult<bool> {
        let this = Subject::resource(ABOUT_THIS)?;
        let source_predicate = NamedNode::new(dc::SOURCE)?;

        let source = self
            .model
            .targets(&this, &source_predicate)
            .find_map(|object| match object {
                Node::Resource(uri) => Some(Subject::Resource(uri.clone())),
                _ => None,
            });

        let Some(source) = source else {
            warn!("No dc:source declared for {}", ABOUT_THIS);
            return Ok(false);
        };

        for mapping in TAG_MAPPINGS {
            for predicate in mapping.predicates {
                let predicate = NamedNode::new(predicate)?;
                for target in self.model.targets(&source, &predicate) {
                    let value = match target {
                        Node::Literal(literal) => literal.value(),
                        Node::Resource(uri) => uri.as_str(),
                        Node::Blank(blank) => {
                            warn!("Blank node {} under {} not exported", blank, mapping.tag);
                            continue;
                        }
                    };

                    if mapping.ordered {
                        tags.append_tag_value(mapping.tag, value);
                    } else {
                        tags.set_tag_string(mapping.tag, value);
                    }
                }
            }
        }

        Ok(true)
    }
}

impl From<Model> for Attribution {
    fn from(model: Model) -> Self {
        Self { model }
    }
}

fn this_pattern(predicate_uri: &str) -> AttributionResult<PartialStatement> {
    Ok(PartialStatement::new(
        Some(Subject::resource(ABOUT_THIS)?),
        Some(NamedNode::new(predicate_uri)?),
        None,
    ))
}
