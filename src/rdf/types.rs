//! RDF type definitions
//!
//! Wrapper types around the oxrdf primitives plus the statement and
//! partial-statement shapes stored in and matched against a [`Model`].
//!
//! [`Model`]: super::Model

use oxrdf::vocab::xsd;
use oxrdf::{BlankNode as OxBlankNode, Literal as OxLiteral, NamedNode as OxNamedNode};
use std::fmt;
use thiserror::Error;

/// Rejected term input
#[derive(Error, Debug)]
pub enum RdfError {
    #[error("not an absolute IRI: {0}")]
    InvalidIri(String),

    #[error("bad language tag on literal {0:?}")]
    InvalidLanguageTag(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Named node (URI resource)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode(OxNamedNode);

impl NamedNode {
    /// Create a new named node from an absolute IRI string
    pub fn new(iri: &str) -> RdfResult<Self> {
        OxNamedNode::new(iri)
            .map(Self)
            .map_err(|e| RdfError::InvalidIri(format!("{iri}: {e}")))
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

/// Blank node (anonymous node)
///
/// Identifiers only have meaning inside the Model that holds them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNode(OxBlankNode);

impl BlankNode {
    /// Fresh node with a random identifier
    pub fn new() -> Self {
        Self(OxBlankNode::default())
    }

    /// Get the blank node identifier
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for BlankNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.as_str())
    }
}

/// RDF literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    /// Fails when `language` is not a well-formed BCP47 tag
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        let value = value.into();
        OxLiteral::new_language_tagged_literal(value.clone(), language)
            .map(Self)
            .map_err(|_| RdfError::InvalidLanguageTag(value))
    }

    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self(OxLiteral::new_typed_literal(value, datatype.0))
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        self.0.value()
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Explicit datatype IRI, `None` for plain and language-tagged literals
    pub fn datatype(&self) -> Option<&str> {
        if self.0.language().is_some() {
            return None;
        }
        let datatype = self.0.datatype();
        if datatype == xsd::STRING {
            None
        } else {
            Some(datatype.as_str())
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lang) = self.language() {
            write!(f, "\"{}\"@{}", self.value(), lang)
        } else if let Some(datatype) = self.datatype() {
            write!(f, "\"{}\"^^<{}>", self.value(), datatype)
        } else {
            write!(f, "\"{}\"", self.value())
        }
    }
}

/// Statement subject (resource or blank node, never a literal)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// Named node (URI)
    Resource(NamedNode),
    /// Blank node
    Blank(BlankNode),
}

impl Subject {
    /// Shorthand for a resource subject; fails on an invalid IRI
    pub fn resource(iri: &str) -> RdfResult<Self> {
        Ok(Subject::Resource(NamedNode::new(iri)?))
    }

    /// Check if this is a resource
    pub fn is_resource(&self) -> bool {
        matches!(self, Subject::Resource(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Subject::Blank(_))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Resource(n) => write!(f, "{}", n),
            Subject::Blank(b) => write!(f, "{}", b),
        }
    }
}

impl From<NamedNode> for Subject {
    fn from(node: NamedNode) -> Self {
        Subject::Resource(node)
    }
}

impl From<BlankNode> for Subject {
    fn from(node: BlankNode) -> Self {
        Subject::Blank(node)
    }
}

impl TryFrom<Node> for Subject {
    type Error = Literal;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Resource(n) => Ok(Subject::Resource(n)),
            Node::Blank(b) => Ok(Subject::Blank(b)),
            Node::Literal(l) => Err(l),
        }
    }
}

/// Any RDF value: resource, literal or blank node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Named node (URI)
    Resource(NamedNode),
    /// Literal value
    Literal(Literal),
    /// Blank node
    Blank(BlankNode),
}

impl Node {
    /// Shorthand for a resource node; fails on an invalid IRI
    pub fn resource(iri: &str) -> RdfResult<Self> {
        Ok(Node::Resource(NamedNode::new(iri)?))
    }

    /// Shorthand for a plain literal node
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal(Literal::new_simple_literal(value))
    }

    /// Check if this is a resource
    pub fn is_resource(&self) -> bool {
        matches!(self, Node::Resource(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    /// URI of a resource node
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Node::Resource(n) => Some(n.as_str()),
            _ => None,
        }
    }

    /// Lexical value of a literal node
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Resource(n) => write!(f, "{}", n),
            Node::Literal(l) => write!(f, "{}", l),
            Node::Blank(b) => write!(f, "{}", b),
        }
    }
}

impl From<NamedNode> for Node {
    fn from(node: NamedNode) -> Self {
        Node::Resource(node)
    }
}

impl From<BlankNode> for Node {
    fn from(node: BlankNode) -> Self {
        Node::Blank(node)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Node::Literal(lit)
    }
}

impl From<Subject> for Node {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Resource(n) => Node::Resource(n),
            Subject::Blank(b) => Node::Blank(b),
        }
    }
}

/// RDF statement (subject-predicate-object)
///
/// The predicate is always a resource and the subject is never a literal;
/// both are guaranteed by the field types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    /// Subject
    pub subject: Subject,
    /// Predicate
    pub predicate: NamedNode,
    /// Object
    pub object: Node,
}

impl Statement {
    /// Create a new statement
    pub fn new(subject: impl Into<Subject>, predicate: NamedNode, object: impl Into<Node>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// Build a statement from IRI strings, with a resource object
    pub fn from_uris(subject: &str, predicate: &str, object: &str) -> RdfResult<Self> {
        Ok(Self::new(
            NamedNode::new(subject)?,
            NamedNode::new(predicate)?,
            NamedNode::new(object)?,
        ))
    }

    /// Build a statement from IRI strings, with a plain literal object
    pub fn with_literal(subject: &str, predicate: &str, value: &str) -> RdfResult<Self> {
        Ok(Self::new(
            NamedNode::new(subject)?,
            NamedNode::new(predicate)?,
            Literal::new_simple_literal(value),
        ))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Statement pattern for lookups; `None` fields are wildcards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialStatement {
    /// Subject (None = wildcard)
    pub subject: Option<Subject>,
    /// Predicate (None = wildcard)
    pub predicate: Option<NamedNode>,
    /// Object (None = wildcard)
    pub object: Option<Node>,
}

impl PartialStatement {
    /// Create a new partial statement
    pub fn new(
        subject: Option<Subject>,
        predicate: Option<NamedNode>,
        object: Option<Node>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Pattern matching every statement
    pub fn any() -> Self {
        Self::default()
    }

    /// Check if a statement matches this pattern
    pub fn matches(&self, statement: &Statement) -> bool {
        if let Some(ref s) = self.subject {
            if s != &statement.subject {
                return false;
            }
        }
        if let Some(ref p) = self.predicate {
            if p != &statement.predicate {
                return false;
            }
        }
        if let Some(ref o) = self.object {
            if o != &statement.object {
                return false;
            }
        }
        true
    }
}

impl From<&Statement> for PartialStatement {
    fn from(statement: &Statement) -> Self {
        Self {
            subject: Some(statement.subject.clone()),
            predicate: Some(statement.predicate.clone()),
            object: Some(statement.object.clone()),
        }
    }
}
