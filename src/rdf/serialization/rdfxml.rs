//! RDF/XML format implementation

use super::{ParseError, ParseResult, SerializeError, SerializeResult, SerializerConfig};
use crate::rdf::namespace::rdf;
use crate::rdf::{BlankNode, Literal, Model, NamedNode, Node, Statement, Subject};
use indexmap::IndexMap;
use oxiri::Iri;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rio_api::parser::TriplesParser;
use std::collections::{HashMap, HashSet};
use std::io::BufReader;
use tracing::debug;

/// RDF/XML parser
///
/// Blank node identifiers are scoped to a single `parse` call: every parse
/// mints fresh blank nodes, so two documents never share one.
pub struct RdfXmlParser {
    base_uri: String,
}

impl RdfXmlParser {
    /// Create a parser resolving relative URIs against `base_uri`
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
        }
    }

    /// Parse RDF/XML text into a new model
    pub fn parse(&self, input: &str) -> ParseResult<Model> {
        let base = Iri::parse(self.base_uri.clone())
            .map_err(|e| ParseError::InvalidBase(self.base_uri.clone(), e.to_string()))?;
        let mut parser = rio_xml::RdfXmlParser::new(BufReader::new(input.as_bytes()), Some(base));

        let mut model = Model::new();
        let mut blanks = HashMap::new();

        parser.parse_all(&mut |t| -> ParseResult<()> {
            let subject = convert_subject(t.subject, &mut blanks)?;
            let predicate = convert_named_node(t.predicate)?;
            let object = convert_object(t.object, &mut blanks)?;

            model.add(Statement::new(subject, predicate, object));
            Ok(())
        })?;

        debug!("Parsed {} statements (base {})", model.len(), self.base_uri);
        Ok(model)
    }
}

fn convert_named_node(n: rio_api::model::NamedNode) -> ParseResult<NamedNode> {
    NamedNode::new(n.iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_blank_node(
    b: rio_api::model::BlankNode,
    blanks: &mut HashMap<String, BlankNode>,
) -> BlankNode {
    blanks.entry(b.id.to_string()).or_default().clone()
}

fn convert_subject(
    s: rio_api::model::Subject,
    blanks: &mut HashMap<String, BlankNode>,
) -> ParseResult<Subject> {
    #[allow(unreachable_patterns)]
    match s {
        rio_api::model::Subject::NamedNode(n) => Ok(Subject::Resource(convert_named_node(n)?)),
        rio_api::model::Subject::BlankNode(b) => Ok(Subject::Blank(convert_blank_node(b, blanks))),
        _ => Err(ParseError::Parse("Unsupported subject type".to_string())),
    }
}

fn convert_object(
    o: rio_api::model::Term,
    blanks: &mut HashMap<String, BlankNode>,
) -> ParseResult<Node> {
    #[allow(unreachable_patterns)]
    match o {
        rio_api::model::Term::NamedNode(n) => Ok(Node::Resource(convert_named_node(n)?)),
        rio_api::model::Term::BlankNode(b) => Ok(Node::Blank(convert_blank_node(b, blanks))),
        rio_api::model::Term::Literal(l) => match l {
            rio_api::model::Literal::Simple { value } => {
                Ok(Node::Literal(Literal::new_simple_literal(value)))
            }
            rio_api::model::Literal::LanguageTaggedString { value, language } => {
                Ok(Node::Literal(
                    Literal::new_language_tagged_literal(value, language)
                        .map_err(|e| ParseError::Parse(e.to_string()))?,
                ))
            }
            rio_api::model::Literal::Typed { value, datatype } => Ok(Node::Literal(
                Literal::new_typed_literal(value, convert_named_node(datatype)?),
            )),
        },
        _ => Err(ParseError::Parse("Unsupported object type".to_string())),
    }
}

/// RDF/XML serializer
///
/// Writes one `rdf:Description` per subject, in order of first appearance.
/// A blank node used exactly once as an object is nested inside the
/// property that references it; every other blank node is written with an
/// `rdf:nodeID` of the form `genidN`.
pub struct RdfXmlSerializer {
    config: SerializerConfig,
}

impl RdfXmlSerializer {
    /// Create a serializer with the given settings
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize a model to an RDF/XML document
    pub fn serialize(&self, model: &Model) -> SerializeResult<String> {
        let statements: Vec<&Statement> = model.as_stream().collect();
        let output = Emitter::prepare(&self.config, &statements)?.run()?;
        debug!("Serialized {} statements to RDF/XML", statements.len());
        Ok(output)
    }
}

/// One serialization run over a fixed statement list
struct Emitter<'m> {
    config: &'m SerializerConfig,
    writer: Writer<Vec<u8>>,
    /// `(prefix, namespace)` declared on the root element
    declarations: Vec<(String, String)>,
    /// Predicate IRI -> qualified element name
    qnames: HashMap<&'m str, String>,
    groups: IndexMap<Subject, Vec<&'m Statement>>,
    blank_ids: HashMap<BlankNode, String>,
    inline: HashSet<BlankNode>,
    emitted: HashSet<usize>,
}

impl<'m> Emitter<'m> {
    fn prepare(config: &'m SerializerConfig, statements: &[&'m Statement]) -> SerializeResult<Self> {
        let mut declarations = vec![("rdf".to_string(), rdf::NS.to_string())];
        let mut prefix_by_namespace: HashMap<String, String> = HashMap::new();
        prefix_by_namespace.insert(rdf::NS.to_string(), "rdf".to_string());

        for (prefix, namespace) in &config.prefixes {
            if prefix == "rdf" {
                continue;
            }
            declarations.push((prefix.clone(), namespace.clone()));
            prefix_by_namespace
                .entry(namespace.clone())
                .or_insert_with(|| prefix.clone());
        }

        let mut qnames = HashMap::new();
        let mut generated = 0;
        for &statement in statements {
            let iri = statement.predicate.as_str();
            if qnames.contains_key(iri) {
                continue;
            }

            let (namespace, local) = split_iri(iri);
            if local.is_empty() {
                return Err(SerializeError::UnsplittablePredicate(iri.to_string()));
            }

            let prefix = match prefix_by_namespace.get(namespace) {
                Some(prefix) => prefix.clone(),
                None => {
                    let prefix = loop {
                        generated += 1;
                        let candidate = format!("ns{generated}");
                        if !declarations.iter().any(|(p, _)| *p == candidate) {
                            break candidate;
                        }
                    };
                    declarations.push((prefix.clone(), namespace.to_string()));
                    prefix_by_namespace.insert(namespace.to_string(), prefix.clone());
                    prefix
                }
            };

            qnames.insert(iri, format!("{prefix}:{local}"));
        }

        let mut groups: IndexMap<Subject, Vec<&'m Statement>> = IndexMap::new();
        let mut blank_ids = HashMap::new();
        let mut object_uses: HashMap<&BlankNode, usize> = HashMap::new();

        for &statement in statements {
            groups
                .entry(statement.subject.clone())
                .or_default()
                .push(statement);

            if let Subject::Blank(b) = &statement.subject {
                let next = blank_ids.len() + 1;
                blank_ids.entry(b.clone()).or_insert_with(|| format!("genid{next}"));
            }
            if let Node::Blank(b) = &statement.object {
                let next = blank_ids.len() + 1;
                blank_ids.entry(b.clone()).or_insert_with(|| format!("genid{next}"));
                *object_uses.entry(b).or_default() += 1;
            }
        }

        let inline = object_uses
            .into_iter()
            .filter(|(b, uses)| *uses == 1 && groups.contains_key(&Subject::Blank((*b).clone())))
            .map(|(b, _)| b.clone())
            .collect();

        Ok(Self {
            config,
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            declarations,
            qnames,
            groups,
            blank_ids,
            inline,
            emitted: HashSet::new(),
        })
    }

    fn run(mut self) -> SerializeResult<String> {
        self.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("rdf:RDF");
        if self.config.write_base_uri {
            root.push_attribute(("xml:base", self.config.base_uri.as_str()));
        }
        for (prefix, namespace) in &self.declarations {
            root.push_attribute((format!("xmlns:{prefix}").as_str(), namespace.as_str()));
        }
        self.write_event(Event::Start(root))?;

        for index in 0..self.groups.len() {
            if !self.emitted.contains(&index) && !self.is_inline(index) {
                self.write_description(index, false)?;
            }
        }
        // Blank nodes only reachable through a cycle of single references
        for index in 0..self.groups.len() {
            if !self.emitted.contains(&index) {
                self.write_description(index, false)?;
            }
        }

        self.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;

        String::from_utf8(self.writer.into_inner())
            .map_err(|e| SerializeError::Serialize(e.to_string()))
    }

    fn is_inline(&self, index: usize) -> bool {
        match self.groups.get_index(index) {
            Some((Subject::Blank(b), _)) => self.inline.contains(b),
            _ => false,
        }
    }

    fn write_description(&mut self, index: usize, nested: bool) -> SerializeResult<()> {
        let Some((subject, statements)) = self
            .groups
            .get_index(index)
            .map(|(subject, statements)| (subject.clone(), statements.clone()))
        else {
            return Ok(());
        };
        self.emitted.insert(index);

        let mut start = BytesStart::new("rdf:Description");
        match &subject {
            Subject::Resource(n) => {
                start.push_attribute(("rdf:about", self.relative(n.as_str())));
            }
            Subject::Blank(b) if !nested => {
                start.push_attribute(("rdf:nodeID", self.blank_id(b)?));
            }
            Subject::Blank(_) => {}
        }
        self.write_event(Event::Start(start))?;

        for statement in statements {
            self.write_property(statement)?;
        }

        self.write_event(Event::End(BytesEnd::new("rdf:Description")))
    }

    fn write_property(&mut self, statement: &'m Statement) -> SerializeResult<()> {
        let qname = self
            .qnames
            .get(statement.predicate.as_str())
            .cloned()
            .ok_or_else(|| SerializeError::UnsplittablePredicate(statement.predicate.to_string()))?;
        let mut start = BytesStart::new(qname.clone());

        match &statement.object {
            Node::Resource(n) => {
                start.push_attribute(("rdf:resource", self.relative(n.as_str())));
                self.write_event(Event::Empty(start))
            }
            Node::Blank(b) => {
                let nested = self
                    .groups
                    .get_index_of(&Subject::Blank(b.clone()))
                    .filter(|index| self.inline.contains(b) && !self.emitted.contains(index));

                match nested {
                    Some(index) => {
                        self.write_event(Event::Start(start))?;
                        self.write_description(index, true)?;
                        self.write_event(Event::End(BytesEnd::new(qname)))
                    }
                    None => {
                        start.push_attribute(("rdf:nodeID", self.blank_id(b)?));
                        self.write_event(Event::Empty(start))
                    }
                }
            }
            Node::Literal(literal) => {
                if let Some(language) = literal.language() {
                    start.push_attribute(("xml:lang", language));
                } else if let Some(datatype) = literal.datatype() {
                    start.push_attribute(("rdf:datatype", self.relative(datatype)));
                }
                self.write_event(Event::Start(start))?;
                self.write_event(Event::Text(BytesText::new(literal.value())))?;
                self.write_event(Event::End(BytesEnd::new(qname)))
            }
        }
    }

    fn blank_id(&self, node: &BlankNode) -> SerializeResult<&str> {
        self.blank_ids
            .get(node)
            .map(String::as_str)
            .ok_or_else(|| SerializeError::Serialize(format!("Unregistered blank node {node}")))
    }

    /// Make a URI relative to the base: the base itself becomes `""` and a
    /// fragment of the base becomes `#fragment`.
    fn relative<'u>(&self, uri: &'u str) -> &'u str {
        if !self.config.relative_uris {
            return uri;
        }
        match uri.strip_prefix(self.config.base_uri.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('#') => rest,
            _ => uri,
        }
    }

    fn write_event(&mut self, event: Event<'_>) -> SerializeResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

/// Split an IRI into namespace and XML local name
fn split_iri(iri: &str) -> (&str, &str) {
    if let Some(position_base) = iri.rfind(|c| !is_name_char(c) || c == ':') {
        if let Some(position_add) = iri[position_base..].find(|c| is_name_start_char(c) && c != ':')
        {
            (
                &iri[..position_base + position_add],
                &iri[position_base + position_add..],
            )
        } else {
            (iri, "")
        }
    } else {
        (iri, "")
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c, '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}
