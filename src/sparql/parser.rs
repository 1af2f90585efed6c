//! SPARQL query parser using Pest

use super::algebra::{Expression, GraphPattern, Query, TermPattern, TriplePattern};
use crate::rdf::namespace::{rdf, xsd};
use crate::rdf::{Literal, NamedNode, Node};
use oxiri::Iri;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "sparql/grammar.pest"]
struct SparqlGrammar;

static PRATT_PARSER: LazyLock<PrattParser<Rule>> = LazyLock::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::or_op, Assoc::Left))
        .op(Op::infix(Rule::and_op, Assoc::Left))
        .op(Op::infix(Rule::eq_op, Assoc::Left) | Op::infix(Rule::ne_op, Assoc::Left))
        .op(Op::prefix(Rule::not_op))
});

/// Parser errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Pest parsing error
    #[error("Parse error: {0}")]
    PestError(#[from] pest::error::Error<Rule>),

    /// Prefixed name with an undeclared prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// IRI that is not absolute after resolution
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Semantic error
    #[error("Semantic error: {0}")]
    SemanticError(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a SPARQL SELECT query into its algebra
pub fn parse_query(input: &str) -> ParseResult<Query> {
    let query = SparqlGrammar::parse(Rule::query, input)?
        .next()
        .ok_or_else(|| ParseError::SemanticError("Empty query".to_string()))?;

    let mut context = Context::default();
    let mut variables: Option<Vec<String>> = None;
    let mut distinct = false;
    let mut pattern = None;
    let mut limit = None;

    for inner in query.into_inner() {
        match inner.as_rule() {
            Rule::prologue => context.parse_prologue(inner)?,
            Rule::select_clause => {
                for item in inner.into_inner() {
                    match item.as_rule() {
                        Rule::distinct => distinct = true,
                        Rule::var => variables.get_or_insert_with(Vec::new).push(variable_name(&item)),
                        _ => {}
                    }
                }
            }
            Rule::where_clause => {
                let group = first_inner(inner)?;
                pattern = Some(context.parse_group(group)?);
            }
            Rule::limit_clause => {
                let count = first_inner(inner)?;
                limit = Some(count.as_str().parse::<usize>().map_err(|e| {
                    ParseError::SemanticError(format!("Invalid LIMIT {}: {}", count.as_str(), e))
                })?);
            }
            _ => {}
        }
    }

    Ok(Query {
        variables,
        distinct,
        pattern: pattern.ok_or_else(|| ParseError::SemanticError("Missing WHERE clause".to_string()))?,
        limit,
    })
}

fn first_inner(pair: Pair<Rule>) -> ParseResult<Pair<Rule>> {
    let rule = pair.as_rule();
    pair.into_inner()
        .next()
        .ok_or_else(|| ParseError::SemanticError(format!("Empty {:?}", rule)))
}

fn variable_name(pair: &Pair<Rule>) -> String {
    pair.as_str().trim_start_matches(['?', '$']).to_string()
}

fn join(left: Option<GraphPattern>, right: Option<GraphPattern>) -> Option<GraphPattern> {
    match (left, right) {
        (Some(left), Some(right)) => Some(GraphPattern::Join(Box::new(left), Box::new(right))),
        (left, None) => left,
        (None, right) => right,
    }
}

fn unescape(text: &str) -> String {
    let mut value = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => value.push('\t'),
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('b') => value.push('\u{8}'),
            Some('f') => value.push('\u{c}'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

/// Prologue state: declared prefixes and base IRI
#[derive(Default)]
struct Context {
    prefixes: HashMap<String, String>,
    base: Option<Iri<String>>,
}

impl Context {
    fn parse_prologue(&mut self, pair: Pair<Rule>) -> ParseResult<()> {
        for decl in pair.into_inner() {
            match decl.as_rule() {
                Rule::base_decl => {
                    let iri = self.iri_ref(first_inner(decl)?)?;
                    self.base = Some(Iri::parse(iri.clone()).map_err(|e| {
                        ParseError::InvalidIri(format!("{}: {}", iri, e))
                    })?);
                }
                Rule::prefix_decl => {
                    let mut parts = decl.into_inner();
                    let (Some(name), Some(iri)) = (parts.next(), parts.next()) else {
                        return Err(ParseError::SemanticError("Incomplete PREFIX".to_string()));
                    };
                    let prefix = name.as_str().trim_end_matches(':').to_string();
                    let namespace = self.iri_ref(iri)?;
                    self.prefixes.insert(prefix, namespace);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_group(&self, pair: Pair<Rule>) -> ParseResult<GraphPattern> {
        let mut pattern: Option<GraphPattern> = None;
        let mut triples = Vec::new();
        let mut filters = Vec::new();

        for element in pair.into_inner() {
            match element.as_rule() {
                Rule::triples => self.parse_triples(element, &mut triples)?,
                Rule::group_or_union => {
                    let block = (!triples.is_empty())
                        .then(|| GraphPattern::Bgp(std::mem::take(&mut triples)));
                    pattern = join(pattern, block);
                    pattern = join(pattern, Some(self.parse_group_or_union(element)?));
                }
                Rule::filter => filters.push(self.parse_filter(element)?),
                _ => {}
            }
        }

        let block = (!triples.is_empty()).then(|| GraphPattern::Bgp(triples));
        let mut pattern = join(pattern, block).unwrap_or(GraphPattern::Bgp(Vec::new()));

        // Filters constrain the whole group regardless of position
        for expression in filters {
            pattern = GraphPattern::Filter {
                expression,
                inner: Box::new(pattern),
            };
        }

        Ok(pattern)
    }

    fn parse_group_or_union(&self, pair: Pair<Rule>) -> ParseResult<GraphPattern> {
        let mut pattern: Option<GraphPattern> = None;
        for group in pair.into_inner() {
            let branch = self.parse_group(group)?;
            pattern = Some(match pattern {
                Some(left) => GraphPattern::Union(Box::new(left), Box::new(branch)),
                None => branch,
            });
        }
        pattern.ok_or_else(|| ParseError::SemanticError("Empty UNION".to_string()))
    }

    fn parse_triples(&self, pair: Pair<Rule>, out: &mut Vec<TriplePattern>) -> ParseResult<()> {
        let mut parts = pair.into_inner();
        let (Some(subject), Some(properties)) = (parts.next(), parts.next()) else {
            return Err(ParseError::SemanticError("Incomplete triple pattern".to_string()));
        };
        let subject = self.term(first_inner(subject)?)?;

        for property in properties.into_inner() {
            let mut parts = property.into_inner();
            let verb = parts
                .next()
                .ok_or_else(|| ParseError::SemanticError("Missing predicate".to_string()))?;
            let predicate = self.term(first_inner(verb)?)?;

            for object in parts {
                let object = self.term(first_inner(object)?)?;
                out.push(TriplePattern::new(subject.clone(), predicate.clone(), object));
            }
        }
        Ok(())
    }

    fn parse_filter(&self, pair: Pair<Rule>) -> ParseResult<Expression> {
        let constraint = first_inner(pair)?;
        match constraint.as_rule() {
            Rule::builtin_call => self.builtin_call(constraint),
            _ => self.expression(constraint),
        }
    }

    fn expression(&self, pair: Pair<Rule>) -> ParseResult<Expression> {
        PRATT_PARSER
            .map_primary(|primary| self.primary(primary))
            .map_prefix(|op, rhs| match op.as_rule() {
                Rule::not_op => Ok(Expression::Not(Box::new(rhs?))),
                rule => Err(ParseError::SemanticError(format!("Unexpected prefix operator {:?}", rule))),
            })
            .map_infix(|lhs, op, rhs| {
                let (lhs, rhs) = (Box::new(lhs?), Box::new(rhs?));
                match op.as_rule() {
                    Rule::or_op => Ok(Expression::Or(lhs, rhs)),
                    Rule::and_op => Ok(Expression::And(lhs, rhs)),
                    Rule::eq_op => Ok(Expression::Equal(lhs, rhs)),
                    Rule::ne_op => Ok(Expression::NotEqual(lhs, rhs)),
                    rule => Err(ParseError::SemanticError(format!("Unexpected operator {:?}", rule))),
                }
            })
            .parse(pair.into_inner())
    }

    fn primary(&self, pair: Pair<Rule>) -> ParseResult<Expression> {
        match pair.as_rule() {
            Rule::builtin_call => self.builtin_call(pair),
            Rule::expression => self.expression(pair),
            _ => match self.term(pair)? {
                TermPattern::Variable(name) => Ok(Expression::Variable(name)),
                TermPattern::Node(node) => Ok(Expression::Constant(node)),
            },
        }
    }

    fn builtin_call(&self, pair: Pair<Rule>) -> ParseResult<Expression> {
        let mut parts = pair.into_inner();
        let (Some(name), Some(argument)) = (parts.next(), parts.next()) else {
            return Err(ParseError::SemanticError("Incomplete function call".to_string()));
        };
        let argument = self.expression(argument)?;

        match name.as_str().to_ascii_lowercase().as_str() {
            "isliteral" => Ok(Expression::IsLiteral(Box::new(argument))),
            "isuri" | "isiri" => Ok(Expression::IsIri(Box::new(argument))),
            "isblank" => Ok(Expression::IsBlank(Box::new(argument))),
            "bound" => match argument {
                Expression::Variable(name) => Ok(Expression::Bound(name)),
                _ => Err(ParseError::SemanticError("bound() takes a variable".to_string())),
            },
            other => Err(ParseError::SemanticError(format!("Unknown function: {}", other))),
        }
    }

    fn term(&self, pair: Pair<Rule>) -> ParseResult<TermPattern> {
        match pair.as_rule() {
            Rule::var => Ok(TermPattern::Variable(variable_name(&pair))),
            Rule::blank_node => Ok(TermPattern::Variable(pair.as_str().to_string())),
            Rule::iri_ref | Rule::prefixed_name => {
                Ok(TermPattern::Node(Node::Resource(self.named_node(pair)?)))
            }
            Rule::rdf_type => Ok(TermPattern::Node(Node::Resource(new_named_node(rdf::TYPE)?))),
            Rule::literal => Ok(TermPattern::Node(Node::Literal(self.literal(pair)?))),
            Rule::integer => Ok(TermPattern::Node(Node::Literal(Literal::new_typed_literal(
                pair.as_str(),
                new_named_node(xsd::INTEGER)?,
            )))),
            rule => Err(ParseError::SemanticError(format!("Unexpected term {:?}", rule))),
        }
    }

    fn literal(&self, pair: Pair<Rule>) -> ParseResult<Literal> {
        let mut parts = pair.into_inner();
        let string = parts
            .next()
            .ok_or_else(|| ParseError::SemanticError("Empty literal".to_string()))?;
        let value = unescape(first_inner(string)?.as_str());

        match parts.next() {
            None => Ok(Literal::new_simple_literal(value)),
            Some(tag) if tag.as_rule() == Rule::lang_tag => {
                Literal::new_language_tagged_literal(value, &tag.as_str()[1..])
                    .map_err(|e| ParseError::SemanticError(e.to_string()))
            }
            Some(datatype) => Ok(Literal::new_typed_literal(value, self.named_node(datatype)?)),
        }
    }

    fn named_node(&self, pair: Pair<Rule>) -> ParseResult<NamedNode> {
        let iri = match pair.as_rule() {
            Rule::prefixed_name => self.prefixed_name(pair)?,
            _ => self.iri_ref(pair)?,
        };
        new_named_node(&iri)
    }

    fn iri_ref(&self, pair: Pair<Rule>) -> ParseResult<String> {
        let body = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
        match &self.base {
            Some(base) => base
                .resolve(body)
                .map(|iri| iri.into_inner())
                .map_err(|e| ParseError::InvalidIri(format!("{}: {}", body, e))),
            None => Ok(body.to_string()),
        }
    }

    fn prefixed_name(&self, pair: Pair<Rule>) -> ParseResult<String> {
        let mut parts = pair.into_inner();
        let prefix = parts
            .next()
            .map(|p| p.as_str().trim_end_matches(':'))
            .unwrap_or("");
        let local = parts.next().map(|p| p.as_str()).unwrap_or("");

        let namespace = self
            .prefixes
            .get(prefix)
            .ok_or_else(|| ParseError::UnknownPrefix(prefix.to_string()))?;
        Ok(format!("{}{}", namespace, local))
    }
}

fn new_named_node(iri: &str) -> ParseResult<NamedNode> {
    NamedNode::new(iri).map_err(|e| ParseError::InvalidIri(e.to_string()))
}
