//! Query algebra produced by the parser and consumed by the planner

use crate::rdf::Node;

/// Parsed SELECT query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Projected variables, `None` for `SELECT *`
    pub variables: Option<Vec<String>>,
    /// `SELECT DISTINCT`
    pub distinct: bool,
    /// WHERE clause
    pub pattern: GraphPattern,
    /// `LIMIT n`
    pub limit: Option<usize>,
}

impl Query {
    /// Variables reported in results: the explicit projection, or every
    /// named variable of the pattern in order of first appearance.
    pub fn output_variables(&self) -> Vec<String> {
        match &self.variables {
            Some(variables) => variables.clone(),
            None => self.pattern.variables(),
        }
    }
}

/// Subject, predicate or object position of a triple pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermPattern {
    /// `?name`; blank node labels become variables named `_:label`
    Variable(String),
    /// Constant node
    Node(Node),
}

impl TermPattern {
    /// Variable name, if this position is a variable
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            TermPattern::Variable(name) => Some(name),
            TermPattern::Node(_) => None,
        }
    }
}

/// Triple pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: TermPattern,
    pub predicate: TermPattern,
    pub object: TermPattern,
}

impl TriplePattern {
    pub fn new(subject: TermPattern, predicate: TermPattern, object: TermPattern) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// Graph pattern tree
#[derive(Debug, Clone, PartialEq)]
pub enum GraphPattern {
    /// Conjunction of triple patterns
    Bgp(Vec<TriplePattern>),
    /// Both sides must match with compatible bindings
    Join(Box<GraphPattern>, Box<GraphPattern>),
    /// Rows of the left side followed by rows of the right side
    Union(Box<GraphPattern>, Box<GraphPattern>),
    /// Rows of `inner` for which `expression` is true
    Filter {
        expression: Expression,
        inner: Box<GraphPattern>,
    },
}

impl GraphPattern {
    /// Named variables in order of first appearance (blank node labels excluded)
    pub fn variables(&self) -> Vec<String> {
        let mut variables = Vec::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables(&self, variables: &mut Vec<String>) {
        match self {
            GraphPattern::Bgp(triples) => {
                for triple in triples {
                    for term in [&triple.subject, &triple.predicate, &triple.object] {
                        if let Some(name) = term.as_variable() {
                            if !name.starts_with("_:") && !variables.iter().any(|v| v == name) {
                                variables.push(name.to_string());
                            }
                        }
                    }
                }
            }
            GraphPattern::Join(left, right) | GraphPattern::Union(left, right) => {
                left.collect_variables(variables);
                right.collect_variables(variables);
            }
            GraphPattern::Filter { inner, .. } => inner.collect_variables(variables),
        }
    }
}

/// FILTER expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Variable(String),
    Constant(Node),
    Or(Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    IsLiteral(Box<Expression>),
    IsIri(Box<Expression>),
    IsBlank(Box<Expression>),
    Bound(String),
}
