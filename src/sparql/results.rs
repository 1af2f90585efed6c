//! SPARQL query results

use super::executor::{ExecutionPlan, ExecutionResult, OperatorBox, Record};
use crate::rdf::{Model, Node};
use indexmap::IndexMap;
use serde_json::{json, Map, Value as JsonValue};
use tracing::warn;

/// Query solution (variable bindings, in projection order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySolution {
    /// Variable name → node bindings
    bindings: IndexMap<String, Node>,
}

impl QuerySolution {
    /// Create a new query solution
    pub fn new() -> Self {
        Self::default()
    }

    fn from_record(record: Record, columns: &[String]) -> Self {
        let mut solution = Self::new();
        for column in columns {
            if let Some(node) = record.get(column) {
                solution.bind(column.clone(), node.clone());
            }
        }
        solution
    }

    /// Get a binding
    pub fn get(&self, variable: &str) -> Option<&Node> {
        self.bindings.get(variable)
    }

    /// Add a binding
    pub fn bind(&mut self, variable: String, node: Node) {
        self.bindings.insert(variable, node);
    }

    /// String form of a binding: a literal's value or a resource's URI.
    ///
    /// Blank nodes have no string form; they are logged and skipped.
    pub fn value(&self, variable: &str) -> Option<&str> {
        match self.bindings.get(variable)? {
            Node::Literal(literal) => Some(literal.value()),
            Node::Resource(node) => Some(node.as_str()),
            Node::Blank(node) => {
                warn!("Binding ?{} is blank node {}, skipping", variable, node);
                None
            }
        }
    }

    /// Iterate over bindings
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check whether no variable is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Lazy stream of solutions, pulled from the operator tree on demand
pub struct QuerySolutions<'m> {
    model: &'m Model,
    root: OperatorBox,
    variables: Vec<String>,
    finished: bool,
}

impl<'m> QuerySolutions<'m> {
    pub(crate) fn new(model: &'m Model, plan: ExecutionPlan) -> Self {
        Self {
            model,
            root: plan.root,
            variables: plan.output_columns,
            finished: false,
        }
    }

    /// Projected variable names
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Drain the stream into a materialized result set
    pub fn into_results(self) -> ExecutionResult<SparqlResults> {
        let variables = self.variables.clone();
        let solutions = self.collect::<ExecutionResult<Vec<_>>>()?;
        Ok(SparqlResults {
            variables,
            solutions,
        })
    }
}

impl Iterator for QuerySolutions<'_> {
    type Item = ExecutionResult<QuerySolution>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.root.next(self.model) {
            Ok(Some(record)) => Some(Ok(QuerySolution::from_record(record, &self.variables))),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Materialized SELECT results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparqlResults {
    /// Variables
    pub variables: Vec<String>,
    /// Solutions
    pub solutions: Vec<QuerySolution>,
}

impl SparqlResults {
    /// Render in the SPARQL 1.1 JSON results layout
    pub fn to_json(&self) -> JsonValue {
        let bindings: Vec<JsonValue> = self
            .solutions
            .iter()
            .map(|solution| {
                let row: Map<String, JsonValue> = solution
                    .iter()
                    .map(|(variable, node)| (variable.to_string(), node_to_json(node)))
                    .collect();
                JsonValue::Object(row)
            })
            .collect();

        json!({
            "head": { "vars": self.variables },
            "results": { "bindings": bindings },
        })
    }
}

fn node_to_json(node: &Node) -> JsonValue {
    match node {
        Node::Resource(n) => json!({ "type": "uri", "value": n.as_str() }),
        Node::Blank(b) => json!({ "type": "bnode", "value": b.as_str() }),
        Node::Literal(l) => {
            let mut term = json!({ "type": "literal", "value": l.value() });
            if let Some(language) = l.language() {
                term["xml:lang"] = json!(language);
            } else if let Some(datatype) = l.datatype() {
                term["datatype"] = json!(datatype);
            }
            term
        }
    }
}
