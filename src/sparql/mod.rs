//! SPARQL query support
//!
//! This module implements a SELECT-only SPARQL subset: basic graph
//! patterns, `UNION`, `FILTER`, `DISTINCT` and `LIMIT`. Queries are parsed
//! with a pest grammar, planned into Volcano-style operators and evaluated
//! lazily against a [`Model`].
//!
//! # Example
//!
//! ```rust
//! use provenance_rdf::rdf::{Model, Statement};
//! use provenance_rdf::rdf::namespace::dc;
//! use provenance_rdf::sparql::QueryEngine;
//!
//! let mut model = Model::new();
//! model.add(Statement::with_literal("about:this", dc::CREATOR, "Alice").unwrap());
//!
//! let query = r#"
//!     PREFIX dc: <http://purl.org/dc/elements/1.1/>
//!     SELECT ?name WHERE {
//!         ?image dc:creator ?name .
//!     }
//! "#;
//!
//! let names: Vec<String> = QueryEngine::new()
//!     .query(&model, query)
//!     .unwrap()
//!     .filter_map(|row| row.ok()?.value("name").map(str::to_string))
//!     .collect();
//! assert_eq!(names, vec!["Alice"]);
//! ```

mod algebra;
mod executor;
mod parser;
mod results;

pub use algebra::{Expression, GraphPattern, Query, TermPattern, TriplePattern};
pub use executor::{ExecutionError, ExecutionResult, QueryExecutor};
pub use parser::{parse_query, ParseError as SparqlParseError, ParseResult as SparqlParseResult};
pub use results::{QuerySolution, QuerySolutions, SparqlResults};

use crate::rdf::Model;
use thiserror::Error;
use tracing::debug;

/// SPARQL errors
#[derive(Error, Debug)]
pub enum SparqlError {
    /// Parse error
    #[error(transparent)]
    Parse(#[from] SparqlParseError),

    /// Execution error
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

pub type SparqlResult<T> = Result<T, SparqlError>;

/// A parsed query, reusable across models
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    query: Query,
}

impl PreparedQuery {
    /// The parsed query algebra
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Evaluate against a model
    pub fn execute<'m>(&self, model: &'m Model) -> SparqlResult<QuerySolutions<'m>> {
        Ok(QueryExecutor::new(model).execute(&self.query)?)
    }
}

/// SPARQL query engine
#[derive(Debug, Default)]
pub struct QueryEngine;

impl QueryEngine {
    /// Create a new SPARQL engine
    pub fn new() -> Self {
        Self
    }

    /// Parse a query for later execution
    pub fn prepare(&self, query_str: &str) -> SparqlResult<PreparedQuery> {
        let query = parse_query(query_str)?;
        debug!("Prepared query with columns {:?}", query.output_variables());
        Ok(PreparedQuery { query })
    }

    /// Execute a prepared query
    pub fn execute<'m>(
        &self,
        model: &'m Model,
        prepared: &PreparedQuery,
    ) -> SparqlResult<QuerySolutions<'m>> {
        prepared.execute(model)
    }

    /// Parse and execute a query in one step
    pub fn query<'m>(&self, model: &'m Model, query_str: &str) -> SparqlResult<QuerySolutions<'m>> {
        self.prepare(query_str)?.execute(model)
    }
}
