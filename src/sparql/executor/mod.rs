//! Query execution engine using the Volcano iterator model

pub mod operator;
pub mod planner;
pub mod record;

pub use operator::{OperatorBox, PhysicalOperator};
pub use planner::{ExecutionPlan, QueryPlanner};
pub use record::Record;

use super::algebra::Query;
use super::results::QuerySolutions;
use crate::rdf::Model;
use thiserror::Error;

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Planning error
    #[error("Planning error: {0}")]
    PlanningError(String),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Read-only query executor over one model
pub struct QueryExecutor<'a> {
    model: &'a Model,
    planner: QueryPlanner,
}

impl<'a> QueryExecutor<'a> {
    /// Create a new query executor
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            planner: QueryPlanner::new(),
        }
    }

    /// Plan a query and return a lazy stream of its solutions
    pub fn execute(&self, query: &Query) -> ExecutionResult<QuerySolutions<'a>> {
        let plan = self.planner.plan(query)?;
        Ok(QuerySolutions::new(self.model, plan))
    }
}
