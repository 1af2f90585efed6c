//! Query planner - converts the query algebra to an operator tree

use super::operator::{
    DistinctOperator, FilterOperator, JoinOperator, LimitOperator, PatternMatchOperator,
    ProjectOperator, SingletonOperator, UnionOperator,
};
use super::{ExecutionError, ExecutionResult, OperatorBox};
use crate::sparql::algebra::{GraphPattern, Query, TriplePattern};

/// Execution plan - a tree of physical operators
pub struct ExecutionPlan {
    /// Root operator
    pub root: OperatorBox,
    /// Output column names
    pub output_columns: Vec<String>,
}

/// Query planner
#[derive(Debug, Default)]
pub struct QueryPlanner;

impl QueryPlanner {
    /// Create a new query planner
    pub fn new() -> Self {
        Self
    }

    /// Plan a query
    ///
    /// Every projected variable must occur in the WHERE clause.
    pub fn plan(&self, query: &Query) -> ExecutionResult<ExecutionPlan> {
        let output_columns = query.output_variables();
        let in_scope = query.pattern.variables();
        if let Some(missing) = output_columns.iter().find(|v| !in_scope.contains(*v)) {
            return Err(ExecutionError::PlanningError(format!(
                "Variable ?{} does not occur in the WHERE clause",
                missing
            )));
        }

        let mut operator = self.plan_pattern(&query.pattern);
        operator = Box::new(ProjectOperator::new(operator, output_columns.clone()));

        if query.distinct {
            operator = Box::new(DistinctOperator::new(operator));
        }
        if let Some(limit) = query.limit {
            operator = Box::new(LimitOperator::new(operator, limit));
        }

        Ok(ExecutionPlan {
            root: operator,
            output_columns,
        })
    }

    fn plan_pattern(&self, pattern: &GraphPattern) -> OperatorBox {
        match pattern {
            GraphPattern::Bgp(triples) => self.plan_bgp(triples, Box::new(SingletonOperator::new())),
            GraphPattern::Join(left, right) => {
                let left = self.plan_pattern(left);
                match right.as_ref() {
                    // Triple patterns are evaluated per left row with its bindings substituted
                    GraphPattern::Bgp(triples) => self.plan_bgp(triples, left),
                    _ => Box::new(JoinOperator::new(left, self.plan_pattern(right))),
                }
            }
            GraphPattern::Union(left, right) => Box::new(UnionOperator::new(
                self.plan_pattern(left),
                self.plan_pattern(right),
            )),
            GraphPattern::Filter { expression, inner } => {
                Box::new(FilterOperator::new(self.plan_pattern(inner), expression.clone()))
            }
        }
    }

    fn plan_bgp(&self, triples: &[TriplePattern], input: OperatorBox) -> OperatorBox {
        triples.iter().fold(input, |input, triple| -> OperatorBox {
            Box::new(PatternMatchOperator::new(input, triple.clone()))
        })
    }
}
