//! Physical operators for query execution (Volcano iterator model)

use super::{ExecutionResult, Record};
use crate::rdf::namespace::xsd;
use crate::rdf::{Model, Node, PartialStatement, Subject};
use crate::sparql::algebra::{Expression, TermPattern, TriplePattern};
use std::collections::{HashSet, VecDeque};

/// Physical operator trait - all operators implement this
pub trait PhysicalOperator: Send {
    /// Get the next record from this operator
    fn next(&mut self, model: &Model) -> ExecutionResult<Option<Record>>;
}

pub type OperatorBox = Box<dyn PhysicalOperator>;

/// Produces a single empty record: the identity for joins
pub struct SingletonOperator {
    done: bool,
}

impl SingletonOperator {
    pub fn new() -> Self {
        Self { done: false }
    }
}

impl Default for SingletonOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalOperator for SingletonOperator {
    fn next(&mut self, _model: &Model) -> ExecutionResult<Option<Record>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;
        Ok(Some(Record::new()))
    }
}

/// Triple pattern operator: extends every input row with each statement
/// matching the pattern after substituting the row's bindings
pub struct PatternMatchOperator {
    input: OperatorBox,
    pattern: TriplePattern,
    buffer: VecDeque<Record>,
}

/// A pattern position after substituting the current row
enum Slot {
    Bound(Node),
    Free,
}

impl PatternMatchOperator {
    pub fn new(input: OperatorBox, pattern: TriplePattern) -> Self {
        Self {
            input,
            pattern,
            buffer: VecDeque::new(),
        }
    }

    fn resolve(term: &TermPattern, record: &Record) -> Slot {
        match term {
            TermPattern::Node(node) => Slot::Bound(node.clone()),
            TermPattern::Variable(name) => match record.get(name) {
                Some(node) => Slot::Bound(node.clone()),
                None => Slot::Free,
            },
        }
    }

    fn bind(record: &mut Record, term: &TermPattern, value: Node) -> bool {
        match term {
            TermPattern::Variable(name) => record.bind_compatible(name, value),
            TermPattern::Node(_) => true,
        }
    }

    fn expand(&mut self, record: &Record, model: &Model) {
        // A literal subject or a non-resource predicate matches nothing
        let subject = match Self::resolve(&self.pattern.subject, record) {
            Slot::Bound(node) => match Subject::try_from(node) {
                Ok(subject) => Some(subject),
                Err(_) => return,
            },
            Slot::Free => None,
        };
        let predicate = match Self::resolve(&self.pattern.predicate, record) {
            Slot::Bound(Node::Resource(predicate)) => Some(predicate),
            Slot::Bound(_) => return,
            Slot::Free => None,
        };
        let object = match Self::resolve(&self.pattern.object, record) {
            Slot::Bound(node) => Some(node),
            Slot::Free => None,
        };

        let partial = PartialStatement::new(subject, predicate, object);
        for statement in model.find(&partial) {
            let mut row = record.clone();
            // Repeated variables within one pattern must agree
            if Self::bind(&mut row, &self.pattern.subject, statement.subject.clone().into())
                && Self::bind(&mut row, &self.pattern.predicate, statement.predicate.clone().into())
                && Self::bind(&mut row, &self.pattern.object, statement.object.clone())
            {
                self.buffer.push_back(row);
            }
        }
    }
}

impl PhysicalOperator for PatternMatchOperator {
    fn next(&mut self, model: &Model) -> ExecutionResult<Option<Record>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some(record));
            }
            match self.input.next(model)? {
                Some(record) => self.expand(&record, model),
                None => return Ok(None),
            }
        }
    }
}

/// Join operator: pairs every left row with every compatible right row
pub struct JoinOperator {
    left: OperatorBox,
    right: OperatorBox,
    right_records: Vec<Record>,
    current_left: Option<Record>,
    right_index: usize,
    materialized: bool,
}

impl JoinOperator {
    pub fn new(left: OperatorBox, right: OperatorBox) -> Self {
        Self {
            left,
            right,
            right_records: Vec::new(),
            current_left: None,
            right_index: 0,
            materialized: false,
        }
    }

    fn materialize(&mut self, model: &Model) -> ExecutionResult<()> {
        if self.materialized {
            return Ok(());
        }
        while let Some(record) = self.right.next(model)? {
            self.right_records.push(record);
        }
        self.materialized = true;
        Ok(())
    }
}

impl PhysicalOperator for JoinOperator {
    fn next(&mut self, model: &Model) -> ExecutionResult<Option<Record>> {
        self.materialize(model)?;
        if self.right_records.is_empty() {
            return Ok(None);
        }

        loop {
            let Some(left_record) = &self.current_left else {
                match self.left.next(model)? {
                    Some(record) => {
                        self.current_left = Some(record);
                        self.right_index = 0;
                        continue;
                    }
                    None => return Ok(None),
                }
            };

            while self.right_index < self.right_records.len() {
                let right_record = &self.right_records[self.right_index];
                self.right_index += 1;
                if let Some(merged) = left_record.merge_compatible(right_record) {
                    return Ok(Some(merged));
                }
            }

            self.current_left = None;
        }
    }
}

/// Union operator: all left rows, then all right rows (no deduplication)
pub struct UnionOperator {
    left: OperatorBox,
    right: OperatorBox,
    left_done: bool,
}

impl UnionOperator {
    pub fn new(left: OperatorBox, right: OperatorBox) -> Self {
        Self {
            left,
            right,
            left_done: false,
        }
    }
}

impl PhysicalOperator for UnionOperator {
    fn next(&mut self, model: &Model) -> ExecutionResult<Option<Record>> {
        if !self.left_done {
            if let Some(record) = self.left.next(model)? {
                return Ok(Some(record));
            }
            self.left_done = true;
        }
        self.right.next(model)
    }
}

/// Filter operator: FILTER(isLiteral(?x) || ?x != <uri>)
pub struct FilterOperator {
    /// Input operator
    input: OperatorBox,
    /// Predicate expression
    predicate: Expression,
}

/// Intermediate value of expression evaluation
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Node(Node),
    Boolean(bool),
}

impl FilterOperator {
    /// Create a new filter operator
    pub fn new(input: OperatorBox, predicate: Expression) -> Self {
        Self { input, predicate }
    }

    /// A row passes only when the predicate is true; false and error both reject it
    fn evaluate_predicate(&self, record: &Record) -> bool {
        effective_boolean(&self.predicate, record) == Some(true)
    }
}

impl PhysicalOperator for FilterOperator {
    fn next(&mut self, model: &Model) -> ExecutionResult<Option<Record>> {
        while let Some(record) = self.input.next(model)? {
            if self.evaluate_predicate(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

/// Evaluate an expression; `None` is the SPARQL error value
fn evaluate(expression: &Expression, record: &Record) -> Option<Value> {
    match expression {
        Expression::Variable(name) => record.get(name).cloned().map(Value::Node),
        Expression::Constant(node) => Some(Value::Node(node.clone())),
        Expression::Bound(name) => Some(Value::Boolean(record.has(name))),
        Expression::IsLiteral(inner) => evaluate(inner, record)
            .map(|value| Value::Boolean(matches!(value, Value::Node(Node::Literal(_))))),
        Expression::IsIri(inner) => evaluate(inner, record)
            .map(|value| Value::Boolean(matches!(value, Value::Node(Node::Resource(_))))),
        Expression::IsBlank(inner) => evaluate(inner, record)
            .map(|value| Value::Boolean(matches!(value, Value::Node(Node::Blank(_))))),
        Expression::Equal(left, right) => {
            let (left, right) = (evaluate(left, record)?, evaluate(right, record)?);
            Some(Value::Boolean(left == right))
        }
        Expression::NotEqual(left, right) => {
            let (left, right) = (evaluate(left, record)?, evaluate(right, record)?);
            Some(Value::Boolean(left != right))
        }
        Expression::Not(inner) => effective_boolean(inner, record).map(|b| Value::Boolean(!b)),
        Expression::And(left, right) => {
            match (effective_boolean(left, record), effective_boolean(right, record)) {
                (Some(false), _) | (_, Some(false)) => Some(Value::Boolean(false)),
                (Some(true), Some(true)) => Some(Value::Boolean(true)),
                _ => None,
            }
        }
        Expression::Or(left, right) => {
            match (effective_boolean(left, record), effective_boolean(right, record)) {
                (Some(true), _) | (_, Some(true)) => Some(Value::Boolean(true)),
                (Some(false), Some(false)) => Some(Value::Boolean(false)),
                _ => None,
            }
        }
    }
}

/// Effective boolean value of an expression
fn effective_boolean(expression: &Expression, record: &Record) -> Option<bool> {
    match evaluate(expression, record)? {
        Value::Boolean(b) => Some(b),
        Value::Node(Node::Literal(literal)) => match literal.datatype() {
            None => Some(!literal.value().is_empty()),
            Some(xsd::STRING) => Some(!literal.value().is_empty()),
            Some(xsd::BOOLEAN) => Some(matches!(literal.value(), "true" | "1")),
            Some(xsd::INTEGER) => literal.value().parse::<i64>().ok().map(|n| n != 0),
            Some(_) => None,
        },
        Value::Node(_) => None,
    }
}

/// Project operator: keeps only the selected variables
pub struct ProjectOperator {
    input: OperatorBox,
    variables: Vec<String>,
}

impl ProjectOperator {
    pub fn new(input: OperatorBox, variables: Vec<String>) -> Self {
        Self { input, variables }
    }
}

impl PhysicalOperator for ProjectOperator {
    fn next(&mut self, model: &Model) -> ExecutionResult<Option<Record>> {
        Ok(self
            .input
            .next(model)?
            .map(|record| record.project(&self.variables)))
    }
}

/// Distinct operator: SELECT DISTINCT
pub struct DistinctOperator {
    input: OperatorBox,
    seen: HashSet<Record>,
}

impl DistinctOperator {
    pub fn new(input: OperatorBox) -> Self {
        Self {
            input,
            seen: HashSet::new(),
        }
    }
}

impl PhysicalOperator for DistinctOperator {
    fn next(&mut self, model: &Model) -> ExecutionResult<Option<Record>> {
        while let Some(record) = self.input.next(model)? {
            if self.seen.insert(record.clone()) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

/// Limit operator: LIMIT 10
pub struct LimitOperator {
    /// Input operator
    input: OperatorBox,
    /// Maximum number of records
    limit: usize,
    /// Current count
    count: usize,
}

impl LimitOperator {
    /// Create a new limit operator
    pub fn new(input: OperatorBox, limit: usize) -> Self {
        Self { input, limit, count: 0 }
    }
}

impl PhysicalOperator for LimitOperator {
    fn next(&mut self, model: &Model) -> ExecutionResult<Option<Record>> {
        if self.count >= self.limit {
            return Ok(None);
        }

        if let Some(record) = self.input.next(model)? {
            self.count += 1;
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }
}
