//! Binding rows flowing through the operator pipeline

use crate::rdf::Node;
use std::collections::BTreeMap;

/// A single solution row: variable name -> bound node
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    bindings: BTreeMap<String, Node>,
}

impl Record {
    /// Create a new empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable to a value
    pub fn bind(&mut self, variable: impl Into<String>, value: Node) {
        self.bindings.insert(variable.into(), value);
    }

    /// Get a bound value
    pub fn get(&self, variable: &str) -> Option<&Node> {
        self.bindings.get(variable)
    }

    /// Check if a variable is bound
    pub fn has(&self, variable: &str) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Bind `variable` unless it already holds a different value.
    ///
    /// Returns `false` on a conflicting binding.
    pub fn bind_compatible(&mut self, variable: &str, value: Node) -> bool {
        match self.bindings.get(variable) {
            Some(existing) => *existing == value,
            None => {
                self.bindings.insert(variable.to_string(), value);
                true
            }
        }
    }

    /// Merge two rows that agree on every shared variable
    pub fn merge_compatible(&self, other: &Record) -> Option<Record> {
        let mut merged = self.clone();
        for (variable, value) in &other.bindings {
            if !merged.bind_compatible(variable, value.clone()) {
                return None;
            }
        }
        Some(merged)
    }

    /// Clone with only specified variables
    pub fn project(&self, variables: &[String]) -> Record {
        let mut record = Record::new();
        for variable in variables {
            if let Some(value) = self.bindings.get(variable) {
                record.bind(variable.clone(), value.clone());
            }
        }
        record
    }
}
