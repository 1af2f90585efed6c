//! Display tree over a model
//!
//! Walks the statements of a root subject into `(name, value)` rows for a
//! tree view. Declared sources (`dc:source` resources) are additionally
//! listed as top-level `(source)` rows holding that source's own statements.

use crate::rdf::namespace::dc;
use crate::rdf::{Model, NamedNode, Node, PartialStatement, Subject, Vocab};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{self, Write as _};

pub const DEFAULT_ROW: &str = "(default)";
pub const SOURCE_ROW: &str = "(source)";
pub const BLANK_VALUE: &str = "Blank node";

/// One row of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    pub name: String,
    pub value: Option<String>,
    pub children: Vec<TreeRow>,
}

impl TreeRow {
    fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            children: Vec::new(),
        }
    }
}

/// Top-level rows: the root subject first, then one row per source found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributionTree {
    pub rows: Vec<TreeRow>,
}

impl AttributionTree {
    /// Walk `model` from `root`.
    ///
    /// Each subject is expanded at most once, so cyclic source chains
    /// terminate; a revisited subject still gets its row, without children.
    pub fn build(model: &Model, root: &Subject, vocab: &Vocab) -> Self {
        let mut walker = Walker {
            model,
            vocab,
            visited: HashSet::new(),
            top: vec![TreeRow::new(DEFAULT_ROW, None)],
        };

        walker.visited.insert(root.clone());
        let children = walker.fill(root);
        walker.top[0].children = children;

        AttributionTree { rows: walker.top }
    }

    /// Check whether the root has no statements and no source was found
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.children.is_empty())
    }
}

impl fmt::Display for AttributionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for row in &self.rows {
            render(row, 0, &mut out)?;
        }
        f.write_str(&out)
    }
}

fn render(row: &TreeRow, depth: usize, out: &mut String) -> fmt::Result {
    write!(out, "{:indent$}{}", "", row.name, indent = depth * 2)?;
    if let Some(value) = &row.value {
        write!(out, ": {}", value)?;
    }
    out.push('\n');
    for child in &row.children {
        render(child, depth + 1, out)?;
    }
    Ok(())
}

struct Walker<'m> {
    model: &'m Model,
    vocab: &'m Vocab,
    visited: HashSet<Subject>,
    top: Vec<TreeRow>,
}

impl Walker<'_> {
    fn fill(&mut self, subject: &Subject) -> Vec<TreeRow> {
        let pattern = PartialStatement::new(Some(subject.clone()), None, None);
        let model = self.model;
        let mut rows = Vec::new();

        for statement in model.find(&pattern) {
            let name = self.vocab.shorten(statement.predicate.as_str());

            match &statement.object {
                Node::Literal(literal) => {
                    rows.push(TreeRow::new(name, Some(literal.value().to_string())));
                }
                Node::Resource(resource) => {
                    let value = self.vocab.shorten(resource.as_str());
                    rows.push(TreeRow::new(name, Some(value.clone())));

                    if is_source(&statement.predicate) {
                        // Placeholder first, so nested sources land after this one
                        let index = self.top.len();
                        self.top.push(TreeRow::new(SOURCE_ROW, Some(value)));
                        let children = self.expand(Subject::Resource(resource.clone()));
                        self.top[index].children = children;
                    }
                }
                Node::Blank(blank) => {
                    let mut row = TreeRow::new(name, Some(BLANK_VALUE.to_string()));
                    row.children = self.expand(Subject::Blank(blank.clone()));
                    rows.push(row);
                }
            }
        }

        rows
    }

    fn expand(&mut self, subject: Subject) -> Vec<TreeRow> {
        if self.visited.insert(subject.clone()) {
            self.fill(&subject)
        } else {
            Vec::new()
        }
    }
}

fn is_source(predicate: &NamedNode) -> bool {
    predicate.as_str() == dc::SOURCE
}
