//! In-memory statement store
//!
//! A [`Model`] keeps statements in insertion order and allows duplicates.
//! Subject, predicate and object indices hold slot positions in ascending
//! order, so indexed lookups still yield statements in insertion order.

use super::types::{NamedNode, Node, PartialStatement, Statement, Subject};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Empty slots tolerated before [`Model::remove`] rebuilds the store
const COMPACT_THRESHOLD: usize = 64;

/// RDF graph with per-instance indices
///
/// Implements:
/// - subject index (Subject -> slots)
/// - predicate index (Predicate -> slots)
/// - object index (Object -> slots)
///
/// Removed statements leave an empty slot behind. Once empty slots outnumber
/// live statements the store is rebuilt, so every index list stays sorted
/// and storage stays proportional to `len`.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Statement slots (primary storage, insertion order)
    slots: Vec<Option<Statement>>,

    /// Subject -> slots
    subject_index: HashMap<Subject, Vec<usize>>,

    /// Predicate -> slots
    predicate_index: HashMap<NamedNode, Vec<usize>>,

    /// Object -> slots
    object_index: HashMap<Node, Vec<usize>>,

    /// Number of live statements
    len: usize,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement. Duplicates are kept.
    pub fn add(&mut self, statement: Statement) {
        let slot = self.slots.len();

        self.subject_index
            .entry(statement.subject.clone())
            .or_default()
            .push(slot);
        self.predicate_index
            .entry(statement.predicate.clone())
            .or_default()
            .push(slot);
        self.object_index
            .entry(statement.object.clone())
            .or_default()
            .push(slot);

        self.slots.push(Some(statement));
        self.len += 1;
    }

    /// Append every statement produced by an iterator
    pub fn add_statements(&mut self, statements: impl IntoIterator<Item = Statement>) {
        for statement in statements {
            self.add(statement);
        }
    }

    /// Check if a statement exists in the model
    pub fn contains(&self, statement: &Statement) -> bool {
        self.find_slot(statement).is_some()
    }

    /// Remove the first stored occurrence of a statement.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, statement: &Statement) -> bool {
        let Some(slot) = self.find_slot(statement) else {
            return false;
        };

        self.slots[slot] = None;
        self.len -= 1;

        unindex(&mut self.subject_index, &statement.subject, slot);
        unindex(&mut self.predicate_index, &statement.predicate, slot);
        unindex(&mut self.object_index, &statement.object, slot);

        if self.slots.len() - self.len > self.len.max(COMPACT_THRESHOLD) {
            self.compact();
        }
        true
    }

    /// Remove every statement matching a pattern, returning how many went
    pub fn remove_matching(&mut self, pattern: &PartialStatement) -> usize {
        let matched: Vec<Statement> = self.find(pattern).cloned().collect();
        for statement in &matched {
            self.remove(statement);
        }
        matched.len()
    }

    /// Get the number of stored statements, duplicates included
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the model is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clear all statements
    pub fn clear(&mut self) {
        self.slots.clear();
        self.subject_index.clear();
        self.predicate_index.clear();
        self.object_index.clear();
        self.len = 0;
    }

    /// Stream every statement in insertion order
    pub fn as_stream(&self) -> Statements<'_> {
        Statements {
            slots: &self.slots,
            candidates: Candidates::Scan(0..self.slots.len()),
            pattern: None,
        }
    }

    /// Stream the statements matching a partial statement, in insertion order
    pub fn find(&self, pattern: &PartialStatement) -> Statements<'_> {
        let candidates = match self.narrowest_index(pattern) {
            Some(Some(slots)) => Candidates::Indexed(slots.iter()),
            Some(None) => Candidates::Empty,
            None => Candidates::Scan(0..self.slots.len()),
        };

        Statements {
            slots: &self.slots,
            candidates,
            pattern: Some(pattern.clone()),
        }
    }

    /// Objects of every `(subject, predicate, ?)` statement
    pub fn targets<'a>(
        &'a self,
        subject: &Subject,
        predicate: &NamedNode,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        let pattern = PartialStatement::new(Some(subject.clone()), Some(predicate.clone()), None);
        self.find(&pattern).map(|statement| &statement.object)
    }

    /// Append every statement of `other` (full union, duplicates preserved)
    pub fn combine(&mut self, other: &Model) {
        let before = self.len;
        self.add_statements(other.as_stream().cloned());
        debug!("Combined {} statements into model ({} -> {})", other.len(), before, self.len);
    }

    /// Deduplicate `other` in place, then append it to this model.
    ///
    /// Only `other` is deduplicated: statements already present in `self`
    /// are appended again.
    pub fn combine_check(&mut self, other: &mut Model) {
        other.dedup();
        self.combine(other);
    }

    /// Drop repeated statements, keeping the first occurrence of each
    pub fn dedup(&mut self) {
        let mut seen = HashSet::new();
        let mut unique = Model::new();
        for statement in self.as_stream() {
            if seen.insert(statement) {
                unique.add(statement.clone());
            }
        }
        if unique.len() != self.len {
            debug!("Removed {} duplicate statements", self.len - unique.len());
            *self = unique;
        }
    }

    // Private helper methods

    /// Rebuild slots and indices from the live statements, in order
    fn compact(&mut self) {
        let live: Vec<Statement> = self.slots.drain(..).flatten().collect();
        debug!("Compacting model to {} statements", live.len());
        self.clear();
        self.add_statements(live);
    }

    fn find_slot(&self, statement: &Statement) -> Option<usize> {
        self.subject_index
            .get(&statement.subject)?
            .iter()
            .copied()
            .find(|&slot| self.slots[slot].as_ref() == Some(statement))
    }

    /// `None` means no bound field (full scan); `Some(None)` means a bound
    /// field has no index entry, so nothing can match.
    fn narrowest_index(&self, pattern: &PartialStatement) -> Option<Option<&Vec<usize>>> {
        let mut best: Option<Option<&Vec<usize>>> = None;

        let lookups = [
            pattern.subject.as_ref().map(|s| self.subject_index.get(s)),
            pattern.predicate.as_ref().map(|p| self.predicate_index.get(p)),
            pattern.object.as_ref().map(|o| self.object_index.get(o)),
        ];

        for lookup in lookups.into_iter().flatten() {
            match (lookup, best) {
                (None, _) => return Some(None),
                (Some(slots), Some(Some(current))) if current.len() <= slots.len() => {}
                (Some(slots), _) => best = Some(Some(slots)),
            }
        }

        best
    }
}

fn unindex<K: std::hash::Hash + Eq>(index: &mut HashMap<K, Vec<usize>>, key: &K, slot: usize) {
    if let Some(slots) = index.get_mut(key) {
        if let Ok(position) = slots.binary_search(&slot) {
            slots.remove(position);
        }
        if slots.is_empty() {
            index.remove(key);
        }
    }
}

enum Candidates<'a> {
    Scan(std::ops::Range<usize>),
    Indexed(std::slice::Iter<'a, usize>),
    Empty,
}

/// Lazy, one-shot iterator over statements of a [`Model`]
pub struct Statements<'a> {
    slots: &'a [Option<Statement>],
    candidates: Candidates<'a>,
    pattern: Option<PartialStatement>,
}

impl<'a> Iterator for Statements<'a> {
    type Item = &'a Statement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = match &mut self.candidates {
                Candidates::Scan(range) => range.next()?,
                Candidates::Indexed(iter) => *iter.next()?,
                Candidates::Empty => return None,
            };

            let Some(statement) = self.slots[slot].as_ref() else {
                continue;
            };

            match &self.pattern {
                Some(pattern) if !pattern.matches(statement) => continue,
                _ => return Some(statement),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::namespace::{dc, ABOUT_THIS};

    fn create_test_statement() -> Statement {
        Statement::with_literal(ABOUT_THIS, dc::CREATOR, "Alice").unwrap()
    }

    #[test]
    fn test_add_and_contains() {
        let mut model = Model::new();
        let statement = create_test_statement();

        model.add(statement.clone());
        assert_eq!(model.len(), 1);
        assert!(model.contains(&statement));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut model = Model::new();
        let statement = create_test_statement();

        model.add(statement.clone());
        model.add(statement.clone());
        assert_eq!(model.len(), 2);
        assert_eq!(model.as_stream().count(), 2);
    }

    #[test]
    fn test_remove_one_occurrence() {
        let mut model = Model::new();
        let statement = create_test_statement();

        model.add(statement.clone());
        model.add(statement.clone());

        assert!(model.remove(&statement));
        assert_eq!(model.len(), 1);
        assert!(model.contains(&statement));

        assert!(model.remove(&statement));
        assert!(!model.contains(&statement));
        assert!(model.is_empty());

        assert!(!model.remove(&statement));
    }

    #[test]
    fn test_find_uses_any_bound_field() {
        let mut model = Model::new();
        model.add(Statement::with_literal(ABOUT_THIS, dc::CREATOR, "Alice").unwrap());
        model.add(Statement::with_literal(ABOUT_THIS, dc::TITLE, "Sunset").unwrap());
        model.add(Statement::with_literal("http://example.org/x", dc::CREATOR, "Bob").unwrap());

        let creator = NamedNode::new(dc::CREATOR).unwrap();
        let by_predicate = PartialStatement::new(None, Some(creator), None);
        assert_eq!(model.find(&by_predicate).count(), 2);

        let by_object = PartialStatement::new(None, None, Some(Node::literal("Sunset")));
        assert_eq!(model.find(&by_object).count(), 1);

        let missing = PartialStatement::new(None, None, Some(Node::literal("nobody")));
        assert_eq!(model.find(&missing).count(), 0);
    }

    #[test]
    fn test_find_after_remove_keeps_order() {
        let mut model = Model::new();
        let first = Statement::with_literal(ABOUT_THIS, dc::CREATOR, "A").unwrap();
        let second = Statement::with_literal(ABOUT_THIS, dc::CREATOR, "B").unwrap();
        let third = Statement::with_literal(ABOUT_THIS, dc::CREATOR, "C").unwrap();
        model.add(first.clone());
        model.add(second.clone());
        model.add(third.clone());

        model.remove(&second);

        let subject = Subject::resource(ABOUT_THIS).unwrap();
        let found: Vec<_> = model
            .find(&PartialStatement::new(Some(subject), None, None))
            .cloned()
            .collect();
        assert_eq!(found, vec![first, third]);
    }

    #[test]
    fn test_churn_keeps_storage_bounded() {
        let mut model = Model::new();
        let kept = Statement::with_literal(ABOUT_THIS, dc::TITLE, "Kept").unwrap();
        let churned = create_test_statement();
        model.add(kept.clone());

        for _ in 0..10_000 {
            model.add(churned.clone());
            assert!(model.remove(&churned));
        }

        assert_eq!(model.len(), 1);
        assert!(model.slots.len() <= 2 * COMPACT_THRESHOLD + 2);
        let creator = NamedNode::new(dc::CREATOR).unwrap();
        assert!(!model.predicate_index.contains_key(&creator));

        let found: Vec<_> = model.as_stream().cloned().collect();
        assert_eq!(found, vec![kept]);
    }

    #[test]
    fn test_compaction_keeps_insertion_order() {
        let mut model = Model::new();
        let statements: Vec<_> = (0..200)
            .map(|i| Statement::with_literal(ABOUT_THIS, dc::SUBJECT, &format!("tag{i}")).unwrap())
            .collect();
        model.add_statements(statements.iter().cloned());

        // Keep every fourth; removing the rest triggers a rebuild
        for (i, statement) in statements.iter().enumerate() {
            if i % 4 != 0 {
                assert!(model.remove(statement));
            }
        }
        assert_eq!(model.len(), 50);
        assert!(model.slots.len() < statements.len());

        let subject = Subject::resource(ABOUT_THIS).unwrap();
        let found: Vec<_> = model
            .find(&PartialStatement::new(Some(subject), None, None))
            .cloned()
            .collect();
        let expected: Vec<_> = statements.iter().step_by(4).cloned().collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_targets() {
        let mut model = Model::new();
        model.add(Statement::from_uris(ABOUT_THIS, dc::SOURCE, "http://example.org/a").unwrap());
        model.add(Statement::from_uris(ABOUT_THIS, dc::SOURCE, "http://example.org/b").unwrap());

        let subject = Subject::resource(ABOUT_THIS).unwrap();
        let source = NamedNode::new(dc::SOURCE).unwrap();
        let uris: Vec<_> = model.targets(&subject, &source).filter_map(Node::as_uri).collect();
        assert_eq!(uris, vec!["http://example.org/a", "http://example.org/b"]);
    }

    #[test]
    fn test_remove_matching() {
        let mut model = Model::new();
        model.add(Statement::with_literal(ABOUT_THIS, dc::TITLE, "Old").unwrap());
        model.add(Statement::with_literal(ABOUT_THIS, dc::TITLE, "Older").unwrap());
        model.add(Statement::with_literal(ABOUT_THIS, dc::CREATOR, "Alice").unwrap());

        let title = NamedNode::new(dc::TITLE).unwrap();
        let removed = model.remove_matching(&PartialStatement::new(None, Some(title), None));
        assert_eq!(removed, 2);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut model = Model::new();
        let a = Statement::with_literal(ABOUT_THIS, dc::CREATOR, "A").unwrap();
        let b = Statement::with_literal(ABOUT_THIS, dc::CREATOR, "B").unwrap();
        model.add(a.clone());
        model.add(b.clone());
        model.add(a.clone());

        model.dedup();
        let statements: Vec<_> = model.as_stream().cloned().collect();
        assert_eq!(statements, vec![a, b]);
    }

    #[test]
    fn test_empty_model_is_safe() {
        let model = Model::new();
        assert_eq!(model.as_stream().count(), 0);
        assert_eq!(model.find(&PartialStatement::any()).count(), 0);
        assert!(!model.contains(&create_test_statement()));
    }

    #[test]
    fn test_clear() {
        let mut model = Model::new();
        model.add(create_test_statement());
        model.clear();
        assert!(model.is_empty());
        assert_eq!(model.as_stream().count(), 0);
    }
}
