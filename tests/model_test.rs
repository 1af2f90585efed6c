use provenance_rdf::rdf::namespace::dc;
use provenance_rdf::{Model, NamedNode, Node, PartialStatement, Statement, Subject};

fn stmt(subject: &str, predicate: &str, value: &str) -> Statement {
    Statement::with_literal(subject, predicate, value).unwrap()
}

#[test]
fn test_wildcard_find_returns_every_occurrence_in_order() {
    let mut model = Model::new();
    let a = stmt("http://example.org/a", dc::TITLE, "A");
    let b = stmt("http://example.org/b", dc::TITLE, "B");
    model.add(a.clone());
    model.add(b.clone());
    model.add(a.clone());

    let found: Vec<_> = model.find(&PartialStatement::any()).cloned().collect();
    assert_eq!(found, vec![a.clone(), b, a]);
}

#[test]
fn test_find_with_each_wildcard_combination() {
    let mut model = Model::new();
    model.add(stmt("http://example.org/a", dc::TITLE, "A"));
    model.add(stmt("http://example.org/a", dc::CREATOR, "Alice"));
    model.add(stmt("http://example.org/b", dc::CREATOR, "Alice"));

    let a = Subject::resource("http://example.org/a").unwrap();
    let creator = NamedNode::new(dc::CREATOR).unwrap();
    let alice = Node::literal("Alice");

    let count = |s: Option<&Subject>, p: Option<&NamedNode>, o: Option<&Node>| {
        model
            .find(&PartialStatement::new(s.cloned(), p.cloned(), o.cloned()))
            .count()
    };

    assert_eq!(count(Some(&a), None, None), 2);
    assert_eq!(count(None, Some(&creator), None), 2);
    assert_eq!(count(None, None, Some(&alice)), 2);
    assert_eq!(count(Some(&a), Some(&creator), None), 1);
    assert_eq!(count(Some(&a), None, Some(&alice)), 1);
    assert_eq!(count(None, Some(&creator), Some(&alice)), 2);
    assert_eq!(count(Some(&a), Some(&creator), Some(&alice)), 1);
    assert_eq!(count(None, None, Some(&Node::literal("nobody"))), 0);
}

#[test]
fn test_remove_one_occurrence() {
    let mut model = Model::new();
    let a = stmt("http://example.org/a", dc::TITLE, "A");
    model.add(a.clone());
    model.add(a.clone());

    assert!(model.remove(&a));
    assert_eq!(model.len(), 1);
    assert!(model.contains(&a));

    assert!(model.remove(&a));
    assert!(!model.remove(&a));
    assert!(model.is_empty());
    assert_eq!(model.as_stream().count(), 0);
}

#[test]
fn test_combine_preserves_duplicates() {
    let mut a = Model::new();
    a.add(stmt("http://example.org/a", dc::TITLE, "A"));

    let mut b = Model::new();
    b.add(stmt("http://example.org/b", dc::TITLE, "B"));
    b.add(stmt("http://example.org/c", dc::TITLE, "C"));

    a.combine(&b);
    assert_eq!(a.as_stream().count(), 3);

    a.combine(&b);
    assert_eq!(a.as_stream().count(), 5);
}

#[test]
fn test_combine_check_dedups_only_the_other_model() {
    let shared = stmt("http://example.org/a", dc::TITLE, "A");
    let other_only = stmt("http://example.org/b", dc::TITLE, "B");

    let mut a = Model::new();
    a.add(shared.clone());

    let mut b = Model::new();
    b.add(shared.clone());
    b.add(other_only.clone());
    b.add(other_only.clone());

    a.combine_check(&mut b);
    assert_eq!(b.len(), 2);
    // `shared` was already in `a` and is appended again
    let found: Vec<_> = a.as_stream().cloned().collect();
    assert_eq!(found, vec![shared.clone(), shared.clone(), other_only.clone()]);

    a.combine_check(&mut b);
    assert_eq!(a.len(), 5);
}

#[test]
fn test_empty_model_operations() {
    let mut empty = Model::new();
    assert_eq!(empty.as_stream().count(), 0);
    assert_eq!(empty.find(&PartialStatement::any()).count(), 0);

    let mut other = Model::new();
    empty.combine(&other);
    empty.combine_check(&mut other);
    assert!(empty.is_empty());
}
