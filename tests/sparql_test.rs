use provenance_rdf::attribution::SOURCE_QUERY;
use provenance_rdf::rdf::namespace::{dc, dcterms, rdf, ABOUT_THIS};
use provenance_rdf::{BlankNode, Model, NamedNode, Node, QueryEngine, Statement};

fn named(iri: &str) -> NamedNode {
    NamedNode::new(iri).unwrap()
}

fn member(index: usize) -> NamedNode {
    named(&format!("{}_{}", rdf::NS, index))
}

fn labels(model: &Model, query: &str) -> Vec<String> {
    let mut labels: Vec<String> = QueryEngine::new()
        .query(model, query)
        .unwrap()
        .map(|row| row.unwrap())
        .filter_map(|row| row.value("label").map(str::to_string))
        .collect();
    labels.sort();
    labels
}

fn container_model(container: &str, source_predicate: &str) -> Model {
    let node = BlankNode::new();
    let mut model = Model::new();
    model.add(Statement::new(named(ABOUT_THIS), named(source_predicate), node.clone()));
    model.add(Statement::new(node.clone(), named(rdf::TYPE), named(container)));
    model.add(Statement::new(node.clone(), member(1), Node::literal("a")));
    model.add(Statement::new(node, member(2), Node::literal("b")));
    model
}

#[test]
fn test_source_query_expands_seq() {
    let model = container_model(rdf::SEQ, dc::SOURCE);
    // The rdf:type rdf:Seq statement matches `?node ?pred ?label` but is filtered out
    assert_eq!(labels(&model, SOURCE_QUERY), vec!["a", "b"]);
}

#[test]
fn test_source_query_expands_bag_and_dcterms() {
    let model = container_model(rdf::BAG, dcterms::SOURCE);
    assert_eq!(labels(&model, SOURCE_QUERY), vec!["a", "b"]);
}

#[test]
fn test_source_query_alt_takes_first_choice() {
    let model = container_model(rdf::ALT, dc::SOURCE);
    assert_eq!(labels(&model, SOURCE_QUERY), vec!["a"]);
}

#[test]
fn test_source_query_direct_values() {
    let mut model = Model::new();
    model.add(Statement::from_uris(ABOUT_THIS, dc::SOURCE, "http://example.org/x").unwrap());
    model.add(Statement::with_literal(ABOUT_THIS, dcterms::SOURCE, "a magazine").unwrap());

    assert_eq!(
        labels(&model, SOURCE_QUERY),
        vec!["a magazine", "http://example.org/x"]
    );
}

#[test]
fn test_union_does_not_deduplicate() {
    let mut model = Model::new();
    model.add(Statement::with_literal(ABOUT_THIS, dc::CREATOR, "Alice").unwrap());

    let query = r#"
        PREFIX dc: <http://purl.org/dc/elements/1.1/>
        SELECT ?label WHERE {
            { ?s dc:creator ?label . } UNION { ?s dc:creator ?label . }
        }
    "#;
    assert_eq!(labels(&model, query), vec!["Alice", "Alice"]);

    let distinct = query.replace("SELECT ?label", "SELECT DISTINCT ?label");
    assert_eq!(labels(&model, &distinct), vec!["Alice"]);
}

#[test]
fn test_join_on_shared_variable() {
    let mut model = Model::new();
    model.add(Statement::from_uris(ABOUT_THIS, dc::SOURCE, "http://example.org/x").unwrap());
    model.add(Statement::from_uris(ABOUT_THIS, dc::SOURCE, "http://example.org/y").unwrap());
    model.add(Statement::with_literal("http://example.org/x", dc::CREATOR, "Alice").unwrap());

    let query = r#"
        PREFIX dc: <http://purl.org/dc/elements/1.1/>
        SELECT ?label WHERE {
            <about:this> dc:source ?src .
            ?src dc:creator ?label .
        }
    "#;
    assert_eq!(labels(&model, query), vec!["Alice"]);
}

#[test]
fn test_blank_binding_is_skipped() {
    let model = container_model(rdf::SEQ, dc::SOURCE);
    let query = r#"
        PREFIX dc: <http://purl.org/dc/elements/1.1/>
        SELECT ?label WHERE { ?s dc:source ?label }
    "#;

    let rows: Vec<_> = QueryEngine::new()
        .query(&model, query)
        .unwrap()
        .map(|row| row.unwrap())
        .collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].get("label").unwrap().is_blank());
    assert_eq!(rows[0].value("label"), None);
}

#[test]
fn test_limit_and_json_results() {
    let mut model = Model::new();
    for i in 0..5 {
        model.add(Statement::with_literal(ABOUT_THIS, dc::SUBJECT, &format!("tag{}", i)).unwrap());
    }

    let results = QueryEngine::new()
        .query(&model, "SELECT ?o WHERE { ?s ?p ?o } LIMIT 2")
        .unwrap()
        .into_results()
        .unwrap();
    assert_eq!(results.solutions.len(), 2);

    let json = results.to_json();
    assert_eq!(json["head"]["vars"][0], "o");
    assert_eq!(json["results"]["bindings"][1]["o"]["value"], "tag1");
}

#[test]
fn test_prepared_query_runs_on_many_models() {
    let engine = QueryEngine::new();
    let prepared = engine.prepare(SOURCE_QUERY).unwrap();

    let seq = container_model(rdf::SEQ, dc::SOURCE);
    let empty = Model::new();

    assert_eq!(engine.execute(&seq, &prepared).unwrap().count(), 2);
    assert_eq!(engine.execute(&empty, &prepared).unwrap().count(), 0);
}
