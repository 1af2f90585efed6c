use provenance_rdf::rdf::namespace::{cc, dc, dcterms, rdf, ABOUT_THIS};
use provenance_rdf::rdf::serialization::{parse, serialize, SerializerConfig};
use provenance_rdf::{BlankNode, Literal, Model, NamedNode, Node, Statement, Subject};
use std::collections::HashSet;

fn named(iri: &str) -> NamedNode {
    NamedNode::new(iri).unwrap()
}

/// Statements as a set, with blank nodes replaced by a placeholder
fn ground_set(model: &Model) -> HashSet<String> {
    model
        .as_stream()
        .map(|s| {
            let subject = match &s.subject {
                Subject::Blank(_) => "_".to_string(),
                other => other.to_string(),
            };
            let object = match &s.object {
                Node::Blank(_) => "_".to_string(),
                other => other.to_string(),
            };
            format!("{} {} {}", subject, s.predicate, object)
        })
        .collect()
}

#[test]
fn test_round_trip_ground_statements() {
    let mut model = Model::new();
    model.add(Statement::with_literal(ABOUT_THIS, dc::TITLE, "Sunset").unwrap());
    model.add(Statement::with_literal(ABOUT_THIS, dc::CREATOR, "Alice").unwrap());
    model.add(Statement::from_uris(ABOUT_THIS, dc::SOURCE, "http://example.org/photo.jpg").unwrap());
    model.add(Statement::from_uris(ABOUT_THIS, cc::LICENSE, "http://creativecommons.org/licenses/by/4.0/").unwrap());
    model.add(Statement::new(
        named("http://example.org/photo.jpg"),
        named(dcterms::CREATOR),
        Literal::new_language_tagged_literal("Bob", "en").unwrap(),
    ));
    model.add(Statement::new(
        named("http://example.org/photo.jpg"),
        named(dcterms::DATE),
        Literal::new_typed_literal("2011", named("http://www.w3.org/2001/XMLSchema#gYear")),
    ));

    let text = serialize(&model, &SerializerConfig::default()).unwrap();
    let parsed = parse(&text, ABOUT_THIS).unwrap();

    let expected: HashSet<_> = model.as_stream().cloned().collect();
    let actual: HashSet<_> = parsed.as_stream().cloned().collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_round_trip_preserves_literal_text() {
    let cases = [
        ("empty", ""),
        ("leading and trailing spaces", "  padded  "),
        ("newline", "line one\nline two"),
        ("crlf", "line one\r\nline two"),
        ("trailing newline", "ends with newline\n"),
        ("markup characters", "<b>Tom & Jerry</b>"),
        ("quotes", "\"double\" and 'single'"),
        ("entity lookalike", "&amp; stays literal"),
    ];

    for (name, value) in cases {
        let mut model = Model::new();
        model.add(Statement::with_literal(ABOUT_THIS, dc::TITLE, value).unwrap());
        model.add(Statement::new(
            named("http://example.org/photo.jpg"),
            named(dc::DESCRIPTION),
            Literal::new_language_tagged_literal(value, "en").unwrap(),
        ));

        let text = serialize(&model, &SerializerConfig::default()).unwrap();
        let parsed = parse(&text, ABOUT_THIS).unwrap();

        let expected: HashSet<_> = model.as_stream().cloned().collect();
        let actual: HashSet<_> = parsed.as_stream().cloned().collect();
        assert_eq!(actual, expected, "{name}: {value:?} came back changed from\n{text}");
    }
}

#[test]
fn test_round_trip_container_with_blank_node() {
    let seq = BlankNode::new();
    let mut model = Model::new();
    model.add(Statement::new(named(ABOUT_THIS), named(dc::SOURCE), seq.clone()));
    model.add(Statement::new(seq.clone(), named(rdf::TYPE), named(rdf::SEQ)));
    model.add(Statement::new(seq.clone(), named(&format!("{}_1", rdf::NS)), Node::literal("a")));
    model.add(Statement::new(seq, named(&format!("{}_2", rdf::NS)), Node::literal("b")));

    let text = serialize(&model, &SerializerConfig::default()).unwrap();
    let parsed = parse(&text, ABOUT_THIS).unwrap();

    assert_eq!(parsed.len(), model.len());
    assert_eq!(ground_set(&parsed), ground_set(&model));
}

#[test]
fn test_serialization_is_deterministic() {
    let mut model = Model::new();
    model.add(Statement::with_literal(ABOUT_THIS, dc::TITLE, "T").unwrap());
    model.add(Statement::with_literal("http://example.org/x", dc::CREATOR, "C").unwrap());

    let config = SerializerConfig::default();
    assert_eq!(serialize(&model, &config).unwrap(), serialize(&model, &config).unwrap());
}

#[test]
fn test_fixed_prefixes_and_no_base() {
    let mut model = Model::new();
    model.add(Statement::with_literal(ABOUT_THIS, dc::TITLE, "T").unwrap());

    let text = serialize(&model, &SerializerConfig::default()).unwrap();
    assert!(text.contains(r#"xmlns:dc="http://purl.org/dc/elements/1.1/""#));
    assert!(text.contains(r#"xmlns:dcterms="http://purl.org/dc/terms/""#));
    assert!(text.contains(r#"xmlns:cc="http://creativecommons.org/ns#""#));
    assert!(text.contains(r#"xmlns:xhv="http://www.w3.org/1999/xhtml/vocab#""#));
    assert!(text.contains(r#"xmlns:og="http://ogp.me/ns#""#));
    assert!(text.contains(r#"rdf:about="""#));
    assert!(!text.contains("xml:base"));
}

#[test]
fn test_parse_xmp_style_description() {
    let text = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                      xmlns:dc="http://purl.org/dc/elements/1.1/">
        <rdf:Description rdf:about="">
            <dc:creator>
                <rdf:Seq>
                    <rdf:li>Alice</rdf:li>
                    <rdf:li>Bob</rdf:li>
                </rdf:Seq>
            </dc:creator>
        </rdf:Description>
    </rdf:RDF>"#;

    let model = parse(text, "http://example.org/img.png").unwrap();
    // creator link, rdf:type rdf:Seq, two members
    assert_eq!(model.len(), 4);

    let subject = Subject::resource("http://example.org/img.png").unwrap();
    let creator = named(dc::CREATOR);
    let container = model.targets(&subject, &creator).next().unwrap();
    assert!(container.is_blank());
}

#[test]
fn test_parse_errors() {
    assert!(parse("<rdf:RDF", ABOUT_THIS).is_err());
    assert!(parse("<rdf:RDF/>", "not a base uri").is_err());
}
