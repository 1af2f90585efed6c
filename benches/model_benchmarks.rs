use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use provenance_rdf::attribution::SOURCE_QUERY;
use provenance_rdf::rdf::namespace::{dc, ABOUT_THIS};
use provenance_rdf::rdf::serialization::{parse, serialize, SerializerConfig};
use provenance_rdf::sparql::parse_query;
use provenance_rdf::{Model, NamedNode, PartialStatement, QueryEngine, Statement, Subject};

/// Model with `size` sources, each carrying a title and a creator
fn build_model(size: usize) -> Model {
    let mut model = Model::new();
    for i in 0..size {
        let source = format!("http://example.org/source/{}", i);
        model.add(Statement::from_uris(ABOUT_THIS, dc::SOURCE, &source).unwrap());
        model.add(Statement::with_literal(&source, dc::TITLE, &format!("Title {}", i)).unwrap());
        model.add(Statement::with_literal(&source, dc::CREATOR, &format!("Creator {}", i % 10)).unwrap());
    }
    model
}

/// Benchmark statement insertion throughput
fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");

    for size in [100, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| criterion::black_box(build_model(size).len()));
        });
    }
    group.finish();
}

/// Benchmark indexed pattern lookup
fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");

    for size in [100, 1000, 10_000].iter() {
        let model = build_model(*size);
        let subject = Subject::resource("http://example.org/source/42").unwrap();
        let creator = NamedNode::new(dc::CREATOR).unwrap();

        group.bench_with_input(BenchmarkId::new("subject_predicate", size), size, |b, _| {
            let pattern = PartialStatement::new(Some(subject.clone()), Some(creator.clone()), None);
            b.iter(|| criterion::black_box(model.find(&pattern).count()));
        });

        group.bench_with_input(BenchmarkId::new("predicate", size), size, |b, _| {
            let pattern = PartialStatement::new(None, Some(creator.clone()), None);
            b.iter(|| criterion::black_box(model.find(&pattern).count()));
        });
    }
    group.finish();
}

/// Benchmark query parsing and evaluation
fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    group.bench_function("parse_source_query", |b| {
        b.iter(|| criterion::black_box(parse_query(SOURCE_QUERY).unwrap()));
    });

    let model = build_model(1000);
    let engine = QueryEngine::new();
    let join = engine
        .prepare(
            "PREFIX dc: <http://purl.org/dc/elements/1.1/> \
             SELECT ?label WHERE { <about:this> dc:source ?s . ?s dc:creator ?label }",
        )
        .unwrap();
    let sources = engine.prepare(SOURCE_QUERY).unwrap();

    group.bench_function("join_1000", |b| {
        b.iter(|| criterion::black_box(engine.execute(&model, &join).unwrap().count()));
    });
    group.bench_function("source_query_1000", |b| {
        b.iter(|| criterion::black_box(engine.execute(&model, &sources).unwrap().count()));
    });

    group.finish();
}

/// Benchmark RDF/XML serialization and parsing
fn bench_rdfxml(c: &mut Criterion) {
    let mut group = c.benchmark_group("rdfxml");

    let model = build_model(1000);
    let config = SerializerConfig::default();
    let text = serialize(&model, &config).unwrap();

    group.bench_function("serialize_1000", |b| {
        b.iter(|| criterion::black_box(serialize(&model, &config).unwrap().len()));
    });
    group.bench_function("parse_1000", |b| {
        b.iter(|| criterion::black_box(parse(&text, ABOUT_THIS).unwrap().len()));
    });

    group.finish();
}

criterion_group!(benches, bench_insertion, bench_find, bench_query, bench_rdfxml);
criterion_main!(benches);
