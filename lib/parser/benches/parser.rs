#![allow(clippy::panic)]

use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use sparql_shapes_parser::QueryParser;

const LOG_QUERY: &str = "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX dbo: <http://dbpedia.org/ontology/>
SELECT DISTINCT ?film ?label WHERE {
    ?film a dbo:Film ;
        rdfs:label ?label ;
        dbo:director/rdfs:label \"Stanley Kubrick\"@en .
    OPTIONAL { ?film dbo:abstract ?abstract . FILTER(langMatches(lang(?abstract), \"EN\")) }
    { ?film dbo:starring ?actor } UNION { ?film dbo:writer ?actor }
    FILTER(STRLEN(?label) > 3 && !BOUND(?abstract) || ?label != \"x\")
}
ORDER BY ?label
LIMIT 50";

fn parse_log_query(c: &mut Criterion) {
    let parser = QueryParser::new();
    c.bench_function("QueryParser::parse log query", |b| {
        b.iter(|| {
            let Ok(events) = parser.parse(LOG_QUERY) else {
                panic!("the benchmark query is valid");
            };
            events
        });
    });
}

fn parse_large_pattern(c: &mut Criterion) {
    let parser = QueryParser::new();
    let query = generate_query(1_000);
    c.bench_function("QueryParser::parse 1000 triples", |b| {
        b.iter(|| {
            let Ok(events) = parser.parse(&query) else {
                panic!("the benchmark query is valid");
            };
            events
        });
    });
}

criterion_group!(parser, parse_log_query, parse_large_pattern);
criterion_main!(parser);

fn generate_query(count: u64) -> String {
    let patterns = (0..count)
        .map(|i| format!("?s{i} <http://example.com/predicate{i}> ?s{} .", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!("SELECT * WHERE {{\n{patterns}\n}}")
}
