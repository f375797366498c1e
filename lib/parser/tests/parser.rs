#![cfg(test)]

use sparql_shapes_model::{Term, TripleEvent};
use sparql_shapes_parser::{parse_query, Expected, ParseErrorKind, QueryParser};
use std::error::Error;

fn rendered(events: &[TripleEvent]) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}

#[test]
fn service_query() -> Result<(), Box<dyn Error>> {
    let events = parse_query(
        "SELECT * WHERE {
            SERVICE <http://kegg.bio2rdf.org/sparql> {
                ?enzyme <http://bio2rdf.org/ns/kegg#xSubstrate> ?cpd.
                ?enzyme a <http://bio2rdf.org/ns/kegg#Enzyme>.
                ?reaction <http://bio2rdf.org/ns/kegg#xEnzyme> ?enzyme.
                ?reaction <http://bio2rdf.org/ns/kegg#equation> ?equation.
            }
        }",
    )?;
    assert_eq!(
        rendered(&events),
        [
            "?enzyme <http://bio2rdf.org/ns/kegg#xSubstrate> ?cpd .",
            "?enzyme <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://bio2rdf.org/ns/kegg#Enzyme> .",
            "?reaction <http://bio2rdf.org/ns/kegg#xEnzyme> ?enzyme .",
            "?reaction <http://bio2rdf.org/ns/kegg#equation> ?equation .",
        ]
    );
    Ok(())
}

#[test]
fn dataset_with_empty_local_name() -> Result<(), Box<dyn Error>> {
    let events = parse_query(
        "Select ?name ?population ?lat ?long from lgd: \n{\n    ?s ?p ?o\n}\n",
    )?;
    assert_eq!(rendered(&events), ["?s ?p ?o ."]);
    assert!(events[0].predicate.is_variable());
    Ok(())
}

#[test]
fn codepoint_escapes_in_literals() -> Result<(), Box<dyn Error>> {
    let events = parse_query(
        "SELECT ?value WHERE {
            ?value <http://www.w3.org/2000/01/rdf-schema#comment> \"\\u041A\"@ru .
        }
        LIMIT 10",
    )?;
    let Term::Literal(literal) = &events[0].object else {
        panic!("expected a literal, got {}", events[0].object);
    };
    assert_eq!(literal.value(), "\\u041A");
    assert_eq!(literal.language(), Some("ru"));
    Ok(())
}

#[test]
fn dbpedia_log_query() -> Result<(), Box<dyn Error>> {
    let events = parse_query(
        "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
        PREFIX dbo: <http://dbpedia.org/ontology/>
        SELECT DISTINCT ?film ?label (SAMPLE(?abstract) AS ?a) WHERE {
            ?film a dbo:Film ;
                rdfs:label ?label ;
                dbo:director/rdfs:label \"Stanley Kubrick\"@en .
            OPTIONAL { ?film dbo:abstract ?abstract . FILTER(langMatches(lang(?abstract), \"EN\")) }
            FILTER(STRLEN(?label) > 3)
        }
        GROUP BY ?film ?label
        ORDER BY ?label
        LIMIT 50",
    )?;
    assert_eq!(
        rendered(&events),
        [
            "?film <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://dbpedia.org/ontology/Film> .",
            "?film <http://www.w3.org/2000/01/rdf-schema#label> ?label .",
            "?film <http://dbpedia.org/ontology/director>/<http://www.w3.org/2000/01/rdf-schema#label> \"Stanley Kubrick\"@en .",
            "?film <http://dbpedia.org/ontology/abstract> ?abstract .",
        ]
    );
    assert!(matches!(events[2].predicate, Term::Path(_)));
    Ok(())
}

#[test]
fn wikidata_style_query() -> Result<(), Box<dyn Error>> {
    let events = parse_query(
        "SELECT ?item ?itemLabel WHERE {
            ?item wdt:P31/wdt:P279* wd:Q5 ; p:P569 [ ps:P569 ?birth ] .
            SERVICE wikibase:label { bd:serviceParam wikibase:language \"[AUTO_LANGUAGE],en\". }
        }",
    )?;
    assert_eq!(
        rendered(&events),
        [
            "?item wdt:P31/wdt:P279* wd:Q5 .",
            "[] ps:P569 ?birth .",
            "?item p:P569 [] .",
            "bd:serviceParam wikibase:language \"[AUTO_LANGUAGE],en\" .",
        ]
    );
    Ok(())
}

#[test]
fn sink_and_callback() -> Result<(), Box<dyn Error>> {
    let parser = QueryParser::new();
    let query = "ASK { ?a <p> ?b . ?b <q> ?c }";

    let mut sink = Vec::new();
    assert_eq!(parser.parse_into(query, &mut sink)?, 2);
    assert_eq!(sink.len(), 2);

    let mut subjects = Vec::new();
    let count = parser.parse_with(query, |event| subjects.push(event.subject.to_string()))?;
    assert_eq!(count, 2);
    assert_eq!(subjects, ["?a", "?b"]);
    Ok(())
}

#[test]
fn failed_parse_emits_nothing() {
    let mut sink = Vec::new();
    let result = QueryParser::new().parse_into("SELECT * { ?a <p> ?b . ?b <q> }", &mut sink);
    assert!(result.is_err());
    assert!(sink.is_empty());
}

#[test]
fn error_display() {
    let error = parse_query("SELECT * WHERE { ?s <p> ?o").unwrap_err();
    assert_eq!(error.kind(), ParseErrorKind::Syntax);
    assert_eq!(error.position().line, 1);
    assert_eq!(error.position().column, 27);
    assert!(error.span().is_empty());
    assert!(error.expected().contains(&Expected::Token("}")));
    let message = error.to_string();
    assert!(
        message.starts_with("syntax error at line 1, column 27: expected one of "),
        "{message}"
    );
    assert!(message.contains("'}'"), "{message}");
}

#[test]
fn update_is_rejected() {
    assert!(parse_query("INSERT DATA { <a> <b> <c> }").is_err());
    assert!(parse_query("DELETE WHERE { ?s ?p ?o }").is_err());
}

#[test]
fn step_limit_guards_backtracking() {
    let query = format!(
        "SELECT * {{ {} }}",
        (0..200)
            .map(|i| format!("?s{i} <p> ?o{i} ."))
            .collect::<Vec<_>>()
            .join(" ")
    );
    let error = QueryParser::new()
        .with_step_limit(500)
        .parse(&query)
        .unwrap_err();
    assert_eq!(
        error.kind(),
        ParseErrorKind::StepLimitExceeded { limit: 500 }
    );
    assert_eq!(parse_query(&query).map(|events| events.len()), Ok(200));
}
