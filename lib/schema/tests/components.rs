#![cfg(test)]

use insta::assert_snapshot;
use itertools::Itertools;
use sparql_shapes_parser::QueryParser;
use sparql_shapes_schema::{connected_components, ConnectedComponent, Schema};

fn components(query: &str) -> Vec<ConnectedComponent> {
    let mut schema = Schema::new();
    if let Err(error) = QueryParser::new().parse_into(query, &mut schema) {
        panic!("failed to parse {query:?}: {error}");
    }
    connected_components(&schema)
}

fn render(components: &[ConnectedComponent]) -> String {
    components.iter().join("")
}

#[test]
fn service() {
    let components = components(
        "SELECT * WHERE {
            SERVICE <http://kegg.bio2rdf.org/sparql> {
                ?enzyme <http://bio2rdf.org/ns/kegg#xSubstrate> ?cpd.
                ?enzyme a <http://bio2rdf.org/ns/kegg#Enzyme>.
                ?reaction <http://bio2rdf.org/ns/kegg#xEnzyme> ?enzyme.
                ?reaction <http://bio2rdf.org/ns/kegg#equation> ?equation.
            }
        }",
    );
    assert_snapshot!(render(&components), @r"
    # complexity: [2, 2]
        ?v0 <http://bio2rdf.org/ns/kegg#xSubstrate> ?v1 .
        ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://bio2rdf.org/ns/kegg#Enzyme> .
        ?v2 <http://bio2rdf.org/ns/kegg#equation> ?v3 .
        ?v2 <http://bio2rdf.org/ns/kegg#xEnzyme> ?v0 .
    ");
    assert_eq!(components[0].signature(), "2-2");
}

#[test]
fn literal_with_codepoint_escape() {
    let components = components(
        "PREFIX foaf: <http://xmlns.com/foaf/0.1/>
        SELECT ?name WHERE { ?x foaf:name \"\\u00DCberSoldier\"@en }",
    );
    assert_snapshot!(render(&components), @r"
    # complexity: [1]
        ?v0 <http://xmlns.com/foaf/0.1/name> ?v1 .
    ");
    assert!(components[0].is_trivial());
}

#[test]
fn variable_predicate_yields_nothing() {
    assert!(components("ASK { ?s ?p ?o }").is_empty());
    assert!(components("Select ?name ?population ?lat ?long from lgd: \n{\n    ?s ?p ?o\n}\n").is_empty());
}

#[test]
fn star() {
    let components = components("select * { ?s a <:Person>; <name> \"toto\" }");
    assert_snapshot!(render(&components), @r"
    # complexity: [2]
        ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
        ?v0 <name> ?v1 .
    ");
}

#[test]
fn disconnected_stars() {
    let expected = "# complexity: [2]
    ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
    ?v0 <name> ?v1 .
# complexity: [2]
    ?v2 <age> ?v3 .
    ?v2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
";
    let shared_class = components(
        "select * { ?s a <:Person>; <name> \"toto\" . ?o a <:Person>; <age> \"42\" }",
    );
    assert_eq!(render(&shared_class), expected);
    let separate = components(
        "select * { ?s <name> \"toto\" . ?o <age> \"42\" . ?s a <:Person> . ?o a <:Person> }",
    );
    assert_eq!(render(&separate), expected);
}

#[test]
fn filter_does_not_add_triples() {
    let components = components("select * { ?s a <:Person>; <name> \"toto\" filter isuri(?s) }");
    assert_snapshot!(render(&components), @r"
    # complexity: [2]
        ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
        ?v0 <name> ?v1 .
    ");
}

#[test]
fn path_of_stars() {
    let components = components(
        "select * { ?s a <:Person>; <name> \"toto\" ; <knows> ?o . ?o a <:Person>; <age> \"42\" }",
    );
    assert_snapshot!(render(&components), @r"
    # complexity: [2, 3]
        ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
        ?v0 <knows> ?v2 .
        ?v0 <name> ?v1 .
        ?v2 <age> ?v3 .
        ?v2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
    ");
    assert_eq!(components[0].signature(), "2-3");
}

#[test]
fn path_of_stars_through_object() {
    let components = components(
        "select * { ?s a <:Person>; <name> \"toto\" . ?o a <:Person>; <age> \"42\"; <knows> ?s }",
    );
    assert_snapshot!(render(&components), @r"
    # complexity: [2, 3]
        ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
        ?v0 <name> ?v1 .
        ?v2 <age> ?v3 .
        ?v2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
        ?v2 <knows> ?v0 .
    ");
}

#[test]
fn numeric_objects_are_kept() {
    let components = components("select * { ?s <age> 42 ; <alive> true ; <name> ?n }");
    assert_snapshot!(render(&components), @r"
    # complexity: [3]
        ?v0 <age> 42 .
        ?v0 <alive> true .
        ?v0 <name> ?v1 .
    ");
}

#[test]
fn class_variables_join_subjects() {
    let components = components("select * { ?s a ?class . ?o a ?class }");
    assert_snapshot!(render(&components), @r"
    # complexity: [1, 1]
        ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> ?class .
        ?v1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> ?class .
    ");
}

#[test]
fn label_prefixes_do_not_join() {
    let query = format!(
        "select * {{ {} }}",
        (0..6).map(|i| format!("?a{i} <p> ?b{i} .")).join(" ")
    );
    let components = components(&query);
    assert_eq!(components.len(), 6);
    assert!(components.iter().all(ConnectedComponent::is_trivial));
    assert_eq!(components[1].body, "    ?v10 <p> ?v11 .\n");
}

#[test]
fn components_partition_the_schema() {
    let query = "PREFIX dbo: <http://dbpedia.org/ontology/>
        SELECT * WHERE {
            ?film a dbo:Film ; dbo:director ?director ; dbo:runtime 90 .
            ?director dbo:birthPlace ?place .
            OPTIONAL { ?place dbo:country ?country }
            ?other dbo:name \"x\" ; dbo:knows [ dbo:name ?n ] .
        }";
    let mut schema = Schema::new();
    QueryParser::new().parse_into(query, &mut schema).unwrap();
    let components = connected_components(&schema);

    let lines = components.iter().flat_map(ConnectedComponent::lines).count();
    assert_eq!(lines, schema.len());
    for component in &components {
        let total: i32 = component.complexity.iter().sum();
        assert_eq!(usize::try_from(total).unwrap(), component.lines().count());
        assert!(component.complexity.windows(2).all(|pair| pair[0] <= pair[1]));
    }
    assert!(components.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(components, connected_components(&schema));
}

#[test]
fn component_renders_as_query() {
    let components = components("select * { ?s a <:Person>; <name> \"toto\" }");
    assert_snapshot!(components[0].to_query(), @r"
    select * {
        ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .
        ?v0 <name> ?v1 .
    }
    ");
    let round_trip = self::components(&components[0].to_query());
    assert_eq!(round_trip, components);
}
