//! Vocabulary constants used while parsing and canonicalizing queries.

/// The [RDF](https://www.w3.org/TR/rdf11-concepts/) vocabulary.
pub mod rdf {
    pub use oxrdf::vocab::rdf::{FIRST, NIL, REST, TYPE};
}
