#![doc = "Anonymized graphs of SPARQL queries, split into connected components and bucketed by their shape."]
#![doc(test(attr(deny(warnings))))]

mod components;
mod schema;

pub use components::{connected_components, ConnectedComponent};
pub use schema::{CanonicalLabel, ObjectLabel, Schema};
