#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod analyzer;

pub use analyzer::{analyze_query, ShapeAnalyzer};

pub mod model {
    pub use sparql_shapes_model::*;
}

pub mod parser {
    pub use sparql_shapes_parser::*;
}

pub mod schema {
    pub use sparql_shapes_schema::*;
}
