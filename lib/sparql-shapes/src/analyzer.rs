use sparql_shapes_parser::{ParseError, QueryParser};
use sparql_shapes_schema::{connected_components, ConnectedComponent, Schema};
use tracing::{debug, trace};

/// Runs queries through the parser, the [`Schema`] and the component extraction.
///
/// The analyzer reuses its schema between queries, so keep one per thread when analyzing many
/// queries.
#[derive(Clone, Debug, Default)]
pub struct ShapeAnalyzer {
    parser: QueryParser,
    schema: Schema,
}

impl ShapeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parser(parser: QueryParser) -> Self {
        Self {
            parser,
            schema: Schema::new(),
        }
    }

    /// Returns the connected components of `query`, sorted by body.
    ///
    /// If the query does not parse, the error is returned and the schema stays empty.
    pub fn analyze(&mut self, query: &str) -> Result<Vec<ConnectedComponent>, ParseError> {
        self.schema.reset();
        let triples = self
            .parser
            .parse_into(query, &mut self.schema)
            .inspect_err(|error| debug!(%error, "Query rejected"))?;
        let components = connected_components(&self.schema);
        trace!(
            triples,
            recorded = self.schema.len(),
            components = components.len(),
            "Query analyzed"
        );
        Ok(components)
    }

    /// The schema of the last analyzed query.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Analyzes `query` with a fresh [`ShapeAnalyzer`].
pub fn analyze_query(query: &str) -> Result<Vec<ConnectedComponent>, ParseError> {
    ShapeAnalyzer::new().analyze(query)
}
