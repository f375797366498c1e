#![doc = "A backtracking parser for SPARQL 1.1 queries that reports the triple patterns of a query."]
#![doc(test(attr(deny(warnings))))]

mod error;
mod grammar;
mod lex;
mod span;

pub use error::{Expected, ParseError, ParseErrorKind};
pub use span::{LineCol, LineIndex, SourceSpan};

use sparql_shapes_model::{TripleEvent, TripleSink};

/// Parses SPARQL queries into the triple patterns of their graph patterns.
///
/// Triples are reported in document order, flattened across `OPTIONAL`, `UNION`, `GRAPH`,
/// `SERVICE`, `MINUS`, `EXISTS` and sub-queries. They are only handed out once the whole query
/// parsed, so a query with a syntax error never yields triples.
///
/// ```
/// use sparql_shapes_parser::QueryParser;
///
/// let triples = QueryParser::new().parse("SELECT * WHERE { ?s a <http://schema.org/Person> }")?;
/// assert_eq!(triples.len(), 1);
/// assert_eq!(
///     triples[0].to_string(),
///     "?s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> ."
/// );
/// # Result::<_, sparql_shapes_parser::ParseError>::Ok(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryParser {
    step_limit: Option<u64>,
}

impl QueryParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives up with [`ParseErrorKind::StepLimitExceeded`] after `limit` grammar rule attempts.
    ///
    /// Backtracking can take a long time on some inputs; use this when parsing untrusted text.
    #[must_use]
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Parses `query` and returns its triple patterns.
    pub fn parse(&self, query: &str) -> Result<Vec<TripleEvent>, ParseError> {
        grammar::parse(query, self.step_limit)
    }

    /// Parses `query` and sends its triple patterns to `sink`. Returns the number of triples.
    pub fn parse_into(&self, query: &str, sink: &mut impl TripleSink) -> Result<usize, ParseError> {
        self.parse_with(query, |event| sink.triple(event))
    }

    /// Parses `query` and calls `on_triple` for each of its triple patterns.
    pub fn parse_with(
        &self,
        query: &str,
        mut on_triple: impl FnMut(TripleEvent),
    ) -> Result<usize, ParseError> {
        let events = self.parse(query)?;
        let count = events.len();
        for event in events {
            on_triple(event);
        }
        Ok(count)
    }
}

/// Parses `query` with the default [`QueryParser`].
pub fn parse_query(query: &str) -> Result<Vec<TripleEvent>, ParseError> {
    QueryParser::new().parse(query)
}
