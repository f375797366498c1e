use crate::span::{LineCol, LineIndex, SourceSpan};
use std::fmt;

/// Something the parser tried to match at the position of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expected {
    /// A keyword or punctuation, matched literally (keywords case-insensitively).
    Token(&'static str),
    /// A terminal or rule of the grammar, e.g. `IRIREF` or `end of input`.
    Rule(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => write!(f, "'{token}'"),
            Self::Rule(rule) => f.write_str(rule),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The grammar could not consume the full input.
    Syntax,
    /// The parser gave up after attempting more grammar rules than allowed.
    StepLimitExceeded { limit: u64 },
    /// Groups, brackets or collections were nested deeper than the parser supports.
    NestingTooDeep { limit: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => f.write_str("syntax error"),
            Self::StepLimitExceeded { limit } => {
                write!(f, "parsing aborted after {limit} steps")
            }
            Self::NestingTooDeep { limit } => {
                write!(f, "nesting deeper than {limit} levels")
            }
        }
    }
}

/// An error raised while parsing a SPARQL query.
///
/// The span points at the furthest position the parser reached; `expected` lists what the
/// parser tried to match there.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {position}{}", format_expected(.expected))]
pub struct ParseError {
    kind: ParseErrorKind,
    span: SourceSpan,
    position: LineCol,
    expected: Vec<Expected>,
}

impl ParseError {
    pub(crate) fn new(
        query: &str,
        kind: ParseErrorKind,
        offset: usize,
        mut expected: Vec<Expected>,
    ) -> Self {
        let end = query
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(offset, |c| offset + c.len_utf8());
        expected.sort_unstable();
        expected.dedup();
        Self {
            kind,
            span: SourceSpan::new(offset, end),
            position: LineIndex::new(query).line_col(offset),
            expected,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// The span of the character at which parsing failed (empty at the end of input).
    pub fn span(&self) -> SourceSpan {
        self.span
    }

    pub fn position(&self) -> LineCol {
        self.position
    }

    pub fn expected(&self) -> &[Expected] {
        &self.expected
    }
}

fn format_expected(expected: &[Expected]) -> String {
    if expected.is_empty() {
        return String::new();
    }
    let list = expected
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(": expected one of {list}")
}
