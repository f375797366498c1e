//! A backtracking recursive descent parser for the [SPARQL 1.1 query grammar](https://www.w3.org/TR/sparql11-query/#sparqlGrammar).
//!
//! Each grammar rule is a method returning `Some` on success and `None` on failure. Alternatives
//! are tried through [`Parser::attempt`], which rewinds the cursor and the buffered triples when
//! the rule fails. Whitespace and comments are skipped after every token.

mod expr;
mod path;
mod pattern;
mod query;


use crate::error::{Expected, ParseError, ParseErrorKind};
use crate::lex;
use rustc_hash::FxHashMap;
use sparql_shapes_model::vocab::rdf;
use sparql_shapes_model::{BlankNode, Iri, Term, TripleEvent};

/// Maximum nesting of groups, brackets, collections and blank node property lists.
const MAX_NESTING: usize = 64;

/// Parses a complete query and returns its triple patterns in document order.
pub(crate) fn parse(query: &str, step_limit: Option<u64>) -> Result<Vec<TripleEvent>, ParseError> {
    let mut parser = Parser::new(query, step_limit);
    parser.skip_trivia();
    let parsed = parser.query_unit().and_then(|()| parser.end_of_input());
    if let Some(kind) = parser.halt {
        return Err(ParseError::new(query, kind, parser.furthest, Vec::new()));
    }
    match parsed {
        Some(()) => Ok(parser.events),
        None => Err(ParseError::new(
            query,
            ParseErrorKind::Syntax,
            parser.furthest,
            parser.expected,
        )),
    }
}

/// Where the cursor and the buffered output were before a rule was attempted.
#[derive(Clone, Copy)]
struct Checkpoint {
    pos: usize,
    events: usize,
    blank_nodes: u32,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Triples of the rules that succeeded so far.
    events: Vec<TripleEvent>,
    /// Namespaces declared with `PREFIX`, without the angle brackets.
    prefixes: FxHashMap<&'a str, &'a str>,
    blank_nodes: u32,
    depth: usize,
    /// The furthest offset at which a token failed to match, and what was expected there.
    furthest: usize,
    expected: Vec<Expected>,
    steps: u64,
    step_limit: Option<u64>,
    /// Set when the parser gives up. Every rule fails from then on.
    halt: Option<ParseErrorKind>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, step_limit: Option<u64>) -> Self {
        Self {
            input,
            pos: 0,
            events: Vec::new(),
            prefixes: FxHashMap::default(),
            blank_nodes: 0,
            depth: 0,
            furthest: 0,
            expected: Vec::new(),
            steps: 0,
            step_limit,
            halt: None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_trivia(&mut self) {
        self.pos += lex::trivia(self.rest());
    }

    /// Consumes `len` bytes of the current token and the trivia after it.
    fn advance(&mut self, len: usize) -> &'a str {
        let token = &self.input[self.pos..self.pos + len];
        self.pos += len;
        self.skip_trivia();
        token
    }

    fn step(&mut self) -> Option<()> {
        if self.halt.is_some() {
            return None;
        }
        self.steps += 1;
        match self.step_limit {
            Some(limit) if self.steps > limit => {
                self.halt = Some(ParseErrorKind::StepLimitExceeded { limit });
                None
            }
            _ => Some(()),
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            events: self.events.len(),
            blank_nodes: self.blank_nodes,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.events.truncate(checkpoint.events);
        self.blank_nodes = checkpoint.blank_nodes;
    }

    /// Runs `rule`, rewinding the parser if it fails.
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.step()?;
        let checkpoint = self.checkpoint();
        let result = rule(self);
        if result.is_none() {
            self.restore(checkpoint);
        }
        result
    }

    /// Runs `rule` as often as it succeeds and consumes input.
    fn repeat(&mut self, mut rule: impl FnMut(&mut Self) -> Option<()>) -> usize {
        let mut count = 0;
        loop {
            let start = self.pos;
            if self.attempt(&mut rule).is_none() || self.pos == start {
                return count;
            }
            count += 1;
        }
    }

    /// Runs `rule` and drops the triples it produced.
    fn discard_triples<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let events = self.events.len();
        let result = rule(self);
        self.events.truncate(events);
        result
    }

    /// Runs `rule` one nesting level deeper.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.depth >= MAX_NESTING {
            self.halt = Some(ParseErrorKind::NestingTooDeep { limit: MAX_NESTING });
            return None;
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Records that `expected` did not match at the current position.
    fn fail<T>(&mut self, expected: Expected) -> Option<T> {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest {
            self.expected.push(expected);
        }
        None
    }

    fn end_of_input(&mut self) -> Option<()> {
        if self.pos == self.input.len() {
            Some(())
        } else {
            self.fail(Expected::Rule("end of input"))
        }
    }

    /// Matches a punctuation token.
    fn punct(&mut self, token: &'static str) -> Option<()> {
        self.step()?;
        if self.rest().starts_with(token) {
            self.advance(token.len());
            Some(())
        } else {
            self.fail(Expected::Token(token))
        }
    }

    /// Matches a keyword, case-insensitively.
    fn keyword(&mut self, keyword: &'static str) -> Option<()> {
        self.step()?;
        match lex::keyword(self.rest(), keyword) {
            Some(len) => {
                self.advance(len);
                Some(())
            }
            None => self.fail(Expected::Token(keyword)),
        }
    }

    /// Matches the first of `keywords` found at the current position.
    fn one_of_keywords(&mut self, keywords: &[&'static str]) -> Option<&'static str> {
        self.step()?;
        for &keyword in keywords {
            if let Some(len) = lex::keyword(self.rest(), keyword) {
                self.advance(len);
                return Some(keyword);
            }
        }
        for &keyword in keywords {
            self.fail::<()>(Expected::Token(keyword));
        }
        None
    }

    /// Matches a terminal with the given recognizer and returns its text.
    fn terminal(
        &mut self,
        name: &'static str,
        recognizer: fn(&str) -> Option<usize>,
    ) -> Option<&'a str> {
        self.step()?;
        match recognizer(self.rest()) {
            Some(len) => Some(self.advance(len)),
            None => self.fail(Expected::Rule(name)),
        }
    }

    fn emit(&mut self, subject: Term, predicate: Term, object: Term) {
        self.events.push(TripleEvent {
            subject,
            predicate,
            object,
        });
    }

    fn fresh_blank_node(&mut self) -> Term {
        let id = self.blank_nodes;
        self.blank_nodes += 1;
        Term::BlankNode(BlankNode::Anonymous(id))
    }

    /// `Var`
    fn var(&mut self) -> Option<Term> {
        let token = self.terminal("variable", lex::var)?;
        Some(Term::variable(&token[1..]))
    }

    /// The keyword `a`. Unlike the other keywords it is case-sensitive.
    fn rdf_type(&mut self) -> Option<Iri> {
        self.step()?;
        match lex::keyword(self.rest(), "a") {
            Some(len) if self.rest().starts_with('a') => {
                self.advance(len);
                Some(Iri::from(rdf::TYPE))
            }
            _ => self.fail(Expected::Token("a")),
        }
    }

    /// `iri`: an `IRIREF` or a prefixed name.
    fn iri(&mut self) -> Option<Iri> {
        self.step()?;
        let rest = self.rest();
        if let Some(len) = lex::iriref(rest) {
            let token = self.advance(len);
            return Some(Iri::absolute(&token[1..token.len() - 1]));
        }
        let Some(ns_len) = lex::pname_ns(rest) else {
            self.fail::<()>(Expected::Rule("IRI"));
            return self.fail(Expected::Rule("prefixed name"));
        };
        let local_len = lex::pn_local(&rest[ns_len..]).unwrap_or(0);
        let token = self.advance(ns_len + local_len);
        let (prefix, local) = token.split_at(ns_len);
        Some(self.resolve(&prefix[..ns_len - 1], local))
    }

    /// Expands a prefixed name if its prefix is declared.
    fn resolve(&self, prefix: &str, local: &str) -> Iri {
        match self.prefixes.get(prefix) {
            Some(namespace) => Iri::absolute(format!("{namespace}{}", unescape_local(local))),
            None => Iri::prefixed(prefix, local),
        }
    }
}

/// Removes the backslashes of `PN_LOCAL_ESC` sequences.
fn unescape_local(local: &str) -> String {
    let mut unescaped = String::with_capacity(local.len());
    let mut chars = local.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            unescaped.extend(chars.next());
        } else {
            unescaped.push(c);
        }
    }
    unescaped
}
