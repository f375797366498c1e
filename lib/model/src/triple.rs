use crate::term::Term;
use std::fmt;

/// A triple pattern, as emitted by the query parser in document order.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct TripleEvent {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl TripleEvent {
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for TripleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Receives the triple patterns of a successfully parsed query.
pub trait TripleSink {
    fn triple(&mut self, event: TripleEvent);
}

impl TripleSink for Vec<TripleEvent> {
    fn triple(&mut self, event: TripleEvent) {
        self.push(event);
    }
}
