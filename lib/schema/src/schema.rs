use rustc_hash::FxHashMap;
use sparql_shapes_model::{Term, TripleEvent, TripleSink};
use std::collections::BTreeMap;
use std::fmt;

/// A synthetic variable (`?v0`, `?v1`, ...) standing for one node of a query.
///
/// Labels are numbered in the order in which their terms are first seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalLabel(u32);

impl CanonicalLabel {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CanonicalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?v{}", self.0)
    }
}

/// The object of a recorded triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectLabel {
    /// An anonymized node.
    Canonical(CanonicalLabel),
    /// The surface text of the object, kept for `rdf:type` objects and for numeric and boolean
    /// literals.
    Verbatim(String),
}

impl fmt::Display for ObjectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canonical(label) => label.fmt(f),
            Self::Verbatim(text) => f.write_str(text),
        }
    }
}

/// The anonymized graph of one query.
///
/// Every distinct subject and object is replaced by a [`CanonicalLabel`], except for the objects
/// listed in [`ObjectLabel::Verbatim`]. Predicates keep their surface text. Triples with a variable
/// predicate are dropped and duplicate triples are recorded once.
///
/// A schema describes a single query; call [`Schema::reset`] before reusing it.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    labels: FxHashMap<String, CanonicalLabel>,
    adjacency: BTreeMap<CanonicalLabel, BTreeMap<String, Vec<ObjectLabel>>>,
    len: usize,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the labels and triples of the previous query.
    pub fn reset(&mut self) {
        self.labels.clear();
        self.adjacency.clear();
        self.len = 0;
    }

    /// Records a triple pattern. Returns whether the schema changed.
    pub fn add_statement(&mut self, subject: &Term, predicate: &Term, object: &Term) -> bool {
        if predicate.is_variable() {
            return false;
        }
        let subject = self.label(subject);
        let verbatim = predicate.is_rdf_type()
            || matches!(object, Term::NumericLiteral(_) | Term::BooleanLiteral(_));
        let object = if verbatim {
            ObjectLabel::Verbatim(object.to_string())
        } else {
            ObjectLabel::Canonical(self.label(object))
        };
        let objects = self
            .adjacency
            .entry(subject)
            .or_default()
            .entry(predicate.to_string())
            .or_default();
        if objects.contains(&object) {
            return false;
        }
        objects.push(object);
        self.len += 1;
        true
    }

    /// Returns the label of `term`, assigning the next one if the term is new.
    fn label(&mut self, term: &Term) -> CanonicalLabel {
        let next = CanonicalLabel(u32::try_from(self.labels.len()).unwrap_or(u32::MAX));
        *self.labels.entry(term.identity_key()).or_insert(next)
    }

    /// The number of labels assigned so far.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// The number of distinct triples.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the recorded triples, ordered by subject label, then predicate, then
    /// insertion order.
    pub fn triples(&self) -> impl Iterator<Item = (CanonicalLabel, &str, &ObjectLabel)> + '_ {
        self.adjacency.iter().flat_map(|(subject, predicates)| {
            predicates.iter().flat_map(move |(predicate, objects)| {
                objects
                    .iter()
                    .map(move |object| (*subject, predicate.as_str(), object))
            })
        })
    }
}

impl TripleSink for Schema {
    fn triple(&mut self, event: TripleEvent) {
        self.add_statement(&event.subject, &event.predicate, &event.object);
    }
}
