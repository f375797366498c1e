use crate::path::PropertyPath;
use crate::vocab::rdf;
use oxrdf::NamedNodeRef;
use std::fmt;

/// An IRI as it appears in a query.
///
/// Prefixed names are only kept as [`Iri::Prefixed`] if the query did not declare their prefix.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Iri {
    /// An `IRIREF`, without the enclosing angle brackets. Escapes are kept as written.
    Absolute(String),
    /// A prefixed name whose prefix is not declared in the query prologue.
    Prefixed { prefix: String, local: String },
}

impl Iri {
    pub fn absolute(iri: impl Into<String>) -> Self {
        Self::Absolute(iri.into())
    }

    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self::Prefixed {
            prefix: prefix.into(),
            local: local.into(),
        }
    }

    /// Returns true if this is the `rdf:type` IRI (also written `a`).
    pub fn is_rdf_type(&self) -> bool {
        matches!(self, Self::Absolute(iri) if iri == rdf::TYPE.as_str())
    }
}

impl From<NamedNodeRef<'_>> for Iri {
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self::Absolute(node.as_str().to_owned())
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(iri) => write!(f, "<{iri}>"),
            Self::Prefixed { prefix, local } => write!(f, "{prefix}:{local}"),
        }
    }
}

/// A blank node of a triple pattern.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum BlankNode {
    /// A `_:label` blank node. All occurrences of a label within one query denote the same node.
    Labeled(String),
    /// A blank node without a label: `[]`, the subject of a `[ ... ]` property list or a
    /// collection cell. The id is unique within one query.
    Anonymous(u32),
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Labeled(label) => write!(f, "_:{label}"),
            Self::Anonymous(_) => f.write_str("[]"),
        }
    }
}

/// A string literal, with its lexical form kept as written in the query.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    language: Option<String>,
    datatype: Option<Iri>,
}

impl Literal {
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    pub fn new_typed_literal(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype),
        }
    }

    /// The lexical form, with escape sequences as written.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }

    /// Picks a quote that does not clash with the (unescaped) content of the lexical form.
    fn delimiter(&self) -> &'static str {
        let multiline = self.value.contains(['\n', '\r']);
        if !multiline && !self.value.contains('"') {
            "\""
        } else if !multiline && !self.value.contains('\'') {
            "'"
        } else if !self.value.contains("\"\"\"") && !self.value.ends_with('"') {
            "\"\"\""
        } else {
            "'''"
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = self.delimiter();
        write!(f, "{delimiter}{}{delimiter}", self.value)?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")?;
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^{datatype}")?;
        }
        Ok(())
    }
}

/// A term found at a subject, predicate or object position of a triple pattern.
///
/// The [`Display`](fmt::Display) implementation renders the surface text of the term, which is
/// valid SPARQL syntax again.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum Term {
    /// A variable name, without the leading `?` or `$`.
    Variable(String),
    Iri(Iri),
    Literal(Literal),
    BlankNode(BlankNode),
    /// A numeric literal, as written (e.g. `-1.5e3`).
    NumericLiteral(String),
    BooleanLiteral(bool),
    /// A property path in predicate position.
    Path(Box<PropertyPath>),
}

impl Term {
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns true if this is the `rdf:type` IRI.
    pub fn is_rdf_type(&self) -> bool {
        matches!(self, Self::Iri(iri) if iri.is_rdf_type())
    }

    /// The key under which two occurrences of a term denote the same node of a query.
    ///
    /// This is the surface text of the term, except for anonymous blank nodes: every anonymous
    /// blank node is distinct, so its key is derived from its id and never equals the surface
    /// text of any other term.
    pub fn identity_key(&self) -> String {
        match self {
            Self::BlankNode(BlankNode::Anonymous(id)) => format!("[]#{id}"),
            _ => self.to_string(),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<NamedNodeRef<'_>> for Term {
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self::Iri(node.into())
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Self::BlankNode(node)
    }
}

impl From<PropertyPath> for Term {
    fn from(path: PropertyPath) -> Self {
        match path {
            PropertyPath::Iri(iri) => Self::Iri(iri),
            path => Self::Path(Box::new(path)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(name) => write!(f, "?{name}"),
            Self::Iri(iri) => iri.fmt(f),
            Self::Literal(literal) => literal.fmt(f),
            Self::BlankNode(node) => node.fmt(f),
            Self::NumericLiteral(value) => f.write_str(value),
            Self::BooleanLiteral(value) => write!(f, "{value}"),
            Self::Path(path) => path.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_surface_text() {
        assert_eq!(Term::variable("s").to_string(), "?s");
        assert_eq!(Term::from(rdf::TYPE).to_string(), "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>");
        assert_eq!(Term::Iri(Iri::prefixed("foaf", "name")).to_string(), "foaf:name");
        assert_eq!(Term::NumericLiteral("-1.5e3".into()).to_string(), "-1.5e3");
        assert_eq!(Term::BooleanLiteral(true).to_string(), "true");
        assert_eq!(Term::BlankNode(BlankNode::Labeled("b0".into())).to_string(), "_:b0");
    }

    #[test]
    fn display_literals() {
        assert_eq!(Literal::new_simple_literal("toto").to_string(), "\"toto\"");
        assert_eq!(
            Literal::new_language_tagged_literal("\\u00DCberSoldier", "en").to_string(),
            "\"\\u00DCberSoldier\"@en"
        );
        assert_eq!(
            Literal::new_typed_literal("42", Iri::prefixed("xsd", "int")).to_string(),
            "\"42\"^^xsd:int"
        );
        assert_eq!(Literal::new_simple_literal("say \"hi\"").to_string(), "'say \"hi\"'");
        assert_eq!(Literal::new_simple_literal("a\nb").to_string(), "\"\"\"a\nb\"\"\"");
    }

    #[test]
    fn anonymous_blank_nodes_are_distinct() {
        let first = Term::BlankNode(BlankNode::Anonymous(0));
        let second = Term::BlankNode(BlankNode::Anonymous(1));
        assert_eq!(first.to_string(), second.to_string());
        assert_ne!(first.identity_key(), second.identity_key());
        assert_ne!(first.identity_key(), "[]");
    }

    #[test]
    fn rdf_type_detection() {
        assert!(Term::from(rdf::TYPE).is_rdf_type());
        assert!(!Term::Iri(Iri::prefixed("rdf", "type")).is_rdf_type());
        assert!(!Term::variable("type").is_rdf_type());
    }
}
