use crate::term::Iri;
use std::fmt;

/// A [property path](https://www.w3.org/TR/sparql11-query/#propertypaths) in predicate position.
///
/// Only the shape of the path is kept; its [`Display`](fmt::Display) implementation renders a
/// normalized expression that parses back to the same tree.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum PropertyPath {
    Iri(Iri),
    Reverse(Box<PropertyPath>),
    Sequence(Vec<PropertyPath>),
    Alternative(Vec<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
    ZeroOrOne(Box<PropertyPath>),
    NegatedPropertySet(Vec<NegatedIri>),
}

/// A member of a negated property set: `<iri>` or `^<iri>`.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct NegatedIri {
    pub iri: Iri,
    pub inverse: bool,
}

impl PropertyPath {
    /// Whether the path can be written as a `PathPrimary` without parentheses.
    fn is_primary(&self) -> bool {
        matches!(self, Self::Iri(_) | Self::NegatedPropertySet(_))
    }

    /// Whether the path can be written as a `PathElt` without parentheses.
    fn is_elt(&self) -> bool {
        self.is_primary()
            || matches!(
                self,
                Self::ZeroOrMore(_) | Self::OneOrMore(_) | Self::ZeroOrOne(_)
            )
    }

    fn fmt_primary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_primary() {
            fmt::Display::fmt(self, f)
        } else {
            write!(f, "({self})")
        }
    }
}

impl fmt::Display for NegatedIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            f.write_str("^")?;
        }
        self.iri.fmt(f)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Reverse(inner) => {
                if inner.is_elt() {
                    write!(f, "^{inner}")
                } else {
                    write!(f, "^({inner})")
                }
            }
            Self::Sequence(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    if matches!(element, Self::Sequence(_) | Self::Alternative(_)) {
                        write!(f, "({element})")?;
                    } else {
                        element.fmt(f)?;
                    }
                }
                Ok(())
            }
            Self::Alternative(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    if matches!(alternative, Self::Alternative(_)) {
                        write!(f, "({alternative})")?;
                    } else {
                        alternative.fmt(f)?;
                    }
                }
                Ok(())
            }
            Self::ZeroOrMore(inner) => {
                inner.fmt_primary(f)?;
                f.write_str("*")
            }
            Self::OneOrMore(inner) => {
                inner.fmt_primary(f)?;
                f.write_str("+")
            }
            Self::ZeroOrOne(inner) => {
                inner.fmt_primary(f)?;
                f.write_str("?")
            }
            Self::NegatedPropertySet(set) => {
                if let [single] = set.as_slice() {
                    write!(f, "!{single}")
                } else {
                    f.write_str("!(")?;
                    for (i, member) in set.iter().enumerate() {
                        if i > 0 {
                            f.write_str("|")?;
                        }
                        member.fmt(f)?;
                    }
                    f.write_str(")")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(value: &str) -> PropertyPath {
        PropertyPath::Iri(Iri::absolute(value))
    }

    #[test]
    fn display_sequence_and_alternative() {
        let path = PropertyPath::Sequence(vec![
            iri("a"),
            PropertyPath::Alternative(vec![iri("b"), iri("c")]),
        ]);
        assert_eq!(path.to_string(), "<a>/(<b>|<c>)");
    }

    #[test]
    fn display_modifiers_and_reverse() {
        let path = PropertyPath::OneOrMore(Box::new(PropertyPath::Alternative(vec![
            iri("a"),
            PropertyPath::Reverse(Box::new(iri("b"))),
        ])));
        assert_eq!(path.to_string(), "(<a>|^<b>)+");

        let path = PropertyPath::Reverse(Box::new(PropertyPath::ZeroOrMore(Box::new(iri("a")))));
        assert_eq!(path.to_string(), "^<a>*");

        let path = PropertyPath::ZeroOrOne(Box::new(PropertyPath::Reverse(Box::new(iri("a")))));
        assert_eq!(path.to_string(), "(^<a>)?");
    }

    #[test]
    fn display_modifiers_on_primaries() {
        let path = PropertyPath::Sequence(vec![
            PropertyPath::ZeroOrOne(Box::new(iri("a"))),
            PropertyPath::ZeroOrMore(Box::new(iri("b"))),
            PropertyPath::OneOrMore(Box::new(PropertyPath::NegatedPropertySet(vec![NegatedIri {
                iri: Iri::absolute("c"),
                inverse: false,
            }]))),
        ]);
        assert_eq!(path.to_string(), "<a>?/<b>*/!<c>+");
    }

    #[test]
    fn display_negated_property_set() {
        let single = PropertyPath::NegatedPropertySet(vec![NegatedIri {
            iri: Iri::absolute("a"),
            inverse: true,
        }]);
        assert_eq!(single.to_string(), "!^<a>");

        let many = PropertyPath::NegatedPropertySet(vec![
            NegatedIri {
                iri: Iri::absolute("a"),
                inverse: false,
            },
            NegatedIri {
                iri: Iri::prefixed("ex", "b"),
                inverse: true,
            },
        ]);
        assert_eq!(many.to_string(), "!(<a>|^ex:b)");
        assert_eq!(PropertyPath::NegatedPropertySet(Vec::new()).to_string(), "!()");
    }
}
