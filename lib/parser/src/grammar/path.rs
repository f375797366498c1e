//! Property paths.
//!
//! ```text
//! Path ::= PathSequence ( '|' PathSequence )*
//! PathSequence ::= PathEltOrInverse ( '/' PathEltOrInverse )*
//! PathEltOrInverse ::= PathElt | '^' PathElt
//! PathElt ::= PathPrimary PathMod?
//! PathPrimary ::= iri | 'a' | '!' PathNegatedPropertySet | '(' Path ')'
//! PathNegatedPropertySet ::= PathOneInPropertySet | '(' ( PathOneInPropertySet ( '|' PathOneInPropertySet )* )? ')'
//! PathOneInPropertySet ::= iri | 'a' | '^' ( iri | 'a' )
//! ```

use super::Parser;
use crate::lex;
use sparql_shapes_model::{Iri, NegatedIri, PropertyPath};

impl Parser<'_> {
    pub(super) fn path(&mut self) -> Option<PropertyPath> {
        let first = self.path_sequence()?;
        let mut alternatives = vec![first];
        while let Some(alternative) = self.attempt(|p| {
            p.punct("|")?;
            p.path_sequence()
        }) {
            alternatives.push(alternative);
        }
        Some(collapse(alternatives, PropertyPath::Alternative))
    }

    fn path_sequence(&mut self) -> Option<PropertyPath> {
        let first = self.path_elt_or_inverse()?;
        let mut elements = vec![first];
        while let Some(element) = self.attempt(|p| {
            p.punct("/")?;
            p.path_elt_or_inverse()
        }) {
            elements.push(element);
        }
        Some(collapse(elements, PropertyPath::Sequence))
    }

    fn path_elt_or_inverse(&mut self) -> Option<PropertyPath> {
        if self.attempt(|p| p.punct("^")).is_some() {
            let inner = self.path_elt()?;
            return Some(PropertyPath::Reverse(Box::new(inner)));
        }
        self.path_elt()
    }

    fn path_elt(&mut self) -> Option<PropertyPath> {
        let primary = self.path_primary()?;
        let path = match self.path_mod() {
            Some('*') => PropertyPath::ZeroOrMore(Box::new(primary)),
            Some('+') => PropertyPath::OneOrMore(Box::new(primary)),
            Some('?') => PropertyPath::ZeroOrOne(Box::new(primary)),
            _ => primary,
        };
        Some(path)
    }

    /// `PathMod ::= '*' | '+' | '?'`
    ///
    /// A `?` starting a variable and a `+` starting a number belong to the object, not the path.
    fn path_mod(&mut self) -> Option<char> {
        let rest = self.rest();
        let modifier = rest.chars().next()?;
        let taken = match modifier {
            '*' => true,
            '?' => lex::var(rest).is_none(),
            '+' => lex::numeric_literal(rest).is_none(),
            _ => false,
        };
        if taken {
            self.advance(1);
            Some(modifier)
        } else {
            None
        }
    }

    fn path_primary(&mut self) -> Option<PropertyPath> {
        self.attempt(|p| p.iri_or_a().map(PropertyPath::Iri))
            .or_else(|| {
                self.attempt(|p| {
                    p.punct("!")?;
                    p.path_negated_property_set()
                })
            })
            .or_else(|| {
                self.attempt(|p| {
                    p.nested(|p| {
                        p.punct("(")?;
                        let path = p.path()?;
                        p.punct(")")?;
                        Some(path)
                    })
                })
            })
    }

    fn path_negated_property_set(&mut self) -> Option<PropertyPath> {
        if let Some(single) = self.attempt(Self::path_one_in_property_set) {
            return Some(PropertyPath::NegatedPropertySet(vec![single]));
        }
        self.punct("(")?;
        let mut set = Vec::new();
        if let Some(first) = self.attempt(Self::path_one_in_property_set) {
            set.push(first);
            while let Some(member) = self.attempt(|p| {
                p.punct("|")?;
                p.path_one_in_property_set()
            }) {
                set.push(member);
            }
        }
        self.punct(")")?;
        Some(PropertyPath::NegatedPropertySet(set))
    }

    fn path_one_in_property_set(&mut self) -> Option<NegatedIri> {
        let inverse = self.attempt(|p| p.punct("^")).is_some();
        let iri = self.iri_or_a()?;
        Some(NegatedIri { iri, inverse })
    }

    /// `iri | 'a'`
    fn iri_or_a(&mut self) -> Option<Iri> {
        self.attempt(Self::rdf_type)
            .or_else(|| self.attempt(Self::iri))
    }
}

/// Wraps `paths` with `combine` unless there is only one of them.
fn collapse(
    mut paths: Vec<PropertyPath>,
    combine: fn(Vec<PropertyPath>) -> PropertyPath,
) -> PropertyPath {
    if paths.len() == 1 {
        if let Some(single) = paths.pop() {
            return single;
        }
    }
    combine(paths)
}
