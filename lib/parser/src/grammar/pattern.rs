//! Graph patterns, triple patterns and RDF terms.

use super::Parser;
use crate::error::Expected;
use crate::lex;
use sparql_shapes_model::vocab::rdf;
use sparql_shapes_model::{BlankNode, Literal, Term};

/// The two flavours of triple syntax in the grammar.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum TripleSyntax {
    /// `TriplesSameSubject`: the predicate is a variable, an IRI or `a`.
    Template,
    /// `TriplesSameSubjectPath`: the predicate may also be a property path.
    Pattern,
}

impl Parser<'_> {
    /// `GroupGraphPattern ::= '{' ( SubSelect | GroupGraphPatternSub ) '}'`
    pub(super) fn group_graph_pattern(&mut self) -> Option<()> {
        self.nested(|p| {
            p.punct("{")?;
            p.attempt(Self::sub_select)
                .or_else(|| p.attempt(Self::group_graph_pattern_sub))?;
            p.punct("}")
        })
    }

    /// `GroupGraphPatternSub ::= TriplesBlock? ( GraphPatternNotTriples '.'? TriplesBlock? )*`
    fn group_graph_pattern_sub(&mut self) -> Option<()> {
        self.attempt(Self::triples_block);
        self.repeat(|p| {
            p.graph_pattern_not_triples()?;
            p.attempt(|p| p.punct("."));
            p.attempt(Self::triples_block);
            Some(())
        });
        Some(())
    }

    /// `TriplesBlock ::= TriplesSameSubjectPath ( '.' TriplesBlock? )?`
    fn triples_block(&mut self) -> Option<()> {
        self.triples_template(TripleSyntax::Pattern)
    }

    /// A sequence of `TriplesSameSubject(Path)` separated by `.`, with an optional final `.`.
    pub(super) fn triples_template(&mut self, syntax: TripleSyntax) -> Option<()> {
        self.triples_same_subject(syntax)?;
        while self.attempt(|p| p.punct(".")).is_some() {
            if self
                .attempt(|p| p.triples_same_subject(syntax))
                .is_none()
            {
                break;
            }
        }
        Some(())
    }

    fn graph_pattern_not_triples(&mut self) -> Option<()> {
        self.attempt(Self::group_or_union_graph_pattern)
            .or_else(|| self.attempt(Self::optional_graph_pattern))
            .or_else(|| self.attempt(Self::minus_graph_pattern))
            .or_else(|| self.attempt(Self::graph_graph_pattern))
            .or_else(|| self.attempt(Self::service_graph_pattern))
            .or_else(|| self.attempt(Self::filter))
            .or_else(|| self.attempt(Self::bind))
            .or_else(|| self.attempt(Self::inline_data))
    }

    fn group_or_union_graph_pattern(&mut self) -> Option<()> {
        self.group_graph_pattern()?;
        self.repeat(|p| {
            p.keyword("UNION")?;
            p.group_graph_pattern()
        });
        Some(())
    }

    fn optional_graph_pattern(&mut self) -> Option<()> {
        self.keyword("OPTIONAL")?;
        self.group_graph_pattern()
    }

    fn minus_graph_pattern(&mut self) -> Option<()> {
        self.keyword("MINUS")?;
        self.group_graph_pattern()
    }

    fn graph_graph_pattern(&mut self) -> Option<()> {
        self.keyword("GRAPH")?;
        self.var_or_iri()?;
        self.group_graph_pattern()
    }

    fn service_graph_pattern(&mut self) -> Option<()> {
        self.keyword("SERVICE")?;
        self.attempt(|p| p.keyword("SILENT"));
        self.var_or_iri()?;
        self.group_graph_pattern()
    }

    fn filter(&mut self) -> Option<()> {
        self.keyword("FILTER")?;
        self.constraint()
    }

    fn bind(&mut self) -> Option<()> {
        self.keyword("BIND")?;
        self.nested(|p| {
            p.punct("(")?;
            p.expression()?;
            p.keyword("AS")?;
            p.var()?;
            p.punct(")")
        })
    }

    fn inline_data(&mut self) -> Option<()> {
        self.keyword("VALUES")?;
        self.data_block()
    }

    /// `TriplesSameSubject(Path) ::= VarOrTerm PropertyListNotEmpty | TriplesNode PropertyList`
    fn triples_same_subject(&mut self, syntax: TripleSyntax) -> Option<()> {
        self.attempt(|p| {
            let subject = p.var_or_term()?;
            p.property_list_not_empty(&subject, syntax)
        })
        .or_else(|| {
            self.attempt(|p| {
                let subject = p.triples_node(syntax)?;
                p.attempt(|p| p.property_list_not_empty(&subject, syntax));
                Some(())
            })
        })
    }

    /// `PropertyListNotEmpty ::= Verb ObjectList ( ';' ( Verb ObjectList )? )*`
    ///
    /// Emits one triple per object once the object is complete.
    fn property_list_not_empty(&mut self, subject: &Term, syntax: TripleSyntax) -> Option<()> {
        let predicate = self.verb(syntax)?;
        self.object_list(subject, &predicate, syntax)?;
        self.repeat(|p| {
            p.punct(";")?;
            p.attempt(|p| {
                let predicate = p.verb(syntax)?;
                p.object_list(subject, &predicate, syntax)
            });
            Some(())
        });
        Some(())
    }

    fn verb(&mut self, syntax: TripleSyntax) -> Option<Term> {
        if let Some(var) = self.attempt(Self::var) {
            return Some(var);
        }
        match syntax {
            TripleSyntax::Pattern => self.attempt(Self::path).map(Term::from),
            TripleSyntax::Template => self
                .attempt(Self::rdf_type)
                .or_else(|| self.attempt(Self::iri))
                .map(Term::from),
        }
    }

    /// `ObjectList ::= Object ( ',' Object )*`
    fn object_list(
        &mut self,
        subject: &Term,
        predicate: &Term,
        syntax: TripleSyntax,
    ) -> Option<()> {
        loop {
            let node = self.graph_node(syntax)?;
            self.emit(subject.clone(), predicate.clone(), node);
            if self.attempt(|p| p.punct(",")).is_none() {
                return Some(());
            }
        }
    }

    /// `GraphNode ::= VarOrTerm | TriplesNode`
    fn graph_node(&mut self, syntax: TripleSyntax) -> Option<Term> {
        self.attempt(Self::var_or_term)
            .or_else(|| self.attempt(|p| p.triples_node(syntax)))
    }

    /// `TriplesNode ::= Collection | BlankNodePropertyList`
    ///
    /// Returns the node standing for the collection or the property list.
    fn triples_node(&mut self, syntax: TripleSyntax) -> Option<Term> {
        self.attempt(|p| p.collection(syntax))
            .or_else(|| self.attempt(|p| p.blank_node_property_list(syntax)))
    }

    /// `'[' PropertyListNotEmpty ']'`
    fn blank_node_property_list(&mut self, syntax: TripleSyntax) -> Option<Term> {
        self.nested(|p| {
            p.punct("[")?;
            let node = p.fresh_blank_node();
            p.property_list_not_empty(&node, syntax)?;
            p.punct("]")?;
            Some(node)
        })
    }

    /// `'(' GraphNode+ ')'`, described with `rdf:first` and `rdf:rest` over fresh blank nodes.
    fn collection(&mut self, syntax: TripleSyntax) -> Option<Term> {
        let items = self.nested(|p| {
            p.punct("(")?;
            let mut items = vec![p.graph_node(syntax)?];
            while let Some(item) = p.attempt(|p| p.graph_node(syntax)) {
                items.push(item);
            }
            p.punct(")")?;
            Some(items)
        })?;
        let cells = items
            .iter()
            .map(|_| self.fresh_blank_node())
            .collect::<Vec<_>>();
        let rests = cells
            .iter()
            .skip(1)
            .cloned()
            .chain(std::iter::once(Term::from(rdf::NIL)));
        for ((cell, item), rest) in cells.iter().zip(items).zip(rests) {
            self.emit(cell.clone(), Term::from(rdf::FIRST), item);
            self.emit(cell.clone(), Term::from(rdf::REST), rest);
        }
        cells.into_iter().next()
    }

    /// `VarOrTerm ::= Var | GraphTerm`
    fn var_or_term(&mut self) -> Option<Term> {
        self.attempt(Self::var)
            .or_else(|| self.attempt(Self::graph_term))
    }

    /// `VarOrIri ::= Var | iri`
    pub(super) fn var_or_iri(&mut self) -> Option<Term> {
        self.attempt(Self::var)
            .or_else(|| self.attempt(|p| p.iri().map(Term::from)))
    }

    /// `GraphTerm ::= iri | RDFLiteral | NumericLiteral | BooleanLiteral | BlankNode | NIL`
    fn graph_term(&mut self) -> Option<Term> {
        self.attempt(|p| p.iri().map(Term::from))
            .or_else(|| self.attempt(|p| p.rdf_literal().map(Term::from)))
            .or_else(|| self.attempt(Self::numeric_literal))
            .or_else(|| self.attempt(Self::boolean_literal))
            .or_else(|| self.attempt(Self::blank_node))
            .or_else(|| {
                self.attempt(|p| {
                    p.terminal("NIL", lex::nil)?;
                    Some(Term::from(rdf::NIL))
                })
            })
    }

    fn blank_node(&mut self) -> Option<Term> {
        let label = self.attempt(|p| p.terminal("blank node label", lex::blank_node_label));
        if let Some(label) = label {
            return Some(Term::BlankNode(BlankNode::Labeled(label[2..].to_owned())));
        }
        self.terminal("ANON", lex::anon)?;
        Some(self.fresh_blank_node())
    }

    /// `RDFLiteral ::= String ( LANGTAG | ( '^^' iri ) )?`
    pub(super) fn rdf_literal(&mut self) -> Option<Literal> {
        self.step()?;
        let Some((len, quote)) = lex::string_literal(self.rest()) else {
            return self.fail(Expected::Rule("string"));
        };
        let token = self.advance(len);
        let value = &token[quote..len - quote];
        if let Some(tag) = self.attempt(|p| p.terminal("LANGTAG", lex::langtag)) {
            return Some(Literal::new_language_tagged_literal(value, &tag[1..]));
        }
        if let Some(datatype) = self.attempt(|p| {
            p.punct("^^")?;
            p.iri()
        }) {
            return Some(Literal::new_typed_literal(value, datatype));
        }
        Some(Literal::new_simple_literal(value))
    }

    pub(super) fn numeric_literal(&mut self) -> Option<Term> {
        let token = self.terminal("number", lex::numeric_literal)?;
        Some(Term::NumericLiteral(token.to_owned()))
    }

    pub(super) fn boolean_literal(&mut self) -> Option<Term> {
        let keyword = self.one_of_keywords(&["true", "false"])?;
        Some(Term::BooleanLiteral(keyword == "true"))
    }
}
