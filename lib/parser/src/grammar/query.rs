//! Query forms, the prologue, dataset clauses and solution modifiers.

use super::pattern::TripleSyntax;
use super::Parser;
use crate::lex;

impl Parser<'_> {
    /// `QueryUnit ::= Prologue ( SelectQuery | ConstructQuery | DescribeQuery | AskQuery ) ValuesClause`
    pub(super) fn query_unit(&mut self) -> Option<()> {
        self.prologue();
        self.attempt(Self::select_query)
            .or_else(|| self.attempt(Self::construct_query))
            .or_else(|| self.attempt(Self::describe_query))
            .or_else(|| self.attempt(Self::ask_query))?;
        self.values_clause();
        Some(())
    }

    fn prologue(&mut self) {
        self.repeat(|p| {
            p.attempt(Self::base_decl)
                .or_else(|| p.attempt(Self::prefix_decl))
        });
    }

    fn base_decl(&mut self) -> Option<()> {
        self.keyword("BASE")?;
        self.terminal("IRIREF", lex::iriref)?;
        Some(())
    }

    fn prefix_decl(&mut self) -> Option<()> {
        self.keyword("PREFIX")?;
        let prefix = self.terminal("prefix name", lex::pname_ns)?;
        let namespace = self.terminal("IRIREF", lex::iriref)?;
        self.prefixes.insert(
            &prefix[..prefix.len() - 1],
            &namespace[1..namespace.len() - 1],
        );
        Some(())
    }

    fn select_query(&mut self) -> Option<()> {
        self.select_clause()?;
        self.repeat(Self::dataset_clause);
        self.where_clause()?;
        self.solution_modifier();
        Some(())
    }

    /// `SubSelect`: its pattern contributes to the triples of the enclosing query.
    pub(super) fn sub_select(&mut self) -> Option<()> {
        self.select_clause()?;
        self.where_clause()?;
        self.solution_modifier();
        self.values_clause();
        Some(())
    }

    fn select_clause(&mut self) -> Option<()> {
        self.keyword("SELECT")?;
        self.attempt(|p| p.one_of_keywords(&["DISTINCT", "REDUCED"]));
        if self.attempt(|p| p.punct("*")).is_some() {
            return Some(());
        }
        let projected = self.repeat(|p| {
            p.attempt(|p| p.var().map(drop))
                .or_else(|| p.attempt(Self::projection_expression))
        });
        (projected > 0).then_some(())
    }

    /// `'(' Expression 'AS' Var ')'`
    fn projection_expression(&mut self) -> Option<()> {
        self.nested(|p| {
            p.punct("(")?;
            p.expression()?;
            p.keyword("AS")?;
            p.var()?;
            p.punct(")")
        })
    }

    /// `ConstructQuery`. The triples of a construct template are not part of the query pattern.
    fn construct_query(&mut self) -> Option<()> {
        self.keyword("CONSTRUCT")?;
        self.attempt(|p| {
            p.discard_triples(Self::construct_template)?;
            p.repeat(Self::dataset_clause);
            p.where_clause()?;
            p.solution_modifier();
            Some(())
        })
        .or_else(|| {
            self.attempt(|p| {
                p.repeat(Self::dataset_clause);
                p.keyword("WHERE")?;
                p.nested(|p| {
                    p.punct("{")?;
                    p.attempt(|p| p.triples_template(TripleSyntax::Template));
                    p.punct("}")
                })?;
                p.solution_modifier();
                Some(())
            })
        })
    }

    fn construct_template(&mut self) -> Option<()> {
        self.nested(|p| {
            p.punct("{")?;
            p.attempt(|p| p.triples_template(TripleSyntax::Template));
            p.punct("}")
        })
    }

    fn describe_query(&mut self) -> Option<()> {
        self.keyword("DESCRIBE")?;
        if self.attempt(|p| p.punct("*")).is_none() {
            let described = self.repeat(|p| p.var_or_iri().map(drop));
            if described == 0 {
                return None;
            }
        }
        self.repeat(Self::dataset_clause);
        self.attempt(Self::where_clause);
        self.solution_modifier();
        Some(())
    }

    fn ask_query(&mut self) -> Option<()> {
        self.keyword("ASK")?;
        self.repeat(Self::dataset_clause);
        self.where_clause()?;
        self.solution_modifier();
        Some(())
    }

    /// `DatasetClause ::= 'FROM' 'NAMED'? iri`
    fn dataset_clause(&mut self) -> Option<()> {
        self.keyword("FROM")?;
        self.attempt(|p| p.keyword("NAMED"));
        self.iri()?;
        Some(())
    }

    /// `WhereClause ::= 'WHERE'? GroupGraphPattern`
    fn where_clause(&mut self) -> Option<()> {
        self.attempt(|p| p.keyword("WHERE"));
        self.group_graph_pattern()
    }

    fn solution_modifier(&mut self) {
        self.attempt(Self::group_clause);
        self.attempt(Self::having_clause);
        self.attempt(Self::order_clause);
        self.attempt(Self::limit_offset_clauses);
    }

    fn group_clause(&mut self) -> Option<()> {
        self.keyword("GROUP")?;
        self.keyword("BY")?;
        let conditions = self.repeat(Self::group_condition);
        (conditions > 0).then_some(())
    }

    /// `GroupCondition ::= BuiltInCall | FunctionCall | '(' Expression ( 'AS' Var )? ')' | Var`
    fn group_condition(&mut self) -> Option<()> {
        self.attempt(Self::builtin_call)
            .or_else(|| self.attempt(Self::function_call))
            .or_else(|| {
                self.attempt(|p| {
                    p.nested(|p| {
                        p.punct("(")?;
                        p.expression()?;
                        p.attempt(|p| {
                            p.keyword("AS")?;
                            p.var()
                        });
                        p.punct(")")
                    })
                })
            })
            .or_else(|| self.attempt(|p| p.var().map(drop)))
    }

    fn having_clause(&mut self) -> Option<()> {
        self.keyword("HAVING")?;
        let constraints = self.repeat(Self::constraint);
        (constraints > 0).then_some(())
    }

    fn order_clause(&mut self) -> Option<()> {
        self.keyword("ORDER")?;
        self.keyword("BY")?;
        let conditions = self.repeat(Self::order_condition);
        (conditions > 0).then_some(())
    }

    /// `OrderCondition ::= ( ( 'ASC' | 'DESC' ) BrackettedExpression ) | ( Constraint | Var )`
    fn order_condition(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.one_of_keywords(&["ASC", "DESC"])?;
            p.bracketted_expression()
        })
        .or_else(|| self.attempt(Self::constraint))
        .or_else(|| self.attempt(|p| p.var().map(drop)))
    }

    fn limit_offset_clauses(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.limit_clause()?;
            p.attempt(Self::offset_clause);
            Some(())
        })
        .or_else(|| {
            self.attempt(|p| {
                p.offset_clause()?;
                p.attempt(Self::limit_clause);
                Some(())
            })
        })
    }

    fn limit_clause(&mut self) -> Option<()> {
        self.keyword("LIMIT")?;
        self.terminal("INTEGER", lex::integer).map(drop)
    }

    fn offset_clause(&mut self) -> Option<()> {
        self.keyword("OFFSET")?;
        self.terminal("INTEGER", lex::integer).map(drop)
    }

    /// `ValuesClause ::= ( 'VALUES' DataBlock )?`
    fn values_clause(&mut self) {
        self.attempt(|p| {
            p.keyword("VALUES")?;
            p.data_block()
        });
    }

    /// `DataBlock ::= InlineDataOneVar | InlineDataFull`
    pub(super) fn data_block(&mut self) -> Option<()> {
        self.attempt(Self::inline_data_one_var)
            .or_else(|| self.attempt(Self::inline_data_full))
    }

    fn inline_data_one_var(&mut self) -> Option<()> {
        self.var()?;
        self.punct("{")?;
        self.repeat(Self::data_block_value);
        self.punct("}")
    }

    fn inline_data_full(&mut self) -> Option<()> {
        self.attempt(|p| p.terminal("NIL", lex::nil).map(drop))
            .or_else(|| {
                self.attempt(|p| {
                    p.punct("(")?;
                    p.repeat(|p| p.var().map(drop));
                    p.punct(")")
                })
            })?;
        self.punct("{")?;
        self.repeat(|p| {
            p.attempt(|p| p.terminal("NIL", lex::nil).map(drop))
                .or_else(|| {
                    p.attempt(|p| {
                        p.punct("(")?;
                        p.repeat(Self::data_block_value);
                        p.punct(")")
                    })
                })
        });
        self.punct("}")
    }

    /// `DataBlockValue ::= iri | RDFLiteral | NumericLiteral | BooleanLiteral | 'UNDEF'`
    fn data_block_value(&mut self) -> Option<()> {
        self.attempt(|p| p.keyword("UNDEF"))
            .or_else(|| self.attempt(|p| p.iri().map(drop)))
            .or_else(|| self.attempt(|p| p.rdf_literal().map(drop)))
            .or_else(|| self.attempt(|p| p.numeric_literal().map(drop)))
            .or_else(|| self.attempt(|p| p.boolean_literal().map(drop)))
    }
}
