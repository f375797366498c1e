//! Expressions, built-in calls and aggregates.
//!
//! Expressions contribute no triples, except for the patterns of `EXISTS` and `NOT EXISTS`.

use super::Parser;
use crate::error::Expected;
use crate::lex;

/// Built-in functions with a fixed number of arguments: name, minimum and maximum arity.
const BUILTINS: &[(&str, usize, usize)] = &[
    ("STR", 1, 1),
    ("LANG", 1, 1),
    ("LANGMATCHES", 2, 2),
    ("DATATYPE", 1, 1),
    ("BOUND", 1, 1),
    ("IRI", 1, 1),
    ("URI", 1, 1),
    ("BNODE", 0, 1),
    ("RAND", 0, 0),
    ("ABS", 1, 1),
    ("CEIL", 1, 1),
    ("FLOOR", 1, 1),
    ("ROUND", 1, 1),
    ("CONCAT", 0, usize::MAX),
    ("SUBSTR", 2, 3),
    ("STRLEN", 1, 1),
    ("REPLACE", 3, 4),
    ("UCASE", 1, 1),
    ("LCASE", 1, 1),
    ("ENCODE_FOR_URI", 1, 1),
    ("CONTAINS", 2, 2),
    ("STRSTARTS", 2, 2),
    ("STRENDS", 2, 2),
    ("STRBEFORE", 2, 2),
    ("STRAFTER", 2, 2),
    ("YEAR", 1, 1),
    ("MONTH", 1, 1),
    ("DAY", 1, 1),
    ("HOURS", 1, 1),
    ("MINUTES", 1, 1),
    ("SECONDS", 1, 1),
    ("TIMEZONE", 1, 1),
    ("TZ", 1, 1),
    ("NOW", 0, 0),
    ("UUID", 0, 0),
    ("STRUUID", 0, 0),
    ("MD5", 1, 1),
    ("SHA1", 1, 1),
    ("SHA256", 1, 1),
    ("SHA384", 1, 1),
    ("SHA512", 1, 1),
    ("COALESCE", 0, usize::MAX),
    ("IF", 3, 3),
    ("STRLANG", 2, 2),
    ("STRDT", 2, 2),
    ("sameTerm", 2, 2),
    ("isIRI", 1, 1),
    ("isURI", 1, 1),
    ("isBLANK", 1, 1),
    ("isLITERAL", 1, 1),
    ("isNUMERIC", 1, 1),
    ("REGEX", 2, 3),
];

const AGGREGATES: &[&str] = &["SUM", "MIN", "MAX", "AVG", "SAMPLE"];

impl Parser<'_> {
    /// `Expression ::= ConditionalAndExpression ( '||' ConditionalAndExpression )*`
    pub(super) fn expression(&mut self) -> Option<()> {
        self.conditional_and_expression()?;
        self.repeat(|p| {
            p.punct("||")?;
            p.conditional_and_expression()
        });
        Some(())
    }

    fn conditional_and_expression(&mut self) -> Option<()> {
        self.relational_expression()?;
        self.repeat(|p| {
            p.punct("&&")?;
            p.relational_expression()
        });
        Some(())
    }

    /// `RelationalExpression ::= NumericExpression ( op NumericExpression | 'NOT'? 'IN' ExpressionList )?`
    fn relational_expression(&mut self) -> Option<()> {
        self.additive_expression()?;
        self.attempt(|p| {
            // Two-character operators first, so that `<=` is not read as `<`.
            for operator in ["!=", "<=", ">=", "=", "<", ">"] {
                if p.attempt(|p| p.punct(operator)).is_some() {
                    return p.additive_expression();
                }
            }
            p.attempt(|p| p.keyword("NOT"));
            p.keyword("IN")?;
            p.expression_list().map(drop)
        });
        Some(())
    }

    fn additive_expression(&mut self) -> Option<()> {
        self.multiplicative_expression()?;
        self.repeat(|p| {
            p.attempt(|p| p.punct("+"))
                .or_else(|| p.attempt(|p| p.punct("-")))?;
            p.multiplicative_expression()
        });
        Some(())
    }

    fn multiplicative_expression(&mut self) -> Option<()> {
        self.unary_expression()?;
        self.repeat(|p| {
            p.attempt(|p| p.punct("*"))
                .or_else(|| p.attempt(|p| p.punct("/")))?;
            p.unary_expression()
        });
        Some(())
    }

    /// `UnaryExpression ::= ( '!' | '+' | '-' )? PrimaryExpression`
    fn unary_expression(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.attempt(|p| p.punct("!"))
                .or_else(|| p.attempt(|p| p.punct("+")))
                .or_else(|| p.attempt(|p| p.punct("-")))?;
            p.primary_expression()
        })
        .or_else(|| self.attempt(Self::primary_expression))
    }

    fn primary_expression(&mut self) -> Option<()> {
        self.attempt(Self::bracketted_expression)
            .or_else(|| self.attempt(Self::builtin_call))
            .or_else(|| self.attempt(Self::iri_or_function))
            .or_else(|| self.attempt(|p| p.rdf_literal().map(drop)))
            .or_else(|| self.attempt(|p| p.numeric_literal().map(drop)))
            .or_else(|| self.attempt(|p| p.boolean_literal().map(drop)))
            .or_else(|| self.attempt(|p| p.var().map(drop)))
    }

    pub(super) fn bracketted_expression(&mut self) -> Option<()> {
        self.nested(|p| {
            p.punct("(")?;
            p.expression()?;
            p.punct(")")
        })
    }

    /// `Constraint ::= BrackettedExpression | BuiltInCall | FunctionCall`
    pub(super) fn constraint(&mut self) -> Option<()> {
        self.attempt(Self::bracketted_expression)
            .or_else(|| self.attempt(Self::builtin_call))
            .or_else(|| self.attempt(Self::function_call))
    }

    /// `FunctionCall ::= iri ArgList`
    pub(super) fn function_call(&mut self) -> Option<()> {
        self.iri()?;
        self.arg_list()
    }

    /// `iriOrFunction ::= iri ArgList?`
    fn iri_or_function(&mut self) -> Option<()> {
        self.iri()?;
        self.attempt(Self::arg_list);
        Some(())
    }

    /// `ArgList ::= NIL | '(' 'DISTINCT'? Expression ( ',' Expression )* ')'`
    fn arg_list(&mut self) -> Option<()> {
        if self.attempt(|p| p.terminal("NIL", lex::nil)).is_some() {
            return Some(());
        }
        self.nested(|p| {
            p.punct("(")?;
            p.attempt(|p| p.keyword("DISTINCT"));
            p.expression()?;
            p.repeat(|p| {
                p.punct(",")?;
                p.expression()
            });
            p.punct(")")
        })
    }

    /// `ExpressionList ::= NIL | '(' Expression ( ',' Expression )* ')'`
    ///
    /// Returns the number of expressions.
    fn expression_list(&mut self) -> Option<usize> {
        if self.attempt(|p| p.terminal("NIL", lex::nil)).is_some() {
            return Some(0);
        }
        self.nested(|p| {
            p.punct("(")?;
            p.expression()?;
            let more = p.repeat(|p| {
                p.punct(",")?;
                p.expression()
            });
            p.punct(")")?;
            Some(1 + more)
        })
    }

    /// `BuiltInCall`, including aggregates and `EXISTS`.
    pub(super) fn builtin_call(&mut self) -> Option<()> {
        self.attempt(Self::aggregate)
            .or_else(|| self.attempt(Self::exists))
            .or_else(|| self.attempt(Self::builtin_function))
    }

    fn builtin_function(&mut self) -> Option<()> {
        self.step()?;
        let rest = self.rest();
        let Some((len, min, max)) = BUILTINS
            .iter()
            .find_map(|&(name, min, max)| lex::keyword(rest, name).map(|len| (len, min, max)))
        else {
            return self.fail(Expected::Rule("built-in function"));
        };
        self.advance(len);
        let arguments = self.pos;
        let arity = self.expression_list()?;
        if (min..=max).contains(&arity) {
            Some(())
        } else {
            self.pos = arguments;
            self.fail(Expected::Rule("arguments"))
        }
    }

    /// `ExistsFunc | NotExistsFunc`
    fn exists(&mut self) -> Option<()> {
        self.attempt(|p| p.keyword("NOT"));
        self.keyword("EXISTS")?;
        self.group_graph_pattern()
    }

    /// `Aggregate`
    fn aggregate(&mut self) -> Option<()> {
        if self.attempt(|p| p.keyword("COUNT")).is_some() {
            return self.nested(|p| {
                p.punct("(")?;
                p.attempt(|p| p.keyword("DISTINCT"));
                p.attempt(|p| p.punct("*"))
                    .or_else(|| p.attempt(Self::expression))?;
                p.punct(")")
            });
        }
        if self.attempt(|p| p.keyword("GROUP_CONCAT")).is_some() {
            return self.nested(|p| {
                p.punct("(")?;
                p.attempt(|p| p.keyword("DISTINCT"));
                p.expression()?;
                p.attempt(|p| {
                    p.punct(";")?;
                    p.keyword("SEPARATOR")?;
                    p.punct("=")?;
                    p.rdf_literal().map(drop)
                });
                p.punct(")")
            });
        }
        self.one_of_keywords(AGGREGATES)?;
        self.nested(|p| {
            p.punct("(")?;
            p.attempt(|p| p.keyword("DISTINCT"));
            p.expression()?;
            p.punct(")")
        })
    }
}
