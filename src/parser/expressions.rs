/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the EzScript programming language project.
 *
 * EzScript is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

//! The complete EzScript expression grammar.
//!
//! Parsing order follows strict precedence, loosest first:
//!
//! ```text
//! expression_list → expression ( "," expression )*          (bare tuple)
//! expression      → or
//! or              → and ( "or" and )*
//! and             → not ( "and" not )*
//! not             → "not" not | comparison
//! comparison      → sum ( ( "==" | "!=" | "<" | ">" | "<=" | ">=" | "in" | "not" "in" ) sum )*
//! sum             → term ( ( "+" | "-" ) term )*
//! term            → unary ( ( "*" | "/" | "//" | "%" ) unary )*
//! unary           → ( "-" | "+" ) unary | power
//! power           → postfix ( "**" unary )?
//! postfix         → primary ( call | index | "." name call )*
//! primary         → literal | name | "(" ... ")" | "[" ... "]" | "{" ... "}"
//! ```

use crate::ast::{Arg, BinaryOp, CompareOp, Expr, LogicalOp, UnaryOp};
use crate::error::EzError;
use crate::lexer::token::TokenKind;
use crate::parser::parser::Parser;

impl Parser {
    /// expression_list → expression ( "," expression )* ","?
    pub fn expression_list(&mut self) -> Result<Expr, EzError> {
        let first = self.expression()?;

        if !self.check_symbol(",") {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.match_symbol(",") {
            if self.is_at_end() {
                break;
            }
            items.push(self.expression()?);
        }
        Ok(Expr::Tuple(items))
    }

    /// expression → or
    pub fn expression(&mut self) -> Result<Expr, EzError> {
        if self.check_keyword("lambda") {
            return Err(EzError::unsupported("lambda expressions"));
        }
        self.logical_or()
    }

    fn logical_or(&mut self) -> Result<Expr, EzError> {
        let mut expr = self.logical_and()?;

        while self.match_keyword("or") {
            let right = self.logical_and()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                op: LogicalOp::Or,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr, EzError> {
        let mut expr = self.logical_not()?;

        while self.match_keyword("and") {
            let right = self.logical_not()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                op: LogicalOp::And,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_not(&mut self) -> Result<Expr, EzError> {
        if self.match_keyword("not") {
            let operand = self.logical_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }

        self.comparison()
    }

    /// comparison → sum ( op sum )*, collected into one chain.
    fn comparison(&mut self) -> Result<Expr, EzError> {
        let first = self.sum()?;
        let mut rest = Vec::new();

        loop {
            let op = if let Some(symbol) =
                self.match_operator(&["==", "!=", "<=", ">=", "<", ">"])
            {
                CompareOp::from_symbol(&symbol)
                    .ok_or_else(|| EzError::syntax(format!("unknown operator '{}'", symbol)))?
            } else if self.match_keyword("in") {
                CompareOp::In
            } else if self.check_keyword("not") && self.tokens[self.current + 1].is_keyword("in") {
                self.advance();
                self.advance();
                CompareOp::NotIn
            } else {
                break;
            };

            rest.push((op, self.sum()?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    /// sum → term ( ( "+" | "-" ) term )*
    fn sum(&mut self) -> Result<Expr, EzError> {
        let mut expr = self.term()?;

        while let Some(op) = self.match_operator(&["+", "-"]) {
            let right = self.term()?;
            expr = binary(expr, if op == "+" { BinaryOp::Add } else { BinaryOp::Sub }, right);
        }

        Ok(expr)
    }

    /// term → unary ( ( "*" | "/" | "//" | "%" ) unary )*
    fn term(&mut self) -> Result<Expr, EzError> {
        let mut expr = self.unary()?;

        while let Some(op) = self.match_operator(&["*", "//", "/", "%"]) {
            let op = match op.as_str() {
                "*" => BinaryOp::Mul,
                "//" => BinaryOp::FloorDiv,
                "/" => BinaryOp::Div,
                _ => BinaryOp::Mod,
            };
            let right = self.unary()?;
            expr = binary(expr, op, right);
        }

        Ok(expr)
    }

    /// unary → ( "-" | "+" ) unary | power
    fn unary(&mut self) -> Result<Expr, EzError> {
        if let Some(op) = self.match_operator(&["-", "+"]) {
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op: if op == "-" { UnaryOp::Neg } else { UnaryOp::Pos },
                operand: Box::new(operand),
            });
        }

        self.power()
    }

    /// power → postfix ( "**" unary )?
    ///
    /// Right-associative, and binds tighter than a unary minus on its left:
    /// `-2 ** 2` is `-(2 ** 2)`.
    fn power(&mut self) -> Result<Expr, EzError> {
        let base = self.postfix()?;

        if self.match_symbol("**") {
            let exponent = self.unary()?;
            return Ok(binary(base, BinaryOp::Pow, exponent));
        }

        Ok(base)
    }

    /// postfix → primary ( "(" args ")" | "[" expr "]" | "." name "(" args ")" )*
    fn postfix(&mut self) -> Result<Expr, EzError> {
        let mut expr = self.primary()?;

        loop {
            // function call: f(...)
            if self.match_symbol("(") {
                let args = self.arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
                continue;
            }

            // index access: items[expr]
            if self.match_symbol("[") {
                if self.check_symbol(":") {
                    return Err(EzError::unsupported("slicing"));
                }
                let index = self.expression()?;
                if self.check_symbol(":") {
                    return Err(EzError::unsupported("slicing"));
                }
                self.consume_symbol("]")?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
                continue;
            }

            // method call: items.append(...)
            if self.match_symbol(".") {
                let method = self.consume_identifier("after '.'")?;
                if !self.match_symbol("(") {
                    return Err(EzError::unsupported(format!(
                        "attribute access '.{}' without a call",
                        method
                    )));
                }
                let args = self.arguments()?;
                expr = Expr::MethodCall {
                    receiver: Box::new(expr),
                    method,
                    args,
                };
                continue;
            }

            break;
        }

        Ok(expr)
    }

    /// arguments → ( arg ( "," arg )* ","? )? ")"
    /// arg       → name "=" expression | expression
    fn arguments(&mut self) -> Result<Vec<Arg>, EzError> {
        let mut args = Vec::new();

        while !self.check_symbol(")") {
            if self.check_symbol("*") || self.check_symbol("**") {
                return Err(EzError::unsupported("argument unpacking"));
            }

            let named = self.peek().kind == TokenKind::Identifier && self.peek_next_is_symbol("=");
            if named {
                let name = self.advance().lexeme;
                self.advance();
                args.push(Arg::Named(name, self.expression()?));
            } else {
                if args.iter().any(|a| matches!(a, Arg::Named(..))) {
                    return Err(EzError::syntax("positional argument follows keyword argument"));
                }
                args.push(Arg::Positional(self.expression()?));
            }

            if self.check_keyword("for") {
                return Err(EzError::unsupported("generator expressions"));
            }
            if !self.match_symbol(",") {
                break;
            }
        }

        self.consume_symbol(")")?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, EzError> {
        let token = self.advance();

        match token.kind {
            TokenKind::Int => token
                .lexeme
                .parse::<i64>()
                .map(Expr::Int)
                .map_err(|_| EzError::overflow()),

            TokenKind::Float => token
                .lexeme
                .parse::<f64>()
                .map(Expr::Float)
                .map_err(|_| EzError::syntax(format!("invalid number '{}'", token.lexeme))),

            TokenKind::Str => {
                // adjacent literals concatenate: "a" "b" → "ab"
                let mut text = token.lexeme;
                while self.peek().kind == TokenKind::Str {
                    text.push_str(&self.advance().lexeme);
                }
                Ok(Expr::Str(text))
            }

            TokenKind::Identifier => Ok(Expr::Name(token.lexeme)),

            TokenKind::Keyword => match token.lexeme.as_str() {
                "True" => Ok(Expr::Bool(true)),
                "False" => Ok(Expr::Bool(false)),
                "None" => Ok(Expr::None),
                "lambda" => Err(EzError::unsupported("lambda expressions")),
                "yield" | "await" => Err(EzError::unsupported(format!("'{}'", token.lexeme))),
                _ => Err(EzError::syntax(format!("unexpected {}", token))),
            },

            TokenKind::Symbol => match token.lexeme.as_str() {
                "(" => self.group(),
                "[" => self.list(),
                "{" => self.braces(),
                _ => Err(EzError::syntax(format!("unexpected {}", token))),
            },

            TokenKind::Eof => Err(EzError::syntax("unexpected end of expression")),
        }
    }

    /// `()` empty tuple, `(x)` grouping, `(x,)` / `(x, y)` tuple.
    fn group(&mut self) -> Result<Expr, EzError> {
        if self.match_symbol(")") {
            return Ok(Expr::Tuple(Vec::new()));
        }

        let first = self.expression()?;
        if self.check_keyword("for") {
            return Err(EzError::unsupported("generator expressions"));
        }
        if self.match_symbol(")") {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.match_symbol(",") {
            if self.check_symbol(")") {
                break;
            }
            items.push(self.expression()?);
        }
        self.consume_symbol(")")?;
        Ok(Expr::Tuple(items))
    }

    /// `[a, b, c]`
    fn list(&mut self) -> Result<Expr, EzError> {
        let items = self.comma_items("]")?;
        Ok(Expr::List(items))
    }

    /// `{}` / `{k: v, ...}` dictionary, `{a, b}` set.
    fn braces(&mut self) -> Result<Expr, EzError> {
        if self.match_symbol("}") {
            return Ok(Expr::Dict(Vec::new()));
        }

        let first = self.expression()?;

        if !self.match_symbol(":") {
            let mut items = vec![first];
            if self.check_keyword("for") {
                return Err(EzError::unsupported("comprehensions"));
            }
            if self.match_symbol(",") {
                items.extend(self.comma_items("}")?);
            } else {
                self.consume_symbol("}")?;
            }
            return Ok(Expr::Set(items));
        }

        let mut pairs = vec![(first, self.expression()?)];
        if self.check_keyword("for") {
            return Err(EzError::unsupported("comprehensions"));
        }
        while self.match_symbol(",") {
            if self.check_symbol("}") {
                break;
            }
            let key = self.expression()?;
            self.consume_symbol(":")?;
            pairs.push((key, self.expression()?));
        }
        self.consume_symbol("}")?;
        Ok(Expr::Dict(pairs))
    }

    /// Comma-separated expressions up to and including `close`.
    fn comma_items(&mut self, close: &str) -> Result<Vec<Expr>, EzError> {
        let mut items = Vec::new();

        while !self.check_symbol(close) {
            items.push(self.expression()?);
            if self.check_keyword("for") {
                return Err(EzError::unsupported("comprehensions"));
            }
            if !self.match_symbol(",") {
                break;
            }
        }

        self.consume_symbol(close)?;
        Ok(items)
    }
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Arg, BinaryOp, CompareOp, Expr, UnaryOp};
    use crate::error::ErrorKind;
    use crate::parser::parse_expression;

    fn int(n: i64) -> Box<Expr> {
        Box::new(Expr::Int(n))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                left: int(1),
                op: BinaryOp::Add,
                right: Box::new(Expr::Binary {
                    left: int(2),
                    op: BinaryOp::Mul,
                    right: int(3),
                }),
            }
        );
    }

    #[test]
    fn power_binds_tighter_than_unary_minus() {
        let expr = parse_expression("-2 ** 2").unwrap();
        assert_eq!(
            expr,
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Expr::Binary {
                    left: int(2),
                    op: BinaryOp::Pow,
                    right: int(2),
                }),
            }
        );
    }

    #[test]
    fn comparisons_chain() {
        let expr = parse_expression("1 < x <= 3").unwrap();
        match expr {
            Expr::Compare { rest, .. } => {
                let ops: Vec<_> = rest.iter().map(|(op, _)| *op).collect();
                assert_eq!(ops, vec![CompareOp::Lt, CompareOp::LtEq]);
            }
            other => panic!("expected a comparison chain, got {:?}", other),
        }
    }

    #[test]
    fn not_in_is_one_operator() {
        let expr = parse_expression("3 not in items").unwrap();
        assert!(matches!(expr, Expr::Compare { ref rest, .. } if rest[0].0 == CompareOp::NotIn));
    }

    #[test]
    fn named_arguments_and_methods() {
        let expr = parse_expression("items.sort(reverse=True)").unwrap();
        match expr {
            Expr::MethodCall { method, args, .. } => {
                assert_eq!(method, "sort");
                assert_eq!(args, vec![Arg::Named("reverse".into(), Expr::Bool(true))]);
            }
            other => panic!("expected a method call, got {:?}", other),
        }
    }

    #[test]
    fn braces_distinguish_dicts_and_sets() {
        assert!(matches!(parse_expression("{1: 2}").unwrap(), Expr::Dict(ref p) if p.len() == 1));
        assert!(matches!(parse_expression("{1, 2}").unwrap(), Expr::Set(ref s) if s.len() == 2));
        assert!(matches!(parse_expression("{}").unwrap(), Expr::Dict(ref p) if p.is_empty()));
    }

    #[test]
    fn bare_commas_make_a_tuple() {
        assert!(matches!(parse_expression("1, 2").unwrap(), Expr::Tuple(ref t) if t.len() == 2));
        assert!(matches!(parse_expression("(1,)").unwrap(), Expr::Tuple(ref t) if t.len() == 1));
        assert_eq!(parse_expression("(1)").unwrap(), Expr::Int(1));
    }

    #[test]
    fn outside_the_grammar_is_unsupported() {
        for text in [
            "x if y else z",
            "[i for i in items]",
            "items[1:2]",
            "lambda x: x",
            "point.x",
        ] {
            let err = parse_expression(text).unwrap_err();
            assert_eq!(err.kind, ErrorKind::UnsupportedExpression, "{}", text);
        }
    }

    #[test]
    fn malformed_text_is_a_syntax_error() {
        for text in ["1 +", "(1, 2", "f(a=1, 2)", "3 $ 4"] {
            let err = parse_expression(text).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Syntax, "{}", text);
        }
    }
}
