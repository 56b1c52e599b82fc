/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Expression Parser
 * ==========================================================================
 *
 * Recursive-descent parser over the token stream. The grammar lives in
 * `parser/expressions.rs`; this file holds the parser state and the
 * public entry point.
 *
 * --------------------------------------------------------------------------
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

use crate::ast::Expr;
use crate::error::EzError;
use crate::lexer::token::Token;
use crate::lexer::tokenize;
use crate::parser::natural;

/// The EzScript recursive-descent expression parser.
///
/// This structure maintains:
/// - The full token stream produced by the lexer
/// - The current cursor position into that stream
///
/// The grammar itself lives in `expressions.rs`, the token matching helpers
/// in `helpers.rs`, both as additional `impl Parser` blocks.
pub struct Parser {
    /// Complete list of tokens to be parsed. Always ends with `Eof`.
    pub tokens: Vec<Token>,

    /// Current cursor position within the token stream.
    pub current: usize,
}

/// Public entry point for the expression parsing phase.
///
/// This function:
/// 1. Rewrites natural-language operators (`is equal to` → `==`)
/// 2. Tokenizes the rewritten text
/// 3. Parses one complete expression list and rejects trailing input
///
/// # Pipeline
/// ```text
/// Text → Natural Rewrite → Lexer → Tokens → Parser → Expr → Evaluator
/// ```
pub fn parse_expression(text: &str) -> Result<Expr, EzError> {
    let rewritten = natural::rewrite(text);
    let tokens = tokenize(&rewritten)?;
    let mut parser = Parser { tokens, current: 0 };
    parser.parse()
}

impl Parser {
    /// Parses the entire token stream as a single expression.
    ///
    /// A bare comma list (`1, 2`) becomes a tuple.
    pub fn parse(&mut self) -> Result<Expr, EzError> {
        let expr = self.expression_list()?;

        if !self.is_at_end() {
            return Err(self.trailing_error());
        }

        Ok(expr)
    }
}
