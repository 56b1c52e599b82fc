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

use crate::error::EzError;
use crate::lexer::token::{Token, TokenKind};
use crate::parser::parser::Parser;

impl Parser {
    /// Matches an expression keyword and consumes it if present.
    pub fn match_keyword(&mut self, kw: &str) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks for a keyword without consuming it.
    pub fn check_keyword(&self, kw: &str) -> bool {
        self.peek().is_keyword(kw)
    }

    /// Checks the token after the current one without advancing.
    pub fn peek_next_is_symbol(&self, symbol: &str) -> bool {
        self.tokens
            .get(self.current + 1)
            .is_some_and(|t| t.is_symbol(symbol))
    }

    /// Matches a symbol and consumes it.
    pub fn match_symbol(&mut self, symbol: &str) -> bool {
        if self.check_symbol(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if the current token matches a symbol.
    pub fn check_symbol(&self, symbol: &str) -> bool {
        self.peek().is_symbol(symbol)
    }

    /// Consumes a required symbol.
    pub fn consume_symbol(&mut self, symbol: &str) -> Result<(), EzError> {
        if self.match_symbol(symbol) {
            Ok(())
        } else {
            Err(EzError::syntax(format!(
                "expected '{}' but found {}",
                symbol,
                self.peek()
            )))
        }
    }

    /// Consumes and returns an identifier.
    pub fn consume_identifier(&mut self, context: &str) -> Result<String, EzError> {
        if self.peek().kind == TokenKind::Identifier {
            Ok(self.advance().lexeme)
        } else {
            Err(EzError::syntax(format!(
                "expected a name {} but found {}",
                context,
                self.peek()
            )))
        }
    }

    /// Attempts to match one of several operators, consuming it on success.
    pub fn match_operator(&mut self, ops: &[&str]) -> Option<String> {
        let found = ops.iter().find(|op| self.check_symbol(op))?;
        self.advance();
        Some(found.to_string())
    }

    /// Advances one token forward. Never moves past `Eof`.
    pub fn advance(&mut self) -> Token {
        let t = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        t
    }

    /// Current token.
    pub fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Returns true if the parser is at EOF.
    pub fn is_at_end(&self) -> bool {
        self.tokens[self.current].kind == TokenKind::Eof
    }

    /// Error for input left over after a complete expression.
    ///
    /// Reserved words that introduce grammar we deliberately do not carry
    /// (conditional expressions, comprehensions, `is` identity tests) get
    /// an `UnsupportedExpression` instead of a generic syntax error.
    pub fn trailing_error(&self) -> EzError {
        let token = self.peek();
        match token.lexeme.as_str() {
            "if" | "else" if token.kind == TokenKind::Keyword => {
                EzError::unsupported("conditional expressions (x if c else y)")
            }
            "for" if token.kind == TokenKind::Keyword => {
                EzError::unsupported("comprehensions")
            }
            "is" if token.kind == TokenKind::Keyword => {
                EzError::unsupported("identity tests ('is'); use 'is equal to'")
            }
            _ => EzError::syntax(format!("unexpected {}", token)),
        }
    }
}
