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

use std::fmt;

/// Represents the **category of a lexical token** in an EzScript expression.
///
/// `TokenKind` identifies how a sequence of characters from the expression
/// text should be interpreted by the parser.
///
/// # Pipeline Role
/// ```text
/// Expression Text → Natural-Language Rewrite → Lexer → TokenKind → Parser → Expr
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An integer literal such as `42`.
    Int,

    /// A floating-point literal such as `3.14` or `1e3`.
    Float,

    /// A quoted string literal. The lexeme holds the **processed** text,
    /// with escape sequences already resolved and quotes removed.
    Str,

    /// A user-defined or built-in name.
    Identifier,

    /// A reserved word (`and`, `or`, `not`, `in`, `True`, ...).
    ///
    /// Keyword detection is handled by `keywords.rs`.
    Keyword,

    /// Operators and punctuation: `+`, `//`, `**`, `==`, `(`, `,`, ...
    Symbol,

    /// End-of-input marker, always the final token.
    Eof,
}

/// Represents a **single lexical token** produced by the expression lexer.
///
/// # Example Tokens
/// ```text
/// len      →  { kind: Identifier, lexeme: "len", column: 0 }
/// 42       →  { kind: Int,        lexeme: "42",  column: 4 }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The classified category of the token.
    pub kind: TokenKind,

    /// The source text of the token (processed text for strings).
    pub lexeme: String,

    /// 0-based character offset of the token within the expression.
    pub column: usize,
}

impl Token {
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.lexeme == symbol
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == word
    }
}

impl fmt::Display for Token {
    /// Formats a token for **user-facing output**: only what the user wrote.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of expression"),
            TokenKind::Str => write!(f, "string \"{}\"", self.lexeme),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}
