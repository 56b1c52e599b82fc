/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Expression Lexer
 * ==========================================================================
 *
 * Turns one expression's text into tokens. Statements never reach the
 * lexer; the block executor classifies lines by pattern first.
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

use crate::error::EzError;
use crate::lexer::keywords::is_keyword;
use crate::lexer::token::{Token, TokenKind};

/// Multi-character operators, longest first so `**=`-style prefixes never
/// shadow a longer match.
const OPERATORS: &[&str] = &[
    "**", "//", "==", "!=", "<=", ">=", "+", "-", "*", "/", "%", "<", ">", "=", "(", ")", "[",
    "]", "{", "}", ",", ":", ".",
];

pub struct Lexer {
    chars: Vec<char>,
    current: usize,
    pub tokens: Vec<Token>,
}

/// Tokenizes a complete expression.
///
/// # Errors
/// Unterminated strings, malformed numbers and characters outside the
/// grammar produce a `Syntax` error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, EzError> {
    let mut lexer = Lexer::new(source);
    lexer.scan_tokens()?;
    Ok(lexer.tokens)
}

impl Lexer {
    /// Creates a new lexer over an expression string.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            tokens: Vec::new(),
        }
    }

    /// Performs complete lexical analysis, then appends a final `Eof` token.
    ///
    /// Newlines are plain whitespace here: multi-line `let` literals arrive
    /// as a single joined expression.
    pub fn scan_tokens(&mut self) -> Result<(), EzError> {
        while !self.is_at_end() {
            self.scan_token()?;
        }

        self.tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            column: self.current,
        });
        Ok(())
    }

    /// Scans and emits a single token from the character stream.
    fn scan_token(&mut self) -> Result<(), EzError> {
        let start = self.current;
        let ch = self.peek();

        match ch {
            // Whitespace
            c if c.is_whitespace() => {
                self.advance();
            }

            // Strings
            '"' | '\'' => {
                self.advance();
                self.string_with_delimiter(ch, start)?;
            }

            // Numbers (including `.5`)
            '0'..='9' => self.number(start)?,
            '.' if self.peek_next().is_ascii_digit() => self.number(start)?,

            // Identifiers / keywords
            c if c.is_alphabetic() || c == '_' => self.identifier(start),

            // Operators and punctuation
            _ => self.operator(start)?,
        }

        Ok(())
    }

    /// Parses a string literal using the provided quote delimiter.
    ///
    /// Escape sequences are resolved here so the parser receives the final
    /// text (see [`unescape_char`]).
    fn string_with_delimiter(&mut self, delimiter: char, start: usize) -> Result<(), EzError> {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(EzError::syntax(format!(
                    "unterminated string literal starting at column {}",
                    start + 1
                )));
            }

            let c = self.advance();
            if c == delimiter {
                break;
            }

            if c == '\\' && !self.is_at_end() {
                let escaped = self.advance();
                match unescape_char(escaped) {
                    Some(resolved) => value.push(resolved),
                    None => {
                        value.push('\\');
                        value.push(escaped);
                    }
                }
                continue;
            }

            value.push(c);
        }

        self.push(TokenKind::Str, value, start);
        Ok(())
    }

    /// Parses an identifier or keyword token.
    fn identifier(&mut self, start: usize) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text: String = self.chars[start..self.current].iter().collect();
        let kind = if is_keyword(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        self.push(kind, text, start);
    }

    /// Parses an integer or floating-point numeric literal.
    ///
    /// # Examples
    /// - `42`
    /// - `3.1415`
    /// - `2e10`, `1.5E-3`
    fn number(&mut self, start: usize) -> Result<(), EzError> {
        let mut is_float = false;

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && !self.peek_next().is_alphabetic() && self.peek_next() != '_' {
            is_float = true;
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        if matches!(self.peek(), 'e' | 'E') {
            let sign = matches!(self.peek_next(), '+' | '-');
            let digit_at = if sign { self.current + 2 } else { self.current + 1 };
            if self.chars.get(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.current = digit_at;
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        if self.peek().is_alphabetic() || self.peek() == '_' {
            return Err(EzError::syntax(format!(
                "invalid number literal near column {}",
                start + 1
            )));
        }

        let text: String = self.chars[start..self.current].iter().collect();
        let kind = if is_float { TokenKind::Float } else { TokenKind::Int };
        self.push(kind, text, start);
        Ok(())
    }

    /// Matches the longest operator at the cursor.
    fn operator(&mut self, start: usize) -> Result<(), EzError> {
        for op in OPERATORS {
            let len = op.chars().count();
            let matches = self
                .chars
                .get(start..start + len)
                .is_some_and(|window| window.iter().copied().eq(op.chars()));

            if matches {
                self.current += len;
                self.push(TokenKind::Symbol, op.to_string(), start);
                return Ok(());
            }
        }

        Err(EzError::syntax(format!(
            "invalid character '{}' at column {}",
            self.peek(),
            start + 1
        )))
    }

    fn push(&mut self, kind: TokenKind, lexeme: String, column: usize) {
        self.tokens.push(Token {
            kind,
            lexeme,
            column,
        });
    }

    /// Advances the cursor by one character.
    ///
    /// Caller must ensure the end has not been reached.
    fn advance(&mut self) -> char {
        let ch = self.chars[self.current];
        self.current += 1;
        ch
    }

    /// Current character, or `'\0'` at the end.
    fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    /// Character after the current one, or `'\0'`.
    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

/// Resolves the character following a backslash.
///
/// Supported: `\n \t \r \\ \" \'`. Anything else is kept verbatim,
/// backslash included.
pub fn unescape_char(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Applies [`unescape_char`] over raw literal content in a single pass.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => match unescape_char(next) {
                Some(resolved) => out.push(resolved),
                None => {
                    out.push('\\');
                    out.push(next);
                }
            },
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, String)> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.lexeme))
            .collect()
    }

    #[test]
    fn longest_operator_wins() {
        let toks = kinds("a // b ** 2 <= c");
        let symbols: Vec<_> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::Symbol)
            .map(|(_, l)| l.as_str())
            .collect();
        assert_eq!(symbols, vec!["//", "**", "<="]);
    }

    #[test]
    fn numbers_split_by_format() {
        let toks = kinds("1 2.5 3e2 .5");
        assert_eq!(toks[0], (TokenKind::Int, "1".into()));
        assert_eq!(toks[1], (TokenKind::Float, "2.5".into()));
        assert_eq!(toks[2], (TokenKind::Float, "3e2".into()));
        assert_eq!(toks[3], (TokenKind::Float, ".5".into()));
    }

    #[test]
    fn strings_resolve_escapes() {
        let toks = kinds(r#""a\tb" 'it\'s'"#);
        assert_eq!(toks[0], (TokenKind::Str, "a\tb".into()));
        assert_eq!(toks[1], (TokenKind::Str, "it's".into()));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(tokenize("\"abc").is_err());
    }

    #[test]
    fn method_call_dot_is_not_a_float() {
        let toks = kinds("x.append(1)");
        assert_eq!(toks[1], (TokenKind::Symbol, ".".into()));
        assert_eq!(toks[2], (TokenKind::Identifier, "append".into()));
    }

    #[test]
    fn single_pass_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"a\\n"), "a\\n");
        assert_eq!(unescape(r"\q"), "\\q");
    }
}
