/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Error Types
 * ==========================================================================
 *
 * Runtime errors (`EzError`) carry a kind, a message and the 1-based
 * line of the statement that raised them. `ScriptError` covers the
 * failures of a whole file run.
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

use std::path::PathBuf;

use thiserror::Error;

/// Category of a runtime failure.
///
/// The kind decides nothing about propagation (every kind is caught by
/// `try`/`catch` the same way); it exists so tests and embedders can match
/// on *what* went wrong without parsing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Name lookup miss (variable, function or built-in).
    NotDefined,
    DivisionByZero,
    IndexOutOfRange,
    KeyNotFound,
    /// Invalid operand or argument types, wrong arity.
    TypeMismatch,
    /// Malformed expression or statement text.
    Syntax,
    /// `break` / `continue` outside of a loop.
    IllegalControlFlow,
    MissingParameter,
    /// `try:` block without a following `catch`.
    MissingCatch,
    InvalidCatch,
    FileNotFound,
    Io,
    /// Expression form outside the supported grammar.
    UnsupportedExpression,
    /// Raised by a script `throw` statement.
    Thrown,
    /// 64-bit integer overflow.
    Overflow,
    /// Right type, wrong value (`int("abc")`, `choice([])`).
    InvalidValue,
    RecursionLimit,
}

/// Runtime error raised by the evaluator or the block executor.
///
/// The line is attached by the first statement frame that observes the
/// error and is never overwritten afterwards.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct EzError {
    /// Stable error category.
    pub kind: ErrorKind,

    /// Human-readable error message.
    pub message: String,

    /// 1-based source line, once known.
    pub line: Option<usize>,
}

impl EzError {
    /// Generic constructor
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    /// Attaches `line` unless an inner frame already did.
    pub fn at_line(mut self, line: usize) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }

    pub fn not_defined(name: &str) -> Self {
        Self::new(
            ErrorKind::NotDefined,
            format!("Variable '{}' is not defined", name),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "Cannot divide by zero")
    }

    pub fn index_out_of_range(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::IndexOutOfRange,
            format!("List index out of range: {}", detail.into()),
        )
    }

    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::KeyNotFound,
            format!("Dictionary key not found: {}", key.into()),
        )
    }

    /// Type error (invalid operation / operand types)
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("Type error: {}", message.into()),
        )
    }

    /// Built-in argument validation failure. The message already names the
    /// built-in, so no prefix is added.
    pub fn argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Syntax,
            format!("Syntax error in expression: {}", message.into()),
        )
    }

    /// Statement-level syntax problem; the message stands on its own.
    pub fn statement(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::UnsupportedExpression,
            format!("Unsupported expression: {}", what.into()),
        )
    }

    pub fn illegal_flow(keyword: &str) -> Self {
        Self::new(
            ErrorKind::IllegalControlFlow,
            format!("'{}' can only be used inside a loop", keyword),
        )
    }

    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            ErrorKind::MissingParameter,
            format!("Missing required parameter: {}", name),
        )
    }

    pub fn thrown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Thrown, message)
    }

    pub fn overflow() -> Self {
        Self::new(ErrorKind::Overflow, "Integer overflow")
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, message)
    }
}

/// Failure of a whole script run, as seen by the command line.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("EzScript files must end with .{extension}")]
    BadExtension { extension: &'static str },

    #[error("Error: File '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("Error: Cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Uncaught runtime error; `script` is the raw script text so the
    /// diagnostic printer can quote the offending line.
    #[error("{error}")]
    Runtime { error: EzError, script: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_annotation_wins() {
        let err = EzError::division_by_zero().at_line(4).at_line(9);
        assert_eq!(err.line, Some(4));
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = EzError::not_defined("score");
        assert_eq!(err.to_string(), "Variable 'score' is not defined");
    }
}
