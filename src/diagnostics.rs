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
 *   - The MIT license
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

use std::fmt::Write as _;

use crate::error::EzError;

const RULE_WIDTH: usize = 60;

/// Renders uncaught runtime errors as a bordered report.
///
/// The printer:
/// - Names the 1-based line the error was attributed to
/// - Quotes that source line, trimmed, with a `~` underline of equal length
/// - Ends with the error message
///
/// Lines are counted in the raw script text, so the quoted line is exactly
/// what the user sees in their editor, comments included.
pub struct DiagnosticPrinter {
    /// Full text of the script that failed.
    source: String,
}

impl DiagnosticPrinter {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Builds the report text.
    ///
    /// # Output Example
    /// ```text
    ///
    /// ============================================================
    /// EzScript Error on line 3:
    /// ============================================================
    ///   let y be x / 0
    ///   ~~~~~~~~~~~~~~
    ///
    /// Cannot divide by zero
    /// ============================================================
    ///
    /// ```
    pub fn render(&self, error: &EzError) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        let line = error
            .line
            .map_or_else(|| "unknown".to_string(), |n| n.to_string());

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "EzScript Error on line {}:", line);
        let _ = writeln!(out, "{}", rule);

        // Only quote lines that actually exist in the script.
        if let Some(text) = error.line.and_then(|n| self.line_text(n)) {
            let _ = writeln!(out, "  {}", text);
            let _ = writeln!(out, "  {}", "~".repeat(text.chars().count()));
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", error.message);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out);
        out
    }

    /// Writes the report to stderr.
    pub fn print(&self, error: &EzError) {
        eprint!("{}", self.render(error));
    }

    fn line_text(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        self.source.split('\n').nth(line - 1).map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn report_quotes_and_underlines_the_line() {
        let printer = DiagnosticPrinter::new("let x be 1\n    print(x / 0)\n");
        let error = EzError::division_by_zero().at_line(2);

        let rule = "=".repeat(60);
        let expected = format!(
            "\n{rule}\nEzScript Error on line 2:\n{rule}\n  print(x / 0)\n  ~~~~~~~~~~~~\n\nCannot divide by zero\n{rule}\n\n"
        );
        assert_eq!(printer.render(&error), expected);
    }

    #[test]
    fn unknown_line_skips_the_quote() {
        let printer = DiagnosticPrinter::new("print(1)");
        let report = printer.render(&EzError::not_defined("x"));
        assert!(report.contains("EzScript Error on line unknown:"));
        assert!(!report.contains('~'));

        let report = printer.render(&EzError::not_defined("x").at_line(40));
        assert!(!report.contains('~'));
    }
}
