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

//! Quote- and bracket-aware helpers over raw statement text.
//!
//! Statement rules work on source text before it becomes an expression
//! (`print(a, [b, c])`, `return x, y`, `{"k": v}`), so they need to split
//! on commas and colons that are not nested inside brackets or strings.

/// Scanner state shared by the helpers below.
struct Scan {
    depth: i32,
    quote: Option<char>,
    prev: char,
}

impl Scan {
    fn new() -> Self {
        Self {
            depth: 0,
            quote: None,
            prev: '\0',
        }
    }

    /// Feeds one character; returns `true` if it sits at the top level
    /// (outside every bracket and string) and is not itself a delimiter.
    fn step(&mut self, c: char) -> bool {
        let top = match self.quote {
            Some(q) => {
                if c == q && self.prev != '\\' {
                    self.quote = None;
                }
                false
            }
            None => match c {
                '"' | '\'' => {
                    self.quote = Some(c);
                    false
                }
                '(' | '[' | '{' => {
                    self.depth += 1;
                    false
                }
                ')' | ']' | '}' => {
                    self.depth -= 1;
                    false
                }
                _ => self.depth == 0,
            },
        };

        // An escaped backslash must not escape the following quote.
        self.prev = if self.prev == '\\' && c == '\\' { '\0' } else { c };
        top
    }
}

/// Splits `text` on every top-level `sep`, trimming each part.
///
/// A trailing empty part (`a, b,`) is dropped; an empty input gives no parts.
pub fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut scan = Scan::new();

    for c in text.chars() {
        if scan.step(c) && c == sep {
            parts.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Byte offset of the first top-level `target`.
pub fn find_top_level(text: &str, target: char) -> Option<usize> {
    let mut scan = Scan::new();
    text.char_indices()
        .find(|(_, c)| scan.step(*c) && *c == target)
        .map(|(i, _)| i)
}

/// Net count of open brackets in `text`, ignoring quoted text.
///
/// Used to decide whether a multi-line `let` literal is complete.
pub fn bracket_depth(text: &str) -> i32 {
    let mut scan = Scan::new();
    for c in text.chars() {
        scan.step(c);
    }
    scan.depth
}

/// Returns the raw content if `text` is exactly one quoted string literal.
///
/// `"a" + "b"` is two literals and yields `None`.
pub fn single_string_literal(text: &str) -> Option<&str> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if text.len() < 2 || !text.ends_with(quote) {
        return None;
    }

    let inner = &text[1..text.len() - 1];
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return None;
        }
    }

    // A trailing lone backslash would have escaped the closing quote.
    if escaped {
        return None;
    }
    Some(inner)
}

/// Returns the inner text if the outer `{` and `}` of `text` enclose it
/// as one group (`{a}` yes, `{a} + {b}` no).
pub fn enclosing_braces(text: &str) -> Option<&str> {
    if !text.starts_with('{') || !text.ends_with('}') {
        return None;
    }

    let mut scan = Scan::new();
    let last = text.len() - 1;
    for (i, c) in text.char_indices() {
        scan.step(c);
        if scan.depth == 0 && i < last {
            return None;
        }
    }

    Some(&text[1..last])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_inside_brackets_and_strings_do_not_split() {
        assert_eq!(
            split_top_level(r#""a, b", [1, 2], f(x, y), z"#, ','),
            vec![r#""a, b""#, "[1, 2]", "f(x, y)", "z"]
        );
    }

    #[test]
    fn trailing_and_empty_input() {
        assert_eq!(split_top_level("a, b,", ','), vec!["a", "b"]);
        assert!(split_top_level("  ", ',').is_empty());
    }

    #[test]
    fn escaped_quote_stays_inside_string() {
        assert_eq!(split_top_level(r#""it\"s, ok", 2"#, ','), vec![r#""it\"s, ok""#, "2"]);
    }

    #[test]
    fn finds_first_top_level_colon() {
        assert_eq!(find_top_level(r#""a:b": {"c": 1}"#, ':'), Some(5));
        assert_eq!(find_top_level("[1:2]", ':'), None);
    }

    #[test]
    fn single_literal_detection() {
        assert_eq!(single_string_literal(r#""hello {name}""#), Some("hello {name}"));
        assert_eq!(single_string_literal(r#""a" + "b""#), None);
        assert_eq!(single_string_literal(r#""say \"hi\"""#), Some(r#"say \"hi\""#));
        assert_eq!(single_string_literal("x"), None);
    }

    #[test]
    fn brace_group_must_span_the_text() {
        assert_eq!(enclosing_braces(r#"{"a": 1}"#), Some(r#""a": 1"#));
        assert_eq!(enclosing_braces("{1} == {2}"), None);
        assert_eq!(enclosing_braces("{}"), Some(""));
    }

    #[test]
    fn depth_ignores_quoted_brackets() {
        assert_eq!(bracket_depth(r#"[1, "]", {"#), 2);
        assert_eq!(bracket_depth("[1, 2]"), 0);
    }
}
