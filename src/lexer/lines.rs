/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Line Normalizer
 * ==========================================================================
 *
 * Splits script text into lines and blanks out comments while keeping
 * indentation and line numbers intact.
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

//! Line normalizer.
//!
//! Turns raw script text into the logical line sequence the block executor
//! walks. Comment-only lines become blank lines rather than disappearing so
//! that index `i` in the output is always source line `i + 1`.

/// Character that starts a comment outside of string literals.
pub const COMMENT_MARKER: char = '#';

/// Splits `source` into normalized lines.
///
/// - `\r\n` line endings are accepted
/// - comment-only lines become `""`
/// - inline comments are stripped, leaving quoted `#` alone
/// - indentation of surviving lines is preserved
pub fn normalize(source: &str) -> Vec<String> {
    source
        .split('\n')
        .map(|raw| {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim_start().starts_with(COMMENT_MARKER) {
                String::new()
            } else {
                strip_inline_comment(line)
            }
        })
        .collect()
}

/// Removes a trailing `# ...` comment while respecting quoted text.
///
/// A quote preceded by a backslash does not open or close a string.
pub fn strip_inline_comment(line: &str) -> String {
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for (i, c) in line.char_indices() {
        match quote {
            Some(q) if c == q && prev != '\\' => quote = None,
            Some(_) => {}
            None if (c == '"' || c == '\'') && prev != '\\' => quote = Some(c),
            None if c == COMMENT_MARKER => return line[..i].trim_end().to_string(),
            None => {}
        }
        prev = c;
    }

    line.trim_end().to_string()
}

/// Width of the leading whitespace of a line, in characters.
pub fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// `true` for lines the executor skips entirely.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_lines_keep_their_slot() {
        let lines = normalize("let x be 1\n# note\n    print(x)  # trailing\n");
        assert_eq!(lines, vec!["let x be 1", "", "    print(x)", ""]);
    }

    #[test]
    fn hash_inside_strings_survives() {
        assert_eq!(
            strip_inline_comment(r##"print("#1 fan") # yes"##),
            r##"print("#1 fan")"##
        );
        assert_eq!(
            strip_inline_comment(r#"print('it\'s #2')"#),
            r#"print('it\'s #2')"#
        );
    }

    #[test]
    fn indent_counts_leading_whitespace() {
        assert_eq!(indent_of("    x"), 4);
        assert_eq!(indent_of("\tx"), 1);
        assert_eq!(indent_of("x"), 0);
    }
}
