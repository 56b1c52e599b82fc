/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Natural-Language Operators
 * ==========================================================================
 *
 * Rewrites phrases such as `is greater than` into symbolic operators
 * before an expression is tokenized.
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

//! Natural-language operator rewriting.
//!
//! Scripts may write `if score is greater than 10 then`. Before an
//! expression reaches the lexer, each phrase below is replaced by its
//! symbolic operator so the grammar underneath stays conventional.

/// Phrase table, longest first. A phrase only matches on word boundaries
/// and words may be separated by any amount of whitespace.
const PHRASES: &[(&[&str], &str)] = &[
    (&["is", "not", "equal", "to"], "!="),
    (&["is", "greater", "or", "equal", "to"], ">="),
    (&["is", "lesser", "or", "equal", "to"], "<="),
    (&["is", "equal", "to"], "=="),
    (&["greater", "or", "equal", "to"], ">="),
    (&["lesser", "or", "equal", "to"], "<="),
    (&["is", "greater", "than"], ">"),
    (&["is", "less", "than"], "<"),
    (&["not", "equal", "to"], "!="),
    (&["greater", "than"], ">"),
    (&["less", "than"], "<"),
    (&["is", "not"], "!="),
    (&["is"], "=="),
    (&["true"], "True"),
    (&["false"], "False"),
];

/// Rewrites every natural-language operator phrase in `text`.
///
/// Quoted text is copied through untouched, so
/// `print("this is fine")` keeps its `is`.
pub fn rewrite(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        if c == '"' || c == '\'' {
            quote = Some(c);
            out.push(c);
            i += 1;
            continue;
        }

        let at_boundary = i == 0 || !is_word_char(chars[i - 1]);
        if at_boundary && c.is_alphabetic() {
            if let Some((len, symbol)) = match_phrase(&chars, i) {
                out.push_str(symbol);
                i += len;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

/// Tries every phrase at `start`; returns the consumed length and the
/// replacement of the first (longest) hit.
fn match_phrase(chars: &[char], start: usize) -> Option<(usize, &'static str)> {
    PHRASES.iter().find_map(|(words, symbol)| {
        let mut pos = start;

        for (n, word) in words.iter().enumerate() {
            if n > 0 {
                let gap = chars[pos..].iter().take_while(|c| c.is_whitespace()).count();
                if gap == 0 {
                    return None;
                }
                pos += gap;
            }

            let end = pos + word.chars().count();
            if end > chars.len() || !chars[pos..end].iter().copied().eq(word.chars()) {
                return None;
            }
            pos = end;
        }

        if chars.get(pos).is_some_and(|c| is_word_char(*c)) {
            return None;
        }
        Some((pos - start, *symbol))
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::rewrite;

    #[test]
    fn phrases_become_operators() {
        assert_eq!(rewrite("n is equal to 0"), "n == 0");
        assert_eq!(rewrite("a greater or equal to b"), "a >= b");
        assert_eq!(rewrite("a lesser or equal to b"), "a <= b");
        assert_eq!(rewrite("a greater than b"), "a > b");
        assert_eq!(rewrite("a less than b"), "a < b");
        assert_eq!(rewrite("a not equal to b"), "a != b");
        assert_eq!(rewrite("a is not b"), "a != b");
        assert_eq!(rewrite("a is b"), "a == b");
    }

    #[test]
    fn is_prefixed_comparisons_are_accepted() {
        assert_eq!(rewrite("score is greater than 10"), "score > 10");
        assert_eq!(rewrite("score is less than 10"), "score < 10");
        assert_eq!(rewrite("a is not equal to b"), "a != b");
    }

    #[test]
    fn booleans_are_capitalised() {
        assert_eq!(rewrite("done is true"), "done == True");
        assert_eq!(rewrite("false"), "False");
    }

    #[test]
    fn quoted_text_and_identifiers_are_untouched() {
        assert_eq!(rewrite(r#"msg is "this is it""#), r#"msg == "this is it""#);
        assert_eq!(rewrite("island is this_is"), "island == this_is");
        assert_eq!(rewrite("trueish"), "trueish");
    }

    #[test]
    fn extra_whitespace_between_words() {
        assert_eq!(rewrite("a  is   equal to b"), "a  == b");
    }
}
