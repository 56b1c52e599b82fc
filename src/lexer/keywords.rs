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

/// Determines whether a given word is a **reserved keyword** in EzScript
/// expressions.
///
/// Only a handful of words carry meaning inside the expression grammar;
/// statement words (`let`, `loop`, `function`, ...) are recognized by the
/// statement classifier before the lexer ever runs.
///
/// The second group lists words the grammar reserves but does not support
/// (`lambda`, conditional expressions, comprehensions). They are lexed as
/// keywords so the parser can reject them with a clear message.
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "and" |
        "or" |
        "not" |
        "in" |
        "True" |
        "False" |
        "None" |
        // reserved, rejected by the parser
        "is" |
        "if" |
        "else" |
        "for" |
        "lambda" |
        "yield" |
        "await"
    )
}
