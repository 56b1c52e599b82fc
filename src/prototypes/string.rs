/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * String Methods
 * ==========================================================================
 *
 * Methods callable on string receivers (`name.upper()`):
 *
 *   upper  lower  strip  lstrip  rstrip  split  join  replace
 *   startswith  endswith  find  count  isdigit
 *
 * Strings are immutable; every method returns a fresh value. Positions
 * (`find`) are counted in characters, not bytes.
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
use crate::interpreter::helpers::{expect_int, iterate};
use crate::interpreter::Args;
use crate::prototypes::unknown_method;
use crate::value::Value;

pub fn call(s: &str, method: &str, args: Args) -> Result<Value, EzError> {
    match method {
        "upper" => {
            args.arity(method, 0, 0)?;
            Ok(Value::Str(s.to_uppercase()))
        }
        "lower" => {
            args.arity(method, 0, 0)?;
            Ok(Value::Str(s.to_lowercase()))
        }
        "strip" | "lstrip" | "rstrip" => {
            args.arity(method, 0, 1)?;
            let chars = optional_str(method, args.get(0))?;
            Ok(Value::str(string_strip(s, method, chars.as_deref())))
        }
        "split" => {
            args.arity(method, 0, 2)?;
            let sep = optional_str(method, args.get(0))?;
            let limit = match args.get(1) {
                Some(v) => expect_int(v)?,
                None => -1,
            };
            string_split(s, sep.as_deref(), limit)
        }
        "join" => {
            args.arity(method, 1, 1)?;
            string_join(s, &args.positional[0])
        }
        "replace" => {
            args.arity(method, 2, 3)?;
            let old = required_str(method, &args.positional[0])?;
            let new = required_str(method, &args.positional[1])?;
            Ok(Value::Str(match args.get(2).map(expect_int).transpose()? {
                Some(count) if count >= 0 => s.replacen(old, new, count as usize),
                _ => s.replace(old, new),
            }))
        }
        "startswith" => {
            args.arity(method, 1, 1)?;
            affix(s, method, &args.positional[0], |s, p| s.starts_with(p))
        }
        "endswith" => {
            args.arity(method, 1, 1)?;
            affix(s, method, &args.positional[0], |s, p| s.ends_with(p))
        }
        "find" => {
            args.arity(method, 1, 1)?;
            let needle = required_str(method, &args.positional[0])?;
            Ok(Value::Int(match s.find(needle) {
                Some(byte) => s[..byte].chars().count() as i64,
                None => -1,
            }))
        }
        "count" => {
            args.arity(method, 1, 1)?;
            let needle = required_str(method, &args.positional[0])?;
            let n = if needle.is_empty() {
                s.chars().count() + 1
            } else {
                s.matches(needle).count()
            };
            Ok(Value::Int(n as i64))
        }
        "isdigit" => {
            args.arity(method, 0, 0)?;
            Ok(Value::Bool(!s.is_empty() && s.chars().all(|c| c.is_ascii_digit())))
        }
        _ => Err(unknown_method("str", method)),
    }
}

/// `strip` family. Without `chars`, whitespace is removed.
fn string_strip<'a>(s: &'a str, method: &str, chars: Option<&str>) -> &'a str {
    let matches = |c: char| match chars {
        Some(set) => set.contains(c),
        None => c.is_whitespace(),
    };

    match method {
        "lstrip" => s.trim_start_matches(matches),
        "rstrip" => s.trim_end_matches(matches),
        _ => s.trim_matches(matches),
    }
}

/// Splits into a list of strings.
///
/// # Behavior
/// - Without a separator, runs of whitespace split and empty parts vanish.
/// - With a separator, every occurrence splits, keeping empty parts.
/// - A non-negative `limit` caps the number of splits.
///
/// # EzScript Example
/// ```text
/// print("a,b,,c".split(","))   # ['a', 'b', '', 'c']
/// print("  a  b ".split())     # ['a', 'b']
/// ```
fn string_split(s: &str, sep: Option<&str>, limit: i64) -> Result<Value, EzError> {
    let parts: Vec<String> = match sep {
        Some("") => return Err(EzError::invalid_value("empty separator")),
        Some(sep) if limit >= 0 => s.splitn(limit as usize + 1, sep).map(String::from).collect(),
        Some(sep) => s.split(sep).map(String::from).collect(),
        None if limit >= 0 => {
            let mut parts = Vec::new();
            let mut rest = s.trim_start();
            while !rest.is_empty() {
                if parts.len() as i64 == limit {
                    parts.push(rest.to_string());
                    break;
                }
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                parts.push(rest[..end].to_string());
                rest = rest[end..].trim_start();
            }
            parts
        }
        None => s.split_whitespace().map(String::from).collect(),
    };

    Ok(Value::list(parts.into_iter().map(Value::Str).collect()))
}

fn string_join(sep: &str, items: &Value) -> Result<Value, EzError> {
    let mut parts = Vec::new();
    for (i, item) in iterate(items)?.iter().enumerate() {
        match item {
            Value::Str(s) => parts.push(s.clone()),
            other => {
                return Err(EzError::type_error(format!(
                    "sequence item {}: expected str instance, {} found",
                    i,
                    other.type_name()
                )))
            }
        }
    }
    Ok(Value::Str(parts.join(sep)))
}

fn affix(
    s: &str,
    method: &str,
    arg: &Value,
    test: impl Fn(&str, &str) -> bool,
) -> Result<Value, EzError> {
    match arg {
        Value::Str(p) => Ok(Value::Bool(test(s, p))),
        Value::Tuple(options) => {
            for option in options.iter() {
                if test(s, required_str(method, option)?) {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        other => Err(EzError::type_error(format!(
            "{} first arg must be str or a tuple of str, not {}",
            method,
            other.type_name()
        ))),
    }
}

fn required_str<'a>(method: &str, value: &'a Value) -> Result<&'a str, EzError> {
    value.as_str().ok_or_else(|| {
        EzError::type_error(format!(
            "{}() argument must be str, not {}",
            method,
            value.type_name()
        ))
    })
}

fn optional_str(method: &str, value: Option<&Value>) -> Result<Option<String>, EzError> {
    match value {
        None | Some(Value::None) => Ok(None),
        Some(v) => required_str(method, v).map(|s| Some(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(s: &str, method: &str, args: Vec<Value>) -> Value {
        call(s, method, Args::new(args)).unwrap()
    }

    #[test]
    fn case_and_whitespace() {
        assert_eq!(run("Ez", "upper", vec![]), Value::str("EZ"));
        assert_eq!(run("  pad  ", "strip", vec![]), Value::str("pad"));
        assert_eq!(run("xxhixx", "lstrip", vec![Value::str("x")]), Value::str("hixx"));
    }

    #[test]
    fn split_and_join() {
        assert_eq!(run("a,b,,c", "split", vec![Value::str(",")]).to_string(), "['a', 'b', '', 'c']");
        assert_eq!(run("  a  b ", "split", vec![]).to_string(), "['a', 'b']");
        assert_eq!(
            run("a b c", "split", vec![Value::None, Value::Int(1)]).to_string(),
            "['a', 'b c']"
        );

        let words = Value::list(vec![Value::str("x"), Value::str("y")]);
        assert_eq!(run("-", "join", vec![words]), Value::str("x-y"));
        assert!(call("-", "join", Args::new(vec![Value::list(vec![Value::Int(1)])])).is_err());
    }

    #[test]
    fn find_counts_characters() {
        assert_eq!(run("héllo", "find", vec![Value::str("l")]), Value::Int(2));
        assert_eq!(run("hello", "find", vec![Value::str("z")]), Value::Int(-1));
        assert_eq!(run("banana", "count", vec![Value::str("an")]), Value::Int(2));
    }

    #[test]
    fn predicates() {
        assert_eq!(run("123", "isdigit", vec![]), Value::Bool(true));
        assert_eq!(run("", "isdigit", vec![]), Value::Bool(false));
        assert_eq!(run("report.txt", "endswith", vec![Value::str(".txt")]), Value::Bool(true));
    }

    #[test]
    fn unknown_methods_are_unsupported() {
        let err = call("x", "title", Args::default()).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::UnsupportedExpression);
    }
}
