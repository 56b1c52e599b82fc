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

use crate::value::Value;

/// ============================================================================
/// value_to_string
/// ============================================================================
/// Converts an EzScript runtime `Value` into its **printed form**.
/// This is used by:
///   - `print(...)`
///   - `str(...)`
///   - string interpolation (`"hello {name}"`)
///   - `throw` and the `catch` variable
///
/// Strings print bare; everything nested inside a container prints in its
/// quoted `value_repr` form.
///
/// Examples:
///   - Int(3)            → "3"
///   - Float(3.0)        → "3.0"
///   - Str("cat")        → "cat"
///   - List([1, "a"])    → "[1, 'a']"
///   - Tuple([1])        → "(1,)"
///   - Bool(true)        → "True"
/// ============================================================================
pub fn value_to_string(val: &Value) -> String {
    match val {
        Value::Str(s) => s.clone(),
        other => value_repr(other),
    }
}

/// ============================================================================
/// value_repr
/// ============================================================================
/// Quoted, unambiguous form. Strings are wrapped in quotes and escaped;
/// every other value renders the same as `value_to_string`.
/// ============================================================================
pub fn value_repr(val: &Value) -> String {
    match val {
        // ------------------------
        // Scalars
        // ------------------------
        Value::None => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Str(s) => quote_str(s),

        // ------------------------
        // Containers
        // ------------------------
        Value::List(items) => format!("[{}]", join_repr(items.borrow().iter())),

        Value::Tuple(items) => {
            if items.len() == 1 {
                format!("({},)", value_repr(&items[0]))
            } else {
                format!("({})", join_repr(items.iter()))
            }
        }

        Value::Set(items) => {
            let items = items.borrow();
            if items.is_empty() {
                "set()".to_string()
            } else {
                format!("{{{}}}", join_repr(items.iter()))
            }
        }

        Value::Dict(map) => {
            let map = map.borrow();
            let body = map
                .iter()
                .map(|(k, v)| format!("{}: {}", value_repr(k), value_repr(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{}}}", body)
        }

        // ------------------------
        // Callables
        // ------------------------
        Value::Builtin(b) if b.is_type() => format!("<class '{}'>", b.name()),
        Value::Builtin(b) => format!("<built-in function {}>", b.name()),
        Value::Function(f) => format!("<function {}>", f.name),
    }
}

fn join_repr<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    items.map(value_repr).collect::<Vec<_>>().join(", ")
}

/// Formats a float the way scripts expect to read it back:
/// integral values keep a trailing `.0`, very large or very small
/// magnitudes switch to exponent notation (`1e+16`, `1e-05`).
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        // Rust renders `1e16` / `1e-5`; scripts expect a signed, two-digit exponent.
        let raw = format!("{:e}", f);
        if let Some((mantissa, exponent)) = raw.split_once('e') {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exponent),
            };
            return format!("{}e{}{:0>2}", mantissa, sign, digits);
        }
        return raw;
    }

    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// Single quotes unless the text contains a single quote and no double quote.
fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_keep_their_decimal_point() {
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(-2.5), "-2.5");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(0.00001), "1e-05");
    }

    #[test]
    fn nested_strings_are_quoted() {
        let v = Value::list(vec![Value::Int(1), Value::str("a"), Value::None]);
        assert_eq!(value_to_string(&v), "[1, 'a', None]");
        assert_eq!(value_to_string(&Value::str("a")), "a");
    }

    #[test]
    fn single_element_tuple_has_trailing_comma() {
        assert_eq!(value_to_string(&Value::tuple(vec![Value::Int(7)])), "(7,)");
        assert_eq!(
            value_to_string(&Value::tuple(vec![Value::Int(1), Value::Int(2)])),
            "(1, 2)"
        );
    }

    #[test]
    fn quote_choice_follows_content() {
        assert_eq!(value_repr(&Value::str("it's")), "\"it's\"");
        assert_eq!(value_repr(&Value::str("a\nb")), "'a\\nb'");
    }
}
