/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Sequence Built-ins
 * ==========================================================================
 *
 * len, range, sorted, reversed, enumerate, zip, all, any.
 *
 * Every built-in here that produces a sequence produces a fresh list; no
 * lazy iterator objects exist at script level.
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

use std::cmp::Ordering;

use crate::error::EzError;
use crate::globals::Builtin;
use crate::interpreter::helpers::{expect_int, iterate};
use crate::interpreter::Args;
use crate::value::Value;

pub fn call(builtin: Builtin, name: &str, mut args: Args) -> Result<Value, EzError> {
    match builtin {
        Builtin::Len => {
            args.arity(name, 1, 1)?;
            len(&args.positional[0]).map(Value::Int)
        }
        Builtin::Range => {
            args.arity(name, 1, 3)?;
            range(&args.positional)
        }
        Builtin::Sorted => {
            let reverse = args.take_named("reverse").is_some_and(|v| v.is_truthy());
            args.arity(name, 1, 1)?;
            let mut items = iterate(&args.positional[0])?;
            sort_values(&mut items, reverse)?;
            Ok(Value::list(items))
        }
        Builtin::Reversed => {
            args.arity(name, 1, 1)?;
            reversed(&args.positional[0])
        }
        Builtin::Enumerate => {
            let named_start = args.take_named("start");
            args.arity(name, 1, 2)?;
            let start = match named_start.as_ref().or(args.get(1)) {
                Some(v) => expect_int(v)?,
                None => 0,
            };
            enumerate(&args.positional[0], start)
        }
        Builtin::Zip => {
            args.no_named(name)?;
            zip(&args.positional)
        }
        Builtin::All => {
            args.arity(name, 1, 1)?;
            Ok(Value::Bool(iterate(&args.positional[0])?.iter().all(Value::is_truthy)))
        }
        Builtin::Any => {
            args.arity(name, 1, 1)?;
            Ok(Value::Bool(iterate(&args.positional[0])?.iter().any(Value::is_truthy)))
        }
        _ => Err(EzError::unsupported(format!("{}()", name))),
    }
}

/// Number of elements; characters for strings.
pub fn len(value: &Value) -> Result<i64, EzError> {
    let n = match value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) | Value::Set(items) => items.borrow().len(),
        Value::Tuple(items) => items.len(),
        Value::Dict(map) => map.borrow().len(),
        other => {
            return Err(EzError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    Ok(n as i64)
}

/// `range(stop)`, `range(start, stop)`, `range(start, stop, step)`.
///
/// # Returns
/// A list of integers. A step of zero is an `InvalidValue` error.
fn range(args: &[Value]) -> Result<Value, EzError> {
    let ints = args.iter().map(expect_int).collect::<Result<Vec<_>, _>>()?;

    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(EzError::type_error("range expected 1 to 3 arguments")),
    };

    if step == 0 {
        return Err(EzError::invalid_value("range() arg 3 must not be zero"));
    }

    let mut out = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        out.push(Value::Int(i));
        i = match i.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(Value::list(out))
}

/// Stable sort by script ordering; the first comparison failure wins.
pub fn sort_values(items: &mut [Value], reverse: bool) -> Result<(), EzError> {
    let mut failure = None;

    items.sort_by(|a, b| {
        let (x, y) = if reverse { (b, a) } else { (a, b) };
        match Value::compare(x, y) {
            Ok(ordering) => ordering,
            Err(e) => {
                if failure.is_none() {
                    failure = Some(e);
                }
                Ordering::Equal
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn reversed(value: &Value) -> Result<Value, EzError> {
    match value {
        Value::List(_) | Value::Tuple(_) | Value::Str(_) | Value::Dict(_) => {
            let mut items = iterate(value)?;
            items.reverse();
            Ok(Value::list(items))
        }
        other => Err(EzError::type_error(format!(
            "'{}' object is not reversible",
            other.type_name()
        ))),
    }
}

fn enumerate(value: &Value, start: i64) -> Result<Value, EzError> {
    let items = iterate(value)?;
    let mut out = Vec::with_capacity(items.len());
    let mut n = start;
    for item in items {
        out.push(Value::tuple(vec![Value::Int(n), item]));
        n = n.checked_add(1).ok_or_else(EzError::overflow)?;
    }
    Ok(Value::list(out))
}

/// Pairs elements position-wise, stopping at the shortest input.
fn zip(values: &[Value]) -> Result<Value, EzError> {
    let columns = values.iter().map(iterate).collect::<Result<Vec<_>, _>>()?;
    let shortest = columns.iter().map(Vec::len).min().unwrap_or(0);

    let rows = (0..shortest)
        .map(|i| Value::tuple(columns.iter().map(|col| col[i].clone()).collect()))
        .collect();
    Ok(Value::list(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Value {
        Value::list(values.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn range_forms() {
        assert_eq!(range(&[Value::Int(3)]).unwrap(), ints(&[0, 1, 2]));
        assert_eq!(range(&[Value::Int(5), Value::Int(0), Value::Int(-2)]).unwrap(), ints(&[5, 3, 1]));
        assert!(range(&[Value::Int(0), Value::Int(3), Value::Int(0)]).is_err());
        assert!(range(&[Value::Float(1.5)]).is_err());
    }

    #[test]
    fn sorted_honours_reverse_keyword() {
        let mut args = Args::new(vec![ints(&[3, 1, 2])]);
        args.named.push(("reverse".into(), Value::Bool(true)));
        assert_eq!(call(Builtin::Sorted, "sorted", args).unwrap(), ints(&[3, 2, 1]));
    }

    #[test]
    fn sorting_mixed_types_fails() {
        let mut items = vec![Value::Int(1), Value::str("a")];
        assert!(sort_values(&mut items, false).is_err());
    }

    #[test]
    fn len_counts_characters() {
        assert_eq!(len(&Value::str("héllo")).unwrap(), 5);
        assert!(len(&Value::Int(5)).is_err());
    }

    #[test]
    fn zip_stops_at_shortest() {
        let v = zip(&[ints(&[1, 2, 3]), Value::str("ab")]).unwrap();
        assert_eq!(v.to_string(), "[(1, 'a'), (2, 'b')]");
    }

    #[test]
    fn enumerate_with_start() {
        let mut args = Args::new(vec![Value::str("xy")]);
        args.named.push(("start".into(), Value::Int(1)));
        let v = call(Builtin::Enumerate, "enumerate", args).unwrap();
        assert_eq!(v.to_string(), "[(1, 'x'), (2, 'y')]");
    }
}
