/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Conversion & Type Built-ins
 * ==========================================================================
 *
 * This module implements the built-ins that build one value out of
 * another, and the `type(...)` query:
 *
 *   - str(x)     int(x)     float(x)   bool(x)
 *   - list(it)   set(it)    tuple(it)  dict(it, key=value...)
 *   - type(x)
 *
 * The eight type built-ins double as type objects, so scripts can write
 * `type(score) == int`.
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
use crate::globals::Builtin;
use crate::interpreter::display::value_to_string;
use crate::interpreter::helpers::{iterate, to_float, to_int};
use crate::interpreter::Args;
use crate::value::{Dict, Value};

pub fn call(builtin: Builtin, name: &str, mut args: Args) -> Result<Value, EzError> {
    if builtin == Builtin::Dict {
        return dict(&mut args);
    }

    args.arity(name, if builtin == Builtin::Type { 1 } else { 0 }, 1)?;
    let arg = args.get(0);

    match (builtin, arg) {
        (Builtin::Str, None) => Ok(Value::str("")),
        (Builtin::Str, Some(v)) => Ok(Value::Str(value_to_string(v))),

        (Builtin::Int, None) => Ok(Value::Int(0)),
        (Builtin::Int, Some(v)) => to_int(v).map(Value::Int),

        (Builtin::Float, None) => Ok(Value::Float(0.0)),
        (Builtin::Float, Some(v)) => to_float(v).map(Value::Float),

        (Builtin::Bool, None) => Ok(Value::Bool(false)),
        (Builtin::Bool, Some(v)) => Ok(Value::Bool(v.is_truthy())),

        (Builtin::List, None) => Ok(Value::list(Vec::new())),
        (Builtin::List, Some(v)) => Ok(Value::list(iterate(v)?)),

        (Builtin::Set, None) => Value::set(Vec::new()),
        (Builtin::Set, Some(v)) => Value::set(iterate(v)?),

        (Builtin::Tuple, None) => Ok(Value::tuple(Vec::new())),
        (Builtin::Tuple, Some(Value::Tuple(items))) => Ok(Value::Tuple(items.clone())),
        (Builtin::Tuple, Some(v)) => Ok(Value::tuple(iterate(v)?)),

        (Builtin::Type, Some(v)) => Ok(type_of(v)),

        _ => Err(EzError::unsupported(format!("{}()", name))),
    }
}

/// `type(x)`: the matching type built-in, or the bare type name for values
/// without one (`None`, functions).
pub fn type_of(value: &Value) -> Value {
    let builtin = match value {
        Value::Bool(_) => Builtin::Bool,
        Value::Int(_) => Builtin::Int,
        Value::Float(_) => Builtin::Float,
        Value::Str(_) => Builtin::Str,
        Value::List(_) => Builtin::List,
        Value::Dict(_) => Builtin::Dict,
        Value::Set(_) => Builtin::Set,
        Value::Tuple(_) => Builtin::Tuple,
        other => return Value::str(other.type_name()),
    };
    Value::Builtin(builtin)
}

/// `dict()`, `dict(mapping)`, `dict(pairs)`, `dict(key=value, ...)`.
///
/// # Parameters (via `args`)
/// - `args[0]` (optional): a dict to copy, or an iterable of 2-item pairs
/// - named arguments: extra string-keyed entries, applied last
///
/// # EzScript Example
/// ```text
/// let scores be dict([["ann", 3], ["bo", 5]], cy=1)
/// print(scores)   # {'ann': 3, 'bo': 5, 'cy': 1}
/// ```
fn dict(args: &mut Args) -> Result<Value, EzError> {
    if args.len() > 1 {
        return Err(EzError::type_error(format!(
            "dict expected at most 1 argument, got {}",
            args.len()
        )));
    }

    let mut out = Dict::new();

    match args.get(0) {
        None => {}
        Some(Value::Dict(map)) => {
            for (k, v) in map.borrow().iter() {
                out.insert(k.clone(), v.clone())?;
            }
        }
        Some(source) => {
            for (i, item) in iterate(source)?.into_iter().enumerate() {
                let pair = iterate(&item).map_err(|_| {
                    EzError::type_error(format!(
                        "cannot convert dictionary update sequence element #{} to a sequence",
                        i
                    ))
                })?;
                let [key, value]: [Value; 2] = pair.try_into().map_err(|pair: Vec<Value>| {
                    EzError::invalid_value(format!(
                        "dictionary update sequence element #{} has length {}; 2 is required",
                        i,
                        pair.len()
                    ))
                })?;
                out.insert(key, value)?;
            }
        }
    }

    for (name, value) in std::mem::take(&mut args.named) {
        out.insert(Value::Str(name), value)?;
    }

    Ok(Value::dict(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(value: Value) -> Args {
        Args::new(vec![value])
    }

    #[test]
    fn conversions_without_arguments_give_zero_values() {
        assert_eq!(call(Builtin::Int, "int", Args::default()).unwrap(), Value::Int(0));
        assert_eq!(call(Builtin::Str, "str", Args::default()).unwrap(), Value::str(""));
        assert_eq!(
            call(Builtin::List, "list", Args::default()).unwrap(),
            Value::list(Vec::new())
        );
    }

    #[test]
    fn str_uses_printed_form() {
        let v = call(Builtin::Str, "str", one(Value::Float(2.0))).unwrap();
        assert_eq!(v, Value::str("2.0"));
    }

    #[test]
    fn dict_from_pairs_and_keywords() {
        let pairs = Value::list(vec![Value::tuple(vec![Value::str("a"), Value::Int(1)])]);
        let mut args = one(pairs);
        args.named.push(("b".into(), Value::Int(2)));

        let v = call(Builtin::Dict, "dict", args).unwrap();
        assert_eq!(v.to_string(), "{'a': 1, 'b': 2}");
    }

    #[test]
    fn dict_rejects_bad_pairs() {
        let pairs = Value::list(vec![Value::list(vec![Value::Int(1)])]);
        assert!(call(Builtin::Dict, "dict", one(pairs)).is_err());
    }

    #[test]
    fn type_returns_the_type_builtin() {
        assert_eq!(type_of(&Value::Int(3)), Value::Builtin(Builtin::Int));
        assert_eq!(type_of(&Value::None), Value::str("NoneType"));
        assert!(call(Builtin::Type, "type", Args::default()).is_err());
    }
}
