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

use crate::error::EzError;
use crate::interpreter::display::value_repr;
use crate::value::{Num, Value};

/// Materializes the elements of an iterable value.
///
/// This function defines the **iteration order** used by:
/// - `for each` loops
/// - conversions such as `list(...)`, `set(...)`
/// - aggregate built-ins (`sum`, `max`, `sorted`, ...)
///
/// # Iteration Rules
/// - lists, tuples and sets yield their elements in order
/// - dictionaries yield their keys in insertion order
/// - strings yield one-character strings
///
/// The elements are copied out first, so the loop body may freely mutate
/// the container it iterates.
///
/// # Errors
/// `TypeMismatch` for values that are not iterable.
pub fn iterate(value: &Value) -> Result<Vec<Value>, EzError> {
    match value {
        Value::List(items) | Value::Set(items) => Ok(items.borrow().clone()),
        Value::Tuple(items) => Ok(items.as_ref().clone()),
        Value::Dict(map) => Ok(map.borrow().keys().cloned().collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        other => Err(EzError::type_error(format!(
            "'{}' object is not iterable",
            other.type_name()
        ))),
    }
}

/// Maps a possibly negative index onto `0..len`.
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + len } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// `target[index]`.
pub fn index(target: &Value, index: &Value) -> Result<Value, EzError> {
    match target {
        Value::List(items) => {
            let items = items.borrow();
            let i = sequence_index(index, items.len(), "list")?;
            Ok(items[i].clone())
        }
        Value::Tuple(items) => {
            let i = sequence_index(index, items.len(), "tuple")?;
            Ok(items[i].clone())
        }
        Value::Str(s) => {
            let count = s.chars().count();
            let i = sequence_index(index, count, "string")?;
            Ok(s.chars().nth(i).map(|c| Value::Str(c.to_string())).unwrap_or(Value::None))
        }
        Value::Dict(map) => {
            index.ensure_hashable()?;
            map.borrow()
                .get(index)
                .cloned()
                .ok_or_else(|| EzError::key_not_found(value_repr(index)))
        }
        other => Err(EzError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

fn sequence_index(index: &Value, len: usize, kind: &str) -> Result<usize, EzError> {
    let i = match index {
        Value::Int(i) => *i,
        Value::Bool(b) => *b as i64,
        other => {
            return Err(EzError::type_error(format!(
                "{} indices must be integers, not {}",
                kind,
                other.type_name()
            )))
        }
    };

    normalize_index(i, len)
        .ok_or_else(|| EzError::index_out_of_range(format!("{} index out of range", kind)))
}

/// `int(value)`: truncates floats, parses strings.
pub fn to_int(value: &Value) -> Result<i64, EzError> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(*b as i64),
        Value::Float(f) => {
            if f.is_nan() {
                Err(EzError::invalid_value("cannot convert float NaN to integer"))
            } else if f.is_infinite() {
                Err(EzError::overflow())
            } else if f.trunc() < i64::MIN as f64 || f.trunc() >= i64::MAX as f64 {
                Err(EzError::overflow())
            } else {
                Ok(f.trunc() as i64)
            }
        }
        Value::Str(s) => s.trim().replace('_', "").parse::<i64>().map_err(|_| {
            EzError::invalid_value(format!(
                "invalid literal for int() with base 10: {}",
                value_repr(value)
            ))
        }),
        other => Err(EzError::type_error(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

/// `float(value)`.
pub fn to_float(value: &Value) -> Result<f64, EzError> {
    match value.as_num() {
        Some(n) => Ok(n.as_f64()),
        None => match value {
            Value::Str(s) => s.trim().parse::<f64>().map_err(|_| {
                EzError::invalid_value(format!(
                    "could not convert string to float: {}",
                    value_repr(value)
                ))
            }),
            other => Err(EzError::type_error(format!(
                "float() argument must be a string or a number, not '{}'",
                other.type_name()
            ))),
        },
    }
}

/// Strict integer for counts and positions: `int` or `bool` only.
pub fn expect_int(value: &Value) -> Result<i64, EzError> {
    match value.as_num() {
        Some(Num::Int(i)) => Ok(i),
        _ => Err(EzError::type_error(format!(
            "'{}' object cannot be interpreted as an integer",
            value.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn negative_indexes_count_from_the_end() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(index(&list, &Value::Int(-1)).unwrap(), Value::Int(3));

        let err = index(&list, &Value::Int(3)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfRange);
        assert_eq!(err.message, "List index out of range: list index out of range");
    }

    #[test]
    fn missing_dict_key_names_the_key() {
        let dict = crate::value::Dict::new();
        let err = index(&Value::dict(dict), &Value::str("age")).unwrap_err();
        assert_eq!(err.message, "Dictionary key not found: 'age'");
    }

    #[test]
    fn strings_iterate_by_character() {
        let chars = iterate(&Value::str("hé")).unwrap();
        assert_eq!(chars, vec![Value::str("h"), Value::str("é")]);
        assert!(iterate(&Value::Int(3)).is_err());
    }

    #[test]
    fn int_conversion() {
        assert_eq!(to_int(&Value::Float(-2.7)).unwrap(), -2);
        assert_eq!(to_int(&Value::str(" 42 ")).unwrap(), 42);
        assert_eq!(to_int(&Value::str("4x")).unwrap_err().kind, ErrorKind::InvalidValue);
    }
}
