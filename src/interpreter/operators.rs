/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * File:     interpreter/operators.rs
 * Purpose:  Arithmetic, comparison and membership over runtime values.
 *
 * Integers are 64-bit and overflow is an error rather than a wrap. `/`
 * always produces a float, `//` and `%` floor toward negative infinity so
 * that `-7 // 2 == -4` and `-7 % 2 == 1`.
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

use std::cmp::Ordering;

use crate::ast::{BinaryOp, CompareOp};
use crate::error::EzError;
use crate::value::{Num, Value};

/// Applies a binary arithmetic operator.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EzError> {
    if let (Some(a), Some(b)) = (left.as_num(), right.as_num()) {
        return numeric(op, a, b);
    }

    match (op, left, right) {
        // ------------------------
        // Concatenation
        // ------------------------
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
        (BinaryOp::Add, Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (BinaryOp::Add, Value::Tuple(a), Value::Tuple(b)) => {
            let mut items = a.as_ref().clone();
            items.extend(b.iter().cloned());
            Ok(Value::tuple(items))
        }

        // ------------------------
        // Repetition
        // ------------------------
        (BinaryOp::Mul, Value::Str(s), n) | (BinaryOp::Mul, n, Value::Str(s))
            if is_int(n) =>
        {
            Ok(Value::Str(s.repeat(repeat_count(n))))
        }
        (BinaryOp::Mul, Value::List(items), n) | (BinaryOp::Mul, n, Value::List(items))
            if is_int(n) =>
        {
            let items = items.borrow();
            Ok(Value::list(repeat(&items, repeat_count(n))))
        }
        (BinaryOp::Mul, Value::Tuple(items), n) | (BinaryOp::Mul, n, Value::Tuple(items))
            if is_int(n) =>
        {
            Ok(Value::tuple(repeat(items, repeat_count(n))))
        }

        // ------------------------
        // Set difference
        // ------------------------
        (BinaryOp::Sub, Value::Set(a), Value::Set(b)) => {
            let b = b.borrow();
            let rest = a
                .borrow()
                .iter()
                .filter(|v| !b.iter().any(|w| Value::equals(v, w)))
                .cloned()
                .collect();
            Value::set(rest)
        }

        _ => Err(EzError::type_error(format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn numeric(op: BinaryOp, a: Num, b: Num) -> Result<Value, EzError> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => int_op(op, x, y),
        (x, y) => float_op(op, x.as_f64(), y.as_f64()),
    }
}

fn int_op(op: BinaryOp, x: i64, y: i64) -> Result<Value, EzError> {
    let checked = |v: Option<i64>| v.map(Value::Int).ok_or_else(EzError::overflow);

    match op {
        BinaryOp::Add => checked(x.checked_add(y)),
        BinaryOp::Sub => checked(x.checked_sub(y)),
        BinaryOp::Mul => checked(x.checked_mul(y)),
        BinaryOp::Div => float_op(op, x as f64, y as f64),
        BinaryOp::FloorDiv => {
            if y == 0 {
                return Err(EzError::division_by_zero());
            }
            let q = x.checked_div(y).ok_or_else(EzError::overflow)?;
            // Truncation rounds toward zero; step down when signs differ.
            Ok(Value::Int(if x % y != 0 && (x < 0) != (y < 0) { q - 1 } else { q }))
        }
        BinaryOp::Mod => {
            if y == 0 {
                return Err(EzError::division_by_zero());
            }
            let r = x.checked_rem(y).unwrap_or(0);
            Ok(Value::Int(if r != 0 && (r < 0) != (y < 0) { r + y } else { r }))
        }
        BinaryOp::Pow => {
            if y < 0 {
                return float_op(op, x as f64, y as f64);
            }
            let exp = u32::try_from(y).map_err(|_| EzError::overflow())?;
            checked(x.checked_pow(exp))
        }
    }
}

fn float_op(op: BinaryOp, x: f64, y: f64) -> Result<Value, EzError> {
    let value = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => {
            if y == 0.0 {
                return Err(EzError::division_by_zero());
            }
            x / y
        }
        BinaryOp::FloorDiv => {
            if y == 0.0 {
                return Err(EzError::division_by_zero());
            }
            (x / y).floor()
        }
        BinaryOp::Mod => {
            if y == 0.0 {
                return Err(EzError::division_by_zero());
            }
            let r = x % y;
            if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r + y
            } else {
                r
            }
        }
        BinaryOp::Pow => {
            if x == 0.0 && y < 0.0 {
                return Err(EzError::division_by_zero());
            }
            if x < 0.0 && y.fract() != 0.0 {
                return Err(EzError::invalid_value(
                    "negative number cannot be raised to a fractional power",
                ));
            }
            x.powf(y)
        }
    };
    Ok(Value::Float(value))
}

fn is_int(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Bool(_))
}

fn repeat_count(value: &Value) -> usize {
    match value.as_num() {
        Some(Num::Int(n)) if n > 0 => n as usize,
        _ => 0,
    }
}

fn repeat(items: &[Value], times: usize) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len() * times);
    for _ in 0..times {
        out.extend(items.iter().cloned());
    }
    out
}

/// Unary minus.
pub fn negate(value: &Value) -> Result<Value, EzError> {
    match value.as_num() {
        Some(Num::Int(i)) => i.checked_neg().map(Value::Int).ok_or_else(EzError::overflow),
        Some(Num::Float(f)) => Ok(Value::Float(-f)),
        None => Err(EzError::type_error(format!(
            "bad operand type for unary -: '{}'",
            value.type_name()
        ))),
    }
}

/// Unary plus; `+True` is `1`.
pub fn positive(value: &Value) -> Result<Value, EzError> {
    match value.as_num() {
        Some(Num::Int(i)) => Ok(Value::Int(i)),
        Some(Num::Float(f)) => Ok(Value::Float(f)),
        None => Err(EzError::type_error(format!(
            "bad operand type for unary +: '{}'",
            value.type_name()
        ))),
    }
}

/// Evaluates one link of a comparison chain.
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EzError> {
    Ok(match op {
        CompareOp::Eq => Value::equals(left, right),
        CompareOp::NotEq => !Value::equals(left, right),
        CompareOp::Lt => Value::compare(left, right)? == Ordering::Less,
        CompareOp::Gt => Value::compare(left, right)? == Ordering::Greater,
        CompareOp::LtEq => Value::compare(left, right)? != Ordering::Greater,
        CompareOp::GtEq => Value::compare(left, right)? != Ordering::Less,
        CompareOp::In => contains(right, left)?,
        CompareOp::NotIn => !contains(right, left)?,
    })
}

/// Membership test: `item in container`.
pub fn contains(container: &Value, item: &Value) -> Result<bool, EzError> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(EzError::type_error(format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ))),
        },
        Value::List(items) => Ok(items.borrow().iter().any(|v| Value::equals(v, item))),
        Value::Set(items) => Ok(items.borrow().iter().any(|v| Value::equals(v, item))),
        Value::Tuple(items) => Ok(items.iter().any(|v| Value::equals(v, item))),
        Value::Dict(map) => Ok(map.borrow().contains_key(item)),
        other => Err(EzError::type_error(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn floor_division_and_modulo_follow_the_divisor() {
        assert_eq!(binary(BinaryOp::FloorDiv, &int(-7), &int(2)).unwrap(), int(-4));
        assert_eq!(binary(BinaryOp::Mod, &int(-7), &int(2)).unwrap(), int(1));
        assert_eq!(binary(BinaryOp::Mod, &int(7), &int(-2)).unwrap(), int(-1));
        assert_eq!(binary(BinaryOp::FloorDiv, &int(7), &int(2)).unwrap(), int(3));
    }

    #[test]
    fn true_division_is_always_float() {
        let v = binary(BinaryOp::Div, &int(6), &int(3)).unwrap();
        assert!(matches!(v, Value::Float(f) if f == 2.0));
    }

    #[test]
    fn division_by_zero_is_its_own_kind() {
        for op in [BinaryOp::Div, BinaryOp::FloorDiv, BinaryOp::Mod] {
            let err = binary(op, &int(1), &int(0)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::DivisionByZero);
            assert_eq!(err.message, "Cannot divide by zero");
        }
    }

    #[test]
    fn overflow_is_reported() {
        let err = binary(BinaryOp::Mul, &int(i64::MAX), &int(2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Overflow);
    }

    #[test]
    fn negative_exponent_gives_float() {
        let v = binary(BinaryOp::Pow, &int(2), &int(-1)).unwrap();
        assert!(matches!(v, Value::Float(f) if f == 0.5));
        assert_eq!(binary(BinaryOp::Pow, &int(2), &int(10)).unwrap(), int(1024));
    }

    #[test]
    fn sequences_concatenate_and_repeat() {
        assert_eq!(
            binary(BinaryOp::Add, &Value::str("ab"), &Value::str("cd")).unwrap(),
            Value::str("abcd")
        );
        assert_eq!(
            binary(BinaryOp::Mul, &Value::str("ab"), &int(3)).unwrap(),
            Value::str("ababab")
        );
        assert_eq!(
            binary(BinaryOp::Mul, &int(2), &Value::list(vec![int(1)])).unwrap(),
            Value::list(vec![int(1), int(1)])
        );
    }

    #[test]
    fn mixed_types_are_a_type_error() {
        let err = binary(BinaryOp::Add, &int(1), &Value::str("a")).unwrap_err();
        assert_eq!(
            err.message,
            "Type error: unsupported operand type(s) for +: 'int' and 'str'"
        );
    }

    #[test]
    fn membership() {
        let list = Value::list(vec![int(1), int(2)]);
        assert!(compare(CompareOp::In, &int(2), &list).unwrap());
        assert!(compare(CompareOp::NotIn, &int(3), &list).unwrap());
        assert!(compare(CompareOp::In, &Value::str("ell"), &Value::str("hello")).unwrap());
        assert!(compare(CompareOp::In, &int(1), &int(2)).is_err());
    }
}
