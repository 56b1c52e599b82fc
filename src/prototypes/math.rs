/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Math & Randomness Built-ins
 * ==========================================================================
 *
 * This module implements the numeric built-ins exposed to every script:
 *   - Magnitude: abs
 *   - Aggregates: max, min, sum
 *   - Rounding: round (ties go to the even neighbour)
 *   - Randomness: random, choice, shuffle, randrange, uniform
 *
 * The random built-ins draw from the interpreter's own generator, which is
 * reseeded at the start of every run when a seed is configured.
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

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::ast::BinaryOp;
use crate::error::EzError;
use crate::globals::Builtin;
use crate::interpreter::helpers::{expect_int, iterate};
use crate::interpreter::operators;
use crate::interpreter::Args;
use crate::value::{Num, Value};

pub fn call(builtin: Builtin, name: &str, args: Args) -> Result<Value, EzError> {
    match builtin {
        Builtin::Abs => {
            args.arity(name, 1, 1)?;
            math_abs(&args.positional[0])
        }
        Builtin::Max => extreme(name, args, Ordering::Greater),
        Builtin::Min => extreme(name, args, Ordering::Less),
        Builtin::Sum => {
            args.arity(name, 1, 2)?;
            math_sum(&args.positional[0], args.get(1).cloned().unwrap_or(Value::Int(0)))
        }
        Builtin::Round => {
            args.arity(name, 1, 2)?;
            math_round(&args.positional[0], args.get(1))
        }
        _ => Err(EzError::unsupported(format!("{}()", name))),
    }
}

pub fn call_random(
    rng: &mut StdRng,
    builtin: Builtin,
    name: &str,
    args: Args,
) -> Result<Value, EzError> {
    match builtin {
        Builtin::Random => {
            args.arity(name, 2, 2)?;
            let lo = expect_int(&args.positional[0])?;
            let hi = expect_int(&args.positional[1])?;
            if lo > hi {
                return Err(empty_range(lo, hi + 1));
            }
            Ok(Value::Int(rng.gen_range(lo..=hi)))
        }
        Builtin::Choice => {
            args.arity(name, 1, 1)?;
            let items = iterate(&args.positional[0])?;
            items
                .choose(rng)
                .cloned()
                .ok_or_else(|| EzError::index_out_of_range("Cannot choose from an empty sequence"))
        }
        Builtin::Shuffle => {
            args.arity(name, 1, 1)?;
            match &args.positional[0] {
                Value::List(items) => {
                    items.borrow_mut().shuffle(rng);
                    Ok(Value::None)
                }
                other => Err(EzError::type_error(format!(
                    "shuffle() argument must be a list, not '{}'",
                    other.type_name()
                ))),
            }
        }
        Builtin::Randrange => {
            args.arity(name, 1, 3)?;
            randrange(rng, &args.positional)
        }
        Builtin::Uniform => {
            args.arity(name, 2, 2)?;
            let a = number(name, &args.positional[0])?;
            let b = number(name, &args.positional[1])?;
            Ok(Value::Float(a + (b - a) * rng.gen::<f64>()))
        }
        _ => Err(EzError::unsupported(format!("{}()", name))),
    }
}

/// `abs(x)`.
///
/// # Returns
/// The same numeric kind as the argument; `abs(True)` is `1`.
fn math_abs(value: &Value) -> Result<Value, EzError> {
    match value.as_num() {
        Some(Num::Int(i)) => i.checked_abs().map(Value::Int).ok_or_else(EzError::overflow),
        Some(Num::Float(f)) => Ok(Value::Float(f.abs())),
        None => Err(EzError::type_error(format!(
            "bad operand type for abs(): '{}'",
            value.type_name()
        ))),
    }
}

/// `max(iterable)` / `max(a, b, ...)` and the `min` equivalents.
///
/// With a single argument the elements of that argument compete; with more,
/// the arguments themselves do. Ties keep the first candidate.
fn extreme(name: &str, args: Args, wanted: Ordering) -> Result<Value, EzError> {
    args.no_named(name)?;

    let candidates = match args.positional.as_slice() {
        [] => {
            return Err(EzError::type_error(format!(
                "{} expected at least 1 argument, got 0",
                name
            )))
        }
        [single] => iterate(single)?,
        many => many.to_vec(),
    };

    let mut iter = candidates.into_iter();
    let mut best = iter
        .next()
        .ok_or_else(|| EzError::invalid_value(format!("{}() arg is an empty sequence", name)))?;

    for candidate in iter {
        if Value::compare(&candidate, &best)? == wanted {
            best = candidate;
        }
    }
    Ok(best)
}

/// `sum(iterable, start=0)`; strings are refused the way `+` would not be.
fn math_sum(values: &Value, start: Value) -> Result<Value, EzError> {
    if matches!(start, Value::Str(_)) {
        return Err(EzError::type_error(
            "sum() can't sum strings [use ''.join(seq) instead]",
        ));
    }

    iterate(values)?
        .iter()
        .try_fold(start, |total, item| operators::binary(BinaryOp::Add, &total, item))
}

/// `round(x)` gives an int, `round(x, n)` keeps the argument's kind.
///
/// # EzScript Example
/// ```text
/// print(round(2.5))       # 2
/// print(round(3.14159, 2)) # 3.14
/// ```
fn math_round(value: &Value, digits: Option<&Value>) -> Result<Value, EzError> {
    let num = value.as_num().ok_or_else(|| {
        EzError::type_error(format!(
            "type {} doesn't define __round__ method",
            value.type_name()
        ))
    })?;

    let digits = match digits {
        None | Some(Value::None) => None,
        Some(d) => Some(expect_int(d)?),
    };

    match (num, digits) {
        (Num::Int(i), _) => Ok(Value::Int(i)),
        (Num::Float(f), None) => {
            let rounded = f.round_ties_even();
            if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
                return Err(EzError::overflow());
            }
            Ok(Value::Int(rounded as i64))
        }
        // Decimal formatting rounds the exact binary value, so 2.675 (stored
        // just below) goes to 2.67.
        (Num::Float(f), Some(n)) if n >= 0 => {
            let places = usize::try_from(n.min(340)).unwrap_or(340);
            format!("{:.*}", places, f)
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| EzError::invalid_value(format!("round(): {}", e)))
        }
        (Num::Float(f), Some(n)) => {
            let exp = i32::try_from(n.max(-308).unsigned_abs()).unwrap_or(308);
            let scale = 10f64.powi(exp);
            Ok(Value::Float((f / scale).round_ties_even() * scale))
        }
    }
}

fn randrange(rng: &mut StdRng, args: &[Value]) -> Result<Value, EzError> {
    let ints = args.iter().map(expect_int).collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(EzError::type_error("randrange expected 1 to 3 arguments")),
    };

    if step == 0 {
        return Err(EzError::invalid_value("zero step for randrange()"));
    }

    let span = i128::from(stop) - i128::from(start);
    let step_wide = i128::from(step);
    let count = (span + step_wide - step_wide.signum()) / step_wide;
    if count <= 0 {
        return Err(empty_range(start, stop));
    }

    let pick = rng.gen_range(0..count);
    let value = i128::from(start) + pick * step_wide;
    i64::try_from(value).map(Value::Int).map_err(|_| EzError::overflow())
}

fn empty_range(start: i64, stop: i64) -> EzError {
    EzError::invalid_value(format!(
        "empty range for randrange() ({}, {}, {})",
        start,
        stop,
        stop.saturating_sub(start)
    ))
}

fn number(name: &str, value: &Value) -> Result<f64, EzError> {
    value.as_num().map(Num::as_f64).ok_or_else(|| {
        EzError::type_error(format!(
            "{}() argument must be a number, not '{}'",
            name,
            value.type_name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::error::ErrorKind;

    fn ints(values: &[i64]) -> Value {
        Value::list(values.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn round_half_to_even() {
        assert_eq!(math_round(&Value::Float(2.5), None).unwrap(), Value::Int(2));
        assert_eq!(math_round(&Value::Float(3.5), None).unwrap(), Value::Int(4));
        assert_eq!(
            math_round(&Value::Float(3.14159), Some(&Value::Int(2))).unwrap(),
            Value::Float(3.14)
        );
    }

    #[test]
    fn round_uses_the_stored_binary_value() {
        assert_eq!(
            math_round(&Value::Float(2.675), Some(&Value::Int(2))).unwrap(),
            Value::Float(2.67)
        );
        assert_eq!(
            math_round(&Value::Float(1234.5), Some(&Value::Int(-2))).unwrap(),
            Value::Float(1200.0)
        );
    }

    #[test]
    fn max_and_min_over_iterables_and_arguments() {
        let args = Args::new(vec![ints(&[3, 9, 4])]);
        assert_eq!(call(Builtin::Max, "max", args).unwrap(), Value::Int(9));

        let args = Args::new(vec![Value::Int(3), Value::Float(1.5)]);
        assert_eq!(call(Builtin::Min, "min", args).unwrap(), Value::Float(1.5));

        let err = call(Builtin::Max, "max", Args::new(vec![ints(&[])])).unwrap_err();
        assert_eq!(err.message, "max() arg is an empty sequence");
    }

    #[test]
    fn sum_with_start() {
        let args = Args::new(vec![ints(&[1, 2, 3]), Value::Int(10)]);
        assert_eq!(call(Builtin::Sum, "sum", args).unwrap(), Value::Int(16));
    }

    #[test]
    fn random_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let args = Args::new(vec![Value::Int(1), Value::Int(6)]);
            let Value::Int(n) = call_random(&mut rng, Builtin::Random, "random", args).unwrap() else {
                panic!("expected an int");
            };
            assert!((1..=6).contains(&n));
        }
    }

    #[test]
    fn randrange_honours_step() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let args = Args::new(vec![Value::Int(0), Value::Int(10), Value::Int(5)]);
            let v = call_random(&mut rng, Builtin::Randrange, "randrange", args).unwrap();
            assert!(v == Value::Int(0) || v == Value::Int(5));
        }
    }

    #[test]
    fn choice_from_empty_is_an_index_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = call_random(&mut rng, Builtin::Choice, "choice", Args::new(vec![ints(&[])]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = StdRng::seed_from_u64(9);
        let list = ints(&[1, 2, 3, 4]);
        call_random(&mut rng, Builtin::Shuffle, "shuffle", Args::new(vec![list.clone()])).unwrap();

        let mut items = iterate(&list).unwrap();
        items.sort_by(|a, b| Value::compare(a, b).unwrap());
        assert_eq!(Value::list(items), ints(&[1, 2, 3, 4]));
    }
}
