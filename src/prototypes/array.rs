/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * List & Tuple Methods
 * ==========================================================================
 *
 * This module defines the methods available on sequence receivers.
 *
 * Lists are shared and mutable: `let b be a` then `b.append(1)` changes
 * what `a` sees. Tuples are immutable and only answer queries.
 *
 *   list:  append pop insert remove index count clear extend sort
 *          reverse copy
 *   tuple: count index
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

use std::cell::RefCell;

use crate::error::EzError;
use crate::globals::sequence::sort_values;
use crate::interpreter::helpers::{expect_int, iterate, normalize_index};
use crate::interpreter::Args;
use crate::prototypes::unknown_method;
use crate::value::Value;

/// Dispatches a method on a list receiver.
pub fn call_list(list: &RefCell<Vec<Value>>, method: &str, mut args: Args) -> Result<Value, EzError> {
    match method {
        // ---------------------------------------------------------------------
        // Mutation
        // ---------------------------------------------------------------------
        "append" => {
            args.arity(method, 1, 1)?;
            let item = args.positional.remove(0);
            list.borrow_mut().push(item);
            Ok(Value::None)
        }

        "extend" => {
            args.arity(method, 1, 1)?;
            let items = iterate(&args.positional[0])?;
            list.borrow_mut().extend(items);
            Ok(Value::None)
        }

        "insert" => {
            args.arity(method, 2, 2)?;
            let at = expect_int(&args.positional[0])?;
            let item = args.positional.remove(1);
            let mut items = list.borrow_mut();
            let len = items.len() as i64;
            let pos = if at < 0 { (at + len).max(0) } else { at.min(len) };
            items.insert(pos as usize, item);
            Ok(Value::None)
        }

        "pop" => {
            args.arity(method, 0, 1)?;
            let at = match args.get(0) {
                Some(v) => expect_int(v)?,
                None => -1,
            };
            list_pop(list, at)
        }

        "remove" => {
            args.arity(method, 1, 1)?;
            let pos = position(&list.borrow(), &args.positional[0])
                .ok_or_else(|| EzError::invalid_value("list.remove(x): x not in list"))?;
            list.borrow_mut().remove(pos);
            Ok(Value::None)
        }

        "clear" => {
            args.arity(method, 0, 0)?;
            list.borrow_mut().clear();
            Ok(Value::None)
        }

        "sort" => {
            let reverse = args.take_named("reverse").is_some_and(|v| v.is_truthy());
            args.arity(method, 0, 0)?;
            let mut items = list.borrow().clone();
            sort_values(&mut items, reverse)?;
            *list.borrow_mut() = items;
            Ok(Value::None)
        }

        "reverse" => {
            args.arity(method, 0, 0)?;
            list.borrow_mut().reverse();
            Ok(Value::None)
        }

        // ---------------------------------------------------------------------
        // Queries
        // ---------------------------------------------------------------------
        "index" | "count" => query(&list.borrow(), "list", method, &args),

        "copy" => {
            args.arity(method, 0, 0)?;
            Ok(Value::list(list.borrow().clone()))
        }

        _ => Err(unknown_method("list", method)),
    }
}

/// Dispatches a method on a tuple receiver.
pub fn call_tuple(items: &[Value], method: &str, args: Args) -> Result<Value, EzError> {
    match method {
        "index" | "count" => query(items, "tuple", method, &args),
        _ => Err(unknown_method("tuple", method)),
    }
}

/// `pop(i=-1)`: removes and returns one element.
///
/// # Errors
/// `IndexOutOfRange` when the list is empty or `i` is past either end.
fn list_pop(list: &RefCell<Vec<Value>>, at: i64) -> Result<Value, EzError> {
    let mut items = list.borrow_mut();
    if items.is_empty() {
        return Err(EzError::index_out_of_range("pop from empty list"));
    }
    let pos = normalize_index(at, items.len())
        .ok_or_else(|| EzError::index_out_of_range("pop index out of range"))?;
    Ok(items.remove(pos))
}

fn query(items: &[Value], kind: &str, method: &str, args: &Args) -> Result<Value, EzError> {
    args.arity(method, 1, 1)?;
    let needle = &args.positional[0];

    if method == "count" {
        let n = items.iter().filter(|v| Value::equals(v, needle)).count();
        return Ok(Value::Int(n as i64));
    }

    position(items, needle)
        .map(|i| Value::Int(i as i64))
        .ok_or_else(|| EzError::invalid_value(format!("{}.index(x): x not in {}", kind, kind)))
}

fn position(items: &[Value], needle: &Value) -> Option<usize> {
    items.iter().position(|v| Value::equals(v, needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn list(values: &[i64]) -> RefCell<Vec<Value>> {
        RefCell::new(values.iter().copied().map(Value::Int).collect())
    }

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Int).collect()
    }

    #[test]
    fn append_insert_and_pop() {
        let items = list(&[1, 3]);
        call_list(&items, "append", Args::new(vec![Value::Int(4)])).unwrap();
        call_list(&items, "insert", Args::new(vec![Value::Int(1), Value::Int(2)])).unwrap();
        assert_eq!(*items.borrow(), ints(&[1, 2, 3, 4]));

        assert_eq!(call_list(&items, "pop", Args::default()).unwrap(), Value::Int(4));
        assert_eq!(call_list(&items, "pop", Args::new(vec![Value::Int(0)])).unwrap(), Value::Int(1));
        assert_eq!(*items.borrow(), ints(&[2, 3]));
    }

    #[test]
    fn pop_from_empty_list() {
        let err = call_list(&list(&[]), "pop", Args::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfRange);
        assert_eq!(err.message, "List index out of range: pop from empty list");
    }

    #[test]
    fn remove_and_index_report_missing_values() {
        let items = list(&[5, 6]);
        call_list(&items, "remove", Args::new(vec![Value::Int(5)])).unwrap();
        assert_eq!(*items.borrow(), ints(&[6]));

        let err = call_list(&items, "remove", Args::new(vec![Value::Int(9)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
        assert!(call_list(&items, "index", Args::new(vec![Value::Int(9)])).is_err());
    }

    #[test]
    fn sort_with_reverse() {
        let items = list(&[2, 9, 4]);
        let mut args = Args::default();
        args.named.push(("reverse".into(), Value::Bool(true)));
        call_list(&items, "sort", args).unwrap();
        assert_eq!(*items.borrow(), ints(&[9, 4, 2]));
    }

    #[test]
    fn tuples_only_answer_queries() {
        let items = ints(&[1, 1, 2]);
        assert_eq!(call_tuple(&items, "count", Args::new(vec![Value::Int(1)])).unwrap(), Value::Int(2));
        assert_eq!(call_tuple(&items, "index", Args::new(vec![Value::Int(2)])).unwrap(), Value::Int(2));
        assert!(call_tuple(&items, "append", Args::new(vec![Value::Int(3)])).is_err());
    }
}
