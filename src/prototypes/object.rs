/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Dictionary & Set Methods
 * ==========================================================================
 *
 * Methods available on mapping and set receivers.
 *
 *   dict: keys values items get pop update clear copy
 *   set:  add remove discard clear
 *
 * `keys`, `values` and `items` return fresh lists in insertion order, so
 * the dictionary may be changed while a loop walks one of them.
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
use crate::interpreter::display::value_repr;
use crate::interpreter::Args;
use crate::prototypes::unknown_method;
use crate::value::{set_insert, Dict, Value};

/// Dispatches a method on a dictionary receiver.
pub fn call_dict(dict: &RefCell<Dict>, method: &str, mut args: Args) -> Result<Value, EzError> {
    match method {
        // ---------------------------------------------------------------------
        // Views
        // ---------------------------------------------------------------------
        "keys" => {
            args.arity(method, 0, 0)?;
            Ok(Value::list(dict.borrow().keys().cloned().collect()))
        }
        "values" => {
            args.arity(method, 0, 0)?;
            Ok(Value::list(dict.borrow().values().cloned().collect()))
        }
        "items" => {
            args.arity(method, 0, 0)?;
            let pairs = dict
                .borrow()
                .iter()
                .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
                .collect();
            Ok(Value::list(pairs))
        }

        // ---------------------------------------------------------------------
        // Lookup
        // ---------------------------------------------------------------------
        "get" => {
            args.arity(method, 1, 2)?;
            let key = &args.positional[0];
            key.ensure_hashable()?;
            let found = dict.borrow().get(key).cloned();
            Ok(found.unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
        }

        "pop" => {
            args.arity(method, 1, 2)?;
            let key = &args.positional[0];
            key.ensure_hashable()?;
            let removed = dict.borrow_mut().remove(key);
            match (removed, args.get(1)) {
                (Some(value), _) => Ok(value),
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => Err(EzError::key_not_found(value_repr(key))),
            }
        }

        // ---------------------------------------------------------------------
        // Mutation
        // ---------------------------------------------------------------------
        "update" => {
            let named = std::mem::take(&mut args.named);
            args.arity(method, 0, 1)?;
            let mut entries = match args.get(0) {
                None => Vec::new(),
                Some(Value::Dict(other)) => other.borrow().iter().cloned().collect(),
                Some(other) => {
                    return Err(EzError::type_error(format!(
                        "update() argument must be a dict, not '{}'",
                        other.type_name()
                    )))
                }
            };
            entries.extend(named.into_iter().map(|(k, v)| (Value::Str(k), v)));

            let mut target = dict.borrow_mut();
            for (k, v) in entries {
                target.insert(k, v)?;
            }
            Ok(Value::None)
        }

        "clear" => {
            args.arity(method, 0, 0)?;
            dict.borrow_mut().clear();
            Ok(Value::None)
        }

        "copy" => {
            args.arity(method, 0, 0)?;
            Ok(Value::dict(dict.borrow().clone()))
        }

        _ => Err(unknown_method("dict", method)),
    }
}

/// Dispatches a method on a set receiver.
pub fn call_set(set: &RefCell<Vec<Value>>, method: &str, mut args: Args) -> Result<Value, EzError> {
    match method {
        "add" => {
            args.arity(method, 1, 1)?;
            let item = args.positional.remove(0);
            set_insert(&mut set.borrow_mut(), item)?;
            Ok(Value::None)
        }
        "remove" | "discard" => {
            args.arity(method, 1, 1)?;
            let item = &args.positional[0];
            item.ensure_hashable()?;
            let pos = set.borrow().iter().position(|v| Value::equals(v, item));
            match pos {
                Some(i) => {
                    set.borrow_mut().remove(i);
                    Ok(Value::None)
                }
                None if method == "discard" => Ok(Value::None),
                None => Err(EzError::key_not_found(value_repr(item))),
            }
        }
        "clear" => {
            args.arity(method, 0, 0)?;
            set.borrow_mut().clear();
            Ok(Value::None)
        }
        _ => Err(unknown_method("set", method)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> RefCell<Dict> {
        let mut d = Dict::new();
        d.insert(Value::str("a"), Value::Int(1)).unwrap();
        d.insert(Value::str("b"), Value::Int(2)).unwrap();
        RefCell::new(d)
    }

    #[test]
    fn views_follow_insertion_order() {
        let d = sample();
        assert_eq!(call_dict(&d, "keys", Args::default()).unwrap().to_string(), "['a', 'b']");
        assert_eq!(
            call_dict(&d, "items", Args::default()).unwrap().to_string(),
            "[('a', 1), ('b', 2)]"
        );
    }

    #[test]
    fn get_and_pop_with_defaults() {
        let d = sample();
        let args = Args::new(vec![Value::str("z"), Value::Int(0)]);
        assert_eq!(call_dict(&d, "get", args).unwrap(), Value::Int(0));
        assert_eq!(call_dict(&d, "get", Args::new(vec![Value::str("z")])).unwrap(), Value::None);

        assert_eq!(call_dict(&d, "pop", Args::new(vec![Value::str("a")])).unwrap(), Value::Int(1));
        let err = call_dict(&d, "pop", Args::new(vec![Value::str("a")])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::KeyNotFound);
    }

    #[test]
    fn update_merges_dicts_and_keywords() {
        let d = sample();
        let mut other = Dict::new();
        other.insert(Value::str("a"), Value::Int(10)).unwrap();
        let mut args = Args::new(vec![Value::dict(other)]);
        args.named.push(("c".into(), Value::Int(3)));

        call_dict(&d, "update", args).unwrap();
        assert_eq!(Value::dict(d.into_inner()).to_string(), "{'a': 10, 'b': 2, 'c': 3}");
    }

    #[test]
    fn set_membership_changes() {
        let s = RefCell::new(vec![Value::Int(1)]);
        call_set(&s, "add", Args::new(vec![Value::Int(1)])).unwrap();
        call_set(&s, "add", Args::new(vec![Value::Int(2)])).unwrap();
        assert_eq!(s.borrow().len(), 2);

        call_set(&s, "discard", Args::new(vec![Value::Int(9)])).unwrap();
        assert!(call_set(&s, "remove", Args::new(vec![Value::Int(9)])).is_err());
        assert!(call_set(&s, "add", Args::new(vec![Value::list(vec![])])).is_err());
    }
}
