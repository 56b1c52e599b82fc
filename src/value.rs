/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Runtime Values
 * ==========================================================================
 *
 * This module defines `Value`, the tagged union every expression
 * evaluates to, together with the insertion-ordered `Dict` and the
 * equality and ordering rules shared by operators and built-ins.
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
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::error::EzError;
use crate::globals::Builtin;
use crate::interpreter::environment::FunctionDef;

/// EzScript runtime value representation.
///
/// This is the core type that flows through the interpreter.
/// Every expression ultimately evaluates to one of these.
///
/// Scalars are copied on assignment; containers and callables share their
/// payload through `Rc`, so `let b be a` followed by `b.append(1)` is
/// visible through `a`.
#[derive(Clone)]
pub enum Value {
    // Absence of a value
    None,

    // Primitive scalars
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),

    // Shared mutable containers
    List(Rc<RefCell<Vec<Value>>>),
    Dict(Rc<RefCell<Dict>>),
    Set(Rc<RefCell<Vec<Value>>>),

    // Immutable fixed-size sequence
    Tuple(Rc<Vec<Value>>),

    // Callables
    Builtin(Builtin),
    Function(Rc<FunctionDef>),
}

/// Insertion-ordered mapping with unique keys.
///
/// Keys are compared with script equality (`1 == 1.0`), so lookup is a
/// linear scan. Script dictionaries are small enough that this never shows.
#[derive(Clone, Default)]
pub struct Dict {
    entries: Vec<(Value, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| Value::equals(k, key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or overwrites. An existing key keeps its position.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), EzError> {
        key.ensure_hashable()?;
        match self.entries.iter_mut().find(|(k, _)| Value::equals(k, &key)) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| Value::equals(k, key))?;
        Some(self.entries.remove(pos).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }
}

/// Numeric view of a value; `Bool` counts as an integer.
#[derive(Debug, Clone, Copy)]
pub enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

impl Value {
    pub fn list(values: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(values)))
    }

    pub fn tuple(values: Vec<Value>) -> Value {
        Value::Tuple(Rc::new(values))
    }

    pub fn dict(dict: Dict) -> Value {
        Value::Dict(Rc::new(RefCell::new(dict)))
    }

    /// Builds a set, dropping duplicates while keeping first-seen order.
    pub fn set(values: Vec<Value>) -> Result<Value, EzError> {
        let mut unique: Vec<Value> = Vec::with_capacity(values.len());
        for v in values {
            set_insert(&mut unique, v)?;
        }
        Ok(Value::Set(Rc::new(RefCell::new(unique))))
    }

    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    /// Returns a stable type name string (useful for errors).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Set(_) => "set",
            Value::Tuple(_) => "tuple",
            Value::Builtin(_) => "builtin_function_or_method",
            Value::Function(_) => "function",
        }
    }

    /// Empty containers, zero, `""`, `False` and `None` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Dict(map) => !map.borrow().is_empty(),
            Value::Set(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Builtin(_) | Value::Function(_) => true,
        }
    }

    pub fn as_num(&self) -> Option<Num> {
        match self {
            Value::Bool(b) => Some(Num::Int(*b as i64)),
            Value::Int(i) => Some(Num::Int(*i)),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Builtin(_) | Value::Function(_))
    }

    /// Mutable containers cannot be dictionary keys or set members.
    pub fn ensure_hashable(&self) -> Result<(), EzError> {
        match self {
            Value::List(_) | Value::Dict(_) | Value::Set(_) => Err(EzError::type_error(format!(
                "unhashable type: '{}'",
                self.type_name()
            ))),
            Value::Tuple(items) => items.iter().try_for_each(Value::ensure_hashable),
            _ => Ok(()),
        }
    }

    /// Script-level `==`.
    ///
    /// - numbers compare by value across `bool`/`int`/`float`
    /// - containers deep-compare
    /// - functions compare by identity
    pub fn equals(a: &Value, b: &Value) -> bool {
        if let (Some(x), Some(y)) = (a.as_num(), b.as_num()) {
            return match (x, y) {
                (Num::Int(x), Num::Int(y)) => x == y,
                (x, y) => x.as_f64() == y.as_f64(),
            };
        }

        match (a, b) {
            (Value::None, Value::None) => true,
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::List(x), Value::List(y)) => {
                Rc::ptr_eq(x, y) || seq_equals(&x.borrow(), &y.borrow())
            }
            (Value::Tuple(x), Value::Tuple(y)) => seq_equals(x, y),
            (Value::Dict(x), Value::Dict(y)) => {
                let (x, y) = (x.borrow(), y.borrow());
                x.len() == y.len()
                    && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| Value::equals(v, w)))
            }
            (Value::Set(x), Value::Set(y)) => {
                let (x, y) = (x.borrow(), y.borrow());
                x.len() == y.len() && x.iter().all(|v| y.iter().any(|w| Value::equals(v, w)))
            }
            (Value::Builtin(x), Value::Builtin(y)) => x == y,
            (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
            _ => false,
        }
    }

    /// Ordering used by `<`, `sorted`, `max` and friends.
    pub fn compare(a: &Value, b: &Value) -> Result<Ordering, EzError> {
        if let (Some(x), Some(y)) = (a.as_num(), b.as_num()) {
            return Ok(match (x, y) {
                (Num::Int(x), Num::Int(y)) => x.cmp(&y),
                (x, y) => x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal),
            });
        }

        match (a, b) {
            (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
            (Value::List(x), Value::List(y)) => seq_compare(&x.borrow(), &y.borrow()),
            (Value::Tuple(x), Value::Tuple(y)) => seq_compare(x, y),
            _ => Err(EzError::type_error(format!(
                "comparison not supported between instances of '{}' and '{}'",
                a.type_name(),
                b.type_name()
            ))),
        }
    }
}

fn seq_equals(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Value::equals(x, y))
}

fn seq_compare(a: &[Value], b: &[Value]) -> Result<Ordering, EzError> {
    for (x, y) in a.iter().zip(b) {
        if Value::equals(x, y) {
            continue;
        }
        return Value::compare(x, y);
    }
    Ok(a.len().cmp(&b.len()))
}

/// Adds `value` to a set's backing vector unless an equal member exists.
/// Returns whether the value was inserted.
pub fn set_insert(members: &mut Vec<Value>, value: Value) -> Result<bool, EzError> {
    value.ensure_hashable()?;
    if members.iter().any(|m| Value::equals(m, &value)) {
        return Ok(false);
    }
    members.push(value);
    Ok(true)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Value::equals(self, other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::interpreter::display::value_repr(self))
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(k, v)| (k, v))).finish()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::interpreter::display::value_to_string(self))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_across_types() {
        assert!(Value::equals(&Value::Int(1), &Value::Float(1.0)));
        assert!(Value::equals(&Value::Bool(true), &Value::Int(1)));
        assert!(!Value::equals(&Value::Int(1), &Value::str("1")));
    }

    #[test]
    fn dict_keeps_insertion_order_on_overwrite() {
        let mut d = Dict::new();
        d.insert(Value::str("a"), Value::Int(1)).unwrap();
        d.insert(Value::str("b"), Value::Int(2)).unwrap();
        d.insert(Value::str("a"), Value::Int(3)).unwrap();

        let keys: Vec<_> = d.keys().cloned().collect();
        assert_eq!(keys, vec![Value::str("a"), Value::str("b")]);
        assert_eq!(d.get(&Value::str("a")), Some(&Value::Int(3)));
    }

    #[test]
    fn lists_are_not_hashable() {
        let mut d = Dict::new();
        let err = d.insert(Value::list(vec![]), Value::None).unwrap_err();
        assert!(err.message.contains("unhashable type: 'list'"));
    }

    #[test]
    fn mixed_comparison_is_a_type_error() {
        assert!(Value::compare(&Value::str("a"), &Value::Int(1)).is_err());
        assert_eq!(
            Value::compare(&Value::Int(2), &Value::Float(2.5)).unwrap(),
            Ordering::Less
        );
    }
}
