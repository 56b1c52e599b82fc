/*
 * ============================================================================
 *  EZSCRIPT - Scripts that read like sentences
 * ============================================================================
 *
 *  Runtime Namespace
 *
 *  EzScript has exactly one live namespace. A function call does not push a
 *  new scope; it snapshots the whole variable table, binds its parameters
 *  into the same table, runs, and then puts the snapshot back. Inner
 *  functions therefore see globals and whatever their caller bound, never a
 *  captured lexical scope.
 *
 *  --------------------------------------------------------------------------
 *  Author
 *  --------------------------------------------------------------------------
 *  Author:   Sam Wilcox
 *
 *  --------------------------------------------------------------------------
 *  License
 *  --------------------------------------------------------------------------
 *  This file is part of the EzScript programming language project.
 *
 *  EzScript is dual-licensed under the terms of:
 *    • The MIT License
 *    • The Apache License, Version 2.0
 *
 *  You may choose either license to govern your use of this software.
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under these licenses is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ============================================================================
 */

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Param;
use crate::value::Value;

/// A user function, as recorded by a `function` line.
///
/// The body is not stored as statements: it runs from `body_start` until
/// the first line indented at most `indent`.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body_start: usize,
    /// Indentation of the `function` header line.
    pub indent: usize,
}

/// Variable table that remembers first-definition order.
///
/// Order matters for string interpolation, which substitutes variables in
/// the order they were first bound.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    order: Vec<String>,
    values: HashMap<String, Value>,
}

#[derive(Debug, Default)]
pub struct Environment {
    scope: Scope,
    functions: HashMap<String, Rc<FunctionDef>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every variable and function. Called at the start of a run.
    pub fn clear(&mut self) {
        self.scope = Scope::default();
        self.functions.clear();
    }

    // ---------------------------------------------------------------------
    // Variables
    // ---------------------------------------------------------------------

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scope.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scope.values.contains_key(name)
    }

    /// Binds or rebinds `name`. Rebinding keeps the original position.
    pub fn set(&mut self, name: &str, value: Value) {
        if self.scope.values.insert(name.to_string(), value).is_none() {
            self.scope.order.push(name.to_string());
        }
    }

    /// Variables in first-definition order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.scope
            .order
            .iter()
            .filter_map(|name| self.scope.values.get(name).map(|v| (name.as_str(), v)))
    }

    // ---------------------------------------------------------------------
    // Call frames
    // ---------------------------------------------------------------------

    /// Shallow copy of the variable table. Containers stay shared, so
    /// mutations made through them during a call survive the restore.
    pub fn snapshot(&self) -> Scope {
        self.scope.clone()
    }

    pub fn restore(&mut self, scope: Scope) {
        self.scope = scope;
    }

    // ---------------------------------------------------------------------
    // Functions
    // ---------------------------------------------------------------------

    pub fn define_function(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.clone(), Rc::new(def));
    }

    pub fn function(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.functions.get(name).cloned()
    }

    // ---------------------------------------------------------------------
    // Interpolation
    // ---------------------------------------------------------------------

    /// Replaces every `{name}` in `text` with the printed value of `name`.
    ///
    /// This is plain substitution, one variable at a time in definition
    /// order. `{a + 1}` is left alone; text produced by one substitution is
    /// seen by the later ones.
    pub fn interpolate(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (name, value) in self.variables() {
            let placeholder = format!("{{{}}}", name);
            if result.contains(&placeholder) {
                result = result.replace(&placeholder, &value.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_keeps_first_position() {
        let mut env = Environment::new();
        env.set("b", Value::Int(1));
        env.set("a", Value::Int(2));
        env.set("b", Value::Int(3));

        let names: Vec<_> = env.variables().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(env.get("b"), Some(&Value::Int(3)));
    }

    #[test]
    fn restore_drops_call_locals() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1));

        let saved = env.snapshot();
        env.set("x", Value::Int(99));
        env.set("local", Value::Int(5));
        env.restore(saved);

        assert_eq!(env.get("x"), Some(&Value::Int(1)));
        assert!(!env.contains("local"));
    }

    #[test]
    fn interpolation_is_plain_substitution() {
        let mut env = Environment::new();
        env.set("name", Value::str("world"));
        env.set("n", Value::Int(3));

        assert_eq!(env.interpolate("hello {name}, {n} times"), "hello world, 3 times");
        assert_eq!(env.interpolate("{missing} {n + 1}"), "{missing} {n + 1}");
    }
}
