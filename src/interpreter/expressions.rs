/*
 * ============================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ============================================================================
 *
 * Expression Evaluation Engine
 * -----------------------------
 * This module is responsible for **evaluating all EzScript expressions** at
 * runtime. Expression text goes through a fixed sequence of rules; the
 * first one that applies produces the value:
 *
 *   1. Integer literal, then float literal
 *   2. A single string literal containing `{` and `}` → interpolation
 *   3. A single plain string literal
 *   4. A `{ key: value, ... }` mapping literal
 *   5. Natural-language rewrite, parse, and tree evaluation
 *
 * This module is **pure evaluation only** and never executes statements,
 * except indirectly through user function calls.
 *
 * ---------------------------------------------------------------------------
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
 * ============================================================================
 */

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::ast::{Arg, Expr, LogicalOp, UnaryOp};
use crate::error::EzError;
use crate::globals::Builtin;
use crate::interpreter::calls::Args;
use crate::interpreter::helpers::index;
use crate::interpreter::operators;
use crate::interpreter::Interpreter;
use crate::lexer::unescape;
use crate::parser::parse_expression;
use crate::parser::text::{enclosing_braces, find_top_level, single_string_literal, split_top_level};
use crate::prototypes;
use crate::value::{Dict, Value};

static INT_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("int pattern must compile"));

static FLOAT_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?$").expect("float pattern must compile")
});

/// Read-only snapshot of key states exposed to scripts.
pub const KEY_STATES: &str = "keyStates";

impl Interpreter {
    /// Evaluates trimmed expression text.
    pub(crate) fn eval_text(&mut self, text: &str) -> Result<Value, EzError> {
        trace!(expression = text, "evaluate");

        // ---------------------------------------------------------------------
        // Numeric Literals
        // ---------------------------------------------------------------------
        if INT_LITERAL.is_match(text) {
            return text.parse::<i64>().map(Value::Int).map_err(|_| EzError::overflow());
        }
        if FLOAT_LITERAL.is_match(text) {
            return text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| EzError::syntax(format!("invalid number '{}'", text)));
        }

        // ---------------------------------------------------------------------
        // String Literals
        // ---------------------------------------------------------------------
        if let Some(raw) = single_string_literal(text) {
            if raw.contains('{') && raw.contains('}') {
                return Ok(Value::Str(unescape(&self.env.interpolate(raw))));
            }
            return Ok(Value::Str(unescape(raw)));
        }

        // ---------------------------------------------------------------------
        // Mapping Literal
        // ---------------------------------------------------------------------
        if let Some(inner) = enclosing_braces(text) {
            if let Some(mapping) = self.mapping_literal(inner)? {
                return Ok(mapping);
            }
        }

        // ---------------------------------------------------------------------
        // Generic Grammar
        // ---------------------------------------------------------------------
        let expr = parse_expression(text)?;
        self.eval_expr(&expr)
    }

    /// `{k: v, ...}` split at the top level, each side evaluated as its own
    /// expression text. Returns `None` when the first item has no top-level
    /// colon, leaving set literals to the grammar.
    fn mapping_literal(&mut self, inner: &str) -> Result<Option<Value>, EzError> {
        if inner.trim().is_empty() {
            return Ok(Some(Value::dict(Dict::new())));
        }

        let items = split_top_level(inner, ',');
        if items.first().and_then(|item| find_top_level(item, ':')).is_none() {
            return Ok(None);
        }

        let mut dict = Dict::new();
        for item in &items {
            let colon = find_top_level(item, ':')
                .ok_or_else(|| EzError::syntax(format!("Invalid dictionary item: {}", item)))?;
            let key = self.eval_text(item[..colon].trim())?;
            let value = self.eval_text(item[colon + 1..].trim())?;
            dict.insert(key, value)?;
        }

        Ok(Some(Value::dict(dict)))
    }

    /// Evaluates a parsed expression tree.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, EzError> {
        match expr {
            // ---------------------------------------------------------------------
            // Literal Values
            // ---------------------------------------------------------------------
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::None => Ok(Value::None),

            Expr::Name(name) => self.lookup(name),

            // ---------------------------------------------------------------------
            // Containers
            // ---------------------------------------------------------------------
            Expr::List(items) => Ok(Value::list(self.eval_all(items)?)),
            Expr::Tuple(items) => Ok(Value::tuple(self.eval_all(items)?)),
            Expr::Set(items) => Value::set(self.eval_all(items)?),
            Expr::Dict(pairs) => {
                let mut dict = Dict::new();
                for (k, v) in pairs {
                    let key = self.eval_expr(k)?;
                    let value = self.eval_expr(v)?;
                    dict.insert(key, value)?;
                }
                Ok(Value::dict(dict))
            }

            // ---------------------------------------------------------------------
            // Operators
            // ---------------------------------------------------------------------
            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                    UnaryOp::Neg => operators::negate(&value),
                    UnaryOp::Pos => operators::positive(&value),
                }
            }

            Expr::Binary { left, op, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                operators::binary(*op, &l, &r)
            }

            // `and` / `or` yield an operand, not a bool.
            Expr::Logical { left, op, right } => {
                let l = self.eval_expr(left)?;
                match (op, l.is_truthy()) {
                    (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(l),
                    _ => self.eval_expr(right),
                }
            }

            Expr::Compare { first, rest } => {
                let mut left = self.eval_expr(first)?;
                for (op, next) in rest {
                    let right = self.eval_expr(next)?;
                    if !operators::compare(*op, &left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }

            // ---------------------------------------------------------------------
            // Indexing & Calls
            // ---------------------------------------------------------------------
            Expr::Index { target, index: idx } => {
                let target = self.eval_expr(target)?;
                let idx = self.eval_expr(idx)?;
                index(&target, &idx)
            }

            Expr::Call { callee, args } => {
                let callee = self.eval_expr(callee)?;
                let args = self.eval_args(args)?;
                self.call_value(&callee, args)
            }

            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval_expr(receiver)?;
                let args = self.eval_args(args)?;
                prototypes::call_method(&receiver, method, args)
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, EzError> {
        exprs.iter().map(|e| self.eval_expr(e)).collect()
    }

    fn eval_args(&mut self, args: &[Arg]) -> Result<Args, EzError> {
        let mut out = Args::default();
        for arg in args {
            match arg {
                Arg::Positional(expr) => out.positional.push(self.eval_expr(expr)?),
                Arg::Named(name, expr) => {
                    if out.named.iter().any(|(n, _)| n == name) {
                        return Err(EzError::syntax(format!("keyword argument repeated: {}", name)));
                    }
                    let value = self.eval_expr(expr)?;
                    out.named.push((name.clone(), value));
                }
            }
        }
        Ok(out)
    }

    /// Resolves a bare name.
    ///
    /// Order: user functions, variables, the `keyStates` snapshot, then
    /// built-ins. Users can therefore shadow any built-in.
    pub(crate) fn lookup(&self, name: &str) -> Result<Value, EzError> {
        if let Some(def) = self.env.function(name) {
            return Ok(Value::Function(def));
        }
        if let Some(value) = self.env.get(name) {
            return Ok(value.clone());
        }
        if name == KEY_STATES {
            return Ok(self.window.key_states());
        }
        Builtin::lookup(name)
            .map(Value::Builtin)
            .ok_or_else(|| EzError::not_defined(name))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::ErrorKind;
    use crate::interpreter::Interpreter;
    use crate::value::Value;

    fn eval(interp: &mut Interpreter, text: &str) -> Value {
        interp.evaluate(text).unwrap()
    }

    #[test]
    fn literal_rules_come_first() {
        let mut interp = Interpreter::new();
        assert_eq!(eval(&mut interp, "42"), Value::Int(42));
        assert!(matches!(eval(&mut interp, "2.5"), Value::Float(f) if f == 2.5));
        assert_eq!(eval(&mut interp, r#""a\tb""#), Value::str("a\tb"));
    }

    #[test]
    fn interpolation_uses_current_variables() {
        let mut interp = Interpreter::new();
        interp.set("name", Value::str("world"));
        assert_eq!(eval(&mut interp, r#""hello {name}""#), Value::str("hello world"));
        assert_eq!(eval(&mut interp, r#""{nobody}""#), Value::str("{nobody}"));
    }

    #[test]
    fn mapping_literal_is_depth_aware() {
        let mut interp = Interpreter::new();
        let value = eval(&mut interp, r#"{"a": 1, "b": [2, 3]}"#);
        let Value::Dict(map) = value else {
            panic!("expected a dict");
        };
        let map = map.borrow();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get(&Value::str("b")),
            Some(&Value::list(vec![Value::Int(2), Value::Int(3)]))
        );
    }

    #[test]
    fn braces_without_colon_make_a_set() {
        let mut interp = Interpreter::new();
        assert_eq!(eval(&mut interp, "{1, 2, 2}").to_string(), "{1, 2}");
    }

    #[test]
    fn natural_language_comparisons() {
        let mut interp = Interpreter::new();
        interp.set("score", Value::Int(12));
        assert_eq!(eval(&mut interp, "score is greater than 10"), Value::Bool(true));
        assert_eq!(eval(&mut interp, "score is equal to 12 and true"), Value::Bool(true));
        assert_eq!(eval(&mut interp, "score less than 3"), Value::Bool(false));
    }

    #[test]
    fn logical_operators_return_operands() {
        let mut interp = Interpreter::new();
        assert_eq!(eval(&mut interp, r#""" or "fallback""#), Value::str("fallback"));
        assert_eq!(eval(&mut interp, "0 and undefined_name"), Value::Int(0));
    }

    #[test]
    fn unknown_names_are_not_defined() {
        let mut interp = Interpreter::new();
        let err = interp.evaluate("mystery + 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotDefined);
        assert_eq!(err.message, "Variable 'mystery' is not defined");
    }

    #[test]
    fn variables_shadow_builtins() {
        let mut interp = Interpreter::new();
        interp.set("len", Value::Int(3));
        assert_eq!(eval(&mut interp, "len + 1"), Value::Int(4));
    }
}
