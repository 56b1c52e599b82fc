/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * Call Dispatch & Invocation Engine
 * ---------------------------------
 * This module defines the **core runtime call semantics** for EzScript.
 * It is responsible for:
 *
 *  - Dispatching calls to built-ins and user functions
 *  - Framing user calls over the single shared namespace
 *  - Binding positional, named and default parameters
 *  - Bounding recursion depth
 *
 * A user call snapshots the variable table, binds its parameters into the
 * live table, runs the body, and restores the snapshot on every exit path,
 * errors included. Only the return value leaves the frame.
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

use std::rc::Rc;

use tracing::debug;

use crate::error::{ErrorKind, EzError};
use crate::globals;
use crate::interpreter::environment::FunctionDef;
use crate::interpreter::statements::ExecSignal;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Evaluated call arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
}

impl Args {
    pub fn new(positional: Vec<Value>) -> Self {
        Self {
            positional,
            named: Vec::new(),
        }
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Value> {
        self.positional.get(i)
    }

    /// Removes and returns a named argument.
    pub fn take_named(&mut self, name: &str) -> Option<Value> {
        let pos = self.named.iter().position(|(n, _)| n == name)?;
        Some(self.named.remove(pos).1)
    }

    /// Fails if any named argument is left over.
    pub fn no_named(&self, function: &str) -> Result<(), EzError> {
        match self.named.first() {
            None => Ok(()),
            Some((name, _)) => Err(EzError::type_error(format!(
                "{}() got an unexpected keyword argument '{}'",
                function, name
            ))),
        }
    }

    /// Checks the positional count and rejects named arguments.
    pub fn arity(&self, function: &str, min: usize, max: usize) -> Result<(), EzError> {
        self.no_named(function)?;

        let given = self.len();
        if (min..=max).contains(&given) {
            return Ok(());
        }

        let expected = if min == max {
            format!("exactly {} argument{}", min, if min == 1 { "" } else { "s" })
        } else if given < min {
            format!("at least {} argument{}", min, if min == 1 { "" } else { "s" })
        } else {
            format!("at most {} argument{}", max, if max == 1 { "" } else { "s" })
        };

        Err(EzError::type_error(format!(
            "{}() takes {} ({} given)",
            function, expected, given
        )))
    }
}

impl Interpreter {
    /// Calls a function by name, as `name(positional..., key=value...)`
    /// would from a script.
    pub fn call(
        &mut self,
        name: &str,
        positional: Vec<Value>,
        named: Vec<(String, Value)>,
    ) -> Result<Value, EzError> {
        let callee = self.lookup(name)?;
        self.call_value(&callee, Args { positional, named })
    }

    /// Invokes any callable value.
    pub(crate) fn call_value(&mut self, callee: &Value, args: Args) -> Result<Value, EzError> {
        match callee {
            Value::Function(def) => self.call_function(Rc::clone(def), args),
            Value::Builtin(builtin) => globals::call_builtin(self, *builtin, args),
            other => Err(EzError::type_error(format!(
                "'{}' object is not callable",
                other.type_name()
            ))),
        }
    }

    /// Runs one user-function frame.
    fn call_function(&mut self, def: Rc<FunctionDef>, args: Args) -> Result<Value, EzError> {
        if self.depth >= self.config.max_call_depth {
            return Err(EzError::new(
                ErrorKind::RecursionLimit,
                format!(
                    "Maximum recursion depth exceeded while calling '{}'",
                    def.name
                ),
            ));
        }

        debug!(function = %def.name, depth = self.depth + 1, "call");

        let saved = self.env.snapshot();
        self.depth += 1;
        let result = self.bind_and_run(&def, args);
        self.depth -= 1;
        self.env.restore(saved);

        result
    }

    fn bind_and_run(&mut self, def: &FunctionDef, args: Args) -> Result<Value, EzError> {
        let Args { positional, named } = args;

        if positional.len() > def.params.len() {
            return Err(EzError::type_error(format!(
                "{}() takes {} positional argument{} but {} were given",
                def.name,
                def.params.len(),
                if def.params.len() == 1 { "" } else { "s" },
                positional.len()
            )));
        }

        let mut bound = vec![false; def.params.len()];

        for (i, value) in positional.into_iter().enumerate() {
            self.env.set(&def.params[i].name, value);
            bound[i] = true;
        }

        for (name, value) in named {
            let i = def
                .params
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| {
                    EzError::type_error(format!(
                        "{}() got an unexpected keyword argument '{}'",
                        def.name, name
                    ))
                })?;
            if bound[i] {
                return Err(EzError::type_error(format!(
                    "{}() got multiple values for argument '{}'",
                    def.name, name
                )));
            }
            self.env.set(&name, value);
            bound[i] = true;
        }

        for (param, is_bound) in def.params.iter().zip(bound) {
            if is_bound {
                continue;
            }
            match &param.default {
                Some(default) => self.env.set(&param.name, default.clone()),
                None => return Err(EzError::missing_parameter(&param.name)),
            }
        }

        match self.run_block(def.body_start, def.indent + 1, false)? {
            ExecSignal::Return(value) => Ok(value),
            _ => Ok(Value::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_messages() {
        let args = Args::new(vec![Value::Int(1), Value::Int(2)]);
        assert!(args.arity("len", 1, 1).is_err());
        assert_eq!(
            args.arity("len", 1, 1).unwrap_err().message,
            "Type error: len() takes exactly 1 argument (2 given)"
        );
        assert!(args.arity("range", 1, 3).is_ok());
    }

    #[test]
    fn named_arguments_are_rejected_unless_taken() {
        let mut args = Args::new(vec![Value::Int(1)]);
        args.named.push(("reverse".into(), Value::Bool(true)));
        assert!(args.no_named("sorted").is_err());

        assert_eq!(args.take_named("reverse"), Some(Value::Bool(true)));
        assert!(args.no_named("sorted").is_ok());
    }
}
