/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * File:     prototypes.rs
 * Purpose:  Method dispatch on built-in receivers, plus the collaborators
 *           (math, clock, files, window) behind the built-in functions.
 *
 * `receiver.method(args)` is resolved here by receiver type. The method
 * tables are fixed; anything outside them is an unsupported expression.
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

pub mod array;
pub mod fs;
pub mod math;
pub mod object;
pub mod string;
pub mod time;
pub mod window;

use tracing::trace;

use crate::error::EzError;
use crate::interpreter::Args;
use crate::value::Value;

/// Calls `method` on `receiver`.
pub fn call_method(receiver: &Value, method: &str, args: Args) -> Result<Value, EzError> {
    trace!(receiver = receiver.type_name(), method, "method call");

    match receiver {
        Value::List(items) => array::call_list(items, method, args),
        Value::Tuple(items) => array::call_tuple(items, method, args),
        Value::Str(s) => string::call(s, method, args),
        Value::Dict(map) => object::call_dict(map, method, args),
        Value::Set(items) => object::call_set(items, method, args),
        other => Err(unknown_method(other.type_name(), method)),
    }
}

/// Error for a method outside the fixed tables.
pub fn unknown_method(type_name: &str, method: &str) -> EzError {
    EzError::unsupported(format!("'{}' object has no method '{}'", type_name, method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn dispatch_by_receiver_type() {
        let v = call_method(&Value::str("ab"), "upper", Args::default()).unwrap();
        assert_eq!(v, Value::str("AB"));

        let list = Value::list(vec![Value::Int(1)]);
        call_method(&list, "append", Args::new(vec![Value::Int(2)])).unwrap();
        assert_eq!(list.to_string(), "[1, 2]");
    }

    #[test]
    fn scalars_have_no_methods() {
        let err = call_method(&Value::Int(3), "bit_length", Args::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedExpression);
        assert_eq!(
            err.message,
            "Unsupported expression: 'int' object has no method 'bit_length'"
        );
    }
}
