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

use crate::value::Value;

/// One entry of a function's parameter list.
///
/// Defaults are evaluated once, when the `function` line runs, and the
/// resulting value is stored here.
///
/// # Example
/// ```text
/// function greet(name, greeting="hello"):
///                ^^^^  ^^^^^^^^^^^^^^^^
///                |     Param { name: "greeting", default: Some("hello") }
///                Param { name: "name", default: None }
/// ```
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}
