/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * File:     lib.rs
 * Purpose:  Crate root; wires the pipeline together.
 *
 *   script text
 *     → lexer::lines::normalize     (comments stripped, lines kept)
 *     → interpreter::statements     (line classification, blocks)
 *     → interpreter::expressions    (literals, parser, evaluation)
 *     → globals / prototypes        (built-ins, methods, collaborators)
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

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod globals;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod prototypes;
pub mod value;

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

pub use config::Config;
pub use diagnostics::DiagnosticPrinter;
pub use error::{ErrorKind, EzError, ScriptError};
pub use interpreter::Interpreter;
pub use prototypes::window::{HeadlessSurface, Surface};
pub use value::Value;

/// Runs a script file on stdout/stdin with configuration from the
/// environment.
pub fn run_file(path: impl AsRef<Path>) -> Result<(), ScriptError> {
    let mut interp = Interpreter::with_config(Config::from_env());
    run_file_with(&mut interp, path)
}

/// Runs a script file on an existing interpreter.
///
/// # Errors
/// - `BadExtension` before anything is read when the name does not end
///   in `.ez`
/// - `NotFound` / `Io` when the file cannot be read
/// - `Runtime` for an uncaught script error, carrying the script text for
///   the diagnostic report
pub fn run_file_with(interp: &mut Interpreter, path: impl AsRef<Path>) -> Result<(), ScriptError> {
    let path = path.as_ref();

    if path.extension().and_then(|e| e.to_str()) != Some(config::SCRIPT_EXTENSION) {
        return Err(ScriptError::BadExtension {
            extension: config::SCRIPT_EXTENSION,
        });
    }

    let script = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ScriptError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ScriptError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    info!(path = %path.display(), "running script");

    interp
        .run_source(&script)
        .map_err(|error| ScriptError::Runtime { error, script })
}
