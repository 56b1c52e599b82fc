/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * Interpreter Entry & Runtime Context
 * -----------------------------------
 * This module is the **primary runtime entrypoint** for EzScript. It owns
 * everything one script run needs:
 *
 *  - The normalized line sequence of the script
 *  - The shared variable namespace and the function table
 *  - Output / input streams used by `print` and `input`
 *  - The random generator behind `random`, `choice`, `shuffle`, ...
 *  - The drawing surface behind the window built-ins
 *
 * All actual evaluation logic is delegated to the following submodules:
 *
 *  - statements.rs  → Line classification and block execution
 *  - expressions.rs → Expression evaluation
 *  - operators.rs   → Arithmetic, comparison and membership
 *  - calls.rs       → Call frames for user functions and built-ins
 *  - environment.rs → Namespace, snapshots, interpolation
 *  - display.rs     → Value formatting utilities
 *  - helpers.rs     → Iteration, indexing and conversions
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

pub mod calls;
pub mod display;
pub mod environment;
pub mod expressions;
pub mod helpers;
pub mod operators;
pub mod statements;

use std::io::{self, BufRead, BufReader, Write};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::Config;
use crate::error::{ErrorKind, EzError};
use crate::lexer::lines::normalize;
use crate::prototypes::window::{HeadlessSurface, Surface, Window};
use crate::value::Value;

pub use calls::Args;
use environment::Environment;
use statements::ExecSignal;

/// One EzScript execution context.
///
/// An `Interpreter` can run several scripts one after the other; every
/// [`run_source`](Interpreter::run_source) starts from an empty namespace
/// and function table, so identical scripts produce identical output.
pub struct Interpreter {
    /// Normalized script lines; index `i` is source line `i + 1`.
    pub(crate) lines: Rc<Vec<String>>,

    pub(crate) env: Environment,

    pub(crate) config: Config,

    /// Current user-function nesting.
    pub(crate) depth: usize,

    pub(crate) out: Box<dyn Write>,
    pub(crate) input: Box<dyn BufRead>,
    pub(crate) rng: StdRng,
    pub(crate) window: Window,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter bound to the process stdout/stdin, with a headless
    /// drawing surface.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            lines: Rc::new(Vec::new()),
            env: Environment::new(),
            config,
            depth: 0,
            out: Box::new(io::stdout()),
            input: Box::new(BufReader::new(io::stdin())),
            rng,
            window: Window::new(Box::new(HeadlessSurface::new())),
        }
    }

    /// Redirects `print` output.
    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Redirects the source `input(...)` reads from.
    pub fn with_input(mut self, input: impl BufRead + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Replaces the drawing surface used by the window built-ins.
    pub fn with_surface(mut self, surface: impl Surface + 'static) -> Self {
        self.window = Window::new(Box::new(surface));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a complete script.
    ///
    /// The namespace, the function table and the key bindings are cleared
    /// first. A top-level `return` ends the run without error.
    ///
    /// # Errors
    /// The first uncaught runtime error, carrying the 1-based line of the
    /// statement that raised it.
    pub fn run_source(&mut self, source: &str) -> Result<(), EzError> {
        self.env.clear();
        self.window.reset();
        self.depth = 0;
        self.rng = seeded_rng(self.config.seed);
        self.lines = Rc::new(normalize(source));

        debug!(lines = self.lines.len(), "run start");

        let result = self.run_block(0, 0, false);
        self.flush()?;

        match result? {
            ExecSignal::Return(value) => {
                debug!(value = ?value, "top-level return");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Evaluates one expression against the current namespace.
    pub fn evaluate(&mut self, text: &str) -> Result<Value, EzError> {
        self.eval_text(text.trim())
    }

    /// Reads a variable.
    pub fn get(&self, name: &str) -> Result<Value, EzError> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| EzError::not_defined(name))
    }

    /// Binds a variable, as `let name be value` would.
    pub fn set(&mut self, name: &str, value: Value) {
        self.env.set(name, value);
    }

    /// Writes one line to the script output.
    pub(crate) fn write_line(&mut self, text: &str) -> Result<(), EzError> {
        writeln!(self.out, "{}", text)
            .map_err(|e| EzError::new(ErrorKind::Io, format!("Cannot write output: {}", e)))
    }

    pub(crate) fn flush(&mut self) -> Result<(), EzError> {
        self.out
            .flush()
            .map_err(|e| EzError::new(ErrorKind::Io, format!("Cannot write output: {}", e)))
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
