/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * Block Executor
 * --------------
 * Walks the normalized line sequence, classifies every line against an
 * ordered rule table and executes it. Blocks are delimited purely by
 * indentation: a header owns every following line that is indented deeper
 * than itself.
 *
 * Supported statements:
 *  • function definitions and return
 *  • break / continue / throw
 *  • let (plain, multi-name, multi-line literal, read file)
 *  • augmented assignment
 *  • print, wait, write / append to file
 *  • if / elif / else, loop N times, while, for each
 *  • try / catch
 *  • bare calls and method calls
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

use std::rc::Rc;
use std::thread;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::ast::{BinaryOp, Param};
use crate::error::{ErrorKind, EzError};
use crate::interpreter::environment::FunctionDef;
use crate::interpreter::helpers::{iterate, to_int};
use crate::interpreter::operators;
use crate::interpreter::Interpreter;
use crate::lexer::lines::{indent_of, is_blank};
use crate::parser::text::{bracket_depth, find_top_level, split_top_level};
use crate::prototypes::fs;
use crate::value::Value;

/* ============================================================================
 * Execution Control Signals
 * ============================================================================
 */

/// Outcome of running a block.
#[derive(Debug)]
pub enum ExecSignal {
    /// The block ran to its end.
    None,

    /// `return`, consumed by the enclosing call frame.
    Return(Value),

    /// `break`, consumed by the nearest loop.
    Break,

    /// `continue`, consumed by the nearest loop.
    Continue,
}

/// What the block executor does after a statement.
enum Step {
    /// Continue with the following line.
    Next,

    /// Continue at this line index (the statement consumed a block).
    Jump(usize),

    /// Stop the current block and hand the signal upwards.
    Signal(ExecSignal),
}

/// Position of the statement being executed.
#[derive(Debug, Clone, Copy)]
struct Ctx {
    index: usize,
    indent: usize,
    in_loop: bool,
}

type Handler = fn(&mut Interpreter, &Captures<'_>, Ctx) -> Result<Step, EzError>;

/// One statement form: the first rule whose pattern matches the trimmed
/// line handles it.
struct Rule {
    name: &'static str,
    pattern: Regex,
    run: Handler,
}

fn rule(name: &'static str, pattern: &str, run: Handler) -> Rule {
    Rule {
        name,
        pattern: Regex::new(pattern).expect("statement pattern must compile"),
        run,
    }
}

/* ============================================================================
 * Rule Table
 * ============================================================================
 *
 * Order is significant: `let x be read file p` must be seen before the
 * general `let`, `print x` before `print(...)`, and the bare call rule
 * catches whatever is left that looks like a call.
 */

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(
            "function",
            r"^function\s+([A-Za-z_]\w*)\s*\((.*)\)\s*:?$",
            exec_function,
        ),
        rule("return", r"^return(?:\s+(.+))?$", exec_return),
        rule("break/continue", r"^(break|continue)$", exec_loop_control),
        rule("throw", r"^throw\s+(.+)$", exec_throw),
        rule(
            "read file",
            r"^let\s+(.+?)\s+be\s+read\s+file\s+(.+)$",
            exec_read_file,
        ),
        rule("let", r"^let\s+(.+?)\s+be\s+(.+)$", exec_let),
        rule(
            "augmented assignment",
            r"^([A-Za-z_]\w*)\s*(\*\*=|//=|\+=|-=|\*=|/=|%=)\s*(.+)$",
            exec_augmented,
        ),
        rule("print without parentheses", r"^print\s", exec_print_bare),
        rule("print", r"^print\((.*)$", exec_print),
        rule("wait", r"^wait\s+(.+?)\s+seconds?$", exec_wait),
        rule(
            "file output",
            r"^(write|append)\s+(.+?)\s+to\s+file\s+(.+)$",
            exec_file_output,
        ),
        rule("if", r"^if\s+(.+?)(?:\s+then|\s*:)$", exec_if),
        rule("stray branch", r"^(elif|else)\b", exec_stray),
        rule("loop", r"^loop\s+(.+?)\s+times\s*:$", exec_loop_times),
        rule("while", r"^while\s+(.+?)(?:\s+then|\s*:)$", exec_while),
        rule(
            "for each",
            r"^for\s+each\s+(.+?)\s+in\s+(.+?)(?:\s+then|\s*:)$",
            exec_for_each,
        ),
        rule("try", r"^try\s*:$", exec_try),
        rule("stray catch", r"^(catch)\b", exec_stray),
        rule("call", r"^.*\(.*\).*$", exec_call),
    ]
});

static ELIF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^elif\s+(.+?)(?:\s+then|\s*:)$").expect("elif pattern must compile")
});

static ELSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^else\s*:?$").expect("else pattern must compile"));

static CATCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^catch(?:\s+([A-Za-z_]\w*))?\s*:$").expect("catch pattern must compile")
});

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_]\w*$").expect("identifier pattern must compile"));

/// Name of the variable bound by `loop N times`.
pub const LOOP_INDEX: &str = "loop_index";

/* ============================================================================
 * Block Execution Entry Point
 * ============================================================================
 */

impl Interpreter {
    /// Executes lines from `start` until a line indented less than
    /// `min_indent` (or the end of the script).
    ///
    /// # Parameters
    /// - `start`: first line index of the block
    /// - `min_indent`: lines indented less than this close the block
    /// - `in_loop`: whether `break` / `continue` are legal here
    ///
    /// # Errors
    /// Any error raised by a statement, annotated with that statement's
    /// 1-based line unless an inner frame already annotated it.
    pub(crate) fn run_block(
        &mut self,
        start: usize,
        min_indent: usize,
        in_loop: bool,
    ) -> Result<ExecSignal, EzError> {
        let lines = Rc::clone(&self.lines);
        let mut i = start;

        while i < lines.len() {
            let line = &lines[i];
            if is_blank(line) {
                i += 1;
                continue;
            }

            let indent = indent_of(line);
            if indent < min_indent {
                break;
            }

            let ctx = Ctx {
                index: i,
                indent,
                in_loop,
            };

            match self.exec_line(line.trim(), ctx).map_err(|e| e.at_line(i + 1))? {
                Step::Next => i += 1,
                Step::Jump(next) => i = next,
                Step::Signal(signal) => return Ok(signal),
            }
        }

        Ok(ExecSignal::None)
    }

    /// Classifies one trimmed line and runs its handler.
    fn exec_line(&mut self, text: &str, ctx: Ctx) -> Result<Step, EzError> {
        for rule in RULES.iter() {
            if let Some(caps) = rule.pattern.captures(text) {
                debug!(line = ctx.index + 1, rule = rule.name, "statement");
                return (rule.run)(self, &caps, ctx);
            }
        }

        Err(EzError::statement(format!("Unrecognized statement: {}", text)))
    }

    /// Index of the first line after the block owned by the header at
    /// `header`, i.e. the next non-blank line indented at most `indent`.
    fn block_end(&self, header: usize, indent: usize) -> usize {
        let mut end = header + 1;
        while end < self.lines.len() {
            let line = &self.lines[end];
            if !is_blank(line) && indent_of(line) <= indent {
                break;
            }
            end += 1;
        }
        end
    }

    /// Runs the body owned by the header at `ctx.index`.
    fn run_body(&mut self, header: usize, ctx: Ctx, in_loop: bool) -> Result<ExecSignal, EzError> {
        self.run_block(header + 1, ctx.indent + 1, in_loop)
    }
}

/* ============================================================================
 * Functions & Control Flow
 * ============================================================================
 */

fn exec_function(interp: &mut Interpreter, caps: &Captures<'_>, ctx: Ctx) -> Result<Step, EzError> {
    let name = caps[1].to_string();
    let mut params = Vec::new();

    for part in split_top_level(&caps[2], ',') {
        let param = match find_top_level(&part, '=') {
            Some(pos) => {
                let param_name = part[..pos].trim();
                let default = interp.evaluate(&part[pos + 1..])?;
                Param::with_default(param_name, default)
            }
            None => Param::required(part.as_str()),
        };

        if !IDENTIFIER.is_match(&param.name) {
            return Err(EzError::statement(format!(
                "Invalid parameter name '{}' in function '{}'",
                param.name, name
            )));
        }
        if params.iter().any(|p: &Param| p.name == param.name) {
            return Err(EzError::statement(format!(
                "Duplicate parameter '{}' in function '{}'",
                param.name, name
            )));
        }
        params.push(param);
    }

    let body_end = interp.block_end(ctx.index, ctx.indent);
    debug!(function = %name, params = params.len(), "define");

    interp.env.define_function(FunctionDef {
        name,
        params,
        body_start: ctx.index + 1,
        indent: ctx.indent,
    });

    Ok(Step::Jump(body_end))
}

fn exec_return(interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    let value = match caps.get(1) {
        None => Value::None,
        Some(expr) => {
            let parts = split_top_level(expr.as_str(), ',');
            if parts.len() > 1 {
                let values = parts
                    .iter()
                    .map(|part| interp.evaluate(part))
                    .collect::<Result<Vec<_>, _>>()?;
                Value::tuple(values)
            } else {
                interp.evaluate(expr.as_str())?
            }
        }
    };

    Ok(Step::Signal(ExecSignal::Return(value)))
}

fn exec_loop_control(_interp: &mut Interpreter, caps: &Captures<'_>, ctx: Ctx) -> Result<Step, EzError> {
    let keyword = &caps[1];
    if !ctx.in_loop {
        return Err(EzError::illegal_flow(keyword));
    }

    Ok(Step::Signal(if keyword == "break" {
        ExecSignal::Break
    } else {
        ExecSignal::Continue
    }))
}

fn exec_throw(interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    let value = interp.evaluate(&caps[1])?;
    Err(EzError::thrown(value.to_string()))
}

/* ============================================================================
 * Assignment
 * ============================================================================
 */

fn exec_read_file(interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    let name = variable_name(&caps[1])?;
    let path = file_path(interp.evaluate(&caps[2])?)?;
    let text = fs::read_text(&path)?;
    interp.env.set(name, Value::Str(text));
    Ok(Step::Next)
}

fn exec_let(interp: &mut Interpreter, caps: &Captures<'_>, ctx: Ctx) -> Result<Step, EzError> {
    let targets = caps[1].trim();
    let mut expr = caps[2].trim().to_string();
    let mut last = ctx.index;

    // `let items be [` continues until the brackets balance.
    if expr.starts_with('[') || expr.starts_with('{') {
        while bracket_depth(&expr) > 0 {
            last += 1;
            let next = interp.lines.get(last).ok_or_else(|| {
                EzError::statement(format!("Unterminated literal in assignment to '{}'", targets))
            })?;
            expr.push('\n');
            expr.push_str(next.trim_end());
        }
    }

    let value = interp.evaluate(&expr)?;

    if targets.contains(',') {
        let names = targets
            .split(',')
            .map(variable_name)
            .collect::<Result<Vec<_>, _>>()?;
        assign_many(interp, &names, value);
    } else {
        let name = variable_name(targets)?;
        interp.env.set(name, value);
    }

    Ok(if last == ctx.index {
        Step::Next
    } else {
        Step::Jump(last + 1)
    })
}

/// `let a, b be x`: destructures a list or tuple of matching length,
/// otherwise binds the same value to every name.
fn assign_many(interp: &mut Interpreter, names: &[&str], value: Value) {
    let items = match &value {
        Value::List(items) => Some(items.borrow().clone()),
        Value::Tuple(items) => Some(items.as_ref().clone()),
        _ => None,
    };

    match items {
        Some(items) if items.len() == names.len() => {
            for (name, item) in names.iter().zip(items) {
                interp.env.set(name, item);
            }
        }
        _ => {
            for name in names {
                interp.env.set(name, value.clone());
            }
        }
    }
}

fn exec_augmented(interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    let name = &caps[1];
    let op = BinaryOp::from_augmented(&caps[2])
        .ok_or_else(|| EzError::statement(format!("Unknown operator '{}'", &caps[2])))?;

    let current = interp
        .env
        .get(name)
        .cloned()
        .ok_or_else(|| EzError::not_defined(name))?;
    let operand = interp.evaluate(&caps[3])?;

    // `items += more` extends the list in place, so aliases see it.
    if let (BinaryOp::Add, Value::List(items)) = (op, &current) {
        let extra = iterate(&operand)?;
        items.borrow_mut().extend(extra);
        return Ok(Step::Next);
    }

    let updated = operators::binary(op, &current, &operand)?;
    interp.env.set(name, updated);
    Ok(Step::Next)
}

/* ============================================================================
 * Output, Waiting & Files
 * ============================================================================
 */

fn exec_print_bare(_interp: &mut Interpreter, _caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    Err(EzError::statement(
        "print requires parentheses: use print(...) instead of print ...",
    ))
}

fn exec_print(interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    let inner = caps[1]
        .strip_suffix(')')
        .ok_or_else(|| EzError::statement("Missing closing parenthesis in print statement"))?;

    let mut pieces = Vec::new();
    for part in split_top_level(inner, ',') {
        let value = interp.evaluate(&part)?;
        let text = match value {
            // Strings built at runtime ("{" + "name}") still interpolate.
            Value::Str(s) if s.contains('{') && s.contains('}') => interp.env.interpolate(&s),
            other => other.to_string(),
        };
        pieces.push(text);
    }

    interp.write_line(&pieces.join(" "))?;
    Ok(Step::Next)
}

fn exec_wait(interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    let value = interp.evaluate(&caps[1])?;
    let seconds = match value.as_num() {
        Some(n) => n.as_f64(),
        None => {
            return Err(EzError::type_error(format!(
                "wait expects a number of seconds, not '{}'",
                value.type_name()
            )))
        }
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(EzError::invalid_value("sleep length must be non-negative"));
    }

    interp.flush()?;
    thread::sleep(Duration::from_secs_f64(seconds));
    Ok(Step::Next)
}

fn exec_file_output(interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    let content = interp.evaluate(&caps[2])?.to_string();
    let path = file_path(interp.evaluate(&caps[3])?)?;

    if &caps[1] == "write" {
        fs::write_text(&path, &content)?;
    } else {
        fs::append_text(&path, &content)?;
    }
    Ok(Step::Next)
}

/* ============================================================================
 * Branching & Loops
 * ============================================================================
 */

/// `if` followed by any number of `elif` and an optional `else`, all at
/// the header's indentation. Exactly one branch body runs at most, and
/// conditions after the taken branch are not evaluated.
fn exec_if(interp: &mut Interpreter, caps: &Captures<'_>, ctx: Ctx) -> Result<Step, EzError> {
    let lines = Rc::clone(&interp.lines);
    let mut header = ctx.index;
    let mut condition = Some(caps[1].to_string());
    let mut handled = false;

    loop {
        let end = interp.block_end(header, ctx.indent);

        if !handled {
            let take = match &condition {
                Some(text) => interp
                    .evaluate(text)
                    .map_err(|e| e.at_line(header + 1))?
                    .is_truthy(),
                None => true,
            };

            if take {
                handled = true;
                match interp.run_body(header, ctx, ctx.in_loop)? {
                    ExecSignal::None => {}
                    signal => return Ok(Step::Signal(signal)),
                }
            }
        }

        // `else` closes the chain.
        if condition.is_none() {
            return Ok(Step::Jump(end));
        }

        let Some(next) = lines.get(end) else {
            return Ok(Step::Jump(end));
        };
        if indent_of(next) != ctx.indent {
            return Ok(Step::Jump(end));
        }

        let trimmed = next.trim();
        if let Some(elif) = ELIF.captures(trimmed) {
            condition = Some(elif[1].to_string());
        } else if ELSE.is_match(trimmed) {
            condition = None;
        } else {
            return Ok(Step::Jump(end));
        }
        header = end;
    }
}

fn exec_stray(_interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    let keyword = &caps[1];
    let owner = if keyword == "catch" { "try" } else { "if" };
    Err(EzError::statement(format!(
        "'{}' without a matching '{}'",
        keyword, owner
    )))
}

/// Runs one loop iteration and reports whether the loop should stop.
enum Iteration {
    Continue,
    Stop,
    Return(Value),
}

fn iteration(interp: &mut Interpreter, ctx: Ctx) -> Result<Iteration, EzError> {
    Ok(match interp.run_body(ctx.index, ctx, true)? {
        ExecSignal::None | ExecSignal::Continue => Iteration::Continue,
        ExecSignal::Break => Iteration::Stop,
        ExecSignal::Return(value) => Iteration::Return(value),
    })
}

fn exec_loop_times(interp: &mut Interpreter, caps: &Captures<'_>, ctx: Ctx) -> Result<Step, EzError> {
    let count = to_int(&interp.evaluate(&caps[1])?)?;
    let end = interp.block_end(ctx.index, ctx.indent);

    for n in 0..count.max(0) {
        interp.env.set(LOOP_INDEX, Value::Int(n));
        match iteration(interp, ctx)? {
            Iteration::Continue => {}
            Iteration::Stop => break,
            Iteration::Return(value) => return Ok(Step::Signal(ExecSignal::Return(value))),
        }
    }

    Ok(Step::Jump(end))
}

fn exec_while(interp: &mut Interpreter, caps: &Captures<'_>, ctx: Ctx) -> Result<Step, EzError> {
    let end = interp.block_end(ctx.index, ctx.indent);

    while interp.evaluate(&caps[1])?.is_truthy() {
        match iteration(interp, ctx)? {
            Iteration::Continue => {}
            Iteration::Stop => break,
            Iteration::Return(value) => return Ok(Step::Signal(ExecSignal::Return(value))),
        }
    }

    Ok(Step::Jump(end))
}

fn exec_for_each(interp: &mut Interpreter, caps: &Captures<'_>, ctx: Ctx) -> Result<Step, EzError> {
    let name = variable_name(&caps[1])?;
    let items = iterate(&interp.evaluate(&caps[2])?)?;
    let end = interp.block_end(ctx.index, ctx.indent);

    for item in items {
        interp.env.set(name, item);
        match iteration(interp, ctx)? {
            Iteration::Continue => {}
            Iteration::Stop => break,
            Iteration::Return(value) => return Ok(Step::Signal(ExecSignal::Return(value))),
        }
    }

    Ok(Step::Jump(end))
}

/* ============================================================================
 * Try / Catch
 * ============================================================================
 */

fn exec_try(interp: &mut Interpreter, _caps: &Captures<'_>, ctx: Ctx) -> Result<Step, EzError> {
    let lines = Rc::clone(&interp.lines);
    let try_end = interp.block_end(ctx.index, ctx.indent);

    let catch_line = lines
        .get(try_end)
        .filter(|line| indent_of(line) == ctx.indent && line.trim().starts_with("catch"))
        .ok_or_else(|| EzError::new(ErrorKind::MissingCatch, "try block must have a catch block"))?;

    let error_var = match CATCH.captures(catch_line.trim()) {
        Some(caps) => caps.get(1).map(|m| m.as_str().to_string()),
        None => {
            return Err(EzError::new(ErrorKind::InvalidCatch, "Invalid catch syntax").at_line(try_end + 1))
        }
    };
    let catch_end = interp.block_end(try_end, ctx.indent);

    match interp.run_body(ctx.index, ctx, ctx.in_loop) {
        Ok(ExecSignal::None) => {}
        Ok(signal) => return Ok(Step::Signal(signal)),
        Err(error) => {
            debug!(line = ?error.line, kind = ?error.kind, "caught");
            if let Some(name) = &error_var {
                interp.env.set(name, Value::Str(error.message));
            }

            let catch_ctx = Ctx {
                index: try_end,
                ..ctx
            };
            match interp.run_body(try_end, catch_ctx, ctx.in_loop)? {
                ExecSignal::None => {}
                signal => return Ok(Step::Signal(signal)),
            }
        }
    }

    Ok(Step::Jump(catch_end))
}

/* ============================================================================
 * Expression Statements
 * ============================================================================
 */

fn exec_call(interp: &mut Interpreter, caps: &Captures<'_>, _ctx: Ctx) -> Result<Step, EzError> {
    interp.evaluate(&caps[0])?;
    Ok(Step::Next)
}

/* ============================================================================
 * Helpers
 * ============================================================================
 */

fn variable_name(raw: &str) -> Result<&str, EzError> {
    let name = raw.trim();
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(EzError::statement(format!("Invalid variable name: '{}'", name)))
    }
}

fn file_path(value: Value) -> Result<String, EzError> {
    match value {
        Value::Str(path) => Ok(path),
        other => Err(EzError::type_error(format!(
            "file path must be a string, not '{}'",
            other.type_name()
        ))),
    }
}
