/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * File:     globals.rs
 * Purpose:  The fixed table of built-in functions.
 *
 * Built-ins are not values in the namespace; a bare name that is neither a
 * user function nor a variable resolves here. Each built-in validates its
 * own arguments before doing anything observable.
 *
 *   globals/convert.rs   str int float bool list dict set tuple type
 *   globals/sequence.rs  len range sorted reversed enumerate zip all any
 *   prototypes/math.rs   abs max min sum round random choice shuffle ...
 *   prototypes/time.rs   current_time current_date current_datetime ...
 *   prototypes/window.rs createWindow drawCircle onKeyDown ...
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

pub mod convert;
pub mod sequence;

use std::io::Write;

use crate::error::{ErrorKind, EzError};
use crate::interpreter::{Args, Interpreter};
use crate::prototypes::{math, time, window};
use crate::value::Value;

/// Every built-in callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    // Conversions / types
    Str,
    Int,
    Float,
    Bool,
    List,
    Dict,
    Set,
    Tuple,
    Type,

    // Sequences
    Len,
    Range,
    Sorted,
    Reversed,
    Enumerate,
    Zip,
    All,
    Any,

    // Math & randomness
    Abs,
    Max,
    Min,
    Sum,
    Round,
    Random,
    Choice,
    Shuffle,
    Randrange,
    Uniform,

    // Clock
    CurrentTime,
    CurrentDate,
    CurrentDatetime,
    Timestamp,

    // Console
    Input,

    // Window
    CreateWindow,
    SetWindowTitle,
    SetWindowSize,
    SetBackground,
    DrawCircle,
    DrawRectangle,
    DrawLine,
    DrawText,
    LoadImage,
    ClearWindow,
    UpdateWindow,
    ShowWindow,
    CloseWindow,
    SetWindowIcon,
    RemoveWindowIcon,
    OnKeyDown,
    OnKeyUp,
}

const TABLE: &[(&str, Builtin)] = &[
    ("str", Builtin::Str),
    ("int", Builtin::Int),
    ("float", Builtin::Float),
    ("bool", Builtin::Bool),
    ("list", Builtin::List),
    ("dict", Builtin::Dict),
    ("set", Builtin::Set),
    ("tuple", Builtin::Tuple),
    ("type", Builtin::Type),
    ("len", Builtin::Len),
    ("range", Builtin::Range),
    ("sorted", Builtin::Sorted),
    ("reversed", Builtin::Reversed),
    ("enumerate", Builtin::Enumerate),
    ("zip", Builtin::Zip),
    ("all", Builtin::All),
    ("any", Builtin::Any),
    ("abs", Builtin::Abs),
    ("max", Builtin::Max),
    ("min", Builtin::Min),
    ("sum", Builtin::Sum),
    ("round", Builtin::Round),
    ("random", Builtin::Random),
    ("choice", Builtin::Choice),
    ("shuffle", Builtin::Shuffle),
    ("randrange", Builtin::Randrange),
    ("uniform", Builtin::Uniform),
    ("current_time", Builtin::CurrentTime),
    ("current_date", Builtin::CurrentDate),
    ("current_datetime", Builtin::CurrentDatetime),
    ("timestamp", Builtin::Timestamp),
    ("input", Builtin::Input),
    ("createWindow", Builtin::CreateWindow),
    ("setWindowTitle", Builtin::SetWindowTitle),
    ("setWindowSize", Builtin::SetWindowSize),
    ("setBackground", Builtin::SetBackground),
    ("drawCircle", Builtin::DrawCircle),
    ("drawRectangle", Builtin::DrawRectangle),
    ("drawLine", Builtin::DrawLine),
    ("drawText", Builtin::DrawText),
    ("loadImage", Builtin::LoadImage),
    ("clearWindow", Builtin::ClearWindow),
    ("updateWindow", Builtin::UpdateWindow),
    ("showWindow", Builtin::ShowWindow),
    ("closeWindow", Builtin::CloseWindow),
    ("setWindowIcon", Builtin::SetWindowIcon),
    ("removeWindowIcon", Builtin::RemoveWindowIcon),
    ("onKeyDown", Builtin::OnKeyDown),
    ("onKeyUp", Builtin::OnKeyUp),
];

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        TABLE.iter().find(|(n, _)| *n == name).map(|(_, b)| *b)
    }

    pub fn name(self) -> &'static str {
        TABLE
            .iter()
            .find(|(_, b)| *b == self)
            .map_or("?", |(n, _)| n)
    }

    /// Built-ins that double as type objects (`type(3) == int`).
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Builtin::Str
                | Builtin::Int
                | Builtin::Float
                | Builtin::Bool
                | Builtin::List
                | Builtin::Dict
                | Builtin::Set
                | Builtin::Tuple
        )
    }

    pub fn is_window(self) -> bool {
        matches!(
            self,
            Builtin::CreateWindow
                | Builtin::SetWindowTitle
                | Builtin::SetWindowSize
                | Builtin::SetBackground
                | Builtin::DrawCircle
                | Builtin::DrawRectangle
                | Builtin::DrawLine
                | Builtin::DrawText
                | Builtin::LoadImage
                | Builtin::ClearWindow
                | Builtin::UpdateWindow
                | Builtin::ShowWindow
                | Builtin::CloseWindow
                | Builtin::SetWindowIcon
                | Builtin::RemoveWindowIcon
                | Builtin::OnKeyDown
                | Builtin::OnKeyUp
        )
    }
}

/// Dispatches a built-in call.
pub fn call_builtin(interp: &mut Interpreter, builtin: Builtin, args: Args) -> Result<Value, EzError> {
    if builtin.is_window() {
        return window::call(interp, builtin, args);
    }

    let name = builtin.name();
    match builtin {
        Builtin::Str
        | Builtin::Int
        | Builtin::Float
        | Builtin::Bool
        | Builtin::List
        | Builtin::Dict
        | Builtin::Set
        | Builtin::Tuple
        | Builtin::Type => convert::call(builtin, name, args),

        Builtin::Len
        | Builtin::Range
        | Builtin::Sorted
        | Builtin::Reversed
        | Builtin::Enumerate
        | Builtin::Zip
        | Builtin::All
        | Builtin::Any => sequence::call(builtin, name, args),

        Builtin::Abs | Builtin::Max | Builtin::Min | Builtin::Sum | Builtin::Round => {
            math::call(builtin, name, args)
        }

        Builtin::Random
        | Builtin::Choice
        | Builtin::Shuffle
        | Builtin::Randrange
        | Builtin::Uniform => math::call_random(&mut interp.rng, builtin, name, args),

        Builtin::CurrentTime
        | Builtin::CurrentDate
        | Builtin::CurrentDatetime
        | Builtin::Timestamp => {
            args.arity(name, 0, 0)?;
            Ok(time::call(builtin))
        }

        Builtin::Input => input(interp, args),

        _ => window::call(interp, builtin, args),
    }
}

/// `input(prompt="")`: writes the prompt without a newline and reads one
/// line, without its line ending.
fn input(interp: &mut Interpreter, args: Args) -> Result<Value, EzError> {
    args.arity("input", 0, 1)?;

    if let Some(prompt) = args.get(0) {
        write!(interp.out, "{}", prompt)
            .map_err(|e| EzError::new(ErrorKind::Io, format!("Cannot write output: {}", e)))?;
    }
    interp.flush()?;

    let mut line = String::new();
    let read = interp
        .input
        .read_line(&mut line)
        .map_err(|e| EzError::new(ErrorKind::Io, format!("Cannot read input: {}", e)))?;
    if read == 0 {
        return Err(EzError::new(ErrorKind::Io, "EOF when reading a line"));
    }

    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(Value::str(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_the_table() {
        for (name, builtin) in TABLE {
            assert_eq!(Builtin::lookup(name), Some(*builtin));
            assert_eq!(builtin.name(), *name);
        }
        assert_eq!(Builtin::lookup("print"), None);
    }

    #[test]
    fn window_builtins_are_grouped() {
        assert!(Builtin::DrawCircle.is_window());
        assert!(!Builtin::Len.is_window());
        assert!(Builtin::Int.is_type());
    }
}
