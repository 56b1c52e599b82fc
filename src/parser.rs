/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * File:     parser/mod.rs
 * Purpose:  Root module for the EzScript expression parser.
 *
 * This module wires together all parser sub-modules, including:
 *   - Core parser control logic
 *   - Expression grammar
 *   - Natural-language operator rewriting
 *   - Quote-aware text splitting used by statement rules
 *
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the EzScript programming language project.
 *
 * EzScript is dual-licensed under the terms of:
 *   - The MIT license
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

/// Core parser orchestration:
/// - Owns the `Parser` struct
/// - Exposes the `parse_expression(text)` entry point
pub mod parser;

/// Expression-level parsing:
/// - or → and → not → comparison → sum → term → unary → power → postfix → primary
/// - lists, tuples, dicts, sets, indexing, calls, method calls
pub mod expressions;

/// Shared parser helpers:
/// - token matching
/// - lookahead checks
/// - symbol consumption
pub mod helpers;

/// `is greater than` → `>` and friends.
pub mod natural;

/// Top-level comma/colon splitting over raw text.
pub mod text;

/// Re-export the public parse entry point so callers can use:
/// `crate::parser::parse_expression(...)`
pub use parser::parse_expression;
