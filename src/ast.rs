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

/// Expression tree produced by the expression parser.
pub mod expr;

/// Function parameters.
pub mod param;

pub use expr::{Arg, BinaryOp, CompareOp, Expr, LogicalOp, UnaryOp};
pub use param::Param;
