/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * File:     main.rs
 * Purpose:  Command-line entry point: `ezscript SCRIPT.ez`.
 *
 * Exit status is 0 on success and 1 for bad arguments, unreadable files
 * and uncaught runtime errors. Script output goes to stdout; reports and
 * logs go to stderr.
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

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ezscript::config::{DEFAULT_LOG_FILTER, LOG_VAR};
use ezscript::{DiagnosticPrinter, ScriptError};

/// Deep recursion in scripts recurses natively; give the interpreter room.
const INTERPRETER_STACK: usize = 256 * 1024 * 1024;

#[derive(Debug, Parser)]
#[command(name = "ezscript", about = "Runs an EzScript (.ez) file.", version)]
struct Cli {
    /// Path to the script to run.
    script: PathBuf,
}

fn main() -> ExitCode {
    // Wrong argument count: fail quietly.
    let Ok(cli) = Cli::try_parse() else {
        return ExitCode::FAILURE;
    };

    install_tracing();

    match run(cli.script) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("\nUnexpected Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(script: PathBuf) -> Result<ExitCode> {
    let worker = thread::Builder::new()
        .name("ezscript".into())
        .stack_size(INTERPRETER_STACK)
        .spawn(move || ezscript::run_file(&script))
        .context("failed to start the interpreter thread")?;

    let outcome = worker
        .join()
        .map_err(|_| anyhow!("the interpreter thread panicked"))?;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(ScriptError::Runtime { error, script }) => {
            DiagnosticPrinter::new(script).print(&error);
            Ok(ExitCode::FAILURE)
        }
        Err(other) => {
            eprintln!("{}", other);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn install_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
