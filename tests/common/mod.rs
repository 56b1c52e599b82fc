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


#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use ezscript::{Config, EzError, Interpreter};

/// Output sink the test keeps a handle to after the interpreter takes one.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Interpreter with a fixed seed, writing into the returned buffer.
pub fn interpreter() -> (Interpreter, SharedBuf) {
    let buf = SharedBuf::default();
    let interp = Interpreter::with_config(Config::default().with_seed(7)).with_output(buf.clone());
    (interp, buf)
}

/// Runs `source` and returns everything it printed.
pub fn run(source: &str) -> String {
    let (mut interp, buf) = interpreter();
    if let Err(e) = interp.run_source(source) {
        panic!("script failed on line {:?}: {}", e.line, e.message);
    }
    buf.contents()
}

/// Runs `source`, expecting it to fail; returns the error and the output
/// produced before the failure.
pub fn run_err(source: &str) -> (EzError, String) {
    let (mut interp, buf) = interpreter();
    match interp.run_source(source) {
        Ok(()) => panic!("script unexpectedly succeeded:\n{}", buf.contents()),
        Err(e) => (e, buf.contents()),
    }
}
