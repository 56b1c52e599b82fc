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


mod common;

use std::fs;
use std::io::Cursor;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use common::{interpreter, run, run_err};
use ezscript::{run_file_with, DiagnosticPrinter, ErrorKind, ScriptError};

#[test]
fn collections_and_methods() {
    let src = "\
let words be \"b,a,c\".split(\",\")
words.append(\"d\")
print(sorted(words, reverse=true))
print(\"-\".join(words).upper())
let counts be {\"x\": 1}
counts.update(y=2)
print(list(counts.keys()))
print(sum(range(5)), max([3, 9, 2]), min(4, 1))
";
    assert_eq!(
        run(src),
        "['d', 'c', 'b', 'a']\nB-A-C-D\n['x', 'y']\n10 9 1\n"
    );
}

#[test]
fn conversions_and_types() {
    let src = "\
print(int(\"42\") + 1, float(\"1.5\"), str(7) + \"!\")
print(type(3), type(\"x\"))
print(round(2.5), round(3.14159, 2))
";
    assert_eq!(run(src), "43 1.5 7!\n<class 'int'> <class 'str'>\n2 3.14\n");
}

#[test]
fn input_reads_one_line() {
    let (interp, buf) = interpreter();
    let mut interp = interp.with_input(Cursor::new("Bob\nignored\n"));

    interp
        .run_source("let name be input(\"Name? \")\nprint(\"Hi {name}\")\n")
        .unwrap();
    assert_eq!(buf.contents(), "Name? Hi Bob\n");
}

#[test]
fn input_at_end_of_stream_is_an_error() {
    let (interp, _) = interpreter();
    let mut interp = interp.with_input(Cursor::new(""));

    let err = interp.run_source("let x be input()\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Io);
}

#[test]
fn file_statements() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let path = path.to_str().unwrap();

    let src = format!(
        "\
let p be \"{path}\"
write \"hello\" to file p
append \" world\" to file p
let text be read file p
print(text)
"
    );
    assert_eq!(run(&src), "hello world\n");
    assert_eq!(fs::read_to_string(path).unwrap(), "hello world");
}

#[test]
fn reading_a_missing_file_can_be_caught() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let src = format!(
        "\
try:
    let text be read file \"{}\"
catch e:
    print(\"missing\")
",
        path.display()
    );
    assert_eq!(run(&src), "missing\n");

    let src = format!("let text be read file \"{}\"\n", path.display());
    let (err, _) = run_err(&src);
    assert_eq!(err.kind, ErrorKind::FileNotFound);
}

#[test]
fn run_file_checks_the_extension_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("script.txt");
    fs::write(&path, "print(1)\n").unwrap();

    let (mut interp, buf) = interpreter();
    let err = run_file_with(&mut interp, &path).unwrap_err();
    assert!(matches!(err, ScriptError::BadExtension { .. }));
    assert_eq!(err.to_string(), "EzScript files must end with .ez");
    assert_eq!(buf.contents(), "");
}

#[test]
fn run_file_reports_missing_scripts() {
    let dir = tempdir().unwrap();
    let (mut interp, _) = interpreter();

    let err = run_file_with(&mut interp, dir.path().join("nope.ez")).unwrap_err();
    assert!(matches!(err, ScriptError::NotFound { .. }));
}

#[test]
fn run_file_runs_scripts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hello.ez");
    fs::write(&path, "let who be \"file\"\nprint(\"hello {who}\")\n").unwrap();

    let (mut interp, buf) = interpreter();
    run_file_with(&mut interp, &path).unwrap();
    assert_eq!(buf.contents(), "hello file\n");
}

#[test]
fn runtime_failures_render_a_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.ez");
    fs::write(&path, "let x be 1\n  # note\nlet y be x / 0\n").unwrap();

    let (mut interp, _) = interpreter();
    let err = run_file_with(&mut interp, &path).unwrap_err();
    let ScriptError::Runtime { error, script } = err else {
        panic!("expected a runtime error");
    };
    assert_eq!(error.kind, ErrorKind::DivisionByZero);

    let report = DiagnosticPrinter::new(script).render(&error);
    assert!(report.contains("EzScript Error on line 3:"));
    assert!(report.contains("  let y be x / 0\n  ~~~~~~~~~~~~~~\n"));
    assert!(report.contains("\nCannot divide by zero\n"));
}
