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

use pretty_assertions::assert_eq;

use common::{interpreter, run, run_err};
use ezscript::{Config, ErrorKind, Interpreter, Value};

#[test]
fn default_parameters_fill_missing_arguments() {
    let src = "\
function add(a, b = 10):
    return a + b
print(add(5))
print(add(5, 1))
print(add(b=2, a=1))
";
    assert_eq!(run(src), "15\n6\n3\n");
}

#[test]
fn recursion() {
    let src = "\
function fact(n):
    if n is equal to 0 then
        return 1
    return n * fact(n - 1)
print(fact(5))
";
    assert_eq!(run(src), "120\n");
}

#[test]
fn missing_argument_is_reported() {
    let (err, _) = run_err("function greet(name):\n    print(name)\ngreet()\n");
    assert_eq!(err.kind, ErrorKind::MissingParameter);
    assert_eq!(err.message, "Missing required parameter: name");
    assert_eq!(err.line, Some(3));
}

#[test]
fn extra_arguments_are_a_type_error() {
    let (err, _) = run_err("function one(a):\n    return a\none(1, 2)\n");
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
}

#[test]
fn locals_do_not_leak_out_of_a_call() {
    let src = "\
function f(v):
    let inner be v
    return inner
print(f(3))
print(inner)
";
    let (err, out) = run_err(src);
    assert_eq!(out, "3\n");
    assert_eq!(err.kind, ErrorKind::NotDefined);
    assert_eq!(err.line, Some(5));
}

#[test]
fn several_return_values_form_a_tuple() {
    let src = "\
function pair():
    return 1, 2
let p be pair()
let a, b be pair()
print(p, a, b)
";
    assert_eq!(run(src), "(1, 2) 1 2\n");
}

#[test]
fn function_without_return_gives_none() {
    assert_eq!(run("function noop():\n    let x be 1\nprint(noop())\n"), "None\n");
}

#[test]
fn return_passes_through_try_and_loops() {
    let src = "\
function first_even(items):
    for each n in items:
        try:
            if n % 2 is 0:
                return n
        catch e:
            print(e)
    return -1
print(first_even([3, 5, 8, 10]))
print(first_even([1]))
";
    assert_eq!(run(src), "8\n-1\n");
}

#[test]
fn errors_inside_a_function_are_caught_by_the_caller() {
    let src = "\
function risky():
    return [1, 2][5]
try:
    risky()
catch e:
    print(\"caught\")
";
    assert_eq!(run(src), "caught\n");
}

#[test]
fn failed_call_restores_the_callers_variables() {
    let src = "\
let x be 1
function risky():
    let x be 99
    let tmp be 5
    throw \"no\"
try:
    risky()
catch e:
    print(e)
print(x)
print(tmp)
";
    let (err, out) = run_err(src);
    assert_eq!(out, "no\n1\n");
    assert_eq!(err.kind, ErrorKind::NotDefined);
    assert_eq!(err.line, Some(11));
}

#[test]
fn user_functions_shadow_builtins() {
    let src = "\
function len(x):
    return 42
print(len([1]))
";
    assert_eq!(run(src), "42\n");
}

#[test]
fn runaway_recursion_hits_the_limit() {
    let mut interp = Interpreter::with_config(Config::default().with_max_call_depth(25))
        .with_output(std::io::sink());
    let err = interp
        .run_source("function down(n):\n    return down(n + 1)\ndown(0)\n")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecursionLimit);
}

#[test]
fn host_can_call_script_functions() {
    let (mut interp, _) = interpreter();
    interp
        .run_source("function twice(x, times=2):\n    return x * times\n")
        .unwrap();

    let v = interp.call("twice", vec![Value::Int(4)], vec![]).unwrap();
    assert_eq!(v, Value::Int(8));

    let v = interp
        .call("twice", vec![Value::str("ab")], vec![("times".into(), Value::Int(3))])
        .unwrap();
    assert_eq!(v, Value::str("ababab"));
}

#[test]
fn runs_are_independent() {
    let (mut interp, buf) = interpreter();
    let src = "\
let n be random(1, 100)
print(n)
function f():
    return 1
";
    interp.run_source(src).unwrap();
    let first = buf.contents();
    interp.run_source(src).unwrap();
    let both = buf.contents();

    assert_eq!(both, format!("{first}{first}"));

    interp.run_source("print(f())").unwrap_err();
}
