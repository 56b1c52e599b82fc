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

use common::SharedBuf;
use ezscript::prototypes::window::Shape;
use ezscript::{Config, ErrorKind, HeadlessSurface, Interpreter};

fn windowed() -> (Interpreter, HeadlessSurface, SharedBuf) {
    let probe = HeadlessSurface::new();
    let buf = SharedBuf::default();
    let interp = Interpreter::with_config(Config::default())
        .with_output(buf.clone())
        .with_surface(probe.clone());
    (interp, probe, buf)
}

#[test]
fn drawing_requires_an_open_window() {
    let (mut interp, probe, buf) = windowed();
    let src = "\
print(drawCircle(10, 10, 5))
createWindow(320, 200, \"Demo\")
print(drawCircle(10, 10, 5, \"red\"))
print(drawLine(0, 0, 5, 5))
print(setWindowSize(640, 480), setBackground(\"navy\"))
";
    interp.run_source(src).unwrap();

    assert_eq!(buf.contents(), "None\n1\n2\n640x480 navy\n");
    assert_eq!(probe.title().as_deref(), Some("Demo"));
    assert_eq!(probe.size(), (640.0, 480.0));
    assert_eq!(probe.background(), "navy");
    assert_eq!(
        probe.shapes()[0],
        Shape::Circle {
            x: 10.0,
            y: 10.0,
            radius: 5.0,
            color: "red".into(),
            fill: None,
        }
    );
}

#[test]
fn key_events_reach_their_callbacks() {
    let (mut interp, probe, buf) = windowed();
    probe.press("space");
    probe.press("q");
    probe.release("space");

    let src = "\
function jump():
    print(\"jump\", keyStates[\"space\"])
function land():
    print(\"land\", keyStates[\"space\"])
createWindow(100, 100, \"Keys\")
onKeyDown(\"space\", jump)
onKeyUp(\"space\", land)
updateWindow()
print(keyStates)
";
    interp.run_source(src).unwrap();

    assert_eq!(
        buf.contents(),
        "jump True\nland False\n{'space': False}\n"
    );
}

#[test]
fn show_window_runs_until_the_window_closes() {
    let (mut interp, probe, buf) = windowed();
    probe.press("a");

    let src = "\
function hit():
    print(\"hit\")
createWindow(100, 100, \"Loop\")
onKeyDown(\"a\", hit)
print(showWindow())
print(drawText(1, 1, \"gone\"))
";
    interp.run_source(src).unwrap();

    assert_eq!(buf.contents(), "hit\nWindow shown\nNone\n");
    assert!(!probe.is_open());
}

#[test]
fn callbacks_must_be_callable() {
    let (mut interp, _, _) = windowed();
    let err = interp
        .run_source("createWindow(100, 100, \"x\")\nonKeyDown(\"a\", 5)\n")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
    assert_eq!(err.line, Some(2));
}

#[test]
fn create_window_checks_its_arguments() {
    let (mut interp, _, _) = windowed();
    let err = interp.run_source("createWindow(100, 100)\n").unwrap_err();
    assert_eq!(
        err.message,
        "createWindow(width, height, title, resizable?, alwaysOnTop?, canMaximize?) expects 3–6 arguments"
    );
}
