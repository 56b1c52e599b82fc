/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Window & Drawing Collaborator
 * ==========================================================================
 *
 * The drawing built-ins talk to a `Surface`: anything that can open one
 * window, keep a display list, and report key transitions. The crate ships
 * `HeadlessSurface`, which records everything in memory and replays key
 * events injected by the host (or by tests).
 *
 *   createWindow  setWindowTitle  setWindowSize  setBackground
 *   drawCircle  drawRectangle  drawLine  drawText  loadImage
 *   clearWindow  updateWindow  showWindow  closeWindow
 *   setWindowIcon  removeWindowIcon  onKeyDown  onKeyUp
 *
 * Every built-in validates its arguments first. Without an open window the
 * drawing calls do nothing and return no value.
 *
 * Key handling:
 *   - `onKeyDown(key, fn)` / `onKeyUp(key, fn)` bind a zero-argument
 *     callback to a key transition
 *   - `updateWindow()` delivers pending events, `showWindow()` delivers
 *     events until the surface closes
 *   - each delivered event for a bound key updates `keyStates[key]` and
 *     then runs the callback
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

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::debug;

use crate::error::EzError;
use crate::globals::Builtin;
use crate::interpreter::display::value_to_string;
use crate::interpreter::{Args, Interpreter};
use crate::value::{Dict, Value};

/// Window properties passed to [`Surface::open`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub resizable: bool,
    pub always_on_top: bool,
    pub can_maximize: bool,
}

/// One display-list entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
        fill: Option<String>,
    },
    Rectangle {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        fill: Option<String>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: String,
        font_size: f64,
    },
    Image {
        path: String,
        x: f64,
        y: f64,
        width: Option<f64>,
        height: Option<f64>,
    },
}

/// A key transition reported by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub pressed: bool,
}

/// Backend for the window built-ins.
///
/// Fallible operations return the backend's cause as text; the built-in
/// wraps it into the script-facing message.
pub trait Surface {
    fn open(&mut self, spec: &WindowSpec);
    fn is_open(&self) -> bool;
    fn set_title(&mut self, title: &str);
    fn set_size(&mut self, width: f64, height: f64);
    fn set_background(&mut self, color: &str);

    /// Adds a shape and returns its object id.
    fn draw(&mut self, shape: Shape) -> Result<i64, String>;

    fn clear(&mut self);
    fn set_icon(&mut self, path: Option<&str>) -> Result<(), String>;
    fn close(&mut self);

    /// Next key transition. With `blocking`, waits until an event arrives
    /// and returns `None` only once the window has closed.
    fn next_event(&mut self, blocking: bool) -> Option<KeyEvent>;
}

#[derive(Debug, Default)]
struct HeadlessState {
    spec: Option<WindowSpec>,
    open: bool,
    size: (f64, f64),
    background: String,
    icon: Option<String>,
    shapes: Vec<(i64, Shape)>,
    next_id: i64,
    events: VecDeque<KeyEvent>,
}

/// In-memory surface.
///
/// Clones share state, so a host can keep one handle for injecting key
/// events and inspecting the display list while the interpreter owns
/// another. A blocking wait on an empty event queue closes the window.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a key press.
    pub fn press(&self, key: &str) {
        self.push(key, true);
    }

    /// Queues a key release.
    pub fn release(&self, key: &str) {
        self.push(key, false);
    }

    fn push(&self, key: &str, pressed: bool) {
        self.state.borrow_mut().events.push_back(KeyEvent {
            key: key.to_string(),
            pressed,
        });
    }

    pub fn shapes(&self) -> Vec<Shape> {
        self.state.borrow().shapes.iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn title(&self) -> Option<String> {
        self.state.borrow().spec.as_ref().map(|s| s.title.clone())
    }

    pub fn spec(&self) -> Option<WindowSpec> {
        self.state.borrow().spec.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    pub fn background(&self) -> String {
        self.state.borrow().background.clone()
    }

    pub fn icon(&self) -> Option<String> {
        self.state.borrow().icon.clone()
    }

    pub fn size(&self) -> (f64, f64) {
        self.state.borrow().size
    }
}

impl Surface for HeadlessSurface {
    fn open(&mut self, spec: &WindowSpec) {
        let mut state = self.state.borrow_mut();
        state.spec = Some(spec.clone());
        state.open = true;
        state.size = (spec.width, spec.height);
        state.background = "white".to_string();
        state.icon = None;
        state.shapes.clear();
    }

    fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    fn set_title(&mut self, title: &str) {
        if let Some(spec) = self.state.borrow_mut().spec.as_mut() {
            spec.title = title.to_string();
        }
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.state.borrow_mut().size = (width, height);
    }

    fn set_background(&mut self, color: &str) {
        self.state.borrow_mut().background = color.to_string();
    }

    fn draw(&mut self, shape: Shape) -> Result<i64, String> {
        if let Shape::Image { path, .. } = &shape {
            std::fs::metadata(path).map_err(|e| e.to_string())?;
        }

        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.shapes.push((id, shape));
        Ok(id)
    }

    fn clear(&mut self) {
        self.state.borrow_mut().shapes.clear();
    }

    fn set_icon(&mut self, path: Option<&str>) -> Result<(), String> {
        if let Some(path) = path {
            std::fs::metadata(path).map_err(|e| e.to_string())?;
        }
        self.state.borrow_mut().icon = path.map(str::to_string);
        Ok(())
    }

    fn close(&mut self) {
        self.state.borrow_mut().open = false;
    }

    fn next_event(&mut self, blocking: bool) -> Option<KeyEvent> {
        let mut state = self.state.borrow_mut();
        if !state.open {
            return None;
        }
        let event = state.events.pop_front();
        if event.is_none() && blocking {
            state.open = false;
        }
        event
    }
}

/// Window state owned by one interpreter.
pub struct Window {
    surface: Box<dyn Surface>,
    bindings: HashMap<(String, bool), Value>,
    key_states: Dict,
}

impl Window {
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self {
            surface,
            bindings: HashMap::new(),
            key_states: Dict::new(),
        }
    }

    /// Forgets bindings and key states, closing any window left open.
    pub fn reset(&mut self) {
        if self.surface.is_open() {
            self.surface.close();
        }
        self.bindings.clear();
        self.key_states.clear();
    }

    /// Copy of the current key states; scripts cannot write through it.
    pub fn key_states(&self) -> Value {
        Value::dict(self.key_states.clone())
    }

    fn is_open(&self) -> bool {
        self.surface.is_open()
    }
}

/// Dispatches one window built-in.
pub fn call(interp: &mut Interpreter, builtin: Builtin, args: Args) -> Result<Value, EzError> {
    let name = builtin.name();
    args.no_named(name)?;
    let a = &args.positional;

    match builtin {
        Builtin::CreateWindow => {
            expect_count(a, 3, 6, "createWindow(width, height, title, resizable?, alwaysOnTop?, canMaximize?) expects 3–6 arguments")?;
            let (Some(width), Some(height)) = (num(&a[0]), num(&a[1])) else {
                return Err(invalid("createWindow: width and height must be numbers"));
            };
            let title = text(&a[2]).ok_or_else(|| invalid("createWindow: title must be a string"))?;
            let flag = |i: usize, what: &str| match a.get(i) {
                None => Ok(false),
                Some(Value::Bool(b)) => Ok(*b),
                Some(_) => Err(invalid(&format!("createWindow: {} must be true or false", what))),
            };
            let spec = WindowSpec {
                width,
                height,
                title,
                resizable: flag(3, "resizable")?,
                always_on_top: flag(4, "alwaysOnTop")?,
                can_maximize: flag(5, "canMaximize")?,
            };
            debug!(?spec, "create window");
            interp.window.surface.open(&spec);
            Ok(Value::None)
        }

        Builtin::SetWindowTitle => {
            expect_count(a, 1, 1, "setWindowTitle(title) expects 1 argument")?;
            let title = text(&a[0]).ok_or_else(|| invalid("setWindowTitle: title must be a string"))?;
            if interp.window.is_open() {
                interp.window.surface.set_title(&title);
            }
            Ok(Value::Str(title))
        }

        Builtin::SetWindowSize => {
            expect_count(a, 2, 2, "setWindowSize(width, height) expects 2 arguments")?;
            let (Some(width), Some(height)) = (num(&a[0]), num(&a[1])) else {
                return Err(invalid("setWindowSize: width and height must be numbers"));
            };
            if interp.window.is_open() {
                interp.window.surface.set_size(width, height);
            }
            Ok(Value::Str(format!(
                "{}x{}",
                value_to_string(&a[0]),
                value_to_string(&a[1])
            )))
        }

        Builtin::SetBackground => {
            expect_count(a, 1, 1, "setBackground(color) expects 1 argument")?;
            let color = text(&a[0]).ok_or_else(|| invalid("setBackground: color must be a string"))?;
            if interp.window.is_open() {
                interp.window.surface.set_background(&color);
            }
            Ok(Value::Str(color))
        }

        // ---------------------------------------------------------------------
        // Drawing
        // ---------------------------------------------------------------------
        Builtin::DrawCircle => {
            expect_count(a, 3, 5, "drawCircle(x, y, radius, color?, fill?) expects 3–5 arguments")?;
            let [Some(x), Some(y), Some(radius)] = [num(&a[0]), num(&a[1]), num(&a[2])] else {
                return Err(invalid("drawCircle: x, y, radius must be numbers"));
            };
            let color = color_at(a, 3, "drawCircle: color must be a string")?;
            let fill = optional_text(a.get(4), "drawCircle: fill must be a string or None")?;
            draw(interp, Shape::Circle { x, y, radius, color, fill })
        }

        Builtin::DrawRectangle => {
            expect_count(a, 4, 6, "drawRectangle(x1, y1, x2, y2, color?, fill?) expects 4–6 arguments")?;
            let [Some(x1), Some(y1), Some(x2), Some(y2)] = [num(&a[0]), num(&a[1]), num(&a[2]), num(&a[3])] else {
                return Err(invalid("drawRectangle: x1, y1, x2, y2 must be numbers"));
            };
            let color = color_at(a, 4, "drawRectangle: color must be a string")?;
            let fill = optional_text(a.get(5), "drawRectangle: fill must be a string or None")?;
            draw(interp, Shape::Rectangle { x1, y1, x2, y2, color, fill })
        }

        Builtin::DrawLine => {
            expect_count(a, 4, 6, "drawLine(x1, y1, x2, y2, color?, width?) expects 4–6 arguments")?;
            let [Some(x1), Some(y1), Some(x2), Some(y2)] = [num(&a[0]), num(&a[1]), num(&a[2]), num(&a[3])] else {
                return Err(invalid("drawLine: x1, y1, x2, y2 must be numbers"));
            };
            let color = color_at(a, 4, "drawLine: color must be a string")?;
            let width = match a.get(5) {
                None => 1.0,
                Some(v) => num(v).ok_or_else(|| invalid("drawLine: width must be a number"))?,
            };
            draw(interp, Shape::Line { x1, y1, x2, y2, color, width })
        }

        Builtin::DrawText => {
            expect_count(a, 3, 5, "drawText(x, y, text, color?, fontSize?) expects 3–5 arguments")?;
            let (Some(x), Some(y)) = (num(&a[0]), num(&a[1])) else {
                return Err(invalid("drawText: x and y must be numbers"));
            };
            let content = text(&a[2]).ok_or_else(|| invalid("drawText: text must be a string"))?;
            let color = color_at(a, 3, "drawText: color must be a string")?;
            let font_size = match a.get(4) {
                None => 12.0,
                Some(v) => num(v).ok_or_else(|| invalid("drawText: fontSize must be a number"))?,
            };
            draw(interp, Shape::Text { x, y, text: content, color, font_size })
        }

        Builtin::LoadImage => {
            expect_count(a, 3, 5, "loadImage(path, x, y, width?, height?) expects 3–5 arguments")?;
            let path = text(&a[0]).ok_or_else(|| invalid("loadImage: path must be a string"))?;
            let (Some(x), Some(y)) = (num(&a[1]), num(&a[2])) else {
                return Err(invalid("loadImage: x and y must be numbers"));
            };
            let width = optional_num(a.get(3), "loadImage: width must be a number or None")?;
            let height = optional_num(a.get(4), "loadImage: height must be a number or None")?;

            if !interp.window.is_open() {
                return Ok(Value::None);
            }
            interp
                .window
                .surface
                .draw(Shape::Image { path, x, y, width, height })
                .map(Value::Int)
                .map_err(|e| invalid(&format!("Cannot load image: {}", e)))
        }

        // ---------------------------------------------------------------------
        // Window lifecycle
        // ---------------------------------------------------------------------
        Builtin::ClearWindow => {
            expect_count(a, 0, 0, "clearWindow() expects 0 arguments")?;
            if interp.window.is_open() {
                interp.window.surface.clear();
            }
            Ok(Value::str("Cleared"))
        }

        Builtin::UpdateWindow => {
            expect_count(a, 0, 0, "updateWindow() expects 0 arguments")?;
            pump(interp, false)?;
            Ok(Value::str("Updated"))
        }

        Builtin::ShowWindow => {
            expect_count(a, 0, 0, "showWindow() expects 0 arguments")?;
            pump(interp, true)?;
            Ok(Value::str("Window shown"))
        }

        Builtin::CloseWindow => {
            expect_count(a, 0, 0, "closeWindow() expects 0 arguments")?;
            if interp.window.is_open() {
                interp.window.surface.close();
            }
            Ok(Value::str("Window closed"))
        }

        Builtin::SetWindowIcon => {
            expect_count(a, 1, 1, "setWindowIcon(path) expects 1 argument")?;
            let path = text(&a[0]).ok_or_else(|| invalid("setWindowIcon: path must be a string"))?;
            if !interp.window.is_open() {
                return Ok(Value::None);
            }
            interp
                .window
                .surface
                .set_icon(Some(&path))
                .map_err(|e| invalid(&format!("Cannot set icon: {}", e)))?;
            Ok(Value::str("Icon set"))
        }

        Builtin::RemoveWindowIcon => {
            expect_count(a, 0, 0, "removeWindowIcon() expects 0 arguments")?;
            if !interp.window.is_open() {
                return Ok(Value::None);
            }
            Ok(match interp.window.surface.set_icon(None) {
                Ok(()) => Value::str("Icon removed"),
                Err(_) => Value::None,
            })
        }

        // ---------------------------------------------------------------------
        // Keyboard
        // ---------------------------------------------------------------------
        Builtin::OnKeyDown | Builtin::OnKeyUp => {
            let pressed = builtin == Builtin::OnKeyDown;
            expect_count(a, 2, 2, &format!("{}(key, callback) expects 2 arguments", name))?;
            let key = text(&a[0]).ok_or_else(|| invalid(&format!("{}: key must be a string", name)))?;
            if !a[1].is_callable() {
                return Err(invalid(&format!("{}: callback must be a function", name)));
            }
            if interp.window.is_open() {
                debug!(key = %key, pressed, "bind key");
                interp.window.bindings.insert((key, pressed), a[1].clone());
            }
            Ok(Value::str("Callback registered"))
        }

        _ => Err(EzError::unsupported(format!("{}()", name))),
    }
}

fn draw(interp: &mut Interpreter, shape: Shape) -> Result<Value, EzError> {
    if !interp.window.is_open() {
        return Ok(Value::None);
    }
    interp
        .window
        .surface
        .draw(shape)
        .map(Value::Int)
        .map_err(|e| invalid(&format!("Cannot draw: {}", e)))
}

/// Delivers key events to their bound callbacks.
fn pump(interp: &mut Interpreter, blocking: bool) -> Result<(), EzError> {
    while interp.window.is_open() {
        let Some(event) = interp.window.surface.next_event(blocking) else {
            break;
        };

        let Some(callback) = interp
            .window
            .bindings
            .get(&(event.key.clone(), event.pressed))
            .cloned()
        else {
            continue;
        };

        debug!(key = %event.key, pressed = event.pressed, "key event");
        interp
            .window
            .key_states
            .insert(Value::Str(event.key), Value::Bool(event.pressed))?;
        interp.call_value(&callback, Args::default())?;
    }
    Ok(())
}

fn expect_count(args: &[Value], min: usize, max: usize, message: &str) -> Result<(), EzError> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(invalid(message))
    }
}

fn invalid(message: &str) -> EzError {
    EzError::argument(message)
}

fn num(value: &Value) -> Option<f64> {
    value.as_num().map(|n| n.as_f64())
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn color_at(args: &[Value], i: usize, message: &str) -> Result<String, EzError> {
    match args.get(i) {
        None => Ok("black".to_string()),
        Some(v) => text(v).ok_or_else(|| invalid(message)),
    }
}

fn optional_text(value: Option<&Value>, message: &str) -> Result<Option<String>, EzError> {
    match value {
        None | Some(Value::None) => Ok(None),
        Some(v) => text(v).map(Some).ok_or_else(|| invalid(message)),
    }
}

fn optional_num(value: Option<&Value>, message: &str) -> Result<Option<f64>, EzError> {
    match value {
        None | Some(Value::None) => Ok(None),
        Some(v) => num(v).map(Some).ok_or_else(|| invalid(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> WindowSpec {
        WindowSpec {
            width: 200.0,
            height: 100.0,
            title: "demo".into(),
            resizable: false,
            always_on_top: false,
            can_maximize: false,
        }
    }

    #[test]
    fn headless_surface_records_shapes() {
        let probe = HeadlessSurface::new();
        let mut surface = probe.clone();
        surface.open(&spec());

        let id = surface
            .draw(Shape::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 5.0,
                y2: 5.0,
                color: "red".into(),
                width: 1.0,
            })
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(probe.shapes().len(), 1);

        surface.clear();
        assert!(probe.shapes().is_empty());
    }

    #[test]
    fn blocking_wait_on_empty_queue_closes() {
        let probe = HeadlessSurface::new();
        let mut surface = probe.clone();
        surface.open(&spec());
        probe.press("a");

        assert_eq!(
            surface.next_event(true),
            Some(KeyEvent {
                key: "a".into(),
                pressed: true
            })
        );
        assert_eq!(surface.next_event(true), None);
        assert!(!probe.is_open());
    }

    fn probe_is_empty(surface: &HeadlessSurface) -> bool {
        surface.shapes().is_empty()
    }

    #[test]
    fn missing_image_is_reported() {
        let mut surface = HeadlessSurface::new();
        surface.open(&spec());
        let result = surface.draw(Shape::Image {
            path: "/definitely/not/here.png".into(),
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
        });
        assert!(result.is_err());
        assert!(probe_is_empty(&surface));
    }
}
