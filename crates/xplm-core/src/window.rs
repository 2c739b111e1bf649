//! Host-managed windows.
//!
//! The host requires a handler for every input class of a window, even the
//! ones a plugin ignores. [`WindowHandler`] provides declining defaults for
//! all of them; implementors override what they use and
//! [`WindowCallbacks::of`] composes the trampolines at registration time.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};

use crate::callbacks::with_refcon;
use crate::ffi::*;
use crate::host::WindowId;
use crate::messages::{CursorStatus, KeyFlags, MouseStatus, WindowDecoration, WindowLayer};

/// Window bounds in boxels. The host's y axis points up, so `top > bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowGeometry {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowGeometry {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.top - self.bottom
    }
}

/// Handles the events of one host window.
///
/// Every method has a default that declines the event, matching what the
/// host expects from a window that does not care about that input class.
#[allow(unused_variables)]
pub trait WindowHandler {
    fn draw(&mut self, window: WindowId) {}

    /// Return `true` to consume the click.
    fn mouse_click(&mut self, window: WindowId, x: i32, y: i32, status: MouseStatus) -> bool {
        false
    }

    fn right_click(&mut self, window: WindowId, x: i32, y: i32, status: MouseStatus) -> bool {
        false
    }

    fn cursor(&mut self, window: WindowId, x: i32, y: i32) -> CursorStatus {
        CursorStatus::Default
    }

    /// Return `true` to consume the wheel event.
    fn mouse_wheel(&mut self, window: WindowId, x: i32, y: i32, wheel: i32, clicks: i32) -> bool {
        false
    }

    fn key(&mut self, window: WindowId, key: c_char, flags: KeyFlags, virtual_key: c_char, losing_focus: bool) {}
}

/// The full set of C handlers for one window.
#[derive(Debug, Clone, Copy)]
pub struct WindowCallbacks {
    pub draw: XPLMDrawWindow_f,
    pub mouse_click: XPLMHandleMouseClick_f,
    pub right_click: XPLMHandleMouseClick_f,
    pub key: XPLMHandleKey_f,
    pub cursor: XPLMHandleCursor_f,
    pub mouse_wheel: XPLMHandleMouseWheel_f,
}

impl WindowCallbacks {
    /// Trampolines dispatching to a `RefCell<W>` passed as the refcon.
    pub fn of<W: WindowHandler>() -> Self {
        Self {
            draw: draw_window::<W>,
            mouse_click: mouse_click::<W>,
            right_click: right_click::<W>,
            key: key::<W>,
            cursor: cursor::<W>,
            mouse_wheel: mouse_wheel::<W>,
        }
    }
}

/// Everything needed to create a host window.
#[derive(Debug, Clone, Copy)]
pub struct WindowSpec {
    pub geometry: WindowGeometry,
    pub visible: bool,
    pub decoration: WindowDecoration,
    pub layer: WindowLayer,
    pub callbacks: WindowCallbacks,
    pub refcon: *mut c_void,
}

impl WindowSpec {
    pub fn to_ffi(&self) -> XPLMCreateWindow_t {
        XPLMCreateWindow_t {
            structSize: std::mem::size_of::<XPLMCreateWindow_t>() as c_int,
            left: self.geometry.left,
            top: self.geometry.top,
            right: self.geometry.right,
            bottom: self.geometry.bottom,
            visible: self.visible as c_int,
            drawWindowFunc: self.callbacks.draw,
            handleMouseClickFunc: self.callbacks.mouse_click,
            handleKeyFunc: self.callbacks.key,
            handleCursorFunc: self.callbacks.cursor,
            handleMouseWheelFunc: self.callbacks.mouse_wheel,
            refcon: self.refcon,
            decorateAsFloatingWindow: self.decoration.raw(),
            layer: self.layer.raw(),
            handleRightClickFunc: self.callbacks.right_click,
        }
    }
}

fn window_id(raw: XPLMWindowID) -> Option<WindowId> {
    WindowId::from_raw(raw)
}

unsafe extern "C" fn draw_window<W: WindowHandler>(window: XPLMWindowID, refcon: *mut c_void) {
    let Some(window) = window_id(window) else {
        return;
    };
    unsafe { with_refcon::<W, _>(refcon, |handler| handler.draw(window)) };
}

unsafe extern "C" fn mouse_click<W: WindowHandler>(
    window: XPLMWindowID,
    x: c_int,
    y: c_int,
    status: XPLMMouseStatus,
    refcon: *mut c_void,
) -> c_int {
    let (Some(window), Some(status)) = (window_id(window), MouseStatus::from_raw(status)) else {
        return 0;
    };
    let consumed =
        unsafe { with_refcon::<W, _>(refcon, |handler| handler.mouse_click(window, x, y, status)) };
    consumed.unwrap_or(false) as c_int
}

unsafe extern "C" fn right_click<W: WindowHandler>(
    window: XPLMWindowID,
    x: c_int,
    y: c_int,
    status: XPLMMouseStatus,
    refcon: *mut c_void,
) -> c_int {
    let (Some(window), Some(status)) = (window_id(window), MouseStatus::from_raw(status)) else {
        return 0;
    };
    let consumed =
        unsafe { with_refcon::<W, _>(refcon, |handler| handler.right_click(window, x, y, status)) };
    consumed.unwrap_or(false) as c_int
}

unsafe extern "C" fn cursor<W: WindowHandler>(
    window: XPLMWindowID,
    x: c_int,
    y: c_int,
    refcon: *mut c_void,
) -> XPLMCursorStatus {
    let Some(window) = window_id(window) else {
        return xplm_CursorDefault;
    };
    unsafe { with_refcon::<W, _>(refcon, |handler| handler.cursor(window, x, y)) }
        .unwrap_or_default()
        .raw()
}

unsafe extern "C" fn mouse_wheel<W: WindowHandler>(
    window: XPLMWindowID,
    x: c_int,
    y: c_int,
    wheel: c_int,
    clicks: c_int,
    refcon: *mut c_void,
) -> c_int {
    let Some(window) = window_id(window) else {
        return 0;
    };
    let consumed = unsafe {
        with_refcon::<W, _>(refcon, |handler| handler.mouse_wheel(window, x, y, wheel, clicks))
    };
    consumed.unwrap_or(false) as c_int
}

unsafe extern "C" fn key<W: WindowHandler>(
    window: XPLMWindowID,
    key: c_char,
    flags: XPLMKeyFlags,
    virtual_key: c_char,
    refcon: *mut c_void,
    losing_focus: c_int,
) {
    let Some(window) = window_id(window) else {
        return;
    };
    unsafe {
        with_refcon::<W, _>(refcon, |handler| {
            handler.key(window, key, KeyFlags(flags), virtual_key, losing_focus != 0)
        })
    };
}
