//! The host window showing the plugin's status.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "imgui-overlay")]
use tracing::error;
use tracing::warn;
use xplm_core::{Host, WindowHandler, WindowId};
#[cfg(feature = "imgui-overlay")]
use xplm_core::{CursorStatus, MouseStatus};

use crate::context::PluginContext;
#[cfg(feature = "imgui-overlay")]
use crate::imgui_overlay::ImguiOverlay;
use crate::renderer::TriangleRenderer;

pub const GREETING: &str = "This is a simple overlay window in an X-Plane plugin.";

const TEXT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const MARGIN: i32 = 10;
const LINE_HEIGHT: i32 = 16;

/// Text drawn when no ImGui panel is available.
pub fn status_lines(visible: bool) -> [&'static str; 2] {
    let status = if visible {
        "Triangle: visible"
    } else {
        "Triangle: hidden"
    };
    [GREETING, status]
}

#[cfg(feature = "imgui-overlay")]
enum Imgui {
    Pending,
    Ready(ImguiOverlay),
    Unavailable,
}

/// Handles the events of the plugin's window.
///
/// Without the `imgui-overlay` feature every input handler keeps the
/// declining default and the window only draws status text.
pub struct OverlayWindow<H: Host, R: TriangleRenderer> {
    host: H,
    context: Rc<RefCell<PluginContext<H, R>>>,
    title: String,
    #[cfg(feature = "imgui-overlay")]
    imgui: Imgui,
}

impl<H: Host, R: TriangleRenderer> OverlayWindow<H, R> {
    pub fn new(host: H, context: Rc<RefCell<PluginContext<H, R>>>, title: impl Into<String>) -> Self {
        Self {
            host,
            context,
            title: title.into(),
            #[cfg(feature = "imgui-overlay")]
            imgui: Imgui::Pending,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn draw_status(&self, window: WindowId) {
        let geometry = self.host.window_geometry(window);
        let visible = match self.context.try_borrow() {
            Ok(context) => context.is_visible(),
            Err(_) => return,
        };

        let x = geometry.left + MARGIN;
        let mut y = geometry.top - MARGIN - LINE_HEIGHT;
        for line in status_lines(visible) {
            if let Err(err) = self.host.draw_string(TEXT_COLOR, x, y, line) {
                warn!("status text: {err:#}");
                return;
            }
            y -= LINE_HEIGHT;
        }
    }

    /// Free GPU resources. The host's GL context must be current.
    pub fn release(&mut self) {
        #[cfg(feature = "imgui-overlay")]
        self.drop_imgui(Imgui::Pending);
    }
}

#[cfg(feature = "imgui-overlay")]
impl<H: Host, R: TriangleRenderer> OverlayWindow<H, R> {
    fn imgui(&mut self) -> Option<&mut ImguiOverlay> {
        if let Imgui::Pending = self.imgui {
            self.imgui = match ImguiOverlay::new(self.host.screen_size()) {
                Ok(imgui) => Imgui::Ready(imgui),
                Err(err) => {
                    error!("imgui overlay disabled: {err:#}");
                    Imgui::Unavailable
                }
            };
        }
        match &mut self.imgui {
            Imgui::Ready(imgui) => Some(imgui),
            _ => None,
        }
    }

    fn drop_imgui(&mut self, next: Imgui) {
        if let Imgui::Ready(mut imgui) = std::mem::replace(&mut self.imgui, next) {
            imgui.destroy();
        }
    }

    /// Returns `false` when the caller should fall back to plain text.
    fn draw_imgui(&mut self, window: WindowId) -> bool {
        let geometry = self.host.window_geometry(window);
        let screen = self.host.screen_size();
        let Ok(mut visible) = self.context.try_borrow().map(|context| context.is_visible()) else {
            return true;
        };
        let title = self.title.clone();
        let Some(imgui) = self.imgui() else {
            return false;
        };

        match imgui.frame(screen, geometry, &title, &mut visible) {
            Ok(true) => {
                if let Ok(mut context) = self.context.try_borrow_mut() {
                    context.set_visible(visible);
                }
                true
            }
            Ok(false) => true,
            Err(err) => {
                error!("imgui overlay disabled: {err:#}");
                self.drop_imgui(Imgui::Unavailable);
                false
            }
        }
    }
}

#[cfg(not(feature = "imgui-overlay"))]
impl<H: Host, R: TriangleRenderer> WindowHandler for OverlayWindow<H, R> {
    fn draw(&mut self, window: WindowId) {
        self.draw_status(window);
    }
}

#[cfg(feature = "imgui-overlay")]
impl<H: Host, R: TriangleRenderer> WindowHandler for OverlayWindow<H, R> {
    fn draw(&mut self, window: WindowId) {
        if !self.draw_imgui(window) {
            self.draw_status(window);
        }
    }

    fn mouse_click(&mut self, _window: WindowId, x: i32, y: i32, status: MouseStatus) -> bool {
        match &mut self.imgui {
            Imgui::Ready(imgui) => {
                imgui.mouse_button(x, y, status);
                true
            }
            _ => false,
        }
    }

    fn cursor(&mut self, _window: WindowId, x: i32, y: i32) -> CursorStatus {
        if let Imgui::Ready(imgui) = &mut self.imgui {
            imgui.mouse_moved(x, y);
        }
        CursorStatus::Default
    }

    fn mouse_wheel(&mut self, _window: WindowId, x: i32, y: i32, wheel: i32, clicks: i32) -> bool {
        match &mut self.imgui {
            Imgui::Ready(imgui) => {
                imgui.mouse_moved(x, y);
                imgui.mouse_wheel(wheel, clicks);
                true
            }
            _ => false,
        }
    }
}
