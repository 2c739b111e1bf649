//! Plugin state shared by every host callback.
//!
//! One [`PluginContext`] exists per plugin instance. The host reaches it
//! through the refcon registered with the draw callback, the menu and the
//! data accessor. The visibility flag has two writers (menu clicks and
//! accessor writes) that both go through [`PluginContext::set_visible`], so
//! the menu check mark always matches what the draw callback sees.

use std::ffi::c_void;

use tracing::{debug, info};
use xplm_core::{DrawHandler, DrawPhase, GraphicsState, Host, IntAccessor, MenuHandler, MenuItem};

use crate::renderer::TriangleRenderer;

pub struct PluginContext<H: Host, R: TriangleRenderer> {
    host: H,
    renderer: R,
    visible: bool,
    toggle_item: Option<MenuItem>,
    frames_drawn: u64,
}

impl<H: Host, R: TriangleRenderer> PluginContext<H, R> {
    pub fn new(host: H, renderer: R) -> Self {
        Self {
            host,
            renderer,
            visible: true,
            toggle_item: None,
            frames_drawn: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            info!(visible, "triangle visibility changed");
        }
        self.visible = visible;
        self.sync_check_mark();
    }

    /// Invert the flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.set_visible(!self.visible);
        self.visible
    }

    /// Mirror the flag on `item` from now on.
    pub fn attach_toggle_item(&mut self, item: MenuItem) {
        self.toggle_item = Some(item);
        self.sync_check_mark();
    }

    pub fn detach_toggle_item(&mut self) -> Option<MenuItem> {
        self.toggle_item.take()
    }

    /// Draw for one host render pass. Returns whether geometry was emitted.
    pub fn on_draw(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.host.set_graphics_state(GraphicsState::default());
        let drawn = self.renderer.draw();
        if drawn {
            self.frames_drawn += 1;
        }
        drawn
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn release(&mut self) {
        self.renderer.release();
        debug!(frames = self.frames_drawn, "context released");
    }

    fn sync_check_mark(&self) {
        if let Some(item) = self.toggle_item {
            self.host.check_menu_item(item, self.visible);
        }
    }
}

impl<H: Host, R: TriangleRenderer> DrawHandler for PluginContext<H, R> {
    fn draw(&mut self, _phase: Option<DrawPhase>, _before: bool) -> bool {
        self.on_draw();
        true
    }
}

impl<H: Host, R: TriangleRenderer> MenuHandler for PluginContext<H, R> {
    fn menu_item_clicked(&mut self, _item_ref: *mut c_void) {
        self.toggle();
    }
}

impl<H: Host, R: TriangleRenderer> IntAccessor for PluginContext<H, R> {
    fn read_int(&mut self) -> i32 {
        self.visible as i32
    }

    fn write_int(&mut self, value: i32) {
        self.set_visible(value != 0);
    }
}
