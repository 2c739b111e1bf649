//! Dear ImGui rendered into the host's GL context.
//!
//! The host gives no platform layer, so this module feeds ImGui the display
//! size, frame time and mouse events itself. Host coordinates have y pointing
//! up; ImGui's point down, so every position is flipped against the screen
//! height.

use std::time::Instant;

use anyhow::{anyhow, Result};
use dear_imgui_glow::GlowRenderer;
use dear_imgui_rs::{Condition, Context, MouseButton, WindowFlags};
use tracing::debug;
use xplm_core::{MouseStatus, WindowGeometry};

pub struct ImguiOverlay {
    imgui: Context,
    renderer: GlowRenderer,
    last_frame: Instant,
    screen: (i32, i32),
}

impl ImguiOverlay {
    /// The host's GL context must be current.
    pub fn new(screen: (i32, i32)) -> Result<Self> {
        let mut imgui = Context::create().map_err(|err| anyhow!("imgui context: {err}"))?;
        imgui
            .set_ini_filename(None::<String>)
            .map_err(|err| anyhow!("imgui ini: {err}"))?;

        xplm_glium::load_gl();
        let gl = unsafe { glow::Context::from_loader_function(xplm_glium::proc_address) };
        let renderer =
            GlowRenderer::new(gl, &mut imgui).map_err(|err| anyhow!("imgui renderer: {err}"))?;
        debug!(?screen, "imgui overlay ready");

        Ok(Self {
            imgui,
            renderer,
            last_frame: Instant::now(),
            screen,
        })
    }

    fn to_imgui(&self, x: i32, y: i32) -> [f32; 2] {
        [x as f32, (self.screen.1 - y) as f32]
    }

    pub fn mouse_moved(&mut self, x: i32, y: i32) {
        let pos = self.to_imgui(x, y);
        self.imgui.io_mut().add_mouse_pos_event(pos);
    }

    pub fn mouse_button(&mut self, x: i32, y: i32, status: MouseStatus) {
        self.mouse_moved(x, y);
        match status {
            MouseStatus::Down => self.imgui.io_mut().add_mouse_button_event(MouseButton::Left, true),
            MouseStatus::Up => self.imgui.io_mut().add_mouse_button_event(MouseButton::Left, false),
            MouseStatus::Drag => {}
        }
    }

    /// `axis` 0 is vertical, 1 horizontal, as the host reports them.
    pub fn mouse_wheel(&mut self, axis: i32, clicks: i32) {
        let wheel = if axis == 0 {
            [0.0, clicks as f32]
        } else {
            [clicks as f32, 0.0]
        };
        self.imgui.io_mut().add_mouse_wheel_event(wheel);
    }

    /// Render the control panel over `geometry`. Returns whether the user
    /// flipped `visible` this frame.
    pub fn frame(
        &mut self,
        screen: (i32, i32),
        geometry: WindowGeometry,
        title: &str,
        visible: &mut bool,
    ) -> Result<bool> {
        self.screen = screen;
        let now = Instant::now();
        let io = self.imgui.io_mut();
        io.set_display_size([screen.0 as f32, screen.1 as f32]);
        io.set_delta_time((now - self.last_frame).as_secs_f32().max(f32::EPSILON));
        self.last_frame = now;

        let position = self.to_imgui(geometry.left, geometry.top);
        let size = [geometry.width() as f32, geometry.height() as f32];

        let ui = self.imgui.frame();
        let changed = ui
            .window(title)
            .position(position, Condition::Always)
            .size(size, Condition::Always)
            .flags(
                WindowFlags::NO_TITLE_BAR
                    | WindowFlags::NO_RESIZE
                    | WindowFlags::NO_MOVE
                    | WindowFlags::NO_COLLAPSE,
            )
            .build(|| {
                ui.text("This is a simple ImGui window in an X-Plane plugin.");
                ui.checkbox("Show triangle", visible)
            })
            .unwrap_or(false);

        let draw_data = self.imgui.render();
        self.renderer
            .new_frame()
            .map_err(|err| anyhow!("imgui frame: {err}"))?;
        self.renderer
            .render(draw_data)
            .map_err(|err| anyhow!("imgui render: {err}"))?;

        Ok(changed)
    }

    /// Free the renderer's GL objects. The host's context must be current.
    pub fn destroy(&mut self) {
        if let Some(gl) = self.renderer.gl_context().cloned() {
            self.renderer.destroy(&gl);
        }
        debug!("imgui overlay destroyed");
    }
}
