//! An X-Plane plugin drawing an OpenGL triangle.
//!
//! The triangle is drawn from a window-phase draw callback. Its visibility
//! is toggled from a menu item under the plugins menu and published as the
//! writable int dataref `example/opengl_triangle/visible`. A floating window
//! shows the current state, as a Dear ImGui panel when built with the
//! `imgui-overlay` feature.
//!
//! All state lives in one [`context::PluginContext`] reached through the
//! callbacks' refcon.

pub mod config;
pub mod context;
#[cfg(feature = "imgui-overlay")]
pub mod imgui_overlay;
pub mod overlay;
pub mod plugin;
pub mod renderer;

#[cfg(test)]
mod testing;

pub use config::PluginConfig;
pub use plugin::TrianglePlugin;

#[cfg(not(test))]
xplm_core::plugin_main!(plugin::TrianglePlugin<xplm_core::XplmHost, renderer::GlTriangle>);
