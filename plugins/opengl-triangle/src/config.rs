//! Static configuration of the plugin.

use xplm_core::{DrawPhase, PluginInfo, WindowDecoration, WindowGeometry, WindowLayer};
use xplm_glium::geometry::TrianglePositions;

/// Everything the plugin registers with the host, in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    pub info: PluginInfo,
    pub menu: MenuConfig,
    pub dataref: DatarefConfig,
    pub draw: DrawConfig,
    pub triangle: TriangleConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Entry in the host's plugins menu, and title of the submenu.
    pub title: String,
    pub toggle_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatarefConfig {
    pub name: String,
    /// Ask the DataRefEditor plugin, when loaded, to list the accessor.
    pub announce_to_editor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawConfig {
    pub phase: DrawPhase,
    pub before: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleConfig {
    /// Normalized device coordinates.
    pub positions: TrianglePositions,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub geometry: WindowGeometry,
    pub decoration: WindowDecoration,
    pub layer: WindowLayer,
    pub visible: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            info: PluginInfo {
                name: "OpenGL Triangle Plugin".to_string(),
                signature: "example.opengl.triangle".to_string(),
                description: "A simple plugin that draws a triangle using OpenGL.".to_string(),
            },
            menu: MenuConfig {
                title: "OpenGL Triangle".to_string(),
                toggle_label: "Toggle Triangle".to_string(),
            },
            dataref: DatarefConfig {
                name: "example/opengl_triangle/visible".to_string(),
                announce_to_editor: true,
            },
            draw: DrawConfig {
                phase: DrawPhase::Window,
                before: false,
            },
            triangle: TriangleConfig::default(),
            window: WindowConfig {
                title: "Triangle Control".to_string(),
                geometry: WindowGeometry::new(50, 600, 450, 500),
                decoration: WindowDecoration::RoundRectangle,
                layer: WindowLayer::FloatingWindows,
                visible: true,
            },
        }
    }
}

impl Default for TriangleConfig {
    fn default() -> Self {
        Self {
            positions: [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]],
            color: [1.0, 0.5, 0.2, 1.0],
        }
    }
}
