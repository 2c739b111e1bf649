//! Drawing the triangle.

use anyhow::{Context as _, Result};
use tracing::{debug, error, info};
use xplm_glium::geometry::TriangleGeometry;
use xplm_glium::program::ShaderProgram;
use xplm_glium::validate_gl::{clear_gl_errors, SavedGlState};
use xplm_glium::{GlslVersion, XplmGlium};

use crate::config::TriangleConfig;

/// Emits the triangle when asked to.
pub trait TriangleRenderer {
    /// Draw once. Returns whether geometry was emitted.
    fn draw(&mut self) -> bool;

    /// Free every GPU resource. Later draws emit nothing.
    fn release(&mut self);
}

/// Vertex and fragment sources for `dialect`, with the color baked in.
pub fn shader_sources(dialect: GlslVersion, color: [f32; 4]) -> (String, String) {
    let [r, g, b, a] = color;
    let directive = dialect.directive();
    match dialect {
        GlslVersion::Glsl330 => (
            format!(
                "{directive}\n\
                 layout (location = 0) in vec3 position;\n\
                 void main() {{\n    gl_Position = vec4(position, 1.0);\n}}\n"
            ),
            format!(
                "{directive}\n\
                 out vec4 color;\n\
                 void main() {{\n    color = vec4({r:?}, {g:?}, {b:?}, {a:?});\n}}\n"
            ),
        ),
        GlslVersion::Glsl120 => (
            format!(
                "{directive}\n\
                 attribute vec3 position;\n\
                 void main() {{\n    gl_Position = vec4(position, 1.0);\n}}\n"
            ),
            format!(
                "{directive}\n\
                 void main() {{\n    gl_FragColor = vec4({r:?}, {g:?}, {b:?}, {a:?});\n}}\n"
            ),
        ),
    }
}

struct GlResources {
    program: ShaderProgram,
    geometry: TriangleGeometry,
}

/// [`TriangleRenderer`] drawing with raw OpenGL in the host's context.
///
/// Construction never fails: when shaders or buffers cannot be created the
/// renderer logs why and draws nothing.
pub struct GlTriangle {
    resources: Option<GlResources>,
}

impl GlTriangle {
    /// Build GPU resources. The host's GL context must be current.
    pub fn new(config: &TriangleConfig, screen: (u32, u32)) -> Self {
        match Self::build(config, screen) {
            Ok(resources) => {
                info!(
                    program = resources.program.id(),
                    "triangle renderer ready"
                );
                Self {
                    resources: Some(resources),
                }
            }
            Err(err) => {
                error!("triangle renderer disabled: {err:#}");
                Self::disabled()
            }
        }
    }

    /// A renderer that never draws.
    pub fn disabled() -> Self {
        Self { resources: None }
    }

    pub fn is_ready(&self) -> bool {
        self.resources.is_some()
    }

    fn build(config: &TriangleConfig, screen: (u32, u32)) -> Result<GlResources> {
        let glium = XplmGlium::new(screen)?;
        let dialect = glium
            .dialect()
            .context("context supports neither GLSL 3.30 nor GLSL 1.20")?;
        debug!(?dialect, vao = glium.has_vertex_arrays(), "building triangle");

        let (vertex_src, fragment_src) = shader_sources(dialect, config.color);
        let program = ShaderProgram::build(&vertex_src, &fragment_src)?;
        let geometry = match TriangleGeometry::upload(&config.positions) {
            Ok(geometry) => geometry,
            Err(err) => {
                program.delete();
                return Err(err);
            }
        };

        Ok(GlResources { program, geometry })
    }
}

impl TriangleRenderer for GlTriangle {
    fn draw(&mut self) -> bool {
        let Some(resources) = &self.resources else {
            return false;
        };

        clear_gl_errors();
        unsafe {
            let saved = SavedGlState::save();
            gl::UseProgram(resources.program.id());
            resources.geometry.draw();
            saved.restore();
        }
        true
    }

    fn release(&mut self) {
        if let Some(GlResources { program, geometry }) = self.resources.take() {
            program.delete();
            geometry.delete();
            debug!("triangle renderer released");
        }
    }
}
