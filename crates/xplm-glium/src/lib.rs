//! Utilities for drawing with OpenGL from inside X-Plane plugin callbacks.
//!
//! Create an [`XplmGlium`] once, while the host's context is current (e.g.
//! during plugin start), to load GL entry points and learn which shader
//! dialect the context accepts. Then use [`program::ShaderProgram`] and
//! [`geometry::TriangleGeometry`] from draw callbacks, bracketed by
//! [`validate_gl::SavedGlState`].
//!
//! ### Warning
//!
//! Nothing here owns a context. Every call must happen on the simulator's
//! main thread while its context is current.

use std::{fmt::Formatter, rc::Rc};

use anyhow::{anyhow, Result};
use glium::{backend::Context, CapabilitiesSource};
use std::fmt::Debug;

mod gl_backend;
pub mod geometry;
pub mod glsl;
pub mod program;
pub mod validate_gl;

pub use gl_backend::{load_gl, proc_address};
pub use glsl::GlslVersion;

/// A glium context over the host's OpenGL context, used to probe what the
/// context supports.
pub struct XplmGlium {
    pub ctx: Rc<Context>,
    dialect: Option<GlslVersion>,
}

impl Debug for XplmGlium {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XplmGlium")
            .field("dialect", &self.dialect)
            .finish()
    }
}

impl XplmGlium {
    /// Wrap the current host context. `screen` is the host's screen size and
    /// only serves as the default framebuffer dimensions.
    pub fn new(screen: (u32, u32)) -> Result<Self> {
        let backend = Rc::new(gl_backend::HostGlBackend::new(screen));

        if !validate_gl::is_context_current() {
            return Err(anyhow!("no OpenGL context is current"));
        }

        tracing::debug!(?backend, "wrapping host context");

        let ctx = unsafe {
            Context::new(backend, false, glium::debug::DebugCallbackBehavior::Ignore)
                .map_err(|err| anyhow!("incompatible OpenGL context: {err:?}"))?
        };

        let valid_versions = &ctx.get_capabilities().supported_glsl_versions;
        tracing::debug!(?valid_versions, "supported GLSL versions");
        tracing::info!("OpenGL {}", ctx.get_opengl_version_string());

        let dialect = glsl::get_best_dialect(&*ctx);

        Ok(Self { ctx, dialect })
    }

    /// The best shader dialect the context accepts, if any.
    pub fn dialect(&self) -> Option<GlslVersion> {
        self.dialect
    }

    pub fn has_vertex_arrays(&self) -> bool {
        validate_gl::has_vertex_arrays()
    }
}
