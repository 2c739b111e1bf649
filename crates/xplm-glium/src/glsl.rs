//! GLSL dialect detection.

use glium::CapabilitiesSource;

/// Shader dialects the plugin ships sources for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    /// `#version 330 core`, for core and modern compatibility profiles.
    Glsl330,
    /// `#version 120`, for legacy 2.1 compatibility contexts.
    Glsl120,
}

impl GlslVersion {
    /// Pick the best dialect from the versions a context reports.
    pub fn best_of(supported: &[glium::Version]) -> Option<Self> {
        if supported
            .iter()
            .any(|v| matches!(v, glium::Version(glium::Api::Gl, 3, 3)))
        {
            Some(GlslVersion::Glsl330)
        } else if supported
            .iter()
            .any(|v| matches!(v, glium::Version(glium::Api::Gl, 1, 2)))
        {
            Some(GlslVersion::Glsl120)
        } else {
            None
        }
    }

    /// The `#version` line opening a shader in this dialect.
    pub fn directive(self) -> &'static str {
        match self {
            GlslVersion::Glsl330 => "#version 330 core",
            GlslVersion::Glsl120 => "#version 120",
        }
    }
}

/// Get the best shader dialect for the given capabilities.
///
/// Returns `Glsl330` if supported, otherwise `Glsl120`, or `None` if neither
/// is available.
pub fn get_best_dialect(ctx: &impl CapabilitiesSource) -> Option<GlslVersion> {
    GlslVersion::best_of(&ctx.get_capabilities().supported_glsl_versions)
}
