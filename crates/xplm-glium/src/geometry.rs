//! Static triangle geometry in GPU buffers.

use anyhow::{bail, Result};
use gl::types::{GLfloat, GLsizei, GLsizeiptr, GLuint};
use tracing::debug;

use crate::program::POSITION_ATTRIBUTE;
use crate::validate_gl::{has_vertex_arrays, SavedGlState};

/// Three positions, three components each.
pub type TrianglePositions = [[f32; 3]; 3];

const COMPONENTS: i32 = 3;
const VERTEX_COUNT: GLsizei = 3;

/// A vertex buffer holding one triangle, with a vertex array object when the
/// context supports them. Delete it explicitly with [`TriangleGeometry::delete`].
#[derive(Debug, PartialEq, Eq)]
pub struct TriangleGeometry {
    vao: Option<GLuint>,
    vbo: GLuint,
}

impl TriangleGeometry {
    pub fn upload(positions: &TrianglePositions) -> Result<Self> {
        let flat: Vec<GLfloat> = positions.iter().flatten().copied().collect();
        let byte_len = std::mem::size_of_val(flat.as_slice()) as GLsizeiptr;

        unsafe {
            let mut vbo = 0;
            gl::GenBuffers(1, &mut vbo);
            if vbo == 0 {
                bail!("glGenBuffers returned no buffer");
            }
            let saved = SavedGlState::save();

            let vao = if has_vertex_arrays() {
                let mut vao = 0;
                gl::GenVertexArrays(1, &mut vao);
                gl::BindVertexArray(vao);
                Some(vao)
            } else {
                None
            };

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(gl::ARRAY_BUFFER, byte_len, flat.as_ptr().cast(), gl::STATIC_DRAW);

            if vao.is_some() {
                set_position_pointer();
            }
            saved.restore();

            debug!(vbo, ?vao, "triangle geometry uploaded");
            Ok(Self { vao, vbo })
        }
    }

    /// Issue the draw call for the triangle with whatever program is bound.
    /// Bindings and the position attribute are left changed; callers restore
    /// them through [`SavedGlState`].
    ///
    /// # Safety
    ///
    /// Must be called with the context the geometry was uploaded in current.
    pub unsafe fn draw(&self) {
        match self.vao {
            Some(vao) => {
                gl::BindVertexArray(vao);
                gl::DrawArrays(gl::TRIANGLES, 0, VERTEX_COUNT);
            }
            None => {
                gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
                set_position_pointer();
                gl::DrawArrays(gl::TRIANGLES, 0, VERTEX_COUNT);
            }
        }
    }

    pub fn delete(self) {
        unsafe {
            if let Some(vao) = self.vao {
                gl::DeleteVertexArrays(1, &vao);
            }
            gl::DeleteBuffers(1, &self.vbo);
        }
    }
}

unsafe fn set_position_pointer() {
    gl::VertexAttribPointer(
        POSITION_ATTRIBUTE,
        COMPONENTS,
        gl::FLOAT,
        gl::FALSE,
        COMPONENTS * std::mem::size_of::<GLfloat>() as i32,
        std::ptr::null(),
    );
    gl::EnableVertexAttribArray(POSITION_ATTRIBUTE);
}
