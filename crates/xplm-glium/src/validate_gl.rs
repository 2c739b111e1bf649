//! Save and restore the slice of OpenGL state the plugin touches.
//!
//! The host shares one context with every plugin and caches its own
//! bindings, so anything bound during a draw callback must be put back.

use std::ffi::c_void;
use std::ptr;

use gl::types::{GLenum, GLint, GLuint};

use crate::program::POSITION_ATTRIBUTE;

/// Upper bound on queued errors drained by [`clear_gl_errors`].
const MAX_DRAINED_ERRORS: usize = 32;

/// Vertex attribute array state, which lives outside any VAO when the
/// context has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribState {
    enabled: bool,
    buffer: GLint,
    size: GLint,
    kind: GLint,
    normalized: bool,
    stride: GLint,
    pointer: usize,
}

impl VertexAttribState {
    /// What a fresh context reports for every attribute.
    pub const INITIAL: Self = Self {
        enabled: false,
        buffer: 0,
        size: 4,
        kind: gl::FLOAT as GLint,
        normalized: false,
        stride: 0,
        pointer: 0,
    };

    /// Whether a pointer was ever specified. Re-specifying an unsourced
    /// attribute is an error in core profiles.
    pub fn has_source(&self) -> bool {
        self.buffer != 0 || self.pointer != 0
    }

    unsafe fn save(index: GLuint) -> Self {
        let mut s = Self::INITIAL;
        let mut enabled = 0;
        let mut normalized = 0;
        let mut kind = 0;
        let mut pointer: *mut c_void = ptr::null_mut();
        unsafe {
            gl::GetVertexAttribiv(index, gl::VERTEX_ATTRIB_ARRAY_ENABLED, &mut enabled);
            gl::GetVertexAttribiv(index, gl::VERTEX_ATTRIB_ARRAY_BUFFER_BINDING, &mut s.buffer);
            gl::GetVertexAttribiv(index, gl::VERTEX_ATTRIB_ARRAY_SIZE, &mut s.size);
            gl::GetVertexAttribiv(index, gl::VERTEX_ATTRIB_ARRAY_TYPE, &mut kind);
            gl::GetVertexAttribiv(index, gl::VERTEX_ATTRIB_ARRAY_NORMALIZED, &mut normalized);
            gl::GetVertexAttribiv(index, gl::VERTEX_ATTRIB_ARRAY_STRIDE, &mut s.stride);
            gl::GetVertexAttribPointerv(index, gl::VERTEX_ATTRIB_ARRAY_POINTER, &mut pointer);
        }
        s.enabled = enabled != 0;
        s.normalized = normalized != 0;
        s.kind = kind;
        s.pointer = pointer as usize;
        s
    }

    /// Leaves `ARRAY_BUFFER` bound to the attribute's buffer.
    unsafe fn restore(&self, index: GLuint) {
        unsafe {
            if self.has_source() {
                gl::BindBuffer(gl::ARRAY_BUFFER, self.buffer as GLuint);
                gl::VertexAttribPointer(
                    index,
                    self.size,
                    self.kind as GLenum,
                    if self.normalized { gl::TRUE } else { gl::FALSE },
                    self.stride,
                    self.pointer as *const c_void,
                );
            }
            if self.enabled {
                gl::EnableVertexAttribArray(index);
            } else {
                gl::DisableVertexAttribArray(index);
            }
        }
    }
}

/// Bindings captured before uploading or drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedGlState {
    program: GLint,
    array_buffer: GLint,
    vao: Option<GLint>,
    position: Option<VertexAttribState>,
}

impl SavedGlState {
    /// # Safety
    ///
    /// Must be called with a valid OpenGL context current.
    pub unsafe fn save() -> Self {
        let mut s = Self {
            program: 0,
            array_buffer: 0,
            vao: None,
            position: None,
        };
        unsafe {
            gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut s.program);
            gl::GetIntegerv(gl::ARRAY_BUFFER_BINDING, &mut s.array_buffer);
            if has_vertex_arrays() {
                let mut vao = 0;
                gl::GetIntegerv(gl::VERTEX_ARRAY_BINDING, &mut vao);
                s.vao = Some(vao);
            } else {
                s.position = Some(VertexAttribState::save(POSITION_ATTRIBUTE));
            }
        }
        s
    }

    /// # Safety
    ///
    /// Must be called with the same OpenGL context current as [`Self::save`].
    pub unsafe fn restore(&self) {
        unsafe {
            gl::UseProgram(self.program as GLuint);
            if let Some(vao) = self.vao {
                gl::BindVertexArray(vao as GLuint);
            }
            if let Some(position) = &self.position {
                position.restore(POSITION_ATTRIBUTE);
            }
            gl::BindBuffer(gl::ARRAY_BUFFER, self.array_buffer as GLuint);
        }
    }
}

/// Drain errors left queued by earlier GL users so ours are attributable.
pub fn clear_gl_errors() {
    if !gl::GetError::is_loaded() {
        return;
    }
    for _ in 0..MAX_DRAINED_ERRORS {
        if unsafe { gl::GetError() } == gl::NO_ERROR {
            break;
        }
    }
}

/// Whether GL entry points are loaded and a context answers queries.
pub fn is_context_current() -> bool {
    gl::GetString::is_loaded() && unsafe { !gl::GetString(gl::VERSION).is_null() }
}

/// Whether vertex array objects can be used in this context.
pub fn has_vertex_arrays() -> bool {
    gl::GenVertexArrays::is_loaded()
        && gl::BindVertexArray::is_loaded()
        && gl::DeleteVertexArrays::is_loaded()
}
