//! Shader compilation and program linking with status checks.

use std::ffi::CString;

use anyhow::{bail, Context as _, Result};
use gl::types::{GLchar, GLenum, GLint, GLuint};
use tracing::debug;

/// Attribute slot the vertex position is bound to before linking.
pub const POSITION_ATTRIBUTE: GLuint = 0;
const POSITION_NAME: &str = "position";

/// A linked GL program. Delete it explicitly with [`ShaderProgram::delete`].
#[derive(Debug, PartialEq, Eq)]
pub struct ShaderProgram {
    id: GLuint,
}

impl ShaderProgram {
    /// Compile both stages and link them.
    ///
    /// Failing stages report their info log in the error. Intermediate
    /// shader objects are deleted on every path.
    pub fn build(vertex_src: &str, fragment_src: &str) -> Result<Self> {
        let vertex = compile_shader(gl::VERTEX_SHADER, vertex_src).context("vertex shader")?;
        let fragment = match compile_shader(gl::FRAGMENT_SHADER, fragment_src) {
            Ok(fragment) => fragment,
            Err(err) => {
                unsafe { gl::DeleteShader(vertex) };
                return Err(err.context("fragment shader"));
            }
        };

        let linked = link_program(vertex, fragment);

        unsafe {
            gl::DeleteShader(vertex);
            gl::DeleteShader(fragment);
        }

        let id = linked?;
        debug!(program = id, "shader program linked");
        Ok(Self { id })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn delete(self) {
        unsafe { gl::DeleteProgram(self.id) };
    }
}

fn stage_name(kind: GLenum) -> &'static str {
    match kind {
        gl::VERTEX_SHADER => "vertex",
        gl::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

fn compile_shader(kind: GLenum, source: &str) -> Result<GLuint> {
    let source = CString::new(source).context("shader source contains NUL")?;
    if !gl::CreateShader::is_loaded() {
        bail!("OpenGL entry points are not loaded");
    }

    unsafe {
        let shader = gl::CreateShader(kind);
        if shader == 0 {
            bail!("glCreateShader failed for {} stage", stage_name(kind));
        }

        let ptr = source.as_ptr();
        gl::ShaderSource(shader, 1, &ptr, std::ptr::null());
        gl::CompileShader(shader);

        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
        if status != GLint::from(gl::TRUE) {
            let log = info_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog);
            gl::DeleteShader(shader);
            bail!("{} stage failed to compile: {log}", stage_name(kind));
        }

        Ok(shader)
    }
}

fn link_program(vertex: GLuint, fragment: GLuint) -> Result<GLuint> {
    let position = CString::new(POSITION_NAME)?;

    unsafe {
        let program = gl::CreateProgram();
        if program == 0 {
            bail!("glCreateProgram failed");
        }

        gl::AttachShader(program, vertex);
        gl::AttachShader(program, fragment);
        gl::BindAttribLocation(program, POSITION_ATTRIBUTE, position.as_ptr());
        gl::LinkProgram(program);
        gl::DetachShader(program, vertex);
        gl::DetachShader(program, fragment);

        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
        if status != GLint::from(gl::TRUE) {
            let log = info_log(program, gl::GetProgramiv, gl::GetProgramInfoLog);
            gl::DeleteProgram(program);
            bail!("program failed to link: {log}");
        }

        Ok(program)
    }
}

type GetIv = unsafe fn(GLuint, GLenum, *mut GLint);
type GetLog = unsafe fn(GLuint, i32, *mut i32, *mut GLchar);

unsafe fn info_log(object: GLuint, get_iv: GetIv, get_log: GetLog) -> String {
    let mut len: GLint = 0;
    get_iv(object, gl::INFO_LOG_LENGTH, &mut len);
    if len <= 0 {
        return String::from("<no info log>");
    }

    let mut buf = vec![0u8; len as usize];
    let mut written: GLint = 0;
    get_log(object, len, &mut written, buf.as_mut_ptr().cast());
    buf.truncate(written.max(0) as usize);

    String::from_utf8_lossy(&buf).trim_end().to_string()
}
