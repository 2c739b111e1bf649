//! glium backend over the simulator's OpenGL context.
//!
//! The plugin never creates, swaps or makes current a context of its own; the
//! host does all of that before invoking any callback.

use std::cell::Cell;
use std::ffi::c_void;
use std::sync::Once;

static LOAD_GL: Once = Once::new();

/// Load GL entry points for the `gl` crate. Later calls do nothing.
pub fn load_gl() {
    LOAD_GL.call_once(|| {
        gl_loader::init_gl();
        gl::load_with(|symbol| gl_loader::get_proc_address(symbol).cast());
    });
}

/// Address of a GL entry point, for loaders other than the `gl` crate.
pub fn proc_address(symbol: &str) -> *const c_void {
    load_gl();
    gl_loader::get_proc_address(symbol).cast()
}

#[derive(Debug)]
pub(crate) struct HostGlBackend {
    screen: Cell<(u32, u32)>,
}

impl HostGlBackend {
    pub(crate) fn new(screen: (u32, u32)) -> Self {
        load_gl();
        Self {
            screen: Cell::new(screen),
        }
    }
}

/// # Safety
///
/// Only valid on the simulator's main thread while it has its context
/// current, i.e. inside plugin start/enable or a host callback.
unsafe impl glium::backend::Backend for HostGlBackend {
    fn swap_buffers(&self) -> Result<(), glium::SwapBuffersError> {
        // The host presents frames.
        Ok(())
    }

    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        proc_address(symbol)
    }

    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.screen.get()
    }

    fn is_current(&self) -> bool {
        crate::validate_gl::is_context_current()
    }

    unsafe fn make_current(&self) {}

    fn resize(&self, screen: (u32, u32)) {
        self.screen.set(screen);
    }
}
