//! The host operations a plugin can invoke, behind the [`Host`] trait.
//!
//! [`XplmHost`] is the production implementation that forwards to the XPLM
//! library. Plugins are written against the trait so their logic can be
//! driven without a running simulator.

use std::ffi::{c_void, CString};
use std::os::raw::{c_char, c_int};

use anyhow::{bail, Context as _, Result};

use crate::ffi::*;
use crate::messages::DrawPhase;
use crate::sys;
use crate::window::{WindowGeometry, WindowSpec};

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(*mut c_void);

        impl $name {
            /// Wrap a raw host handle, rejecting null.
            pub fn from_raw(raw: *mut c_void) -> Option<Self> {
                (!raw.is_null()).then_some(Self(raw))
            }

            pub fn as_raw(self) -> *mut c_void {
                self.0
            }
        }
    };
}

opaque_handle!(
    /// A host-owned menu.
    MenuId
);
opaque_handle!(
    /// A registered data accessor.
    DataRef
);
opaque_handle!(
    /// A host-owned window.
    WindowId
);

/// Another plugin loaded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId(pub XPLMPluginID);

/// An item inside a host menu, addressed by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuItem {
    pub menu: MenuId,
    pub index: c_int,
}

/// Fixed-function state the host caches between draw callbacks. Set it
/// before issuing raw GL so the host's cache matches the real context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicsState {
    pub fog: bool,
    pub texture_units: i32,
    pub lighting: bool,
    pub alpha_testing: bool,
    pub alpha_blending: bool,
    pub depth_testing: bool,
    pub depth_writing: bool,
}

/// Operations a plugin performs against the host.
///
/// Callbacks are registered as raw `extern "C"` function pointers together
/// with an opaque `refcon` that the host passes back on every invocation.
pub trait Host {
    fn register_draw_callback(
        &self,
        callback: XPLMDrawCallback_f,
        phase: DrawPhase,
        before: bool,
        refcon: *mut c_void,
    ) -> Result<()>;

    fn unregister_draw_callback(
        &self,
        callback: XPLMDrawCallback_f,
        phase: DrawPhase,
        before: bool,
        refcon: *mut c_void,
    ) -> Result<()>;

    fn set_graphics_state(&self, state: GraphicsState);

    /// The host's top-level plugins menu.
    fn plugins_menu(&self) -> Result<MenuId>;

    /// Create a menu, attached as a submenu of `parent` when given.
    fn create_menu(
        &self,
        name: &str,
        parent: Option<MenuItem>,
        handler: XPLMMenuHandler_f,
        menu_ref: *mut c_void,
    ) -> Result<MenuId>;

    fn append_menu_item(&self, menu: MenuId, name: &str, item_ref: *mut c_void) -> Result<MenuItem>;

    fn check_menu_item(&self, item: MenuItem, checked: bool);

    fn remove_menu_item(&self, item: MenuItem);

    fn destroy_menu(&self, menu: MenuId);

    /// Publish a named int data accessor. Passing `write` makes it writable.
    fn register_int_accessor(
        &self,
        name: &str,
        read: XPLMGetDatai_f,
        write: Option<XPLMSetDatai_f>,
        refcon: *mut c_void,
    ) -> Result<DataRef>;

    fn unregister_data_accessor(&self, dataref: DataRef);

    fn find_plugin_by_signature(&self, signature: &str) -> Option<PluginId>;

    /// Send a message whose parameter is a C string, e.g. a dataref name.
    fn send_string_message(&self, plugin: PluginId, message: c_int, payload: &str) -> Result<()>;

    fn create_window(&self, spec: &WindowSpec) -> Result<WindowId>;

    fn destroy_window(&self, window: WindowId);

    fn set_window_title(&self, window: WindowId, title: &str) -> Result<()>;

    fn window_geometry(&self, window: WindowId) -> WindowGeometry;

    /// Size of the host's main window in boxels.
    fn screen_size(&self) -> (i32, i32);

    /// Draw text with the host's basic font, baseline at `(x, y)`.
    fn draw_string(&self, color: [f32; 3], x: i32, y: i32, text: &str) -> Result<()>;
}

/// Write a line to the host log, bypassing `tracing`.
pub fn debug_string(message: &str) {
    let line = match CString::new(message) {
        Ok(line) => line,
        Err(err) => {
            let nul = err.nul_position();
            let mut bytes = err.into_vec();
            bytes.truncate(nul);
            // No interior NUL remains after truncating at the first one.
            CString::new(bytes).unwrap_or_default()
        }
    };
    unsafe { sys::XPLMDebugString(line.as_ptr()) }
}

/// [`Host`] backed by the XPLM library loaded in the simulator process.
#[derive(Debug, Clone, Copy, Default)]
pub struct XplmHost;

impl Host for XplmHost {
    fn register_draw_callback(
        &self,
        callback: XPLMDrawCallback_f,
        phase: DrawPhase,
        before: bool,
        refcon: *mut c_void,
    ) -> Result<()> {
        let ok = unsafe {
            sys::XPLMRegisterDrawCallback(callback, phase.raw(), before as c_int, refcon)
        };
        if ok == 0 {
            bail!("host rejected draw callback for phase {phase:?}");
        }
        Ok(())
    }

    fn unregister_draw_callback(
        &self,
        callback: XPLMDrawCallback_f,
        phase: DrawPhase,
        before: bool,
        refcon: *mut c_void,
    ) -> Result<()> {
        let ok = unsafe {
            sys::XPLMUnregisterDrawCallback(callback, phase.raw(), before as c_int, refcon)
        };
        if ok == 0 {
            bail!("no draw callback registered for phase {phase:?}");
        }
        Ok(())
    }

    fn set_graphics_state(&self, state: GraphicsState) {
        unsafe {
            sys::XPLMSetGraphicsState(
                state.fog as c_int,
                state.texture_units,
                state.lighting as c_int,
                state.alpha_testing as c_int,
                state.alpha_blending as c_int,
                state.depth_testing as c_int,
                state.depth_writing as c_int,
            )
        }
    }

    fn plugins_menu(&self) -> Result<MenuId> {
        MenuId::from_raw(unsafe { sys::XPLMFindPluginsMenu() })
            .context("host has no plugins menu")
    }

    fn create_menu(
        &self,
        name: &str,
        parent: Option<MenuItem>,
        handler: XPLMMenuHandler_f,
        menu_ref: *mut c_void,
    ) -> Result<MenuId> {
        let c_name = CString::new(name)?;
        let (parent_menu, parent_item) = match parent {
            Some(item) => (item.menu.as_raw(), item.index),
            None => (std::ptr::null_mut(), 0),
        };
        let raw = unsafe {
            sys::XPLMCreateMenu(c_name.as_ptr(), parent_menu, parent_item, Some(handler), menu_ref)
        };
        MenuId::from_raw(raw).with_context(|| format!("host refused to create menu {name:?}"))
    }

    fn append_menu_item(&self, menu: MenuId, name: &str, item_ref: *mut c_void) -> Result<MenuItem> {
        let c_name = CString::new(name)?;
        let index = unsafe { sys::XPLMAppendMenuItem(menu.as_raw(), c_name.as_ptr(), item_ref, 0) };
        if index < 0 {
            bail!("host refused to append menu item {name:?}");
        }
        Ok(MenuItem { menu, index })
    }

    fn check_menu_item(&self, item: MenuItem, checked: bool) {
        let check = if checked {
            xplm_Menu_Checked
        } else {
            xplm_Menu_Unchecked
        };
        unsafe { sys::XPLMCheckMenuItem(item.menu.as_raw(), item.index, check) }
    }

    fn remove_menu_item(&self, item: MenuItem) {
        unsafe { sys::XPLMRemoveMenuItem(item.menu.as_raw(), item.index) }
    }

    fn destroy_menu(&self, menu: MenuId) {
        unsafe { sys::XPLMDestroyMenu(menu.as_raw()) }
    }

    fn register_int_accessor(
        &self,
        name: &str,
        read: XPLMGetDatai_f,
        write: Option<XPLMSetDatai_f>,
        refcon: *mut c_void,
    ) -> Result<DataRef> {
        let c_name = CString::new(name)?;
        let none = std::ptr::null();
        let raw = unsafe {
            sys::XPLMRegisterDataAccessor(
                c_name.as_ptr(),
                xplmType_Int,
                write.is_some() as c_int,
                Some(read),
                write,
                none,
                none,
                none,
                none,
                none,
                none,
                none,
                none,
                none,
                none,
                refcon,
                refcon,
            )
        };
        DataRef::from_raw(raw).with_context(|| format!("host refused data accessor {name:?}"))
    }

    fn unregister_data_accessor(&self, dataref: DataRef) {
        unsafe { sys::XPLMUnregisterDataAccessor(dataref.as_raw()) }
    }

    fn find_plugin_by_signature(&self, signature: &str) -> Option<PluginId> {
        let c_sig = CString::new(signature).ok()?;
        let id = unsafe { sys::XPLMFindPluginBySignature(c_sig.as_ptr()) };
        (id != XPLM_NO_PLUGIN_ID).then_some(PluginId(id))
    }

    fn send_string_message(&self, plugin: PluginId, message: c_int, payload: &str) -> Result<()> {
        let c_payload = CString::new(payload)?;
        unsafe {
            sys::XPLMSendMessageToPlugin(plugin.0, message, c_payload.as_ptr() as *mut c_void)
        };
        Ok(())
    }

    fn create_window(&self, spec: &WindowSpec) -> Result<WindowId> {
        let mut params = spec.to_ffi();
        let raw = unsafe { sys::XPLMCreateWindowEx(&mut params) };
        WindowId::from_raw(raw).context("host refused to create window")
    }

    fn destroy_window(&self, window: WindowId) {
        unsafe { sys::XPLMDestroyWindow(window.as_raw()) }
    }

    fn set_window_title(&self, window: WindowId, title: &str) -> Result<()> {
        let c_title = CString::new(title)?;
        unsafe { sys::XPLMSetWindowTitle(window.as_raw(), c_title.as_ptr()) };
        Ok(())
    }

    fn window_geometry(&self, window: WindowId) -> WindowGeometry {
        let (mut left, mut top, mut right, mut bottom) = (0, 0, 0, 0);
        unsafe {
            sys::XPLMGetWindowGeometry(window.as_raw(), &mut left, &mut top, &mut right, &mut bottom)
        };
        WindowGeometry::new(left, top, right, bottom)
    }

    fn screen_size(&self) -> (i32, i32) {
        let (mut width, mut height) = (0, 0);
        unsafe { sys::XPLMGetScreenSize(&mut width, &mut height) };
        (width, height)
    }

    fn draw_string(&self, color: [f32; 3], x: i32, y: i32, text: &str) -> Result<()> {
        let c_text = CString::new(text)?;
        let mut color = color;
        unsafe {
            sys::XPLMDrawString(
                color.as_mut_ptr(),
                x,
                y,
                c_text.as_ptr() as *mut c_char,
                std::ptr::null_mut(),
                xplmFont_Proportional,
            )
        };
        Ok(())
    }
}
