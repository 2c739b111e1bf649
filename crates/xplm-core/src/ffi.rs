//! Hardcoded XPLM constants, C-repr structs and callback signatures.
//!
//! Values are sourced from the X-Plane SDK headers (XPLMDefs.h,
//! XPLMDisplay.h, XPLMMenus.h, XPLMDataAccess.h, XPLMPlugin.h). Only the
//! subset used by the plugin framework is declared.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};

// =====================================================================
// Opaque handle types
// =====================================================================

pub type XPLMPluginID = c_int;
pub type XPLMMenuID = *mut c_void;
pub type XPLMDataRef = *mut c_void;
pub type XPLMWindowID = *mut c_void;

pub type XPLMDrawingPhase = c_int;
pub type XPLMDataTypeID = c_int;
pub type XPLMMenuCheck = c_int;
pub type XPLMMouseStatus = c_int;
pub type XPLMCursorStatus = c_int;
pub type XPLMKeyFlags = c_int;
pub type XPLMFontID = c_int;
pub type XPLMWindowDecoration = c_int;
pub type XPLMWindowLayer = c_int;

pub const XPLM_NO_PLUGIN_ID: XPLMPluginID = -1;

/// Size of the name, signature and description buffers handed to
/// `XPluginStart`.
pub const HOST_STRING_CAPACITY: usize = 256;

// =====================================================================
// Drawing phases (XPLMDisplay.h)
// =====================================================================
pub const xplm_Phase_FirstScene: XPLMDrawingPhase = 0;
pub const xplm_Phase_Terrain: XPLMDrawingPhase = 5;
pub const xplm_Phase_Airports: XPLMDrawingPhase = 10;
pub const xplm_Phase_Vectors: XPLMDrawingPhase = 15;
pub const xplm_Phase_Objects: XPLMDrawingPhase = 20;
pub const xplm_Phase_Airplanes: XPLMDrawingPhase = 25;
pub const xplm_Phase_LastScene: XPLMDrawingPhase = 30;
pub const xplm_Phase_Modern3D: XPLMDrawingPhase = 31;
pub const xplm_Phase_FirstCockpit: XPLMDrawingPhase = 35;
pub const xplm_Phase_Panel: XPLMDrawingPhase = 40;
pub const xplm_Phase_Gauges: XPLMDrawingPhase = 45;
pub const xplm_Phase_Window: XPLMDrawingPhase = 50;
pub const xplm_Phase_LastCockpit: XPLMDrawingPhase = 55;
pub const xplm_Phase_LocalMap3D: XPLMDrawingPhase = 100;
pub const xplm_Phase_LocalMap2D: XPLMDrawingPhase = 101;
pub const xplm_Phase_LocalMapProfile: XPLMDrawingPhase = 102;

// =====================================================================
// Plugin messages (XPLMPlugin.h)
// =====================================================================
pub const XPLM_MSG_PLANE_CRASHED: c_int = 101;
pub const XPLM_MSG_PLANE_LOADED: c_int = 102;
pub const XPLM_MSG_AIRPORT_LOADED: c_int = 103;
pub const XPLM_MSG_SCENERY_LOADED: c_int = 104;
pub const XPLM_MSG_AIRPLANE_COUNT_CHANGED: c_int = 105;
pub const XPLM_MSG_PLANE_UNLOADED: c_int = 106;
pub const XPLM_MSG_WILL_WRITE_PREFS: c_int = 107;
pub const XPLM_MSG_LIVERY_LOADED: c_int = 108;
pub const XPLM_MSG_ENTERED_VR: c_int = 109;
pub const XPLM_MSG_EXITING_VR: c_int = 110;
pub const XPLM_MSG_RELEASE_PLANES: c_int = 111;
pub const XPLM_MSG_FMOD_BANK_LOADED: c_int = 112;
pub const XPLM_MSG_FMOD_BANK_UNLOADING: c_int = 113;
pub const XPLM_MSG_DATAREFS_ADDED: c_int = 114;

// =====================================================================
// DataRefEditor inter-plugin protocol
// =====================================================================
pub const DATAREF_EDITOR_SIGNATURE: &str = "xplanesdk.examples.DataRefEditor";
pub const MSG_ADD_DATAREF: c_int = 0x0100_0000;

// =====================================================================
// Data types (XPLMDataAccess.h)
// =====================================================================
pub const xplmType_Unknown: XPLMDataTypeID = 0;
pub const xplmType_Int: XPLMDataTypeID = 1;
pub const xplmType_Float: XPLMDataTypeID = 2;
pub const xplmType_Double: XPLMDataTypeID = 4;
pub const xplmType_FloatArray: XPLMDataTypeID = 8;
pub const xplmType_IntArray: XPLMDataTypeID = 16;
pub const xplmType_Data: XPLMDataTypeID = 32;

// =====================================================================
// Menus (XPLMMenus.h)
// =====================================================================
pub const xplm_Menu_NoCheck: XPLMMenuCheck = 0;
pub const xplm_Menu_Unchecked: XPLMMenuCheck = 1;
pub const xplm_Menu_Checked: XPLMMenuCheck = 2;

// =====================================================================
// Mouse, cursor and keys (XPLMDefs.h / XPLMDisplay.h)
// =====================================================================
pub const xplm_MouseDown: XPLMMouseStatus = 1;
pub const xplm_MouseDrag: XPLMMouseStatus = 2;
pub const xplm_MouseUp: XPLMMouseStatus = 3;

pub const xplm_CursorDefault: XPLMCursorStatus = 0;
pub const xplm_CursorHidden: XPLMCursorStatus = 1;
pub const xplm_CursorArrow: XPLMCursorStatus = 2;
pub const xplm_CursorCustom: XPLMCursorStatus = 3;

pub const xplm_ShiftFlag: XPLMKeyFlags = 1;
pub const xplm_OptionAltFlag: XPLMKeyFlags = 2;
pub const xplm_ControlFlag: XPLMKeyFlags = 4;
pub const xplm_DownFlag: XPLMKeyFlags = 8;
pub const xplm_UpFlag: XPLMKeyFlags = 16;

// =====================================================================
// Fonts (XPLMGraphics.h)
// =====================================================================
pub const xplmFont_Basic: XPLMFontID = 0;
pub const xplmFont_Proportional: XPLMFontID = 18;

// =====================================================================
// Windows (XPLMDisplay.h, XPLM300)
// =====================================================================
pub const xplm_WindowDecorationNone: XPLMWindowDecoration = 0;
pub const xplm_WindowDecorationRoundRectangle: XPLMWindowDecoration = 1;
pub const xplm_WindowDecorationSelfDecorated: XPLMWindowDecoration = 2;
pub const xplm_WindowDecorationSelfDecoratedResizable: XPLMWindowDecoration = 3;

pub const xplm_WindowLayerFlightOverlay: XPLMWindowLayer = 0;
pub const xplm_WindowLayerFloatingWindows: XPLMWindowLayer = 1;
pub const xplm_WindowLayerModal: XPLMWindowLayer = 2;
pub const xplm_WindowLayerGrowlNotifications: XPLMWindowLayer = 3;

// =====================================================================
// Callback signatures
// =====================================================================

pub type XPLMDrawCallback_f =
    unsafe extern "C" fn(inPhase: XPLMDrawingPhase, inIsBefore: c_int, inRefcon: *mut c_void) -> c_int;

pub type XPLMMenuHandler_f = unsafe extern "C" fn(inMenuRef: *mut c_void, inItemRef: *mut c_void);

pub type XPLMGetDatai_f = unsafe extern "C" fn(inRefcon: *mut c_void) -> c_int;
pub type XPLMSetDatai_f = unsafe extern "C" fn(inRefcon: *mut c_void, inValue: c_int);

pub type XPLMDrawWindow_f = unsafe extern "C" fn(inWindowID: XPLMWindowID, inRefcon: *mut c_void);

pub type XPLMHandleKey_f = unsafe extern "C" fn(
    inWindowID: XPLMWindowID,
    inKey: c_char,
    inFlags: XPLMKeyFlags,
    inVirtualKey: c_char,
    inRefcon: *mut c_void,
    losingFocus: c_int,
);

pub type XPLMHandleMouseClick_f = unsafe extern "C" fn(
    inWindowID: XPLMWindowID,
    x: c_int,
    y: c_int,
    inMouse: XPLMMouseStatus,
    inRefcon: *mut c_void,
) -> c_int;

pub type XPLMHandleCursor_f = unsafe extern "C" fn(
    inWindowID: XPLMWindowID,
    x: c_int,
    y: c_int,
    inRefcon: *mut c_void,
) -> XPLMCursorStatus;

pub type XPLMHandleMouseWheel_f = unsafe extern "C" fn(
    inWindowID: XPLMWindowID,
    x: c_int,
    y: c_int,
    wheel: c_int,
    clicks: c_int,
    inRefcon: *mut c_void,
) -> c_int;

// =====================================================================
// C-repr structs matching the XPLM SDK
// =====================================================================

/// Parameters for `XPLMCreateWindowEx` (XPLM300 layout).
///
/// Every handler slot must be filled; the host does not accept null
/// handlers for any input class.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct XPLMCreateWindow_t {
    pub structSize: c_int,
    pub left: c_int,
    pub top: c_int,
    pub right: c_int,
    pub bottom: c_int,
    pub visible: c_int,
    pub drawWindowFunc: XPLMDrawWindow_f,
    pub handleMouseClickFunc: XPLMHandleMouseClick_f,
    pub handleKeyFunc: XPLMHandleKey_f,
    pub handleCursorFunc: XPLMHandleCursor_f,
    pub handleMouseWheelFunc: XPLMHandleMouseWheel_f,
    pub refcon: *mut c_void,
    pub decorateAsFloatingWindow: XPLMWindowDecoration,
    pub layer: XPLMWindowLayer,
    pub handleRightClickFunc: XPLMHandleMouseClick_f,
}

// =====================================================================
// Utility
// =====================================================================

/// Copy a Rust string into a host-provided buffer, null-terminating it.
///
/// The string is cut at its first interior NUL, and truncated to fit.
///
/// # Safety
///
/// `address` must be a valid pointer to a buffer of at least `max_to_write` bytes.
pub unsafe fn copy_str_to_host_buffer(address: *mut u8, max_to_write: usize, string: &str) {
    if address.is_null() || max_to_write == 0 {
        return;
    }

    let bytes = string.as_bytes();
    let bytes = match bytes.iter().position(|&b| b == 0) {
        Some(nul) => &bytes[..nul],
        None => bytes,
    };
    let to_copy = bytes.len().min(max_to_write - 1);
    let dest = unsafe { std::slice::from_raw_parts_mut(address, to_copy + 1) };

    dest[..to_copy].copy_from_slice(&bytes[..to_copy]);
    dest[to_copy] = 0;
}
