//! Functions imported from the host's XPLM library.
//!
//! The symbols are resolved when the host loads the plugin: on Linux from the
//! already-loaded XPLM, on macOS through `-undefined dynamic_lookup`, on
//! Windows through the `XPLM_64` import library.

#![allow(non_snake_case)]

use std::ffi::c_void;
use std::os::raw::{c_char, c_float, c_int};

use crate::ffi::*;

extern "C" {
    // XPLMUtilities.h
    pub fn XPLMDebugString(inString: *const c_char);

    // XPLMDisplay.h
    pub fn XPLMRegisterDrawCallback(
        inCallback: XPLMDrawCallback_f,
        inPhase: XPLMDrawingPhase,
        inWantsBefore: c_int,
        inRefcon: *mut c_void,
    ) -> c_int;
    pub fn XPLMUnregisterDrawCallback(
        inCallback: XPLMDrawCallback_f,
        inPhase: XPLMDrawingPhase,
        inWantsBefore: c_int,
        inRefcon: *mut c_void,
    ) -> c_int;
    pub fn XPLMCreateWindowEx(inParams: *mut XPLMCreateWindow_t) -> XPLMWindowID;
    pub fn XPLMDestroyWindow(inWindowID: XPLMWindowID);
    pub fn XPLMGetWindowGeometry(
        inWindowID: XPLMWindowID,
        outLeft: *mut c_int,
        outTop: *mut c_int,
        outRight: *mut c_int,
        outBottom: *mut c_int,
    );
    pub fn XPLMSetWindowTitle(inWindowID: XPLMWindowID, inWindowTitle: *const c_char);
    pub fn XPLMGetScreenSize(outWidth: *mut c_int, outHeight: *mut c_int);

    // XPLMGraphics.h
    pub fn XPLMSetGraphicsState(
        inEnableFog: c_int,
        inNumberTexUnits: c_int,
        inEnableLighting: c_int,
        inEnableAlphaTesting: c_int,
        inEnableAlphaBlending: c_int,
        inEnableDepthTesting: c_int,
        inEnableDepthWriting: c_int,
    );
    pub fn XPLMDrawString(
        inColorRGB: *mut c_float,
        inXOffset: c_int,
        inYOffset: c_int,
        inChar: *mut c_char,
        inWordWrapWidth: *mut c_int,
        inFontID: XPLMFontID,
    );

    // XPLMMenus.h
    pub fn XPLMFindPluginsMenu() -> XPLMMenuID;
    pub fn XPLMCreateMenu(
        inName: *const c_char,
        inParentMenu: XPLMMenuID,
        inParentItem: c_int,
        inHandler: Option<XPLMMenuHandler_f>,
        inMenuRef: *mut c_void,
    ) -> XPLMMenuID;
    pub fn XPLMDestroyMenu(inMenuID: XPLMMenuID);
    pub fn XPLMAppendMenuItem(
        inMenu: XPLMMenuID,
        inItemName: *const c_char,
        inItemRef: *mut c_void,
        inDeprecatedAndIgnored: c_int,
    ) -> c_int;
    pub fn XPLMCheckMenuItem(inMenu: XPLMMenuID, index: c_int, inCheck: XPLMMenuCheck);
    pub fn XPLMRemoveMenuItem(inMenu: XPLMMenuID, inIndex: c_int);

    // XPLMDataAccess.h
    pub fn XPLMRegisterDataAccessor(
        inDataName: *const c_char,
        inDataType: XPLMDataTypeID,
        inIsWritable: c_int,
        inReadInt: Option<XPLMGetDatai_f>,
        inWriteInt: Option<XPLMSetDatai_f>,
        inReadFloat: *const c_void,
        inWriteFloat: *const c_void,
        inReadDouble: *const c_void,
        inWriteDouble: *const c_void,
        inReadIntArray: *const c_void,
        inWriteIntArray: *const c_void,
        inReadFloatArray: *const c_void,
        inWriteFloatArray: *const c_void,
        inReadData: *const c_void,
        inWriteData: *const c_void,
        inReadRefcon: *mut c_void,
        inWriteRefcon: *mut c_void,
    ) -> XPLMDataRef;
    pub fn XPLMUnregisterDataAccessor(inDataRef: XPLMDataRef);

    // XPLMPlugin.h
    pub fn XPLMFindPluginBySignature(inSignature: *const c_char) -> XPLMPluginID;
    pub fn XPLMSendMessageToPlugin(inPlugin: XPLMPluginID, inMessage: c_int, inParam: *mut c_void);
}
