//! Typed views of the integers the host hands to plugin callbacks.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::os::raw::c_int;

use crate::ffi::*;

/// Messages broadcast by the host through `XPluginReceiveMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum HostMessage {
    PlaneCrashed = 101,
    PlaneLoaded = 102,
    AirportLoaded = 103,
    SceneryLoaded = 104,
    AirplaneCountChanged = 105,
    PlaneUnloaded = 106,
    WillWritePrefs = 107,
    LiveryLoaded = 108,
    EnteredVr = 109,
    ExitingVr = 110,
    ReleasePlanes = 111,
    FmodBankLoaded = 112,
    FmodBankUnloading = 113,
    DatarefsAdded = 114,
}

impl HostMessage {
    /// Decode a raw message id. Messages sent by other plugins, or added in
    /// newer hosts, decode to `None`.
    pub fn from_raw(raw: c_int) -> Option<Self> {
        Self::from_i32(raw)
    }
}

/// Points in the host's render pass where draw callbacks can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum DrawPhase {
    FirstScene = 0,
    Terrain = 5,
    Airports = 10,
    Vectors = 15,
    Objects = 20,
    Airplanes = 25,
    LastScene = 30,
    Modern3D = 31,
    FirstCockpit = 35,
    Panel = 40,
    Gauges = 45,
    Window = 50,
    LastCockpit = 55,
    LocalMap3D = 100,
    LocalMap2D = 101,
    LocalMapProfile = 102,
}

impl DrawPhase {
    pub fn from_raw(raw: XPLMDrawingPhase) -> Option<Self> {
        Self::from_i32(raw)
    }

    pub fn raw(self) -> XPLMDrawingPhase {
        self.to_i32().unwrap_or(xplm_Phase_Window)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum MouseStatus {
    Down = 1,
    Drag = 2,
    Up = 3,
}

impl MouseStatus {
    pub fn from_raw(raw: XPLMMouseStatus) -> Option<Self> {
        Self::from_i32(raw)
    }

    pub fn is_pressed(self) -> bool {
        !matches!(self, MouseStatus::Up)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromPrimitive, ToPrimitive)]
pub enum CursorStatus {
    #[default]
    Default = 0,
    Hidden = 1,
    Arrow = 2,
    Custom = 3,
}

impl CursorStatus {
    pub fn raw(self) -> XPLMCursorStatus {
        self.to_i32().unwrap_or(xplm_CursorDefault)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromPrimitive, ToPrimitive)]
pub enum WindowDecoration {
    None = 0,
    #[default]
    RoundRectangle = 1,
    SelfDecorated = 2,
    SelfDecoratedResizable = 3,
}

impl WindowDecoration {
    pub fn raw(self) -> XPLMWindowDecoration {
        self.to_i32().unwrap_or(xplm_WindowDecorationRoundRectangle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromPrimitive, ToPrimitive)]
pub enum WindowLayer {
    FlightOverlay = 0,
    #[default]
    FloatingWindows = 1,
    Modal = 2,
    GrowlNotifications = 3,
}

impl WindowLayer {
    pub fn raw(self) -> XPLMWindowLayer {
        self.to_i32().unwrap_or(xplm_WindowLayerFloatingWindows)
    }
}

/// Modifier and transition bits delivered with key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyFlags(pub XPLMKeyFlags);

impl KeyFlags {
    pub fn shift(self) -> bool {
        self.0 & xplm_ShiftFlag != 0
    }

    pub fn option_alt(self) -> bool {
        self.0 & xplm_OptionAltFlag != 0
    }

    pub fn control(self) -> bool {
        self.0 & xplm_ControlFlag != 0
    }

    pub fn down(self) -> bool {
        self.0 & xplm_DownFlag != 0
    }

    pub fn up(self) -> bool {
        self.0 & xplm_UpFlag != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_messages() {
        assert_eq!(
            HostMessage::from_raw(XPLM_MSG_PLANE_LOADED),
            Some(HostMessage::PlaneLoaded)
        );
        assert_eq!(
            HostMessage::from_raw(XPLM_MSG_DATAREFS_ADDED),
            Some(HostMessage::DatarefsAdded)
        );
    }

    #[test]
    fn unknown_messages_decode_to_none() {
        assert_eq!(HostMessage::from_raw(MSG_ADD_DATAREF), None);
        assert_eq!(HostMessage::from_raw(0), None);
    }

    #[test]
    fn draw_phase_round_trips_through_raw() {
        assert_eq!(DrawPhase::Window.raw(), xplm_Phase_Window);
        assert_eq!(DrawPhase::from_raw(xplm_Phase_Gauges), Some(DrawPhase::Gauges));
        assert_eq!(DrawPhase::from_raw(7), None);
    }

    #[test]
    fn mouse_up_is_not_pressed() {
        assert!(MouseStatus::from_raw(xplm_MouseDown).unwrap().is_pressed());
        assert!(MouseStatus::from_raw(xplm_MouseDrag).unwrap().is_pressed());
        assert!(!MouseStatus::from_raw(xplm_MouseUp).unwrap().is_pressed());
    }

    #[test]
    fn key_flags_expose_bits() {
        let flags = KeyFlags(xplm_ShiftFlag | xplm_DownFlag);
        assert!(flags.shift());
        assert!(flags.down());
        assert!(!flags.control());
        assert!(!flags.up());
    }
}
