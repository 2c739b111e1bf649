//! Host protocol for X-Plane plugins.
//!
//! - [`ffi`] holds the XPLM constants, callback signatures and C structs.
//! - [`host::Host`] is the set of host operations a plugin performs;
//!   [`host::XplmHost`] forwards them to the simulator.
//! - [`callbacks`] and [`window`] turn host callbacks into trait method
//!   calls on a context object passed through the refcon.
//! - [`handler::PluginHandler`] plus [`plugin_main!`] export the lifecycle
//!   entry points.
//! - [`log`] routes `tracing` output to the host log.

pub mod callbacks;
pub mod ffi;
pub mod handler;
pub mod host;
pub mod info;
pub mod log;
pub mod messages;
pub mod sys;
pub mod window;

pub use callbacks::{refcon_of, DrawHandler, IntAccessor, MenuHandler};
pub use handler::PluginHandler;
pub use host::{DataRef, GraphicsState, Host, MenuId, MenuItem, PluginId, WindowId, XplmHost};
pub use info::PluginInfo;
pub use messages::{CursorStatus, DrawPhase, HostMessage, KeyFlags, MouseStatus, WindowDecoration, WindowLayer};
pub use window::{WindowCallbacks, WindowGeometry, WindowHandler, WindowSpec};
