//! The plugin lifecycle and the glue behind [`plugin_main!`](crate::plugin_main).
//!
//! The host calls the five `XPlugin*` entry points without any user data, so
//! the handler instance is parked in a thread-local slot between calls. All
//! other state reaches callbacks through their refcon.

use std::cell::RefCell;
use std::ffi::c_void;
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, error, info, trace};

use crate::ffi::{copy_str_to_host_buffer, HOST_STRING_CAPACITY};
use crate::host::PluginId;
use crate::info::PluginInfo;
use crate::log::LogSink;
use crate::messages::HostMessage;

/// Lifecycle of a plugin as driven by the host.
///
/// Errors returned from [`start`](PluginHandler::start) and
/// [`enable`](PluginHandler::enable) are logged and reported to the host as a
/// failed call; the host then keeps the plugin stopped or disabled.
pub trait PluginHandler: 'static {
    fn info() -> PluginInfo
    where
        Self: Sized;

    /// Called once when the plugin is loaded.
    fn start() -> anyhow::Result<Self>
    where
        Self: Sized;

    fn enable(&mut self) -> anyhow::Result<()>;

    fn disable(&mut self);

    /// Called once before the plugin is unloaded. Must release everything.
    fn stop(&mut self);

    fn receive_message(&mut self, from: PluginId, message: c_int, _param: *mut c_void) {
        match HostMessage::from_raw(message) {
            Some(message) => debug!(?message, from = from.0, "host message"),
            None => trace!(message, from = from.0, "unhandled message"),
        }
    }
}

thread_local! {
    static INSTANCE: RefCell<Option<Box<dyn PluginHandler>>> = const { RefCell::new(None) };
}

fn install(handler: Box<dyn PluginHandler>) {
    INSTANCE.with(|cell| *cell.borrow_mut() = Some(handler));
}

fn with_instance<R>(f: impl FnOnce(&mut dyn PluginHandler) -> R) -> Option<R> {
    INSTANCE.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        match slot.as_deref_mut() {
            Some(handler) => Some(f(handler)),
            None => None,
        }
    })
}

/// # Safety
///
/// The three pointers must be the host's 256-byte output buffers.
pub unsafe fn start<H: PluginHandler>(
    out_name: *mut c_char,
    out_sig: *mut c_char,
    out_desc: *mut c_char,
) -> c_int {
    unsafe { start_with_sink::<H>(out_name, out_sig, out_desc, crate::host::debug_string) }
}

/// [`start`] with log lines going to `sink` instead of the host log.
///
/// # Safety
///
/// Same as [`start`].
pub unsafe fn start_with_sink<H: PluginHandler>(
    out_name: *mut c_char,
    out_sig: *mut c_char,
    out_desc: *mut c_char,
    sink: LogSink,
) -> c_int {
    let info = H::info();
    unsafe {
        copy_str_to_host_buffer(out_name.cast(), HOST_STRING_CAPACITY, &info.name);
        copy_str_to_host_buffer(out_sig.cast(), HOST_STRING_CAPACITY, &info.signature);
        copy_str_to_host_buffer(out_desc.cast(), HOST_STRING_CAPACITY, &info.description);
    }

    crate::log::init(&info.name, sink);

    match catch_unwind(H::start) {
        Ok(Ok(handler)) => {
            install(Box::new(handler));
            info!(signature = %info.signature, "started");
            1
        }
        Ok(Err(err)) => {
            error!("start failed: {err:#}");
            0
        }
        Err(_) => {
            error!("start panicked");
            0
        }
    }
}

pub fn stop() {
    let instance = INSTANCE.with(|cell| cell.borrow_mut().take());
    if let Some(mut handler) = instance {
        if catch_unwind(AssertUnwindSafe(|| handler.stop())).is_err() {
            error!("stop panicked");
        }
        info!("stopped");
    }
}

pub fn enable() -> c_int {
    let result = with_instance(|handler| catch_unwind(AssertUnwindSafe(|| handler.enable())));
    match result {
        Some(Ok(Ok(()))) => 1,
        Some(Ok(Err(err))) => {
            error!("enable failed: {err:#}");
            0
        }
        Some(Err(_)) => {
            error!("enable panicked");
            0
        }
        None => 0,
    }
}

pub fn disable() {
    let result = with_instance(|handler| catch_unwind(AssertUnwindSafe(|| handler.disable())));
    if let Some(Err(_)) = result {
        error!("disable panicked");
    }
}

pub fn receive_message(from: c_int, message: c_int, param: *mut c_void) {
    let result = with_instance(|handler| {
        catch_unwind(AssertUnwindSafe(|| {
            handler.receive_message(PluginId(from), message, param)
        }))
    });
    if let Some(Err(_)) = result {
        error!("receive_message panicked");
    }
}

/// Export the `XPlugin*` entry points for a [`PluginHandler`].
///
/// ```rust,ignore
/// xplm_core::plugin_main!(MyPlugin);
/// ```
#[macro_export]
macro_rules! plugin_main {
    ($handler:ty) => {
        #[no_mangle]
        pub unsafe extern "C" fn XPluginStart(
            out_name: *mut ::std::os::raw::c_char,
            out_sig: *mut ::std::os::raw::c_char,
            out_desc: *mut ::std::os::raw::c_char,
        ) -> ::std::os::raw::c_int {
            unsafe { $crate::handler::start::<$handler>(out_name, out_sig, out_desc) }
        }

        #[no_mangle]
        pub extern "C" fn XPluginStop() {
            $crate::handler::stop()
        }

        #[no_mangle]
        pub extern "C" fn XPluginEnable() -> ::std::os::raw::c_int {
            $crate::handler::enable()
        }

        #[no_mangle]
        pub extern "C" fn XPluginDisable() {
            $crate::handler::disable()
        }

        #[no_mangle]
        pub extern "C" fn XPluginReceiveMessage(
            in_from: ::std::os::raw::c_int,
            in_message: ::std::os::raw::c_int,
            in_param: *mut ::std::ffi::c_void,
        ) {
            $crate::handler::receive_message(in_from, in_message, in_param)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Default)]
    struct Events {
        enabled: usize,
        disabled: usize,
        stopped: usize,
    }

    struct Recorder {
        events: Rc<RefCell<Events>>,
        fail_enable: bool,
        panic_enable: bool,
    }

    impl Recorder {
        fn install(fail_enable: bool, panic_enable: bool) -> Rc<RefCell<Events>> {
            let events = Rc::new(RefCell::new(Events::default()));
            install(Box::new(Recorder {
                events: events.clone(),
                fail_enable,
                panic_enable,
            }));
            events
        }
    }

    impl PluginHandler for Recorder {
        fn info() -> PluginInfo {
            PluginInfo {
                name: "Recorder".to_string(),
                signature: "test.recorder".to_string(),
                description: String::new(),
            }
        }

        fn start() -> anyhow::Result<Self> {
            anyhow::bail!("not started through the host in tests")
        }

        fn enable(&mut self) -> anyhow::Result<()> {
            if self.panic_enable {
                panic!("enable exploded");
            }
            self.events.borrow_mut().enabled += 1;
            if self.fail_enable {
                anyhow::bail!("no window");
            }
            Ok(())
        }

        fn disable(&mut self) {
            self.events.borrow_mut().disabled += 1;
        }

        fn stop(&mut self) {
            self.events.borrow_mut().stopped += 1;
        }
    }

    fn discard(_line: &str) {}

    fn host_buffers() -> [[c_char; HOST_STRING_CAPACITY]; 3] {
        [[0x7f; HOST_STRING_CAPACITY]; 3]
    }

    fn start_into<H: PluginHandler>(buffers: &mut [[c_char; HOST_STRING_CAPACITY]; 3]) -> c_int {
        let [name, sig, desc] = buffers;
        unsafe {
            start_with_sink::<H>(name.as_mut_ptr(), sig.as_mut_ptr(), desc.as_mut_ptr(), discard)
        }
    }

    fn c_text(buffer: &[c_char]) -> String {
        let end = buffer
            .iter()
            .position(|&c| c == 0)
            .expect("buffer is NUL-terminated");
        buffer[..end].iter().map(|&c| c as u8 as char).collect()
    }

    fn has_instance() -> bool {
        INSTANCE.with(|cell| cell.borrow().is_some())
    }

    struct Starts;

    impl PluginHandler for Starts {
        fn info() -> PluginInfo {
            PluginInfo {
                name: "Starts".to_string(),
                signature: "test.starts".to_string(),
                description: "x".repeat(2 * HOST_STRING_CAPACITY),
            }
        }

        fn start() -> anyhow::Result<Self> {
            Ok(Starts)
        }

        fn enable(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn disable(&mut self) {}

        fn stop(&mut self) {}
    }

    struct FailsToStart;

    impl PluginHandler for FailsToStart {
        fn info() -> PluginInfo {
            PluginInfo {
                name: "FailsToStart".to_string(),
                signature: "test.fails".to_string(),
                description: String::new(),
            }
        }

        fn start() -> anyhow::Result<Self> {
            anyhow::bail!("no GL context")
        }

        fn enable(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn disable(&mut self) {}

        fn stop(&mut self) {}
    }

    struct PanicsOnStart;

    impl PluginHandler for PanicsOnStart {
        fn info() -> PluginInfo {
            PluginInfo {
                name: "PanicsOnStart".to_string(),
                signature: "test.panics".to_string(),
                description: String::new(),
            }
        }

        fn start() -> anyhow::Result<Self> {
            panic!("start exploded")
        }

        fn enable(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn disable(&mut self) {}

        fn stop(&mut self) {}
    }

    #[test]
    fn successful_start_installs_instance_and_fills_buffers() {
        let mut buffers = host_buffers();

        assert_eq!(start_into::<Starts>(&mut buffers), 1);

        assert!(has_instance());
        assert_eq!(c_text(&buffers[0]), "Starts");
        assert_eq!(c_text(&buffers[1]), "test.starts");
        assert_eq!(c_text(&buffers[2]).len(), HOST_STRING_CAPACITY - 1);
        assert_eq!(enable(), 1);
        stop();
        assert!(!has_instance());
    }

    #[test]
    fn failed_start_reports_zero_and_installs_nothing() {
        let mut buffers = host_buffers();

        assert_eq!(start_into::<FailsToStart>(&mut buffers), 0);

        assert!(!has_instance());
        assert_eq!(c_text(&buffers[0]), "FailsToStart");
        assert_eq!(c_text(&buffers[2]), "");
        assert_eq!(enable(), 0);
    }

    #[test]
    fn panicking_start_reports_zero() {
        let mut buffers = host_buffers();

        assert_eq!(start_into::<PanicsOnStart>(&mut buffers), 0);

        assert!(!has_instance());
        assert_eq!(c_text(&buffers[1]), "test.panics");
    }

    #[test]
    fn lifecycle_reaches_installed_handler() {
        let events = Recorder::install(false, false);

        assert_eq!(enable(), 1);
        disable();
        receive_message(3, 102, std::ptr::null_mut());
        stop();

        let events = events.borrow();
        assert_eq!((events.enabled, events.disabled, events.stopped), (1, 1, 1));
    }

    #[test]
    fn failed_enable_reports_zero() {
        let events = Recorder::install(true, false);

        assert_eq!(enable(), 0);
        assert_eq!(events.borrow().enabled, 1);
        stop();
    }

    #[test]
    fn panicking_enable_reports_zero() {
        Recorder::install(false, true);

        assert_eq!(enable(), 0);
        stop();
    }

    #[test]
    fn calls_without_instance_are_ignored() {
        stop();

        assert_eq!(enable(), 0);
        disable();
        receive_message(0, 101, std::ptr::null_mut());
    }

    #[test]
    fn stop_empties_the_slot() {
        let events = Recorder::install(false, false);

        stop();
        stop();

        assert_eq!(events.borrow().stopped, 1);
        assert_eq!(enable(), 0);
    }
}
