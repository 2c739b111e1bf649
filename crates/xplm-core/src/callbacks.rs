//! Trampolines that turn the host's `extern "C"` callbacks into method calls.
//!
//! Every callback target lives in a `RefCell<T>` whose address is handed to
//! the host as the opaque `refcon`. The host passes it back unchanged, so the
//! trampoline can recover `&mut T` without any global state.

use std::cell::RefCell;
use std::ffi::c_void;
use std::os::raw::c_int;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{error, warn};

use crate::messages::DrawPhase;

/// The `refcon` to register for a callback target.
///
/// The cell must stay at the same address until every callback registered
/// with this refcon has been unregistered.
pub fn refcon_of<T>(target: &RefCell<T>) -> *mut c_void {
    target as *const RefCell<T> as *mut c_void
}

/// Run `f` on the target behind `refcon`.
///
/// Returns `None` for a null refcon, for a reentrant call while the target is
/// already borrowed, and when `f` panics. Panics never cross the C boundary.
///
/// # Safety
///
/// `refcon` must be null or have been produced by [`refcon_of`] for a
/// `RefCell<T>` that is still alive.
pub unsafe fn with_refcon<T, R>(refcon: *mut c_void, f: impl FnOnce(&mut T) -> R) -> Option<R> {
    let cell = unsafe { (refcon as *const RefCell<T>).as_ref() }?;
    let mut target = match cell.try_borrow_mut() {
        Ok(target) => target,
        Err(_) => {
            warn!("ignoring reentrant host callback");
            return None;
        }
    };
    match catch_unwind(AssertUnwindSafe(|| f(&mut target))) {
        Ok(result) => Some(result),
        Err(_) => {
            error!("host callback panicked");
            None
        }
    }
}

/// Receives draw-phase callbacks.
pub trait DrawHandler {
    /// Draw for `phase`. For "before" registrations, returning `false` asks
    /// the host to skip its own drawing for the phase.
    fn draw(&mut self, phase: Option<DrawPhase>, before: bool) -> bool;
}

/// Receives clicks on the items of a menu.
pub trait MenuHandler {
    fn menu_item_clicked(&mut self, item_ref: *mut c_void);
}

/// Backs an int data accessor.
pub trait IntAccessor {
    fn read_int(&mut self) -> i32;
    fn write_int(&mut self, value: i32);
}

/// # Safety
///
/// Only the host calls this, with the refcon registered alongside it.
pub unsafe extern "C" fn draw_callback<T: DrawHandler>(
    phase: c_int,
    is_before: c_int,
    refcon: *mut c_void,
) -> c_int {
    let keep_drawing = unsafe {
        with_refcon::<T, _>(refcon, |target| {
            target.draw(DrawPhase::from_raw(phase), is_before != 0)
        })
    };
    keep_drawing.unwrap_or(true) as c_int
}

/// # Safety
///
/// Only the host calls this, with the menu refcon registered alongside it.
pub unsafe extern "C" fn menu_callback<T: MenuHandler>(menu_ref: *mut c_void, item_ref: *mut c_void) {
    unsafe { with_refcon::<T, _>(menu_ref, |target| target.menu_item_clicked(item_ref)) };
}

/// # Safety
///
/// Only the host calls this, with the read refcon registered alongside it.
pub unsafe extern "C" fn read_int_callback<T: IntAccessor>(refcon: *mut c_void) -> c_int {
    unsafe { with_refcon::<T, _>(refcon, |target| target.read_int()) }.unwrap_or(0)
}

/// # Safety
///
/// Only the host calls this, with the write refcon registered alongside it.
pub unsafe extern "C" fn write_int_callback<T: IntAccessor>(refcon: *mut c_void, value: c_int) {
    unsafe { with_refcon::<T, _>(refcon, |target| target.write_int(value)) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::*;

    #[derive(Default)]
    struct Counter {
        draws: Vec<(Option<DrawPhase>, bool)>,
        clicks: usize,
        value: i32,
    }

    impl DrawHandler for Counter {
        fn draw(&mut self, phase: Option<DrawPhase>, before: bool) -> bool {
            self.draws.push((phase, before));
            true
        }
    }

    impl MenuHandler for Counter {
        fn menu_item_clicked(&mut self, _item_ref: *mut c_void) {
            self.clicks += 1;
        }
    }

    impl IntAccessor for Counter {
        fn read_int(&mut self) -> i32 {
            self.value
        }

        fn write_int(&mut self, value: i32) {
            self.value = value;
        }
    }

    #[test]
    fn draw_trampoline_reaches_target() {
        let target = RefCell::new(Counter::default());
        let refcon = refcon_of(&target);

        let ret = unsafe { draw_callback::<Counter>(xplm_Phase_Window, 0, refcon) };

        assert_eq!(ret, 1);
        assert_eq!(target.borrow().draws, vec![(Some(DrawPhase::Window), false)]);
    }

    #[test]
    fn accessor_trampolines_round_trip_value() {
        let target = RefCell::new(Counter::default());
        let refcon = refcon_of(&target);

        unsafe { write_int_callback::<Counter>(refcon, 7) };

        assert_eq!(unsafe { read_int_callback::<Counter>(refcon) }, 7);
    }

    #[test]
    fn menu_trampoline_counts_clicks() {
        let target = RefCell::new(Counter::default());
        let refcon = refcon_of(&target);

        unsafe {
            menu_callback::<Counter>(refcon, std::ptr::null_mut());
            menu_callback::<Counter>(refcon, std::ptr::null_mut());
        }

        assert_eq!(target.borrow().clicks, 2);
    }

    #[test]
    fn null_refcon_is_ignored() {
        let ret = unsafe { draw_callback::<Counter>(xplm_Phase_Window, 1, std::ptr::null_mut()) };
        assert_eq!(ret, 1);
        assert_eq!(unsafe { read_int_callback::<Counter>(std::ptr::null_mut()) }, 0);
    }

    #[test]
    fn reentrant_call_is_skipped() {
        let target = RefCell::new(Counter::default());
        let refcon = refcon_of(&target);

        let _held = target.borrow_mut();
        let result = unsafe { with_refcon::<Counter, _>(refcon, |c| c.value) };

        assert!(result.is_none());
    }

    #[test]
    fn panics_do_not_escape() {
        let target = RefCell::new(Counter::default());
        let refcon = refcon_of(&target);

        let result = unsafe { with_refcon::<Counter, ()>(refcon, |_| panic!("boom")) };

        assert!(result.is_none());
        assert!(target.try_borrow_mut().is_ok());
    }
}
