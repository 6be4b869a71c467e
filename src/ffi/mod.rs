//! C FFI - stable ABI consumed by managed code
//!
//! Conventions shared by every export:
//! 1. Results are written through out-pointers; the return value is a
//!    `BridgeStatus` code (`0` on success).
//! 2. Arguments are validated before the native function runs.
//! 3. Native panics are contained and reported as `NativePanic`.
//! 4. The full error of the most recent failed call on a thread is kept in
//!    a thread-local slot (`dotbridge_last_error_message`).

mod handle;
mod memory;
mod object;
mod statics;

pub use handle::HandleTable;
pub use memory::{dotbridge_string_free, dotbridge_vec_i32_free};
pub use object::{
    dotbridge_test_class_add, dotbridge_test_class_clone, dotbridge_test_class_free,
    dotbridge_test_class_get, dotbridge_test_class_increment, dotbridge_test_class_new,
    dotbridge_test_class_print, live_objects,
};
pub use statics::{
    dotbridge_add, dotbridge_concat, dotbridge_concat_str, dotbridge_get_vec, dotbridge_hello,
    dotbridge_maybe_add_one, dotbridge_maybe_return_class, dotbridge_print_number,
    dotbridge_print_vec_len, dotbridge_test_obj_by_value,
};

pub(crate) use object::release_all;

use crate::errors::{BridgeError, BridgeStatus, MarshalError};
use crate::interop;
use crate::logging::{log_ffi_call, log_ffi_error, log_ffi_return};
use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

thread_local! {
    static LAST_ERROR: RefCell<Option<BridgeError>> = const { RefCell::new(None) };
}

fn set_last_error(err: BridgeError) {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(err));
}

fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Take the error recorded by the last failed call on this thread
pub fn take_last_error() -> Option<BridgeError> {
    LAST_ERROR.with(|slot| slot.borrow_mut().take())
}

/// Status code of the last call on this thread (`0` if it succeeded)
#[no_mangle]
pub extern "C" fn dotbridge_last_error_code() -> i32 {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(BridgeStatus::Ok, BridgeError::status)
            .code()
    })
}

/// Copy the last error message into `buf`
///
/// Returns the full message length in bytes; at most `cap` bytes are copied
/// and no terminator is written. Returns 0 when there is no error.
///
/// # Safety
/// `buf` must be null or point to `cap` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_last_error_message(buf: *mut u8, cap: usize) -> usize {
    LAST_ERROR.with(|slot| {
        let slot = slot.borrow();
        let Some(err) = slot.as_ref() else {
            return 0;
        };

        let message = err.to_string();
        if !buf.is_null() {
            let n = message.len().min(cap);
            std::ptr::copy_nonoverlapping(message.as_ptr(), buf, n);
        }
        message.len()
    })
}

/// Run one export body with panic containment, logging and error recording
pub(crate) fn guard<F>(function: &'static str, args_count: usize, body: F) -> BridgeStatus
where
    F: FnOnce() -> Result<(), BridgeError>,
{
    log_ffi_call(function, args_count);
    interop::record_call();
    clear_last_error();

    let result = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => Err(BridgeError::NativePanic {
            function: function.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    };

    match result {
        Ok(()) => {
            log_ffi_return(function, true);
            BridgeStatus::Ok
        }
        Err(err) => {
            if err.is_marshal() {
                interop::record_marshal_error();
            }
            log_ffi_error(function, &err.to_string());
            let status = err.status();
            set_last_error(err);
            status
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Reject a null out-pointer before dispatch
#[inline]
pub(crate) fn check_out<T>(out: *mut T, what: &'static str) -> Result<(), MarshalError> {
    if out.is_null() {
        Err(MarshalError::NullPointer { what })
    } else {
        Ok(())
    }
}

pub(crate) fn max_string_bytes() -> usize {
    crate::config::with_settings(|c| c.marshal.max_string_bytes)
}

pub(crate) fn max_sequence_len() -> usize {
    crate::config::with_settings(|c| c.marshal.max_sequence_len)
}
