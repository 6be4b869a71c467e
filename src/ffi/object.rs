//! Object lifecycle - `TestClass` construction, methods and release
//!
//! Objects live in a process-wide handle table. Managed code holds only the
//! handle id; every method call resolves it and fails with
//! `DisposedHandle` once the object has been released.

use super::handle::HandleTable;
use super::{check_out, guard};
use crate::config::{self, DoubleReleasePolicy};
use crate::errors::{BridgeError, BridgeStatus};
use crate::interop::{self, NativeHandle};
use crate::logging::{debug, log_handle_alloc, log_handle_release};
use crate::native::TestClass;
use once_cell::sync::Lazy;

static TEST_CLASSES: Lazy<HandleTable<TestClass>> = Lazy::new(|| HandleTable::new("TestClass"));

pub(crate) fn objects() -> &'static HandleTable<TestClass> {
    &TEST_CLASSES
}

/// Number of `TestClass` objects currently alive
pub fn live_objects() -> usize {
    TEST_CLASSES.len()
}

/// Store a native object and hand out its handle
pub(crate) fn register(obj: TestClass) -> Result<NativeHandle, BridgeError> {
    let limit = config::with_settings(|c| c.handles.max_live);
    let handle = TEST_CLASSES.insert(obj, limit)?;
    interop::record_handle_alloc();
    log_handle_alloc(TEST_CLASSES.kind(), handle.as_raw(), TEST_CLASSES.len());
    Ok(handle)
}

fn release(handle: NativeHandle) -> Result<(), BridgeError> {
    match TEST_CLASSES.remove(handle) {
        Ok(obj) => {
            drop(obj);
            interop::record_handle_release();
            log_handle_release(TEST_CLASSES.kind(), handle.as_raw(), TEST_CLASSES.len());
            Ok(())
        }
        Err(BridgeError::DisposedHandle { handle: id }) => {
            match config::with_settings(|c| c.handles.double_release) {
                DoubleReleasePolicy::Ignore => {
                    debug!(target: "handles", handle = id, "ignoring repeated release");
                    Ok(())
                }
                DoubleReleasePolicy::Report => Err(BridgeError::disposed(id)),
            }
        }
        Err(err) => Err(err),
    }
}

/// Release every live object, returning how many were still alive
pub(crate) fn release_all() -> usize {
    let released = TEST_CLASSES.clear();
    for _ in 0..released {
        interop::record_handle_release();
    }
    released
}

/// Construct a `TestClass`
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_test_class_new(out: *mut NativeHandle) -> BridgeStatus {
    guard("dotbridge_test_class_new", 0, || {
        check_out(out, "TestClass handle")?;
        let handle = register(TestClass::new())?;
        out.write(handle);
        Ok(())
    })
}

/// Release a `TestClass`
///
/// Releasing the null handle is a no-op. Releasing an already released
/// handle reports `DisposedHandle` unless the configuration says to ignore
/// it.
#[no_mangle]
pub extern "C" fn dotbridge_test_class_free(handle: NativeHandle) -> BridgeStatus {
    guard("dotbridge_test_class_free", 1, || {
        if handle.is_null() {
            return Ok(());
        }
        release(handle)
    })
}

/// Duplicate a `TestClass` into a new, independently owned handle
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_test_class_clone(
    handle: NativeHandle,
    out: *mut NativeHandle,
) -> BridgeStatus {
    guard("dotbridge_test_class_clone", 1, || {
        check_out(out, "TestClass handle")?;
        let copy = TEST_CLASSES.with(handle, TestClass::clone)?;
        let new_handle = register(copy)?;
        out.write(new_handle);
        Ok(())
    })
}

#[no_mangle]
pub extern "C" fn dotbridge_test_class_print(handle: NativeHandle) -> BridgeStatus {
    guard("dotbridge_test_class_print", 1, || {
        TEST_CLASSES.with(handle, TestClass::print)
    })
}

#[no_mangle]
pub extern "C" fn dotbridge_test_class_increment(handle: NativeHandle) -> BridgeStatus {
    guard("dotbridge_test_class_increment", 1, || {
        TEST_CLASSES.with_mut(handle, TestClass::increment)
    })
}

#[no_mangle]
pub extern "C" fn dotbridge_test_class_add(handle: NativeHandle, value: i32) -> BridgeStatus {
    guard("dotbridge_test_class_add", 2, || {
        TEST_CLASSES.with_mut(handle, |obj| obj.add(value))
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_test_class_get(handle: NativeHandle, out: *mut i32) -> BridgeStatus {
    guard("dotbridge_test_class_get", 1, || {
        check_out(out, "TestClass value")?;
        let value = TEST_CLASSES.with(handle, TestClass::get)?;
        out.write(value);
        Ok(())
    })
}
