//! `TestClass` proxy

use super::check;
use crate::errors::{BridgeError, Result};
use crate::ffi::{
    dotbridge_test_class_add, dotbridge_test_class_clone, dotbridge_test_class_free,
    dotbridge_test_class_get, dotbridge_test_class_increment, dotbridge_test_class_new,
    dotbridge_test_class_print,
};
use crate::interop::NativeHandle;
use crate::logging::warn;

/// Managed proxy for one native `TestClass`
///
/// Owns its handle: `dispose` (or drop) releases the native object exactly
/// once. Any call after that fails with `DisposedHandle`.
#[derive(Debug)]
pub struct TestClass {
    handle: NativeHandle,
    released: bool,
}

impl TestClass {
    pub fn new() -> Result<Self> {
        let mut handle = NativeHandle::NULL;
        check(unsafe { dotbridge_test_class_new(&mut handle) })?;
        Ok(Self::adopt(handle))
    }

    pub(crate) fn adopt(handle: NativeHandle) -> Self {
        Self { handle, released: false }
    }

    /// Take ownership of a raw handle
    ///
    /// # Safety
    /// `handle` must be a live `TestClass` handle not owned by another
    /// proxy.
    pub unsafe fn from_raw(handle: NativeHandle) -> Self {
        Self::adopt(handle)
    }

    /// Give up ownership without releasing the native object
    pub fn into_raw(mut self) -> NativeHandle {
        self.released = true;
        self.handle
    }

    /// The live handle, or `DisposedHandle` once released
    pub fn handle(&self) -> Result<NativeHandle> {
        if self.released {
            Err(BridgeError::disposed(self.handle.as_raw()))
        } else {
            Ok(self.handle)
        }
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.released
    }

    pub fn print(&self) -> Result<()> {
        check(dotbridge_test_class_print(self.handle()?))
    }

    pub fn increment(&mut self) -> Result<()> {
        check(dotbridge_test_class_increment(self.handle()?))
    }

    pub fn add(&mut self, value: i32) -> Result<()> {
        check(dotbridge_test_class_add(self.handle()?, value))
    }

    pub fn get(&self) -> Result<i32> {
        let mut value = 0;
        check(unsafe { dotbridge_test_class_get(self.handle()?, &mut value) })?;
        Ok(value)
    }

    /// Duplicate into an independently owned object
    pub fn try_clone(&self) -> Result<Self> {
        let mut handle = NativeHandle::NULL;
        check(unsafe { dotbridge_test_class_clone(self.handle()?, &mut handle) })?;
        Ok(Self::adopt(handle))
    }

    /// Release the native object; repeated calls do nothing
    pub fn dispose(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        check(dotbridge_test_class_free(self.handle))
    }
}

impl Drop for TestClass {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            warn!(target: "handles", handle = self.handle.as_raw(), "release on drop failed: {}", err);
        }
    }
}
