//! Release of native buffers returned across the boundary

use crate::interop::{RString, RVec};
use crate::logging::trace;

/// Free a string returned by the bridge
///
/// # Safety
/// `s` must have been returned by a `dotbridge_*` export and not freed yet.
/// A null `s.ptr` is a no-op.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_string_free(s: RString) {
    if s.ptr.is_null() {
        return;
    }
    trace!(target: "marshal", len = s.len, "releasing native string");
    drop(s.into_string());
}

/// Free an `i32` sequence returned by the bridge
///
/// # Safety
/// `v` must have been returned by a `dotbridge_*` export and not freed yet.
/// A null `v.ptr` is a no-op.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_vec_i32_free(v: RVec<i32>) {
    if v.ptr.is_null() {
        return;
    }
    trace!(target: "marshal", len = v.len, "releasing native sequence");
    drop(v.into_vec());
}
