//! Interoperability - data shapes and conversions at the boundary
//!
//! Architecture:
//! - `types.rs` - `#[repr(C)]` transfer types and `FfiType` descriptors
//! - `marshal.rs` - UTF-16 ↔ UTF-8 transcoding, view validation
//! - `call.rs` - export signatures and argument checking

mod call;
mod marshal;
mod types;

pub use call::{BoundaryValue, FunctionCall, Signature};
pub use marshal::{managed_type_name, read_slice, read_str, utf16_to_utf8, utf8_to_utf16};
pub use types::{FfiType, NativeHandle, ROption, RSlice, RStr, RString, RVec};

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

static CALLS_MADE: AtomicUsize = AtomicUsize::new(0);
static MARSHALING_ERRORS: AtomicUsize = AtomicUsize::new(0);
static HANDLES_ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static HANDLES_RELEASED: AtomicUsize = AtomicUsize::new(0);

#[inline]
pub(crate) fn record_call() {
    CALLS_MADE.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn record_marshal_error() {
    MARSHALING_ERRORS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn record_handle_alloc() {
    HANDLES_ALLOCATED.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn record_handle_release() {
    HANDLES_RELEASED.fetch_add(1, Ordering::Relaxed);
}

/// Process-wide interop counters
pub fn stats() -> InteropStats {
    let handles_allocated = HANDLES_ALLOCATED.load(Ordering::Relaxed);
    let handles_released = HANDLES_RELEASED.load(Ordering::Relaxed);

    InteropStats {
        calls_made: CALLS_MADE.load(Ordering::Relaxed),
        marshaling_errors: MARSHALING_ERRORS.load(Ordering::Relaxed),
        handles_allocated,
        handles_released,
        handles_live: handles_allocated.saturating_sub(handles_released),
    }
}

/// Interop statistics for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InteropStats {
    pub calls_made: usize,
    pub marshaling_errors: usize,
    pub handles_allocated: usize,
    pub handles_released: usize,
    pub handles_live: usize,
}
