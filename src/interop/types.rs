//! Boundary types
//!
//! Everything that crosses the C ABI is one of these `#[repr(C)]` shapes.
//! Views (`RStr`, `RSlice`) borrow caller memory for one call. Owned
//! buffers (`RString`, `RVec`) are allocated by the native side and must be
//! handed back to the matching `dotbridge_*_free` export.

use crate::errors::MarshalError;
use std::fmt;
use std::mem::ManuallyDrop;

/// Opaque reference to a native object
///
/// `0` is the null handle. Live ids are issued by a handle table and are
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct NativeHandle(u64);

impl NativeHandle {
    pub const NULL: Self = Self(0);

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Reject the null handle before dispatch
    #[inline]
    pub fn non_null(self) -> Result<Self, MarshalError> {
        if self.is_null() {
            Err(MarshalError::NullHandle)
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Borrowed UTF-8 text
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct RStr {
    pub ptr: *const u8,
    pub len: usize,
}

impl RStr {
    #[inline]
    pub const fn null() -> Self {
        Self { ptr: std::ptr::null(), len: 0 }
    }

    /// View over `s`; valid while `s` is
    #[inline]
    pub fn new(s: &str) -> Self {
        Self { ptr: s.as_ptr(), len: s.len() }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

impl Default for RStr {
    fn default() -> Self {
        Self::null()
    }
}

/// Owned UTF-8 text allocated by the native side
#[derive(Debug)]
#[repr(C)]
pub struct RString {
    pub ptr: *mut u8,
    pub len: usize,
    pub cap: usize,
}

impl RString {
    /// Placeholder for out-parameters
    #[inline]
    pub const fn empty() -> Self {
        Self { ptr: std::ptr::null_mut(), len: 0, cap: 0 }
    }

    pub fn from_string(s: String) -> Self {
        let mut s = ManuallyDrop::new(s);
        Self { ptr: s.as_mut_ptr(), len: s.len(), cap: s.capacity() }
    }

    /// Reclaim the allocation
    ///
    /// # Safety
    /// `self` must come from `RString::from_string` and not have been
    /// reclaimed already.
    pub unsafe fn into_string(self) -> String {
        if self.ptr.is_null() {
            return String::new();
        }
        String::from_raw_parts(self.ptr, self.len, self.cap)
    }

    /// Borrow the text without taking ownership
    ///
    /// # Safety
    /// `self` must come from `RString::from_string` and still be live.
    pub unsafe fn as_str(&self) -> &str {
        if self.ptr.is_null() {
            return "";
        }
        let bytes = std::slice::from_raw_parts(self.ptr as *const u8, self.len);
        // Only ever built from a `String`.
        std::str::from_utf8_unchecked(bytes)
    }
}

impl Default for RString {
    fn default() -> Self {
        Self::empty()
    }
}

/// Borrowed sequence view
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct RSlice<T> {
    pub ptr: *const T,
    pub len: usize,
}

impl<T> RSlice<T> {
    #[inline]
    pub fn from_slice(items: &[T]) -> Self {
        Self { ptr: items.as_ptr(), len: items.len() }
    }

    #[inline]
    pub const fn null() -> Self {
        Self { ptr: std::ptr::null(), len: 0 }
    }
}

/// Owned sequence allocated by the native side
#[derive(Debug)]
#[repr(C)]
pub struct RVec<T> {
    pub ptr: *mut T,
    pub len: usize,
    pub cap: usize,
}

impl<T> RVec<T> {
    #[inline]
    pub const fn empty() -> Self {
        Self { ptr: std::ptr::null_mut(), len: 0, cap: 0 }
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        let mut items = ManuallyDrop::new(items);
        Self { ptr: items.as_mut_ptr(), len: items.len(), cap: items.capacity() }
    }

    /// # Safety
    /// `self` must come from `RVec::from_vec` and not have been reclaimed.
    pub unsafe fn into_vec(self) -> Vec<T> {
        if self.ptr.is_null() {
            return Vec::new();
        }
        Vec::from_raw_parts(self.ptr, self.len, self.cap)
    }

    /// # Safety
    /// `self` must come from `RVec::from_vec` and still be live.
    pub unsafe fn as_slice(&self) -> &[T] {
        if self.ptr.is_null() {
            return &[];
        }
        std::slice::from_raw_parts(self.ptr as *const T, self.len)
    }
}

/// Present-or-absent value at the boundary
///
/// When `is_some` is false `value` holds a placeholder and must not be read.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ROption<T> {
    pub is_some: bool,
    pub value: T,
}

impl<T> ROption<T> {
    #[inline]
    pub const fn some(value: T) -> Self {
        Self { is_some: true, value }
    }

    #[inline]
    pub fn into_option(self) -> Option<T> {
        if self.is_some {
            Some(self.value)
        } else {
            None
        }
    }
}

impl<T: Default> ROption<T> {
    #[inline]
    pub fn none() -> Self {
        Self { is_some: false, value: T::default() }
    }
}

impl<T: Default> Default for ROption<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T: Default> From<Option<T>> for ROption<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::some(v),
            None => Self::none(),
        }
    }
}

/// Type descriptor for exported signatures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FfiType {
    Void,
    I32,
    /// Owned text; the native side receives its own copy
    String,
    /// Borrowed text; the native side only reads it during the call
    Str,
    /// Handle to a native class
    Object(&'static str),
    SequenceI32,
    Optional(Box<FfiType>),
}

impl FfiType {
    pub fn optional(inner: FfiType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Types whose native representation owns heap memory
    pub fn needs_release(&self) -> bool {
        match self {
            Self::String | Self::Object(_) | Self::SequenceI32 => true,
            Self::Optional(inner) => inner.needs_release(),
            _ => false,
        }
    }
}

impl fmt::Display for FfiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "()"),
            Self::I32 => write!(f, "i32"),
            Self::String => write!(f, "String"),
            Self::Str => write!(f, "&str"),
            Self::Object(name) => write!(f, "{}", name),
            Self::SequenceI32 => write!(f, "Vec<i32>"),
            Self::Optional(inner) => write!(f, "Option<{}>", inner),
        }
    }
}
