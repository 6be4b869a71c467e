//! Bridge error taxonomy
//!
//! Every failure that can cross the boundary maps to exactly one
//! `BridgeError` variant and one `BridgeStatus` wire code.

use std::fmt;

/// Failures detected while converting data at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    NullPointer { what: &'static str },
    Misaligned { what: &'static str },
    NullHandle,
    InvalidUtf8 { valid_up_to: usize },
    InvalidUtf16 { index: usize },
    TooLong { what: &'static str, len: usize, max: usize },
    TypeMismatch { param: usize, expected: String, found: String },
    ArgCountMismatch { function: String, expected: usize, found: usize },
    UnknownFunction { name: String },
    /// A failed status arrived with no recorded error
    Unspecified,
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullPointer { what } => write!(f, "null pointer passed for {}", what),
            Self::Misaligned { what } => write!(f, "misaligned pointer passed for {}", what),
            Self::NullHandle => write!(f, "null handle"),
            Self::InvalidUtf8 { valid_up_to } => {
                write!(f, "invalid UTF-8 after byte {}", valid_up_to)
            }
            Self::InvalidUtf16 { index } => {
                write!(f, "unpaired surrogate at UTF-16 index {}", index)
            }
            Self::TooLong { what, len, max } => {
                write!(f, "{} too long: {} exceeds limit of {}", what, len, max)
            }
            Self::TypeMismatch { param, expected, found } => {
                write!(f, "argument {}: expected {}, found {}", param, expected, found)
            }
            Self::ArgCountMismatch { function, expected, found } => {
                write!(f, "{} expects {} arguments, got {}", function, expected, found)
            }
            Self::UnknownFunction { name } => write!(f, "no exported function named '{}'", name),
            Self::Unspecified => write!(f, "marshal failure with no recorded detail"),
        }
    }
}

impl std::error::Error for MarshalError {}

/// Error surfaced to a managed caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Native construction failed
    Allocation { kind: &'static str, reason: String },
    /// Handle used after release
    DisposedHandle { handle: u64 },
    Marshal(MarshalError),
    /// `value()` on an absent optional
    AbsentValue { ty: &'static str },
    /// A native function panicked; the panic was contained at the boundary
    NativePanic { function: String, message: String },
}

impl BridgeError {
    pub fn allocation(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Allocation { kind, reason: reason.into() }
    }

    pub fn disposed(handle: u64) -> Self {
        Self::DisposedHandle { handle }
    }

    /// Wire code for this error
    pub fn status(&self) -> BridgeStatus {
        match self {
            Self::Allocation { .. } => BridgeStatus::AllocationFailed,
            Self::DisposedHandle { .. } => BridgeStatus::DisposedHandle,
            Self::Marshal(_) => BridgeStatus::MarshalFailed,
            Self::AbsentValue { .. } => BridgeStatus::AbsentValue,
            Self::NativePanic { .. } => BridgeStatus::NativePanic,
        }
    }

    pub fn is_marshal(&self) -> bool {
        matches!(self, Self::Marshal(_))
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { kind, reason } => {
                write!(f, "failed to allocate native {}: {}", kind, reason)
            }
            Self::DisposedHandle { handle } => {
                write!(f, "handle {:#x} used after release", handle)
            }
            Self::Marshal(err) => write!(f, "marshal error: {}", err),
            Self::AbsentValue { ty } => write!(f, "Option<{}> has no value", ty),
            Self::NativePanic { function, message } => {
                write!(f, "native function {} panicked: {}", function, message)
            }
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Marshal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MarshalError> for BridgeError {
    fn from(err: MarshalError) -> Self {
        Self::Marshal(err)
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Status code returned by every C ABI export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BridgeStatus {
    Ok = 0,
    AllocationFailed = -1,
    DisposedHandle = -2,
    MarshalFailed = -3,
    AbsentValue = -4,
    NativePanic = -5,
}

impl BridgeStatus {
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            -1 => Some(Self::AllocationFailed),
            -2 => Some(Self::DisposedHandle),
            -3 => Some(Self::MarshalFailed),
            -4 => Some(Self::AbsentValue),
            -5 => Some(Self::NativePanic),
            _ => None,
        }
    }
}

impl fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::AllocationFailed => "allocation failed",
            Self::DisposedHandle => "disposed handle",
            Self::MarshalFailed => "marshal failed",
            Self::AbsentValue => "absent value",
            Self::NativePanic => "native panic",
        };
        write!(f, "{} ({})", name, self.code())
    }
}
