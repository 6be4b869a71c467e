//! Managed-side proxies
//!
//! What managed code sees of the native library. Every proxy goes through
//! the `ffi` exports only, so this layer exercises exactly the contract a
//! foreign runtime would: status codes, out-parameters, handles and
//! explicit release of returned buffers.
//!
//! Architecture:
//! - `string.rs` - UTF-16 `ManagedString`
//! - `option.rs` - `ManagedOption` with fail-fast `value()`
//! - `object.rs` - `TestClass` proxy owning one handle
//! - `statics.rs` - `TestStaticClass` static functions
//! - `dispatch.rs` - `Bridge`, a name-keyed table of exports

mod dispatch;
mod object;
mod option;
mod statics;
mod string;

pub use dispatch::{Bridge, ManagedValue};
pub use object::TestClass;
pub use option::ManagedOption;
pub use statics::TestStaticClass;
pub use string::ManagedString;

use crate::errors::{BridgeError, BridgeStatus, MarshalError, Result};
use crate::{ffi, interop};

/// Turn an export's status into a `Result`
///
/// The detailed error comes from the thread-local slot the export filled
/// in; the status alone is the fallback.
pub(crate) fn check(status: BridgeStatus) -> Result<()> {
    if status.is_ok() {
        return Ok(());
    }
    Err(ffi::take_last_error().unwrap_or_else(|| from_status(status)))
}

fn from_status(status: BridgeStatus) -> BridgeError {
    match status {
        BridgeStatus::AllocationFailed => BridgeError::allocation("object", "no detail recorded"),
        BridgeStatus::DisposedHandle => BridgeError::disposed(0),
        BridgeStatus::AbsentValue => BridgeError::AbsentValue { ty: "unknown" },
        BridgeStatus::NativePanic => BridgeError::NativePanic {
            function: "unknown".to_string(),
            message: "no detail recorded".to_string(),
        },
        BridgeStatus::MarshalFailed | BridgeStatus::Ok => {
            BridgeError::Marshal(MarshalError::Unspecified)
        }
    }
}

/// Transcode a managed string before the call, counting failures
pub(crate) fn marshal_text(text: &ManagedString) -> Result<String> {
    text.to_native().map_err(|err| {
        interop::record_marshal_error();
        BridgeError::from(err)
    })
}
