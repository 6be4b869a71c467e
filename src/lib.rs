//! dotbridge - a managed/native interop bridge
//!
//! Exposes a small native library (`native`) to a managed runtime through
//! a stable C ABI (`ffi`). The `managed` module holds the proxies a managed
//! caller would use, written purely against that ABI.
//!
//! Layers, bottom up:
//! - `native` - plain Rust, no knowledge of the boundary
//! - `interop` - `#[repr(C)]` transfer types, transcoding, call descriptors
//! - `ffi` - `extern "C"` exports, handle table, status codes
//! - `managed` - safe proxies (`TestClass`, `TestStaticClass`, `Bridge`)

pub mod config;
pub mod errors;
pub mod ffi;
pub mod interop;
pub mod logging;
pub mod managed;
pub mod native;

pub use config::{BridgeConfig, DoubleReleasePolicy};
pub use errors::{BridgeError, BridgeStatus, MarshalError, Result};
pub use interop::{stats, FfiType, InteropStats, NativeHandle};
pub use managed::{Bridge, ManagedOption, ManagedString, ManagedValue, TestClass, TestStaticClass};

use logging::{info, warn, WorkerGuard};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

static LOG_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Install `config` and start logging
///
/// Keep the returned guard alive while logging to files.
pub fn init(config: BridgeConfig) -> Option<WorkerGuard> {
    let log_config = config.log_config();
    config::install(config);
    let guard = logging::init_logging(log_config);
    info!(version = env!("CARGO_PKG_VERSION"), "dotbridge initialized");
    guard
}

/// Release every live object, returning how many had leaked
pub fn shutdown() -> usize {
    let leaked = ffi::release_all();
    if leaked > 0 {
        warn!(target: "handles", leaked, "objects still alive at shutdown");
    }
    leaked
}

/// Bridge initialization for hosts loading the shared library
///
/// Picks up `.dotbridge.toml` from the working directory or its parents.
#[no_mangle]
pub extern "C" fn dotbridge_init() {
    let guard = init(BridgeConfig::discover());
    *LOG_GUARD.lock() = guard;
}

/// Bridge cleanup
#[no_mangle]
pub extern "C" fn dotbridge_cleanup() {
    shutdown();
    LOG_GUARD.lock().take();
}
