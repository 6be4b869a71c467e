use dotbridge::config::{self, CONFIG_FILE_NAME};
use dotbridge::ffi::{dotbridge_test_class_free, dotbridge_test_class_new};
use dotbridge::interop::{NativeHandle, RStr, RString};
use dotbridge::logging::LogFormat;
use dotbridge::{BridgeConfig, BridgeStatus, DoubleReleasePolicy, TestStaticClass};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        r#"
[handles]
max_live = 8
double_release = "ignore"

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = BridgeConfig::load(&path).unwrap();
    assert_eq!(config.handles.max_live, 8);
    assert_eq!(config.handles.double_release, DoubleReleasePolicy::Ignore);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.marshal, BridgeConfig::default().marshal);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = BridgeConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.contains("Failed to read config"));
}

// Everything touching the process-wide configuration lives in this one test
// so the steps cannot interleave.
#[test]
fn test_installed_config_governs_the_abi() {
    let mut config = BridgeConfig::default();
    config.handles.double_release = DoubleReleasePolicy::Ignore;
    config.marshal.max_string_bytes = 4;
    config::install(config);

    let mut handle = NativeHandle::NULL;
    assert_eq!(unsafe { dotbridge_test_class_new(&mut handle) }, BridgeStatus::Ok);
    assert_eq!(dotbridge_test_class_free(handle), BridgeStatus::Ok);
    assert_eq!(dotbridge_test_class_free(handle), BridgeStatus::Ok);

    let mut out = RString::empty();
    let status = unsafe {
        dotbridge::ffi::dotbridge_concat(RStr::new("too long"), RStr::new(""), &mut out)
    };
    assert_eq!(status, BridgeStatus::MarshalFailed);
    assert!(TestStaticClass::concat(&"ab".into(), &"cd".into()).is_ok());

    let mut config = config::settings();
    config.handles.max_live = 1;
    config.marshal = BridgeConfig::default().marshal;
    config.handles.double_release = DoubleReleasePolicy::Report;
    config::install(config);

    let mut first = NativeHandle::NULL;
    let mut second = NativeHandle::NULL;
    assert_eq!(unsafe { dotbridge_test_class_new(&mut first) }, BridgeStatus::Ok);
    assert_eq!(
        unsafe { dotbridge_test_class_new(&mut second) },
        BridgeStatus::AllocationFailed
    );
    assert_eq!(dotbridge_test_class_free(first), BridgeStatus::Ok);
    assert_eq!(dotbridge_test_class_free(first), BridgeStatus::DisposedHandle);

    config::install(BridgeConfig::default());
}
