//! Raw C ABI usage, the way a foreign runtime drives the library

use dotbridge::ffi::*;
use dotbridge::interop::{NativeHandle, ROption, RSlice, RStr, RString, RVec};
use dotbridge::native::console;
use dotbridge::{BridgeError, BridgeStatus, MarshalError};
use std::ptr;

fn last_message() -> String {
    let len = unsafe { dotbridge_last_error_message(ptr::null_mut(), 0) };
    let mut buf = vec![0u8; len];
    unsafe { dotbridge_last_error_message(buf.as_mut_ptr(), buf.len()) };
    String::from_utf8(buf).unwrap()
}

fn new_object() -> NativeHandle {
    let mut handle = NativeHandle::NULL;
    assert_eq!(unsafe { dotbridge_test_class_new(&mut handle) }, BridgeStatus::Ok);
    assert!(!handle.is_null());
    handle
}

#[test]
fn test_object_lifecycle() {
    let handle = new_object();
    assert_eq!(dotbridge_test_class_increment(handle), BridgeStatus::Ok);
    assert_eq!(dotbridge_test_class_add(handle, 10), BridgeStatus::Ok);

    let mut value = 0;
    assert_eq!(unsafe { dotbridge_test_class_get(handle, &mut value) }, BridgeStatus::Ok);
    assert_eq!(value, 11);

    assert_eq!(dotbridge_test_class_free(handle), BridgeStatus::Ok);
}

#[test]
fn test_use_after_free() {
    let handle = new_object();
    assert_eq!(dotbridge_test_class_free(handle), BridgeStatus::Ok);

    assert_eq!(dotbridge_test_class_print(handle), BridgeStatus::DisposedHandle);
    assert_eq!(dotbridge_last_error_code(), BridgeStatus::DisposedHandle.code());
    assert_eq!(
        take_last_error(),
        Some(BridgeError::disposed(handle.as_raw()))
    );
}

#[test]
fn test_double_free_is_reported() {
    let handle = new_object();
    assert_eq!(dotbridge_test_class_free(handle), BridgeStatus::Ok);
    assert_eq!(dotbridge_test_class_free(handle), BridgeStatus::DisposedHandle);
    assert!(last_message().contains("used after release"));
}

#[test]
fn test_free_null_is_noop() {
    assert_eq!(dotbridge_test_class_free(NativeHandle::NULL), BridgeStatus::Ok);
}

#[test]
fn test_free_null_clears_last_error() {
    assert_eq!(dotbridge_test_class_increment(NativeHandle::NULL), BridgeStatus::MarshalFailed);
    assert_eq!(dotbridge_last_error_code(), BridgeStatus::MarshalFailed.code());

    assert_eq!(dotbridge_test_class_free(NativeHandle::NULL), BridgeStatus::Ok);
    assert_eq!(dotbridge_last_error_code(), 0);
    assert_eq!(last_message(), "");
}

#[test]
fn test_null_handle_is_marshal_failure() {
    assert_eq!(dotbridge_test_class_increment(NativeHandle::NULL), BridgeStatus::MarshalFailed);
    assert_eq!(take_last_error(), Some(MarshalError::NullHandle.into()));
}

#[test]
fn test_null_out_pointer() {
    let status = unsafe { dotbridge_add(1, 2, ptr::null_mut()) };
    assert_eq!(status, BridgeStatus::MarshalFailed);
    assert_eq!(
        take_last_error(),
        Some(MarshalError::NullPointer { what: "add result" }.into())
    );

    let status = unsafe { dotbridge_test_class_new(ptr::null_mut()) };
    assert_eq!(status, BridgeStatus::MarshalFailed);
    assert!(matches!(take_last_error(), Some(BridgeError::Marshal(_))));
}

#[test]
fn test_clone_gives_independent_handle() {
    let a = new_object();
    assert_eq!(dotbridge_test_class_add(a, 5), BridgeStatus::Ok);

    let mut b = NativeHandle::NULL;
    assert_eq!(unsafe { dotbridge_test_class_clone(a, &mut b) }, BridgeStatus::Ok);
    assert_ne!(a, b);

    assert_eq!(dotbridge_test_class_free(a), BridgeStatus::Ok);
    let mut value = 0;
    assert_eq!(unsafe { dotbridge_test_class_get(b, &mut value) }, BridgeStatus::Ok);
    assert_eq!(value, 5);
    assert_eq!(dotbridge_test_class_free(b), BridgeStatus::Ok);
}

#[test]
fn test_strings_round_trip() {
    let a = "Concatenated ";
    let b = "String";
    let mut out = RString::empty();
    let status = unsafe { dotbridge_concat(RStr::new(a), RStr::new(b), &mut out) };
    assert_eq!(status, BridgeStatus::Ok);
    assert_eq!(unsafe { out.as_str() }, "Concatenated String");
    unsafe { dotbridge_string_free(out) };

    let mut out = RString::empty();
    let status = unsafe { dotbridge_concat_str(RStr::new(""), RStr::new(""), &mut out) };
    assert_eq!(status, BridgeStatus::Ok);
    assert_eq!(unsafe { out.as_str() }, "");
    unsafe { dotbridge_string_free(out) };
}

#[test]
fn test_invalid_utf8_is_rejected() {
    let bytes = [0xc3, 0x28];
    let bad = RStr { ptr: bytes.as_ptr(), len: bytes.len() };
    let mut out = RString::empty();

    let status = unsafe { dotbridge_concat_str(bad, RStr::new("x"), &mut out) };
    assert_eq!(status, BridgeStatus::MarshalFailed);
    assert!(out.ptr.is_null());
    assert_eq!(
        take_last_error(),
        Some(MarshalError::InvalidUtf8 { valid_up_to: 0 }.into())
    );
}

#[test]
fn test_sequences() {
    let items = [1, 2, 3, 4];
    let (status, out) =
        console::capture(|| unsafe { dotbridge_print_vec_len(RSlice::from_slice(&items)) });
    assert_eq!(status, BridgeStatus::Ok);
    assert_eq!(out, "Vec length: 4\n");

    let mut vec = RVec::empty();
    assert_eq!(unsafe { dotbridge_get_vec(&mut vec) }, BridgeStatus::Ok);
    assert_eq!(unsafe { vec.as_slice() }, &[1, 2, 3]);
    unsafe { dotbridge_vec_i32_free(vec) };

    // freeing an empty buffer is allowed
    unsafe { dotbridge_vec_i32_free(RVec::empty()) };
    unsafe { dotbridge_string_free(RString::empty()) };
}

#[test]
fn test_optionals() {
    let mut out: ROption<i32> = ROption::none();
    assert_eq!(unsafe { dotbridge_maybe_add_one(ROption::some(41), &mut out) }, BridgeStatus::Ok);
    assert_eq!(out.into_option(), Some(42));

    let mut out: ROption<i32> = ROption::none();
    assert_eq!(
        unsafe { dotbridge_maybe_add_one(ROption::some(i32::MAX), &mut out) },
        BridgeStatus::Ok
    );
    assert_eq!(out.into_option(), Some(i32::MIN));

    let mut out: ROption<i32> = ROption::some(7);
    assert_eq!(unsafe { dotbridge_maybe_add_one(ROption::none(), &mut out) }, BridgeStatus::Ok);
    assert_eq!(out.into_option(), None);

    let mut class: ROption<NativeHandle> = ROption::none();
    let status = unsafe { dotbridge_maybe_return_class(ROption::some(RStr::new("asdf")), &mut class) };
    assert_eq!(status, BridgeStatus::Ok);
    let handle = class.into_option().unwrap();
    assert_eq!(dotbridge_test_class_free(handle), BridgeStatus::Ok);

    let mut class: ROption<NativeHandle> = ROption::none();
    let status = unsafe { dotbridge_maybe_return_class(ROption::none(), &mut class) };
    assert_eq!(status, BridgeStatus::Ok);
    assert!(class.into_option().is_none());
}

#[test]
fn test_stats_track_handles() {
    let before = dotbridge::stats();
    let handle = new_object();
    assert_eq!(dotbridge_test_class_free(handle), BridgeStatus::Ok);
    let after = dotbridge::stats();

    assert!(after.calls_made >= before.calls_made + 2);
    assert!(after.handles_allocated > before.handles_allocated);
    assert!(after.handles_released > before.handles_released);
}
