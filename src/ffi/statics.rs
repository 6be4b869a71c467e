//! Static function exports (`TestStaticClass`)

use super::object::{objects, register};
use super::{check_out, guard, max_sequence_len, max_string_bytes};
use crate::errors::BridgeStatus;
use crate::interop::{read_slice, read_str, NativeHandle, ROption, RSlice, RStr, RString, RVec};
use crate::native::{self, TestClass};

#[no_mangle]
pub extern "C" fn dotbridge_hello() -> BridgeStatus {
    guard("dotbridge_hello", 0, || {
        native::hello();
        Ok(())
    })
}

#[no_mangle]
pub extern "C" fn dotbridge_print_number(number: i32) -> BridgeStatus {
    guard("dotbridge_print_number", 1, || {
        native::print_number(number);
        Ok(())
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_add(a: i32, b: i32, out: *mut i32) -> BridgeStatus {
    guard("dotbridge_add", 2, || {
        check_out(out, "add result")?;
        out.write(native::add(a, b));
        Ok(())
    })
}

/// Concatenate two strings, handing the native side owned copies
///
/// The result must be released with `dotbridge_string_free`.
///
/// # Safety
/// `a` and `b` must be valid views for the duration of the call; `out` must
/// be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_concat(a: RStr, b: RStr, out: *mut RString) -> BridgeStatus {
    guard("dotbridge_concat", 2, || {
        check_out(out, "concat result")?;
        let max = max_string_bytes();
        let a = read_str(a, max)?.to_owned();
        let b = read_str(b, max)?.to_owned();
        out.write(RString::from_string(native::concat(a, b)));
        Ok(())
    })
}

/// Concatenate two borrowed strings
///
/// The result must be released with `dotbridge_string_free`.
///
/// # Safety
/// Same as `dotbridge_concat`.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_concat_str(a: RStr, b: RStr, out: *mut RString) -> BridgeStatus {
    guard("dotbridge_concat_str", 2, || {
        check_out(out, "concat_str result")?;
        let max = max_string_bytes();
        let a = read_str(a, max)?;
        let b = read_str(b, max)?;
        out.write(RString::from_string(native::concat_str(a, b)));
        Ok(())
    })
}

/// Pass an object by value
///
/// The native function receives a duplicate; `handle` stays valid and
/// unchanged.
#[no_mangle]
pub extern "C" fn dotbridge_test_obj_by_value(handle: NativeHandle) -> BridgeStatus {
    guard("dotbridge_test_obj_by_value", 1, || {
        let copy = objects().with(handle, TestClass::clone)?;
        native::test_obj_by_value(copy);
        Ok(())
    })
}

/// # Safety
/// `items` must be a valid view for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_print_vec_len(items: RSlice<i32>) -> BridgeStatus {
    guard("dotbridge_print_vec_len", 1, || {
        let items = read_slice(items, max_sequence_len())?;
        native::print_vec_len(items);
        Ok(())
    })
}

/// The result must be released with `dotbridge_vec_i32_free`.
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_get_vec(out: *mut RVec<i32>) -> BridgeStatus {
    guard("dotbridge_get_vec", 0, || {
        check_out(out, "get_vec result")?;
        out.write(RVec::from_vec(native::get_vec()));
        Ok(())
    })
}

/// A present result is a new handle owned by the caller.
///
/// # Safety
/// A present `name` must be a valid view for the duration of the call; `out`
/// must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_maybe_return_class(
    name: ROption<RStr>,
    out: *mut ROption<NativeHandle>,
) -> BridgeStatus {
    guard("dotbridge_maybe_return_class", 1, || {
        check_out(out, "maybe_return_class result")?;
        let name = match name.into_option() {
            Some(view) => Some(read_str(view, max_string_bytes())?.to_owned()),
            None => None,
        };

        let result = match native::maybe_return_class(name) {
            Some(obj) => ROption::some(register(obj)?),
            None => ROption::none(),
        };
        out.write(result);
        Ok(())
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dotbridge_maybe_add_one(
    value: ROption<i32>,
    out: *mut ROption<i32>,
) -> BridgeStatus {
    guard("dotbridge_maybe_add_one", 1, || {
        check_out(out, "maybe_add_one result")?;
        out.write(native::maybe_add_one(value.into_option()).into());
        Ok(())
    })
}
