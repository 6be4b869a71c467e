//! `TestStaticClass` proxy
//!
//! Returned strings and sequences are copied into managed memory and the
//! native buffers released before returning.

use super::{check, marshal_text, ManagedOption, ManagedString, TestClass};
use crate::errors::Result;
use crate::ffi::{
    dotbridge_add, dotbridge_concat, dotbridge_concat_str, dotbridge_get_vec, dotbridge_hello,
    dotbridge_maybe_add_one, dotbridge_maybe_return_class, dotbridge_print_number,
    dotbridge_print_vec_len, dotbridge_string_free, dotbridge_test_obj_by_value,
    dotbridge_vec_i32_free,
};
use crate::interop::{NativeHandle, ROption, RSlice, RStr, RString, RVec};

/// Static functions of the native library
pub struct TestStaticClass;

impl TestStaticClass {
    pub fn hello() -> Result<()> {
        check(dotbridge_hello())
    }

    pub fn print_number(number: i32) -> Result<()> {
        check(dotbridge_print_number(number))
    }

    pub fn add(a: i32, b: i32) -> Result<i32> {
        let mut sum = 0;
        check(unsafe { dotbridge_add(a, b, &mut sum) })?;
        Ok(sum)
    }

    /// Concatenate; the native side receives owned copies of both inputs
    pub fn concat(a: &ManagedString, b: &ManagedString) -> Result<ManagedString> {
        let a = marshal_text(a)?;
        let b = marshal_text(b)?;
        let mut out = RString::empty();
        check(unsafe { dotbridge_concat(RStr::new(&a), RStr::new(&b), &mut out) })?;
        Ok(take_string(out))
    }

    /// Concatenate; the native side only borrows both inputs
    pub fn concat_str(a: &ManagedString, b: &ManagedString) -> Result<ManagedString> {
        let a = marshal_text(a)?;
        let b = marshal_text(b)?;
        let mut out = RString::empty();
        check(unsafe { dotbridge_concat_str(RStr::new(&a), RStr::new(&b), &mut out) })?;
        Ok(take_string(out))
    }

    /// The native function gets a duplicate; `obj` is left untouched
    pub fn test_obj_by_value(obj: &TestClass) -> Result<()> {
        check(dotbridge_test_obj_by_value(obj.handle()?))
    }

    pub fn print_vec_len(items: &[i32]) -> Result<()> {
        check(unsafe { dotbridge_print_vec_len(RSlice::from_slice(items)) })
    }

    pub fn get_vec() -> Result<Vec<i32>> {
        let mut out = RVec::empty();
        check(unsafe { dotbridge_get_vec(&mut out) })?;
        let items = unsafe { out.as_slice() }.to_vec();
        unsafe { dotbridge_vec_i32_free(out) };
        Ok(items)
    }

    pub fn maybe_return_class(
        name: &ManagedOption<ManagedString>,
    ) -> Result<ManagedOption<TestClass>> {
        let name = match name.as_option() {
            Some(text) => Some(marshal_text(text)?),
            None => None,
        };
        let arg = match &name {
            Some(text) => ROption::some(RStr::new(text)),
            None => ROption::none(),
        };

        let mut out: ROption<NativeHandle> = ROption::none();
        check(unsafe { dotbridge_maybe_return_class(arg, &mut out) })?;
        Ok(out.into_option().map(TestClass::adopt).into())
    }

    /// Add one when present; `i32::MAX` wraps like the native addition
    pub fn maybe_add_one(value: ManagedOption<i32>) -> Result<ManagedOption<i32>> {
        let mut out: ROption<i32> = ROption::none();
        check(unsafe { dotbridge_maybe_add_one(value.into_option().into(), &mut out) })?;
        Ok(out.into_option().into())
    }
}

fn take_string(out: RString) -> ManagedString {
    let text = ManagedString::from_native(unsafe { out.as_str() });
    unsafe { dotbridge_string_free(out) };
    text
}
