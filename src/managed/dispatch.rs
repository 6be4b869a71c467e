//! Dynamic invocation table
//!
//! `Bridge` maps export names to their `FunctionCall` descriptors so a host
//! can call into the library by name with loosely typed arguments. Arity
//! and argument types are checked against the descriptor before anything
//! crosses the boundary.
//!
//! Objects travel as raw handles here. A handle returned by the table
//! (`TestClass.new`, `TestClass.clone`, `maybe_return_class`) is owned by
//! the caller and must be released with `TestClass.free`.

use super::{check, ManagedOption, ManagedString, TestStaticClass};
use crate::errors::{BridgeError, MarshalError, Result};
use crate::ffi::{
    dotbridge_test_class_add, dotbridge_test_class_clone, dotbridge_test_class_free,
    dotbridge_test_class_get, dotbridge_test_class_increment, dotbridge_test_class_new,
    dotbridge_test_class_print, dotbridge_test_obj_by_value,
};
use crate::interop::{self, managed_type_name, BoundaryValue, FfiType, FunctionCall, NativeHandle};
use crate::logging::{debug, warn};
use std::collections::HashMap;

const CLASS: &str = "TestClass";

/// A loosely typed managed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedValue {
    Void,
    I32(i32),
    Str(ManagedString),
    List(Vec<i32>),
    Object(NativeHandle),
    Optional(Option<Box<ManagedValue>>),
}

impl ManagedValue {
    pub fn some(value: ManagedValue) -> Self {
        Self::Optional(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        Self::Optional(None)
    }
}

impl BoundaryValue for ManagedValue {
    fn conforms_to(&self, ty: &FfiType) -> bool {
        match (self, ty) {
            (Self::Void, FfiType::Void)
            | (Self::I32(_), FfiType::I32)
            | (Self::Str(_), FfiType::String | FfiType::Str)
            | (Self::List(_), FfiType::SequenceI32)
            | (Self::Object(_), FfiType::Object(_))
            | (Self::Optional(None), FfiType::Optional(_)) => true,
            (Self::Optional(Some(inner)), FfiType::Optional(ty)) => inner.conforms_to(ty),
            _ => false,
        }
    }

    fn type_name(&self) -> String {
        match self {
            Self::Void => "void".to_string(),
            Self::I32(_) => "int".to_string(),
            Self::Str(_) => "string".to_string(),
            Self::List(_) => "List<int>".to_string(),
            Self::Object(_) => CLASS.to_string(),
            Self::Optional(None) => "Option<?>".to_string(),
            Self::Optional(Some(inner)) => format!("Option<{}>", inner.type_name()),
        }
    }
}

/// Name-keyed table of every export
pub struct Bridge {
    exports: HashMap<&'static str, FunctionCall>,
}

impl Bridge {
    pub fn new() -> Self {
        use FfiType::*;

        let object = || Object(CLASS);
        let descriptors = vec![
            FunctionCall::new("TestStaticClass.hello", vec![], Void),
            FunctionCall::new("TestStaticClass.print_number", vec![I32], Void),
            FunctionCall::new("TestStaticClass.add", vec![I32, I32], I32),
            FunctionCall::new("TestStaticClass.concat", vec![String, String], String),
            FunctionCall::new("TestStaticClass.concat_str", vec![Str, Str], String),
            FunctionCall::new("TestStaticClass.test_obj_by_value", vec![object()], Void),
            FunctionCall::new("TestStaticClass.print_vec_len", vec![SequenceI32], Void),
            FunctionCall::new("TestStaticClass.get_vec", vec![], SequenceI32),
            FunctionCall::new(
                "TestStaticClass.maybe_return_class",
                vec![FfiType::optional(String)],
                FfiType::optional(object()),
            ),
            FunctionCall::new(
                "TestStaticClass.maybe_add_one",
                vec![FfiType::optional(I32)],
                FfiType::optional(I32),
            ),
            FunctionCall::new("TestClass.new", vec![], object()),
            FunctionCall::new("TestClass.free", vec![object()], Void),
            FunctionCall::new("TestClass.clone", vec![object()], object()),
            FunctionCall::new("TestClass.print", vec![object()], Void),
            FunctionCall::new("TestClass.increment", vec![object()], Void),
            FunctionCall::new("TestClass.add", vec![object(), I32], Void),
            FunctionCall::new("TestClass.get", vec![object()], I32),
        ];

        Self {
            exports: descriptors.into_iter().map(|call| (call.name(), call)).collect(),
        }
    }

    /// Look up an export's descriptor
    pub fn export(&self, name: &str) -> Option<&FunctionCall> {
        self.exports.get(name)
    }

    /// All descriptors, sorted by name
    pub fn exports(&self) -> Vec<&FunctionCall> {
        let mut calls: Vec<_> = self.exports.values().collect();
        calls.sort_by_key(|call| call.name());
        calls
    }

    /// Validate `args` against the named export, then invoke it
    pub fn call(&self, name: &str, args: Vec<ManagedValue>) -> Result<ManagedValue> {
        let result = self.resolve(name, &args).and_then(|call| {
            debug!(target: "ffi", "dispatching {}", call);
            let value = dispatch(call.name(), &args)?;
            if call.signature().ret.needs_release() {
                debug!(target: "handles", function = name, "caller owns returned {}", value.type_name());
            }
            Ok(value)
        });
        if let Err(err) = &result {
            warn!(target: "ffi", function = name, "dynamic call failed: {}", err);
        }
        result
    }

    fn resolve(&self, name: &str, args: &[ManagedValue]) -> Result<&FunctionCall> {
        let checked = self
            .exports
            .get(name)
            .ok_or_else(|| MarshalError::UnknownFunction { name: name.to_string() })
            .and_then(|call| call.validate(args).map(|()| call));

        checked.map_err(|err| {
            interop::record_marshal_error();
            BridgeError::from(err)
        })
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch(name: &str, args: &[ManagedValue]) -> Result<ManagedValue> {
    use ManagedValue as V;

    let value = match name {
        "TestStaticClass.hello" => {
            TestStaticClass::hello()?;
            V::Void
        }
        "TestStaticClass.print_number" => {
            TestStaticClass::print_number(int(args, 0)?)?;
            V::Void
        }
        "TestStaticClass.add" => V::I32(TestStaticClass::add(int(args, 0)?, int(args, 1)?)?),
        "TestStaticClass.concat" => V::Str(TestStaticClass::concat(text(args, 0)?, text(args, 1)?)?),
        "TestStaticClass.concat_str" => {
            V::Str(TestStaticClass::concat_str(text(args, 0)?, text(args, 1)?)?)
        }
        "TestStaticClass.test_obj_by_value" => {
            check(dotbridge_test_obj_by_value(handle(args, 0)?))?;
            V::Void
        }
        "TestStaticClass.print_vec_len" => {
            TestStaticClass::print_vec_len(list(args, 0)?)?;
            V::Void
        }
        "TestStaticClass.get_vec" => V::List(TestStaticClass::get_vec()?),
        "TestStaticClass.maybe_return_class" => {
            let name = match optional(args, 0)? {
                Some(V::Str(s)) => ManagedOption::some(s.clone()),
                Some(other) => return Err(mismatch(0, &FfiType::String, other)),
                None => ManagedOption::none(),
            };
            match TestStaticClass::maybe_return_class(&name)?.into_option() {
                Some(obj) => V::some(V::Object(obj.into_raw())),
                None => V::none(),
            }
        }
        "TestStaticClass.maybe_add_one" => {
            let value = match optional(args, 0)? {
                Some(V::I32(v)) => ManagedOption::some(*v),
                Some(other) => return Err(mismatch(0, &FfiType::I32, other)),
                None => ManagedOption::none(),
            };
            match TestStaticClass::maybe_add_one(value)?.into_option() {
                Some(v) => V::some(V::I32(v)),
                None => V::none(),
            }
        }
        "TestClass.new" => {
            let mut out = NativeHandle::NULL;
            check(unsafe { dotbridge_test_class_new(&mut out) })?;
            V::Object(out)
        }
        "TestClass.free" => {
            check(dotbridge_test_class_free(handle(args, 0)?))?;
            V::Void
        }
        "TestClass.clone" => {
            let mut out = NativeHandle::NULL;
            check(unsafe { dotbridge_test_class_clone(handle(args, 0)?, &mut out) })?;
            V::Object(out)
        }
        "TestClass.print" => {
            check(dotbridge_test_class_print(handle(args, 0)?))?;
            V::Void
        }
        "TestClass.increment" => {
            check(dotbridge_test_class_increment(handle(args, 0)?))?;
            V::Void
        }
        "TestClass.add" => {
            check(dotbridge_test_class_add(handle(args, 0)?, int(args, 1)?))?;
            V::Void
        }
        "TestClass.get" => {
            let mut out = 0;
            check(unsafe { dotbridge_test_class_get(handle(args, 0)?, &mut out) })?;
            V::I32(out)
        }
        other => return Err(MarshalError::UnknownFunction { name: other.to_string() }.into()),
    };
    Ok(value)
}

fn mismatch(param: usize, expected: &FfiType, found: &ManagedValue) -> BridgeError {
    MarshalError::TypeMismatch {
        param,
        expected: managed_type_name(expected),
        found: found.type_name(),
    }
    .into()
}

fn arg<'a>(
    args: &'a [ManagedValue],
    param: usize,
    expected: &FfiType,
) -> Result<&'a ManagedValue> {
    args.get(param).ok_or_else(|| {
        MarshalError::TypeMismatch {
            param,
            expected: managed_type_name(expected),
            found: "nothing".to_string(),
        }
        .into()
    })
}

fn int(args: &[ManagedValue], param: usize) -> Result<i32> {
    match arg(args, param, &FfiType::I32)? {
        ManagedValue::I32(v) => Ok(*v),
        other => Err(mismatch(param, &FfiType::I32, other)),
    }
}

fn text(args: &[ManagedValue], param: usize) -> Result<&ManagedString> {
    match arg(args, param, &FfiType::String)? {
        ManagedValue::Str(s) => Ok(s),
        other => Err(mismatch(param, &FfiType::String, other)),
    }
}

fn list(args: &[ManagedValue], param: usize) -> Result<&[i32]> {
    match arg(args, param, &FfiType::SequenceI32)? {
        ManagedValue::List(items) => Ok(items),
        other => Err(mismatch(param, &FfiType::SequenceI32, other)),
    }
}

fn handle(args: &[ManagedValue], param: usize) -> Result<NativeHandle> {
    let expected = FfiType::Object(CLASS);
    match arg(args, param, &expected)? {
        ManagedValue::Object(h) => Ok(*h),
        other => Err(mismatch(param, &expected, other)),
    }
}

fn optional(args: &[ManagedValue], param: usize) -> Result<Option<&ManagedValue>> {
    let expected = FfiType::optional(FfiType::Void);
    match arg(args, param, &expected)? {
        ManagedValue::Optional(inner) => Ok(inner.as_deref()),
        other => Err(mismatch(param, &expected, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::console;

    fn s(text: &str) -> ManagedValue {
        ManagedValue::Str(ManagedString::from(text))
    }

    #[test]
    fn every_export_is_registered() {
        let bridge = Bridge::new();
        assert_eq!(bridge.exports().len(), 17);
        assert_eq!(
            bridge.export("TestStaticClass.add").unwrap().to_string(),
            "TestStaticClass.add(i32, i32) -> i32"
        );
        assert!(bridge.export("TestStaticClass.missing").is_none());
    }

    #[test]
    fn static_calls() {
        let bridge = Bridge::new();
        assert_eq!(
            bridge.call("TestStaticClass.add", vec![ManagedValue::I32(1), ManagedValue::I32(2)]).unwrap(),
            ManagedValue::I32(3)
        );
        assert_eq!(
            bridge.call("TestStaticClass.concat_str", vec![s("Concatenated "), s("String")]).unwrap(),
            s("Concatenated String")
        );
        assert_eq!(
            bridge.call("TestStaticClass.get_vec", vec![]).unwrap(),
            ManagedValue::List(vec![1, 2, 3])
        );
        assert_eq!(
            bridge
                .call("TestStaticClass.maybe_add_one", vec![ManagedValue::some(ManagedValue::I32(1))])
                .unwrap(),
            ManagedValue::some(ManagedValue::I32(2))
        );
        assert_eq!(
            bridge.call("TestStaticClass.maybe_add_one", vec![ManagedValue::none()]).unwrap(),
            ManagedValue::none()
        );
    }

    #[test]
    fn object_lifecycle_by_name() {
        let bridge = Bridge::new();
        let obj = bridge.call("TestClass.new", vec![]).unwrap();
        bridge.call("TestClass.add", vec![obj.clone(), ManagedValue::I32(4)]).unwrap();
        bridge.call("TestClass.increment", vec![obj.clone()]).unwrap();

        let (printed, out) = console::capture(|| bridge.call("TestClass.print", vec![obj.clone()]));
        printed.unwrap();
        assert_eq!(out, "TestClass: i = 5\n");

        bridge.call("TestClass.free", vec![obj.clone()]).unwrap();
        let err = bridge.call("TestClass.get", vec![obj]).unwrap_err();
        assert!(matches!(err, BridgeError::DisposedHandle { .. }));
    }

    #[test]
    fn optional_object_result_is_owned_handle() {
        let bridge = Bridge::new();
        let result = bridge
            .call("TestStaticClass.maybe_return_class", vec![ManagedValue::some(s("asdf"))])
            .unwrap();
        let ManagedValue::Optional(Some(obj)) = result else {
            panic!("expected an object");
        };
        assert_eq!(bridge.call("TestClass.get", vec![(*obj).clone()]).unwrap(), ManagedValue::I32(0));
        bridge.call("TestClass.free", vec![*obj]).unwrap();
    }

    #[test]
    fn wrong_arity_is_rejected_before_dispatch() {
        let bridge = Bridge::new();
        let err = bridge.call("TestStaticClass.add", vec![ManagedValue::I32(1)]).unwrap_err();
        assert_eq!(
            err,
            BridgeError::Marshal(MarshalError::ArgCountMismatch {
                function: "TestStaticClass.add".to_string(),
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn wrong_type_is_rejected_before_dispatch() {
        let bridge = Bridge::new();
        let err = bridge
            .call("TestStaticClass.print_number", vec![s("5")])
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::Marshal(MarshalError::TypeMismatch {
                param: 0,
                expected: "int".to_string(),
                found: "string".to_string(),
            })
        );

        let err = bridge
            .call("TestStaticClass.maybe_add_one", vec![ManagedValue::some(s("1"))])
            .unwrap_err();
        assert!(matches!(err, BridgeError::Marshal(MarshalError::TypeMismatch { .. })));
    }

    #[test]
    fn unknown_function() {
        let before = interop::stats().marshaling_errors;
        let err = Bridge::new().call("TestStaticClass.nope", vec![]).unwrap_err();
        assert_eq!(
            err,
            BridgeError::Marshal(MarshalError::UnknownFunction { name: "TestStaticClass.nope".into() })
        );
        assert!(interop::stats().marshaling_errors > before);
    }

    #[test]
    fn optional_conformance() {
        let ty = FfiType::optional(FfiType::I32);
        assert!(ManagedValue::none().conforms_to(&ty));
        assert!(ManagedValue::some(ManagedValue::I32(1)).conforms_to(&ty));
        assert!(!ManagedValue::some(s("1")).conforms_to(&ty));
        assert!(!ManagedValue::I32(1).conforms_to(&ty));
        assert_eq!(ManagedValue::some(s("x")).type_name(), "Option<string>");
    }
}
