use dotbridge::{BridgeError, ManagedOption, ManagedString, MarshalError, TestClass, TestStaticClass};
use proptest::prelude::*;

proptest! {
    #[test]
    fn concat_matches_string_concat(a in ".*", b in ".*") {
        let expected = format!("{}{}", a, b);
        let joined = TestStaticClass::concat(&a.as_str().into(), &b.as_str().into()).unwrap();
        prop_assert_eq!(joined.to_string(), expected.clone());

        let joined = TestStaticClass::concat_str(&a.as_str().into(), &b.as_str().into()).unwrap();
        prop_assert_eq!(joined.to_string(), expected);
    }
}

proptest! {
    #[test]
    fn unpaired_surrogate_is_always_rejected(prefix in "[a-z]{0,8}", low in 0xDC00u16..=0xDFFF) {
        let mut units: Vec<u16> = prefix.encode_utf16().collect();
        let index = units.len();
        units.push(low);

        let err = TestStaticClass::concat_str(&ManagedString::from_units(units), &"x".into()).unwrap_err();
        prop_assert_eq!(err, BridgeError::Marshal(MarshalError::InvalidUtf16 { index }));
    }
}

proptest! {
    #[test]
    fn add_matches_wrapping_add(a in any::<i32>(), b in any::<i32>()) {
        prop_assert_eq!(TestStaticClass::add(a, b).unwrap(), a.wrapping_add(b));
    }
}

proptest! {
    #[test]
    fn maybe_add_one_matches_wrapping_add(value in proptest::option::of(any::<i32>())) {
        let result = TestStaticClass::maybe_add_one(value.into()).unwrap();
        prop_assert_eq!(result.into_option(), value.map(|v| v.wrapping_add(1)));
    }
}

proptest! {
    #[test]
    fn object_accumulates_adds(steps in proptest::collection::vec(any::<i32>(), 0..16)) {
        let mut obj = TestClass::new().unwrap();
        let mut expected = 0i32;
        for step in &steps {
            obj.add(*step).unwrap();
            expected = expected.wrapping_add(*step);
        }
        prop_assert_eq!(obj.get().unwrap(), expected);
        prop_assert!(ManagedOption::some(obj).is_some());
    }
}
