//! Managed optional values

use crate::errors::{BridgeError, Result};

/// A present-or-absent value returned to or passed from managed code
///
/// `value()` fails fast with `AbsentValue` instead of handing out a
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedOption<T> {
    inner: Option<T>,
}

impl<T> ManagedOption<T> {
    pub fn some(value: T) -> Self {
        Self { inner: Some(value) }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        self.inner.is_some()
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.inner.is_none()
    }

    pub fn value(&self) -> Result<&T> {
        self.inner.as_ref().ok_or_else(absent::<T>)
    }

    pub fn value_mut(&mut self) -> Result<&mut T> {
        self.inner.as_mut().ok_or_else(absent::<T>)
    }

    pub fn into_value(self) -> Result<T> {
        self.inner.ok_or_else(absent::<T>)
    }

    pub fn as_option(&self) -> Option<&T> {
        self.inner.as_ref()
    }

    pub fn into_option(self) -> Option<T> {
        self.inner
    }
}

fn absent<T>() -> BridgeError {
    BridgeError::AbsentValue { ty: std::any::type_name::<T>() }
}

impl<T> Default for ManagedOption<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<Option<T>> for ManagedOption<T> {
    fn from(inner: Option<T>) -> Self {
        Self { inner }
    }
}

impl<T> From<ManagedOption<T>> for Option<T> {
    fn from(value: ManagedOption<T>) -> Self {
        value.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_value() {
        let mut opt = ManagedOption::some(41i64);
        assert!(opt.is_some());
        *opt.value_mut().unwrap() += 1;
        assert_eq!(*opt.value().unwrap(), 42);
        assert_eq!(opt.into_value().unwrap(), 42);
    }

    #[test]
    fn absent_value_fails_fast() {
        let opt: ManagedOption<i64> = ManagedOption::default();
        assert!(!opt.is_some());
        assert!(opt.is_none());
        assert_eq!(opt.value().unwrap_err(), BridgeError::AbsentValue { ty: "i64" });
    }

    #[test]
    fn converts_to_and_from_option() {
        let opt: ManagedOption<&str> = Some("asdf").into();
        assert_eq!(opt.as_option(), Some(&"asdf"));
        let back: Option<&str> = opt.into();
        assert_eq!(back, Some("asdf"));
    }
}
