//! Managed text (UTF-16 code units)

use crate::errors::MarshalError;
use crate::interop::{utf16_to_utf8, utf8_to_utf16};
use std::fmt;

/// A managed string
///
/// Holds UTF-16 code units and, like managed runtimes, can hold unpaired
/// surrogates. Such strings cannot cross into native code.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ManagedString {
    units: Vec<u16>,
}

impl ManagedString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: Vec<u16>) -> Self {
        Self { units }
    }

    #[inline]
    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    /// Length in UTF-16 code units
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Transcode for a native call
    pub fn to_native(&self) -> Result<String, MarshalError> {
        utf16_to_utf8(&self.units)
    }

    /// Copy native text into a new managed string
    pub fn from_native(text: &str) -> Self {
        Self { units: utf8_to_utf16(text) }
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

impl From<&str> for ManagedString {
    fn from(text: &str) -> Self {
        Self { units: text.encode_utf16().collect() }
    }
}

impl From<String> for ManagedString {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl PartialEq<str> for ManagedString {
    fn eq(&self, other: &str) -> bool {
        self.units.iter().copied().eq(other.encode_utf16())
    }
}

impl PartialEq<&str> for ManagedString {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for ManagedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for ManagedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_astral_text() {
        let s = ManagedString::from("a€😀");
        // '😀' needs a surrogate pair
        assert_eq!(s.len(), 4);
        assert_eq!(s.to_native().unwrap(), "a€😀");
        assert_eq!(s, "a€😀");
    }

    #[test]
    fn unpaired_surrogate_cannot_cross() {
        let s = ManagedString::from_units(vec![0x0061, 0xD800, 0x0062]);
        assert_eq!(s.to_native(), Err(MarshalError::InvalidUtf16 { index: 1 }));
        assert_eq!(s.to_string_lossy(), "a\u{FFFD}b");
    }

    #[test]
    fn error_index_counts_code_units() {
        let s = ManagedString::from_units(vec![0xD83D, 0xDE00, 0xDC00]);
        assert_eq!(s.to_native(), Err(MarshalError::InvalidUtf16 { index: 2 }));
    }

    #[test]
    fn from_native_round_trip() {
        let s = ManagedString::from_native("Concatenated String");
        assert_eq!(s.to_string(), "Concatenated String");
        assert!(ManagedString::new().is_empty());
    }
}
