//! Type marshaling - managed ↔ native conversions
//!
//! Managed text is UTF-16, native text is UTF-8. Transcoding failures are
//! reported before the native function runs.

use super::types::{FfiType, RSlice, RStr};
use crate::errors::MarshalError;
use crate::logging::log_type_conversion;

/// Transcode managed UTF-16 into native UTF-8
///
/// Fails on the first unpaired surrogate, reporting its UTF-16 index.
pub fn utf16_to_utf8(units: &[u16]) -> Result<String, MarshalError> {
    log_type_conversion("utf16", "utf8");

    let mut out = String::with_capacity(units.len());
    let mut index = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                out.push(c);
                index += c.len_utf16();
            }
            Err(_) => return Err(MarshalError::InvalidUtf16 { index }),
        }
    }
    Ok(out)
}

/// Transcode native UTF-8 into managed UTF-16
pub fn utf8_to_utf16(text: &str) -> Vec<u16> {
    log_type_conversion("utf8", "utf16");
    text.encode_utf16().collect()
}

/// Read a borrowed string view handed over by the caller
///
/// A null view of length zero reads as the empty string.
///
/// # Safety
/// A non-null `view` must point to `view.len` readable bytes that stay valid
/// for `'a`.
pub unsafe fn read_str<'a>(view: RStr, max_bytes: usize) -> Result<&'a str, MarshalError> {
    if view.ptr.is_null() {
        if view.len == 0 {
            return Ok("");
        }
        return Err(MarshalError::NullPointer { what: "string" });
    }
    if view.len > max_bytes {
        return Err(MarshalError::TooLong { what: "string", len: view.len, max: max_bytes });
    }

    let bytes = std::slice::from_raw_parts(view.ptr, view.len);
    std::str::from_utf8(bytes).map_err(|e| MarshalError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })
}

/// Read a borrowed sequence view handed over by the caller
///
/// # Safety
/// A non-null `view` must point to `view.len` initialised elements that stay
/// valid for `'a`.
pub unsafe fn read_slice<'a, T>(view: RSlice<T>, max_len: usize) -> Result<&'a [T], MarshalError> {
    if view.ptr.is_null() {
        if view.len == 0 {
            return Ok(&[]);
        }
        return Err(MarshalError::NullPointer { what: "sequence" });
    }
    if view.len > max_len {
        return Err(MarshalError::TooLong { what: "sequence", len: view.len, max: max_len });
    }
    if (view.ptr as usize) % std::mem::align_of::<T>() != 0 {
        return Err(MarshalError::Misaligned { what: "sequence" });
    }

    Ok(std::slice::from_raw_parts(view.ptr, view.len))
}

/// Name of the managed type a boundary type surfaces as (for diagnostics)
pub fn managed_type_name(ty: &FfiType) -> String {
    match ty {
        FfiType::Void => "void".to_string(),
        FfiType::I32 => "int".to_string(),
        FfiType::String | FfiType::Str => "string".to_string(),
        FfiType::Object(name) => (*name).to_string(),
        FfiType::SequenceI32 => "List<int>".to_string(),
        FfiType::Optional(inner) => format!("Option<{}>", managed_type_name(inner)),
    }
}
