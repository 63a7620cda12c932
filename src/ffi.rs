//! C ABI surface
//!
//! Exported from the cdylib for non-Rust callers. Every convert function
//! takes a NUL-terminated Base64 envelope and returns a newly allocated
//! NUL-terminated Base64 response that the caller must release with
//! [`free_result`]. NULL input and panics both come back as well-formed
//! error envelopes, never as a crash.

use std::ffi::{c_char, c_int, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::error;

use crate::convert::Kind;
use crate::nbt::{Compound, Tag};
use crate::{cache, envelope, nbt};

/// Pre-warm the default resolver pair. Optional; the first conversion
/// builds its cache lazily either way. Returns 0 on success.
#[no_mangle]
pub extern "C" fn crocon_init() -> c_int {
    match cache::prewarm() {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "Failed to pre-warm resolver cache");
            1
        }
    }
}

#[no_mangle]
pub extern "C" fn convert_block(input: *const c_char) -> *mut c_char {
    convert_ffi(Kind::Block, input)
}

#[no_mangle]
pub extern "C" fn convert_item(input: *const c_char) -> *mut c_char {
    convert_ffi(Kind::Item, input)
}

#[no_mangle]
pub extern "C" fn convert_entity(input: *const c_char) -> *mut c_char {
    convert_ffi(Kind::Entity, input)
}

#[no_mangle]
pub extern "C" fn convert_biome(input: *const c_char) -> *mut c_char {
    convert_ffi(Kind::Biome, input)
}

#[no_mangle]
pub extern "C" fn convert_block_entity(input: *const c_char) -> *mut c_char {
    convert_ffi(Kind::BlockEntity, input)
}

/// Release a pointer returned by the convert functions. NULL is a no-op.
///
/// # Safety
///
/// `result` must be a pointer previously returned by one of the convert
/// functions of this library, or NULL, and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn free_result(result: *mut c_char) {
    if result.is_null() {
        return;
    }
    drop(CString::from_raw(result));
}

fn convert_ffi(kind: Kind, input: *const c_char) -> *mut c_char {
    let response = catch_unwind(AssertUnwindSafe(|| {
        if input.is_null() {
            return error_envelope("Input pointer is NULL");
        }
        // Safety: non-NULL, caller guarantees NUL termination.
        let bytes = unsafe { CStr::from_ptr(input) };
        match bytes.to_str() {
            Ok(text) => envelope::process(kind, text),
            Err(_) => error_envelope("Input is not valid UTF-8"),
        }
    }))
    .unwrap_or_else(|_| {
        error!(kind = %kind, "Conversion panicked");
        error_envelope("Internal conversion panic")
    });

    // Interior NULs cannot occur in Base64 output.
    match CString::new(response) {
        Ok(owned) => owned.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// A `{success:0, error, stackTrace}` envelope for failures that happen
/// before the wire path is reachable.
fn error_envelope(message: &str) -> String {
    let mut response = Compound::new();
    response.put("success", Tag::Byte(0));
    response.put("error", message);
    response.put("stackTrace", message);
    match nbt::write_le(&response) {
        Ok(bytes) => BASE64.encode(bytes),
        Err(_) => BASE64.encode("FATAL: Double serialization failure"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn decode(ptr: *mut c_char) -> Compound {
        assert!(!ptr.is_null());
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        unsafe { free_result(ptr) };
        envelope::decode_response(&text).unwrap()
    }

    #[test]
    fn test_null_input_yields_an_error_envelope() {
        let response = decode(convert_block(ptr::null()));
        assert_eq!(response.get_int("success"), Some(0));
        assert_eq!(response.get_str("error"), Some("Input pointer is NULL"));
    }

    #[test]
    fn test_envelope_through_the_exported_symbol() {
        let mut data = Compound::new();
        data.put("id", "minecraft:stone");
        let mut request = Compound::new();
        request.put("data", data);
        let encoded = CString::new(envelope::encode_request(&request).unwrap()).unwrap();

        let response = decode(convert_block(encoded.as_ptr()));
        assert_eq!(response.get_int("success"), Some(1));
        let data = response.get_compound("data").unwrap();
        assert_eq!(data.get_str("id"), Some("minecraft:stone"));
    }

    #[test]
    fn test_free_result_null_is_a_no_op() {
        unsafe { free_result(ptr::null_mut()) };
    }

    #[test]
    fn test_init_returns_zero() {
        assert_eq!(crocon_init(), 0);
    }
}
