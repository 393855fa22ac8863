//! FFI interface for C/C++ hosts
//!
//! Requests and results cross the boundary as JSON strings. Every entry point
//! returns an [`FfiOutcome`]; exactly one of its pointers is non-null and the
//! host hands it back to [`free_ffi_outcome`] when done.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;

use crate::batch::{extract_fields, ExtractionRequest};
use crate::registry::converter_for;

/// Either a JSON payload or an error message, both owned by this library
#[repr(C)]
pub struct FfiOutcome {
    /// Serialized value (null-terminated), or null on error
    pub json: *mut c_char,
    /// Error message (null-terminated), or null on success
    pub error: *mut c_char,
}

impl FfiOutcome {
    fn json<T: Serialize>(value: &T) -> Self {
        let encoded = serde_json::to_string(value)
            .map_err(|e| format!("Failed to serialize result: {e}"))
            .and_then(|json| {
                CString::new(json).map_err(|_| "Result JSON contains null bytes".to_string())
            });

        match encoded {
            Ok(json) => Self {
                json: json.into_raw(),
                error: ptr::null_mut(),
            },
            Err(msg) => Self::error(&msg),
        }
    }

    fn error(msg: &str) -> Self {
        // interior NULs would truncate the message on the C side
        let msg = CString::new(msg.replace('\0', "")).unwrap_or_default();
        Self {
            json: ptr::null_mut(),
            error: msg.into_raw(),
        }
    }
}

/// Extract typed fields from HTML according to a JSON `ExtractionRequest`.
///
/// Per-field failures are reported inside the result JSON; `error` is
/// only set when the inputs themselves are unusable.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the outcome via `free_ffi_outcome`
#[no_mangle]
pub unsafe extern "C" fn extract_fields_from_html(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> FfiOutcome {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return FfiOutcome::error(msg),
    };

    let request_str = match read_c_str(request_json) {
        Ok(s) => s,
        Err(msg) => return FfiOutcome::error(msg),
    };

    let request: ExtractionRequest = match serde_json::from_str(request_str) {
        Ok(r) => r,
        Err(e) => return FfiOutcome::error(&format!("Failed to parse request JSON: {e}")),
    };

    FfiOutcome::json(&extract_fields(html, &request))
}

/// Convert a single raw string with a named converter (e.g. `"int?"`).
///
/// # Safety
/// - `type_name` and `input` must be valid null-terminated C strings
/// - Caller must free the outcome via `free_ffi_outcome`
#[no_mangle]
pub unsafe extern "C" fn convert_value(
    type_name: *const c_char,
    input: *const c_char,
) -> FfiOutcome {
    let (type_name, input) = match (read_c_str(type_name), read_c_str(input)) {
        (Ok(type_name), Ok(input)) => (type_name, input),
        (Err(msg), _) | (_, Err(msg)) => return FfiOutcome::error(msg),
    };

    let converted = converter_for(type_name)
        .and_then(|converter| converter.convert(input.trim()).map_err(Into::into));

    match converted {
        Ok(value) => FfiOutcome::json(&value),
        Err(e) => FfiOutcome::error(&e.to_string()),
    }
}

/// Release both strings of an outcome
///
/// # Safety
/// - `outcome` must come from a function in this module
/// - Must only be called once per outcome
#[no_mangle]
pub unsafe extern "C" fn free_ffi_outcome(outcome: FfiOutcome) {
    release(outcome.json);
    release(outcome.error);
}

unsafe fn release(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in HTML content")
}

unsafe fn read_c_str<'a>(ptr: *const c_char) -> Result<&'a str, &'static str> {
    if ptr.is_null() {
        return Err("Argument is null");
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| "Invalid UTF-8 in argument")
}
