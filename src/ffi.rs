//! FFI interface for C/C++ callers
//!
//! HTML is passed as a byte slice, schemas as null-terminated JSON strings.
//! Results come back as JSON owned by Rust and must be released with
//! `free_extraction_result`.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::engine::{records_to_json, ExtractionEngine};
use crate::error::ExtractError;

/// Result struct returned to C/C++
/// Both pointers are owned by Rust and must be freed via free_extraction_result
#[repr(C)]
pub struct ExtractionResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if extraction failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Extract records from HTML according to a JSON extraction schema.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `schema_json` - JSON extraction schema (null-terminated)
///
/// # Returns
/// ExtractionResultFFI with either json_ptr set to a JSON array of records
/// (success) or error_ptr set to `"<kind> error: <message>"` (failure)
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `schema_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn extract_structured_ffi(
    html_ptr: *const c_char,
    html_len: usize,
    schema_json: *const c_char,
) -> ExtractionResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return make_error_result(msg),
    };
    let schema = match read_c_str(schema_json, "Schema JSON") {
        Ok(schema) => schema,
        Err(msg) => return make_error_result(&msg),
    };

    match ExtractionEngine::default().extract(html, schema) {
        Ok(records) => make_json_result(records_to_json(records)),
        Err(e) => make_extract_error(&e),
    }
}

/// Validate a schema without extracting anything.
///
/// On success `json_ptr` holds `{"name": ..., "fieldCount": n}`.
///
/// # Safety
/// - `schema_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn validate_schema_ffi(schema_json: *const c_char) -> ExtractionResultFFI {
    let schema = match read_c_str(schema_json, "Schema JSON") {
        Ok(schema) => schema,
        Err(msg) => return make_error_result(&msg),
    };

    match ExtractionEngine::default().parse_schema(schema) {
        Ok(schema) => make_json_result(serde_json::json!({
            "name": schema.name(),
            "fieldCount": schema.record_keys().count(),
        })),
        Err(e) => make_extract_error(&e),
    }
}

/// Free an ExtractionResultFFI returned by this module
///
/// # Safety
/// - `result` must have been returned by one of the `*_ffi` functions
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_extraction_result(result: ExtractionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in HTML content")
}

unsafe fn read_c_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{} is null", what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 in {}", what))
}

fn make_json_result(value: serde_json::Value) -> ExtractionResultFFI {
    match CString::new(value.to_string()) {
        Ok(cstr) => ExtractionResultFFI {
            json_ptr: cstr.into_raw(),
            error_ptr: ptr::null_mut(),
        },
        Err(_) => make_error_result("Result JSON contains null bytes"),
    }
}

fn make_extract_error(e: &ExtractError) -> ExtractionResultFFI {
    tracing::debug!(kind = e.kind(), error = %e, "Extraction failed");
    make_error_result(&format!("{} error: {}", e.kind(), e))
}

// Helper to create error result
fn make_error_result(msg: &str) -> ExtractionResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
