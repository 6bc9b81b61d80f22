//! C-ABI FFI bindings for cross-language integration.
//!
//! Every extraction call returns the JSON form of an
//! [`ExtractionResult`](crate::ExtractionResult), so callers get the same
//! status/text/error object the Rust API produces.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

use crate::render::{to_json, ExtractionResult, JsonFormat};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct UnscanResult {
    /// Whether the document was processed successfully.
    pub success: bool,
    /// The result JSON (null if it could not be produced). Must be freed with `unscan_free_result`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `unscan_free_result`.
    pub error: *mut c_char,
}

impl UnscanResult {
    fn from_extraction(result: &ExtractionResult) -> Self {
        let data = match to_json(result, JsonFormat::Compact) {
            Ok(json) => json,
            Err(e) => return Self::error(e.to_string()),
        };
        Self {
            success: result.is_success(),
            data: into_c_string(data),
            error: result
                .error
                .clone()
                .map_or(ptr::null_mut(), into_c_string),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: into_c_string(message),
        }
    }
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Process a PDF or image file.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `unscan_free_result`.
#[no_mangle]
pub unsafe extern "C" fn unscan_extract_file(path: *const c_char) -> UnscanResult {
    if path.is_null() {
        return UnscanResult::error("Path cannot be null".to_string());
    }

    let path_str = match CStr::from_ptr(path).to_str() {
        Ok(s) => s,
        Err(_) => return UnscanResult::error("Invalid UTF-8 path".to_string()),
    };

    UnscanResult::from_extraction(&crate::process_file(Path::new(path_str)))
}

/// Process an in-memory document.
///
/// # Safety
///
/// `data` must point to `len` readable bytes.
/// The returned result must be freed with `unscan_free_result`.
#[no_mangle]
pub unsafe extern "C" fn unscan_extract_bytes(data: *const u8, len: usize) -> UnscanResult {
    if data.is_null() {
        return UnscanResult::error("Data cannot be null".to_string());
    }

    let bytes = std::slice::from_raw_parts(data, len);
    UnscanResult::from_extraction(&crate::process_bytes(bytes))
}

/// Free a result returned by any unscan function.
///
/// # Safety
///
/// The `result` must have been returned by an unscan function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn unscan_free_result(result: UnscanResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Free a string allocated by unscan.
///
/// # Safety
///
/// The `ptr` must have been allocated by unscan.
/// This function should only be called once per pointer.
#[no_mangle]
pub unsafe extern "C" fn unscan_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the version of the unscan library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn unscan_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
