//! Purpose: Convert Rust text and paths to and from nfd's null-terminated UTF-8 strings.
//! Exports: `encode`, `encode_optional`, `encode_path`, `as_ptr`, `decode`, `decode_path`.
//! Role: Leaf codec used by the filter encoder, dialog operations and result decoder.
//! Invariants: Encoded buffers are exactly the UTF-8 bytes plus one trailing zero byte.
//! Invariants: Absent or empty optional inputs become null pointers, never empty strings.
//! Invariants: Decoding copies; the returned value never borrows native memory.
use std::ffi::{CStr, CString};
use std::path::{Path, PathBuf};
use std::ptr;

use libc::c_char;

use crate::core::error::{Error, ErrorKind};

pub fn encode(text: &str) -> Result<CString, Error> {
    CString::new(text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!(
                "text contains a nul byte at offset {}",
                err.nul_position()
            ))
            .with_source(err)
    })
}

pub fn encode_optional(text: Option<&str>) -> Result<Option<CString>, Error> {
    match text {
        None | Some("") => Ok(None),
        Some(text) => encode(text).map(Some),
    }
}

pub fn encode_path(path: Option<&Path>) -> Result<Option<CString>, Error> {
    let Some(path) = path else {
        return Ok(None);
    };
    if path.as_os_str().is_empty() {
        return Ok(None);
    }
    let bytes = path_bytes(path)?;
    CString::new(bytes).map(Some).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("path contains a nul byte: {}", path.display()))
            .with_source(err)
    })
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Result<Vec<u8>, Error> {
    use std::os::unix::ffi::OsStrExt;
    Ok(path.as_os_str().as_bytes().to_vec())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Result<Vec<u8>, Error> {
    path.to_str()
        .map(|text| text.as_bytes().to_vec())
        .ok_or_else(|| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("path is not valid unicode: {}", path.display()))
        })
}

/// Pointer for an optional argument; null when absent.
pub fn as_ptr(buf: &Option<CString>) -> *const c_char {
    buf.as_ref().map_or(ptr::null(), |buf| buf.as_ptr())
}

/// Copies a native string; invalid UTF-8 is replaced.
///
/// # Safety
///
/// `ptr` must be null or point at a null-terminated string that stays valid
/// for the duration of this call.
pub unsafe fn decode(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let text = unsafe { CStr::from_ptr(ptr) };
    Some(text.to_string_lossy().into_owned())
}

/// Copies a native path, preserving non-UTF-8 bytes where the platform allows.
///
/// # Safety
///
/// Same contract as [`decode`].
pub unsafe fn decode_path(ptr: *const c_char) -> Option<PathBuf> {
    if ptr.is_null() {
        return None;
    }
    let bytes = unsafe { CStr::from_ptr(ptr) }.to_bytes();
    Some(path_from_bytes(bytes))
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
