//! Purpose: Turn a raw nfd status plus its out-pointer into an owned `Outcome`.
//! Exports: `DialogKind`, `RawOutput`, `decode`, `take_error`.
//! Role: Sole reader of native-allocated memory; pairs every pointer with its free function.
//! Invariants: Each native pointer is wrapped in a guard before it is read and freed exactly once.
//! Invariants: `Cancel` performs no further native calls; `Error` queries the message once.
//! Invariants: Multi-path results keep nfd's index order (0..count).
use std::path::PathBuf;

use libc::c_char;
use serde::Serialize;
use tracing::{trace, warn};

use crate::core::error::{Error, ErrorKind};
use crate::core::nfd::sys::{nfdpathset_t, nfdpathsetsize_t, nfdresult_t, nfdu8char_t};
use crate::core::nfd::{Backend, Status};
use crate::core::outcome::Outcome;
use crate::core::text;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    OpenFile,
    OpenFileMultiple,
    SaveFile,
    PickFolder,
}

impl DialogKind {
    pub fn name(self) -> &'static str {
        match self {
            DialogKind::OpenFile => "open_file",
            DialogKind::OpenFileMultiple => "open_file_multiple",
            DialogKind::SaveFile => "save_file",
            DialogKind::PickFolder => "pick_folder",
        }
    }

    pub fn is_multiple(self) -> bool {
        matches!(self, DialogKind::OpenFileMultiple)
    }
}

/// What a dialog call wrote through its out-parameter.
#[derive(Clone, Copy, Debug)]
pub enum RawOutput {
    Path(*mut nfdu8char_t),
    PathSet(*const nfdpathset_t),
}

enum PathOwner {
    Dialog,
    PathSet,
}

/// A native path released through the free function that matches its origin.
struct NativePath<'a, B: Backend + ?Sized> {
    backend: &'a B,
    ptr: *mut nfdu8char_t,
    owner: PathOwner,
}

impl<'a, B: Backend + ?Sized> NativePath<'a, B> {
    /// # Safety
    ///
    /// `ptr` must be non-null, allocated by `backend`, and not owned by any other guard.
    unsafe fn new(backend: &'a B, ptr: *mut nfdu8char_t, owner: PathOwner) -> Self {
        Self {
            backend,
            ptr,
            owner,
        }
    }

    fn to_path_buf(&self) -> Option<PathBuf> {
        unsafe { text::decode_path(self.ptr) }
    }
}

impl<B: Backend + ?Sized> Drop for NativePath<'_, B> {
    fn drop(&mut self) {
        match self.owner {
            PathOwner::Dialog => unsafe { self.backend.free_path(self.ptr) },
            PathOwner::PathSet => unsafe { self.backend.path_set_free_path(self.ptr) },
        }
    }
}

struct NativePathSet<'a, B: Backend + ?Sized> {
    backend: &'a B,
    handle: *const nfdpathset_t,
}

impl<'a, B: Backend + ?Sized> NativePathSet<'a, B> {
    /// # Safety
    ///
    /// `handle` must be non-null, returned by `backend`'s multi-open, and not yet freed.
    unsafe fn new(backend: &'a B, handle: *const nfdpathset_t) -> Self {
        Self { backend, handle }
    }

    fn count(&self) -> (nfdresult_t, nfdpathsetsize_t) {
        let mut count: nfdpathsetsize_t = 0;
        let raw = unsafe { self.backend.path_set_count(self.handle, &mut count) };
        (raw, count)
    }

    fn path_at(&self, index: nfdpathsetsize_t) -> (nfdresult_t, *mut nfdu8char_t) {
        let mut out_path: *mut nfdu8char_t = std::ptr::null_mut();
        let raw = unsafe { self.backend.path_set_path(self.handle, index, &mut out_path) };
        (raw, out_path)
    }
}

impl<B: Backend + ?Sized> Drop for NativePathSet<'_, B> {
    fn drop(&mut self) {
        unsafe { self.backend.path_set_free(self.handle) }
    }
}

/// Reads, copies and clears nfd's last error message; `None` when nfd has none.
pub fn take_error<B: Backend + ?Sized>(backend: &B) -> Option<String> {
    let ptr: *const c_char = backend.last_error();
    let message = unsafe { text::decode(ptr) };
    backend.clear_error();
    message.filter(|message| !message.is_empty())
}

/// Decodes the result of one dialog call.
///
/// # Safety
///
/// `output` must hold exactly what `backend` wrote through the call's
/// out-parameter (initialized to null beforehand), and must not be used again
/// after this call.
pub unsafe fn decode<B: Backend + ?Sized>(
    backend: &B,
    kind: DialogKind,
    raw: nfdresult_t,
    output: RawOutput,
) -> Result<Outcome, Error> {
    let Some(status) = Status::from_raw(raw) else {
        return Err(Error::new(ErrorKind::Internal)
            .with_message(format!("unknown nfd result code {raw}"))
            .with_dialog(kind));
    };

    match status {
        Status::Cancel => {
            trace!(dialog = kind.name(), "dialog cancelled");
            Ok(Outcome::Cancelled)
        }
        Status::Error => {
            let message = take_error(backend);
            warn!(dialog = kind.name(), message = ?message, "native dialog failed");
            Ok(Outcome::Failed(message))
        }
        Status::Ok => match output {
            RawOutput::Path(ptr) => unsafe { decode_single(backend, kind, ptr) },
            RawOutput::PathSet(handle) => unsafe { decode_multiple(backend, kind, handle) },
        },
    }
}

unsafe fn decode_single<B: Backend + ?Sized>(
    backend: &B,
    kind: DialogKind,
    ptr: *mut nfdu8char_t,
) -> Result<Outcome, Error> {
    if ptr.is_null() {
        return Err(Error::new(ErrorKind::Internal)
            .with_message("nfd reported success without a path")
            .with_dialog(kind));
    }
    let guard = unsafe { NativePath::new(backend, ptr, PathOwner::Dialog) };
    if kind.is_multiple() {
        return Err(Error::new(ErrorKind::Internal)
            .with_message("multi-select dialog produced a single path")
            .with_dialog(kind));
    }
    let path = guard.to_path_buf().ok_or_else(|| {
        Error::new(ErrorKind::Internal)
            .with_message("path vanished while decoding")
            .with_dialog(kind)
    })?;
    drop(guard);
    Ok(Outcome::Accepted(path))
}

unsafe fn decode_multiple<B: Backend + ?Sized>(
    backend: &B,
    kind: DialogKind,
    handle: *const nfdpathset_t,
) -> Result<Outcome, Error> {
    if handle.is_null() {
        return Err(Error::new(ErrorKind::Internal)
            .with_message("nfd reported success without a path set")
            .with_dialog(kind));
    }
    let set = unsafe { NativePathSet::new(backend, handle) };
    if !kind.is_multiple() {
        return Err(Error::new(ErrorKind::Internal)
            .with_message("single-result dialog produced a path set")
            .with_dialog(kind));
    }

    let (raw, count) = set.count();
    if let Some(outcome) = path_set_failure(backend, kind, raw)? {
        return Ok(outcome);
    }

    // Grown per entry; `count` is native-reported and not trusted for allocation.
    let mut paths = Vec::new();
    for index in 0..count {
        let (raw, ptr) = set.path_at(index);
        if let Some(outcome) = path_set_failure(backend, kind, raw)? {
            return Ok(outcome);
        }
        if ptr.is_null() {
            return Err(Error::new(ErrorKind::Internal)
                .with_message(format!("path set entry {index} is null"))
                .with_dialog(kind));
        }
        let guard = unsafe { NativePath::new(backend, ptr, PathOwner::PathSet) };
        let path = guard.to_path_buf().ok_or_else(|| {
            Error::new(ErrorKind::Internal)
                .with_message(format!("path set entry {index} vanished while decoding"))
                .with_dialog(kind)
        })?;
        paths.push(path);
    }

    drop(set);
    trace!(dialog = kind.name(), paths = paths.len(), "path set decoded");
    Ok(Outcome::AcceptedMany(paths))
}

// Maps a failed path-set query to `Failed`; anything but Ok/Error breaks the contract.
fn path_set_failure<B: Backend + ?Sized>(
    backend: &B,
    kind: DialogKind,
    raw: nfdresult_t,
) -> Result<Option<Outcome>, Error> {
    match Status::from_raw(raw) {
        Some(Status::Ok) => Ok(None),
        Some(Status::Error) => {
            let message = take_error(backend);
            warn!(dialog = kind.name(), message = ?message, "path set query failed");
            Ok(Some(Outcome::Failed(message)))
        }
        _ => Err(Error::new(ErrorKind::Internal)
            .with_message(format!("unexpected path set result code {raw}"))
            .with_dialog(kind)),
    }
}
