//! Purpose: Route every native dialog call through one swappable boundary.
//! Exports: `Backend`, `Status`, `SystemBackend` (feature `system`), raw `sys` bindings.
//! Role: The only place the crate names nfd entry points; fakes implement `Backend` in tests.
//! Invariants: `Backend` methods mirror the C signatures one-to-one (raw pointers, raw status).
//! Invariants: All FFI interaction is confined to this module + `sys`.
use libc::c_char;
use serde::Serialize;

pub mod sys;


use sys::{
    nfdfiltersize_t, nfdpathset_t, nfdpathsetsize_t, nfdresult_t, nfdu8char_t,
    nfdu8filteritem_t,
};

/// Result code reported by every status-returning nfd entry point.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Error,
    Ok,
    Cancel,
}

impl Status {
    /// Maps a raw `nfdresult_t`; `None` for codes outside the documented set.
    pub fn from_raw(raw: nfdresult_t) -> Option<Self> {
        match raw {
            sys::NFD_ERROR => Some(Self::Error),
            sys::NFD_OKAY => Some(Self::Ok),
            sys::NFD_CANCEL => Some(Self::Cancel),
            _ => None,
        }
    }

    pub fn as_raw(self) -> nfdresult_t {
        match self {
            Self::Error => sys::NFD_ERROR,
            Self::Ok => sys::NFD_OKAY,
            Self::Cancel => sys::NFD_CANCEL,
        }
    }
}

/// The native dialog boundary.
///
/// Each method corresponds to exactly one nfd entry point and keeps its C
/// shape, so an implementation sees the same pointers the real library would.
///
/// # Safety
///
/// Callers of the `unsafe` methods must pass pointers that satisfy the nfd
/// contract: out-pointers are writable, string pointers are null or point at
/// null-terminated UTF-8 that stays alive for the call, the filter array holds
/// `filter_count` records, and every pointer handed to a free function came
/// from this backend and has not been freed yet.
///
/// Implementations must hand out path and path-set pointers that stay valid
/// until passed back to the matching free method, and an error pointer that
/// stays valid until the next call on the backend.
pub trait Backend {
    fn init(&self) -> nfdresult_t;

    fn quit(&self);

    fn last_error(&self) -> *const c_char;

    fn clear_error(&self);

    unsafe fn open_dialog(
        &self,
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t;

    unsafe fn open_dialog_multiple(
        &self,
        out_paths: *mut *const nfdpathset_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t;

    unsafe fn save_dialog(
        &self,
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
        default_name: *const nfdu8char_t,
    ) -> nfdresult_t;

    unsafe fn pick_folder(
        &self,
        out_path: *mut *mut nfdu8char_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t;

    unsafe fn path_set_count(
        &self,
        path_set: *const nfdpathset_t,
        count: *mut nfdpathsetsize_t,
    ) -> nfdresult_t;

    unsafe fn path_set_path(
        &self,
        path_set: *const nfdpathset_t,
        index: nfdpathsetsize_t,
        out_path: *mut *mut nfdu8char_t,
    ) -> nfdresult_t;

    unsafe fn free_path(&self, path: *mut nfdu8char_t);

    unsafe fn path_set_free_path(&self, path: *const nfdu8char_t);

    unsafe fn path_set_free(&self, path_set: *const nfdpathset_t);
}

impl<B: Backend + ?Sized> Backend for &B {
    fn init(&self) -> nfdresult_t {
        (**self).init()
    }

    fn quit(&self) {
        (**self).quit()
    }

    fn last_error(&self) -> *const c_char {
        (**self).last_error()
    }

    fn clear_error(&self) {
        (**self).clear_error()
    }

    unsafe fn open_dialog(
        &self,
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        unsafe { (**self).open_dialog(out_path, filter_list, filter_count, default_path) }
    }

    unsafe fn open_dialog_multiple(
        &self,
        out_paths: *mut *const nfdpathset_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        unsafe { (**self).open_dialog_multiple(out_paths, filter_list, filter_count, default_path) }
    }

    unsafe fn save_dialog(
        &self,
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
        default_name: *const nfdu8char_t,
    ) -> nfdresult_t {
        unsafe {
            (**self).save_dialog(
                out_path,
                filter_list,
                filter_count,
                default_path,
                default_name,
            )
        }
    }

    unsafe fn pick_folder(
        &self,
        out_path: *mut *mut nfdu8char_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        unsafe { (**self).pick_folder(out_path, default_path) }
    }

    unsafe fn path_set_count(
        &self,
        path_set: *const nfdpathset_t,
        count: *mut nfdpathsetsize_t,
    ) -> nfdresult_t {
        unsafe { (**self).path_set_count(path_set, count) }
    }

    unsafe fn path_set_path(
        &self,
        path_set: *const nfdpathset_t,
        index: nfdpathsetsize_t,
        out_path: *mut *mut nfdu8char_t,
    ) -> nfdresult_t {
        unsafe { (**self).path_set_path(path_set, index, out_path) }
    }

    unsafe fn free_path(&self, path: *mut nfdu8char_t) {
        unsafe { (**self).free_path(path) }
    }

    unsafe fn path_set_free_path(&self, path: *const nfdu8char_t) {
        unsafe { (**self).path_set_free_path(path) }
    }

    unsafe fn path_set_free(&self, path_set: *const nfdpathset_t) {
        unsafe { (**self).path_set_free(path_set) }
    }
}

/// The real nfd library, linked by `build.rs`.
#[cfg(feature = "system")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemBackend;

#[cfg(feature = "system")]
impl Backend for SystemBackend {
    fn init(&self) -> nfdresult_t {
        unsafe { sys::NFD_Init() }
    }

    fn quit(&self) {
        unsafe { sys::NFD_Quit() }
    }

    fn last_error(&self) -> *const c_char {
        unsafe { sys::NFD_GetError() }
    }

    fn clear_error(&self) {
        unsafe { sys::NFD_ClearError() }
    }

    unsafe fn open_dialog(
        &self,
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        unsafe { sys::NFD_OpenDialogU8(out_path, filter_list, filter_count, default_path) }
    }

    unsafe fn open_dialog_multiple(
        &self,
        out_paths: *mut *const nfdpathset_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        unsafe { sys::NFD_OpenDialogMultipleU8(out_paths, filter_list, filter_count, default_path) }
    }

    unsafe fn save_dialog(
        &self,
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
        default_name: *const nfdu8char_t,
    ) -> nfdresult_t {
        unsafe {
            sys::NFD_SaveDialogU8(
                out_path,
                filter_list,
                filter_count,
                default_path,
                default_name,
            )
        }
    }

    unsafe fn pick_folder(
        &self,
        out_path: *mut *mut nfdu8char_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        unsafe { sys::NFD_PickFolderU8(out_path, default_path) }
    }

    unsafe fn path_set_count(
        &self,
        path_set: *const nfdpathset_t,
        count: *mut nfdpathsetsize_t,
    ) -> nfdresult_t {
        unsafe { sys::NFD_PathSet_GetCount(path_set, count) }
    }

    unsafe fn path_set_path(
        &self,
        path_set: *const nfdpathset_t,
        index: nfdpathsetsize_t,
        out_path: *mut *mut nfdu8char_t,
    ) -> nfdresult_t {
        unsafe { sys::NFD_PathSet_GetPathU8(path_set, index, out_path) }
    }

    unsafe fn free_path(&self, path: *mut nfdu8char_t) {
        unsafe { sys::NFD_FreePathU8(path) }
    }

    unsafe fn path_set_free_path(&self, path: *const nfdu8char_t) {
        unsafe { sys::NFD_PathSet_FreePathU8(path) }
    }

    unsafe fn path_set_free(&self, path_set: *const nfdpathset_t) {
        unsafe { sys::NFD_PathSet_Free(path_set) }
    }
}
