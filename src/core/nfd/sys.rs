// Raw FFI bindings to nativefiledialog-extended.
// The UTF-8 entry points are exported as `...U8` on Windows and as the native
// `...N` variants elsewhere, where nfdnchar_t is already UTF-8.
#![allow(non_camel_case_types, non_snake_case)]

use libc::{c_char, c_int, c_uint, c_void};

pub type nfdresult_t = c_int;

pub const NFD_ERROR: nfdresult_t = 0;
pub const NFD_OKAY: nfdresult_t = 1;
pub const NFD_CANCEL: nfdresult_t = 2;

pub type nfdu8char_t = c_char;
pub type nfdfiltersize_t = c_uint;
pub type nfdpathsetsize_t = c_uint;
pub type nfdpathset_t = c_void;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct nfdu8filteritem_t {
    pub name: *const nfdu8char_t,
    pub spec: *const nfdu8char_t,
}

#[cfg(feature = "system")]
unsafe extern "C" {
    pub fn NFD_Init() -> nfdresult_t;

    pub fn NFD_Quit();

    pub fn NFD_GetError() -> *const c_char;

    pub fn NFD_ClearError();

    #[cfg_attr(not(windows), link_name = "NFD_FreePathN")]
    pub fn NFD_FreePathU8(file_path: *mut nfdu8char_t);

    #[cfg_attr(not(windows), link_name = "NFD_OpenDialogN")]
    pub fn NFD_OpenDialogU8(
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t;

    #[cfg_attr(not(windows), link_name = "NFD_OpenDialogMultipleN")]
    pub fn NFD_OpenDialogMultipleU8(
        out_paths: *mut *const nfdpathset_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t;

    #[cfg_attr(not(windows), link_name = "NFD_SaveDialogN")]
    pub fn NFD_SaveDialogU8(
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
        default_name: *const nfdu8char_t,
    ) -> nfdresult_t;

    #[cfg_attr(not(windows), link_name = "NFD_PickFolderN")]
    pub fn NFD_PickFolderU8(
        out_path: *mut *mut nfdu8char_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t;

    pub fn NFD_PathSet_GetCount(
        path_set: *const nfdpathset_t,
        count: *mut nfdpathsetsize_t,
    ) -> nfdresult_t;

    #[cfg_attr(not(windows), link_name = "NFD_PathSet_GetPathN")]
    pub fn NFD_PathSet_GetPathU8(
        path_set: *const nfdpathset_t,
        index: nfdpathsetsize_t,
        out_path: *mut *mut nfdu8char_t,
    ) -> nfdresult_t;

    #[cfg_attr(not(windows), link_name = "NFD_PathSet_FreePathN")]
    pub fn NFD_PathSet_FreePathU8(file_path: *const nfdu8char_t);

    pub fn NFD_PathSet_Free(path_set: *const nfdpathset_t);
}
