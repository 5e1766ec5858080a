//! Purpose: Scripted fake of the nfd C boundary for integration tests.
//! Exports: `FakeBackend`, `Reply`, `Event`.
//! Role: Allocates real C strings, records every native call, and checks frees.
//! Invariants: Every pointer handed out is tracked until its matching free; double frees panic.
//! Invariants: The error message pointer stays valid until cleared, like nfd's own buffer.
#![allow(dead_code)]

use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use libc::{c_char, c_void};
use nfdx::api::Backend;
use nfdx::api::sys::{
    self, nfdfiltersize_t, nfdpathset_t, nfdpathsetsize_t, nfdresult_t, nfdu8char_t,
    nfdu8filteritem_t,
};

/// What the next dialog call reports.
#[derive(Clone, Debug)]
pub enum Reply {
    Paths(Vec<String>),
    Cancel,
    Error(Option<String>),
    Raw(nfdresult_t),
}

impl Reply {
    pub fn path(path: &str) -> Self {
        Reply::Paths(vec![path.to_string()])
    }

    pub fn paths(paths: &[&str]) -> Self {
        Reply::Paths(paths.iter().map(|path| path.to_string()).collect())
    }

    pub fn error(message: &str) -> Self {
        Reply::Error(Some(message.to_string()))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Init,
    Quit,
    OpenDialog,
    OpenDialogMultiple,
    SaveDialog,
    PickFolder,
    GetError,
    ClearError,
    PathSetCount,
    PathSetGetPath(nfdpathsetsize_t),
    FreePath,
    PathSetFreePath,
    PathSetFree,
}

impl Event {
    pub fn is_free(&self) -> bool {
        matches!(
            self,
            Event::FreePath | Event::PathSetFreePath | Event::PathSetFree
        )
    }
}

/// Arguments observed by the last dialog call, copied while they were valid.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Captured {
    pub filters: Vec<(String, String)>,
    pub filter_count: nfdfiltersize_t,
    pub filter_list_null: bool,
    pub default_path: Option<String>,
    pub default_name: Option<String>,
}

struct FakeSet {
    entries: Vec<CString>,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    captured: Captured,
    live_paths: HashSet<usize>,
    live_sets: HashSet<usize>,
    allocations: usize,
    error: Option<CString>,
}

pub struct FakeBackend {
    reply: Reply,
    init_result: nfdresult_t,
    init_error: Option<String>,
    call_delay: Duration,
    panic_on_count: bool,
    state: Mutex<State>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeBackend {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            init_result: sys::NFD_OKAY,
            init_error: None,
            call_delay: Duration::ZERO,
            panic_on_count: false,
            state: Mutex::new(State::default()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn failing_init(message: Option<&str>) -> Self {
        Self {
            init_result: sys::NFD_ERROR,
            init_error: message.map(str::to_string),
            ..Self::new(Reply::Cancel)
        }
    }

    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    pub fn panicking_on_count(mut self) -> Self {
        self.panic_on_count = true;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.state().events.iter().filter(|seen| *seen == event).count()
    }

    pub fn frees(&self) -> usize {
        self.state().events.iter().filter(|event| event.is_free()).count()
    }

    pub fn allocations(&self) -> usize {
        self.state().allocations
    }

    pub fn captured(&self) -> Captured {
        self.state().captured.clone()
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Asserts nothing handed out is still live and frees matched allocations.
    pub fn assert_balanced(&self) {
        let state = self.state();
        assert!(state.live_paths.is_empty(), "leaked {} paths", state.live_paths.len());
        assert!(state.live_sets.is_empty(), "leaked {} path sets", state.live_sets.len());
        let frees = state.events.iter().filter(|event| event.is_free()).count();
        assert_eq!(frees, state.allocations, "free count != alloc count");
    }

    fn record(&self, event: Event) {
        self.state().events.push(event);
    }

    fn alloc_path(&self, path: &str) -> *mut nfdu8char_t {
        let ptr = CString::new(path).expect("fake path").into_raw();
        let mut state = self.state();
        state.live_paths.insert(ptr as usize);
        state.allocations += 1;
        ptr
    }

    fn set_error(&self, message: Option<&str>) {
        self.state().error = message.map(|message| CString::new(message).expect("fake error"));
    }

    unsafe fn capture(
        &self,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
        default_name: *const nfdu8char_t,
    ) {
        let filters = if filter_list.is_null() {
            Vec::new()
        } else {
            let items = unsafe { std::slice::from_raw_parts(filter_list, filter_count as usize) };
            items
                .iter()
                .map(|item| unsafe { (read(item.name).expect("name"), read(item.spec).expect("spec")) })
                .collect()
        };
        let captured = Captured {
            filters,
            filter_count,
            filter_list_null: filter_list.is_null(),
            default_path: unsafe { read(default_path) },
            default_name: unsafe { read(default_name) },
        };
        self.state().captured = captured;
    }

    fn enter_call(&self) {
        if !self.call_delay.is_zero() {
            thread::sleep(self.call_delay);
        }
    }

    // Applies the scripted reply to a single-path out-parameter.
    unsafe fn reply_single(&self, out_path: *mut *mut nfdu8char_t) -> nfdresult_t {
        self.enter_call();
        match &self.reply {
            Reply::Paths(paths) => {
                let ptr = self.alloc_path(&paths[0]);
                unsafe { *out_path = ptr };
                sys::NFD_OKAY
            }
            Reply::Cancel => sys::NFD_CANCEL,
            Reply::Error(message) => {
                self.set_error(message.as_deref());
                sys::NFD_ERROR
            }
            Reply::Raw(raw) => *raw,
        }
    }
}

unsafe fn read(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_str().expect("utf-8").to_string())
}

impl Backend for FakeBackend {
    fn init(&self) -> nfdresult_t {
        self.record(Event::Init);
        if self.init_result != sys::NFD_OKAY {
            self.set_error(self.init_error.as_deref());
            return self.init_result;
        }
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        sys::NFD_OKAY
    }

    fn quit(&self) {
        self.record(Event::Quit);
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    fn last_error(&self) -> *const c_char {
        let mut state = self.state();
        state.events.push(Event::GetError);
        state.error.as_ref().map_or(ptr::null(), |error| error.as_ptr())
    }

    fn clear_error(&self) {
        let mut state = self.state();
        state.events.push(Event::ClearError);
        state.error = None;
    }

    unsafe fn open_dialog(
        &self,
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        self.record(Event::OpenDialog);
        unsafe {
            self.capture(filter_list, filter_count, default_path, ptr::null());
            self.reply_single(out_path)
        }
    }

    unsafe fn open_dialog_multiple(
        &self,
        out_paths: *mut *const nfdpathset_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        self.record(Event::OpenDialogMultiple);
        unsafe { self.capture(filter_list, filter_count, default_path, ptr::null()) };
        self.enter_call();
        match &self.reply {
            Reply::Paths(paths) => {
                let entries = paths
                    .iter()
                    .map(|path| CString::new(path.as_str()).expect("fake path"))
                    .collect();
                let set = Box::into_raw(Box::new(FakeSet { entries })) as *const c_void;
                {
                    let mut state = self.state();
                    state.live_sets.insert(set as usize);
                    state.allocations += 1;
                }
                unsafe { *out_paths = set };
                sys::NFD_OKAY
            }
            Reply::Cancel => sys::NFD_CANCEL,
            Reply::Error(message) => {
                self.set_error(message.as_deref());
                sys::NFD_ERROR
            }
            Reply::Raw(raw) => *raw,
        }
    }

    unsafe fn save_dialog(
        &self,
        out_path: *mut *mut nfdu8char_t,
        filter_list: *const nfdu8filteritem_t,
        filter_count: nfdfiltersize_t,
        default_path: *const nfdu8char_t,
        default_name: *const nfdu8char_t,
    ) -> nfdresult_t {
        self.record(Event::SaveDialog);
        unsafe {
            self.capture(filter_list, filter_count, default_path, default_name);
            self.reply_single(out_path)
        }
    }

    unsafe fn pick_folder(
        &self,
        out_path: *mut *mut nfdu8char_t,
        default_path: *const nfdu8char_t,
    ) -> nfdresult_t {
        self.record(Event::PickFolder);
        unsafe {
            self.capture(ptr::null(), 0, default_path, ptr::null());
            self.reply_single(out_path)
        }
    }

    unsafe fn path_set_count(
        &self,
        path_set: *const nfdpathset_t,
        count: *mut nfdpathsetsize_t,
    ) -> nfdresult_t {
        self.record(Event::PathSetCount);
        if self.panic_on_count {
            panic!("fake path set count panicked");
        }
        let set = unsafe { &*(path_set as *const FakeSet) };
        unsafe { *count = set.entries.len() as nfdpathsetsize_t };
        sys::NFD_OKAY
    }

    unsafe fn path_set_path(
        &self,
        path_set: *const nfdpathset_t,
        index: nfdpathsetsize_t,
        out_path: *mut *mut nfdu8char_t,
    ) -> nfdresult_t {
        self.record(Event::PathSetGetPath(index));
        let set = unsafe { &*(path_set as *const FakeSet) };
        let Some(entry) = set.entries.get(index as usize) else {
            self.set_error(Some("index out of range"));
            return sys::NFD_ERROR;
        };
        let ptr = self.alloc_path(entry.to_str().expect("utf-8"));
        unsafe { *out_path = ptr };
        sys::NFD_OKAY
    }

    unsafe fn free_path(&self, path: *mut nfdu8char_t) {
        let mut state = self.state();
        assert!(state.live_paths.remove(&(path as usize)), "free of unknown or freed path");
        state.events.push(Event::FreePath);
        drop(unsafe { CString::from_raw(path) });
    }

    unsafe fn path_set_free_path(&self, path: *const nfdu8char_t) {
        let mut state = self.state();
        assert!(state.live_paths.remove(&(path as usize)), "free of unknown or freed set path");
        state.events.push(Event::PathSetFreePath);
        drop(unsafe { CString::from_raw(path as *mut c_char) });
    }

    unsafe fn path_set_free(&self, path_set: *const nfdpathset_t) {
        let mut state = self.state();
        assert!(state.live_sets.remove(&(path_set as usize)), "free of unknown or freed path set");
        state.events.push(Event::PathSetFree);
        drop(unsafe { Box::from_raw(path_set as *mut FakeSet) });
    }
}
