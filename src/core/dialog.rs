//! Purpose: The four dialog operations, each bracketed by an nfd init/quit session.
//! Exports: `FileDialog`.
//! Role: Sequences encoding -> native call -> decoding for open, open-multiple, save, pick-folder.
//! Invariants: Caller input is fully encoded before any native call is made.
//! Invariants: One session per process at a time; the lock is held from init through quit.
//! Invariants: Quit runs whenever init succeeded, including when decoding errors or panics.
use std::path::Path;
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::core::decode::{self, DialogKind, RawOutput};
use crate::core::error::{Error, ErrorKind};
use crate::core::filter::{EncodedFilters, FilterSpec};
use crate::core::nfd::sys::{nfdpathset_t, nfdresult_t, nfdu8char_t};
use crate::core::nfd::{Backend, Status};
use crate::core::outcome::Outcome;
use crate::core::text;

// nfd keeps process-global state between NFD_Init and NFD_Quit.
static SESSION_LOCK: Mutex<()> = Mutex::new(());

struct Session<'a, B: Backend + ?Sized> {
    backend: &'a B,
    kind: DialogKind,
    _lock: MutexGuard<'static, ()>,
}

impl<'a, B: Backend + ?Sized> Session<'a, B> {
    fn begin(backend: &'a B, kind: DialogKind) -> Result<Self, Error> {
        // A poisoned lock only means an earlier session panicked; its quit already ran.
        let lock = SESSION_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let raw = backend.init();
        if Status::from_raw(raw) != Some(Status::Ok) {
            let detail = decode::take_error(backend);
            let message = match detail {
                Some(detail) => format!("failed to initialize nfd: {detail}"),
                None => format!("failed to initialize nfd (result code {raw})"),
            };
            return Err(Error::new(ErrorKind::Init)
                .with_message(message)
                .with_dialog(kind));
        }
        trace!(dialog = kind.name(), "nfd session started");
        Ok(Self {
            backend,
            kind,
            _lock: lock,
        })
    }
}

impl<B: Backend + ?Sized> Drop for Session<'_, B> {
    fn drop(&mut self) {
        self.backend.quit();
        trace!(dialog = self.kind.name(), "nfd session ended");
    }
}

/// Entry point for native file dialogs over a [`Backend`].
#[derive(Clone, Debug, Default)]
pub struct FileDialog<B> {
    backend: B,
}

#[cfg(feature = "system")]
impl FileDialog<crate::core::nfd::SystemBackend> {
    pub fn new() -> Self {
        Self::with_backend(crate::core::nfd::SystemBackend)
    }
}

impl<B: Backend> FileDialog<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn open_file(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
    ) -> Result<Outcome, Error> {
        let kind = DialogKind::OpenFile;
        let filters = EncodedFilters::encode(filters).map_err(|err| err.with_dialog(kind))?;
        let default_path = text::encode_path(default_path).map_err(|err| err.with_dialog(kind))?;
        debug!(dialog = kind.name(), filters = filters.len(), "opening dialog");

        self.run(kind, |backend| {
            let mut out_path: *mut nfdu8char_t = ptr::null_mut();
            let raw = unsafe {
                backend.open_dialog(
                    &mut out_path,
                    filters.as_ptr(),
                    filters.count(),
                    text::as_ptr(&default_path),
                )
            };
            (raw, RawOutput::Path(out_path))
        })
    }

    pub fn open_file_multiple(
        &self,
        filters: &[FilterSpec],
        default_path: Option<&Path>,
    ) -> Result<Outcome, Error> {
        let kind = DialogKind::OpenFileMultiple;
        let filters = EncodedFilters::encode(filters).map_err(|err| err.with_dialog(kind))?;
        let default_path = text::encode_path(default_path).map_err(|err| err.with_dialog(kind))?;
        debug!(dialog = kind.name(), filters = filters.len(), "opening dialog");

        self.run(kind, |backend| {
            let mut out_paths: *const nfdpathset_t = ptr::null();
            let raw = unsafe {
                backend.open_dialog_multiple(
                    &mut out_paths,
                    filters.as_ptr(),
                    filters.count(),
                    text::as_ptr(&default_path),
                )
            };
            (raw, RawOutput::PathSet(out_paths))
        })
    }

    pub fn save_file(
        &self,
        filters: &[FilterSpec],
        default_name: Option<&str>,
        default_path: Option<&Path>,
    ) -> Result<Outcome, Error> {
        let kind = DialogKind::SaveFile;
        let filters = EncodedFilters::encode(filters).map_err(|err| err.with_dialog(kind))?;
        let default_name = text::encode_optional(default_name).map_err(|err| {
            err.with_message("default name contains a nul byte")
                .with_dialog(kind)
        })?;
        let default_path = text::encode_path(default_path).map_err(|err| err.with_dialog(kind))?;
        debug!(dialog = kind.name(), filters = filters.len(), "opening dialog");

        self.run(kind, |backend| {
            let mut out_path: *mut nfdu8char_t = ptr::null_mut();
            let raw = unsafe {
                backend.save_dialog(
                    &mut out_path,
                    filters.as_ptr(),
                    filters.count(),
                    text::as_ptr(&default_path),
                    text::as_ptr(&default_name),
                )
            };
            (raw, RawOutput::Path(out_path))
        })
    }

    pub fn pick_folder(&self, default_path: Option<&Path>) -> Result<Outcome, Error> {
        let kind = DialogKind::PickFolder;
        let default_path = text::encode_path(default_path).map_err(|err| err.with_dialog(kind))?;
        debug!(dialog = kind.name(), "opening dialog");

        self.run(kind, |backend| {
            let mut out_path: *mut nfdu8char_t = ptr::null_mut();
            let raw = unsafe { backend.pick_folder(&mut out_path, text::as_ptr(&default_path)) };
            (raw, RawOutput::Path(out_path))
        })
    }

    fn run<F>(&self, kind: DialogKind, call: F) -> Result<Outcome, Error>
    where
        F: FnOnce(&B) -> (nfdresult_t, RawOutput),
    {
        let session = Session::begin(&self.backend, kind)?;
        let (raw, output) = call(&self.backend);
        let outcome = unsafe { decode::decode(&self.backend, kind, raw, output) };
        drop(session);

        match &outcome {
            Ok(outcome) => debug!(dialog = kind.name(), status = ?outcome.status(), "dialog closed"),
            Err(err) => debug!(dialog = kind.name(), error = %err, "dialog result rejected"),
        }
        outcome
    }
}
