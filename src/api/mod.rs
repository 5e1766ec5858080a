//! Purpose: Define the stable public Rust API boundary for nfdx.
//! Exports: `FileDialog`, `Outcome`, `FilterSpec`, `Error`, the `Backend` seam, and
//! free functions bound to the system library (feature `system`).
//! Role: Public, additive-only surface; hides encoding and decoding internals.
//! Invariants: This module is the only public path to core types.
//! Invariants: Raw `sys` bindings are exposed only for implementing `Backend`.

pub use crate::core::decode::DialogKind;
pub use crate::core::dialog::FileDialog;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::filter::FilterSpec;
#[cfg(feature = "system")]
pub use crate::core::nfd::SystemBackend;
pub use crate::core::nfd::{Backend, Status, sys};
pub use crate::core::outcome::Outcome;

#[cfg(feature = "system")]
mod system {
    use std::path::Path;

    use super::{Error, FileDialog, FilterSpec, Outcome};

    pub fn open_file(filters: &[FilterSpec], default_path: Option<&Path>) -> Result<Outcome, Error> {
        FileDialog::new().open_file(filters, default_path)
    }

    pub fn open_file_multiple(
        filters: &[FilterSpec],
        default_path: Option<&Path>,
    ) -> Result<Outcome, Error> {
        FileDialog::new().open_file_multiple(filters, default_path)
    }

    pub fn save_file(
        filters: &[FilterSpec],
        default_name: Option<&str>,
        default_path: Option<&Path>,
    ) -> Result<Outcome, Error> {
        FileDialog::new().save_file(filters, default_name, default_path)
    }

    pub fn pick_folder(default_path: Option<&Path>) -> Result<Outcome, Error> {
        FileDialog::new().pick_folder(default_path)
    }
}

#[cfg(feature = "system")]
pub use system::{open_file, open_file_multiple, pick_folder, save_file};
