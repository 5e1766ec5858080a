//! Purpose: Safe Rust surface over the nativefiledialog-extended C library.
//! Exports: `api` (dialog operations, outcomes, filters, errors, backend seam).
//! Role: Library crate; encodes requests, calls nfd, and decodes owned results.
//! Invariants: Every pointer nfd hands back is freed exactly once on every exit path.
//! Invariants: At most one dialog session is active per process.
pub mod api;
mod core;
