//! Purpose: Encode ordered file-type filters into nfd's `nfdu8filteritem_t` array.
//! Exports: `FilterSpec`, `EncodedFilters`.
//! Role: Owns every buffer the filter array points at for the duration of one native call.
//! Invariants: Record count and order match the input sequence exactly.
//! Invariants: Buffers are host-allocated and released by drop, never by nfd free functions.
//! Invariants: An empty filter list is passed as a null pointer with count 0.
use std::ffi::CString;
use std::ptr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind};
use crate::core::nfd::sys::{nfdfiltersize_t, nfdu8filteritem_t};
use crate::core::text;

/// A display name plus a comma-separated extension list, e.g. `("Images", "png,jpg")`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    name: String,
    spec: String,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }
}

impl<N: Into<String>, S: Into<String>> From<(N, S)> for FilterSpec {
    fn from((name, spec): (N, S)) -> Self {
        Self::new(name, spec)
    }
}

#[derive(Debug)]
pub struct EncodedFilters {
    // Heap buffers referenced by `items`; moving a CString does not move its bytes.
    _buffers: Vec<(CString, CString)>,
    items: Vec<nfdu8filteritem_t>,
    count: nfdfiltersize_t,
}

impl EncodedFilters {
    pub fn encode(filters: &[FilterSpec]) -> Result<Self, Error> {
        let count = nfdfiltersize_t::try_from(filters.len()).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("too many filters: {}", filters.len()))
                .with_source(err)
        })?;

        let buffers = filters
            .iter()
            .map(|filter| {
                let name = text::encode(filter.name()).map_err(|err| {
                    err.with_message(format!("filter name {:?} contains a nul byte", filter.name()))
                })?;
                let spec = text::encode(filter.spec()).map_err(|err| {
                    err.with_message(format!("filter spec {:?} contains a nul byte", filter.spec()))
                })?;
                Ok((name, spec))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let items = buffers
            .iter()
            .map(|(name, spec)| nfdu8filteritem_t {
                name: name.as_ptr(),
                spec: spec.as_ptr(),
            })
            .collect();

        Ok(Self {
            _buffers: buffers,
            items,
            count,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn count(&self) -> nfdfiltersize_t {
        self.count
    }

    #[cfg(test)]
    pub fn items(&self) -> &[nfdu8filteritem_t] {
        &self.items
    }

    /// Base of the record array, valid while `self` is borrowed.
    pub fn as_ptr(&self) -> *const nfdu8filteritem_t {
        if self.items.is_empty() {
            ptr::null()
        } else {
            self.items.as_ptr()
        }
    }
}
