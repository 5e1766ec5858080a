// Owned, immutable result of one dialog operation.
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::core::error::{Error, ErrorKind};
use crate::core::nfd::Status;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// One path from open, save or pick-folder.
    Accepted(#[serde(serialize_with = "lossy_path")] PathBuf),
    /// Every path chosen in a multi-select open, in the order nfd reported them.
    AcceptedMany(#[serde(serialize_with = "lossy_paths")] Vec<PathBuf>),
    /// The user dismissed the dialog.
    Cancelled,
    /// nfd reported an error; the message is absent when nfd gave none.
    Failed(Option<String>),
}

// Paths may hold non-UTF-8 bytes on Unix; JSON gets the lossy text form.
#[allow(clippy::ptr_arg)]
fn lossy_path<S: Serializer>(path: &PathBuf, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

#[allow(clippy::ptr_arg)]
fn lossy_paths<S: Serializer>(paths: &Vec<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(paths.iter().map(|path| path.to_string_lossy()))
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Accepted(_) | Outcome::AcceptedMany(_) => Status::Ok,
            Outcome::Cancelled => Status::Cancel,
            Outcome::Failed(_) => Status::Error,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_) | Outcome::AcceptedMany(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Outcome::Accepted(path) => Some(path),
            _ => None,
        }
    }

    pub fn paths(&self) -> Option<&[PathBuf]> {
        match self {
            Outcome::AcceptedMany(paths) => Some(paths),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Failed(message) => message.as_deref(),
            _ => None,
        }
    }

    /// Every accepted path, single or multiple; empty otherwise.
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            Outcome::Accepted(path) => vec![path],
            Outcome::AcceptedMany(paths) => paths,
            Outcome::Cancelled | Outcome::Failed(_) => Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<Value, Error> {
        serde_json::to_value(self).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("outcome is not representable as json")
                .with_source(err)
        })
    }
}
