//! Error types for upload relocation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::MoveError;

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration or a policy refusal. Nothing was touched.
    InvalidArgument,
    /// The filesystem refused an operation. The file was not relocated.
    Runtime,
}

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: &'static str },

    #[error("file '{}' could not be renamed: it already exists", path.display())]
    TargetExists { path: PathBuf },

    #[error("'{name}' does not yield a usable file name")]
    InvalidFileName { name: String },

    #[error("could not remove existing file '{}'", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Move(#[from] MoveError),
}

impl RenameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenameError::InvalidTarget { .. }
            | RenameError::TargetExists { .. }
            | RenameError::InvalidFileName { .. } => ErrorKind::InvalidArgument,
            RenameError::Remove { .. } | RenameError::Move(_) => ErrorKind::Runtime,
        }
    }
}
