//! Post-upload file relocation.
//!
//! Takes a freshly received file (a bare path or an [`UploadDescriptor`]),
//! works out its final location from [`RenameOptions`] and moves it there
//! exactly once.

pub mod config;
pub mod logging;

pub mod filename;
pub mod renamer;
pub mod storage;
pub mod upload;

pub use config::RenameOptions;
pub use renamer::{ErrorKind, RenameError, UploadRenamer};
pub use storage::MoveError;
pub use upload::{UploadDescriptor, UploadValue};
