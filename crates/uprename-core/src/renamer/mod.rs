//! Upload relocation.
//!
//! [`UploadRenamer`] resolves the final location of a freshly received file
//! from its [`RenameOptions`], moves it there, and remembers the result so the
//! same source is never moved twice. Filtering an already relocated source
//! returns the remembered value without touching the filesystem, because the
//! original path no longer holds the file.

mod error;
mod target;


use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use error::{ErrorKind, RenameError};

use crate::config::RenameOptions;
use crate::storage;
use crate::upload::UploadValue;

/// Moves uploads to their final location, at most once per source path.
///
/// Not synchronized: share it across threads only behind a lock.
#[derive(Debug, Default)]
pub struct UploadRenamer {
    options: RenameOptions,
    relocated: HashMap<PathBuf, UploadValue>,
}

impl UploadRenamer {
    /// Renamer with the given policy. The target is validated like [`set_target`](Self::set_target).
    pub fn new(options: RenameOptions) -> Result<Self, RenameError> {
        options.validate()?;
        Ok(Self {
            options,
            relocated: HashMap::new(),
        })
    }

    /// Renamer with default policy and the given target (validated like [`set_target`](Self::set_target)).
    pub fn with_target(target: impl Into<PathBuf>) -> Result<Self, RenameError> {
        let mut renamer = Self::default();
        renamer.set_target(target)?;
        Ok(renamer)
    }

    /// Set the target file path or directory; `"*"` keeps uploads where they are.
    ///
    /// Rejects empty paths and paths containing NUL; the previous target is kept.
    pub fn set_target(&mut self, target: impl Into<PathBuf>) -> Result<&mut Self, RenameError> {
        let target = target.into();
        validate_target(&target)?;
        self.options.target = Some(target);
        Ok(self)
    }

    pub fn set_use_upload_name(&mut self, flag: bool) -> &mut Self {
        self.options.use_upload_name = flag;
        self
    }

    pub fn set_overwrite(&mut self, flag: bool) -> &mut Self {
        self.options.overwrite = flag;
        self
    }

    pub fn set_randomize(&mut self, flag: bool) -> &mut Self {
        self.options.randomize = flag;
        self
    }

    pub fn target(&self) -> Option<&Path> {
        self.options.target.as_deref()
    }

    pub fn use_upload_name(&self) -> bool {
        self.options.use_upload_name
    }

    pub fn overwrite(&self) -> bool {
        self.options.overwrite
    }

    pub fn randomize(&self) -> bool {
        self.options.randomize
    }

    pub fn options(&self) -> &RenameOptions {
        &self.options
    }

    /// Whether `source` has already been relocated by this renamer.
    pub fn is_memoized(&self, source: &Path) -> bool {
        self.relocated.contains_key(source)
    }

    /// Where `value` would be moved under the current policy.
    ///
    /// With randomization on, every call yields a fresh name.
    pub fn final_target(&self, value: &UploadValue) -> Result<PathBuf, RenameError> {
        target::resolve_final_target(&self.options, &value.to_descriptor())
    }

    /// Move the upload to its final location and return it in the same shape.
    ///
    /// Returns `value` unchanged when the source does not exist or already sits
    /// at its final location. On error nothing is remembered.
    pub fn filter(&mut self, value: UploadValue) -> Result<UploadValue, RenameError> {
        let source = value.source_path().to_path_buf();

        if let Some(done) = self.relocated.get(&source) {
            tracing::debug!(source = %source.display(), "upload already relocated");
            return Ok(done.clone());
        }

        if !storage::exists(&source) {
            tracing::debug!(source = %source.display(), "source missing, nothing to relocate");
            return Ok(value);
        }

        let target_file = self.final_target(&value)?;
        if source == target_file {
            tracing::debug!(source = %source.display(), "already at final location");
            return Ok(value);
        }

        self.clear_target(&target_file)?;
        storage::move_file(&source, &target_file)?;
        tracing::info!(
            source = %source.display(),
            target = %target_file.display(),
            "upload relocated"
        );

        let result = value.relocated(target_file);
        self.relocated.insert(source, result.clone());
        Ok(result)
    }

    /// Make room at `target_file` or refuse, per the overwrite policy.
    fn clear_target(&self, target_file: &Path) -> Result<(), RenameError> {
        if !storage::exists(target_file) {
            return Ok(());
        }
        if !self.options.overwrite {
            return Err(RenameError::TargetExists {
                path: target_file.to_path_buf(),
            });
        }
        tracing::warn!(target = %target_file.display(), "overwriting existing file");
        storage::remove_existing(target_file).map_err(|source| RenameError::Remove {
            path: target_file.to_path_buf(),
            source,
        })
    }
}

impl TryFrom<RenameOptions> for UploadRenamer {
    type Error = RenameError;

    fn try_from(options: RenameOptions) -> Result<Self, Self::Error> {
        Self::new(options)
    }
}

pub(crate) fn validate_target(target: &Path) -> Result<(), RenameError> {
    let raw = target.as_os_str();
    let reason = if raw.is_empty() {
        "must not be empty"
    } else if raw.as_encoded_bytes().contains(&0) {
        "must not contain NUL"
    } else {
        return Ok(());
    };
    Err(RenameError::InvalidTarget {
        target: target.to_string_lossy().into_owned(),
        reason,
    })
}
