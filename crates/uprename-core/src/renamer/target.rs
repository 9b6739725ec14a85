//! Final target path resolution.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::error::RenameError;
use crate::config::RenameOptions;
use crate::filename;
use crate::storage;
use crate::upload::UploadDescriptor;

/// Compute where `upload` should end up under `opts`.
///
/// Directory: the target itself if it is an existing directory, else its parent.
/// Filename, first match wins: the upload name (if enabled), the target's own
/// name (if the target is not a directory), the source's name.
pub(crate) fn resolve_final_target(
    opts: &RenameOptions,
    upload: &UploadDescriptor,
) -> Result<PathBuf, RenameError> {
    let source = upload.temporary_path.as_path();
    let target: &Path = match &opts.target {
        Some(t) if !opts.mirrors_source() => t.as_path(),
        _ => source,
    };

    let target_is_dir = storage::is_dir(target);
    let target_dir: &Path = if target_is_dir {
        target
    } else {
        target.parent().unwrap_or(Path::new(""))
    };

    let name: OsString = if opts.use_upload_name {
        filename::basename(&upload.original_name).into()
    } else if !target_is_dir {
        path_basename(target)
    } else {
        path_basename(source)
    };
    if filename::is_unusable(&name) {
        return Err(RenameError::InvalidFileName {
            name: if opts.use_upload_name {
                upload.original_name.clone()
            } else {
                name.to_string_lossy().into_owned()
            },
        });
    }

    let name = if opts.randomize {
        filename::randomize(&name)
    } else {
        name
    };

    Ok(target_dir.join(name))
}

fn path_basename(path: &Path) -> OsString {
    path.file_name().map(OsStr::to_os_string).unwrap_or_default()
}
