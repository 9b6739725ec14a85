//! Filesystem side of relocation.
//!
//! Relocation is a single `rename(2)`: atomic when source and target share a
//! filesystem, an error otherwise. There is no copy fallback.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A failed move, carrying the platform error that caused it.
#[derive(Debug)]
pub struct MoveError {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub cause: io::Error,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "file '{}' could not be moved to '{}'",
            self.source_path.display(),
            self.target_path.display()
        )
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

pub fn is_dir(path: &Path) -> bool {
    path.is_dir()
}

/// Remove the file currently occupying `path`.
pub fn remove_existing(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// Rename `source` to `target`. Fails if `target` is on a different filesystem
/// or its directory is missing or not writable.
pub fn move_file(source: &Path, target: &Path) -> Result<(), MoveError> {
    fs::rename(source, target).map_err(|cause| MoveError {
        source_path: source.to_path_buf(),
        target_path: target.to_path_buf(),
        cause,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn move_file_relocates_contents() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.tmp");
        let dst = dir.path().join("out.bin");
        fs::write(&src, b"payload").unwrap();

        move_file(&src, &dst).unwrap();

        assert!(!exists(&src));
        assert_eq!(fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn move_file_into_missing_dir_keeps_cause() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.tmp");
        fs::write(&src, b"x").unwrap();
        let dst = dir.path().join("missing").join("out.bin");

        let err = move_file(&src, &dst).unwrap_err();
        assert_eq!(err.cause.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.source_path, src);
        assert_eq!(err.target_path, dst);
        assert!(err.source().is_some());
        assert!(exists(&src));
    }

    #[test]
    fn remove_existing_and_checks() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path().join("a.txt");
        fs::write(&f, b"a").unwrap();
        assert!(exists(&f));
        assert!(!is_dir(&f));
        assert!(is_dir(dir.path()));
        remove_existing(&f).unwrap();
        assert!(!exists(&f));
        assert!(remove_existing(&f).is_err());
    }
}
