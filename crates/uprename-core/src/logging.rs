//! Logging init: file under XDG state dir, or graceful fallback to stderr.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,uprename_core=debug";
const LOG_FILE_NAME: &str = "uprename.log";

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(std::fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(std::fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// `RUST_LOG` if set, else `info,uprename_core=debug`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Create `log_dir` if needed and open the log file there for appending.
fn open_log_file(log_dir: &Path) -> Result<(fs::File, PathBuf)> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;
    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .with_context(|| format!("failed to open log file {}", log_file_path.display()))?;
    Ok((file, log_file_path))
}

/// Initialize structured logging to `~/.local/state/uprename/uprename.log`.
/// On failure (e.g. log dir unwritable), returns Err so the caller can fall back to stderr.
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("uprename")?;
    init_logging_in(&xdg_dirs.get_state_home().join("uprename"))
}

/// Initialize structured logging to `uprename.log` inside `log_dir`.
pub fn init_logging_in(log_dir: &Path) -> Result<()> {
    let (file, log_file_path) = open_log_file(log_dir)?;
    let writer: BoxMakeWriter = BoxMakeWriter::new(FileMakeWriter(file));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("logging already initialized: {e}"))?;

    tracing::info!("uprename logging initialized at {}", log_file_path.display());
    Ok(())
}

/// Initialize logging to stderr only (no file). Use when `init_logging()` fails.
pub fn init_logging_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("logging already initialized: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_log_file_creates_dir_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("state").join("uprename");

        let (mut file, path) = open_log_file(&log_dir).unwrap();
        assert_eq!(path, log_dir.join("uprename.log"));
        file.write_all(b"first\n").unwrap();
        drop(file);

        let (mut again, _) = open_log_file(&log_dir).unwrap();
        again.write_all(b"second\n").unwrap();
        drop(again);

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn file_writer_writes_through_clone() {
        let dir = tempfile::tempdir().unwrap();
        let (file, path) = open_log_file(dir.path()).unwrap();
        let make = FileMakeWriter(file);
        let mut w = make.make_writer();
        w.write_all(b"event\n").unwrap();
        w.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "event\n");
    }

    // The only test in this crate that installs the global subscriber.
    #[test]
    fn init_installs_file_subscriber_once() {
        let dir = tempfile::tempdir().unwrap();
        init_logging_in(dir.path()).unwrap();
        assert!(dir.path().join(LOG_FILE_NAME).exists());

        assert!(init_logging_stderr().is_err());
        assert!(init_logging_in(dir.path()).is_err());
    }
}
