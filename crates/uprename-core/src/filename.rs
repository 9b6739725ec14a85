//! Filename derivation: basenames of untrusted names, stem/extension split,
//! and randomized names.
//!
//! Names taken from the filesystem stay `OsStr` throughout; only the
//! client-supplied upload name is a `String`.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

static SUFFIX_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Last component of `name`, splitting on both `/` and `\`.
///
/// Client-supplied names come from any platform, so Windows separators are
/// treated as separators here even on Unix. Trailing separators are ignored.
pub fn basename(name: &str) -> &str {
    let trimmed = name.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// True for names that cannot be used as a file inside a directory.
pub fn is_unusable(name: &OsStr) -> bool {
    name.is_empty() || name == "." || name == ".."
}

/// Split `file_name` into stem and extension at the last dot.
///
/// A leading dot is part of the stem (`.env` has no extension).
pub fn split_name(file_name: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or(file_name);
    (stem, path.extension())
}

/// A token unique within this process and, with overwhelming probability,
/// across processes: `_` followed by hex seconds, microseconds, a wrapping
/// counter and 32 random bits.
pub fn unique_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let seq = SUFFIX_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xffff;
    let entropy = Uuid::new_v4().simple().to_string();
    format!(
        "_{:08x}{:05x}{:04x}{}",
        now.as_secs(),
        now.subsec_micros(),
        seq,
        &entropy[..8]
    )
}

/// `report.pdf` → `report_<token>.pdf`; names without an extension just get the token.
pub fn randomize(file_name: &OsStr) -> OsString {
    let (stem, ext) = split_name(file_name);
    let mut out = stem.to_os_string();
    out.push(unique_suffix());
    if let Some(ext) = ext {
        out.push(".");
        out.push(ext);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn basename_strips_both_separators() {
        assert_eq!(basename("report.pdf"), "report.pdf");
        assert_eq!(basename("/tmp/upl9f.tmp"), "upl9f.tmp");
        assert_eq!(basename("C:\\Users\\me\\report.pdf"), "report.pdf");
        assert_eq!(basename("../../etc/passwd"), "passwd");
        assert_eq!(basename("dir/"), "dir");
    }

    #[test]
    fn basename_degenerate() {
        assert_eq!(basename(""), "");
        assert_eq!(basename("/"), "");
        assert_eq!(basename(".."), "..");
        assert!(is_unusable(OsStr::new(basename("/"))));
        assert!(is_unusable(OsStr::new(basename("a/.."))));
        assert!(!is_unusable(OsStr::new(basename("a/b"))));
    }

    #[test]
    fn split_name_cases() {
        let split = |s: &'static str| split_name(OsStr::new(s));
        assert_eq!(split("report.pdf"), (OsStr::new("report"), Some(OsStr::new("pdf"))));
        assert_eq!(
            split("archive.tar.gz"),
            (OsStr::new("archive.tar"), Some(OsStr::new("gz")))
        );
        assert_eq!(split("README"), (OsStr::new("README"), None));
        assert_eq!(split(".env"), (OsStr::new(".env"), None));
        assert_eq!(split("trailing."), (OsStr::new("trailing"), Some(OsStr::new(""))));
    }

    #[test]
    fn unique_suffix_shape() {
        let s = unique_suffix();
        assert!(s.starts_with('_'));
        assert_eq!(s.len(), 1 + 8 + 5 + 4 + 8);
        assert!(s[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn unique_suffix_never_repeats() {
        let seen: HashSet<String> = (0..10_000).map(|_| unique_suffix()).collect();
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn unique_suffix_carries_random_bits() {
        // Last eight hex digits are random.
        let tails: HashSet<String> = (0..64).map(|_| unique_suffix()[18..].to_string()).collect();
        assert!(tails.len() > 1);
    }

    #[test]
    fn randomize_keeps_extension() {
        let r = randomize(OsStr::new("report.pdf")).into_string().unwrap();
        assert!(r.starts_with("report_"));
        assert!(r.ends_with(".pdf"));
        assert_ne!(r, "report.pdf");

        let plain = randomize(OsStr::new("README")).into_string().unwrap();
        assert!(plain.starts_with("README_"));
        assert!(!plain.contains('.'));
    }

    #[cfg(unix)]
    #[test]
    fn randomize_preserves_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"up\xff.tmp");
        let (stem, ext) = split_name(name);
        assert_eq!(stem.as_bytes(), b"up\xff");
        assert_eq!(ext, Some(OsStr::new("tmp")));

        let out = randomize(name);
        let bytes = out.as_bytes();
        assert!(bytes.starts_with(b"up\xff_"));
        assert!(bytes.ends_with(b".tmp"));
    }
}
