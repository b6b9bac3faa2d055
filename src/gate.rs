//! Attachment admission check: readability and size limit.
//!
//! The gate is advisory. A rejected file never aborts the run; the message
//! is simply sent without the attachment.

use std::fs::File;
use std::path::Path;

use humansize::{format_size, BINARY};

/// Outcome of the gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The file may be attached.
    Attach,
    /// The file cannot be opened for reading.
    Unreadable,
    /// The file size is at or above the configured maximum.
    Oversize { size: u64, limit: u64 },
}

/// Check whether the file at `path` may be attached.
///
/// `max_size == 0` means unlimited. The size comparison is strict
/// less-than for "ok": a file exactly at the limit is rejected.
pub fn check(path: &Path, max_size: u64) -> Decision {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot open attachment");
            return Decision::Unreadable;
        }
    };

    let size = match file.metadata() {
        Ok(meta) => meta.len(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot stat attachment");
            return Decision::Unreadable;
        }
    };

    if max_size > 0 && size >= max_size {
        tracing::debug!(
            path = %path.display(),
            size = %format_size(size, BINARY),
            limit = %format_size(max_size, BINARY),
            "attachment exceeds max_file_size"
        );
        return Decision::Oversize {
            size,
            limit: max_size,
        };
    }

    Decision::Attach
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_with_bytes(dir: &tempfile::TempDir, name: &str, len: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&vec![b'x'; len]).unwrap();
        path
    }

    #[test]
    fn test_readable_file_under_limit_attaches() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with_bytes(&dir, "small.bin", 99);
        assert_eq!(check(&path, 100), Decision::Attach);
    }

    #[test]
    fn test_size_equal_to_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with_bytes(&dir, "exact.bin", 100);
        assert_eq!(
            check(&path, 100),
            Decision::Oversize {
                size: 100,
                limit: 100
            }
        );
    }

    #[test]
    fn test_zero_limit_means_unlimited() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with_bytes(&dir, "big.bin", 4096);
        assert_eq!(check(&path, 0), Decision::Attach);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.bin");
        assert_eq!(check(&path, 0), Decision::Unreadable);
    }

    #[test]
    fn test_empty_file_attaches() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with_bytes(&dir, "empty.bin", 0);
        assert_eq!(check(&path, 100), Decision::Attach);
    }
}
