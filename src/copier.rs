//! Best-effort side copy of the attachment into another directory.
//!
//! The copy keeps only the base filename and writes the new file with a
//! fixed permissive mode instead of the source's permission bits. Errors
//! are returned to the caller, which logs and swallows them: a failed
//! copy never prevents the mail from being sent.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Copy `src` byte-for-byte into `dest_dir`, returning the new path.
pub fn copy_to_dir(src: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
    let mut from = File::open(src)?;

    let name = src.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "source path has no file name")
    })?;
    let dest = dest_dir.join(name);

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }

    let mut to = options.open(&dest)?;
    io::copy(&mut from, &mut to)?;
    Ok(dest)
}
