//! Filesystem helpers for whole-file writes.
//!
//! Entry and credential files are always written as complete blobs. Replacing
//! an existing file goes through a temp file in the same directory followed by
//! a rename, so a crash leaves either the old or the new contents on disk.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CryptnoteError, Result};

/// Rename `temp_path` onto `destination`, replacing it in one step.
///
/// The destination is never removed beforehand; if the rename fails it keeps
/// its old contents and the temp file is cleaned up.
pub fn replace_file(temp_path: &Path, destination: &Path) -> io::Result<()> {
    fs::rename(temp_path, destination).map_err(|err| {
        let _ = fs::remove_file(temp_path);
        err
    })
}

/// Replace the contents of `path` with `data` via temp file + rename.
///
/// `private` restricts the file to the owner (mode `0600`) on Unix.
pub fn write_atomic(path: &Path, data: &[u8], private: bool) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| CryptnoteError::Storage(format!("Invalid path: {}", path.display())))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CryptnoteError::Storage(format!("Invalid filename: {}", path.display())))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CryptnoteError::Storage(format!("System time error: {}", e)))?
        .as_nanos();
    let temp_path = parent.join(format!(".{}.{}.tmp", filename, nanos));

    let mut file = open_new(&temp_path, private)
        .map_err(|e| CryptnoteError::Storage(format!("Temp file create failed: {}", e)))?;
    file.write_all(data)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CryptnoteError::Storage(format!("Temp file write failed: {}", e))
        })?;
    drop(file);

    replace_file(&temp_path, path)
        .map_err(|e| CryptnoteError::Storage(format!("Atomic rename failed: {}", e)))?;
    Ok(())
}

/// Write `data` to a file that must not exist yet.
///
/// Returns `Ok(false)` without touching anything when `path` is already taken.
pub fn write_new(path: &Path, data: &[u8]) -> Result<bool> {
    let mut file = match open_new(path, false) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => {
            return Err(CryptnoteError::Storage(format!(
                "Failed to create {}: {}",
                path.display(),
                err
            )))
        }
    };
    if let Err(err) = file.write_all(data).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(CryptnoteError::Storage(format!(
            "Failed to write {}: {}",
            path.display(),
            err
        )));
    }
    Ok(true)
}

fn open_new(path: &Path, private: bool) -> io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if private {
            options.mode(0o600);
        }
    }
    #[cfg(not(unix))]
    let _ = private;
    options.open(path)
}
