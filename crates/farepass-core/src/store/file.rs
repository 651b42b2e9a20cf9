// ── Backing-file helpers ──
//
// Whole-file replace via a temp file in the same directory, so readers
// only ever see the old contents or the new ones.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Read the file, or `None` if it does not exist.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, CoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoreError::io(path, e)),
    }
}

/// Atomically replace `path` with `bytes`, creating parent directories.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CoreError> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|e| CoreError::io(dir, e))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| CoreError::io(dir, e))?;
    temp.write_all(bytes)
        .map_err(|e| CoreError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| CoreError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| CoreError::io(path, e.error))?;
    Ok(())
}

/// Copy an unreadable store aside as `<file>.corrupt`, replacing any
/// earlier copy. Returns the backup path.
pub(crate) fn preserve_corrupt(path: &Path) -> Result<PathBuf, CoreError> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    let backup = path.with_file_name(name);
    fs::copy(path, &backup).map_err(|e| CoreError::io(&backup, e))?;
    Ok(backup)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
