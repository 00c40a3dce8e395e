//! Guards applied to every file lockscan opens or writes.
//!
//! Lockfiles and ignore lists come from the scanned project, so they are
//! treated as untrusted: links are refused and oversized inputs rejected
//! before any bytes are read.

use crate::shared::error::ScanError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Largest input file accepted (100 MB). Real lockfiles stay far below this.
pub const MAX_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Refuses `path` when it is a symbolic link.
///
/// The link itself is inspected with `symlink_metadata`, never its target.
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let link_meta = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!("Cannot inspect {} ({} operation): {}", path.display(), operation, e)
    })?;

    if !link_meta.file_type().is_symlink() {
        return Ok(());
    }

    Err(ScanError::SecurityError {
        path: path.to_path_buf(),
        reason: format!("{} operations on symbolic links are not allowed", operation),
        hint: "Point lockscan at the real file instead of a link".to_string(),
    }
    .into())
}

fn ensure_within_limit(path: &Path, len: u64, limit: u64) -> Result<()> {
    if len <= limit {
        return Ok(());
    }
    Err(ScanError::SecurityError {
        path: path.to_path_buf(),
        reason: format!("file is too large ({} bytes, limit {} bytes)", len, limit),
        hint: "Check that the path names a lockfile and not a build artifact".to_string(),
    }
    .into())
}

/// Reads a UTF-8 input file once it is known to be a plain, reasonably sized file.
///
/// `description` names the file in error messages ("package-lock.json",
/// "ignore file", ...).
pub fn read_checked_file(path: &Path, description: &str) -> Result<String> {
    validate_not_symlink(path, "read")?;

    let meta = fs::metadata(path)
        .map_err(|e| anyhow::anyhow!("Cannot inspect {}: {}", description, e))?;
    if !meta.is_file() {
        anyhow::bail!("{} ({}) is not a regular file", path.display(), description);
    }
    ensure_within_limit(path, meta.len(), MAX_INPUT_BYTES)?;

    fs::read_to_string(path).map_err(|e| {
        ScanError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}
