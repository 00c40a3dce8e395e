use crate::shared::Result;
use std::path::{Path, PathBuf};

/// LockfileReader port for locating and reading the scan target
///
/// This port abstracts the file system operations needed to turn a
/// user-supplied path (a lockfile or a project directory) into lockfile text.
pub trait LockfileReader {
    /// Resolves the scan target to a concrete lockfile path
    ///
    /// A file path is returned as-is; a directory is searched for the
    /// supported lockfiles in priority order.
    ///
    /// # Errors
    /// Returns an error if the path does not exist or a directory holds no
    /// supported lockfile
    fn locate_lockfile(&self, target: &Path) -> Result<PathBuf>;

    /// Reads the lockfile content
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is a symbolic link,
    /// or exceeds the size limit
    fn read_lockfile(&self, lockfile_path: &Path) -> Result<String>;
}
