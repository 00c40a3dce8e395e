use crate::ports::outbound::{IgnoreListReader, LockfileReader};
use crate::scan::services::IgnoreFilter;
use crate::shared::error::ScanError;
use crate::shared::security::read_checked_file;
use crate::shared::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File names looked up when the scan target is a directory, highest priority first
pub const LOCKFILE_CANDIDATES: [&str; 7] = [
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "poetry.lock",
    "Pipfile.lock",
    "requirements.txt",
    "package.json",
];

/// FileSystemReader adapter for reading scan inputs from the file system
///
/// This adapter implements both LockfileReader and IgnoreListReader ports.
/// Every read goes through the shared file-safety checks (no symbolic
/// links, regular files only, size limit).
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LockfileReader for FileSystemReader {
    fn locate_lockfile(&self, target: &Path) -> Result<PathBuf> {
        if !target.exists() {
            return Err(ScanError::InvalidScanPath {
                path: target.to_path_buf(),
                reason: "Path does not exist".to_string(),
            }
            .into());
        }

        if !target.is_dir() {
            return Ok(target.to_path_buf());
        }

        LOCKFILE_CANDIDATES
            .iter()
            .map(|name| target.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                ScanError::LockfileNotFound {
                    path: target.to_path_buf(),
                    suggestion: format!(
                        "Looked for {} in \"{}\".\n   Pass the lockfile path directly if it has a different name.",
                        LOCKFILE_CANDIDATES.join(", "),
                        target.display()
                    ),
                }
                .into()
            })
    }

    fn read_lockfile(&self, lockfile_path: &Path) -> Result<String> {
        let description = lockfile_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "lockfile".to_string());
        read_checked_file(lockfile_path, &description)
    }
}

impl IgnoreListReader for FileSystemReader {
    fn read_ignore_list(&self, path: &Path) -> Result<BTreeSet<String>> {
        let content = read_checked_file(path, "ignore file")?;
        Ok(IgnoreFilter::parse_ignore_list(&content))
    }
}
