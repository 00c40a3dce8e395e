//! Lockfile and manifest parsers.
//!
//! Each parser turns the text of one ecosystem file into a fresh
//! [`DependencyGraph`]. Missing required top-level structure is fatal;
//! a malformed individual entry is reported to the diagnostics sink and
//! skipped.

mod npm_lock;
mod package_json;
mod pipfile_lock;
mod poetry_lock;
mod requirements_txt;
mod yarn_lock;

pub use npm_lock::NpmLockParser;
pub use package_json::PackageJsonParser;
pub use pipfile_lock::PipfileLockParser;
pub use poetry_lock::{normalize_python_name, PoetryLockParser};
pub use requirements_txt::RequirementsTxtParser;
pub use yarn_lock::YarnLockParser;

use crate::ports::outbound::ProgressReporter;
use crate::scan::domain::DependencyGraph;
use crate::shared::error::ScanError;
use crate::shared::Result;
use std::fmt;
use std::path::Path;

/// Supported input formats, recognised by file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockfileFormat {
    NpmLock,
    PackageJson,
    YarnLock,
    PoetryLock,
    PipfileLock,
    RequirementsTxt,
}

impl LockfileFormat {
    /// Picks the parser for a path by its file name suffix
    ///
    /// # Errors
    /// Returns `ScanError::UnsupportedLockfile` for any other file name
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let format = if file_name.ends_with("package-lock.json")
            || file_name.ends_with("npm-shrinkwrap.json")
        {
            LockfileFormat::NpmLock
        } else if file_name.ends_with("package.json") {
            LockfileFormat::PackageJson
        } else if file_name.ends_with("yarn.lock") {
            LockfileFormat::YarnLock
        } else if file_name.ends_with("poetry.lock") {
            LockfileFormat::PoetryLock
        } else if file_name.ends_with("Pipfile.lock") {
            LockfileFormat::PipfileLock
        } else if file_name.ends_with(".txt") && file_name.contains("requirements") {
            LockfileFormat::RequirementsTxt
        } else {
            return Err(ScanError::UnsupportedLockfile {
                path: path.to_path_buf(),
            }
            .into());
        };

        Ok(format)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockfileFormat::NpmLock => "npm lockfile",
            LockfileFormat::PackageJson => "package.json",
            LockfileFormat::YarnLock => "yarn.lock",
            LockfileFormat::PoetryLock => "poetry.lock",
            LockfileFormat::PipfileLock => "Pipfile.lock",
            LockfileFormat::RequirementsTxt => "requirements.txt",
        }
    }
}

impl fmt::Display for LockfileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses lockfile content with the parser matching `path`
///
/// `path` only selects the format and labels error messages; the content
/// has already been read by the caller.
pub fn parse_lockfile(
    path: &Path,
    content: &str,
    reporter: &dyn ProgressReporter,
) -> Result<DependencyGraph> {
    match LockfileFormat::from_path(path)? {
        LockfileFormat::NpmLock => NpmLockParser::parse(path, content, reporter),
        LockfileFormat::PackageJson => PackageJsonParser::parse(path, content, reporter),
        LockfileFormat::YarnLock => YarnLockParser::parse(path, content, reporter),
        LockfileFormat::PoetryLock => PoetryLockParser::parse(path, content, reporter),
        LockfileFormat::PipfileLock => PipfileLockParser::parse(path, content, reporter),
        LockfileFormat::RequirementsTxt => RequirementsTxtParser::parse(path, content, reporter),
    }
}
