use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit status of a lockscan run.
///
/// CI jobs gate on this: 1 means the scan finished and found something,
/// 3 means the scan never finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Nothing vulnerable left after suppression
    Success = 0,
    VulnerabilitiesDetected = 1,
    /// Rejected by the argument parser
    InvalidArguments = 2,
    /// Unreadable input, malformed lockfile, failed database request, ...
    ApplicationError = 3,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    fn label(self) -> &'static str {
        match self {
            ExitCode::Success => "clean",
            ExitCode::VulnerabilitiesDetected => "vulnerable",
            ExitCode::InvalidArguments => "usage error",
            ExitCode::ApplicationError => "scan failed",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.as_i32())
    }
}

/// Application-specific errors for dependency scanning.
///
/// Every variant here aborts the scan. Problems with a single lockfile entry
/// are reported as warnings and never reach this type.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No supported lockfile found: {path}\n\n💡 Hint: {suggestion}")]
    LockfileNotFound { path: PathBuf, suggestion: String },

    #[error("Unsupported lockfile: {path}\n\n💡 Hint: Supported files are package-lock.json, npm-shrinkwrap.json, package.json, yarn.lock, poetry.lock, Pipfile.lock and requirements.txt")]
    UnsupportedLockfile { path: PathBuf },

    #[error("Failed to parse lockfile: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the lockfile is in the correct format")]
    LockfileParseError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid scan path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a lockfile or a project directory")]
    InvalidScanPath { path: PathBuf, reason: String },

    #[error("Vulnerability database request failed ({source_name}): {details}\n\n💡 Hint: Check your network connection and try again")]
    VulnerabilityApiError {
        source_name: String,
        details: String,
    },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

impl ScanError {
    /// Shorthand for a fatal parse error on the given lockfile.
    pub fn parse(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        ScanError::LockfileParseError {
            path: path.into(),
            details: details.into(),
        }
    }
}
