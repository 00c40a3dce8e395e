use crate::scan::domain::Report;
use crate::shared::error::ExitCode;
use std::path::PathBuf;

/// ScanResponse - output of the scan use case
#[derive(Debug, Clone)]
pub struct ScanResponse {
    pub report: Report,
    /// The lockfile that was actually parsed
    pub lockfile_path: PathBuf,
}

impl ScanResponse {
    pub fn new(report: Report, lockfile_path: PathBuf) -> Self {
        Self {
            report,
            lockfile_path,
        }
    }

    /// Process exit code for this result
    pub fn exit_code(&self) -> ExitCode {
        if self.report.has_vulnerabilities() {
            ExitCode::VulnerabilitiesDetected
        } else {
            ExitCode::Success
        }
    }
}
