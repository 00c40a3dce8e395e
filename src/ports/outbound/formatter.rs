use crate::scan::domain::Report;
use crate::shared::Result;

/// ReportFormatter port for serialising a finished scan
pub trait ReportFormatter {
    /// Formats the report
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, report: &Report) -> Result<String>;
}
