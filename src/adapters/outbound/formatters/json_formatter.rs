use crate::ports::outbound::ReportFormatter;
use crate::scan::domain::Report;
use crate::shared::Result;

/// JsonReportFormatter adapter producing pretty-printed camelCase JSON
pub struct JsonReportFormatter;

impl JsonReportFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonReportFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
