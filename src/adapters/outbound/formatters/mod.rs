/// Formatter adapters for report output
mod json_formatter;

pub use json_formatter::JsonReportFormatter;
