/// Data Transfer Objects for application layer
///
/// DTOs carry a scan request in from the CLI and the finished report back out,
/// keeping the scan domain free of command-line concerns.
mod scan_request;
mod scan_response;
mod source_selection;

pub use scan_request::ScanRequest;
pub use scan_response::ScanResponse;
pub use source_selection::SourceSelection;
