/// Application layer - scan orchestration
///
/// Turns a [`dto::ScanRequest`] into a report by driving the scan domain
/// through the outbound ports. Query clients and presenters are picked by
/// the factories.
pub mod dto;
pub mod factories;
pub mod use_cases;
