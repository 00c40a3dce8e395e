/// Outbound adapters: console diagnostics, file access, report
/// formatting and the two advisory database clients
pub mod console;
pub mod filesystem;
pub mod formatters;
pub mod network;
