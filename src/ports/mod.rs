/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports (driven ports) are the interfaces the scan core uses to
/// reach the file system, the console and the vulnerability databases.
pub mod outbound;
