/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the scan core uses
/// to interact with external systems (file system, network, console, etc.).
pub mod formatter;
pub mod ignore_list_reader;
pub mod lockfile_reader;
pub mod output_presenter;
pub mod progress_reporter;
pub mod vulnerability_repository;

pub use formatter::ReportFormatter;
pub use ignore_list_reader::IgnoreListReader;
pub use lockfile_reader::LockfileReader;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use vulnerability_repository::VulnerabilityRepository;
