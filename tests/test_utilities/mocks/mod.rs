/// Mock implementations for testing
mod mock_ignore_list_reader;
mod mock_lockfile_reader;
mod mock_progress_reporter;
mod mock_vulnerability_repository;

pub use mock_ignore_list_reader::MockIgnoreListReader;
pub use mock_lockfile_reader::MockLockfileReader;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_vulnerability_repository::MockVulnerabilityRepository;
