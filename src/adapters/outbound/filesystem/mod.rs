/// Lockfile and ignore-list reading, report writing
mod file_reader;
mod file_writer;

pub use file_reader::{FileSystemReader, LOCKFILE_CANDIDATES};
pub use file_writer::{FileSystemWriter, StdoutPresenter};
