use lockscan::prelude::*;
use std::path::{Path, PathBuf};

/// Mock LockfileReader serving one in-memory lockfile
pub struct MockLockfileReader {
    pub path: PathBuf,
    pub content: String,
    pub should_fail: bool,
}

impl MockLockfileReader {
    /// `file_name` decides which parser runs, e.g. `"yarn.lock"`
    pub fn new(file_name: &str, content: &str) -> Self {
        Self {
            path: PathBuf::from("/project").join(file_name),
            content: content.to_string(),
            should_fail: false,
        }
    }

    pub fn with_failure(file_name: &str) -> Self {
        Self {
            should_fail: true,
            ..Self::new(file_name, "")
        }
    }
}

impl LockfileReader for MockLockfileReader {
    fn locate_lockfile(&self, _target: &Path) -> Result<PathBuf> {
        Ok(self.path.clone())
    }

    fn read_lockfile(&self, _lockfile_path: &Path) -> Result<String> {
        if self.should_fail {
            anyhow::bail!("Mock lockfile read failure");
        }
        Ok(self.content.clone())
    }
}
