use lockscan::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;

/// Mock IgnoreListReader returning a fixed id set
#[derive(Default)]
pub struct MockIgnoreListReader {
    pub ids: BTreeSet<String>,
}

impl MockIgnoreListReader {
    pub fn with_ids(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl IgnoreListReader for MockIgnoreListReader {
    fn read_ignore_list(&self, _path: &Path) -> Result<BTreeSet<String>> {
        Ok(self.ids.clone())
    }
}
