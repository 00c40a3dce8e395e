use crate::shared::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// IgnoreListReader port for loading suppressed advisory identifiers
pub trait IgnoreListReader {
    /// Reads a suppression list: one identifier per line, `#` starts a comment
    fn read_ignore_list(&self, path: &Path) -> Result<BTreeSet<String>>;
}
