use super::SourceSelection;
use std::path::PathBuf;

/// ScanRequest - input of the scan use case
///
/// Built by the CLI after command-line flags and the config file have been
/// merged. The GitHub token travels here so the core never reads the
/// environment itself.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Lockfile or project directory to scan
    pub target: PathBuf,
    pub sources: SourceSelection,
    /// Advisory ids suppressed for this run
    pub ignore_ids: Vec<String>,
    /// Optional file with one advisory id per line
    pub ignore_file: Option<PathBuf>,
    pub github_token: Option<String>,
}

impl ScanRequest {
    pub fn new(target: PathBuf, sources: SourceSelection) -> Self {
        Self {
            target,
            sources,
            ignore_ids: Vec::new(),
            ignore_file: None,
            github_token: None,
        }
    }

    pub fn with_ignore_ids(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.ignore_ids.extend(ids);
        self
    }

    pub fn with_ignore_file(mut self, path: Option<PathBuf>) -> Self {
        self.ignore_file = path;
        self
    }

    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_suppressions() {
        let request = ScanRequest::new(PathBuf::from("."), SourceSelection::All);
        assert!(request.ignore_ids.is_empty());
        assert!(request.ignore_file.is_none());
        assert!(request.github_token.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let request = ScanRequest::new(PathBuf::from("yarn.lock"), SourceSelection::Osv)
            .with_ignore_ids(vec!["GHSA-aaaa".to_string()])
            .with_ignore_ids(vec!["CVE-2024-1".to_string()])
            .with_ignore_file(Some(PathBuf::from(".lockscanignore")))
            .with_github_token(Some("ghp_x".to_string()));

        assert_eq!(request.ignore_ids, vec!["GHSA-aaaa", "CVE-2024-1"]);
        assert_eq!(request.ignore_file, Some(PathBuf::from(".lockscanignore")));
        assert_eq!(request.github_token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let request = ScanRequest::new(PathBuf::from("."), SourceSelection::GitHub)
            .with_github_token(Some("  ".to_string()));
        assert!(request.github_token.is_none());
    }
}
