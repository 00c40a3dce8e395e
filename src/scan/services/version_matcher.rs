use semver::{Version, VersionReq};

/// VersionMatcher service deciding whether a version falls inside an
/// advisory's vulnerable range
pub struct VersionMatcher;

impl VersionMatcher {
    /// Checks `version` against a range such as `">= 1.0.0, < 2.0.0"`
    ///
    /// Never fails: a version that is not valid semver (after trimming and
    /// dropping a leading `v`) is reported as not affected, and a range the
    /// matcher cannot parse falls back to a plain substring check of the
    /// raw range text against the raw version text.
    pub fn is_affected(version: &str, range: &str) -> bool {
        let Ok(parsed) = Version::parse(clean_version(version)) else {
            return false;
        };

        match VersionReq::parse(&normalize_range(range)) {
            Ok(requirement) => requirement.matches(&parsed),
            Err(_) => range.contains(version),
        }
    }
}

fn clean_version(version: &str) -> &str {
    let version = version.trim();
    let version = version.strip_prefix('=').unwrap_or(version).trim_start();
    version.strip_prefix('v').unwrap_or(version)
}

/// Rewrites advisory clauses into `semver` comparator syntax
///
/// Each clause loses the blank between operator and version, and a bare
/// version becomes an exact `=` match (`semver` would read it as a caret
/// range). Clauses are joined with `", "`, the conjunction `semver` expects.
fn normalize_range(range: &str) -> String {
    range
        .split(',')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(|clause| {
            let op_end = clause
                .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
                .unwrap_or(clause.len());
            let (op, version) = clause.split_at(op_end);
            let op = if op.is_empty() { "=" } else { op };
            format!("{}{}", op, clean_version(version))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
