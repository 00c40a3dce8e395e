use crate::scan::domain::VulnerabilityMap;
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Result of applying a suppression list
#[derive(Debug)]
pub struct FilterOutcome<'a> {
    /// The map without suppressed advisories; borrowed when nothing could be removed
    pub vulnerabilities: Cow<'a, VulnerabilityMap>,
    /// Number of advisory instances removed, summed over every dependency
    pub removed_count: usize,
    /// Suppression ids that matched at least one advisory, sorted
    pub removed_ids: Vec<String>,
}

/// IgnoreFilter service removing suppressed advisories after merging
pub struct IgnoreFilter;

impl IgnoreFilter {
    /// Drops every advisory whose id or any alias is suppressed
    ///
    /// Dependencies stay in the map even when all their advisories are
    /// removed. An empty suppression set returns the input untouched.
    pub fn filter<'a>(
        vulnerabilities: &'a VulnerabilityMap,
        suppressed: &BTreeSet<String>,
    ) -> FilterOutcome<'a> {
        if suppressed.is_empty() {
            return FilterOutcome {
                vulnerabilities: Cow::Borrowed(vulnerabilities),
                removed_count: 0,
                removed_ids: Vec::new(),
            };
        }

        let mut removed_count = 0;
        let mut removed_ids: BTreeSet<String> = BTreeSet::new();
        let mut filtered = VulnerabilityMap::new();

        for (dependency_id, list) in vulnerabilities {
            let mut kept = Vec::with_capacity(list.len());
            for vulnerability in list {
                let matched: Vec<&str> = vulnerability
                    .identifiers()
                    .filter(|id| suppressed.contains(*id))
                    .collect();
                if matched.is_empty() {
                    kept.push(vulnerability.clone());
                } else {
                    removed_count += 1;
                    removed_ids.extend(matched.into_iter().map(str::to_string));
                }
            }
            filtered.insert(dependency_id.clone(), kept);
        }

        FilterOutcome {
            vulnerabilities: Cow::Owned(filtered),
            removed_count,
            removed_ids: removed_ids.into_iter().collect(),
        }
    }

    /// Parses a suppression list: one id per line, `#` comments, blank lines ignored
    ///
    /// Identifiers are kept verbatim and compared case-sensitively.
    pub fn parse_ignore_list(content: &str) -> BTreeSet<String> {
        content
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}
