use crate::scan::domain::{Vulnerability, VulnerabilityMap};

/// VulnerabilityMerger service combining results from several databases
///
/// Advisories are matched by primary id. When both sides report the same
/// advisory the fields are reconciled so the outcome does not depend on
/// which source answered first:
/// - summary: the longer text
/// - severity: the list whose first entry ranks higher
/// - references and aliases: union, first-seen order
/// - fixed_in: the first explicit value
pub struct VulnerabilityMerger;

impl VulnerabilityMerger {
    /// Unions two advisory lists, de-duplicated by advisory id
    pub fn merge_vulnerabilities(
        first: &[Vulnerability],
        second: &[Vulnerability],
    ) -> Vec<Vulnerability> {
        let mut merged: Vec<Vulnerability> = Vec::with_capacity(first.len() + second.len());
        for vulnerability in first.iter().chain(second) {
            match merged.iter_mut().find(|v| v.id == vulnerability.id) {
                Some(existing) => reconcile(existing, vulnerability),
                None => merged.push(vulnerability.clone()),
            }
        }
        merged
    }

    /// Merges two per-dependency maps; dependencies from either side are kept
    pub fn merge_maps(first: &VulnerabilityMap, second: &VulnerabilityMap) -> VulnerabilityMap {
        let mut merged = first.clone();
        for (id, vulnerabilities) in second {
            let combined = match merged.get(id) {
                Some(existing) => Self::merge_vulnerabilities(existing, vulnerabilities),
                None => Self::merge_vulnerabilities(&[], vulnerabilities),
            };
            merged.insert(id.clone(), combined);
        }
        merged
    }

    /// Folds any number of maps with [`merge_maps`](Self::merge_maps)
    pub fn merge_all<'a>(maps: impl IntoIterator<Item = &'a VulnerabilityMap>) -> VulnerabilityMap {
        maps.into_iter()
            .fold(VulnerabilityMap::new(), |acc, map| Self::merge_maps(&acc, map))
    }
}

fn reconcile(existing: &mut Vulnerability, incoming: &Vulnerability) {
    let incoming_longer = match (&existing.summary, &incoming.summary) {
        (None, Some(_)) => true,
        (Some(current), Some(candidate)) => candidate.chars().count() > current.chars().count(),
        _ => false,
    };
    if incoming_longer {
        existing.summary = incoming.summary.clone();
    }

    if (existing.severity.is_empty() && !incoming.severity.is_empty())
        || incoming.severity_rank() > existing.severity_rank()
    {
        existing.severity = incoming.severity.clone();
    }

    for alias in &incoming.aliases {
        if alias != &existing.id && !existing.aliases.contains(alias) {
            existing.aliases.push(alias.clone());
        }
    }

    for reference in &incoming.references {
        existing.add_reference(reference.clone());
    }

    if existing.fixed_in.is_none() {
        existing.fixed_in = incoming.fixed_in.clone();
    }
}
