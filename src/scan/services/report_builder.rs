use crate::scan::domain::{
    DependencyNode, DependencyType, Finding, Report, ReportMetadata, ReportSummary,
    VulnerabilityMap,
};

/// ReportBuilder service assembling the final report value
pub struct ReportBuilder;

impl ReportBuilder {
    /// Builds one finding per scanned dependency, in the given order
    pub fn build(
        dependencies: &[DependencyNode],
        vulnerabilities: &VulnerabilityMap,
        metadata: ReportMetadata,
    ) -> Report {
        let findings: Vec<Finding> = dependencies
            .iter()
            .map(|node| Finding {
                id: node.id().to_string(),
                name: node.name().to_string(),
                version: node.version().to_string(),
                dependency_type: node.dependency_type(),
                vulnerabilities: vulnerabilities.get(node.id()).cloned().unwrap_or_default(),
            })
            .collect();
        let summary = Self::summarize(&findings);

        Report {
            findings,
            summary,
            metadata,
        }
    }

    pub fn summarize(findings: &[Finding]) -> ReportSummary {
        let total = findings.len();
        let direct = findings
            .iter()
            .filter(|f| f.dependency_type == DependencyType::Direct)
            .count();
        let vulnerable = findings.iter().filter(|f| f.is_vulnerable()).count();

        ReportSummary {
            total,
            direct,
            transitive: total - direct,
            vulnerable,
            vulnerable_percentage: percentage(vulnerable, total),
        }
    }
}

/// Percentage rounded to one decimal; zero for an empty scan
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}
