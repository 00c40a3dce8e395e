use super::{DependencyType, NodeId, Vulnerability};
use serde::Serialize;
use std::fmt;

/// Vulnerability database a scan can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseSource {
    Osv,
    GitHub,
}

impl DatabaseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseSource::Osv => "osv",
            DatabaseSource::GitHub => "github",
        }
    }
}

impl fmt::Display for DatabaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scanned dependency and the advisories that still apply to it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: NodeId,
    pub name: String,
    pub version: String,
    pub dependency_type: DependencyType,
    pub vulnerabilities: Vec<Vulnerability>,
}

impl Finding {
    pub fn is_vulnerable(&self) -> bool {
        !self.vulnerabilities.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total: usize,
    pub direct: usize,
    pub transitive: usize,
    pub vulnerable: usize,
    /// Share of vulnerable dependencies, rounded to one decimal
    pub vulnerable_percentage: f64,
}

/// Provenance of a scan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub scan_id: String,
    pub tool_version: String,
    pub scanned_file: String,
    pub sources: Vec<DatabaseSource>,
    pub timestamp: String,
    pub duration_ms: u64,
    pub suppressed_count: usize,
    pub suppressed_ids: Vec<String>,
}

/// The value handed to whatever persists or prints scan results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub findings: Vec<Finding>,
    pub summary: ReportSummary,
    pub metadata: ReportMetadata,
}

impl Report {
    pub fn has_vulnerabilities(&self) -> bool {
        self.summary.vulnerable > 0
    }

    pub fn vulnerable_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_vulnerable())
    }
}
