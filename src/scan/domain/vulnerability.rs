use super::NodeId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-dependency vulnerability lists keyed by node id
pub type VulnerabilityMap = BTreeMap<NodeId, Vec<Vulnerability>>;

/// Severity rank used when two sources disagree about the same advisory
///
/// Variants are declared lowest first so the derived `Ord` ranks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Parses a severity label as published by OSV and GitHub
    ///
    /// - "CRITICAL" -> Critical
    /// - "HIGH" -> High
    /// - "MODERATE" or "MEDIUM" -> Medium
    /// - "LOW" -> Low
    /// - anything else (including CVSS vectors) -> Unknown
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MODERATE" | "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub score: String,
}

impl SeverityEntry {
    pub fn new(kind: impl Into<String>, score: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            score: score.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl Reference {
    pub fn new(kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            url: url.into(),
        }
    }
}

/// A published advisory affecting one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub severity: Vec<SeverityEntry>,
    pub references: Vec<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_in: Option<String>,
}

impl Vulnerability {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aliases: Vec::new(),
            summary: None,
            severity: Vec::new(),
            references: Vec::new(),
            fixed_in: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_aliases(mut self, aliases: impl IntoIterator<Item = String>) -> Self {
        for alias in aliases {
            if alias != self.id && !self.aliases.contains(&alias) {
                self.aliases.push(alias);
            }
        }
        self
    }

    pub fn with_severity(mut self, entry: SeverityEntry) -> Self {
        self.severity.push(entry);
        self
    }

    pub fn with_fixed_in(mut self, version: impl Into<String>) -> Self {
        self.fixed_in = Some(version.into());
        self
    }

    /// Adds a reference unless one with the same url is already present
    pub fn add_reference(&mut self, reference: Reference) {
        if !self.references.iter().any(|r| r.url == reference.url) {
            self.references.push(reference);
        }
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.add_reference(reference);
        self
    }

    /// Rank of the first (authoritative) severity entry
    pub fn severity_rank(&self) -> Severity {
        self.severity
            .first()
            .map(|entry| Severity::from_label(&entry.score))
            .unwrap_or(Severity::Unknown)
    }

    /// Primary id followed by every alias
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
