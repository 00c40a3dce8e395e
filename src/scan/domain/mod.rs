pub mod dependency_graph;
pub mod dependency_node;
pub mod report;
pub mod vulnerability;

pub use dependency_graph::{DependencyGraph, GraphBuilder};
pub use dependency_node::{DependencyNode, DependencyType, NodeId, Registry};
pub use report::{DatabaseSource, Finding, Report, ReportMetadata, ReportSummary};
pub use vulnerability::{Reference, Severity, SeverityEntry, Vulnerability, VulnerabilityMap};
