//! Pure scan services: no I/O, deterministic output for a given input.

pub mod graph_traversal;
pub mod ignore_filter;
pub mod report_builder;
pub mod version_matcher;
pub mod vulnerability_merger;

pub use graph_traversal::GraphTraversal;
pub use ignore_filter::{FilterOutcome, IgnoreFilter};
pub use report_builder::ReportBuilder;
pub use version_matcher::VersionMatcher;
pub use vulnerability_merger::VulnerabilityMerger;
