//! lockscan - dependency vulnerability scanner for npm and Python lockfiles
//!
//! Parses a lockfile or manifest into a dependency graph, walks it from the
//! project's direct dependencies, queries the OSV and GitHub advisory
//! databases concurrently, merges their answers per advisory and applies a
//! suppression list before building the report.
//!
//! # Architecture
//!
//! - **Scan domain** (`scan`): graph model, lockfile parsers and pure services
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use lockscan::prelude::*;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn scan() -> Result<()> {
//! let reporter = Arc::new(StderrProgressReporter::new());
//! let repositories =
//!     VulnerabilitySourceFactory::create(SourceSelection::All, None, reporter.clone())?;
//!
//! let use_case = ScanDependenciesUseCase::new(
//!     FileSystemReader::new(),
//!     FileSystemReader::new(),
//!     reporter,
//!     CheckVulnerabilitiesUseCase::new(repositories),
//! );
//!
//! let request = ScanRequest::new(PathBuf::from("."), SourceSelection::All);
//! let response = use_case.execute(request).await?;
//! println!("{}", JsonReportFormatter::new().format(&response.report)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod scan;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::JsonReportFormatter;
    pub use crate::adapters::outbound::network::{GitHubAdvisoryClient, OsvClient};
    pub use crate::application::dto::{ScanRequest, ScanResponse, SourceSelection};
    pub use crate::application::factories::VulnerabilitySourceFactory;
    pub use crate::application::use_cases::{
        CheckVulnerabilitiesUseCase, ScanDependenciesUseCase,
    };
    pub use crate::ports::outbound::{
        IgnoreListReader, LockfileReader, OutputPresenter, ProgressReporter, ReportFormatter,
        VulnerabilityRepository,
    };
    pub use crate::scan::domain::{
        DependencyGraph, DependencyNode, DependencyType, Registry, Report, Vulnerability,
        VulnerabilityMap,
    };
    pub use crate::scan::parsers::parse_lockfile;
    pub use crate::scan::services::{
        GraphTraversal, IgnoreFilter, ReportBuilder, VersionMatcher, VulnerabilityMerger,
    };
    pub use crate::shared::Result;
}
